pub mod ai;
pub mod controller;
pub mod human;

pub use ai::StageAI;
pub use controller::PlayerController;
pub use human::HumanPlayer;
