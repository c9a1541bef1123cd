pub mod board;
pub mod r#move;
pub mod piece;
pub mod setup;
pub mod types;

pub use board::Board;
pub use piece::{MoveStep, Piece, PieceKind};
pub use r#move::Move;
pub use setup::{parse_fen, start_board, START_FEN};
pub use types::{Side, Square};
