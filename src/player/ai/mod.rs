pub mod eval;
pub mod pst;
pub mod search;
pub mod selector;
pub mod stage;
pub mod stage_ai;

#[cfg(test)]
mod search_tests;

pub use eval::{Evaluator, MaterialPstEvaluator};
pub use search::{AppliedMove, SearchEngine};
pub use selector::MoveSelector;
pub use stage::{EvalProfile, StageCatalog, StageConfig, StageProgress, Strategy};
pub use stage_ai::StageAI;
