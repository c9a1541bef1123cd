use super::selector::MoveSelector;
use crate::core::Move;
use crate::logic::ChessGame;
use crate::player::PlayerController;

/// Computer opponent playing at a fixed stage level.
pub struct StageAI {
    pub name: String,
    level: u32,
    selector: MoveSelector,
}

impl StageAI {
    pub fn new(level: u32) -> Self {
        Self::with_selector(level, MoveSelector::new())
    }

    /// Reproducible opponent: same seed, same games.
    pub fn seeded(level: u32, seed: u64) -> Self {
        Self::with_selector(level, MoveSelector::seeded(seed))
    }

    pub fn with_selector(level: u32, selector: MoveSelector) -> Self {
        StageAI {
            name: format!("Stage {level} AI"),
            level,
            selector,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl PlayerController for StageAI {
    fn choose_move(&mut self, game: &mut ChessGame) -> Option<Move> {
        self.selector.select_move(game, self.level)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
