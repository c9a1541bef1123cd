use crate::core::Move;
use crate::logic::ChessGame;

/// Something that picks moves for one side of a game.
///
/// Implementations may apply and undo moves on `game` while thinking, but
/// must hand it back in the state they received it.
pub trait PlayerController {
    fn choose_move(&mut self, game: &mut ChessGame) -> Option<Move>;
    fn name(&self) -> &str;
}
