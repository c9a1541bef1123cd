use crate::core::{Move, Side};
use crate::logic::{ChessGame, GameStatus, RulesEngine};
use crate::player::PlayerController;
use serde::{Deserialize, Serialize};

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub status: GameStatus,
    pub winner: Option<Side>,
    pub plies: usize,
    /// Notation of every move played, in order.
    pub moves: Vec<String>,
    /// Stopped at the ply limit with the game still going (scored as a draw).
    pub ply_limit_reached: bool,
}

pub struct Game {
    pub position: ChessGame,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(ChessGame::new())
    }
}

impl Game {
    pub fn new(position: ChessGame) -> Self {
        Game { position }
    }

    /// Plays `white` against `black` until the game ends, a controller has
    /// nothing to play (resignation), or `max_plies` moves have been made.
    /// `on_move` sees the position right after each move.
    ///
    /// Controllers may take moves back (a human's undo); the outcome reflects
    /// the moves still on the board.
    pub fn play<F>(
        &mut self,
        white: &mut dyn PlayerController,
        black: &mut dyn PlayerController,
        max_plies: usize,
        mut on_move: F,
    ) -> GameOutcome
    where
        F: FnMut(&ChessGame, &Move),
    {
        let start_ply = self.position.ply_count();

        loop {
            let status = self.position.status();
            if status.is_over() {
                return self.outcome(start_ply, status, status.winner(), false);
            }
            if self.position.ply_count().saturating_sub(start_ply) >= max_plies {
                return self.outcome(start_ply, status, None, true);
            }

            let side = self.position.side_to_move();
            let controller: &mut dyn PlayerController = match side {
                Side::White => &mut *white,
                Side::Black => &mut *black,
            };

            let Some(mv) = controller.choose_move(&mut self.position) else {
                tracing::info!(player = controller.name(), "no move offered, resigning");
                return self.outcome(start_ply, status, Some(side.opponent()), false);
            };
            // An undo may have changed whose turn it is.
            if self.position.side_to_move() != side || !self.position.apply_move(&mv) {
                tracing::warn!(player = controller.name(), mv = %mv, "illegal move, resigning");
                return self.outcome(start_ply, status, Some(side.opponent()), false);
            }

            on_move(&self.position, &mv);
        }
    }

    fn outcome(
        &self,
        start_ply: usize,
        status: GameStatus,
        winner: Option<Side>,
        ply_limit_reached: bool,
    ) -> GameOutcome {
        let moves: Vec<String> = self
            .position
            .moves_played()
            .skip(start_ply)
            .map(|mv| mv.notation.clone())
            .collect();
        GameOutcome {
            status,
            winner,
            plies: moves.len(),
            moves,
            ply_limit_reached,
        }
    }
}
