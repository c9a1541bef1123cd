//! # Evaluation Module
//!
//! Static evaluation of a position. The score is always from White's
//! perspective (positive = White advantage) regardless of the side to move;
//! the search flips it with the side sign.
//!
//! ## Scoring Strategy
//! For every occupied square: material value plus one tenth of the
//! piece-square bonus, added for White pieces and subtracted for Black ones.
//! The same table is used for both sides without mirroring.

use crate::core::{Board, PieceKind, Side, Square};
use crate::logic::RulesEngine;
use crate::player::ai::pst::get_pst_value;

const VAL_PAWN: i32 = 10;
const VAL_KNIGHT: i32 = 32;
const VAL_BISHOP: i32 = 33;
const VAL_ROOK: i32 = 50;
const VAL_QUEEN: i32 = 90;
/// Finite so that a missing king is just a very large material swing.
const VAL_KING: i32 = 2000;

/// Weight of the piece-square bonus relative to material.
const PST_WEIGHT: f64 = 0.1;

/// Material weight of a piece kind.
pub fn piece_val(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => VAL_PAWN,
        PieceKind::Knight => VAL_KNIGHT,
        PieceKind::Bishop => VAL_BISHOP,
        PieceKind::Rook => VAL_ROOK,
        PieceKind::Queen => VAL_QUEEN,
        PieceKind::King => VAL_KING,
    }
}

/// Trait for evaluating positions
pub trait Evaluator: Send + Sync {
    /// Evaluate from White's perspective
    ///
    /// Returns:
    ///   - Positive score: White advantage
    ///   - Negative score: Black advantage
    fn evaluate(&self, position: &dyn RulesEngine) -> f64;

    /// Get evaluator name for debugging
    fn name(&self) -> &str;
}

/// Material plus piece-square evaluator. Serves every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialPstEvaluator;

impl Evaluator for MaterialPstEvaluator {
    fn evaluate(&self, position: &dyn RulesEngine) -> f64 {
        let mut total = 0.0;
        for row in 0..Board::SIZE {
            for col in 0..Board::SIZE {
                let sq = Square::new(row, col);
                if let Some(piece) = position.piece_at(sq) {
                    let score = piece_val(piece.kind) as f64
                        + PST_WEIGHT * get_pst_value(piece.kind, sq) as f64;
                    match piece.side {
                        Side::White => total += score,
                        Side::Black => total -= score,
                    }
                }
            }
        }
        total
    }

    fn name(&self) -> &str {
        "material+pst"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ChessGame;

    fn eval(fen: &str) -> f64 {
        MaterialPstEvaluator.evaluate(&ChessGame::from_fen(fen).unwrap())
    }

    #[test]
    fn test_piece_values() {
        assert!(piece_val(PieceKind::Queen) > piece_val(PieceKind::Rook));
        assert!(piece_val(PieceKind::Bishop) > piece_val(PieceKind::Knight));
        assert!(piece_val(PieceKind::Knight) > piece_val(PieceKind::Pawn));
        assert_eq!(piece_val(PieceKind::King), 2000);
    }

    #[test]
    fn test_empty_and_kings_only() {
        assert_eq!(eval("8/8/8/8/8/8/8/8 w"), 0.0);
        assert_eq!(eval("4k3/8/8/8/8/8/8/4K3 w"), 0.0);
    }

    #[test]
    fn test_independent_of_side_to_move() {
        let fen = "4k3/8/8/8/3N4/8/8/4K3";
        let white = eval(&format!("{fen} w"));
        let black = eval(&format!("{fen} b"));
        assert_eq!(white, black);
        // Knight on d4: 32 + 0.1 * 2.
        assert!((white - 32.2).abs() < 1e-9);
    }

    #[test]
    fn test_start_position_is_asymmetric() {
        // Unmirrored pawn table: White's second rank scores 5+5+10-10-10+10+5+5 = 20,
        // Black's seventh rank scores 8 * 5 = 40. Knights cancel (table is symmetric).
        let score = MaterialPstEvaluator.evaluate(&ChessGame::new());
        assert!((score - (0.1 * 20.0 - 0.1 * 40.0)).abs() < 1e-9);
    }

    #[test]
    fn test_black_material_is_negative() {
        let score = eval("4k3/8/8/8/8/8/8/r3K3 w");
        assert!((score + 50.0).abs() < 1e-9);
    }
}
