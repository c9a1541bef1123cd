use super::piece::PieceKind;
use super::types::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move as produced by the rules engine. The decision engine only reads
/// `captured`; everything else is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub captured: Option<PieceKind>,
    pub notation: String,
}

impl Move {
    /// Builds a move and its notation, e.g. `Ng1-f3`, `e4xd5`, `e7-e8=Q`.
    pub fn new(
        mover: PieceKind,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        captured: Option<PieceKind>,
    ) -> Self {
        let mut notation = String::new();
        if mover != PieceKind::Pawn {
            notation.push(mover.letter());
        }
        notation.push_str(&from.to_string());
        notation.push(if captured.is_some() { 'x' } else { '-' });
        notation.push_str(&to.to_string());
        if let Some(kind) = promotion {
            notation.push('=');
            notation.push(kind.letter());
        }
        Move {
            from,
            to,
            promotion,
            captured,
            notation,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}
