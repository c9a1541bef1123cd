use super::types::Side;
use serde::{Deserialize, Serialize};

/// Piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Movement pattern of a piece.
#[derive(Debug, Clone, Copy)]
pub enum MoveStep {
    Step(i32, i32),  // one square by (d_row, d_col)
    Slide(i32, i32), // repeat (d_row, d_col) until blocked
}

const KING_STEPS: [MoveStep; 8] = [
    MoveStep::Step(-1, -1),
    MoveStep::Step(-1, 0),
    MoveStep::Step(-1, 1),
    MoveStep::Step(0, -1),
    MoveStep::Step(0, 1),
    MoveStep::Step(1, -1),
    MoveStep::Step(1, 0),
    MoveStep::Step(1, 1),
];

const KNIGHT_STEPS: [MoveStep; 8] = [
    MoveStep::Step(-2, -1),
    MoveStep::Step(-2, 1),
    MoveStep::Step(-1, -2),
    MoveStep::Step(-1, 2),
    MoveStep::Step(1, -2),
    MoveStep::Step(1, 2),
    MoveStep::Step(2, -1),
    MoveStep::Step(2, 1),
];

const ROOK_SLIDES: [MoveStep; 4] = [
    MoveStep::Slide(-1, 0),
    MoveStep::Slide(1, 0),
    MoveStep::Slide(0, -1),
    MoveStep::Slide(0, 1),
];

const BISHOP_SLIDES: [MoveStep; 4] = [
    MoveStep::Slide(-1, -1),
    MoveStep::Slide(-1, 1),
    MoveStep::Slide(1, -1),
    MoveStep::Slide(1, 1),
];

const QUEEN_SLIDES: [MoveStep; 8] = [
    MoveStep::Slide(-1, 0),
    MoveStep::Slide(1, 0),
    MoveStep::Slide(0, -1),
    MoveStep::Slide(0, 1),
    MoveStep::Slide(-1, -1),
    MoveStep::Slide(-1, 1),
    MoveStep::Slide(1, -1),
    MoveStep::Slide(1, 1),
];

impl PieceKind {
    /// Kinds a pawn may promote to, in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Upper-case letter used in notation and placement strings.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Movement rules for everything except pawns, whose pushes and captures
    /// differ and are generated separately.
    pub fn movement_rules(self) -> &'static [MoveStep] {
        match self {
            PieceKind::King => &KING_STEPS,
            PieceKind::Knight => &KNIGHT_STEPS,
            PieceKind::Rook => &ROOK_SLIDES,
            PieceKind::Bishop => &BISHOP_SLIDES,
            PieceKind::Queen => &QUEEN_SLIDES,
            PieceKind::Pawn => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Piece { kind, side }
    }

    /// Placement character: upper case for White, lower case for Black.
    pub fn display_char(&self) -> char {
        let c = self.kind.letter();
        match self.side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Some(Piece { kind, side })
    }
}
