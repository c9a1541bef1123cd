use crate::core::{PieceKind, Square};

// Mid-game piece-square tables, indexed [row][col] with row 0 = rank 8.
// Only pawns and knights have one; other kinds get no positional bonus.
//
// The tables are written from White's point of view and are applied to both
// sides unmirrored.

const PAWN: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 5, 5, 5, 5, 5, 5, 5],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [0, 0, 0, 2, 2, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 5, 10, -10, -10, 10, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT: [[i32; 8]; 8] = [
    [-5, -4, -3, -3, -3, -3, -4, -5],
    [-4, -2, 0, 0, 0, 0, -2, -4],
    [-3, 0, 1, 1, 1, 1, 0, -3],
    [-3, 0, 1, 2, 2, 1, 0, -3],
    [-3, 0, 1, 2, 2, 1, 0, -3],
    [-3, 0, 1, 1, 1, 1, 0, -3],
    [-4, -2, 0, 0, 0, 0, -2, -4],
    [-5, -4, -3, -3, -3, -3, -4, -5],
];

fn table(kind: PieceKind) -> Option<&'static [[i32; 8]; 8]> {
    match kind {
        PieceKind::Pawn => Some(&PAWN),
        PieceKind::Knight => Some(&KNIGHT),
        _ => None,
    }
}

/// Positional bonus for `kind` on `sq`, 0 for kinds without a table.
pub fn get_pst_value(kind: PieceKind, sq: Square) -> i32 {
    table(kind).map_or(0, |t| t[sq.row][sq.col])
}
