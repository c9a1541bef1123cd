use super::piece::{Piece, PieceKind};
use super::types::{Side, Square};
use serde::{Deserialize, Serialize};

/// 8x8 piece placement. Indexed `[row][col]`, row 0 being rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub const SIZE: usize = 8;

    pub fn new() -> Self {
        Board::default()
    }

    pub fn place_piece(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.row][sq.col] = Some(piece);
    }

    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row][sq.col]
    }

    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row][sq.col].take()
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|p| (Square::new(row, col), p)))
        })
    }

    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.side == side && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new();
        let e1 = Square::parse("e1").unwrap();
        board.place_piece(e1, Piece::new(PieceKind::King, Side::White));

        assert_eq!(board.find_king(Side::White), Some(e1));
        assert_eq!(board.find_king(Side::Black), None);
        assert_eq!(board.pieces().count(), 1);

        let removed = board.remove_piece(e1);
        assert_eq!(removed.map(|p| p.kind), Some(PieceKind::King));
        assert!(board.get_piece(e1).is_none());
    }
}
