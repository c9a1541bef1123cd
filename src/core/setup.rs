use crate::core::{Board, Piece, Side, Square};
use anyhow::{anyhow, bail, ensure, Result};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// Standard initial placement.
pub fn start_board() -> Board {
    // The constant is well-formed; parse failures are impossible here.
    parse_placement(START_FEN.split_whitespace().next().unwrap_or_default())
        .unwrap_or_default()
}

/// Parses the first two FEN fields (placement and side to move). Castling,
/// en passant and clocks are accepted but ignored.
pub fn parse_fen(fen: &str) -> Result<(Board, Side)> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or_else(|| anyhow!("empty FEN"))?;
    let board = parse_placement(placement)?;
    let side = match fields.next() {
        None | Some("w") => Side::White,
        Some("b") => Side::Black,
        Some(other) => bail!("invalid side to move: {other}"),
    };
    Ok((board, side))
}

fn parse_placement(placement: &str) -> Result<Board> {
    let rows: Vec<&str> = placement.split('/').collect();
    ensure!(rows.len() == Board::SIZE, "expected 8 ranks, got {}", rows.len());

    let mut board = Board::new();
    for (row, rank) in rows.iter().enumerate() {
        let mut col = 0;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                col += skip as usize;
                continue;
            }
            let piece = Piece::from_char(c).ok_or_else(|| anyhow!("invalid piece '{c}'"))?;
            ensure!(col < Board::SIZE, "rank {} overflows", 8 - row);
            board.place_piece(Square::new(row, col), piece);
            col += 1;
        }
        ensure!(col == Board::SIZE, "rank {} has {} files", 8 - row, col);
    }
    Ok(board)
}

/// Placement field of a FEN string for `board`.
pub fn placement_string(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..Board::SIZE {
        let mut empty = 0;
        for col in 0..Board::SIZE {
            match board.get_piece(Square::new(row, col)) {
                Some(p) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(p.display_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if row + 1 < Board::SIZE {
            out.push('/');
        }
    }
    out
}
