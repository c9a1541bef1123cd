//! Reference rules engine.
//!
//! The decision engine only talks to a position through [`RulesEngine`].
//! [`ChessGame`] implements it for a simplified chess: every normal piece move,
//! pawn double pushes and promotions, but no castling and no en passant.

use crate::core::{parse_fen, start_board, Board, Move, MoveStep, Piece, PieceKind, Side, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position handle consumed by the decision engine.
///
/// Implementations own the position; the engine mutates it only through
/// `apply_move` / `undo_last_move` and must leave it as it found it.
pub trait RulesEngine {
    /// Legal moves for the side to move, in the engine's native order.
    fn legal_moves(&self) -> Vec<Move>;

    /// Legal moves starting on `from`.
    fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Plays `mv`. Returns false (and leaves the position untouched) if it is not legal.
    fn apply_move(&mut self, mv: &Move) -> bool;

    /// Takes back the most recent move. No-op when nothing has been played.
    fn undo_last_move(&mut self);

    fn side_to_move(&self) -> Side;

    fn is_game_over(&self) -> bool;

    /// [`Self::is_game_over`] for a position whose legal moves are already known.
    fn is_game_over_with(&self, legal_moves: &[Move]) -> bool {
        legal_moves.is_empty() || self.is_game_over()
    }

    fn piece_at(&self, sq: Square) -> Option<Piece>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Side },
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "draw by stalemate"),
            GameStatus::FiftyMoveRule => write!(f, "draw by fifty-move rule"),
            GameStatus::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UndoRecord {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
    halfmove_clock: u32,
}

/// A chess position with its move history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChessGame {
    board: Board,
    side_to_move: Side,
    halfmove_clock: u32,
    history: Vec<UndoRecord>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// Standard initial position, White to move.
    pub fn new() -> Self {
        Self::from_board(start_board(), Side::White)
    }

    pub fn from_board(board: Board, side_to_move: Side) -> Self {
        ChessGame {
            board,
            side_to_move,
            halfmove_clock: 0,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let (board, side) = parse_fen(fen)?;
        Ok(Self::from_board(board, side))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|rec| &rec.mv)
    }

    pub fn moves_played(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|rec| &rec.mv)
    }

    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        is_in_check(&self.board, side)
    }

    /// Plays a move given in coordinates (`e2e4`, `e7e8q`). Test and CLI helper.
    pub fn play_coords(&mut self, coords: &str) -> anyhow::Result<Move> {
        let from = coords
            .get(0..2)
            .and_then(Square::parse)
            .ok_or_else(|| anyhow::anyhow!("bad origin in '{coords}'"))?;
        let to = coords
            .get(2..4)
            .and_then(Square::parse)
            .ok_or_else(|| anyhow::anyhow!("bad target in '{coords}'"))?;
        let promotion = coords.chars().nth(4).and_then(PieceKind::from_letter);
        let mv = self
            .legal_moves_from(from)
            .into_iter()
            .find(|mv| {
                mv.to == to
                    && (mv.promotion == promotion
                        || (promotion.is_none() && mv.promotion == Some(PieceKind::Queen)))
            })
            .ok_or_else(|| anyhow::anyhow!("illegal move '{coords}'"))?;
        self.apply_move(&mv);
        Ok(mv)
    }

    pub fn status(&self) -> GameStatus {
        self.status_with(&self.legal_moves())
    }

    fn status_with(&self, legal_moves: &[Move]) -> GameStatus {
        if legal_moves.is_empty() {
            return if self.is_in_check(self.side_to_move) {
                GameStatus::Checkmate {
                    winner: self.side_to_move.opponent(),
                }
            } else {
                GameStatus::Stalemate
            };
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::FiftyMoveRule;
        }
        if insufficient_material(&self.board) {
            return GameStatus::InsufficientMaterial;
        }
        GameStatus::Ongoing
    }
}

impl RulesEngine for ChessGame {
    fn legal_moves(&self) -> Vec<Move> {
        let side = self.side_to_move;
        let pseudo = self
            .board
            .pieces()
            .filter(|(_, p)| p.side == side)
            .flat_map(|(sq, p)| piece_moves(&self.board, sq, p));
        filter_legal(&self.board, side, pseudo)
    }

    fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        match self.board.get_piece(from) {
            Some(p) if p.side == self.side_to_move => {
                filter_legal(&self.board, p.side, piece_moves(&self.board, from, p))
            }
            _ => Vec::new(),
        }
    }

    fn apply_move(&mut self, mv: &Move) -> bool {
        if !self.legal_moves_from(mv.from).contains(mv) {
            return false;
        }
        let Some((moved, captured)) = make_on_board(&mut self.board, mv) else {
            return false;
        };
        self.history.push(UndoRecord {
            mv: mv.clone(),
            moved,
            captured,
            halfmove_clock: self.halfmove_clock,
        });
        if moved.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.side_to_move = self.side_to_move.opponent();
        true
    }

    fn undo_last_move(&mut self) {
        let Some(rec) = self.history.pop() else {
            return;
        };
        self.board.remove_piece(rec.mv.to);
        if let Some(captured) = rec.captured {
            self.board.place_piece(rec.mv.to, captured);
        }
        self.board.place_piece(rec.mv.from, rec.moved);
        self.halfmove_clock = rec.halfmove_clock;
        self.side_to_move = self.side_to_move.opponent();
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    fn is_game_over_with(&self, legal_moves: &[Move]) -> bool {
        self.status_with(legal_moves).is_over()
    }

    fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get_piece(sq)
    }
}

fn filter_legal(board: &Board, side: Side, pseudo: impl IntoIterator<Item = Move>) -> Vec<Move> {
    pseudo
        .into_iter()
        .filter(|mv| {
            let mut next = *board;
            make_on_board(&mut next, mv).is_some() && !is_in_check(&next, side)
        })
        .collect()
}

/// Moves the piece on the board only (no side/clock bookkeeping).
/// Returns the piece that moved (before promotion) and what it captured,
/// or `None` if the origin square is empty.
fn make_on_board(board: &mut Board, mv: &Move) -> Option<(Piece, Option<Piece>)> {
    let moved = board.remove_piece(mv.from)?;
    let captured = board.remove_piece(mv.to);
    let placed = match mv.promotion {
        Some(kind) => Piece::new(kind, moved.side),
        None => moved,
    };
    board.place_piece(mv.to, placed);
    Some((moved, captured))
}

/// Pseudo-legal moves of one piece (may leave the own king attacked).
fn piece_moves(board: &Board, from: Square, piece: Piece) -> Vec<Move> {
    if piece.kind == PieceKind::Pawn {
        return pawn_moves(board, from, piece);
    }

    let mut moves = Vec::new();
    for step in piece.kind.movement_rules() {
        match *step {
            MoveStep::Step(d_row, d_col) => {
                if let Some(to) = from.offset(d_row, d_col) {
                    match board.get_piece(to) {
                        Some(target) if target.side == piece.side => {}
                        target => moves.push(Move::new(
                            piece.kind,
                            from,
                            to,
                            None,
                            target.map(|t| t.kind),
                        )),
                    }
                }
            }
            MoveStep::Slide(d_row, d_col) => {
                let mut curr = from;
                while let Some(to) = curr.offset(d_row, d_col) {
                    match board.get_piece(to) {
                        Some(target) => {
                            if target.side != piece.side {
                                moves.push(Move::new(piece.kind, from, to, None, Some(target.kind)));
                            }
                            break;
                        }
                        None => {
                            moves.push(Move::new(piece.kind, from, to, None, None));
                            curr = to;
                        }
                    }
                }
            }
        }
    }
    moves
}

fn pawn_moves(board: &Board, from: Square, piece: Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    let forward = piece.side.forward();
    let (start_row, promo_row) = match piece.side {
        Side::White => (6, 0),
        Side::Black => (1, 7),
    };

    let mut push = |to: Square, captured: Option<PieceKind>| {
        if to.row == promo_row {
            for kind in PieceKind::PROMOTIONS {
                moves.push(Move::new(PieceKind::Pawn, from, to, Some(kind), captured));
            }
        } else {
            moves.push(Move::new(PieceKind::Pawn, from, to, None, captured));
        }
    };

    if let Some(to) = from.offset(forward, 0) {
        if board.get_piece(to).is_none() {
            push(to, None);
            if from.row == start_row {
                if let Some(to2) = from.offset(forward * 2, 0) {
                    if board.get_piece(to2).is_none() {
                        push(to2, None);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        if let Some(to) = from.offset(forward, d_col) {
            if let Some(target) = board.get_piece(to) {
                if target.side != piece.side {
                    push(to, Some(target.kind));
                }
            }
        }
    }
    moves
}

/// True if `side`'s king is attacked. A board without that king is never in check.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    match board.find_king(side) {
        Some(king) => is_attacked(board, king, side.opponent()),
        None => false,
    }
}

pub fn is_attacked(board: &Board, target: Square, by: Side) -> bool {
    board
        .pieces()
        .filter(|(_, p)| p.side == by)
        .any(|(from, p)| attacks(board, from, p, target))
}

fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if piece.kind == PieceKind::Pawn {
        let forward = piece.side.forward();
        return [-1, 1]
            .into_iter()
            .any(|d_col| from.offset(forward, d_col) == Some(target));
    }

    piece.kind.movement_rules().iter().any(|step| match *step {
        MoveStep::Step(d_row, d_col) => from.offset(d_row, d_col) == Some(target),
        MoveStep::Slide(d_row, d_col) => {
            let mut curr = from;
            while let Some(next) = curr.offset(d_row, d_col) {
                if next == target {
                    return true;
                }
                if board.get_piece(next).is_some() {
                    return false;
                }
                curr = next;
            }
            false
        }
    })
}

/// Bare kings, or king and one minor piece against a bare king.
fn insufficient_material(board: &Board) -> bool {
    let others: Vec<PieceKind> = board
        .pieces()
        .map(|(_, p)| p.kind)
        .filter(|k| *k != PieceKind::King)
        .collect();
    match others.as_slice() {
        [] => true,
        [PieceKind::Knight] | [PieceKind::Bishop] => true,
        _ => false,
    }
}
