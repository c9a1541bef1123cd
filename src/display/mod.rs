use crate::core::{Board, Move, Side, Square};
use crate::logic::{ChessGame, RulesEngine};
use crossterm::{cursor, queue, style::Stylize, terminal};
use std::io::{self, stdout, Write};

#[derive(Default)]
pub struct DisplayState {
    pub status_msg: Option<String>,
    pub last_move: Option<Move>,
    /// Suggested move, drawn in green.
    pub hint: Option<Move>,
    /// Extra squares to mark, e.g. destinations of a selected piece.
    pub highlights: Vec<Square>,
}

impl DisplayState {
    /// State for showing `game` as it stands: last move marked, side to move in the status line.
    pub fn for_game(game: &ChessGame) -> Self {
        let status = game.status();
        let status_msg = if status.is_over() {
            status.to_string()
        } else if game.is_in_check(game.side_to_move()) {
            format!("{} to move (CHECK)", game.side_to_move())
        } else {
            format!("{} to move", game.side_to_move())
        };
        DisplayState {
            status_msg: Some(status_msg),
            last_move: game.last_move().cloned(),
            ..Default::default()
        }
    }
}

fn touches(mv: &Option<Move>, sq: Square) -> bool {
    mv.as_ref().is_some_and(|m| m.from == sq || m.to == sq)
}

/// Clears the terminal and draws the board on stdout.
pub fn render_board(board: &Board, state: &DisplayState) -> io::Result<()> {
    render_to(&mut stdout(), board, state)
}

/// Clears the screen behind `out` and draws the board.
pub fn render_to(out: &mut impl Write, board: &Board, state: &DisplayState) -> io::Result<()> {
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    write_board(out, board, state)?;
    out.flush()
}

/// Draws the board (White at the bottom) without touching the cursor.
pub fn write_board(out: &mut impl Write, board: &Board, state: &DisplayState) -> io::Result<()> {
    write!(out, "=== Stage Chess ===\r\n")?;
    match &state.status_msg {
        Some(msg) => write!(out, "{}\r\n", msg.clone().bold().yellow())?,
        None => write!(out, "\r\n")?,
    }
    write!(out, "\r\n")?;

    write!(out, "   +{}+\r\n", "---".repeat(Board::SIZE))?;
    for row in 0..Board::SIZE {
        write!(out, "{:2} |", Board::SIZE - row)?;
        for col in 0..Board::SIZE {
            let sq = Square::new(row, col);
            let piece = board.get_piece(sq);
            let ch = piece.map_or('.', |p| p.display_char());

            let is_hint = touches(&state.hint, sq);
            let is_highlight = state.highlights.contains(&sq);
            let is_last = touches(&state.last_move, sq);

            let (prefix, suffix) = if is_hint {
                ('(', ')')
            } else if is_highlight {
                ('<', '>')
            } else if is_last {
                ('{', '}')
            } else {
                (' ', ' ')
            };
            let cell = format!("{prefix}{ch}{suffix}");

            if is_hint || is_highlight {
                write!(out, "{}", cell.green())?;
            } else if is_last {
                write!(out, "{}", cell.red())?;
            } else if let Some(p) = piece {
                match p.side {
                    Side::White => write!(out, "{}", cell.cyan())?,
                    Side::Black => write!(out, "{}", cell.magenta())?,
                }
            } else {
                write!(out, "{cell}")?;
            }
        }
        write!(out, "|\r\n")?;
    }
    write!(out, "   +{}+\r\n", "---".repeat(Board::SIZE))?;

    write!(out, "    ")?;
    for file in 'a'..='h' {
        write!(out, " {file} ")?;
    }
    write!(out, "\r\n")?;

    if let Some(mv) = &state.last_move {
        write!(out, "Last move: {mv}\r\n")?;
    }
    if let Some(mv) = &state.hint {
        write!(out, "Hint: {}\r\n", mv.notation.as_str().green())?;
    }
    Ok(())
}
