use crate::core::{Move, Square};
use crate::display::{render_to, DisplayState};
use crate::logic::{ChessGame, RulesEngine};
use crate::player::ai::MoveSelector;
use crate::player::PlayerController;
use std::io::{BufRead, Write};

const HELP: &str = "[e2e4]: Move | [e2]: Show moves | [hint] | [undo] | [q]: Resign";

enum Command {
    Move(String),
    Select(Square),
    Hint,
    Undo,
    Resign,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "hint" | "h" => Some(Command::Hint),
        "undo" | "u" => Some(Command::Undo),
        "q" | "quit" | "resign" => Some(Command::Resign),
        _ if line.len() == 2 => Square::parse(&line).map(Command::Select),
        _ if line.len() == 4 || line.len() == 5 => Some(Command::Move(line)),
        _ => None,
    }
}

/// A person at the terminal, typing coordinate moves.
///
/// Hints come from the stage being played. `undo` takes back the opponent's
/// reply and the player's own last move.
pub struct HumanPlayer<R, W> {
    pub name: String,
    input: R,
    output: W,
    hint_level: u32,
    hints: MoveSelector,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: &str, input: R, output: W, hint_level: u32, hints: MoveSelector) -> Self {
        HumanPlayer {
            name: name.to_string(),
            input,
            output,
            hint_level,
            hints,
        }
    }

    fn read_command(&mut self) -> Option<Option<Command>> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(parse_command(&line)),
        }
    }
}

impl<R: BufRead, W: Write> PlayerController for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, game: &mut ChessGame) -> Option<Move> {
        let mut state = DisplayState::for_game(game);

        loop {
            if let Err(err) = render_to(&mut self.output, game.board(), &state)
                .and_then(|_| write!(self.output, "{HELP}\r\n> "))
                .and_then(|_| self.output.flush())
            {
                tracing::warn!("cannot draw board: {err}");
                return None;
            }

            // End of input resigns.
            let command = self.read_command()?;
            let mut next = DisplayState::for_game(game);
            match command {
                Some(Command::Move(coords)) => {
                    let mut scratch = game.clone();
                    match scratch.play_coords(&coords) {
                        Ok(mv) => return Some(mv),
                        Err(err) => next.status_msg = Some(format!("{err}")),
                    }
                }
                Some(Command::Select(sq)) => {
                    next.highlights = game.legal_moves_from(sq).iter().map(|mv| mv.to).collect();
                    if next.highlights.is_empty() {
                        next.status_msg = Some(format!("no moves from {sq}"));
                    }
                }
                Some(Command::Hint) => {
                    next.hint = self.hints.hint(game, self.hint_level);
                    if next.hint.is_none() {
                        next.status_msg = Some("no legal moves".to_string());
                    }
                }
                Some(Command::Undo) => {
                    if game.ply_count() >= 2 {
                        game.undo_last_move();
                        game.undo_last_move();
                        next = DisplayState::for_game(game);
                    } else {
                        next.status_msg = Some("nothing to undo".to_string());
                    }
                }
                Some(Command::Resign) => return None,
                None => next.status_msg = Some(HELP.to_string()),
            }
            state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn human(script: &str) -> HumanPlayer<Cursor<Vec<u8>>, Vec<u8>> {
        HumanPlayer::new(
            "you",
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            6,
            MoveSelector::seeded(3),
        )
    }

    fn screen(player: &HumanPlayer<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&player.output).into_owned()
    }

    #[test]
    fn test_reads_coordinate_move() {
        let mut game = ChessGame::new();
        let mut player = human("g1f3\n");
        let mv = player.choose_move(&mut game).unwrap();
        assert_eq!(mv.notation, "Ng1-f3");
        // The game loop applies the move, not the player.
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn test_bad_input_asks_again() {
        let mut game = ChessGame::new();
        let mut player = human("xyz\ne2e5\ne2e4\n");
        let mv = player.choose_move(&mut game).unwrap();
        assert_eq!(mv.notation, "e2-e4");
        let text = screen(&player);
        assert!(text.contains("illegal move 'e2e5'"));
    }

    #[test]
    fn test_selecting_a_piece_highlights_its_moves() {
        let mut game = ChessGame::new();
        let mut player = human("b1\nq\n");
        assert!(player.choose_move(&mut game).is_none());
        // a3 and c3 are drawn as highlighted cells.
        let text = screen(&player);
        assert!(text.contains("<.>"), "{text}");
    }

    #[test]
    fn test_hint_shows_stage_move() {
        let mut game = ChessGame::from_fen("6k1/8/8/3b4/8/8/8/3R2K1 w").unwrap();
        let mut player = human("hint\n");
        // Input runs out after the hint: resignation.
        assert!(player.choose_move(&mut game).is_none());
        assert!(screen(&player).contains("Rd1xd5"));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn test_undo_takes_back_two_plies() {
        let mut game = ChessGame::new();
        game.play_coords("e2e4").unwrap();
        game.play_coords("e7e5").unwrap();
        let mut player = human("undo\nd2d4\n");
        let mv = player.choose_move(&mut game).unwrap();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(mv.notation, "d2-d4");
    }

    #[test]
    fn test_undo_at_start_is_refused() {
        let mut game = ChessGame::new();
        let mut player = human("undo\nq\n");
        assert!(player.choose_move(&mut game).is_none());
        assert!(screen(&player).contains("nothing to undo"));
    }
}
