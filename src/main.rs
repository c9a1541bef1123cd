use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use stage_chess_ai::core::Side;
use stage_chess_ai::display::{render_board, write_board, DisplayState};
use stage_chess_ai::game::{Game, GameOutcome};
use stage_chess_ai::logic::ChessGame;
use stage_chess_ai::player::ai::stage::MAX_OFFERED_LEVEL;
use stage_chess_ai::player::ai::{MoveSelector, StageCatalog, StageProgress};
use stage_chess_ai::player::{HumanPlayer, PlayerController, StageAI};
use stage_chess_ai::selfplay::{run_ladder, save_stats, LadderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Stage-based chess opponent and hint engine")]
struct Cli {
    /// JSON stage table replacing the built-in one
    #[arg(long, global = true)]
    stages: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch two stage levels play each other, or play one yourself
    Play {
        #[arg(long, default_value_t = 1)]
        white: u32,
        #[arg(long, default_value_t = 6)]
        black: u32,
        /// Pause between moves so the game can be followed
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
        #[arg(long, default_value_t = 300)]
        max_plies: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Take this side yourself; the other side's level is the stage
        #[arg(long, value_enum)]
        human: Option<HumanSide>,
        /// Stages already completed, for unlocking
        #[arg(long, default_value_t = 0)]
        completed: u32,
    },
    /// Suggest a move for a position
    Hint {
        #[arg(long, default_value_t = 6)]
        level: u32,
        /// Placement and side to move, e.g. "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"
        #[arg(long)]
        fen: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play a series of games between two levels and summarize them
    Ladder {
        #[arg(long, default_value_t = 1)]
        white: u32,
        #[arg(long, default_value_t = 15)]
        black: u32,
        #[arg(long, default_value_t = 10)]
        games: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        /// Directory to write the JSON summary into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the stage table and which levels are unlocked
    Stages {
        #[arg(long, default_value_t = 0)]
        completed: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HumanSide {
    White,
    Black,
}

impl From<HumanSide> for Side {
    fn from(side: HumanSide) -> Side {
        match side {
            HumanSide::White => Side::White,
            HumanSide::Black => Side::Black,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.stages {
        Some(path) => Arc::new(
            StageCatalog::load(path).with_context(|| format!("loading {}", path.display()))?,
        ),
        None => StageCatalog::standard(),
    };

    match cli.command {
        Command::Play {
            white,
            black,
            delay_ms,
            max_plies,
            seed,
            human: None,
            ..
        } => run_play(&catalog, white, black, delay_ms, max_plies, seed),
        Command::Play {
            white,
            black,
            delay_ms,
            max_plies,
            seed,
            human: Some(side),
            completed,
        } => {
            let side = Side::from(side);
            let stage = match side {
                Side::White => black,
                Side::Black => white,
            };
            let settings = HumanGame {
                side,
                stage,
                completed,
                delay_ms,
                max_plies,
                seed,
            };
            run_human(&catalog, &settings)
        }
        Command::Hint { level, fen, seed } => run_hint(&catalog, level, fen.as_deref(), seed),
        Command::Ladder {
            white,
            black,
            games,
            seed,
            max_plies,
            out,
        } => {
            let config = LadderConfig {
                white_level: white,
                black_level: black,
                num_games: games,
                seed,
                max_plies,
                catalog,
            };
            run_ladder_cmd(&config, out)
        }
        Command::Stages { completed } => {
            list_stages(&catalog, completed);
            Ok(())
        }
    }
}

fn selector(catalog: &Arc<StageCatalog>, seed: Option<u64>) -> MoveSelector {
    match seed {
        Some(seed) => MoveSelector::seeded(seed),
        None => MoveSelector::new(),
    }
    .with_catalog(Arc::clone(catalog))
}

/// Redraws the board after each move, pausing first so moves can be followed.
fn paced_play(
    game: &mut Game,
    white: &mut dyn PlayerController,
    black: &mut dyn PlayerController,
    delay_ms: u64,
    max_plies: usize,
) -> anyhow::Result<GameOutcome> {
    render_board(game.position.board(), &DisplayState::for_game(&game.position))?;

    let mut render_error = None;
    let outcome = game.play(white, black, max_plies, |position, _| {
        if render_error.is_some() {
            return;
        }
        std::thread::sleep(Duration::from_millis(delay_ms));
        if let Err(err) = render_board(position.board(), &DisplayState::for_game(position)) {
            render_error = Some(err);
        }
    });
    if let Some(err) = render_error {
        return Err(err).context("drawing the board");
    }
    Ok(outcome)
}

fn describe(outcome: &GameOutcome) -> String {
    match outcome.winner {
        Some(side) if !outcome.status.is_over() => format!("{side} wins by resignation"),
        _ if outcome.ply_limit_reached => format!("draw after {} plies (limit)", outcome.plies),
        _ => outcome.status.to_string(),
    }
}

fn run_play(
    catalog: &Arc<StageCatalog>,
    white: u32,
    black: u32,
    delay_ms: u64,
    max_plies: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut white_ai = StageAI::with_selector(white, selector(catalog, seed));
    let mut black_ai = StageAI::with_selector(black, selector(catalog, seed.map(|s| s ^ 1)));

    let mut game = Game::default();
    let outcome = paced_play(&mut game, &mut white_ai, &mut black_ai, delay_ms, max_plies)?;
    print!(
        "\r\n{} vs {}: {}\r\n",
        white_ai.name,
        black_ai.name,
        describe(&outcome)
    );
    Ok(())
}

struct HumanGame {
    side: Side,
    stage: u32,
    completed: u32,
    delay_ms: u64,
    max_plies: usize,
    seed: Option<u64>,
}

fn run_human(catalog: &Arc<StageCatalog>, settings: &HumanGame) -> anyhow::Result<()> {
    let mut progress = StageProgress::new(settings.completed);
    anyhow::ensure!(
        (1..=MAX_OFFERED_LEVEL).contains(&settings.stage),
        "stage {} is not offered (1-{MAX_OFFERED_LEVEL})",
        settings.stage
    );
    anyhow::ensure!(
        progress.is_unlocked(settings.stage),
        "stage {} is locked; complete stage {} first",
        settings.stage,
        settings.stage - 1
    );

    let mut ai = StageAI::with_selector(settings.stage, selector(catalog, settings.seed));
    let stdin = std::io::stdin();
    let mut human = HumanPlayer::new(
        "You",
        stdin.lock(),
        std::io::stdout(),
        ai.level(),
        selector(catalog, settings.seed.map(|s| s ^ 1)),
    );

    let mut game = Game::default();
    let outcome = match settings.side {
        Side::White => paced_play(&mut game, &mut human, &mut ai, settings.delay_ms, settings.max_plies)?,
        Side::Black => paced_play(&mut game, &mut ai, &mut human, settings.delay_ms, settings.max_plies)?,
    };
    print!("\r\n{} vs {}: {}\r\n", human.name, ai.name, describe(&outcome));

    if outcome.winner == Some(settings.side) {
        progress.record_completion(ai.level());
        let unlocked: Vec<String> = progress.unlocked_levels().map(|l| l.to_string()).collect();
        print!("Stage {} cleared! Unlocked: {}\r\n", ai.level(), unlocked.join(", "));
    }
    Ok(())
}

fn run_hint(
    catalog: &Arc<StageCatalog>,
    level: u32,
    fen: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut game = match fen {
        Some(fen) => ChessGame::from_fen(fen)?,
        None => ChessGame::new(),
    };

    let hint = selector(catalog, seed).hint(&mut game, level);
    let state = DisplayState {
        hint: hint.clone(),
        ..DisplayState::for_game(&game)
    };
    write_board(&mut std::io::stdout(), game.board(), &state)?;

    match hint {
        Some(mv) => println!("{mv}"),
        None => println!("no legal moves ({})", game.status()),
    }
    Ok(())
}

fn run_ladder_cmd(config: &LadderConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    let stats = run_ladder(config);

    println!("=== Ladder: level {} vs level {} ===", stats.white_level, stats.black_level);
    println!("Games:      {}", stats.total_games);
    println!(
        "White wins: {} ({:.1}%)",
        stats.white_wins,
        stats.win_rate(stage_chess_ai::core::Side::White)
    );
    println!(
        "Black wins: {} ({:.1}%)",
        stats.black_wins,
        stats.win_rate(stage_chess_ai::core::Side::Black)
    );
    println!("Draws:      {}", stats.draws);
    println!("Avg plies:  {:.1}", stats.avg_plies);
    println!("Avg time:   {:.1}s", stats.avg_time_ms / 1000.0);

    if let Some(dir) = out {
        let path = save_stats(&stats, dir)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn list_stages(catalog: &StageCatalog, completed: u32) {
    let progress = StageProgress::new(completed);
    for level in 1..=MAX_OFFERED_LEVEL {
        let config = catalog.lookup(level);
        let lock = if progress.is_unlocked(level) { " " } else { "x" };
        let inherited = if catalog.get(level).is_none() {
            format!(" (plays as level {})", catalog.max_level())
        } else {
            String::new()
        };
        println!(
            "[{lock}] {level:2}: depth {}, randomness {:.1}, {:?}/{:?}{inherited}",
            config.depth, config.randomness, config.strategy, config.eval_profile
        );
    }
}
