//! Stage-vs-stage ladder matches.
//!
//! Every game gets its own position and its own RNG seeded with
//! `seed + game index`, so a ladder run is reproducible no matter how rayon
//! schedules the games.

use crate::core::Side;
use crate::game::Game;
use crate::logic::{ChessGame, GameStatus};
use crate::player::ai::{MoveSelector, StageCatalog};
use crate::player::StageAI;
use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub struct LadderConfig {
    pub white_level: u32,
    pub black_level: u32,
    pub num_games: usize,
    pub seed: u64,
    pub max_plies: usize,
    pub catalog: Arc<StageCatalog>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        LadderConfig {
            white_level: 1,
            black_level: 15,
            num_games: 10,
            seed: 0,
            max_plies: 200,
            catalog: StageCatalog::standard(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub index: usize,
    pub winner: Option<Side>,
    pub status: GameStatus,
    pub plies: usize,
    pub time_ms: u128,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LadderStats {
    pub white_level: u32,
    pub black_level: u32,
    pub total_games: usize,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub avg_plies: f64,
    pub avg_time_ms: f64,
    pub games: Vec<GameResult>,
}

impl LadderStats {
    pub fn new(white_level: u32, black_level: u32) -> Self {
        LadderStats {
            white_level,
            black_level,
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: GameResult) {
        self.total_games += 1;
        match result.winner {
            Some(Side::White) => self.white_wins += 1,
            Some(Side::Black) => self.black_wins += 1,
            None => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let total_plies: usize = self.games.iter().map(|g| g.plies).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        self.avg_plies = total_plies as f64 / self.games.len() as f64;
        self.avg_time_ms = total_time as f64 / self.games.len() as f64;
    }

    /// Percentage of games won by `side`.
    pub fn win_rate(&self, side: Side) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        let wins = match side {
            Side::White => self.white_wins,
            Side::Black => self.black_wins,
        };
        wins as f64 / self.total_games as f64 * 100.0
    }
}

fn play_one(config: &LadderConfig, index: usize) -> GameResult {
    let start = Instant::now();
    let seed = config.seed.wrapping_add(index as u64);
    // Distinct streams for the two sides.
    let selector = |offset: u64| {
        MoveSelector::seeded(seed.wrapping_mul(2).wrapping_add(offset))
            .with_catalog(Arc::clone(&config.catalog))
    };
    let mut white = StageAI::with_selector(config.white_level, selector(0));
    let mut black = StageAI::with_selector(config.black_level, selector(1));

    let outcome = Game::new(ChessGame::new()).play(&mut white, &mut black, config.max_plies, |_, _| {});
    let time_ms = start.elapsed().as_millis();

    tracing::info!(
        game = index,
        winner = ?outcome.winner,
        status = %outcome.status,
        plies = outcome.plies,
        time_ms,
        "ladder game finished"
    );

    GameResult {
        index,
        winner: outcome.winner,
        status: outcome.status,
        plies: outcome.plies,
        time_ms,
        moves: outcome.moves,
    }
}

/// Plays `num_games` games between the two levels in parallel.
pub fn run_ladder(config: &LadderConfig) -> LadderStats {
    let results: Vec<GameResult> = (0..config.num_games)
        .into_par_iter()
        .map(|index| play_one(config, index))
        .collect();

    let mut stats = LadderStats::new(config.white_level, config.black_level);
    for result in results {
        stats.add_result(result);
    }
    stats
}

/// Writes `stats` as pretty JSON under `dir` and returns the file path.
pub fn save_stats(stats: &LadderStats, dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;

    let filename = dir.join(format!(
        "ladder_{}v{}_{}.json",
        stats.white_level,
        stats.black_level,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));

    let file = std::fs::File::create(&filename)
        .with_context(|| format!("creating {}", filename.display()))?;
    serde_json::to_writer_pretty(file, stats)?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_games: usize, seed: u64) -> LadderConfig {
        LadderConfig {
            white_level: 3,
            black_level: 4,
            num_games,
            seed,
            max_plies: 12,
            ..Default::default()
        }
    }

    #[test]
    fn test_stats_tally() {
        let mut stats = LadderStats::new(1, 2);
        for (index, winner, plies) in [(0, Some(Side::White), 10), (1, None, 20), (2, Some(Side::Black), 30)] {
            stats.add_result(GameResult {
                index,
                winner,
                status: GameStatus::Ongoing,
                plies,
                time_ms: 0,
                moves: Vec::new(),
            });
        }
        assert_eq!(stats.total_games, 3);
        assert_eq!((stats.white_wins, stats.black_wins, stats.draws), (1, 1, 1));
        assert!((stats.avg_plies - 20.0).abs() < 1e-9);
        assert!((stats.win_rate(Side::White) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ladder_is_reproducible() {
        let a = run_ladder(&config(4, 99));
        let b = run_ladder(&config(4, 99));
        assert_eq!(a.total_games, 4);
        let moves = |s: &LadderStats| s.games.iter().map(|g| g.moves.clone()).collect::<Vec<_>>();
        assert_eq!(moves(&a), moves(&b));
        for (i, game) in a.games.iter().enumerate() {
            assert_eq!(game.index, i);
            assert!(game.plies <= 12);
        }
    }

    #[test]
    fn test_save_stats_writes_json() {
        let stats = run_ladder(&config(1, 5));
        let dir = std::env::temp_dir().join(format!("ladder_test_{}", std::process::id()));
        let path = save_stats(&stats, &dir).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: LadderStats = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded.total_games, 1);
        assert_eq!(loaded.games, stats.games);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
