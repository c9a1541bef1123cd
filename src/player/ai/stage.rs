//! Difficulty tiers.
//!
//! A [`StageCatalog`] maps a skill level to a [`StageConfig`]. Lookups are exact
//! against a sparse table; the level is clamped to the highest defined key and
//! anything without an entry resolves to that strongest tier. With the built-in
//! table this means levels 11-14, 0 and everything above 15 all play as level 15.

use anyhow::{bail, ensure, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Move-selection override applied before search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    None,
    /// Take the most valuable capture available, no search.
    Greedy,
}

/// Evaluation flavour requested by a tier. Carried but not consulted: every
/// tier is scored by the same evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvalProfile {
    #[default]
    Default,
    Positional,
    Mixed,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Search depth in plies, at least 1.
    pub depth: u32,
    /// Probability in [0, 1] of playing a uniformly random move.
    pub randomness: f64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub eval_profile: EvalProfile,
}

impl StageConfig {
    pub const fn new(depth: u32, randomness: f64) -> Self {
        StageConfig {
            depth,
            randomness,
            strategy: Strategy::None,
            eval_profile: EvalProfile::Default,
        }
    }

    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub const fn with_profile(mut self, eval_profile: EvalProfile) -> Self {
        self.eval_profile = eval_profile;
        self
    }
}

/// Highest level offered to players.
pub const MAX_OFFERED_LEVEL: u32 = 15;

const LEVEL_15: StageConfig = StageConfig::new(4, 0.0);

static STANDARD: Lazy<Arc<StageCatalog>> = Lazy::new(|| Arc::new(StageCatalog::builtin()));

/// Immutable level -> config table. Always holds at least one entry; the
/// highest one is the strongest tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<u32, StageConfig>",
    into = "BTreeMap<u32, StageConfig>"
)]
pub struct StageCatalog {
    stages: BTreeMap<u32, StageConfig>,
    max_level: u32,
    strongest: StageConfig,
}

impl StageCatalog {
    /// The built-in ladder, shared process-wide.
    pub fn standard() -> Arc<StageCatalog> {
        Arc::clone(&STANDARD)
    }

    fn builtin() -> Self {
        let stages = BTreeMap::from([
            (1, StageConfig::new(1, 1.0)),
            (2, StageConfig::new(1, 0.5)),
            (3, StageConfig::new(1, 0.2)),
            (4, StageConfig::new(1, 0.0).with_strategy(Strategy::Greedy)),
            (5, StageConfig::new(2, 0.1)),
            (6, StageConfig::new(2, 0.0)),
            (7, StageConfig::new(2, 0.0).with_profile(EvalProfile::Positional)),
            (8, StageConfig::new(3, 0.0)),
            (9, StageConfig::new(3, 0.0).with_profile(EvalProfile::Mixed)),
            (10, StageConfig::new(3, 0.0).with_profile(EvalProfile::Strong)),
            (MAX_OFFERED_LEVEL, LEVEL_15),
        ]);
        StageCatalog {
            stages,
            max_level: MAX_OFFERED_LEVEL,
            strongest: LEVEL_15,
        }
    }

    /// Builds a catalog from explicit entries, validating every config.
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, StageConfig)>) -> Result<Self> {
        let stages: BTreeMap<u32, StageConfig> = entries.into_iter().collect();
        let Some((&max_level, &strongest)) = stages.last_key_value() else {
            bail!("stage catalog is empty");
        };
        for (level, config) in &stages {
            ensure!(config.depth >= 1, "level {level}: depth must be at least 1");
            ensure!(
                (0.0..=1.0).contains(&config.randomness),
                "level {level}: randomness {} outside [0, 1]",
                config.randomness
            );
        }
        Ok(StageCatalog {
            stages,
            max_level,
            strongest,
        })
    }

    /// Parses a JSON object keyed by level, e.g. `{"1": {"depth": 1, "randomness": 1.0}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid stage catalog")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading stage catalog {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!("using built-in stage catalog: {err:#}");
            Self::builtin()
        })
    }

    /// Highest defined level (the strongest tier).
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Resolves `level` to its config, falling back to the strongest tier.
    pub fn lookup(&self, level: u32) -> &StageConfig {
        self.stages
            .get(&level.min(self.max_level))
            .unwrap_or(&self.strongest)
    }

    pub fn get(&self, level: u32) -> Option<&StageConfig> {
        self.stages.get(&level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &StageConfig)> {
        self.stages.iter().map(|(level, config)| (*level, config))
    }
}

impl TryFrom<BTreeMap<u32, StageConfig>> for StageCatalog {
    type Error = anyhow::Error;

    fn try_from(stages: BTreeMap<u32, StageConfig>) -> Result<Self> {
        Self::from_entries(stages)
    }
}

impl From<StageCatalog> for BTreeMap<u32, StageConfig> {
    fn from(catalog: StageCatalog) -> Self {
        catalog.stages
    }
}

/// Which levels a player may pick. Level `l` is open once `l - 1` is completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub completed: u32,
}

impl StageProgress {
    pub fn new(completed: u32) -> Self {
        StageProgress { completed }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level <= self.completed.saturating_add(1)
    }

    /// Records a won level. Progress never goes backwards.
    pub fn record_completion(&mut self, level: u32) {
        self.completed = self.completed.max(level);
    }

    pub fn unlocked_levels(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=MAX_OFFERED_LEVEL).filter(move |l| self.is_unlocked(*l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_levels_resolve_to_strongest() {
        let catalog = StageCatalog::standard();
        let strongest = *catalog.lookup(15);
        assert_eq!(strongest.depth, 4);
        for level in [0, 11, 12, 13, 14, 16, 20, 1000, u32::MAX] {
            assert_eq!(*catalog.lookup(level), strongest, "level {level}");
        }
    }

    #[test]
    fn test_defined_levels_match_ladder() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.lookup(1).randomness, 1.0);
        assert_eq!(catalog.lookup(3).randomness, 0.2);
        assert_eq!(catalog.lookup(4).strategy, Strategy::Greedy);
        assert_eq!(catalog.lookup(5).strategy, Strategy::None);
        assert_eq!(catalog.lookup(5).depth, 2);
        assert_eq!(catalog.lookup(7).eval_profile, EvalProfile::Positional);
        assert_eq!(catalog.lookup(10).depth, 3);
        assert_eq!(catalog.iter().count(), 11);
        for (_, config) in catalog.iter() {
            assert!(config.depth >= 1);
            assert!((0.0..=1.0).contains(&config.randomness));
        }
    }

    #[test]
    fn test_from_json() {
        let catalog = StageCatalog::from_json_str(
            r#"{"1": {"depth": 1, "randomness": 0.5},
                "3": {"depth": 2, "randomness": 0.0, "strategy": "Greedy"}}"#,
        )
        .unwrap();
        assert_eq!(catalog.max_level(), 3);
        assert_eq!(catalog.lookup(3).strategy, Strategy::Greedy);
        // 2 is undefined and resolves to the strongest (3).
        assert_eq!(catalog.lookup(2), catalog.lookup(3));
        assert_eq!(catalog.lookup(1).eval_profile, EvalProfile::Default);
    }

    #[test]
    fn test_from_json_validates() {
        assert!(StageCatalog::from_json_str("{}").is_err());
        assert!(StageCatalog::from_json_str(r#"{"1": {"depth": 0, "randomness": 0.0}}"#).is_err());
        assert!(StageCatalog::from_json_str(r#"{"1": {"depth": 1, "randomness": 1.5}}"#).is_err());
        assert!(StageCatalog::from_json_str("not json").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<StageCatalog>("{}").is_err());
        assert!(
            serde_json::from_str::<StageCatalog>(r#"{"1":{"depth":0,"randomness":7.5}}"#).is_err()
        );

        let catalog: StageCatalog =
            serde_json::from_str(r#"{"2":{"depth":2,"randomness":0.0}}"#).unwrap();
        assert_eq!(catalog.max_level(), 2);
        assert_eq!(catalog.lookup(0).depth, 2);
    }

    #[test]
    fn test_serialized_form_is_a_level_map() {
        let json = serde_json::to_string(&*StageCatalog::standard()).unwrap();
        assert!(json.starts_with(r#"{"1":{"depth":1,"randomness":1.0"#), "{json}");
        let back = StageCatalog::from_json_str(&json).unwrap();
        assert_eq!(back, *StageCatalog::standard());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let catalog = StageCatalog::load_or_default("does/not/exist.json");
        assert_eq!(catalog, *StageCatalog::standard());
    }

    #[test]
    fn test_progress_unlocks() {
        let mut progress = StageProgress::default();
        assert!(progress.is_unlocked(1));
        assert!(!progress.is_unlocked(2));

        progress.record_completion(3);
        assert_eq!(progress.unlocked_levels().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        progress.record_completion(1);
        assert_eq!(progress.completed, 3);
    }
}
