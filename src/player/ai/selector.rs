use super::eval::{piece_val, Evaluator, MaterialPstEvaluator};
use super::search::{AppliedMove, SearchEngine};
use super::stage::{StageCatalog, StageConfig, Strategy};
use crate::core::Move;
use crate::logic::RulesEngine;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::sync::Arc;

/// Picks one move for a position at a given skill level.
///
/// Each call is self-contained: the only state carried between calls is the
/// random number generator. The position is restored before returning.
pub struct MoveSelector<G: Rng = StdRng> {
    catalog: Arc<StageCatalog>,
    evaluator: Box<dyn Evaluator>,
    rng: G,
}

impl MoveSelector<StdRng> {
    /// Built-in catalog, default evaluator, entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MoveSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Rng> MoveSelector<G> {
    pub fn with_rng(rng: G) -> Self {
        MoveSelector {
            catalog: StageCatalog::standard(),
            evaluator: Box::new(MaterialPstEvaluator),
            rng,
        }
    }

    /// Uses a custom catalog, e.g. one loaded from a file at startup.
    pub fn with_catalog(mut self, catalog: Arc<StageCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Chooses a move for the side to move at `level`. `None` means the
    /// position has no legal moves.
    pub fn select_move<R: RulesEngine>(&mut self, position: &mut R, level: u32) -> Option<Move> {
        let config = *self.catalog.lookup(level);
        tracing::debug!(level, ?config, "resolved stage");
        self.select_with_config(position, &config)
    }

    /// Suggests a move for the player; identical to [`Self::select_move`], and
    /// the move is never applied.
    pub fn hint<R: RulesEngine>(&mut self, position: &mut R, level: u32) -> Option<Move> {
        self.select_move(position, level)
    }

    pub fn select_with_config<R: RulesEngine>(
        &mut self,
        position: &mut R,
        config: &StageConfig,
    ) -> Option<Move> {
        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return None;
        }

        if self.rng.gen::<f64>() < config.randomness {
            let mv = moves.choose(&mut self.rng).cloned();
            tracing::debug!(mv = ?mv.as_ref().map(|m| m.notation.as_str()), "random move");
            return mv;
        }

        if config.strategy == Strategy::Greedy {
            // Stable: among equal captures the native order decides.
            moves.sort_by_key(|mv| Reverse(mv.captured.map_or(0, piece_val)));
            let mv = moves.into_iter().next();
            tracing::debug!(mv = ?mv.as_ref().map(|m| m.notation.as_str()), "greedy move");
            return mv;
        }

        moves.shuffle(&mut self.rng);
        self.search_root(position, moves, config.depth)
    }

    fn search_root<R: RulesEngine>(
        &mut self,
        position: &mut R,
        moves: Vec<Move>,
        depth: u32,
    ) -> Option<Move> {
        let sign = position.side_to_move().sign();
        let mut engine = SearchEngine::new(self.evaluator.as_ref());

        let mut best: Option<&Move> = None;
        let mut best_value = f64::NEG_INFINITY;
        for mv in &moves {
            let Some(mut applied) = AppliedMove::apply(&mut *position, mv) else {
                continue;
            };
            let value = -engine.search(
                &mut *applied,
                depth.saturating_sub(1),
                f64::NEG_INFINITY,
                f64::INFINITY,
                -sign,
            );
            drop(applied);

            tracing::trace!(mv = %mv, value, "root move");
            if value > best_value {
                best_value = value;
                best = Some(mv);
            }
        }

        let chosen = best.or(moves.first()).cloned();
        tracing::debug!(
            mv = ?chosen.as_ref().map(|m| m.notation.as_str()),
            value = best_value,
            nodes = engine.nodes(),
            evaluator = self.evaluator.name(),
            "search move"
        );
        chosen
    }
}
