//! Negamax search with alpha-beta pruning.
//!
//! Scores are from the perspective of the side the `sign` argument stands for:
//! the static evaluation (White-positive) is multiplied by `sign` at the leaves
//! and every ply negates its child's value and swaps the window.
//!
//! Positions without legal moves are scored statically like any other leaf;
//! there is no mate bonus and no mate-distance term.

use super::eval::Evaluator;
use crate::core::Move;
use crate::logic::RulesEngine;
use std::ops::{Deref, DerefMut};

/// A move applied to a position, undone when the guard is dropped.
///
/// Every exit path out of a search frame (including beta cutoffs) drops the
/// guard, so applies and undos always balance.
pub struct AppliedMove<'a, R: RulesEngine> {
    position: &'a mut R,
}

impl<'a, R: RulesEngine> AppliedMove<'a, R> {
    /// Applies `mv`; `None` (and nothing to undo) if the rules engine refuses it.
    pub fn apply(position: &'a mut R, mv: &Move) -> Option<Self> {
        if position.apply_move(mv) {
            Some(AppliedMove { position })
        } else {
            tracing::warn!(mv = %mv, "rules engine refused a generated move");
            None
        }
    }
}

impl<R: RulesEngine> Deref for AppliedMove<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.position
    }
}

impl<R: RulesEngine> DerefMut for AppliedMove<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.position
    }
}

impl<R: RulesEngine> Drop for AppliedMove<'_, R> {
    fn drop(&mut self) {
        self.position.undo_last_move();
    }
}

pub struct SearchEngine<'e> {
    evaluator: &'e dyn Evaluator,
    pruning: bool,
    nodes: u64,
}

impl<'e> SearchEngine<'e> {
    pub fn new(evaluator: &'e dyn Evaluator) -> Self {
        SearchEngine {
            evaluator,
            pruning: true,
            nodes: 0,
        }
    }

    /// Plain negamax: visits every node. Same values, more nodes.
    pub fn exhaustive(evaluator: &'e dyn Evaluator) -> Self {
        SearchEngine {
            pruning: false,
            ..Self::new(evaluator)
        }
    }

    /// Nodes visited since construction.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn leaf<R: RulesEngine>(&self, position: &R, sign: f64) -> f64 {
        self.evaluator.evaluate(position) * sign
    }

    pub fn search<R: RulesEngine>(
        &mut self,
        position: &mut R,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        sign: f64,
    ) -> f64 {
        self.nodes += 1;

        if depth == 0 {
            return self.leaf(position, sign);
        }

        // One move generation per node: it answers game-over as well.
        let moves = position.legal_moves();
        if position.is_game_over_with(&moves) {
            return self.leaf(position, sign);
        }

        let mut max = f64::NEG_INFINITY;
        for mv in &moves {
            let Some(mut applied) = AppliedMove::apply(&mut *position, mv) else {
                continue;
            };
            let value = -self.search(&mut *applied, depth - 1, -beta, -alpha, -sign);
            drop(applied);

            if value > max {
                max = value;
            }
            if value > alpha {
                alpha = value;
            }
            if self.pruning && alpha >= beta {
                break; // beta cutoff
            }
        }
        max
    }
}
