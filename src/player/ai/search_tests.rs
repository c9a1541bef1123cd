#[cfg(test)]
mod tests {
    use crate::core::{Move, Piece, Side, Square};
    use crate::logic::{ChessGame, RulesEngine};
    use crate::player::ai::eval::{Evaluator, MaterialPstEvaluator};
    use crate::player::ai::search::SearchEngine;
    use crate::player::ai::selector::MoveSelector;
    use crate::player::ai::stage::StageConfig;
    use std::cell::Cell;

    const INF: f64 = f64::INFINITY;

    // (position, deepest depth that is cheap enough to search exhaustively)
    const POSITIONS: [(&str, u32); 4] = [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w", 3),
        ("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b", 3),
        ("r3k2r/ppp2ppp/2n5/3q4/3P4/2N5/PPP2PPP/R2QK2R w", 2),
        ("6k1/5ppp/8/8/8/8/5PPP/R5K1 w", 4),
    ];

    fn root_search(engine: &mut SearchEngine, game: &mut ChessGame, depth: u32) -> f64 {
        let sign = game.side_to_move().sign();
        engine.search(game, depth, -INF, INF, sign)
    }

    #[test]
    fn test_pruning_does_not_change_value() {
        let evaluator = MaterialPstEvaluator;
        for (fen, max_depth) in POSITIONS {
            for depth in 1..=max_depth {
                let mut game = ChessGame::from_fen(fen).unwrap();

                let mut pruned = SearchEngine::new(&evaluator);
                let mut full = SearchEngine::exhaustive(&evaluator);
                let a = root_search(&mut pruned, &mut game, depth);
                let b = root_search(&mut full, &mut game, depth);

                assert_eq!(a, b, "{fen} at depth {depth}");
                assert!(pruned.nodes() <= full.nodes());
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let evaluator = MaterialPstEvaluator;
        let mut game = ChessGame::new();
        let mut pruned = SearchEngine::new(&evaluator);
        let mut full = SearchEngine::exhaustive(&evaluator);
        root_search(&mut pruned, &mut game, 3);
        root_search(&mut full, &mut game, 3);
        assert!(pruned.nodes() < full.nodes(), "{} vs {}", pruned.nodes(), full.nodes());
    }

    #[test]
    fn test_depth_zero_is_signed_static_eval() {
        let evaluator = MaterialPstEvaluator;
        let mut game = ChessGame::from_fen("4k3/8/8/8/3N4/8/8/4K3 b").unwrap();
        let stat = evaluator.evaluate(&game);
        let mut engine = SearchEngine::new(&evaluator);
        assert_eq!(engine.search(&mut game, 0, -INF, INF, 1.0), stat);
        assert_eq!(engine.search(&mut game, 0, -INF, INF, -1.0), -stat);
        assert_eq!(engine.nodes(), 2);
    }

    #[test]
    fn test_search_restores_position() {
        let evaluator = MaterialPstEvaluator;
        for (fen, max_depth) in POSITIONS {
            let mut game = ChessGame::from_fen(fen).unwrap();
            let before = serde_json::to_string(&game).unwrap();
            for depth in 1..=max_depth {
                let mut engine = SearchEngine::new(&evaluator);
                root_search(&mut engine, &mut game, depth);
                assert_eq!(serde_json::to_string(&game).unwrap(), before, "{fen} d{depth}");
            }
        }
    }

    #[test]
    fn test_selection_restores_position_at_every_depth() {
        let fen = POSITIONS[3].0;
        let mut game = ChessGame::from_fen(fen).unwrap();
        let before = game.clone();
        let mut selector = MoveSelector::seeded(17);
        for depth in 1..=4 {
            let mv = selector.select_with_config(&mut game, &StageConfig::new(depth, 0.0));
            assert!(mv.is_some());
            assert_eq!(game, before, "depth {depth}");
        }
    }

    /// Delegating engine that counts applies and undos.
    struct Counting {
        inner: ChessGame,
        applied: usize,
        undone: usize,
        full_status_checks: Cell<usize>,
    }

    impl RulesEngine for Counting {
        fn legal_moves(&self) -> Vec<Move> {
            self.inner.legal_moves()
        }

        fn apply_move(&mut self, mv: &Move) -> bool {
            let ok = self.inner.apply_move(mv);
            if ok {
                self.applied += 1;
            }
            ok
        }

        fn undo_last_move(&mut self) {
            self.undone += 1;
            self.inner.undo_last_move();
        }

        fn side_to_move(&self) -> Side {
            self.inner.side_to_move()
        }

        fn is_game_over(&self) -> bool {
            self.full_status_checks.set(self.full_status_checks.get() + 1);
            self.inner.is_game_over()
        }

        fn is_game_over_with(&self, legal_moves: &[Move]) -> bool {
            self.inner.is_game_over_with(legal_moves)
        }

        fn piece_at(&self, sq: Square) -> Option<Piece> {
            self.inner.piece_at(sq)
        }
    }

    #[test]
    fn test_apply_undo_balance_through_cutoffs() {
        let evaluator = MaterialPstEvaluator;
        let mut counting = Counting {
            inner: ChessGame::from_fen(POSITIONS[2].0).unwrap(),
            applied: 0,
            undone: 0,
            full_status_checks: Cell::new(0),
        };
        let mut engine = SearchEngine::new(&evaluator);
        engine.search(&mut counting, 3, -INF, INF, 1.0);

        assert!(counting.applied > 0);
        assert_eq!(counting.applied, counting.undone);
        assert_eq!(counting.inner.ply_count(), 0);
        // Game-over is answered from the move list each node already generated.
        assert_eq!(counting.full_status_checks.get(), 0);
    }

    #[test]
    fn test_mate_in_one_has_no_bonus() {
        // Ra8 mates, yet it is worth exactly as much as a quiet rook move:
        // mated positions are scored by material and placement only.
        let evaluator = MaterialPstEvaluator;
        let mut game = ChessGame::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w").unwrap();

        let value_after = |game: &mut ChessGame, coords: &str| {
            game.play_coords(coords).unwrap();
            let mut engine = SearchEngine::new(&evaluator);
            let value = -engine.search(game, 1, -INF, INF, -1.0);
            game.undo_last_move();
            value
        };

        let mate = value_after(&mut game, "a1a8");
        let quiet = value_after(&mut game, "a1a2");
        assert!((mate - quiet).abs() < 1e-9, "mate {mate} vs quiet {quiet}");
    }

    #[test]
    fn test_material_preferred_over_mate_in_one() {
        // Both Ra8# and Rxc1 are available. Without a mate score the knight
        // capture looks better, and that is what the engine plays.
        let fen = "6k1/5ppp/8/8/8/8/8/R1n3K1 w";
        let mut mated = ChessGame::from_fen(fen).unwrap();
        mated.play_coords("a1a8").unwrap();
        assert!(mated.status().winner() == Some(Side::White));

        for depth in [2, 3] {
            let mut game = ChessGame::from_fen(fen).unwrap();
            let mut selector = MoveSelector::seeded(depth as u64);
            let mv = selector
                .select_with_config(&mut game, &StageConfig::new(depth, 0.0))
                .unwrap();
            assert_eq!(mv.notation, "Ra1xc1", "depth {depth}");
        }
    }
}
