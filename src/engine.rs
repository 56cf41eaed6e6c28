/*
 * Garnet, a bitboard chess engine library
 * Copyright (C) 2025 The Garnet developers
 *
 * Garnet is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Garnet is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Garnet. If not, see <https://www.gnu.org/licenses/>.
 */

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    board::{Board, Key},
    defs::Square,
    error::{IllegalMove, ParseError, TtSizeError},
    evaluation::{Evaluate, PestoEvaluation},
    movegen::{generate_legal_moves, AllMoves, Move},
    perft::perft,
    search::{SearchReport, Searcher},
    transposition_table::TranspositionTable,
};

/// Master object that ties the board, the game history, the transposition
/// table and the search options together.
pub struct Engine {
    /// The current board.
    board: Board,
    /// The zobrist keys of every position of the game before the current
    /// one, oldest first. Used for repetition detection.
    game_keys: Vec<Key>,
    /// The current set options.
    options: EngineOptions,
    /// A hash table of previously-encountered positions.
    tt: TranspositionTable,
    /// The cancellation token handed to searches.
    ///
    /// Setting it to `true` stops a running search at its next checkup.
    stop: Arc<AtomicBool>,
    /// The evaluator consulted at the leaves of the search.
    evaluator: Box<dyn Evaluate>,
}

/// The recognised options, one setter each on [`Engine`].
#[derive(Clone, Copy)]
pub struct EngineOptions {
    /// The iterative deepening cap, in plies.
    pub max_depth: u8,
    /// The wall-clock budget of one search, in milliseconds. 0 means
    /// unlimited.
    pub max_time_ms: u64,
    /// Whether the search may prune with null moves.
    pub use_null_move: bool,
    /// Whether the search may reduce late quiet moves.
    pub use_lmr: bool,
    /// Whether iterative deepening uses aspiration windows.
    pub use_aspiration: bool,
}

/// The transposition table size a new engine starts with, in mebibytes.
const DEFAULT_TT_SIZE_MIB: usize = 16;

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_time_ms: 0,
            use_null_move: true,
            use_lmr: true,
            use_aspiration: true,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new [`Engine`] with the starting position, default options
    /// and a default-sized transposition table.
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            game_keys: Vec::new(),
            options: EngineOptions::default(),
            tt: TranspositionTable::with_capacity(DEFAULT_TT_SIZE_MIB)
                .unwrap_or_else(|_| unreachable!("the default TT size is valid")),
            stop: Arc::new(AtomicBool::new(false)),
            evaluator: Box::new(PestoEvaluation),
        }
    }

    /// Returns a reference to the current board.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Sets the position from a FEN string and clears the game history.
    ///
    /// On a parse error the engine is left exactly as it was.
    pub fn set_position(&mut self, fen: &str) -> Result<(), ParseError> {
        self.board = fen.parse()?;
        self.game_keys.clear();
        Ok(())
    }

    /// Resets the engine for a new game: starting position, cleared game
    /// history and a cleared transposition table.
    pub fn new_game(&mut self) {
        self.board = Board::default();
        self.game_keys.clear();
        self.tt.clear();
    }

    /// Plays a move given in long algebraic notation (e.g. "e2e4" or
    /// "b7b8q").
    ///
    /// The move is looked up in the legal move list of the current position;
    /// anything else, including unparseable text, is rejected with
    /// [`IllegalMove`] and the position is left unchanged.
    pub fn play_move(&mut self, mv_str: &str) -> Result<(), IllegalMove> {
        let mv = self
            .find_legal_move(mv_str)
            .ok_or_else(|| IllegalMove(mv_str.to_owned()))?;

        self.game_keys.push(self.board.key());
        self.board.make_move(mv);
        Ok(())
    }

    /// Looks up `mv_str` in the legal move list of the current position.
    fn find_legal_move(&self, mv_str: &str) -> Option<Move> {
        if mv_str.len() != 4 && mv_str.len() != 5 {
            return None;
        }
        let start = mv_str.get(0..2)?.parse::<Square>().ok()?;
        let end = mv_str.get(2..4)?.parse::<Square>().ok()?;

        let moves = generate_legal_moves::<AllMoves>(&self.board);
        if let Some(promotion) = mv_str.chars().nth(4) {
            let piece_type = promotion.try_into().ok()?;
            moves.find_promotion(start, end, piece_type)
        } else {
            moves.find(start, end)
        }
    }

    /// Searches the current position within the configured limits.
    ///
    /// Returns the report of the deepest completed iteration. If not even
    /// depth 1 completed before the search was stopped, the best move is the
    /// first legal move; if the position has no legal moves at all (mate or
    /// stalemate, which callers detect via the generator), there is no best
    /// move.
    pub fn go(&mut self) -> SearchReport {
        self.stop.store(false, Ordering::Relaxed);

        let fallback = generate_legal_moves::<AllMoves>(&self.board)
            .first()
            .map(|scored_move| scored_move.mv);

        let mut searcher = Searcher::new(
            &self.board,
            &self.game_keys,
            &mut self.tt,
            self.evaluator.as_ref(),
            &self.stop,
            self.options,
        );
        let mut report = searcher.start_search();

        if report.best_move.is_none() {
            report.best_move = fallback;
        }
        report
    }

    /// Returns a handle that stops a running search when set to `true`.
    ///
    /// The handle can be moved to another thread; the search notices at its
    /// next checkup and returns the last completed iteration's result.
    pub fn stop_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Counts the leaf nodes of the legal move tree, `depth` moves deep.
    pub fn perft(&mut self, depth: u8) -> u64 {
        perft(&mut self.board, depth)
    }

    /// Sets the size of the transposition table in mebibytes, clearing it.
    ///
    /// An invalid size is rejected without touching the existing table.
    pub fn set_tt_size_mb(&mut self, size_mib: usize) -> Result<(), TtSizeError> {
        self.tt.resize(size_mib)
    }

    /// Sets the iterative deepening depth cap.
    pub fn set_max_depth(&mut self, max_depth: u8) {
        self.options.max_depth = max_depth;
    }

    /// Sets the per-search deadline in milliseconds. 0 means unlimited.
    pub fn set_max_time_ms(&mut self, max_time_ms: u64) {
        self.options.max_time_ms = max_time_ms;
    }

    /// Enables or disables null-move pruning.
    pub fn set_use_null_move(&mut self, use_null_move: bool) {
        self.options.use_null_move = use_null_move;
    }

    /// Enables or disables late move reductions.
    pub fn set_use_lmr(&mut self, use_lmr: bool) {
        self.options.use_lmr = use_lmr;
    }

    /// Enables or disables aspiration windows.
    pub fn set_use_aspiration(&mut self, use_aspiration: bool) {
        self.options.use_aspiration = use_aspiration;
    }

    /// Replaces the evaluator.
    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluate>) {
        self.evaluator = evaluator;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        evaluation::{is_mate, moves_to_mate, MATE_BOUND},
        movegen::{generate_legal_moves, AllMoves},
    };

    use super::Engine;

    #[test]
    fn playing_moves() {
        let mut engine = Engine::new();
        engine.play_move("e2e4").expect("e2e4 is legal");
        engine.play_move("e7e5").expect("e7e5 is legal");
        assert_eq!(
            engine.board().to_string(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );

        // an illegal move leaves the board untouched
        let before = engine.board().to_string();
        assert!(engine.play_move("e4e6").is_err());
        assert!(engine.play_move("not a move").is_err());
        assert_eq!(engine.board().to_string(), before);
    }

    #[test]
    fn promotions_need_their_letter() {
        let mut engine = Engine::new();
        engine
            .set_position("8/P6k/8/8/8/8/8/K7 w - - 0 1")
            .expect("test FEN must parse");
        assert!(engine.play_move("a7a8").is_err());
        engine.play_move("a7a8q").expect("promotion is legal");
    }

    #[test]
    fn set_position_failure_changes_nothing() {
        let mut engine = Engine::new();
        engine.play_move("d2d4").expect("d2d4 is legal");
        let before = engine.board().to_string();
        assert!(engine.set_position("definitely not a FEN string").is_err());
        assert_eq!(engine.board().to_string(), before);
    }

    #[test]
    fn finds_a_mate_in_one() {
        let mut engine = Engine::new();
        engine
            .set_position("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1")
            .expect("test FEN must parse");
        engine.set_max_depth(4);

        let report = engine.go();
        assert_eq!(
            report.best_move.map(|mv| mv.to_string()),
            Some("e1e8".to_owned())
        );
        assert!(report.score >= MATE_BOUND, "score {} is not a mate", report.score);
        assert!(is_mate(report.score));
        assert_eq!(moves_to_mate(report.score), 1);
    }

    #[test]
    fn stalemate_has_no_best_move() {
        let mut engine = Engine::new();
        engine
            .set_position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1")
            .expect("test FEN must parse");

        assert!(generate_legal_moves::<AllMoves>(engine.board()).is_empty());
        assert!(!engine.board().is_in_check());

        let report = engine.go();
        assert!(report.best_move.is_none());
    }

    #[test]
    fn searches_respect_the_depth_cap() {
        let mut engine = Engine::new();
        engine.set_max_depth(3);
        let report = engine.go();
        assert_eq!(report.depth, 3);
        assert!(report.best_move.is_some());
    }

    #[test]
    fn disabled_features_still_search_soundly() {
        let mut engine = Engine::new();
        engine.set_use_null_move(false);
        engine.set_use_lmr(false);
        engine.set_use_aspiration(false);
        engine.set_max_depth(4);

        let report = engine.go();
        assert!(report.best_move.is_some());
        assert_eq!(report.depth, 4);
    }

    #[test]
    fn tt_size_is_validated() {
        let mut engine = Engine::new();
        assert!(engine.set_tt_size_mb(0).is_err());
        assert!(engine.set_tt_size_mb(8).is_ok());
    }
}
