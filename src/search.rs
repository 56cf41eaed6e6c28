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

use std::{
    fmt::{self, Display, Formatter, Write as _},
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use arrayvec::ArrayVec;

use crate::{
    board::{Board, Key, MoveHistory, NullHistory},
    engine::EngineOptions,
    evaluation::{Eval, Evaluate},
    movegen::Move,
    transposition_table::TranspositionTable,
};
use history::Histories;

/// The main alpha-beta search and the quiescence search.
mod alpha_beta;
/// The aspiration loop.
mod aspiration;
/// Killer moves and the quiet history.
pub(crate) mod history;
/// The iterative deepening loop.
mod iterative_deepening;
/// Selecting which order moves are searched in.
pub(crate) mod movepick;
/// Time management.
mod time;

/// The difference between the current node and the leaves, in plies.
pub type Depth = i16;

/// The deepest the search tree can ever get, in plies from the root.
pub const MAX_PLY: usize = 128;

/// How often, in nodes, the search checks its deadline and the external
/// stop token.
const CHECKUP_INTERVAL: u64 = 2048;

/// A marker for a type of node to allow searches with generic node types.
#[allow(clippy::missing_docs_in_private_items)]
pub trait Node {
    const IS_PV: bool;
    const IS_ROOT: bool;
}

/// A node with a zero window: it is expected not to be in the final PV.
struct NonPvNode;
/// A node that could be in the final PV.
struct PvNode;
/// The node from which the search starts.
pub struct RootNode;

impl Node for NonPvNode {
    const IS_PV: bool = false;
    const IS_ROOT: bool = false;
}

impl Node for PvNode {
    const IS_PV: bool = true;
    const IS_ROOT: bool = false;
}

impl Node for RootNode {
    const IS_PV: bool = true;
    const IS_ROOT: bool = true;
}

/// The current status of the search.
#[derive(Clone, Copy, Eq, PartialEq)]
enum SearchStatus {
    /// Continue the search as normal.
    Continue,
    /// Unwind and discard the current iteration.
    Stop,
}

/// The principal variation: the best sequence of moves for both sides that
/// the search has found.
#[derive(Clone)]
pub struct Pv {
    /// The moves of the variation, root move first.
    moves: ArrayVec<Move, MAX_PLY>,
}

/// Everything a caller wants to know about a completed search iteration.
#[derive(Clone, Default)]
pub struct SearchReport {
    /// The depth of the completed iteration, or 0 if none completed.
    pub depth: Depth,
    /// The deepest ply reached, quiescence included.
    pub seldepth: u8,
    /// The score of the position in centipawns, positive for the side to
    /// move. Mate scores exceed [`MATE_BOUND`](crate::evaluation::MATE_BOUND).
    pub score: Eval,
    /// How many nodes were searched in total.
    pub nodes: u64,
    /// The wall-clock time the search has taken.
    pub time: Duration,
    /// The best move, if any iteration completed.
    pub best_move: Option<Move>,
    /// The principal variation of the last completed iteration.
    pub pv: Vec<Move>,
}

/// Performs the searching.
///
/// One searcher owns its board and the exclusive right to the transposition
/// table for the duration of the search; it can be queried afterwards for
/// final statistics.
pub struct Searcher<'a> {
    /// The moment the search started.
    start: Instant,
    /// How much wall-clock time the search is allowed.
    allocated: Duration,
    /// The external cancellation token. Polled at every checkup.
    stop: &'a AtomicBool,
    /// The status of the search.
    status: SearchStatus,
    /// How many positions have been searched.
    nodes: u64,
    /// The maximum ply reached this iteration.
    seldepth: u8,
    /// Killers, the quiet history and the repetition key stack.
    histories: Histories,
    /// The options the search was started with.
    options: EngineOptions,
    /// The transposition table, exclusively borrowed for the search.
    tt: &'a mut TranspositionTable,
    /// The evaluator consulted at the leaves.
    evaluator: &'a dyn Evaluate,
    /// The board being searched, mutated in place with make/unmake.
    board: Board,
}

impl Display for Pv {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut ret_str = String::with_capacity(self.moves.len() * 5);
        for mv in self.iter() {
            write!(ret_str, "{mv} ")?;
        }
        ret_str.pop();
        f.write_str(&ret_str)
    }
}

impl Pv {
    /// Returns a new, empty [`Pv`].
    pub fn new() -> Self {
        Self {
            moves: ArrayVec::new(),
        }
    }

    /// Returns the first move of the variation, if there is one.
    pub fn first(&self) -> Option<Move> {
        self.moves.first().copied()
    }

    /// Iterates over the moves of the variation, root move first.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }

    /// Adds a move to the end of the variation.
    ///
    /// A move beyond [`MAX_PLY`] is silently dropped.
    fn enqueue(&mut self, mv: Move) {
        let _ = self.moves.try_push(mv);
    }

    /// Appends another variation to the end of this one.
    fn append(&mut self, other: &Self) {
        for mv in other.iter() {
            self.enqueue(mv);
        }
    }

    /// Clears all moves from the variation.
    fn clear(&mut self) {
        self.moves.clear();
    }
}

impl<'a> Searcher<'a> {
    /// Creates a new [`Searcher`] over `board`.
    ///
    /// `game_keys` are the zobrist keys of the positions before `board` in
    /// the game, oldest first; they seed the repetition detection.
    pub fn new(
        board: &Board,
        game_keys: &[Key],
        tt: &'a mut TranspositionTable,
        evaluator: &'a dyn Evaluate,
        stop: &'a AtomicBool,
        options: EngineOptions,
    ) -> Self {
        let mut histories = Histories::new();
        histories.key_history = game_keys.to_vec();

        Self {
            start: Instant::now(),
            allocated: Duration::MAX,
            stop,
            status: SearchStatus::Continue,
            nodes: 0,
            seldepth: 0,
            histories,
            options,
            tt,
            evaluator,
            board: *board,
        }
    }

    /// Returns the number of searched nodes.
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Makes `mv` on the internal board, pushing the old key onto the
    /// repetition stack.
    fn do_move(&mut self, mv: Move) -> MoveHistory {
        self.histories.key_history.push(self.board.key());
        self.board.make_move(mv)
    }

    /// Unmakes the most recent move.
    fn undo_move(&mut self, history: &MoveHistory) {
        self.board.unmake_move(history);
        self.histories.key_history.pop();
    }

    /// Makes a null move on the internal board.
    fn do_null_move(&mut self) -> NullHistory {
        self.histories.key_history.push(self.board.key());
        self.board.make_null_move()
    }

    /// Unmakes the most recent null move.
    fn undo_null_move(&mut self, history: &NullHistory) {
        self.board.unmake_null_move(history);
        self.histories.key_history.pop();
    }

    /// Statically evaluates the internal board.
    fn evaluate(&self) -> Eval {
        self.evaluator.evaluate(&self.board)
    }

    /// Checks the status of the search.
    ///
    /// Every [`CHECKUP_INTERVAL`] nodes, this polls the deadline and the
    /// external stop token; either one flips the status to
    /// [`SearchStatus::Stop`], which makes the whole recursion unwind.
    fn check_status(&mut self) -> SearchStatus {
        if self.nodes % CHECKUP_INTERVAL != 0 || self.status != SearchStatus::Continue {
            return self.status;
        }

        if self.stop.load(Ordering::Relaxed) || self.start.elapsed() >= self.allocated {
            self.status = SearchStatus::Stop;
        }

        self.status
    }

    /// Calculates if the iterative deepening loop should be exited after a
    /// completed iteration.
    fn should_stop(&self) -> bool {
        // if a large share of the allocated time is gone, the next (deeper)
        // iteration will not finish either
        self.allocated != Duration::MAX && self.start.elapsed() > self.allocated.mul_f32(0.4)
    }

    /// Checks if the current position is drawn, either by the fifty-move
    /// rule or by repeating a position from the game or the search path.
    fn is_draw(&self) -> bool {
        let halfmoves = self.board.halfmoves();
        if halfmoves >= 100 {
            return true;
        }

        let key = self.board.key();
        self.histories
            .key_history
            .iter()
            // the previous position is last
            .rev()
            // a repetition needs at least 4 halfmoves, so skip the previous
            // 3 positions
            .skip(3)
            // stop at the last irreversible move
            .take(usize::from(halfmoves).saturating_sub(3))
            // only positions with the same side to move can repeat
            .step_by(2)
            .any(|&old_key| old_key == key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::{Pv, Searcher};
    use crate::{
        board::Board,
        defs::Square,
        engine::EngineOptions,
        evaluation::PestoEvaluation,
        movegen::Move,
        transposition_table::TranspositionTable,
    };

    #[test]
    fn pv_display() {
        let mut pv = Pv::new();
        pv.enqueue(Move::new(Square::E2, Square::E4));
        pv.enqueue(Move::new(Square::E7, Square::E5));
        assert_eq!(pv.to_string(), "e2e4 e7e5");
        assert_eq!(pv.first(), Some(Move::new(Square::E2, Square::E4)));
    }

    #[test]
    fn repetitions_are_draws() {
        let mut tt = TranspositionTable::with_capacity(1).expect("1 MiB is valid");
        let stop = AtomicBool::new(false);
        let board = Board::default();
        let mut searcher = Searcher::new(
            &board,
            &[],
            &mut tt,
            &PestoEvaluation,
            &stop,
            EngineOptions::default(),
        );

        // shuffle the knights back and forth until the start position
        // appears for the second time
        let moves = [
            Move::new(Square::G1, Square::F3),
            Move::new(Square::G8, Square::F6),
            Move::new(Square::F3, Square::G1),
            Move::new(Square::F6, Square::G8),
        ];
        for mv in moves {
            assert!(!searcher.is_draw());
            searcher.do_move(mv);
        }
        assert!(searcher.is_draw());
    }

    #[test]
    fn fifty_move_rule_is_a_draw() {
        let mut tt = TranspositionTable::with_capacity(1).expect("1 MiB is valid");
        let stop = AtomicBool::new(false);
        let board: Board = "4k3/8/8/8/8/8/8/4K2R w K - 99 80"
            .parse()
            .expect("test FEN must parse");
        let mut searcher = Searcher::new(
            &board,
            &[],
            &mut tt,
            &PestoEvaluation,
            &stop,
            EngineOptions::default(),
        );

        assert!(!searcher.is_draw());
        searcher.do_move(Move::new(Square::H1, Square::H2));
        assert!(searcher.is_draw());
    }
}
