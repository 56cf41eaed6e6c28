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

use arrayvec::ArrayVec;

use super::{movepick::MovePicker, Depth, Node, NonPvNode, Pv, PvNode, SearchStatus, Searcher, MAX_PLY};
use crate::{
    evaluation::{mated_in, Eval, DRAW, MATE_BOUND},
    lookups::base_reductions,
    movegen::{Move, MAX_LEGAL_MOVES},
    transposition_table::{Bound, TranspositionHit},
};

/// The quiescence delta-pruning margin: no single capture swings the
/// material by more than a queen plus change.
const DELTA_MARGIN: Eval = 1100;

impl Searcher<'_> {
    /// Performs a negamax alpha-beta search on the current board.
    ///
    /// Returns the score of the position after searching to `depth`. When
    /// the search is stopped mid-node, the returned score is a sentinel the
    /// callers discard.
    #[allow(clippy::too_many_lines)]
    pub(super) fn alpha_beta<NodeType: Node>(
        &mut self,
        pv: &mut Pv,
        mut alpha: Eval,
        beta: Eval,
        mut depth: Depth,
        height: u8,
        allow_null: bool,
    ) -> Eval {
        if depth <= 0 {
            return self.quiescence(alpha, beta, height);
        }

        self.seldepth = self.seldepth.max(height);
        self.nodes += 1;

        if !NodeType::IS_ROOT {
            if self.check_status() != SearchStatus::Continue {
                return 0;
            }

            // draw by the fifty-move rule or repetition of the game or
            // search path
            if self.is_draw() {
                return DRAW;
            }

            if usize::from(height) >= MAX_PLY {
                return self.evaluate();
            }
        }

        let tt_hit = self.tt.load(self.board.key(), height);
        if let Some(hit) = tt_hit {
            if !NodeType::IS_PV && hit.cuts_off(depth, alpha, beta) {
                return hit.score();
            }
        }
        let tt_move = tt_hit.and_then(TranspositionHit::mv);

        let is_in_check = self.board.is_in_check();
        if is_in_check {
            depth += 1;
        }

        // Null move pruning: if handing the opponent a free move still fails
        // high on a reduced search, a real move will almost certainly fail
        // high too. Unsound in zugzwang, hence the non-pawn material
        // condition.
        if !NodeType::IS_PV
            && self.options.use_null_move
            && allow_null
            && !is_in_check
            && height > 0
            && depth >= 4
            && self.board.has_non_pawn_pieces(self.board.side_to_move())
        {
            let reduction = 3 + depth / 6;
            let null_history = self.do_null_move();
            let mut null_pv = Pv::new();
            let score = -self.alpha_beta::<NonPvNode>(
                &mut null_pv,
                -beta,
                -beta + 1,
                depth - reduction,
                height + 1,
                false,
            );
            self.undo_null_move(&null_history);

            if self.status != SearchStatus::Continue {
                return 0;
            }
            if score >= beta && score.abs() < MATE_BOUND {
                return beta;
            }
        }

        self.histories.clear_next_killers(height);

        let killers = self.histories.current_killers(height);
        let mut picker = MovePicker::new_all(&self.board, tt_move, killers, &self.histories);

        let mut best_move = None;
        let mut total_moves: u8 = 0;
        let mut searched_quiets: ArrayVec<Move, MAX_LEGAL_MOVES> = ArrayVec::new();
        let mut new_pv = Pv::new();

        while let Some(mv) = picker.next() {
            let is_quiet = self.board.is_quiet(mv);
            total_moves += 1;

            let move_history = self.do_move(mv);

            // Principal variation search: the first move gets the full
            // window; later moves get a zero window, with late quiet moves
            // also reduced. A zero-window search that beats alpha is
            // re-searched, first at full depth, then (in PV nodes) with the
            // full window.
            let new_depth = depth - 1;
            let mut score = 0;
            let mut needs_full_search = true;

            if !NodeType::IS_PV || total_moves > 1 {
                let mut reduction = 0;
                if self.options.use_lmr
                    && is_quiet
                    && !is_in_check
                    && depth >= 3
                    && total_moves >= 3
                {
                    reduction = (base_reductions(depth, total_moves) + 1).min(new_depth - 1);
                }

                score = -self.alpha_beta::<NonPvNode>(
                    &mut new_pv,
                    -alpha - 1,
                    -alpha,
                    new_depth - reduction,
                    height + 1,
                    true,
                );

                if score > alpha && reduction > 0 {
                    score = -self.alpha_beta::<NonPvNode>(
                        &mut new_pv,
                        -alpha - 1,
                        -alpha,
                        new_depth,
                        height + 1,
                        true,
                    );
                }
                needs_full_search = NodeType::IS_PV && score > alpha;
            }

            if NodeType::IS_PV && (total_moves == 1 || needs_full_search) {
                score = -self.alpha_beta::<PvNode>(
                    &mut new_pv,
                    -beta,
                    -alpha,
                    new_depth,
                    height + 1,
                    true,
                );
            }

            self.undo_move(&move_history);

            // a partially searched node cannot be trusted
            if self.status != SearchStatus::Continue {
                return if NodeType::IS_ROOT { alpha } else { 0 };
            }

            if is_quiet && searched_quiets.try_push(mv).is_err() {
                debug_assert!(false, "more quiet moves than can ever be legal");
            }

            if score > alpha {
                alpha = score;
                best_move = Some(mv);

                if NodeType::IS_PV {
                    pv.clear();
                    pv.enqueue(mv);
                    pv.append(&new_pv);
                }

                // the opponent will never allow this node to be reached
                if alpha >= beta {
                    if is_quiet {
                        self.histories.insert_into_killers(height, mv);
                        self.histories.update_quiet_history(
                            &self.board,
                            &searched_quiets,
                            mv,
                            depth,
                        );
                    }
                    self.tt
                        .store(self.board.key(), depth, best_move, beta, Bound::Lower, height);
                    return beta;
                }
            }

            new_pv.clear();
        }

        // no legal moves: checkmate or stalemate
        if total_moves == 0 {
            return if is_in_check { mated_in(height) } else { DRAW };
        }

        let bound = if best_move.is_some() {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt
            .store(self.board.key(), depth, best_move, alpha, bound, height);

        alpha
    }

    /// Performs a search that only considers captures (and queen
    /// promotions), using the static evaluation as a stand-pat score.
    ///
    /// This is called at the leaf nodes of the main search to settle
    /// tactical dust before the position is evaluated.
    fn quiescence(&mut self, mut alpha: Eval, beta: Eval, height: u8) -> Eval {
        self.seldepth = self.seldepth.max(height);
        self.nodes += 1;

        if self.check_status() != SearchStatus::Continue {
            return 0;
        }

        // depth-0 entries from earlier visits to this position still apply
        if let Some(hit) = self.tt.load(self.board.key(), height) {
            if hit.cuts_off(0, alpha, beta) {
                return hit.score();
            }
        }

        let stand_pat = self.evaluate();
        if usize::from(height) >= MAX_PLY {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        // delta pruning: if even a huge material swing cannot lift alpha,
        // none of the captures below will either
        if stand_pat + DELTA_MARGIN < alpha {
            return alpha;
        }
        alpha = alpha.max(stand_pat);

        let mut best_move = None;
        let mut picker = MovePicker::new_captures(&self.board);

        while let Some(mv) = picker.next() {
            let move_history = self.do_move(mv);
            let score = -self.quiescence(-beta, -alpha, height + 1);
            self.undo_move(&move_history);

            if self.status != SearchStatus::Continue {
                return 0;
            }

            if score > alpha {
                alpha = score;
                best_move = Some(mv);

                if alpha >= beta {
                    self.tt
                        .store(self.board.key(), 0, best_move, beta, Bound::Lower, height);
                    return beta;
                }
            }
        }

        let bound = if best_move.is_some() {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt
            .store(self.board.key(), 0, best_move, alpha, bound, height);

        alpha
    }
}
