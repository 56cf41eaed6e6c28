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

use std::time::Instant;

use super::{
    aspiration::AspirationWindow, time::calculate_time_window, Depth, Pv, RootNode, SearchReport,
    SearchStatus, Searcher, MAX_PLY,
};
use crate::evaluation::INF_EVAL;

impl Searcher<'_> {
    /// Runs the iterative deepening loop on the current board.
    ///
    /// Returns the report of the deepest fully completed iteration; a
    /// stopped iteration is discarded. The report of a search that never
    /// completed depth 1 has no best move.
    pub fn start_search(&mut self) -> SearchReport {
        self.start = Instant::now();
        self.nodes = 0;
        self.status = SearchStatus::Continue;
        self.allocated = calculate_time_window(self.options.max_time_ms);
        self.histories.clear();
        self.tt.new_search();

        let mut report = SearchReport::default();
        let mut window = AspirationWindow::new();
        let mut pv = Pv::new();
        let max_depth = Depth::from(self.options.max_depth).clamp(1, MAX_PLY as Depth);

        for depth in 1..=max_depth {
            self.seldepth = 0;

            let score = if self.options.use_aspiration {
                self.aspiration(&mut pv, &mut window, depth)
            } else {
                self.alpha_beta::<RootNode>(&mut pv, -INF_EVAL, INF_EVAL, depth, 0, true)
            };

            // an interrupted iteration is discarded: the previous report
            // stands
            if self.check_status() != SearchStatus::Continue {
                break;
            }

            report = SearchReport {
                depth,
                seldepth: self.seldepth,
                score,
                nodes: self.nodes,
                time: self.start.elapsed(),
                best_move: pv.first(),
                pv: pv.iter().collect(),
            };

            if self.options.use_aspiration {
                window.adjust_around(score, depth);
            }

            // if there is no realistic chance of finishing another
            // iteration, don't start it
            if self.should_stop() {
                break;
            }

            pv.clear();
        }

        report
    }
}
