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

use super::{Depth, Pv, RootNode, SearchStatus, Searcher};
use crate::evaluation::{Eval, INF_EVAL};

/// An aspiration window: a pair of bounds set close around the previous
/// iteration's score, widened whenever the search fails outside them.
///
/// See <https://www.chessprogramming.org/Aspiration_Windows>.
pub struct AspirationWindow {
    /// The lower bound.
    alpha: Eval,
    /// The upper bound.
    beta: Eval,
    /// How far the bounds sit from the centre score.
    margin: Eval,
}

impl AspirationWindow {
    /// The highest a margin can be before widening snaps to infinite.
    const MARGIN_LIMIT: Eval = 700;

    /// Returns a new [`AspirationWindow`] with infinite bounds and no
    /// margin.
    pub const fn new() -> Self {
        Self {
            alpha: -INF_EVAL,
            beta: INF_EVAL,
            margin: 0,
        }
    }

    /// Adjusts the aspiration window around the score of a completed
    /// iteration.
    ///
    /// Small depths get a larger margin, as do large scores (which swing
    /// more between iterations).
    pub fn adjust_around(&mut self, score: Eval, depth: Depth) {
        let unbounded_margin =
            50 / i32::from(depth).clamp(1, 5) + i32::from(score) * i32::from(score) / 3_000;

        self.margin = Eval::try_from(unbounded_margin).unwrap_or(INF_EVAL);
        self.alpha = score.saturating_sub(self.margin);
        self.beta = score.saturating_add(self.margin);
    }

    /// Returns the lower bound.
    pub const fn alpha(&self) -> Eval {
        self.alpha
    }

    /// Returns the upper bound.
    pub const fn beta(&self) -> Eval {
        self.beta
    }

    /// Increases the upper bound to above the given score.
    fn widen_up(&mut self, score: Eval) {
        if self.margin > Self::MARGIN_LIMIT {
            self.beta = INF_EVAL;
            return;
        }
        self.margin *= 2;

        self.beta = score.saturating_add(self.margin);
    }

    /// Checks if the upper bound can be increased.
    const fn can_widen_up(&self) -> bool {
        self.beta < INF_EVAL
    }

    /// Lowers the lower bound to below the given score.
    fn widen_down(&mut self, score: Eval) {
        if self.margin > Self::MARGIN_LIMIT {
            self.alpha = -INF_EVAL;
            return;
        }
        self.margin *= 2;

        self.beta = (self.alpha + self.beta) / 2;
        // same as `score.saturating_sub(self.margin)`, but saturates at
        // `-Eval::MAX` instead of `Eval::MIN`
        self.alpha = -(-score).saturating_add(self.margin);
    }

    /// Checks if the lower bound can be lowered.
    const fn can_widen_down(&self) -> bool {
        self.alpha > -INF_EVAL
    }
}

impl Searcher<'_> {
    /// Runs the aspiration loop on the current board: search, and re-search
    /// with wider bounds for as long as the score falls outside the window.
    pub(super) fn aspiration(
        &mut self,
        pv: &mut Pv,
        window: &mut AspirationWindow,
        depth: Depth,
    ) -> Eval {
        loop {
            let score =
                self.alpha_beta::<RootNode>(pv, window.alpha(), window.beta(), depth, 0, true);

            if self.check_status() != SearchStatus::Continue {
                break score;
            }

            // fail-low
            if score <= window.alpha() && window.can_widen_down() {
                window.widen_down(score);
                pv.clear();
                continue;
            }

            // fail-high
            if score >= window.beta() && window.can_widen_up() {
                window.widen_up(score);
                pv.clear();
                continue;
            }

            // exact score
            break score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AspirationWindow;
    use crate::evaluation::INF_EVAL;

    #[test]
    fn windows_widen_until_infinite() {
        let mut window = AspirationWindow::new();
        assert_eq!(window.alpha(), -INF_EVAL);
        assert_eq!(window.beta(), INF_EVAL);

        window.adjust_around(30, 5);
        assert!(window.alpha() > -INF_EVAL);
        assert!(window.beta() < INF_EVAL);
        assert!(window.alpha() <= 30 && 30 <= window.beta());

        // repeated fail-lows eventually reopen the window completely
        for _ in 0..20 {
            let score = window.alpha();
            if !window.can_widen_down() {
                break;
            }
            window.widen_down(score);
        }
        assert_eq!(window.alpha(), -INF_EVAL);
    }
}
