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
    mem::take,
    ops::{Deref, DerefMut},
    sync::Mutex,
};

use lazy_static::lazy_static;

use crate::{
    defs::{PieceType, Square},
    movegen::Move,
};

/// A [`Move`] that has been given an ordering score.
#[allow(clippy::missing_docs_in_private_items)]
#[derive(Clone, Copy)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// A list of moves, backed by a process-wide buffer pool.
///
/// [`MoveList::new()`] checks a buffer out of the pool; dropping the list
/// returns it, whichever way the scope is left. Buffers that have grown past
/// [`MAX_POOLED_CAPACITY`] are discarded instead of pooled so that one
/// pathological position cannot pin memory forever.
pub struct MoveList {
    /// The checked-out buffer.
    moves: Vec<ScoredMove>,
}

/// The largest buffer the pool will take back.
const MAX_POOLED_CAPACITY: usize = 512;

lazy_static! {
    /// The process-wide free list of move buffers.
    static ref LIST_POOL: Mutex<Vec<Vec<ScoredMove>>> = Mutex::new(Vec::new());
}

impl Deref for MoveList {
    type Target = Vec<ScoredMove>;

    fn deref(&self) -> &Self::Target {
        &self.moves
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.moves
    }
}

impl Drop for MoveList {
    fn drop(&mut self) {
        if self.moves.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        self.moves.clear();
        if let Ok(mut pool) = LIST_POOL.lock() {
            pool.push(take(&mut self.moves));
        }
    }
}

impl MoveList {
    /// Checks a cleared buffer out of the pool, or allocates a fresh one if
    /// the pool is empty.
    pub fn new() -> Self {
        let moves = LIST_POOL
            .lock()
            .ok()
            .and_then(|mut pool| pool.pop())
            .unwrap_or_default();
        Self { moves }
    }

    /// Pushes `mv` with a score of 0.
    pub fn push_move(&mut self, mv: Move) {
        self.moves.push(ScoredMove { mv, score: 0 });
    }

    /// Finds and returns, if it exists, the non-promotion [`Move`] that has
    /// start square `start` and end square `end`.
    ///
    /// Promotions are ambiguous without their piece and must go through
    /// [`Self::find_promotion`].
    pub fn find(&self, start: Square, end: Square) -> Option<Move> {
        self.iter()
            .find(|scored_move| {
                scored_move.mv.is_moving_from_to(start, end) && !scored_move.mv.is_promotion()
            })
            .map(|scored_move| scored_move.mv)
    }

    /// Finds and returns, if it exists, the [`Move`] that has start square
    /// `start`, end square `end` and promotion piece `piece_type`.
    pub fn find_promotion(&self, start: Square, end: Square, piece_type: PieceType) -> Option<Move> {
        self.iter()
            .find(|scored_move| scored_move.mv == Move::new_promo_any(start, end, piece_type))
            .map(|scored_move| scored_move.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveList, MAX_POOLED_CAPACITY};
    use crate::{
        defs::{PieceType, Square},
        movegen::Move,
    };

    #[test]
    fn pooled_buffers_never_exceed_the_cap() {
        {
            let mut list = MoveList::new();
            list.reserve(MAX_POOLED_CAPACITY * 2);
        }
        // the oversized buffer was discarded, so whatever the pool hands out
        // next respects the cap
        let list = MoveList::new();
        assert!(list.capacity() <= MAX_POOLED_CAPACITY);
    }

    #[test]
    fn checked_out_buffers_are_empty() {
        {
            let mut list = MoveList::new();
            list.push_move(Move::new(Square::E2, Square::E4));
        }
        assert!(MoveList::new().is_empty());
    }

    #[test]
    fn finding_moves() {
        let mut list = MoveList::new();
        list.push_move(Move::new(Square::E2, Square::E4));
        list.push_move(Move::new_promo_any(Square::A7, Square::A8, PieceType::QUEEN));

        assert!(list.find(Square::E2, Square::E4).is_some());
        assert!(list.find(Square::E2, Square::E3).is_none());
        assert!(list
            .find_promotion(Square::A7, Square::A8, PieceType::QUEEN)
            .is_some());
        assert!(list
            .find_promotion(Square::A7, Square::A8, PieceType::ROOK)
            .is_none());
    }
}
