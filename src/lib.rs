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

//! Garnet, a bitboard chess engine core.
//!
//! The crate provides the inside of a chess engine and none of the outside:
//! a legal move generator over magic bitboards, an in-place make/unmake
//! board with incremental zobrist hashing, and an iterative-deepening
//! alpha-beta search with a transposition table, quiescence, null-move
//! pruning, late move reductions and killer/history move ordering.
//! Protocol handling (UCI and friends), opening books and time controls
//! beyond a per-search deadline are left to the caller.
//!
//! The usual entry point is [`Engine`](engine::Engine):
//!
//! ```
//! use garnet::engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine.set_position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
//! engine.set_max_depth(6);
//! let report = engine.go();
//! assert!(report.best_move.is_some());
//! ```
//!
//! One search owns its [`Board`](board::Board) and transposition table;
//! nothing in the crate shares mutable state between threads except the
//! move-list pool, which is its own lock. A running search is stopped
//! through the token returned by
//! [`Engine::stop_token`](engine::Engine::stop_token).

/// Items associated with [`Bitboard`](bitboard::Bitboard).
pub mod bitboard;
/// Items associated with [`Board`](board::Board).
pub mod board;
/// Definitions and enumerations.
pub mod defs;
/// Items associated with [`Engine`](engine::Engine).
pub mod engine;
/// Error variants.
pub mod error;
/// Items related to evaluation.
pub mod evaluation;
/// Static lookup items.
pub mod lookups;
/// Items related to move generation.
pub mod movegen;
/// The pool-backed move list.
pub mod movelist;
/// Perft: see <https://www.chessprogramming.org/Perft>.
pub mod perft;
/// Items related to searching.
pub mod search;
/// A transposition table.
pub mod transposition_table;
/// Utility.
mod util;

/// Perft conformance tests.
mod bench;
