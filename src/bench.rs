#![cfg(test)]

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

//! Perft conformance tests over the well-known reference positions.

use lazy_static::lazy_static;

use crate::engine::Engine;

/// A position with a known perft result.
#[derive(Clone, Copy)]
struct TestPosition<'a> {
    /// The FEN of the position.
    position: &'a str,
    /// The depth to count to.
    perft_depth: u8,
    /// The expected number of leaf nodes.
    perft_result: u64,
}

lazy_static! {
    /// Test positions used to check the correctness of movegen and
    /// make/unmake.
    ///
    /// Deeper counts for the same positions are documented at
    /// <https://www.chessprogramming.org/Perft_Results> (e.g. kiwipete depth
    /// 5 is 193,690,690 and depth 6 is 8,031,647,685); the depths here keep
    /// the test runtime reasonable.
    static ref TEST_POSITIONS: Vec<TestPosition<'static>> = vec![
        // the starting position: depth 5 contains ep and promotions
        TestPosition::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            5,
            4_865_609,
        ),
        // kiwipete: every special move type at once
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
            4,
            4_085_603,
        ),
        // an endgame with en passant discovered checks on the shared rank
        TestPosition::new(
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
            5,
            674_624,
        ),
        // promotions galore, including underpromotion checks
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            4,
            422_333,
        ),
        // an enemy knight can take a rook, disallowing castling
        TestPosition::new(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            4,
            2_103_487,
        ),
    ];
}

impl<'a> TestPosition<'a> {
    /// Wraps a FEN string and its expected perft result.
    const fn new(position: &'a str, perft_depth: u8, perft_result: u64) -> Self {
        Self {
            position,
            perft_depth,
            perft_result,
        }
    }

    /// Runs perft on the position and checks the result.
    fn run_test(&self, engine: &mut Engine) {
        engine
            .set_position(self.position)
            .expect("all test positions are valid FEN");
        assert_eq!(
            engine.perft(self.perft_depth),
            self.perft_result,
            "wrong perft result for {}",
            self.position,
        );
    }
}

#[test]
fn test_positions() {
    let mut engine = Engine::new();
    for position in TEST_POSITIONS.iter() {
        position.run_test(&mut engine);
    }
}
