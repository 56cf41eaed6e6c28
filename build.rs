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

//! Creates the static lookup tables that cannot be built in a `const` context
//! and places them in `binaries/`.

use std::{fs, io, mem::size_of, path::Path};

/// The difference between the leaf node and the current node.
type Depth = i16;
/// A table of base late move reductions.
///
/// Indexed by the depth then the number of moves already searched.
type BaseReductions = [[Depth; 128]; 64];
/// A table of rays indexed by two squares.
type Rays = [[u64; 64]; 64];

/// The eight step offsets of a queen as (file delta, rank delta) pairs.
const QUEEN_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

fn main() -> io::Result<()> {
    if !Path::new("binaries").exists() {
        fs::create_dir("binaries")?;
    }
    create_base_reductions()?;
    create_rays()?;

    println!("cargo::rerun-if-changed=build.rs");

    Ok(())
}

/// Creates the file `binaries/base_reductions.bin` with structure
/// [`BaseReductions`].
fn create_base_reductions() -> io::Result<()> {
    let mut base_reductions: BaseReductions = [[0; 128]; 64];

    for (depth, move_table) in base_reductions.iter_mut().enumerate() {
        for (move_idx, entry) in move_table.iter_mut().enumerate() {
            let ln_depth = f32::ln(depth as f32);
            let ln_move_idx = f32::ln(move_idx as f32);
            *entry = (ln_depth * ln_move_idx / 2.0) as Depth;
        }
    }

    fs::write("binaries/base_reductions.bin", as_bytes(&base_reductions))
}

/// Creates `binaries/rays_between.bin` and `binaries/rays_line.bin`, both
/// with structure [`Rays`].
///
/// The between table holds the squares strictly between two collinear
/// squares; the line table holds the full ray through both squares, extended
/// to the board edges and including the squares themselves. For squares that
/// do not share a rank, file or diagonal, both bitboards are empty.
fn create_rays() -> io::Result<()> {
    let mut rays_between: Rays = [[0; 64]; 64];
    let mut rays_line: Rays = [[0; 64]; 64];

    for start in 0..64_u8 {
        for (df, dr) in QUEEN_DELTAS {
            let mut between = 0_u64;
            let mut current = step(start, df, dr);

            while let Some(end) = current {
                rays_between[usize::from(start)][usize::from(end)] = between;
                rays_line[usize::from(start)][usize::from(end)] =
                    walk_to_edge(start, df, dr) | walk_to_edge(start, -df, -dr) | 1 << start;
                between |= 1 << end;
                current = step(end, df, dr);
            }
        }
    }

    fs::write("binaries/rays_between.bin", as_bytes(&rays_between))?;
    fs::write("binaries/rays_line.bin", as_bytes(&rays_line))
}

/// Returns every square from `start` (exclusive) to the board edge in the
/// given direction as a bitboard.
fn walk_to_edge(start: u8, df: i8, dr: i8) -> u64 {
    let mut ray = 0;
    let mut current = step(start, df, dr);
    while let Some(square) = current {
        ray |= 1 << square;
        current = step(square, df, dr);
    }
    ray
}

/// Moves one king step from `square`, returning `None` when the step leaves
/// the board.
fn step(square: u8, df: i8, dr: i8) -> Option<u8> {
    let file = (square & 7) as i8 + df;
    let rank = (square >> 3) as i8 + dr;
    ((0..8).contains(&file) && (0..8).contains(&rank)).then(|| (rank * 8 + file) as u8)
}

/// Reinterprets a table as its raw bytes.
fn as_bytes<T>(table: &T) -> &[u8] {
    // SAFETY: both table types consist only of integers, which have no
    // invalid byte patterns and no padding
    unsafe { std::slice::from_raw_parts((table as *const T).cast::<u8>(), size_of::<T>()) }
}
