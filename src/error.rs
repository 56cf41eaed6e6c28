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
    error::Error,
    fmt::{self, Display, Formatter},
    num::ParseIntError,
};

/// An error that occurs when a string cannot be parsed.
#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A token was outside an expected range.
    ErroneousToken,
    /// Expected a token but found nothing.
    ExpectedToken,
    /// Expected a different token.
    InvalidToken,
}

/// An error returned when a supplied move is not in the legal move list of
/// the current position.
///
/// The position is left unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IllegalMove(pub String);

/// An error returned when a transposition table is given an unusable size.
///
/// No allocation takes place.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TtSizeError(pub usize);

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ErroneousToken => f.write_str("token outside the expected range"),
            Self::ExpectedToken => f.write_str("expected a token but found nothing"),
            Self::InvalidToken => f.write_str("expected a different token"),
        }
    }
}

impl Display for IllegalMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "move \"{}\" is not legal in the current position", self.0)
    }
}

impl Display for TtSizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} MiB is not a usable transposition table size", self.0)
    }
}

impl Error for ParseError {}
impl Error for IllegalMove {}
impl Error for TtSizeError {}

impl From<ParseIntError> for ParseError {
    fn from(_: ParseIntError) -> Self {
        Self::ErroneousToken
    }
}
