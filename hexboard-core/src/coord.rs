//! Board coordinates, notation and canonical cell indexing

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// File letters, left to right (there is no `j` file)
pub const FILES: [char; 11] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'k', 'l'];

/// Number of ranks
pub const RANKS: u8 = 11;

/// Number of cells on the board
pub const CELL_COUNT: usize = 91;

/// File of the center cell (f)
pub const CENTER_FILE: u8 = 5;

/// Rank of the center cell, and the last rank that spans every file
pub const CENTER_RANK: u8 = 6;

/// Errors produced while parsing `{file}{rank}` notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty position notation")]
    Empty,

    #[error("unknown file: {0}")]
    UnknownFile(char),

    #[error("invalid rank: {0}")]
    InvalidRank(String),

    #[error("position is not on the board: {0}")]
    OffBoard(String),
}

/// A cell coordinate: file index (0 = a .. 10 = l) and rank (1..=11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub file: u8,
    pub rank: u8,
}

impl Coord {
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// Check if this coordinate is on the board
    pub fn is_valid(&self) -> bool {
        (1..=RANKS).contains(&self.rank) && files_in_rank(self.rank).contains(&self.file)
    }

    /// Canonical index: ranks top to bottom, files left to right.
    ///
    /// The coordinate must be on the board; see [`Coord::checked_index`].
    pub fn index(&self) -> usize {
        debug_assert!(self.is_valid(), "{:?} is off the board", self);
        let above: usize = (self.rank + 1..=RANKS).map(rank_len).sum();
        above + usize::from(self.file - files_in_rank(self.rank).start())
    }

    /// Canonical index, or `None` off the board
    pub fn checked_index(&self) -> Option<usize> {
        self.is_valid().then(|| self.index())
    }

    /// Inverse of [`Coord::index`]
    pub fn from_index(index: usize) -> Option<Coord> {
        let mut remaining = index;
        for rank in (1..=RANKS).rev() {
            let len = rank_len(rank);
            if remaining < len {
                let file = files_in_rank(rank).start() + remaining as u8;
                return Some(Coord::new(file, rank));
            }
            remaining -= len;
        }
        None
    }

    /// All cells in canonical index order
    pub fn all() -> impl Iterator<Item = Coord> {
        (1..=RANKS)
            .rev()
            .flat_map(|rank| files_in_rank(rank).map(move |file| Coord::new(file, rank)))
    }

    /// File letter
    pub fn file_char(&self) -> char {
        FILES[usize::from(self.file)]
    }

    /// Signed file offset from the center file
    pub fn file_offset(&self) -> i32 {
        i32::from(self.file) - i32::from(CENTER_FILE)
    }

    /// Signed rank offset from the center rank
    pub fn rank_offset(&self) -> i32 {
        i32::from(self.rank) - i32::from(CENTER_RANK)
    }
}

/// Files present in a rank; ranks above the 6th lose one file at each end
pub fn files_in_rank(rank: u8) -> RangeInclusive<u8> {
    if rank <= CENTER_RANK {
        0..=10
    } else {
        let trim = rank - CENTER_RANK;
        trim..=10 - trim
    }
}

/// Number of cells in a rank
pub fn rank_len(rank: u8) -> usize {
    files_in_rank(rank).count()
}

/// Cell index of a notation string such as `f6`
pub fn index(notation: &str) -> Result<usize, NotationError> {
    notation.parse::<Coord>().map(|c| c.index())
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank)
    }
}

impl FromStr for Coord {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NotationError::Empty)?;
        let file = FILES
            .iter()
            .position(|&c| c == letter.to_ascii_lowercase())
            .ok_or(NotationError::UnknownFile(letter))?;
        let rest = chars.as_str();
        let rank: u8 = rest
            .parse()
            .map_err(|_| NotationError::InvalidRank(rest.to_string()))?;

        let coord = Coord::new(file as u8, rank);
        if !coord.is_valid() {
            return Err(NotationError::OffBoard(s.to_string()));
        }
        Ok(coord)
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
