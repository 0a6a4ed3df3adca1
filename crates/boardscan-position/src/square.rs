use crate::PositionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of files and ranks on the board.
pub const BOARD_SIZE: usize = 8;

/// A board square such as `e4`.
///
/// `file` is `0..8` for `a..h`, `rank` is `1..=8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareName {
    file: u8,
    rank: u8,
}

impl SquareName {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        ((file as usize) < BOARD_SIZE && (1..=BOARD_SIZE as u8).contains(&rank))
            .then_some(Self { file, rank })
    }

    /// Square at image-grid cell `(row, col)` of an upright board photo:
    /// column 0 is file `a`, row 0 (image top) is rank 8.
    pub fn from_grid(row: usize, col: usize) -> Option<Self> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Self::new(col as u8, (BOARD_SIZE - row) as u8)
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    /// Image-grid `(row, col)` of this square, inverse of [`SquareName::from_grid`].
    pub fn grid(&self) -> (usize, usize) {
        (BOARD_SIZE - self.rank as usize, self.file as usize)
    }

    /// Dense index `0..64`, rank-major from `a1`.
    pub fn index(&self) -> usize {
        (self.rank as usize - 1) * BOARD_SIZE + self.file as usize
    }

    /// All 64 squares, rank 8 to rank 1, file `a` to `h` within a rank.
    pub fn all() -> impl Iterator<Item = SquareName> {
        (0..BOARD_SIZE).flat_map(|row| {
            (0..BOARD_SIZE).map(move |col| SquareName {
                file: col as u8,
                rank: (BOARD_SIZE - row) as u8,
            })
        })
    }
}

impl fmt::Display for SquareName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank)
    }
}

impl FromStr for SquareName {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PositionError::InvalidSquareName(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].checked_sub(b'a').ok_or_else(invalid)?;
        let rank = bytes[1].checked_sub(b'0').ok_or_else(invalid)?;
        Self::new(file, rank).ok_or_else(invalid)
    }
}

impl Serialize for SquareName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SquareName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_maps_top_left_to_a8() {
        assert_eq!(SquareName::from_grid(0, 0).map(|s| s.to_string()).as_deref(), Some("a8"));
        assert_eq!(SquareName::from_grid(7, 7).map(|s| s.to_string()).as_deref(), Some("h1"));
        assert_eq!(SquareName::from_grid(7, 4).map(|s| s.to_string()).as_deref(), Some("e1"));
        assert!(SquareName::from_grid(8, 0).is_none());
    }

    #[test]
    fn parse_round_trips_every_square() {
        let all: Vec<SquareName> = SquareName::all().collect();
        assert_eq!(all.len(), 64);
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 64);
        for sq in all {
            let parsed: SquareName = sq.to_string().parse().expect("valid name");
            assert_eq!(parsed, sq);
            let (row, col) = sq.grid();
            assert_eq!(SquareName::from_grid(row, col), Some(sq));
        }
    }

    #[test]
    fn parse_rejects_out_of_range() {
        for bad in ["i1", "a9", "a0", "A1", "a", "a10", ""] {
            assert!(bad.parse::<SquareName>().is_err(), "{bad} should be rejected");
        }
    }
}
