use crate::PositionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content of one square as reported by a piece classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareLabel {
    #[default]
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "wP")]
    WhitePawn,
    #[serde(rename = "wN")]
    WhiteKnight,
    #[serde(rename = "wB")]
    WhiteBishop,
    #[serde(rename = "wR")]
    WhiteRook,
    #[serde(rename = "wQ")]
    WhiteQueen,
    #[serde(rename = "wK")]
    WhiteKing,
    #[serde(rename = "bP")]
    BlackPawn,
    #[serde(rename = "bN")]
    BlackKnight,
    #[serde(rename = "bB")]
    BlackBishop,
    #[serde(rename = "bR")]
    BlackRook,
    #[serde(rename = "bQ")]
    BlackQueen,
    #[serde(rename = "bK")]
    BlackKing,
}

/// Class order of the trained square classifier (alphabetical by code).
pub const CLASSIFIER_ORDER: [SquareLabel; 13] = [
    SquareLabel::BlackBishop,
    SquareLabel::BlackKing,
    SquareLabel::BlackKnight,
    SquareLabel::BlackPawn,
    SquareLabel::BlackQueen,
    SquareLabel::BlackRook,
    SquareLabel::Empty,
    SquareLabel::WhiteBishop,
    SquareLabel::WhiteKing,
    SquareLabel::WhiteKnight,
    SquareLabel::WhitePawn,
    SquareLabel::WhiteQueen,
    SquareLabel::WhiteRook,
];

impl SquareLabel {
    /// Two-letter code (`wP`, `bK`, ...) or `empty`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::WhitePawn => "wP",
            Self::WhiteKnight => "wN",
            Self::WhiteBishop => "wB",
            Self::WhiteRook => "wR",
            Self::WhiteQueen => "wQ",
            Self::WhiteKing => "wK",
            Self::BlackPawn => "bP",
            Self::BlackKnight => "bN",
            Self::BlackBishop => "bB",
            Self::BlackRook => "bR",
            Self::BlackQueen => "bQ",
            Self::BlackKing => "bK",
        }
    }

    /// FEN letter: uppercase for white, lowercase for black, `None` for empty.
    pub const fn fen_char(self) -> Option<char> {
        match self {
            Self::Empty => None,
            Self::WhitePawn => Some('P'),
            Self::WhiteKnight => Some('N'),
            Self::WhiteBishop => Some('B'),
            Self::WhiteRook => Some('R'),
            Self::WhiteQueen => Some('Q'),
            Self::WhiteKing => Some('K'),
            Self::BlackPawn => Some('p'),
            Self::BlackKnight => Some('n'),
            Self::BlackBishop => Some('b'),
            Self::BlackRook => Some('r'),
            Self::BlackQueen => Some('q'),
            Self::BlackKing => Some('k'),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Parse a code, mapping anything unrecognized to [`SquareLabel::Empty`].
    pub fn from_code_lossy(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    pub const fn from_class_index(index: usize) -> Option<Self> {
        if index < CLASSIFIER_ORDER.len() {
            Some(CLASSIFIER_ORDER[index])
        } else {
            None
        }
    }
}

impl FromStr for SquareLabel {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASSIFIER_ORDER
            .iter()
            .copied()
            .find(|label| label.code() == s)
            .ok_or_else(|| PositionError::UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for SquareLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_order_is_alphabetical_and_complete() {
        let codes: Vec<&str> = CLASSIFIER_ORDER.iter().map(|l| l.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert_eq!(codes.len(), 13);
        assert!(codes.contains(&"empty"));
        for piece in ["B", "K", "N", "P", "Q", "R"] {
            assert!(codes.contains(&format!("w{piece}").as_str()));
            assert!(codes.contains(&format!("b{piece}").as_str()));
        }
    }

    #[test]
    fn fen_case_follows_colour() {
        assert_eq!(SquareLabel::WhiteKnight.fen_char(), Some('N'));
        assert_eq!(SquareLabel::BlackKnight.fen_char(), Some('n'));
        assert_eq!(SquareLabel::Empty.fen_char(), None);
    }

    #[test]
    fn lossy_parse_defaults_to_empty() {
        assert_eq!(SquareLabel::from_code_lossy("wQ"), SquareLabel::WhiteQueen);
        assert_eq!(SquareLabel::from_code_lossy("xZ"), SquareLabel::Empty);
        assert!("xZ".parse::<SquareLabel>().is_err());
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&SquareLabel::BlackRook).expect("serialize");
        assert_eq!(json, "\"bR\"");
        let back: SquareLabel = serde_json::from_str("\"empty\"").expect("deserialize");
        assert_eq!(back, SquareLabel::Empty);
    }
}
