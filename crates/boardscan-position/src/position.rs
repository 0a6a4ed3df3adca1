use crate::{encode_placement, PositionError, SquareLabel, SquareName, BOARD_SIZE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

const SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Label of every square on the board.
///
/// Always holds exactly 64 entries; the keyed constructors reject input that
/// does not name each square exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    labels: [SquareLabel; SQUARES],
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    pub fn empty() -> Self {
        Self {
            labels: [SquareLabel::Empty; SQUARES],
        }
    }

    /// Build from `(square name, label)` pairs covering all 64 squares once.
    pub fn from_labels<I, K>(entries: I) -> Result<Self, PositionError>
    where
        I: IntoIterator<Item = (K, SquareLabel)>,
        K: AsRef<str>,
    {
        let mut labels = [SquareLabel::Empty; SQUARES];
        let mut seen = [false; SQUARES];
        let mut count = 0usize;

        for (key, label) in entries {
            let square: SquareName = key.as_ref().parse()?;
            let idx = square.index();
            if seen[idx] {
                return Err(PositionError::DuplicateSquare(square.to_string()));
            }
            seen[idx] = true;
            labels[idx] = label;
            count += 1;
        }

        if count != SQUARES {
            return Err(PositionError::MissingSquare { got: count });
        }
        Ok(Self { labels })
    }

    /// Like [`Position::from_labels`] but takes raw classifier codes;
    /// unrecognized codes become [`SquareLabel::Empty`].
    pub fn from_codes<I, K, V>(entries: I) -> Result<Self, PositionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::from_labels(
            entries
                .into_iter()
                .map(|(k, v)| (k, SquareLabel::from_code_lossy(v.as_ref()))),
        )
    }

    pub fn get(&self, square: SquareName) -> SquareLabel {
        self.labels[square.index()]
    }

    pub fn set(&mut self, square: SquareName, label: SquareLabel) {
        self.labels[square.index()] = label;
    }

    /// Iterate rank 8 to rank 1, file `a` to `h`.
    pub fn iter(&self) -> impl Iterator<Item = (SquareName, SquareLabel)> + '_ {
        SquareName::all().map(move |sq| (sq, self.get(sq)))
    }

    pub fn piece_count(&self) -> usize {
        self.labels.iter().filter(|l| !l.is_empty()).count()
    }

    /// FEN piece-placement field for this position.
    pub fn to_placement(&self) -> String {
        encode_placement(self)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<String, SquareLabel> =
            self.iter().map(|(sq, l)| (sq.to_string(), l)).collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, SquareLabel>::deserialize(deserializer)?;
        Self::from_labels(map).map_err(serde::de::Error::custom)
    }
}
