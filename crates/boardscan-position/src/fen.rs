//! FEN piece-placement encoding.
//!
//! Only the first FEN field is produced; side to move, castling rights,
//! en-passant square and clocks are left to the caller.

use crate::{Position, SquareName, BOARD_SIZE};

/// Encode `position` as the FEN piece-placement field, rank 8 first.
pub fn encode_placement(position: &Position) -> String {
    let mut ranks = Vec::with_capacity(BOARD_SIZE);

    for rank in (1..=BOARD_SIZE as u8).rev() {
        let mut segment = String::with_capacity(BOARD_SIZE);
        let mut empty_run = 0u8;

        for file in 0..BOARD_SIZE as u8 {
            let Some(square) = SquareName::new(file, rank) else {
                continue;
            };
            match position.get(square).fen_char() {
                None => empty_run += 1,
                Some(c) => {
                    if empty_run > 0 {
                        segment.push((b'0' + empty_run) as char);
                        empty_run = 0;
                    }
                    segment.push(c);
                }
            }
        }

        if empty_run > 0 {
            segment.push((b'0' + empty_run) as char);
        }
        ranks.push(segment);
    }

    ranks.join("/")
}
