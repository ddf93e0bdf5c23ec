//! FEN (Forsyth-Edwards Notation) load and emit for `Board`.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;
use thiserror::Error;

use super::Board;

/// Errors surfaced from a malformed FEN string. Corresponds to spec's `BadFEN`
/// error kind — the only error this crate surfaces across its boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 space-separated FEN fields, found {0}")]
    MissingField(usize),
    #[error("piece placement must describe 8 ranks, found {0}")]
    WrongRankCount(usize),
    #[error("rank does not sum to 8 squares: `{0}`")]
    MalformedRank(String),
    #[error("unrecognized piece placement character `{0}`")]
    UnknownPiece(char),
    #[error("side-to-move field must be `w` or `b`, found `{0}`")]
    BadSideToMove(String),
    #[error("unrecognized castling-rights character `{0}`")]
    BadCastlingRights(char),
    #[error("en-passant field is not a valid square: `{0}`")]
    BadEnPassant(String),
}

impl Board {
    /// Parses a FEN string (at least the first four fields are required; an
    /// absent halfmove/fullmove pair defaults to `0`/`1`) and overwrites
    /// `self` in place. Returns the side to move on success.
    pub fn set_fen(&mut self, fen: &str) -> Result<Color, FenError> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or(FenError::MissingField(1))?;
        let side_field = fields.next().ok_or(FenError::MissingField(2))?;
        let castling_field = fields.next().ok_or(FenError::MissingField(3))?;
        let ep_field = fields.next().ok_or(FenError::MissingField(4))?;
        let halfmove_field = fields.next();
        let fullmove_field = fields.next();

        let mut scratch: [Option<(Piece, Color)>; 64] = [None; 64];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top;
            let mut file = 0usize;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as usize;
                } else {
                    let (piece, color) = CHAR_TO_PC[ch as usize % 128]
                        .filter(|_| ch.is_ascii())
                        .ok_or(FenError::UnknownPiece(ch))?;
                    if file >= 8 {
                        return Err(FenError::MalformedRank(rank_str.to_string()));
                    }
                    scratch[rank * 8 + file] = Some((piece, color));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::MalformedRank(rank_str.to_string()));
            }
        }

        let side = match side_field {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        let mut castling_rights = 0u8;
        if castling_field != "-" {
            for ch in castling_field.chars() {
                castling_rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(FenError::BadCastlingRights(other)),
                };
            }
        }

        let en_passant = if ep_field == "-" {
            None
        } else {
            Some(
                ep_field
                    .parse::<Square>()
                    .map_err(|_| FenError::BadEnPassant(ep_field.to_string()))?,
            )
        };

        let halfmove_clock = halfmove_field
            .and_then(|f| f.parse::<u32>().ok())
            .unwrap_or(0);
        let fullmove_number = fullmove_field
            .and_then(|f| f.parse::<u32>().ok())
            .unwrap_or(1);

        *self = Board::new_empty();
        for (idx, slot) in scratch.iter().enumerate() {
            if let Some((piece, color)) = slot {
                let bb = self.bb(*color, *piece) | (1u64 << idx);
                self.set_bb(*color, *piece, bb);
            }
        }

        self.side_to_move = side;
        self.castling_rights = castling_rights;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.history.clear();
        self.refresh_zobrist();

        Ok(side)
    }

    /// Emits the canonical FEN for the current position (six fields).
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(64);
        for rank_from_top in 0..8 {
            let rank = 7 - rank_from_top;
            let mut empty_run = 0u8;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank as u8);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        placement.push(PC_TO_CHAR[idx]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank_from_top != 7 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WK != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BK != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}

/// Legacy three-way signal some hosts want instead of the typed `FenError`:
/// `0`/`1` for Black/White to move after a successful load, `2` for a bad FEN.
pub fn load_fen_exit_code(fen: &str) -> u8 {
    let mut board = Board::new_empty();
    match board.set_fen(fen) {
        Ok(Color::Black) => 0,
        Ok(Color::White) => 1,
        Err(_) => 2,
    }
}
