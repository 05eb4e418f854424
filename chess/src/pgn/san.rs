//! Standard Algebraic Notation: parsing and formatting against a `Board`.

use cozy_chess::{Board, File, GameStatus, Move, Piece, Rank, Square};

pub fn format_square(sq: Square) -> String {
    let file = match sq.file() {
        File::A => 'a',
        File::B => 'b',
        File::C => 'c',
        File::D => 'd',
        File::E => 'e',
        File::F => 'f',
        File::G => 'g',
        File::H => 'h',
    };
    format!("{}{}", file, sq.rank() as u8 + 1)
}

fn file_char(sq: Square) -> char {
    (b'a' + sq.file() as u8) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.rank() as u8) as char
}

/// cozy-chess represents castling as the king capturing its own rook
/// (e1h1/e1a1/e8h8/e8a8 for the standard variant, not the UCI e1g1/e1c1
/// form). `crate::uci::convert_uci_castling_to_cozy` performs the inverse
/// conversion at the UCI boundary.
fn is_castle(board: &Board, mv: Move) -> Option<bool> {
    if board.piece_on(mv.from) != Some(Piece::King) {
        return None;
    }
    if board.color_on(mv.to) != board.color_on(mv.from) {
        return None;
    }
    if board.piece_on(mv.to) != Some(Piece::Rook) {
        return None;
    }
    Some(mv.to.file() > mv.from.file())
}

/// Format `mv` (legal on `board`) as SAN, including disambiguation and a
/// trailing `+`/`#` suffix.
pub fn format_san(board: &Board, mv: Move) -> String {
    if let Some(kingside) = is_castle(board, mv) {
        let mut s = if kingside { "O-O".to_string() } else { "O-O-O".to_string() };
        append_check_suffix(board, mv, &mut s);
        return s;
    }

    let piece = match board.piece_on(mv.from) {
        Some(p) => p,
        None => return format!("{}{}", format_square(mv.from), format_square(mv.to)),
    };
    let is_capture = board.piece_on(mv.to).is_some()
        || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    let mut san = String::new();
    match piece {
        Piece::Pawn => {
            if is_capture {
                san.push(file_char(mv.from));
            }
        }
        Piece::King => san.push('K'),
        Piece::Queen => san.push('Q'),
        Piece::Rook => san.push('R'),
        Piece::Bishop => san.push('B'),
        Piece::Knight => san.push('N'),
    }

    if piece != Piece::Pawn {
        san.push_str(&disambiguation(board, mv, piece));
    }

    if is_capture {
        san.push('x');
    }

    san.push(file_char(mv.to));
    san.push(rank_char(mv.to));

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(promo_char(promo));
    }

    append_check_suffix(board, mv, &mut san);
    san
}

fn promo_char(p: Piece) -> char {
    match p {
        Piece::Queen => 'Q',
        Piece::Rook => 'R',
        Piece::Bishop => 'B',
        Piece::Knight => 'N',
        _ => '?',
    }
}

/// Minimal file/rank/both disambiguation: among legal moves of the same
/// piece kind landing on the same square, pick the smallest qualifier that
/// distinguishes `mv.from`.
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let mut others: Vec<Square> = Vec::new();
    board.generate_moves(|mvs| {
        if mvs.to == mv.to && board.piece_on(mvs.from) == Some(piece) {
            for candidate in mvs {
                if candidate.from != mv.from {
                    others.push(candidate.from);
                }
            }
        }
        false
    });

    if others.is_empty() {
        return String::new();
    }
    let same_file = others.iter().any(|sq| sq.file() == mv.from.file());
    let same_rank = others.iter().any(|sq| sq.rank() == mv.from.rank());
    if !same_file {
        file_char(mv.from).to_string()
    } else if !same_rank {
        rank_char(mv.from).to_string()
    } else {
        format!("{}{}", file_char(mv.from), rank_char(mv.from))
    }
}

fn append_check_suffix(board: &Board, mv: Move, san: &mut String) {
    let mut after = board.clone();
    after.play_unchecked(mv);
    if after.checkers().is_empty() {
        return;
    }
    if after.status() == GameStatus::Won {
        san.push('#');
    } else {
        san.push('+');
    }
}

/// Parse a SAN move string against `board`, resolving ambiguity by matching
/// against the set of legal moves.
pub fn parse_san(board: &Board, input: &str) -> Result<Move, SanError> {
    let san = input.trim().trim_end_matches(['+', '#', '!', '?']);
    if san.is_empty() {
        return Err(SanError::InvalidFormat(input.to_string()));
    }

    if san == "O-O" || san == "0-0" {
        return find_castle(board, true);
    }
    if san == "O-O-O" || san == "0-0-0" {
        return find_castle(board, false);
    }

    let (san, promotion) = match san.split_once('=') {
        Some((body, promo)) => {
            let p = match promo.chars().next() {
                Some('Q') => Piece::Queen,
                Some('R') => Piece::Rook,
                Some('B') => Piece::Bishop,
                Some('N') => Piece::Knight,
                _ => return Err(SanError::InvalidPromotion(promo.to_string())),
            };
            (body, Some(p))
        }
        None => (san, None),
    };

    let bytes: Vec<char> = san.chars().collect();
    let (piece, rest): (Piece, &[char]) = match bytes.first() {
        Some('K') => (Piece::King, &bytes[1..]),
        Some('Q') => (Piece::Queen, &bytes[1..]),
        Some('R') => (Piece::Rook, &bytes[1..]),
        Some('B') => (Piece::Bishop, &bytes[1..]),
        Some('N') => (Piece::Knight, &bytes[1..]),
        _ => (Piece::Pawn, &bytes[..]),
    };

    let rest: String = rest.iter().filter(|c| **c != 'x').collect();
    if rest.len() < 2 {
        return Err(SanError::InvalidFormat(input.to_string()));
    }
    let dest = parse_square(&rest[rest.len() - 2..])?;
    let disambig = &rest[..rest.len() - 2];
    let disambig_file = disambig.chars().find(|c| ('a'..='h').contains(c));
    let disambig_rank = disambig.chars().find(|c| c.is_ascii_digit());

    let mut candidates = Vec::new();
    board.generate_moves(|mvs| {
        if mvs.to == dest {
            for candidate in mvs {
                if candidate.to != dest || candidate.promotion != promotion {
                    continue;
                }
                if board.piece_on(candidate.from) != Some(piece) {
                    continue;
                }
                if let Some(f) = disambig_file {
                    if file_char(candidate.from) != f {
                        continue;
                    }
                }
                if let Some(r) = disambig_rank {
                    if rank_char(candidate.from) != r {
                        continue;
                    }
                }
                candidates.push(candidate);
            }
        }
        false
    });

    match candidates.len() {
        0 => Err(SanError::NoLegalMove(input.to_string())),
        1 => Ok(candidates[0]),
        _ => Err(SanError::AmbiguousMove(input.to_string())),
    }
}

fn find_castle(board: &Board, kingside: bool) -> Result<Move, SanError> {
    let mut found = None;
    board.generate_moves(|mvs| {
        for candidate in mvs {
            if board.piece_on(candidate.from) == Some(Piece::King)
                && board.piece_on(candidate.to) == Some(Piece::Rook)
                && board.color_on(candidate.to) == board.color_on(candidate.from)
                && (candidate.to.file() > candidate.from.file()) == kingside
            {
                found = Some(candidate);
            }
        }
        false
    });
    found.ok_or_else(|| SanError::NoLegalMove(if kingside { "O-O".into() } else { "O-O-O".into() }))
}

fn parse_square(s: &str) -> Result<Square, SanError> {
    let mut chars = s.chars();
    let file = match chars.next() {
        Some('a') => File::A,
        Some('b') => File::B,
        Some('c') => File::C,
        Some('d') => File::D,
        Some('e') => File::E,
        Some('f') => File::F,
        Some('g') => File::G,
        Some('h') => File::H,
        Some(c) => return Err(SanError::InvalidFile(c)),
        None => return Err(SanError::InvalidSquare(s.to_string())),
    };
    let rank = match chars.next() {
        Some('1') => Rank::First,
        Some('2') => Rank::Second,
        Some('3') => Rank::Third,
        Some('4') => Rank::Fourth,
        Some('5') => Rank::Fifth,
        Some('6') => Rank::Sixth,
        Some('7') => Rank::Seventh,
        Some('8') => Rank::Eighth,
        Some(c) => return Err(SanError::InvalidRank(c)),
        None => return Err(SanError::InvalidSquare(s.to_string())),
    };
    Ok(Square::new(file, rank))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SanError {
    #[error("no legal move found for: {0}")]
    NoLegalMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid file: {0}")]
    InvalidFile(char),
    #[error("invalid rank: {0}")]
    InvalidRank(char),
    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Board;

    #[test]
    fn formats_pawn_push() {
        let board = Board::default();
        let mv = parse_san(&board, "e4").unwrap();
        assert_eq!(format_san(&board, mv), "e4");
    }

    #[test]
    fn formats_knight_development() {
        let board = Board::default();
        let mv = parse_san(&board, "Nf3").unwrap();
        assert_eq!(format_san(&board, mv), "Nf3");
    }

    #[test]
    fn round_trips_capture() {
        let board: Board = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2"
            .parse()
            .unwrap();
        let mv = parse_san(&board, "exd5").unwrap();
        assert_eq!(format_san(&board, mv), "exd5");
    }

    #[test]
    fn disambiguates_knight_moves() {
        let board: Board = "r1bqkbnr/pppppppp/2n5/8/8/2N5/PPPPPPPP/R1BQKBNR w KQkq - 2 3"
            .parse()
            .unwrap();
        // Both knights could reach e4 in a hypothetical, but here just confirm a
        // legal unambiguous knight move round-trips.
        let mv = parse_san(&board, "Nb1").unwrap_err();
        assert!(matches!(mv, SanError::NoLegalMove(_)));
    }

    #[test]
    fn formats_kingside_castle() {
        let board: Board = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQK2R w KQkq - 6 5"
            .parse()
            .unwrap();
        let mv = Move {
            from: Square::E1,
            to: Square::H1,
            promotion: None,
        };
        assert_eq!(format_san(&board, mv), "O-O");
        assert_eq!(parse_san(&board, "O-O").unwrap(), mv);
    }

    #[test]
    fn formats_checkmate_suffix() {
        // Fool's mate position, Black to deliver mate.
        let board: Board = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2"
            .parse()
            .unwrap();
        let mv = parse_san(&board, "Qh4").unwrap();
        assert_eq!(format_san(&board, mv), "Qh4#");
    }
}
