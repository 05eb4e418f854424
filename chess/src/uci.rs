//! UCI (Universal Chess Interface) move notation utilities.

use crate::pgn::san::format_square;
use cozy_chess::{File, Move, Piece, Rank, Square};

/// Convert UCI castling notation to cozy_chess notation.
///
/// UCI uses standard notation (king moves 2 squares): e1g1, e1c1, e8g8, e8c8.
/// cozy_chess uses king-to-rook notation: e1h1, e1a1, e8h8, e8a8.
///
/// Checks whether `mv` looks like a UCI castling move and, if so, converts it
/// to the matching entry in `legal_moves`.
pub fn convert_uci_castling_to_cozy(mv: Move, legal_moves: &[Move]) -> Move {
    let is_rank_1_or_8 = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let is_e_file = matches!(mv.from.file(), File::E);
    let is_g_or_c_file = matches!(mv.to.file(), File::G | File::C);

    if is_rank_1_or_8 && is_e_file && is_g_or_c_file && mv.promotion.is_none() {
        let target_square = match (mv.from.rank(), mv.to.file()) {
            (Rank::First, File::G) => Square::new(File::H, Rank::First),
            (Rank::First, File::C) => Square::new(File::A, Rank::First),
            (Rank::Eighth, File::G) => Square::new(File::H, Rank::Eighth),
            (Rank::Eighth, File::C) => Square::new(File::A, Rank::Eighth),
            _ => return mv,
        };
        let converted = Move {
            from: mv.from,
            to: target_square,
            promotion: None,
        };
        if legal_moves.contains(&converted) {
            return converted;
        }
    }
    mv
}

/// The inverse of `convert_uci_castling_to_cozy`: render a cozy_chess
/// castling move (king captures own rook) in the wire-facing UCI form
/// engines and clients expect (king moves two squares).
pub fn convert_cozy_castling_to_uci(mv: Move, board: &cozy_chess::Board) -> Move {
    if board.piece_on(mv.from) != Some(Piece::King) {
        return mv;
    }
    if board.color_on(mv.to) != board.color_on(mv.from) || board.piece_on(mv.to) != Some(Piece::Rook) {
        return mv;
    }
    let kingside = mv.to.file() > mv.from.file();
    let target_file = if kingside { File::G } else { File::C };
    Move {
        from: mv.from,
        to: Square::new(target_file, mv.from.rank()),
        promotion: None,
    }
}

fn format_piece(p: Piece) -> char {
    match p {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        _ => '?',
    }
}

/// Format a move in UCI notation (e.g., "e2e4", "e7e8q").
pub fn format_uci_move(mv: Move) -> String {
    let mut s = format!("{}{}", format_square(mv.from), format_square(mv.to));
    if let Some(promo) = mv.promotion {
        s.push(format_piece(promo));
    }
    s
}

/// Parse a UCI move string (does not resolve castling notation; call
/// `convert_uci_castling_to_cozy` afterwards against the legal move list).
pub fn parse_uci_move(s: &str) -> Option<Move> {
    let s = s.trim();
    if s.len() < 4 {
        return None;
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    let promotion = s.chars().nth(4).and_then(|c| match c {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    });
    Some(Move { from, to, promotion })
}

fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = match chars.next()? {
        'a' => File::A,
        'b' => File::B,
        'c' => File::C,
        'd' => File::D,
        'e' => File::E,
        'f' => File::F,
        'g' => File::G,
        'h' => File::H,
        _ => return None,
    };
    let rank = match chars.next()? {
        '1' => Rank::First,
        '2' => Rank::Second,
        '3' => Rank::Third,
        '4' => Rank::Fourth,
        '5' => Rank::Fifth,
        '6' => Rank::Sixth,
        '7' => Rank::Seventh,
        '8' => Rank::Eighth,
        _ => return None,
    };
    Some(Square::new(file, rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Piece;

    #[test]
    fn test_format_uci_move() {
        let mv = Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        };
        assert_eq!(format_uci_move(mv), "e2e4");
    }

    #[test]
    fn test_format_uci_move_with_promotion() {
        let mv = Move {
            from: Square::new(File::E, Rank::Seventh),
            to: Square::new(File::E, Rank::Eighth),
            promotion: Some(Piece::Queen),
        };
        assert_eq!(format_uci_move(mv), "e7e8q");
    }

    #[test]
    fn round_trips_parse() {
        let mv = parse_uci_move("e7e8q").unwrap();
        assert_eq!(format_uci_move(mv), "e7e8q");
    }
}
