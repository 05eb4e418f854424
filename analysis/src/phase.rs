//! C5 Phase Detector: classifies a position as opening, middlegame, or
//! endgame from non-pawn material and ply count alone.

use cozy_chess::{Board, Color, Piece, Square};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Opening,
    Middlegame,
    Endgame,
}

impl Phase {
    /// Fixed normalization multiplier used when comparing cp_loss *between*
    /// phases (never applied to the raw per-phase value itself).
    pub fn normalization_multiplier(self) -> f64 {
        match self {
            Phase::Opening => 1.0,
            Phase::Middlegame => 1.0,
            Phase::Endgame => 0.7,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Opening => "opening",
            Phase::Middlegame => "middlegame",
            Phase::Endgame => "endgame",
        };
        f.write_str(s)
    }
}

/// `white_castled`/`black_castled` are carried by the caller's contract (the
/// Game Analyzer tracks castling history across a game) but are not
/// consumed by the current rule set below.
pub fn detect_phase(board: &Board, ply: u32, _white_castled: bool, _black_castled: bool) -> Phase {
    let material = non_pawn_material(board);
    let has_queen = !board.pieces(Piece::Queen).is_empty();
    let full_moves = ply / 2;

    if material == 0 || material <= 13 {
        return Phase::Endgame;
    }
    if !has_queen && material <= 20 {
        return Phase::Endgame;
    }
    if full_moves >= 40 && material <= 24 {
        return Phase::Endgame;
    }
    if full_moves >= 50 && material <= 30 {
        return Phase::Endgame;
    }
    if full_moves <= 15 && material > 26 && developed_minor_count(board) < 6 {
        return Phase::Opening;
    }
    Phase::Middlegame
}

fn non_pawn_material(board: &Board) -> u32 {
    let knights = board.pieces(Piece::Knight).len() as u32;
    let bishops = board.pieces(Piece::Bishop).len() as u32;
    let rooks = board.pieces(Piece::Rook).len() as u32;
    let queens = board.pieces(Piece::Queen).len() as u32;
    3 * (knights + bishops) + 5 * rooks + 9 * queens
}

fn developed_minor_count(board: &Board) -> u32 {
    const WHITE_KNIGHT_HOME: [Square; 2] = [Square::B1, Square::G1];
    const WHITE_BISHOP_HOME: [Square; 2] = [Square::C1, Square::F1];
    const BLACK_KNIGHT_HOME: [Square; 2] = [Square::B8, Square::G8];
    const BLACK_BISHOP_HOME: [Square; 2] = [Square::C8, Square::F8];

    let mut count = 0;
    for color in [Color::White, Color::Black] {
        let (knight_home, bishop_home) = if color == Color::White {
            (WHITE_KNIGHT_HOME, WHITE_BISHOP_HOME)
        } else {
            (BLACK_KNIGHT_HOME, BLACK_BISHOP_HOME)
        };
        for sq in board.pieces(Piece::Knight) & board.colors(color) {
            if !knight_home.contains(&sq) {
                count += 1;
            }
        }
        for sq in board.pieces(Piece::Bishop) & board.colors(color) {
            if !bishop_home.contains(&sq) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_opening() {
        let board = Board::default();
        assert_eq!(detect_phase(&board, 1, false, false), Phase::Opening);
    }

    #[test]
    fn bare_kings_and_pawns_is_endgame() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(detect_phase(&board, 60, true, true), Phase::Endgame);
    }

    #[test]
    fn queenless_light_position_is_endgame() {
        // Two rooks and one bishop, no queens: M = 5*2 + 3*1 = 13 <= 13.
        let board: Board = "4k1r1/8/8/8/8/8/4B3/4K1R1 w - - 0 1".parse().unwrap();
        assert_eq!(detect_phase(&board, 30, false, false), Phase::Endgame);
    }

    #[test]
    fn midgame_with_queens_and_developed_pieces() {
        // Reasonably developed middlegame-ish position, move 20.
        let board: Board = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQK2R w KQkq - 0 6"
            .parse()
            .unwrap();
        assert_eq!(detect_phase(&board, 40, true, true), Phase::Middlegame);
    }
}
