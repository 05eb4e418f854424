//! Structural tactical motif predicates (C4.7 / C4.3 sub-typing / C8 theming).
//!
//! Each predicate is a pure boolean over a position and a candidate move,
//! evaluated by playing the move and inspecting the resulting board. These
//! are deliberately independent of the richer [`crate::board_analysis`]
//! detector pipeline (which scores and ranks tags for display) — here we
//! only need yes/no answers to drive classification.

use crate::board_analysis::helpers::{attackers_of, piece_attacks, piece_value};
use cozy_chess::{Board, Color, Move, Piece, Rank};

const MOTIF_MIN_VALUE: u16 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotifSet {
    pub fork: bool,
    pub pin: bool,
    pub skewer: bool,
    pub discovered_attack: bool,
    pub back_rank_mate: bool,
    pub deflection: bool,
}

impl MotifSet {
    pub fn any(&self) -> bool {
        self.fork || self.pin || self.skewer || self.discovered_attack || self.back_rank_mate || self.deflection
    }
}

/// Computes every §4.7 predicate for `mv` played from `before`. Returns all
/// `false` if `mv` is illegal in `before`.
pub fn compute_motifs(before: &Board, mv: Move) -> MotifSet {
    let Some(after) = played(before, mv) else {
        return MotifSet::default();
    };
    MotifSet {
        fork: is_fork(before, &after, mv),
        pin: is_pin(&after, mv),
        skewer: is_skewer(before, &after, mv),
        discovered_attack: is_discovered_attack(before, &after, mv),
        back_rank_mate: is_back_rank_mate(&after),
        deflection: is_deflection(before, &after, mv),
    }
}

pub(crate) fn played(before: &Board, mv: Move) -> Option<Board> {
    before.clone().try_play(mv).ok()
}

/// Fork: after the move, the moving piece attacks >=2 distinct opponent
/// targets each worth >=3 points, or the opposing king.
pub fn is_fork(before: &Board, after: &Board, mv: Move) -> bool {
    let mover = before.side_to_move();
    let enemy = !mover;
    let Some(piece) = after.piece_on(mv.to) else { return false };

    let attacks = piece_attacks(after, mv.to, piece, mover) & after.colors(enemy);
    let qualifying = attacks
        .into_iter()
        .filter(|&sq| {
            after
                .piece_on(sq)
                .map(|p| p == Piece::King || piece_value(p) >= MOTIF_MIN_VALUE)
                .unwrap_or(false)
        })
        .count();
    qualifying >= 2
}

/// Pin: after the move, the piece that just moved pins an opponent piece to
/// a higher-value piece (or king) behind it on the same line.
pub fn is_pin(after: &Board, mv: Move) -> bool {
    let Some(piece) = after.piece_on(mv.to) else { return false };
    if !matches!(piece, Piece::Bishop | Piece::Rook | Piece::Queen) {
        return false;
    }
    let mover = !after.side_to_move();
    let enemy = !mover;
    let attacks = piece_attacks(after, mv.to, piece, mover) & after.colors(enemy);

    for front_sq in attacks {
        let Some(front_piece) = after.piece_on(front_sq) else { continue };
        if let Some(back_sq) = piece_behind(after, mv.to, front_sq, enemy) {
            if let Some(back_piece) = after.piece_on(back_sq) {
                if back_piece == Piece::King || piece_value(back_piece) > piece_value(front_piece) {
                    return true;
                }
            }
        }
    }
    false
}

/// Skewer: moving piece is a slider, the move gives check, and the first
/// enemy piece behind the king along the same ray is worth >=3 points.
pub fn is_skewer(before: &Board, after: &Board, mv: Move) -> bool {
    let mover = before.side_to_move();
    let enemy = !mover;
    let Some(piece) = after.piece_on(mv.to) else { return false };
    if !matches!(piece, Piece::Bishop | Piece::Rook | Piece::Queen) {
        return false;
    }
    if after.checkers().is_empty() {
        return false;
    }
    let king_bb = after.pieces(Piece::King) & after.colors(enemy);
    let Some(king_sq) = king_bb.into_iter().next() else { return false };
    if !ray_aligned(mv.to, king_sq) {
        return false;
    }
    match piece_behind(after, mv.to, king_sq, enemy) {
        Some(sq) => after
            .piece_on(sq)
            .map(|p| piece_value(p) >= MOTIF_MIN_VALUE)
            .unwrap_or(false),
        None => false,
    }
}

/// Discovered attack: a mover-side piece other than the one just moved now
/// attacks an opponent piece worth >=3 points that it did not attack before.
pub fn is_discovered_attack(before: &Board, after: &Board, mv: Move) -> bool {
    let mover = before.side_to_move();
    let enemy = !mover;

    for piece in Piece::ALL {
        let squares = before.pieces(piece) & before.colors(mover);
        for sq in squares {
            if sq == mv.from || sq == mv.to {
                continue;
            }
            let before_targets = piece_attacks(before, sq, piece, mover) & before.colors(enemy);
            let after_targets = piece_attacks(after, sq, piece, mover) & after.colors(enemy);

            for target in after_targets {
                if before_targets.has(target) {
                    continue;
                }
                if let Some(target_piece) = after.piece_on(target) {
                    if piece_value(target_piece) >= MOTIF_MIN_VALUE {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Back-rank mate: the opponent king is mated and sits on its own back rank.
pub fn is_back_rank_mate(after: &Board) -> bool {
    if after.status() != cozy_chess::GameStatus::Won {
        return false;
    }
    let mated_side = after.side_to_move();
    let king_bb = after.pieces(Piece::King) & after.colors(mated_side);
    let Some(king_sq) = king_bb.into_iter().next() else { return false };
    let back_rank = if mated_side == Color::White { Rank::First } else { Rank::Eighth };
    king_sq.rank() == back_rank
}

/// Deflection: the move captures a piece that was the sole defender of some
/// other enemy piece (>=3 points), leaving it undefended and attacked.
pub fn is_deflection(before: &Board, after: &Board, mv: Move) -> bool {
    let mover = before.side_to_move();
    let enemy = !mover;

    let Some(captured_sq) = Some(mv.to).filter(|&sq| before.colors(enemy).has(sq)) else {
        return false;
    };

    for candidate in before.colors(enemy) {
        if candidate == captured_sq {
            continue;
        }
        let Some(candidate_piece) = before.piece_on(candidate) else { continue };
        if piece_value(candidate_piece) < MOTIF_MIN_VALUE {
            continue;
        }
        let defenders_before = attackers_of(before, candidate, enemy);
        let sole_defender = defenders_before.len() == 1 && defenders_before.has(captured_sq);
        if !sole_defender {
            continue;
        }
        if !attackers_of(after, candidate, mover).is_empty() {
            return true;
        }
    }
    false
}

fn ray_aligned(from: cozy_chess::Square, to: cozy_chess::Square) -> bool {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    df == 0 || dr == 0 || df.abs() == dr.abs()
}

fn piece_behind(
    board: &Board,
    from: cozy_chess::Square,
    through: cozy_chess::Square,
    target_color: Color,
) -> Option<cozy_chess::Square> {
    let from_rank = from.rank() as i8;
    let from_file = from.file() as i8;
    let through_rank = through.rank() as i8;
    let through_file = through.file() as i8;

    let dr = (through_rank - from_rank).signum();
    let df = (through_file - from_file).signum();
    if dr == 0 && df == 0 {
        return None;
    }

    let mut r = through_rank + dr;
    let mut f = through_file + df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        let rank = Rank::try_index(r as usize)?;
        let file = cozy_chess::File::try_index(f as usize)?;
        let sq = cozy_chess::Square::new(file, rank);
        if board.occupied().has(sq) {
            return board.colors(target_color).has(sq).then_some(sq);
        }
        r += dr;
        f += df;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Square;

    fn mv(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None }
    }

    #[test]
    fn detects_knight_fork() {
        // Knight jumps h5-f6, forking king on g8 and rook on e8.
        let before: Board = "4r1k1/8/8/7N/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let motifs = compute_motifs(&before, mv(Square::H5, Square::F6));
        assert!(motifs.fork, "Nf6 should fork king g8 and rook e8");
    }

    #[test]
    fn starting_position_has_no_motifs() {
        let before = Board::default();
        let motifs = compute_motifs(&before, mv(Square::E2, Square::E4));
        assert_eq!(motifs, MotifSet::default());
    }

    #[test]
    fn detects_back_rank_mate() {
        // White rook a7 to a8 is mate: black king g8 boxed in by own pawns.
        let before: Board = "6k1/R5pp/8/8/8/8/8/6K1 w - - 0 1".parse().unwrap();
        let motifs = compute_motifs(&before, mv(Square::A7, Square::A8));
        assert!(motifs.back_rank_mate);
    }
}
