//! C4 Move Classifier: pure functions turning a pair of engine evaluations
//! into centipawn loss, a quality label, win-probability-derived accuracy,
//! and (for Blunder/Mistake plies) a blunder sub-type.

use crate::board_analysis::helpers::{attackers_of, piece_value};
use crate::motifs::{compute_motifs, played};
use crate::phase::Phase;
use cozy_chess::{Board, Move, Piece};
use serde::{Deserialize, Serialize};

pub const CP_LOSS_MAX: i32 = 800;
const MISSED_MATE_PLY_LIMIT: u8 = 4;
const MOTIF_MIN_VALUE: u16 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl QualityLabel {
    pub fn from_cp_loss(cp_loss: i32) -> Self {
        match cp_loss {
            0 => Self::Best,
            1..=10 => Self::Excellent,
            11..=25 => Self::Good,
            26..=100 => Self::Inaccuracy,
            101..=300 => Self::Mistake,
            _ => Self::Blunder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlunderSubType {
    HangingPiece,
    MissedMate,
    MissedFork,
    MissedPin,
    MissedSkewer,
    MissedDiscovery,
    MissedCapture,
    BackRank,
    KingSafety,
    EndgameTechnique,
    Positional,
}

/// Centipawn loss, both inputs white-perspective. If both endpoints are
/// mate-flagged the transition is noise and loss is forced to zero.
pub fn cp_loss(prev_cp: i32, curr_cp: i32, prev_mate: bool, curr_mate: bool, white_just_moved: bool) -> i32 {
    if prev_mate && curr_mate {
        return 0;
    }
    let raw = if white_just_moved { prev_cp - curr_cp } else { curr_cp - prev_cp };
    raw.clamp(0, CP_LOSS_MAX)
}

/// Win probability from the side-to-move's own perspective. `cp` must
/// already be expressed from that side's perspective (negate a
/// white-perspective value before calling this for Black).
pub fn win_probability(cp: i32, is_mate: bool) -> f64 {
    if is_mate {
        return if cp > 0 { 1.0 } else { 0.0 };
    }
    1.0 / (1.0 + 10f64.powf(-(cp as f64) / 400.0))
}

/// chess.com-style per-move accuracy from the mover's own win-probability
/// swing, clamped to [0, 100].
pub fn accuracy(wp_before_mover: f64, wp_after_mover: f64) -> f64 {
    let drop_pct = (wp_before_mover - wp_after_mover) * 100.0;
    let value = 103.1668 * (-0.04354 * drop_pct).exp() - 3.1669;
    value.clamp(0.0, 100.0)
}

/// Everything the blunder sub-type classifier needs beyond the position and
/// the two candidate moves. Assembled by the Game Analyzer, which alone
/// tracks castling history and re-queries the engine for mate distance.
pub struct BlunderContext<'a> {
    pub position_before: &'a Board,
    pub played_move: Move,
    pub best_move: Move,
    pub phase: Phase,
    pub best_mate_in_plies: Option<u8>,
    pub played_mate_in_plies: Option<u8>,
    pub king_attackers_before: u8,
    pub king_attackers_after: u8,
    pub castling_rights_lost_non_castling: bool,
}

pub fn classify_blunder_subtype(label: QualityLabel, ctx: &BlunderContext) -> Option<BlunderSubType> {
    if !matches!(label, QualityLabel::Blunder | QualityLabel::Mistake) {
        return None;
    }

    if is_hanging_after_move(ctx.position_before, ctx.played_move) {
        return Some(BlunderSubType::HangingPiece);
    }

    let best_forces_mate = ctx.best_mate_in_plies.is_some_and(|n| n <= MISSED_MATE_PLY_LIMIT);
    let played_forces_mate = ctx.played_mate_in_plies.is_some_and(|n| n <= MISSED_MATE_PLY_LIMIT);
    if best_forces_mate && !played_forces_mate {
        return Some(BlunderSubType::MissedMate);
    }

    let best_motifs = compute_motifs(ctx.position_before, ctx.best_move);
    let played_motifs = compute_motifs(ctx.position_before, ctx.played_move);
    if best_motifs.fork && !played_motifs.fork {
        return Some(BlunderSubType::MissedFork);
    }
    if best_motifs.pin && !played_motifs.pin {
        return Some(BlunderSubType::MissedPin);
    }
    if best_motifs.skewer && !played_motifs.skewer {
        return Some(BlunderSubType::MissedSkewer);
    }
    if best_motifs.discovered_attack && !played_motifs.discovered_attack {
        return Some(BlunderSubType::MissedDiscovery);
    }

    if is_capture_of_value(ctx.position_before, ctx.best_move, MOTIF_MIN_VALUE)
        && !is_capture_of_value(ctx.position_before, ctx.played_move, MOTIF_MIN_VALUE)
    {
        return Some(BlunderSubType::MissedCapture);
    }

    if best_motifs.back_rank_mate {
        return Some(BlunderSubType::BackRank);
    }

    if ctx.king_attackers_after > ctx.king_attackers_before || ctx.castling_rights_lost_non_castling {
        return Some(BlunderSubType::KingSafety);
    }

    if ctx.phase == Phase::Endgame {
        return Some(BlunderSubType::EndgameTechnique);
    }

    Some(BlunderSubType::Positional)
}

fn is_hanging_after_move(before: &Board, mv: Move) -> bool {
    let Some(after) = played(before, mv) else { return false };
    let mover = before.side_to_move();
    let enemy = !mover;

    if after.piece_on(mv.to).is_some() {
        let attackers = attackers_of(&after, mv.to, enemy);
        let defenders = attackers_of(&after, mv.to, mover);
        if !attackers.is_empty() && defenders.is_empty() {
            return true;
        }
    }

    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for sq in after.pieces(piece) & after.colors(mover) {
            if sq == mv.to {
                continue;
            }
            let attackers = attackers_of(&after, sq, enemy);
            let defenders = attackers_of(&after, sq, mover);
            if attackers.is_empty() || !defenders.is_empty() {
                continue;
            }
            let attackers_before = attackers_of(before, sq, enemy);
            let defenders_before = attackers_of(before, sq, mover);
            let already_hanging = !attackers_before.is_empty() && defenders_before.is_empty();
            if !already_hanging {
                return true;
            }
        }
    }
    false
}

fn is_capture_of_value(before: &Board, mv: Move, min_value: u16) -> bool {
    let enemy = !before.side_to_move();
    before.colors(enemy).has(mv.to)
        && before
            .piece_on(mv.to)
            .is_some_and(|p| piece_value(p) >= min_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cp_loss_is_zero_between_two_mate_scores() {
        assert_eq!(cp_loss(1500, 1490, true, true, true), 0);
    }

    #[test]
    fn cp_loss_clamps_mate_collapse() {
        // prev = mate-in-2 white (clamped 1500), curr = -120 for white.
        assert_eq!(cp_loss(1500, -120, true, false, true), 800);
    }

    #[test]
    fn quality_thresholds_match_spec_boundaries() {
        assert_eq!(QualityLabel::from_cp_loss(0), QualityLabel::Best);
        assert_eq!(QualityLabel::from_cp_loss(10), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_cp_loss(25), QualityLabel::Good);
        assert_eq!(QualityLabel::from_cp_loss(100), QualityLabel::Inaccuracy);
        assert_eq!(QualityLabel::from_cp_loss(300), QualityLabel::Mistake);
        assert_eq!(QualityLabel::from_cp_loss(301), QualityLabel::Blunder);
    }

    #[test]
    fn worked_classification_example() {
        // eval drops +60 -> -250 after White's move: cp_loss = 60 - (-250) = 310, clamped to 310.
        let loss = cp_loss(60, -250, false, false, true);
        assert_eq!(loss, 310);
        assert_eq!(QualityLabel::from_cp_loss(loss), QualityLabel::Mistake);
    }

    #[test]
    fn win_probability_even_position_is_half() {
        let wp = win_probability(0, false);
        assert!((wp - 0.5).abs() < 1e-9);
    }

    #[test]
    fn win_probability_mate_is_binary() {
        assert_eq!(win_probability(1500, true), 1.0);
        assert_eq!(win_probability(-1500, true), 0.0);
    }

    #[test]
    fn accuracy_of_best_move_is_perfect() {
        let acc = accuracy(0.5, 0.5);
        assert!((acc - 100.0).abs() < 1e-6, "acc = {}", acc);
    }

    #[test]
    fn hanging_piece_detected_after_blundering_move() {
        // Black knight moves to d5 where it's attacked by a white bishop and
        // undefended.
        let before: Board = "4k3/3n4/8/8/8/5B2/8/4K3 b - - 0 1".parse().unwrap();
        let mv = Move {
            from: cozy_chess::Square::D7,
            to: cozy_chess::Square::D5,
            promotion: None,
        };
        assert!(is_hanging_after_move(&before, mv));
    }
}
