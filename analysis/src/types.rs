//! Per-move evaluation row shared across move classification, the
//! psychological profiler, and critical-position detection. This is the
//! shape the Game Analyzer emits once per ply; persistence just stores it.

use crate::classify::{BlunderSubType, QualityLabel};
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Odd plies are White's, even plies are Black's (ply 1 = White's first move).
pub fn is_white_ply(ply: u32) -> bool {
    ply % 2 == 1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEvaluation {
    pub ply: u32,
    pub fen_before: String,
    /// Single-letter piece code of the piece that moved: P, N, B, R, Q, K.
    pub piece_moved: char,
    pub played_uci: String,
    pub played_san: String,
    pub best_move_uci: String,
    pub best_move_san: String,
    /// White-perspective centipawns, already normalized at the engine
    /// driver boundary (mate scores collapsed to `±MATE_SCORE_CP`).
    pub eval_before_cp: i32,
    pub eval_before_mate: bool,
    pub eval_after_cp: i32,
    pub eval_after_mate: bool,
    pub eval_best_cp: i32,
    pub eval_best_mate: bool,
    pub quality: QualityLabel,
    pub cp_loss: i32,
    /// `cp_loss as f64 * phase.normalization_multiplier()`, populated on
    /// every row so phase-weighted aggregates never need to recompute it.
    pub weighted_cp_loss: f64,
    pub blunder_subtype: Option<BlunderSubType>,
    pub phase: Phase,
    pub accuracy: f64,
    pub pv: Vec<String>,
    pub depth: u8,
    pub clock_ms: Option<u64>,
    pub degraded: bool,
}

impl MoveEvaluation {
    pub fn is_white(&self) -> bool {
        is_white_ply(self.ply)
    }
}

/// Lifecycle of one game's analysis. `Analyzing` is re-saved after every ply
/// so a crashed worker can resume from `current_ply` instead of restarting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Queued,
    Analyzing { current_ply: u32, total_plies: u32 },
    Complete,
    Failed { error: String },
}

/// Per-color tally over one game's `MoveEvaluation` rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ColorSummary {
    pub overall_cpl: f64,
    pub opening_cpl: f64,
    pub middlegame_cpl: f64,
    pub endgame_cpl: f64,
    pub accuracy: f64,
    pub best_count: u32,
    pub excellent_count: u32,
    pub good_count: u32,
    pub inaccuracy_count: u32,
    pub mistake_count: u32,
    pub blunder_count: u32,
}

impl ColorSummary {
    pub fn record(&mut self, quality: QualityLabel) {
        match quality {
            QualityLabel::Best => self.best_count += 1,
            QualityLabel::Excellent => self.excellent_count += 1,
            QualityLabel::Good => self.good_count += 1,
            QualityLabel::Inaccuracy => self.inaccuracy_count += 1,
            QualityLabel::Mistake => self.mistake_count += 1,
            QualityLabel::Blunder => self.blunder_count += 1,
        }
    }
}

/// One row per analyzed game: the full per-ply breakdown plus both colors'
/// summaries. Which color is "the player" for a given user is resolved
/// downstream by the aggregator (a shared game can be studied from either
/// side), so both summaries are always populated rather than just one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub game_id: String,
    pub status: ReviewStatus,
    pub moves: Vec<MoveEvaluation>,
    pub white: ColorSummary,
    pub black: ColorSummary,
    pub total_plies: u32,
    pub analyzed_plies: u32,
    pub analysis_depth: u8,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub winner: Option<String>,
}

/// Fold a completed set of per-ply rows into the two color summaries.
/// Invariant: counts equal the tally of `moves` rows with that quality for
/// each color (enforced structurally — this is the only place counts are
/// produced).
pub fn summarize_moves(moves: &[MoveEvaluation]) -> (ColorSummary, ColorSummary) {
    let mut white = ColorSummary::default();
    let mut black = ColorSummary::default();

    for m in moves {
        let summary = if m.is_white() { &mut white } else { &mut black };
        summary.record(m.quality);
    }

    for (summary, want_white) in [(&mut white, true), (&mut black, false)] {
        let own: Vec<&MoveEvaluation> = moves.iter().filter(|m| m.is_white() == want_white).collect();
        summary.overall_cpl = avg_cp_loss(&own);
        summary.opening_cpl = avg_cp_loss(&own.iter().filter(|m| m.phase == crate::phase::Phase::Opening).copied().collect::<Vec<_>>());
        summary.middlegame_cpl = avg_cp_loss(&own.iter().filter(|m| m.phase == crate::phase::Phase::Middlegame).copied().collect::<Vec<_>>());
        summary.endgame_cpl = avg_cp_loss(&own.iter().filter(|m| m.phase == crate::phase::Phase::Endgame).copied().collect::<Vec<_>>());
        summary.accuracy = if own.is_empty() {
            0.0
        } else {
            own.iter().map(|m| m.accuracy).sum::<f64>() / own.len() as f64
        };
    }

    (white, black)
}

fn avg_cp_loss(moves: &[&MoveEvaluation]) -> f64 {
    if moves.is_empty() {
        0.0
    } else {
        moves.iter().map(|m| m.cp_loss as f64).sum::<f64>() / moves.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ply_parity_matches_white_to_move() {
        assert!(is_white_ply(1));
        assert!(!is_white_ply(2));
        assert!(is_white_ply(3));
    }

    fn sample(ply: u32, cp_loss: i32, quality: QualityLabel) -> MoveEvaluation {
        MoveEvaluation {
            ply,
            fen_before: String::new(),
            piece_moved: 'P',
            played_uci: String::new(),
            played_san: String::new(),
            best_move_uci: String::new(),
            best_move_san: String::new(),
            eval_before_cp: 0,
            eval_before_mate: false,
            eval_after_cp: -cp_loss,
            eval_after_mate: false,
            eval_best_cp: 0,
            eval_best_mate: false,
            quality,
            cp_loss,
            weighted_cp_loss: cp_loss as f64,
            blunder_subtype: None,
            phase: crate::phase::Phase::Middlegame,
            accuracy: 95.0,
            pv: vec![],
            depth: 18,
            clock_ms: None,
            degraded: false,
        }
    }

    #[test]
    fn summarize_splits_by_color_and_counts_quality() {
        let moves = vec![
            sample(1, 0, QualityLabel::Best),
            sample(2, 300, QualityLabel::Blunder),
            sample(3, 10, QualityLabel::Excellent),
        ];
        let (white, black) = summarize_moves(&moves);
        assert_eq!(white.best_count, 1);
        assert_eq!(white.excellent_count, 1);
        assert_eq!(black.blunder_count, 1);
        assert_eq!(black.overall_cpl, 300.0);
    }
}
