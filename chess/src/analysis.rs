//! Engine evaluation score type, shared by the engine driver, the move
//! classifier, and persistence.
//!
//! All arithmetic on scores happens in white-perspective centipawns. Mate
//! scores are normalized to a fixed magnitude for arithmetic while the fact
//! that a position is mate-scored is preserved separately (`is_mate`).

use cozy_chess::Color;

/// Magnitude used for mate scores once converted to white-perspective
/// centipawns for arithmetic. Chosen over the alternative ±10000 convention
/// seen elsewhere; this crate standardizes on ±1500 everywhere.
pub const MATE_SCORE_CP: i32 = 1500;

/// Clamp applied to every centipawn evaluation stored on a row.
pub const EVAL_CLAMP_CP: i32 = 1500;

/// Engine evaluation score as reported by the engine, relative to the side
/// to move at the position queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Positive: side to move mates in `n` plies/2. Negative: side to move
    /// gets mated in `n` plies/2.
    Mate(i32),
}

impl Score {
    /// True if this score reports a forced mate rather than a material
    /// evaluation.
    pub fn is_mate(self) -> bool {
        matches!(self, Self::Mate(_))
    }

    /// Convert a side-to-move-relative score into a white-perspective
    /// centipawn value, clamped to `±EVAL_CLAMP_CP`. Mate scores collapse to
    /// `±MATE_SCORE_CP` depending on sign and perspective.
    pub fn to_white_cp(self, side_to_move: Color) -> i32 {
        let stm_relative = match self {
            Self::Centipawns(cp) => cp.clamp(-EVAL_CLAMP_CP, EVAL_CLAMP_CP),
            Self::Mate(n) => {
                if n >= 0 {
                    MATE_SCORE_CP
                } else {
                    -MATE_SCORE_CP
                }
            }
        };
        match side_to_move {
            Color::White => stm_relative,
            Color::Black => -stm_relative,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Centipawns(cp) => format!("{:+.2}", *cp as f64 / 100.0),
            Self::Mate(m) => {
                if *m >= 0 {
                    format!("+M{}", m)
                } else {
                    format!("-M{}", m.abs())
                }
            }
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A snapshot of engine analysis output for one requested position.
#[derive(Debug, Clone, Default)]
pub struct EngineAnalysis {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub time_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    /// Principal variation as UCI move strings.
    pub pv: Vec<String>,
    pub nps: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centipawn_perspective_flip() {
        assert_eq!(Score::Centipawns(60).to_white_cp(Color::White), 60);
        assert_eq!(Score::Centipawns(60).to_white_cp(Color::Black), -60);
    }

    #[test]
    fn centipawn_clamp() {
        assert_eq!(Score::Centipawns(5000).to_white_cp(Color::White), EVAL_CLAMP_CP);
        assert_eq!(Score::Centipawns(-5000).to_white_cp(Color::White), -EVAL_CLAMP_CP);
    }

    #[test]
    fn mate_collapses_to_fixed_magnitude() {
        assert_eq!(Score::Mate(3).to_white_cp(Color::White), MATE_SCORE_CP);
        assert_eq!(Score::Mate(-2).to_white_cp(Color::White), -MATE_SCORE_CP);
        assert_eq!(Score::Mate(3).to_white_cp(Color::Black), -MATE_SCORE_CP);
    }
}
