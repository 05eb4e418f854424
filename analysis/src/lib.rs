pub mod advanced;
pub mod aggregate;
pub mod board_analysis;
pub mod classify;
pub mod motifs;
pub mod persona;
pub mod phase;
pub mod puzzle;
pub mod types;

pub use advanced::*;
pub use aggregate::{
    compute_opening_repertoire, compute_overview, compute_piece_performance, compute_skill_radar,
    compute_time_pressure_slice, compute_weaknesses, GameRecord, Overview, PhaseMeans, PhaseWeakness,
    PiecePerformance, OpeningRepertoireEntry, SkillRadar, TimeControlWeakness, TimePressureSlice, Trend,
    Weaknesses,
};
pub use board_analysis::*;
pub use classify::{accuracy, classify_blunder_subtype, cp_loss, win_probability, BlunderContext, BlunderSubType, QualityLabel};
pub use motifs::{compute_motifs, MotifSet};
pub use persona::{
    compute_persona_metrics, synthesize_persona_report, PersonaMetrics, PersonaReport, PhaseBreakdownRow, Persona,
};
pub use phase::{detect_phase, Phase};
pub use puzzle::{
    compute_puzzle_themes, has_real_tactic, is_puzzle_candidate, puzzle_key, schedule_next_review,
    PuzzleCandidateInput, SchedulerState, SolutionStep,
};
pub use types::{is_white_ply, summarize_moves, ColorSummary, GameAnalysis, MoveEvaluation, ReviewStatus};
pub use chess::{EngineAnalysis, Score, EVAL_CLAMP_CP, MATE_SCORE_CP};
