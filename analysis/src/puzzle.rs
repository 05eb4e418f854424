//! C8 Puzzle Extractor: candidacy rule, solution-line theme tagging, and the
//! SM-2-family spaced-repetition scheduler. Solution-line computation itself
//! requires repeated engine queries and is driven by the caller (the Game
//! Analyzer); this module only judges the position/move data it's handed.

use crate::classify::QualityLabel;
use crate::motifs::{compute_motifs, MotifSet};
use crate::phase::Phase;
use cozy_chess::{Board, Color, Move, Piece};
use serde::{Deserialize, Serialize};

const CANDIDATE_EVAL_CEILING_CP: i32 = 600;
const MULTIPV_GAP_CP: i32 = 300;
const MOTIF_MIN_VALUE: u16 = 300;

/// Everything the Game Analyzer already knows about a Blunder/Mistake ply,
/// needed to decide whether it's worth turning into a puzzle.
pub struct PuzzleCandidateInput {
    pub quality: QualityLabel,
    /// White-perspective cp before the mistake.
    pub cp_before: i32,
    pub played_move: Move,
    pub best_move: Move,
    /// Gap in cp between the top-2 multipv lines; `None` when fewer than two
    /// legal moves existed.
    pub multipv_top2_gap_cp: Option<i32>,
    pub best_move_is_mate: bool,
}

pub fn is_puzzle_candidate(input: &PuzzleCandidateInput) -> bool {
    if !matches!(input.quality, QualityLabel::Blunder | QualityLabel::Mistake) {
        return false;
    }
    if input.cp_before.abs() >= CANDIDATE_EVAL_CEILING_CP {
        return false;
    }
    if input.played_move == input.best_move {
        return false;
    }
    match input.multipv_top2_gap_cp {
        Some(gap) => gap >= MULTIPV_GAP_CP,
        None => input.best_move_is_mate,
    }
}

/// One ply of a computed solution line: the position it was played from and
/// the move played.
pub struct SolutionStep {
    pub position_before: Board,
    pub mv: Move,
}

/// Theme tags attached to a puzzle. Serialized as lowercase strings so they
/// can be stored and filtered on directly (the persistence schema needs a
/// multi-valued index over exactly this representation).
pub fn compute_puzzle_themes(
    position_before_mistake: &Board,
    best_move: Move,
    solution_line: &[SolutionStep],
    phase: Phase,
    piece_moved: Piece,
) -> Vec<String> {
    let mut tags = std::collections::BTreeSet::new();

    push_motif_tags(&mut tags, compute_motifs(position_before_mistake, best_move));

    // Even indices (0, 2, ...) are the player's corrected moves: the solution
    // line starts with the move that should have replaced the mistake.
    for (i, step) in solution_line.iter().enumerate() {
        if i % 2 != 0 {
            continue;
        }
        push_motif_tags(&mut tags, compute_motifs(&step.position_before, step.mv));
        if is_capture_of_value(&step.position_before, step.mv) {
            tags.insert("winning_capture".to_string());
        }
        if step.mv.from == find_king_square(&step.position_before, step.position_before.side_to_move())
            || matches!(step.position_before.piece_on(step.mv.from), Some(Piece::King))
        {
            tags.insert("king_activity".to_string());
        }
    }

    if let Some(last) = solution_line.last() {
        if let Some(after) = crate::motifs::played(&last.position_before, last.mv) {
            if after.status() == cozy_chess::GameStatus::Won {
                tags.insert("checkmate_pattern".to_string());
                if solution_line.len() == 1 {
                    tags.insert("mate_in_1".to_string());
                }
            }
        }
    }

    tags.insert(format!("phase:{phase}"));
    tags.insert(format!("piece:{}", piece_tag(piece_moved)));

    tags.into_iter().collect()
}

const REAL_TACTIC_TAGS: &[&str] = &[
    "fork",
    "pin",
    "skewer",
    "discovered_attack",
    "back_rank_mate",
    "deflection",
    "mate_in_1",
    "checkmate_pattern",
    "winning_capture",
    "king_activity",
];

/// A puzzle is worth keeping only if it teaches something beyond "the
/// position was merely better" — at least one non-positional theme tag.
pub fn has_real_tactic(themes: &[String]) -> bool {
    themes.iter().any(|t| REAL_TACTIC_TAGS.contains(&t.as_str()))
}

fn push_motif_tags(tags: &mut std::collections::BTreeSet<String>, motifs: MotifSet) {
    if motifs.fork {
        tags.insert("fork".to_string());
    }
    if motifs.pin {
        tags.insert("pin".to_string());
    }
    if motifs.skewer {
        tags.insert("skewer".to_string());
    }
    if motifs.discovered_attack {
        tags.insert("discovered_attack".to_string());
    }
    if motifs.back_rank_mate {
        tags.insert("back_rank_mate".to_string());
    }
    if motifs.deflection {
        tags.insert("deflection".to_string());
    }
}

fn is_capture_of_value(before: &Board, mv: Move) -> bool {
    let enemy = !before.side_to_move();
    before.colors(enemy).has(mv.to)
        && before
            .piece_on(mv.to)
            .is_some_and(|p| crate::board_analysis::helpers::piece_value(p) >= MOTIF_MIN_VALUE)
}

fn find_king_square(board: &Board, color: Color) -> cozy_chess::Square {
    (board.pieces(Piece::King) & board.colors(color))
        .into_iter()
        .next()
        .expect("every legal position has a king")
}

fn piece_tag(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "pawn",
        Piece::Knight => "knight",
        Piece::Bishop => "bishop",
        Piece::Rook => "rook",
        Piece::Queen => "queen",
        Piece::King => "king",
    }
}

/// Content-addressed puzzle key: a 128-bit hash over the canonicalized
/// (FEN before, played SAN) pair. Inserts are idempotent on this key.
pub fn puzzle_key(fen_before: &str, played_san: &str) -> u128 {
    use std::hash::{Hash, Hasher};
    // Two independent 64-bit FNV-1a passes (distinct seeds) combined into a
    // 128-bit key; avoids pulling in an extra hashing crate for something
    // this small.
    let mut a = fnv1a_hasher(0xcbf29ce484222325);
    let mut b = fnv1a_hasher(0x100000001b3);
    fen_before.hash(&mut a);
    played_san.hash(&mut a);
    played_san.hash(&mut b);
    fen_before.hash(&mut b);
    ((a.finish() as u128) << 64) | (b.finish() as u128)
}

fn fnv1a_hasher(seed: u64) -> Fnv1aHasher {
    Fnv1aHasher(seed)
}

struct Fnv1aHasher(u64);

impl std::hash::Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        const PRIME: u64 = 0x100000001b3;
        for &byte in bytes {
            self.0 ^= byte as u64;
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }
}

/// SM-2-family spaced-repetition state carried on a PuzzleAttempt row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub easiness_factor: f64,
    pub repetition: u32,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            easiness_factor: 2.5,
            repetition: 0,
        }
    }
}

const EASINESS_FLOOR: f64 = 1.3;

/// Advances scheduler state after an attempt and returns the review
/// interval in days. `now_unix_secs` is supplied by the caller (never
/// computed here) so the scheduler stays a pure function.
pub fn schedule_next_review(state: SchedulerState, correct: bool, now_unix_secs: i64) -> (SchedulerState, i64) {
    let q: f64 = if correct { 4.0 } else { 0.0 };
    let new_repetition = if correct { state.repetition + 1 } else { 0 };
    let new_ef = (state.easiness_factor + 0.1 - 0.02 * (5.0 - q).powi(2) - 0.08 * (5.0 - q)).max(EASINESS_FLOOR);

    let interval_days: i64 = match new_repetition {
        0 => 1,
        1 => 6,
        n => (6.0 * new_ef.powi(n as i32 - 1)).floor() as i64,
    };

    let next_state = SchedulerState {
        easiness_factor: new_ef,
        repetition: new_repetition,
    };
    let next_review = now_unix_secs + interval_days * 86_400;
    (next_state, next_review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Square;

    fn mv(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None }
    }

    #[test]
    fn candidate_rejects_trivially_won_position() {
        let input = PuzzleCandidateInput {
            quality: QualityLabel::Blunder,
            cp_before: 700,
            played_move: mv(Square::E2, Square::E4),
            best_move: mv(Square::D2, Square::D4),
            multipv_top2_gap_cp: Some(400),
            best_move_is_mate: false,
        };
        assert!(!is_puzzle_candidate(&input));
    }

    #[test]
    fn candidate_rejects_small_multipv_gap() {
        let input = PuzzleCandidateInput {
            quality: QualityLabel::Mistake,
            cp_before: 50,
            played_move: mv(Square::E2, Square::E4),
            best_move: mv(Square::D2, Square::D4),
            multipv_top2_gap_cp: Some(120),
            best_move_is_mate: false,
        };
        assert!(!is_puzzle_candidate(&input));
    }

    #[test]
    fn candidate_accepts_clear_blunder() {
        let input = PuzzleCandidateInput {
            quality: QualityLabel::Blunder,
            cp_before: 20,
            played_move: mv(Square::E2, Square::E4),
            best_move: mv(Square::D2, Square::D4),
            multipv_top2_gap_cp: Some(350),
            best_move_is_mate: false,
        };
        assert!(is_puzzle_candidate(&input));
    }

    #[test]
    fn single_legal_move_waives_gap_but_requires_mate() {
        let mut input = PuzzleCandidateInput {
            quality: QualityLabel::Blunder,
            cp_before: 20,
            played_move: mv(Square::E2, Square::E4),
            best_move: mv(Square::D2, Square::D4),
            multipv_top2_gap_cp: None,
            best_move_is_mate: false,
        };
        assert!(!is_puzzle_candidate(&input));
        input.best_move_is_mate = true;
        assert!(is_puzzle_candidate(&input));
    }

    #[test]
    fn puzzle_key_is_stable_and_collision_resistant() {
        let k1 = puzzle_key("8/8/8/8/8/8/8/4K2k w - - 0 1", "Qh8");
        let k2 = puzzle_key("8/8/8/8/8/8/8/4K2k w - - 0 1", "Qh8");
        let k3 = puzzle_key("8/8/8/8/8/8/8/4K2k w - - 0 1", "Qg8");
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn scheduler_resets_repetition_on_incorrect_attempt() {
        let state = SchedulerState { easiness_factor: 2.6, repetition: 3 };
        let (next, interval) = schedule_next_review(state, false, 0);
        assert_eq!(next.repetition, 0);
        assert_eq!(interval, 86_400);
    }

    #[test]
    fn scheduler_grows_interval_with_repetitions() {
        let mut state = SchedulerState::default();
        let mut now = 0i64;
        let mut last_interval = 0i64;
        for _ in 0..4 {
            let (next, next_review) = schedule_next_review(state, true, now);
            let interval = (next_review - now) / 86_400;
            assert!(interval >= last_interval);
            last_interval = interval;
            state = next;
            now = next_review;
        }
        assert!(state.repetition == 4);
    }

    #[test]
    fn real_tactic_filter_rejects_pure_positional() {
        assert!(!has_real_tactic(&["positional".to_string(), "phase:endgame".to_string()]));
        assert!(has_real_tactic(&["fork".to_string()]));
    }
}
