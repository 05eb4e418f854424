//! C9 Corpus Aggregator: read-only queries over an in-memory corpus of
//! analyzed games. Nothing here touches a database — the `server` crate
//! loads rows and hands this module slices to compute over, matching the
//! "derived at query time" contract.

use crate::classify::{BlunderSubType, QualityLabel};
use crate::phase::Phase;
use crate::types::MoveEvaluation;
use chess::PieceColor;
use chess::GameResult;
use std::collections::HashMap;

/// One analyzed game, enough of it for corpus-level queries. `moves` holds
/// every ply, both colors; callers filter to the player's plies as needed.
pub struct GameRecord {
    pub game_id: String,
    pub player_color: PieceColor,
    pub result: GameResult,
    pub opening_name: String,
    pub time_control: String,
    /// Unix seconds; used only for recency ordering (recent-10 trend).
    pub played_at_unix: i64,
    pub moves: Vec<MoveEvaluation>,
}

impl GameRecord {
    fn player_moves(&self) -> impl Iterator<Item = &MoveEvaluation> {
        let want_white = self.player_color == PieceColor::White;
        self.moves.iter().filter(move |m| m.is_white() == want_white)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Default)]
pub struct PhaseMeans {
    pub opening: f64,
    pub middlegame: f64,
    pub endgame: f64,
}

#[derive(Debug, Clone)]
pub struct Overview {
    pub total_games: usize,
    pub win_rate: f64,
    pub mean_overall_cpl: f64,
    pub mean_blunders_per_100_moves: f64,
    pub phase_means: PhaseMeans,
    pub trend: Trend,
}

pub fn compute_overview(games: &[GameRecord]) -> Overview {
    if games.is_empty() {
        return Overview {
            total_games: 0,
            win_rate: 0.0,
            mean_overall_cpl: 0.0,
            mean_blunders_per_100_moves: 0.0,
            phase_means: PhaseMeans::default(),
            trend: Trend::Stable,
        };
    }

    let wins = games
        .iter()
        .filter(|g| is_player_win(g.player_color, g.result))
        .count();
    let win_rate = wins as f64 / games.len() as f64;

    let per_game_cpl: Vec<f64> = games.iter().map(mean_cpl_for_game).collect();
    let mean_overall_cpl = mean(&per_game_cpl);

    let total_player_moves: usize = games.iter().map(|g| g.player_moves().count()).sum();
    let total_blunders: usize = games
        .iter()
        .flat_map(|g| g.player_moves())
        .filter(|m| m.quality == QualityLabel::Blunder)
        .count();
    let mean_blunders_per_100_moves = if total_player_moves == 0 {
        0.0
    } else {
        total_blunders as f64 * 100.0 / total_player_moves as f64
    };

    let phase_means = compute_phase_means(games);

    let recent: Vec<&GameRecord> = most_recent(games, 10);
    let recent_cpl = mean(&recent.iter().map(|g| mean_cpl_for_game(g)).collect::<Vec<_>>());
    let trend = if recent_cpl < mean_overall_cpl - 5.0 {
        Trend::Improving
    } else if recent_cpl > mean_overall_cpl + 5.0 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    Overview {
        total_games: games.len(),
        win_rate,
        mean_overall_cpl,
        mean_blunders_per_100_moves,
        phase_means,
        trend,
    }
}

fn is_player_win(color: PieceColor, result: GameResult) -> bool {
    matches!(
        (color, result),
        (PieceColor::White, GameResult::WhiteWins) | (PieceColor::Black, GameResult::BlackWins)
    )
}

fn mean_cpl_for_game(game: &GameRecord) -> f64 {
    mean(&game.player_moves().map(|m| m.cp_loss as f64).collect::<Vec<_>>())
}

fn most_recent(games: &[GameRecord], n: usize) -> Vec<&GameRecord> {
    let mut sorted: Vec<&GameRecord> = games.iter().collect();
    sorted.sort_by_key(|g| std::cmp::Reverse(g.played_at_unix));
    sorted.truncate(n);
    sorted
}

fn compute_phase_means(games: &[GameRecord]) -> PhaseMeans {
    let mut buckets: HashMap<Phase, Vec<f64>> = HashMap::new();
    for g in games {
        for m in g.player_moves() {
            buckets.entry(m.phase).or_default().push(m.cp_loss as f64);
        }
    }
    PhaseMeans {
        opening: mean(buckets.get(&Phase::Opening).map(Vec::as_slice).unwrap_or(&[])),
        middlegame: mean(buckets.get(&Phase::Middlegame).map(Vec::as_slice).unwrap_or(&[])),
        endgame: mean(buckets.get(&Phase::Endgame).map(Vec::as_slice).unwrap_or(&[])),
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

/// Six axes, each clamped to 0..100. Higher is always better. The transforms
/// are fixed monotone mappings of the corresponding aggregate, not tunable
/// weights — see the ledger for the chosen constants.
#[derive(Debug, Clone)]
pub struct SkillRadar {
    pub opening: f64,
    pub middlegame: f64,
    pub endgame: f64,
    pub tactics: f64,
    pub composure: f64,
    pub consistency: f64,
}

const PHASE_SCORE_CPL_SCALE: f64 = 150.0;

pub fn compute_skill_radar(games: &[GameRecord]) -> SkillRadar {
    let phase_means = compute_phase_means(games);
    let overview = compute_overview(games);

    let per_game_cpl: Vec<f64> = games.iter().map(mean_cpl_for_game).collect();
    let consistency_score = 100.0 - (std_dev(&per_game_cpl) / PHASE_SCORE_CPL_SCALE * 100.0).min(100.0);

    let time_pressure_moves: Vec<&MoveEvaluation> = games
        .iter()
        .flat_map(|g| g.player_moves())
        .filter(|m| matches!(m.clock_ms, Some(ms) if ms < 30_000))
        .collect();
    let time_pressure_cpl = mean(&time_pressure_moves.iter().map(|m| m.cp_loss as f64).collect::<Vec<_>>());
    let composure_score = cpl_to_score(time_pressure_cpl);

    SkillRadar {
        opening: cpl_to_score(phase_means.opening),
        middlegame: cpl_to_score(phase_means.middlegame),
        endgame: cpl_to_score(phase_means.endgame),
        tactics: (100.0 - overview.mean_blunders_per_100_moves * 10.0).clamp(0.0, 100.0),
        composure: composure_score,
        consistency: consistency_score.clamp(0.0, 100.0),
    }
}

fn cpl_to_score(cpl: f64) -> f64 {
    (100.0 - cpl.max(0.0) / PHASE_SCORE_CPL_SCALE * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone)]
pub struct PhaseWeakness {
    pub phase: Phase,
    pub phase_cpl: f64,
    pub baseline_cpl: f64,
}

#[derive(Debug, Clone)]
pub struct TimeControlWeakness {
    pub time_control: String,
    pub bucket_cpl: f64,
    pub baseline_cpl: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Weaknesses {
    pub phase_weakness: Option<PhaseWeakness>,
    pub top_blunder_subtype: Option<(BlunderSubType, usize)>,
    pub converting_advantages_count: usize,
    pub time_control_weakness: Option<TimeControlWeakness>,
}

const PHASE_WEAKNESS_RATIO: f64 = 1.15;
const TOP_BLUNDER_MIN_COUNT: usize = 3;
const CONVERTING_ADVANTAGE_THRESHOLD_CP: i32 = 200;

pub fn compute_weaknesses(games: &[GameRecord]) -> Weaknesses {
    let overview = compute_overview(games);
    let baseline = overview.mean_overall_cpl;
    let phase_means = overview.phase_means.clone();

    let phase_weakness = [
        (Phase::Opening, phase_means.opening),
        (Phase::Middlegame, phase_means.middlegame),
        (Phase::Endgame, phase_means.endgame),
    ]
    .into_iter()
    .filter(|(_, cpl)| baseline > 0.0 && *cpl > baseline * PHASE_WEAKNESS_RATIO)
    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
    .map(|(phase, phase_cpl)| PhaseWeakness {
        phase,
        phase_cpl,
        baseline_cpl: baseline,
    });

    let mut subtype_counts: HashMap<BlunderSubType, usize> = HashMap::new();
    for m in games.iter().flat_map(|g| g.player_moves()) {
        if let Some(subtype) = m.blunder_subtype {
            *subtype_counts.entry(subtype).or_insert(0) += 1;
        }
    }
    let top_blunder_subtype = subtype_counts
        .into_iter()
        .filter(|(_, count)| *count >= TOP_BLUNDER_MIN_COUNT)
        .max_by_key(|(_, count)| *count);

    let converting_advantages_count = games
        .iter()
        .filter(|g| {
            !is_player_win(g.player_color, g.result)
                && matches!(g.result, GameResult::WhiteWins | GameResult::BlackWins)
                && g.player_moves().any(|m| m.eval_after_cp > CONVERTING_ADVANTAGE_THRESHOLD_CP)
        })
        .count();

    let mut by_time_control: HashMap<String, Vec<f64>> = HashMap::new();
    for g in games {
        by_time_control
            .entry(g.time_control.clone())
            .or_default()
            .extend(g.player_moves().map(|m| m.cp_loss as f64));
    }
    let time_control_weakness = by_time_control
        .into_iter()
        .map(|(tc, losses)| (tc, mean(&losses)))
        .filter(|(_, cpl)| baseline > 0.0 && *cpl > baseline * PHASE_WEAKNESS_RATIO)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(time_control, bucket_cpl)| TimeControlWeakness {
            time_control,
            bucket_cpl,
            baseline_cpl: baseline,
        });

    Weaknesses {
        phase_weakness,
        top_blunder_subtype,
        converting_advantages_count,
        time_control_weakness,
    }
}

#[derive(Debug, Clone)]
pub struct TimePressureSlice {
    pub move_count: usize,
    pub mean_cpl: f64,
    pub blunder_count: usize,
}

const TIME_PRESSURE_THRESHOLD_MS: u64 = 30_000;

pub fn compute_time_pressure_slice(games: &[GameRecord]) -> TimePressureSlice {
    let moves: Vec<&MoveEvaluation> = games
        .iter()
        .flat_map(|g| g.player_moves())
        .filter(|m| matches!(m.clock_ms, Some(ms) if ms < TIME_PRESSURE_THRESHOLD_MS))
        .collect();
    let mean_cpl = mean(&moves.iter().map(|m| m.cp_loss as f64).collect::<Vec<_>>());
    let blunder_count = moves.iter().filter(|m| m.quality == QualityLabel::Blunder).count();
    TimePressureSlice {
        move_count: moves.len(),
        mean_cpl,
        blunder_count,
    }
}

#[derive(Debug, Clone)]
pub struct PiecePerformance {
    pub piece: char,
    pub mean_cp_loss: f64,
    pub quality_counts: HashMap<QualityLabel, usize>,
}

pub fn compute_piece_performance(games: &[GameRecord]) -> Vec<PiecePerformance> {
    let mut by_piece: HashMap<char, Vec<&MoveEvaluation>> = HashMap::new();
    for m in games.iter().flat_map(|g| g.player_moves()) {
        by_piece.entry(m.piece_moved).or_default().push(m);
    }

    let mut out: Vec<PiecePerformance> = by_piece
        .into_iter()
        .map(|(piece, moves)| {
            let mean_cp_loss = mean(&moves.iter().map(|m| m.cp_loss as f64).collect::<Vec<_>>());
            let mut quality_counts = HashMap::new();
            for m in &moves {
                *quality_counts.entry(m.quality).or_insert(0) += 1;
            }
            PiecePerformance {
                piece,
                mean_cp_loss,
                quality_counts,
            }
        })
        .collect();
    out.sort_by(|a, b| a.piece.cmp(&b.piece));
    out
}

/// OpeningRepertoire row, aggregated by (opening name, player color).
#[derive(Debug, Clone, Default)]
pub struct OpeningRepertoireEntry {
    pub opening_name: String,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub mean_cpl: f64,
    pub last_played_unix: i64,
    /// Games where the player left known theory (phase == opening, no prior
    /// move worse than Good quality) before move 8.
    pub early_deviations: usize,
}

const EARLY_DEVIATION_PLY_LIMIT: u32 = 16; // move 8 for both colors

pub fn compute_opening_repertoire(games: &[GameRecord]) -> Vec<OpeningRepertoireEntry> {
    let mut by_opening: HashMap<String, OpeningRepertoireEntry> = HashMap::new();

    for g in games {
        let entry = by_opening.entry(g.opening_name.clone()).or_insert_with(|| OpeningRepertoireEntry {
            opening_name: g.opening_name.clone(),
            ..Default::default()
        });

        match (g.player_color, g.result) {
            (PieceColor::White, GameResult::WhiteWins) | (PieceColor::Black, GameResult::BlackWins) => {
                entry.wins += 1;
            }
            (PieceColor::White, GameResult::BlackWins) | (PieceColor::Black, GameResult::WhiteWins) => {
                entry.losses += 1;
            }
            (_, GameResult::Draw) => entry.draws += 1,
            (_, GameResult::Ongoing) => {}
        }

        if g.played_at_unix > entry.last_played_unix {
            entry.last_played_unix = g.played_at_unix;
        }

        if deviated_before_move_8(g) {
            entry.early_deviations += 1;
        }
    }

    for entry in by_opening.values_mut() {
        let game_cpls: Vec<f64> = games
            .iter()
            .filter(|g| g.opening_name == entry.opening_name)
            .map(mean_cpl_for_game)
            .collect();
        entry.mean_cpl = mean(&game_cpls);
    }

    let mut out: Vec<OpeningRepertoireEntry> = by_opening.into_values().collect();
    out.sort_by(|a, b| a.opening_name.cmp(&b.opening_name));
    out
}

fn deviated_before_move_8(game: &GameRecord) -> bool {
    game.player_moves()
        .take_while(|m| m.ply <= EARLY_DEVIATION_PLY_LIMIT)
        .any(|m| m.phase == Phase::Opening && !matches!(m.quality, QualityLabel::Best | QualityLabel::Excellent | QualityLabel::Good))
}
