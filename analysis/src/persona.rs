//! C10 Persona Synthesizer: scores the 12 fixed persona templates over the
//! aggregator's outputs and assembles the structured narrative report. The
//! scoring functions are a fixed lookup table, not tunable parameters —
//! changing one changes what the report means, so treat edits here as a
//! behavior change, not a calibration tweak.

use crate::aggregate::{
    compute_opening_repertoire, compute_overview, compute_skill_radar, compute_weaknesses, GameRecord, Overview,
    SkillRadar, Weaknesses,
};
use crate::phase::Phase;
use chess::{GameResult, PieceColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Tactician,
    Fortress,
    Grinder,
    Speedster,
    Scientist,
    Phoenix,
    Assassin,
    Chameleon,
    Berserker,
    Professor,
    Survivor,
    Adventurer,
}

impl Persona {
    pub fn name(self) -> &'static str {
        match self {
            Persona::Tactician => "Tactician",
            Persona::Fortress => "Fortress",
            Persona::Grinder => "Grinder",
            Persona::Speedster => "Speedster",
            Persona::Scientist => "Scientist",
            Persona::Phoenix => "Phoenix",
            Persona::Assassin => "Assassin",
            Persona::Chameleon => "Chameleon",
            Persona::Berserker => "Berserker",
            Persona::Professor => "Professor",
            Persona::Survivor => "Survivor",
            Persona::Adventurer => "Adventurer",
        }
    }
}

const ALL_PERSONAS: [Persona; 12] = [
    Persona::Tactician,
    Persona::Fortress,
    Persona::Grinder,
    Persona::Speedster,
    Persona::Scientist,
    Persona::Phoenix,
    Persona::Assassin,
    Persona::Chameleon,
    Persona::Berserker,
    Persona::Professor,
    Persona::Survivor,
    Persona::Adventurer,
};

/// Everything the scoring functions and the narrative templates need, built
/// once per user from the corpus. Nothing here is re-derived inside a
/// scoring function — they all read off this vector.
pub struct PersonaMetrics {
    pub overview: Overview,
    pub skill_radar: SkillRadar,
    pub weaknesses: Weaknesses,
    pub draw_rate: f64,
    pub comeback_count: usize,
    pub collapse_count: usize,
    pub distinct_openings_played: usize,
    pub mean_engine_depth: f64,
    pub blunder_rate_per_100: f64,
}

const COMEBACK_DEFICIT_CP: i32 = 200;

pub fn compute_persona_metrics(games: &[GameRecord]) -> PersonaMetrics {
    let overview = compute_overview(games);
    let skill_radar = compute_skill_radar(games);
    let weaknesses = compute_weaknesses(games);

    let draws = games.iter().filter(|g| g.result == GameResult::Draw).count();
    let draw_rate = if games.is_empty() { 0.0 } else { draws as f64 / games.len() as f64 };

    let comeback_count = games
        .iter()
        .filter(|g| is_player_win(g) && g.moves.iter().any(|m| deficit_for_player(g, m) >= COMEBACK_DEFICIT_CP))
        .count();

    // Collapse mirrors "converting advantages" from the weaknesses query:
    // had a won position and lost anyway.
    let collapse_count = weaknesses.converting_advantages_count;

    let distinct_openings_played = compute_opening_repertoire(games).len();

    let depths: Vec<f64> = games
        .iter()
        .flat_map(|g| g.moves.iter())
        .map(|m| m.depth as f64)
        .collect();
    let mean_engine_depth = if depths.is_empty() { 0.0 } else { depths.iter().sum::<f64>() / depths.len() as f64 };

    PersonaMetrics {
        overview,
        skill_radar,
        weaknesses,
        draw_rate,
        comeback_count,
        collapse_count,
        distinct_openings_played,
        mean_engine_depth,
        blunder_rate_per_100: 0.0, // filled below once overview is known
    }
    .with_blunder_rate()
}

impl PersonaMetrics {
    fn with_blunder_rate(mut self) -> Self {
        self.blunder_rate_per_100 = self.overview.mean_blunders_per_100_moves;
        self
    }
}

fn is_player_win(g: &GameRecord) -> bool {
    matches!(
        (g.player_color, g.result),
        (PieceColor::White, GameResult::WhiteWins) | (PieceColor::Black, GameResult::BlackWins)
    )
}

/// Centipawns the player was behind at this ply, from their own perspective.
/// Positive means the player was losing.
fn deficit_for_player(g: &GameRecord, m: &crate::types::MoveEvaluation) -> i32 {
    let white_cp = m.eval_after_cp;
    match g.player_color {
        PieceColor::White => -white_cp,
        PieceColor::Black => white_cp,
    }
}

type ScoreFn = fn(&PersonaMetrics) -> f64;

const PERSONA_SCORERS: [(Persona, ScoreFn); 12] = [
    (Persona::Tactician, score_tactician),
    (Persona::Fortress, score_fortress),
    (Persona::Grinder, score_grinder),
    (Persona::Speedster, score_speedster),
    (Persona::Scientist, score_scientist),
    (Persona::Phoenix, score_phoenix),
    (Persona::Assassin, score_assassin),
    (Persona::Chameleon, score_chameleon),
    (Persona::Berserker, score_berserker),
    (Persona::Professor, score_professor),
    (Persona::Survivor, score_survivor),
    (Persona::Adventurer, score_adventurer),
];

fn score_tactician(m: &PersonaMetrics) -> f64 {
    m.skill_radar.tactics - m.skill_radar.opening * 0.2
}

fn score_fortress(m: &PersonaMetrics) -> f64 {
    let low_blunders = (10.0 - m.blunder_rate_per_100).max(0.0) * 5.0;
    let low_cpl = (100.0 - m.overview.mean_overall_cpl).max(0.0);
    let zero_collapse_bonus = if m.collapse_count == 0 { 20.0 } else { -10.0 * m.collapse_count as f64 };
    low_blunders + low_cpl * 0.3 + zero_collapse_bonus
}

fn score_grinder(m: &PersonaMetrics) -> f64 {
    let endgame = m.overview.phase_means.endgame;
    let opening = m.overview.phase_means.opening;
    let middlegame = m.overview.phase_means.middlegame;
    if endgame < opening && endgame < middlegame {
        (opening - endgame) + (middlegame - endgame)
    } else {
        0.0
    }
}

fn score_speedster(m: &PersonaMetrics) -> f64 {
    // Rewards a composure score that holds up even though plenty of the
    // corpus is time-pressure moves; the inverse penalizes players whose
    // time-pressure cp_loss craters relative to their baseline.
    m.skill_radar.composure - (m.overview.mean_overall_cpl * 0.1)
}

fn score_scientist(m: &PersonaMetrics) -> f64 {
    m.distinct_openings_played as f64 * 2.0 + m.mean_engine_depth * 0.5
}

fn score_phoenix(m: &PersonaMetrics) -> f64 {
    m.comeback_count as f64 * 15.0 - m.draw_rate * 30.0
}

fn score_assassin(m: &PersonaMetrics) -> f64 {
    m.skill_radar.tactics * 0.7 + (m.overview.win_rate * 100.0) * 0.3 - m.skill_radar.consistency * 0.2
}

fn score_chameleon(m: &PersonaMetrics) -> f64 {
    let radar = &m.skill_radar;
    let axes = [radar.opening, radar.middlegame, radar.endgame, radar.tactics, radar.composure];
    let spread = axes.iter().cloned().fold(f64::MIN, f64::max) - axes.iter().cloned().fold(f64::MAX, f64::min);
    (50.0 - spread).max(0.0) + m.skill_radar.consistency * 0.3
}

fn score_berserker(m: &PersonaMetrics) -> f64 {
    let aggression_proxy = (100.0 - m.skill_radar.composure).max(0.0);
    aggression_proxy * 0.5 + m.skill_radar.tactics * 0.5 - m.skill_radar.consistency * 0.3
}

fn score_professor(m: &PersonaMetrics) -> f64 {
    m.skill_radar.opening * 0.6 + m.distinct_openings_played as f64 * 1.5
}

fn score_survivor(m: &PersonaMetrics) -> f64 {
    m.skill_radar.endgame * 0.6 + (100.0 - m.blunder_rate_per_100 * 5.0).max(0.0) * 0.4
}

fn score_adventurer(m: &PersonaMetrics) -> f64 {
    let low_opening = (100.0 - m.skill_radar.opening).max(0.0);
    low_opening * 0.5 + m.distinct_openings_played as f64
}

#[derive(Debug, Clone)]
pub struct PhaseBreakdownRow {
    pub phase: Phase,
    pub cpl: f64,
    pub commentary: String,
}

#[derive(Debug, Clone)]
pub struct PersonaReport {
    pub primary: Persona,
    pub secondary: Option<Persona>,
    pub signature_stats: Vec<(String, String)>,
    pub kryptonite: String,
    pub one_thing_to_change: String,
    pub narrative: String,
    pub phase_breakdown: Vec<PhaseBreakdownRow>,
    pub growth_path: Vec<String>,
}

const SECONDARY_RATIO_FLOOR: f64 = 0.5;
const SECONDARY_ABSOLUTE_FLOOR: f64 = 5.0;

pub fn synthesize_persona_report(m: &PersonaMetrics) -> PersonaReport {
    let mut scores: Vec<(Persona, f64)> = PERSONA_SCORERS.iter().map(|(p, f)| (*p, f(m))).collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (primary, primary_score) = scores[0];
    let secondary = scores
        .get(1)
        .filter(|(_, score)| *score > primary_score * SECONDARY_RATIO_FLOOR && *score > SECONDARY_ABSOLUTE_FLOOR)
        .map(|(p, _)| *p);

    let signature_stats = signature_stats_for(primary, m);
    let kryptonite = kryptonite_for(m);
    let one_thing_to_change = one_thing_to_change_for(m);
    let narrative = narrative_for(primary, secondary, m);
    let phase_breakdown = phase_breakdown_for(m);
    let growth_path = growth_path_for(m);

    PersonaReport {
        primary,
        secondary,
        signature_stats,
        kryptonite,
        one_thing_to_change,
        narrative,
        phase_breakdown,
        growth_path,
    }
}

fn signature_stats_for(primary: Persona, m: &PersonaMetrics) -> Vec<(String, String)> {
    let mut stats = vec![
        ("Win rate".to_string(), format!("{:.0}%", m.overview.win_rate * 100.0)),
        ("Overall CPL".to_string(), format!("{:.0}", m.overview.mean_overall_cpl)),
        ("Blunders / 100 moves".to_string(), format!("{:.1}", m.blunder_rate_per_100)),
    ];
    match primary {
        Persona::Grinder | Persona::Survivor => {
            stats.push(("Endgame CPL".to_string(), format!("{:.0}", m.overview.phase_means.endgame)));
        }
        Persona::Phoenix => {
            stats.push(("Comebacks".to_string(), m.comeback_count.to_string()));
        }
        Persona::Scientist | Persona::Professor => {
            stats.push(("Openings played".to_string(), m.distinct_openings_played.to_string()));
        }
        _ => {}
    }
    stats.push(("Tactics score".to_string(), format!("{:.0}/100", m.skill_radar.tactics)));
    stats.truncate(6);
    stats
}

fn kryptonite_for(m: &PersonaMetrics) -> String {
    if let Some(weak_phase) = &m.weaknesses.phase_weakness {
        format!("{} positions cost you disproportionately more than the rest of your games.", weak_phase.phase)
    } else if let Some((subtype, _)) = &m.weaknesses.top_blunder_subtype {
        format!("Recurring blunder pattern: {subtype:?}.")
    } else {
        "No single recurring weakness stands out yet — keep building the sample.".to_string()
    }
}

fn one_thing_to_change_for(m: &PersonaMetrics) -> String {
    if m.weaknesses.converting_advantages_count > 0 {
        "Slow down once you're clearly winning — several wins slipped away from winning positions.".to_string()
    } else if let Some(weak_phase) = &m.weaknesses.phase_weakness {
        format!("Spend your next study block on {} technique.", weak_phase.phase)
    } else {
        "Keep the current routine; nothing is pulling your results down disproportionately.".to_string()
    }
}

fn narrative_for(primary: Persona, secondary: Option<Persona>, m: &PersonaMetrics) -> String {
    let secondary_clause = secondary
        .map(|s| format!(" with shades of {}", s.name()))
        .unwrap_or_default();
    format!(
        "You play like a {}{}. Across {} games you've scored {:.0}% with an average centipawn loss of {:.0}.",
        primary.name(),
        secondary_clause,
        m.overview.total_games,
        m.overview.win_rate * 100.0,
        m.overview.mean_overall_cpl,
    )
}

fn phase_breakdown_for(m: &PersonaMetrics) -> Vec<PhaseBreakdownRow> {
    let means = &m.overview.phase_means;
    [
        (Phase::Opening, means.opening),
        (Phase::Middlegame, means.middlegame),
        (Phase::Endgame, means.endgame),
    ]
    .into_iter()
    .map(|(phase, cpl)| PhaseBreakdownRow {
        phase,
        cpl,
        commentary: phase_commentary(phase, cpl, means),
    })
    .collect()
}

fn phase_commentary(phase: Phase, cpl: f64, means: &crate::aggregate::PhaseMeans) -> String {
    let baseline = (means.opening + means.middlegame + means.endgame) / 3.0;
    if baseline <= 0.0 {
        return format!("Not enough {phase} data yet.");
    }
    if cpl > baseline * 1.15 {
        format!("{phase} is your weakest phase at {cpl:.0} average centipawn loss.")
    } else if cpl < baseline * 0.85 {
        format!("{phase} is a relative strength at {cpl:.0} average centipawn loss.")
    } else {
        format!("{phase} performance is in line with the rest of your game.")
    }
}

fn growth_path_for(m: &PersonaMetrics) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(weak_phase) = &m.weaknesses.phase_weakness {
        items.push(format!("Drill {} positions specifically.", weak_phase.phase));
    }
    if let Some((subtype, count)) = &m.weaknesses.top_blunder_subtype {
        items.push(format!("Target {subtype:?} blunders ({count} occurrences) with themed puzzles."));
    }
    if m.weaknesses.converting_advantages_count > 0 {
        items.push("Practice converting winning positions without rushing.".to_string());
    }
    if let Some(tc_weakness) = &m.weaknesses.time_control_weakness {
        items.push(format!("Review games played at {}, your weakest time control.", tc_weakness.time_control));
    }
    if items.is_empty() {
        items.push("Keep analyzing games to surface a clearer growth path.".to_string());
    }
    if m.skill_radar.consistency < 60.0 {
        items.push("Work on consistency — your results vary widely game to game.".to_string());
    }
    items.truncate(5);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{PhaseMeans, Trend};

    fn metrics(overrides: impl FnOnce(&mut PersonaMetrics)) -> PersonaMetrics {
        let mut m = PersonaMetrics {
            overview: Overview {
                total_games: 20,
                win_rate: 0.5,
                mean_overall_cpl: 80.0,
                mean_blunders_per_100_moves: 3.0,
                phase_means: PhaseMeans { opening: 30.0, middlegame: 70.0, endgame: 150.0 },
                trend: Trend::Stable,
            },
            skill_radar: crate::aggregate::SkillRadar {
                opening: 80.0,
                middlegame: 60.0,
                endgame: 20.0,
                tactics: 70.0,
                composure: 50.0,
                consistency: 50.0,
            },
            weaknesses: Weaknesses::default(),
            draw_rate: 0.1,
            comeback_count: 1,
            collapse_count: 0,
            distinct_openings_played: 3,
            mean_engine_depth: 16.0,
            blunder_rate_per_100: 3.0,
        };
        overrides(&mut m);
        m
    }

    #[test]
    fn grinder_wins_when_endgame_strictly_better_than_earlier_phases() {
        let m = metrics(|m| {
            m.overview.phase_means = PhaseMeans { opening: 150.0, middlegame: 120.0, endgame: 20.0 };
        });
        let report = synthesize_persona_report(&m);
        assert_eq!(report.primary, Persona::Grinder);
    }

    #[test]
    fn fortress_wins_with_low_blunders_and_no_collapses() {
        let m = metrics(|m| {
            m.blunder_rate_per_100 = 0.0;
            m.overview.mean_overall_cpl = 20.0;
            m.collapse_count = 0;
            m.overview.phase_means = PhaseMeans { opening: 20.0, middlegame: 20.0, endgame: 20.0 };
            m.skill_radar.tactics = 40.0;
        });
        let report = synthesize_persona_report(&m);
        assert_eq!(report.primary, Persona::Fortress);
    }

    #[test]
    fn secondary_persona_requires_ratio_and_absolute_floor() {
        let m = metrics(|_| {});
        let report = synthesize_persona_report(&m);
        // Not asserting a specific persona, only that the gating logic runs
        // without requiring a secondary to exist.
        assert!(report.secondary.is_none() || report.secondary != Some(report.primary));
    }

    #[test]
    fn growth_path_is_never_empty_and_capped_at_five() {
        let m = metrics(|m| {
            m.weaknesses.phase_weakness = Some(crate::aggregate::PhaseWeakness {
                phase: Phase::Endgame,
                phase_cpl: 200.0,
                baseline_cpl: 80.0,
            });
            m.weaknesses.converting_advantages_count = 2;
            m.weaknesses.time_control_weakness = Some(crate::aggregate::TimeControlWeakness {
                time_control: "180+0".to_string(),
                bucket_cpl: 200.0,
                baseline_cpl: 80.0,
            });
            m.skill_radar.consistency = 30.0;
        });
        let report = synthesize_persona_report(&m);
        assert!(!report.growth_path.is_empty());
        assert!(report.growth_path.len() <= 5);
    }
}
