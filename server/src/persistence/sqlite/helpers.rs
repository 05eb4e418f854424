//! Shared encode/decode helpers for SQLite ↔ domain type conversions.
//!
//! These functions bridge the gap between domain enums and the string/integer
//! columns used in the SQLite schema's CHECK constraints.

use analysis::{BlunderSubType, Phase, QualityLabel, ReviewStatus};

// ── ReviewStatus ───────────────────────────────────────────────────────

/// Encode a `ReviewStatus` into the columns:
/// `(status, current_ply, total_plies, error)`.
pub fn encode_status(
    status: &ReviewStatus,
) -> (&'static str, Option<u32>, Option<u32>, Option<&str>) {
    match status {
        ReviewStatus::Queued => ("Queued", None, None, None),
        ReviewStatus::Analyzing {
            current_ply,
            total_plies,
        } => ("Analyzing", Some(*current_ply), Some(*total_plies), None),
        ReviewStatus::Complete => ("Complete", None, None, None),
        ReviewStatus::Failed { error } => ("Failed", None, None, Some(error.as_str())),
    }
}

/// Decode SQLite columns back into a `ReviewStatus`.
pub fn decode_status(
    status: &str,
    current_ply: Option<u32>,
    total_plies: Option<u32>,
    error: Option<String>,
) -> ReviewStatus {
    match status {
        "Analyzing" => ReviewStatus::Analyzing {
            current_ply: current_ply.unwrap_or(0),
            total_plies: total_plies.unwrap_or(0),
        },
        "Failed" => ReviewStatus::Failed {
            error: error.unwrap_or_default(),
        },
        "Complete" => ReviewStatus::Complete,
        _ => ReviewStatus::Queued,
    }
}

// ── QualityLabel ─────────────────────────────────────────────────────

/// Encode a `QualityLabel` to the string used in the SQLite CHECK.
pub fn encode_quality(q: QualityLabel) -> &'static str {
    match q {
        QualityLabel::Best => "Best",
        QualityLabel::Excellent => "Excellent",
        QualityLabel::Good => "Good",
        QualityLabel::Inaccuracy => "Inaccuracy",
        QualityLabel::Mistake => "Mistake",
        QualityLabel::Blunder => "Blunder",
    }
}

/// Decode a quality string from SQLite back into a `QualityLabel`.
pub fn decode_quality(s: &str) -> QualityLabel {
    match s {
        "Best" => QualityLabel::Best,
        "Excellent" => QualityLabel::Excellent,
        "Inaccuracy" => QualityLabel::Inaccuracy,
        "Mistake" => QualityLabel::Mistake,
        "Blunder" => QualityLabel::Blunder,
        _ => QualityLabel::Good, // safe fallback
    }
}

// ── BlunderSubType ───────────────────────────────────────────────────

/// Encode an `Option<BlunderSubType>` to a nullable SQLite column.
pub fn encode_blunder_subtype(s: Option<BlunderSubType>) -> Option<&'static str> {
    s.map(|s| match s {
        BlunderSubType::HangingPiece => "HangingPiece",
        BlunderSubType::MissedMate => "MissedMate",
        BlunderSubType::MissedFork => "MissedFork",
        BlunderSubType::MissedPin => "MissedPin",
        BlunderSubType::MissedSkewer => "MissedSkewer",
        BlunderSubType::MissedDiscovery => "MissedDiscovery",
        BlunderSubType::MissedCapture => "MissedCapture",
        BlunderSubType::BackRank => "BackRank",
        BlunderSubType::KingSafety => "KingSafety",
        BlunderSubType::EndgameTechnique => "EndgameTechnique",
        BlunderSubType::Positional => "Positional",
    })
}

/// Decode a nullable blunder-subtype column back into `Option<BlunderSubType>`.
pub fn decode_blunder_subtype(s: Option<&str>) -> Option<BlunderSubType> {
    match s {
        Some("HangingPiece") => Some(BlunderSubType::HangingPiece),
        Some("MissedMate") => Some(BlunderSubType::MissedMate),
        Some("MissedFork") => Some(BlunderSubType::MissedFork),
        Some("MissedPin") => Some(BlunderSubType::MissedPin),
        Some("MissedSkewer") => Some(BlunderSubType::MissedSkewer),
        Some("MissedDiscovery") => Some(BlunderSubType::MissedDiscovery),
        Some("MissedCapture") => Some(BlunderSubType::MissedCapture),
        Some("BackRank") => Some(BlunderSubType::BackRank),
        Some("KingSafety") => Some(BlunderSubType::KingSafety),
        Some("EndgameTechnique") => Some(BlunderSubType::EndgameTechnique),
        Some("Positional") => Some(BlunderSubType::Positional),
        _ => None,
    }
}

// ── Phase ────────────────────────────────────────────────────────────

/// Encode a `Phase` to the string used in the SQLite CHECK.
pub fn encode_phase(p: Phase) -> &'static str {
    match p {
        Phase::Opening => "Opening",
        Phase::Middlegame => "Middlegame",
        Phase::Endgame => "Endgame",
    }
}

/// Decode a phase string from SQLite back into a `Phase`.
pub fn decode_phase(s: &str) -> Phase {
    match s {
        "Opening" => Phase::Opening,
        "Endgame" => Phase::Endgame,
        _ => Phase::Middlegame,
    }
}

// ── game_mode normalization ────────────────────────────────────────────

/// Normalize a game_mode string for SQLite storage.
///
/// The JSON stores encode `HumanVsEngine` as `"HumanVsEngine:White"` or
/// `"HumanVsEngine:Black"`. The SQLite schema CHECK only allows the base
/// mode string, with `human_side` stored in a separate column.
pub fn normalize_game_mode(game_mode: &str) -> &str {
    if let Some(base) = game_mode.split(':').next() {
        base
    } else {
        game_mode
    }
}
