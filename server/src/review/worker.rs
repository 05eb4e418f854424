use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use analysis::{
    accuracy, classify_blunder_subtype, cp_loss, detect_phase, win_probability, AnalysisConfig,
    BlunderContext, GameAnalysis, MoveEvaluation, QualityLabel, ReviewStatus, summarize_moves,
};
use cozy_chess::{Color, GameStatus};
use engine::{EngineDriver, EngineDriverConfig, DEFAULT_CALL_TIMEOUT};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::persistence::{AdvancedAnalysisRepository, Persistence, ReviewRepository};

use super::advanced::compute_advanced_analysis;
use super::types::*;

/// A long-lived worker task. Receives jobs from the shared channel,
/// processes them one at a time.
pub async fn run_review_worker<D: Persistence>(
    worker_id: usize,
    job_rx: Arc<Mutex<mpsc::Receiver<ReviewJob>>>,
    store: Arc<D::Reviews>,
    advanced_store: Arc<D::Advanced>,
    enqueued: Arc<RwLock<HashSet<String>>>,
    analysis_depth: u8,
    analysis_config: AnalysisConfig,
) {
    tracing::info!(worker_id, "Review worker started");

    loop {
        tracing::debug!(worker_id, "Waiting for next job");
        let job = {
            let mut rx = job_rx.lock().await;
            match rx.recv().await {
                Some(job) => job,
                None => {
                    tracing::info!(worker_id, "Job channel closed, worker exiting");
                    break;
                }
            }
        };

        tracing::info!(worker_id, game_id = %job.game_id, plies = job.game_data.moves.len(), "Starting review analysis");

        let result = analyze_game::<D>(
            worker_id,
            &job,
            store.as_ref(),
            advanced_store.as_ref(),
            analysis_depth,
            &analysis_config,
        )
        .await;

        match result {
            Ok(()) => {
                tracing::info!(worker_id, game_id = %job.game_id, "Review analysis complete");
            }
            Err(e) => {
                tracing::error!(worker_id, game_id = %job.game_id, "Review analysis failed: {}", e);
                let failed_review = GameAnalysis {
                    game_id: job.game_id.clone(),
                    status: ReviewStatus::Failed { error: e },
                    moves: vec![],
                    white: Default::default(),
                    black: Default::default(),
                    total_plies: job.game_data.move_count,
                    analyzed_plies: 0,
                    analysis_depth,
                    started_at: None,
                    completed_at: None,
                    winner: None,
                };
                let _ = store.save_review(&failed_review).await;
            }
        }

        enqueued.write().await.remove(&job.game_id);
    }
}

/// Analyze all positions in a finished game.
///
/// Pipeline:
///   Phase 1 — Engine analysis of each ply (before/after eval, classification)
///   Phase 2+4 — Board geometry metrics + psychological profiling (via analysis crate)
async fn analyze_game<D: Persistence>(
    worker_id: usize,
    job: &ReviewJob,
    store: &D::Reviews,
    advanced_store: &D::Advanced,
    analysis_depth: u8,
    analysis_config: &AnalysisConfig,
) -> Result<(), String> {
    let game = &job.game_data;
    let total_plies = game.moves.len() as u32;

    // Check for partial review (crash recovery)
    let mut review = match store.load_review(&job.game_id).await {
        Ok(Some(existing)) if !existing.moves.is_empty() => {
            tracing::info!(
                worker_id,
                game_id = %job.game_id,
                "Resuming from ply {}",
                existing.analyzed_plies
            );
            existing
        }
        _ => GameAnalysis {
            game_id: job.game_id.clone(),
            status: ReviewStatus::Analyzing {
                current_ply: 0,
                total_plies,
            },
            moves: Vec::with_capacity(total_plies as usize),
            white: Default::default(),
            black: Default::default(),
            total_plies,
            analyzed_plies: 0,
            analysis_depth,
            started_at: Some(crate::persistence::now_timestamp() as i64),
            completed_at: None,
            winner: None,
        },
    };

    tracing::info!(worker_id, game_id = %job.game_id, "Spawning engine for analysis");
    let mut engine = EngineDriver::spawn(EngineDriverConfig {
        binary_path: None,
        skill_level: None, // full strength for analysis
        threads: Some(1),  // one thread per worker to bound resources
        hash_mb: Some(64),
        label: Some(format!("review-worker-{}", worker_id)),
    })
    .await
    .map_err(|e| format!("Failed to spawn engine: {}", e))?;

    tracing::info!(worker_id, game_id = %job.game_id, "Engine spawned, beginning ply analysis");

    let start_ply = review.analyzed_plies as usize;

    for (i, move_record) in game.moves.iter().enumerate().skip(start_ply) {
        let ply = (i as u32) + 1; // 1-indexed: ply 1 = first move
        let is_white_move = i % 2 == 0;
        let side = if is_white_move { "W" } else { "B" };

        tracing::info!(
            worker_id,
            game_id = %job.game_id,
            ply = ply,
            total = total_plies,
            side = side,
            san = %move_record.san,
            "Analyzing ply {}/{}",
            ply,
            total_plies
        );

        let fen_before = if i == 0 {
            game.start_fen.clone()
        } else {
            game.moves[i - 1].fen_after.clone()
        };
        let fen_after = &move_record.fen_after;
        let board_before: cozy_chess::Board = fen_before
            .parse()
            .map_err(|_| format!("Bad FEN before ply {}: {}", ply, fen_before))?;

        // Evaluate the position before the move: this is simultaneously the
        // position's own best-line eval and the reference for this ply's
        // cp_loss (the engine's opinion of the position never changes based
        // on what the player eventually plays).
        let before_variations = engine
            .analyze(&fen_before, &[], analysis_depth, 1, DEFAULT_CALL_TIMEOUT)
            .await
            .map_err(|e| format!("Engine error analyzing ply {}: {}", ply, e))?;
        let best = before_variations
            .first()
            .ok_or_else(|| format!("Engine returned no lines for ply {}", ply))?;
        let eval_before_cp = best.white_cp;
        let eval_before_mate = best.is_mate;
        let best_move_uci = best.best_move_uci().unwrap_or_default().to_string();
        let best_mate_in_plies = eval_before_mate.then(|| best.pv.len().min(255) as u8);

        // Evaluate the position after the played move, unless it's terminal
        // (checkmate/stalemate) — the engine can't be queried on a position
        // with no legal moves.
        let (eval_after_cp, eval_after_mate, played_mate_in_plies) =
            if is_terminal_position(fen_after) {
                if is_checkmate(fen_after) {
                    let mated_side = side_to_move_of(fen_after);
                    let cp = if mated_side == Color::White {
                        -analysis::MATE_SCORE_CP
                    } else {
                        analysis::MATE_SCORE_CP
                    };
                    (cp, true, Some(0u8))
                } else {
                    (0, false, None)
                }
            } else {
                let after_variations = engine
                    .analyze(fen_after, &[], analysis_depth, 1, DEFAULT_CALL_TIMEOUT)
                    .await
                    .map_err(|e| format!("Engine error analyzing ply {} (after): {}", ply, e))?;
                let after_best = after_variations
                    .first()
                    .ok_or_else(|| format!("Engine returned no lines after ply {}", ply))?;
                let mate_in = after_best
                    .is_mate
                    .then(|| after_best.pv.len().min(255) as u8);
                (after_best.white_cp, after_best.is_mate, mate_in)
            };

        let loss = cp_loss(eval_before_cp, eval_after_cp, eval_before_mate, eval_after_mate, is_white_move);
        let quality = QualityLabel::from_cp_loss(loss);

        let phase = detect_phase(&board_before, ply, false, false);

        let cp_before_mover = if is_white_move { eval_before_cp } else { -eval_before_cp };
        let cp_after_mover = if is_white_move { eval_after_cp } else { -eval_after_cp };
        let wp_before_mover = win_probability(cp_before_mover, eval_before_mate);
        let wp_after_mover = win_probability(cp_after_mover, eval_after_mate);
        let move_accuracy = accuracy(wp_before_mover, wp_after_mover);

        let played_uci = move_uci_string(move_record);
        let played_move = engine::uci::parser::parse_uci_move(&played_uci)
            .map_err(|e| format!("Bad played move at ply {}: {}", ply, e))?;
        let best_move_san = if best_move_uci.is_empty() {
            String::new()
        } else {
            engine::uci::parser::parse_uci_move(&best_move_uci)
                .map(|mv| chess::pgn::format_san(&board_before, mv))
                .unwrap_or_else(|_| best_move_uci.clone())
        };

        let castled_non_castling =
            !move_record.san.starts_with("O-O") && moved_from_castling_square(&move_record.from, &move_record.piece);
        let mover_color = if is_white_move { Color::White } else { Color::Black };
        let king_attackers_before = king_attackers(&board_before, mover_color);
        let king_attackers_after = fen_after
            .parse::<cozy_chess::Board>()
            .map(|b| king_attackers(&b, mover_color))
            .unwrap_or(king_attackers_before);

        let blunder_subtype = classify_blunder_subtype(
            quality,
            &BlunderContext {
                position_before: &board_before,
                played_move,
                best_move: engine::uci::parser::parse_uci_move(&best_move_uci)
                    .unwrap_or(played_move),
                phase,
                best_mate_in_plies,
                played_mate_in_plies,
                king_attackers_before,
                king_attackers_after,
                castling_rights_lost_non_castling: castled_non_castling,
            },
        );

        let piece_moved = move_record.piece.chars().next().unwrap_or('?');
        let weighted_cp_loss = loss as f64 * phase.normalization_multiplier();

        let row = MoveEvaluation {
            ply,
            fen_before: fen_before.clone(),
            piece_moved,
            played_uci,
            played_san: move_record.san.clone(),
            best_move_uci,
            best_move_san,
            eval_before_cp,
            eval_before_mate,
            eval_after_cp,
            eval_after_mate,
            eval_best_cp: eval_before_cp,
            eval_best_mate: eval_before_mate,
            quality,
            cp_loss: loss,
            weighted_cp_loss,
            blunder_subtype,
            phase,
            accuracy: move_accuracy,
            pv: best_variation_pv(&before_variations),
            depth: analysis_depth,
            clock_ms: move_record.clock_ms,
            degraded: false,
        };

        review.moves.push(row);
        review.analyzed_plies = ply;
        review.status = ReviewStatus::Analyzing {
            current_ply: ply,
            total_plies,
        };

        store
            .save_review(&review)
            .await
            .map_err(|e| format!("Failed to save partial review: {}", e))?;
    }

    let (white, black) = summarize_moves(&review.moves);
    review.white = white;
    review.black = black;

    review.winner = match game.result.as_str() {
        "WhiteWins" => Some("White".to_string()),
        "BlackWins" => Some("Black".to_string()),
        "Draw" => Some("Draw".to_string()),
        _ => None,
    };

    review.status = ReviewStatus::Complete;
    review.completed_at = Some(crate::persistence::now_timestamp() as i64);

    tracing::info!(
        worker_id,
        game_id = %job.game_id,
        white_accuracy = review.white.accuracy,
        black_accuracy = review.black.accuracy,
        plies = review.analyzed_plies,
        "Analysis complete, saving results"
    );

    store
        .save_review(&review)
        .await
        .map_err(|e| format!("Failed to save completed review: {}", e))?;

    if analysis_config.compute_advanced {
        tracing::info!(worker_id, game_id = %job.game_id, "Computing advanced analysis");

        let advanced = compute_advanced_analysis(
            &review,
            analysis_config,
            crate::persistence::now_timestamp(),
        );

        tracing::info!(
            worker_id,
            game_id = %job.game_id,
            critical_positions = advanced.critical_positions_count,
            "Advanced analysis complete, saving"
        );

        advanced_store
            .save_analysis(&advanced)
            .await
            .map_err(|e| format!("Failed to save advanced analysis: {}", e))?;
    }

    tracing::debug!(worker_id, game_id = %job.game_id, "Shutting down engine");
    engine.shutdown().await;

    Ok(())
}

fn best_variation_pv(variations: &[engine::Variation]) -> Vec<String> {
    variations.first().map(|v| v.pv.clone()).unwrap_or_default()
}

/// Rebuild the UCI move string from a stored move record's square pair plus
/// promotion suffix (the record keeps `from`/`to`/`promotion` separately for
/// display purposes; the engine wants them concatenated).
fn move_uci_string(mv: &crate::persistence::StoredMoveRecord) -> String {
    let mut s = format!("{}{}", mv.from, mv.to);
    if let Some(promo) = &mv.promotion {
        s.push_str(&promo.to_lowercase());
    }
    s
}

fn side_to_move_of(fen: &str) -> Color {
    match fen.split_whitespace().nth(1) {
        Some("b") => Color::Black,
        _ => Color::White,
    }
}

fn king_attackers(board: &cozy_chess::Board, color: Color) -> u8 {
    let king_sq = board.king(color);
    analysis::board_analysis::helpers::attackers_of(board, king_sq, !color).len() as u8
}

/// Whether a non-castling move from this square would forfeit castling
/// rights: the king's home square, or either rook's home square. A cheap
/// square-based proxy for cozy_chess's own castle-rights bookkeeping, since
/// the Game Analyzer only needs "did this move just give that up" rather
/// than the exact rook file (relevant for Chess960, out of scope here).
fn moved_from_castling_square(from: &str, piece: &str) -> bool {
    const HOME_SQUARES: &[&str] = &["e1", "e8", "a1", "h1", "a8", "h8"];
    matches!(piece, "K" | "R") && HOME_SQUARES.contains(&from)
}

/// Check if a position has no legal moves (checkmate or stalemate).
fn is_terminal_position(fen: &str) -> bool {
    if let Ok(board) = fen.parse::<cozy_chess::Board>() {
        board.status() != GameStatus::Ongoing
    } else {
        false
    }
}

/// Check if a position is checkmate (as opposed to stalemate).
fn is_checkmate(fen: &str) -> bool {
    if let Ok(board) = fen.parse::<cozy_chess::Board>() {
        board.status() == GameStatus::Won
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_is_terminal_checkmate() {
        // Fool's mate final position
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert!(is_terminal_position(fen));
        assert!(is_checkmate(fen));
    }

    #[test]
    fn test_is_terminal_stalemate() {
        // Stalemate position: black king on a8, white queen on b6, white king on c8
        let fen = "k7/8/1Q6/8/8/8/8/2K5 b - - 0 1";
        assert!(is_terminal_position(fen));
        assert!(!is_checkmate(fen));
    }

    #[test]
    fn test_not_terminal_ongoing() {
        assert!(!is_terminal_position(START_FEN));
    }

    #[test]
    fn test_move_uci_string_plain() {
        let mv = crate::persistence::StoredMoveRecord {
            from: "e2".into(),
            to: "e4".into(),
            piece: "P".into(),
            captured: None,
            promotion: None,
            san: "e4".into(),
            fen_after: String::new(),
            clock_ms: None,
        };
        assert_eq!(move_uci_string(&mv), "e2e4");
    }

    #[test]
    fn test_move_uci_string_promotion() {
        let mv = crate::persistence::StoredMoveRecord {
            from: "a7".into(),
            to: "a8".into(),
            piece: "P".into(),
            captured: None,
            promotion: Some("Q".into()),
            san: "a8=Q".into(),
            fen_after: String::new(),
            clock_ms: None,
        };
        assert_eq!(move_uci_string(&mv), "a7a8q");
    }

    #[test]
    fn test_moved_from_castling_square_detects_king_and_rook() {
        assert!(moved_from_castling_square("e1", "K"));
        assert!(moved_from_castling_square("h8", "R"));
        assert!(!moved_from_castling_square("e2", "P"));
        assert!(!moved_from_castling_square("e4", "K"));
    }
}
