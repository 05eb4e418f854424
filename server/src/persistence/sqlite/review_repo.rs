//! SQLite-backed implementation of [`ReviewRepository`].

use sqlx::SqlitePool;

use crate::persistence::now_timestamp;
use crate::persistence::traits::ReviewRepository;
use crate::persistence::PersistenceError;
use super::helpers::{
    decode_blunder_subtype, decode_phase, decode_quality, decode_status, encode_blunder_subtype,
    encode_phase, encode_quality, encode_status,
};
use analysis::{ColorSummary, GameAnalysis, MoveEvaluation};

/// SQLite implementation of [`ReviewRepository`].
pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for SqliteReviewRepository {
    async fn save_review(&self, review: &GameAnalysis) -> Result<(), PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let (status_str, status_current_ply, status_total_plies, status_error) =
            encode_status(&review.status);
        let status_current_ply = status_current_ply.map(|v| v as i64);
        let status_total_plies = status_total_plies.map(|v| v as i64);
        let total_plies = review.total_plies as i64;
        let analyzed_plies = review.analyzed_plies as i64;
        let analysis_depth = review.analysis_depth as i64;
        let created_at = now_timestamp() as i64;
        let started_at = review.started_at;
        let completed_at = review.completed_at;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO game_reviews
                (game_id, status, status_current_ply, status_total_plies, status_error,
                 white_overall_cpl, white_opening_cpl, white_middlegame_cpl, white_endgame_cpl,
                 white_accuracy, white_best_count, white_excellent_count, white_good_count,
                 white_inaccuracy_count, white_mistake_count, white_blunder_count,
                 black_overall_cpl, black_opening_cpl, black_middlegame_cpl, black_endgame_cpl,
                 black_accuracy, black_best_count, black_excellent_count, black_good_count,
                 black_inaccuracy_count, black_mistake_count, black_blunder_count,
                 total_plies, analyzed_plies, analysis_depth,
                 created_at, started_at, completed_at, winner)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&review.game_id)
        .bind(status_str)
        .bind(status_current_ply)
        .bind(status_total_plies)
        .bind(status_error)
        .bind(review.white.overall_cpl)
        .bind(review.white.opening_cpl)
        .bind(review.white.middlegame_cpl)
        .bind(review.white.endgame_cpl)
        .bind(review.white.accuracy)
        .bind(review.white.best_count as i64)
        .bind(review.white.excellent_count as i64)
        .bind(review.white.good_count as i64)
        .bind(review.white.inaccuracy_count as i64)
        .bind(review.white.mistake_count as i64)
        .bind(review.white.blunder_count as i64)
        .bind(review.black.overall_cpl)
        .bind(review.black.opening_cpl)
        .bind(review.black.middlegame_cpl)
        .bind(review.black.endgame_cpl)
        .bind(review.black.accuracy)
        .bind(review.black.best_count as i64)
        .bind(review.black.excellent_count as i64)
        .bind(review.black.good_count as i64)
        .bind(review.black.inaccuracy_count as i64)
        .bind(review.black.mistake_count as i64)
        .bind(review.black.blunder_count as i64)
        .bind(total_plies)
        .bind(analyzed_plies)
        .bind(analysis_depth)
        .bind(created_at)
        .bind(started_at)
        .bind(completed_at)
        .bind(&review.winner)
        .execute(&mut *tx)
        .await?;

        for mv in &review.moves {
            let ply = mv.ply as i64;
            let piece_moved = mv.piece_moved.to_string();
            let quality = encode_quality(mv.quality);
            let blunder_subtype = encode_blunder_subtype(mv.blunder_subtype);
            let phase = encode_phase(mv.phase);
            let cp_loss = mv.cp_loss as i64;
            let depth = mv.depth as i64;
            let clock_ms = mv.clock_ms.map(|v| v as i64);
            let pv_json = serde_json::to_string(&mv.pv)?;

            sqlx::query(
                r#"
                INSERT OR IGNORE INTO move_evaluations
                    (game_id, ply, fen_before, piece_moved, played_uci, played_san,
                     best_move_uci, best_move_san,
                     eval_before_cp, eval_before_mate, eval_after_cp, eval_after_mate,
                     eval_best_cp, eval_best_mate,
                     quality, cp_loss, weighted_cp_loss, blunder_subtype, phase, accuracy,
                     pv, depth, clock_ms, degraded)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&review.game_id)
            .bind(ply)
            .bind(&mv.fen_before)
            .bind(piece_moved)
            .bind(&mv.played_uci)
            .bind(&mv.played_san)
            .bind(&mv.best_move_uci)
            .bind(&mv.best_move_san)
            .bind(mv.eval_before_cp)
            .bind(mv.eval_before_mate)
            .bind(mv.eval_after_cp)
            .bind(mv.eval_after_mate)
            .bind(mv.eval_best_cp)
            .bind(mv.eval_best_mate)
            .bind(quality)
            .bind(cp_loss)
            .bind(mv.weighted_cp_loss)
            .bind(blunder_subtype)
            .bind(phase)
            .bind(mv.accuracy)
            .bind(&pv_json)
            .bind(depth)
            .bind(clock_ms)
            .bind(mv.degraded)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn load_review(&self, game_id: &str) -> Result<Option<GameAnalysis>, PersistenceError> {
        let header = sqlx::query(
            r#"
            SELECT status, status_current_ply, status_total_plies, status_error,
                   white_overall_cpl, white_opening_cpl, white_middlegame_cpl, white_endgame_cpl,
                   white_accuracy, white_best_count, white_excellent_count, white_good_count,
                   white_inaccuracy_count, white_mistake_count, white_blunder_count,
                   black_overall_cpl, black_opening_cpl, black_middlegame_cpl, black_endgame_cpl,
                   black_accuracy, black_best_count, black_excellent_count, black_good_count,
                   black_inaccuracy_count, black_mistake_count, black_blunder_count,
                   total_plies, analyzed_plies, analysis_depth, started_at, completed_at, winner
            FROM game_reviews
            WHERE game_id = ?
            "#,
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match header {
            None => return Ok(None),
            Some(r) => r,
        };

        use sqlx::Row;
        let status_str: String = row.get("status");
        let status_current_ply: Option<i64> = row.get("status_current_ply");
        let status_total_plies: Option<i64> = row.get("status_total_plies");
        let status_error: Option<String> = row.get("status_error");
        let total_plies: i64 = row.get("total_plies");
        let analyzed_plies: i64 = row.get("analyzed_plies");
        let analysis_depth: i64 = row.get("analysis_depth");
        let started_at: Option<i64> = row.get("started_at");
        let completed_at: Option<i64> = row.get("completed_at");
        let winner: Option<String> = row.get("winner");

        let status = decode_status(
            &status_str,
            status_current_ply.map(|v| v as u32),
            status_total_plies.map(|v| v as u32),
            status_error,
        );

        let white = ColorSummary {
            overall_cpl: row.get("white_overall_cpl"),
            opening_cpl: row.get("white_opening_cpl"),
            middlegame_cpl: row.get("white_middlegame_cpl"),
            endgame_cpl: row.get("white_endgame_cpl"),
            accuracy: row.get("white_accuracy"),
            best_count: row.get::<i64, _>("white_best_count") as u32,
            excellent_count: row.get::<i64, _>("white_excellent_count") as u32,
            good_count: row.get::<i64, _>("white_good_count") as u32,
            inaccuracy_count: row.get::<i64, _>("white_inaccuracy_count") as u32,
            mistake_count: row.get::<i64, _>("white_mistake_count") as u32,
            blunder_count: row.get::<i64, _>("white_blunder_count") as u32,
        };
        let black = ColorSummary {
            overall_cpl: row.get("black_overall_cpl"),
            opening_cpl: row.get("black_opening_cpl"),
            middlegame_cpl: row.get("black_middlegame_cpl"),
            endgame_cpl: row.get("black_endgame_cpl"),
            accuracy: row.get("black_accuracy"),
            best_count: row.get::<i64, _>("black_best_count") as u32,
            excellent_count: row.get::<i64, _>("black_excellent_count") as u32,
            good_count: row.get::<i64, _>("black_good_count") as u32,
            inaccuracy_count: row.get::<i64, _>("black_inaccuracy_count") as u32,
            mistake_count: row.get::<i64, _>("black_mistake_count") as u32,
            blunder_count: row.get::<i64, _>("black_blunder_count") as u32,
        };

        let move_rows = sqlx::query(
            r#"
            SELECT ply, fen_before, piece_moved, played_uci, played_san,
                   best_move_uci, best_move_san,
                   eval_before_cp, eval_before_mate, eval_after_cp, eval_after_mate,
                   eval_best_cp, eval_best_mate,
                   quality, cp_loss, weighted_cp_loss, blunder_subtype, phase, accuracy,
                   pv, depth, clock_ms, degraded
            FROM move_evaluations
            WHERE game_id = ?
            ORDER BY ply ASC
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        let mut moves = Vec::with_capacity(move_rows.len());
        for mr in move_rows {
            let ply: i64 = mr.get("ply");
            let piece_moved_str: String = mr.get("piece_moved");
            let quality_str: String = mr.get("quality");
            let blunder_subtype_str: Option<String> = mr.get("blunder_subtype");
            let phase_str: String = mr.get("phase");
            let depth: i64 = mr.get("depth");
            let clock_ms: Option<i64> = mr.get("clock_ms");
            let cp_loss: i64 = mr.get("cp_loss");
            let pv_json: String = mr.get("pv");
            let pv: Vec<String> = serde_json::from_str(&pv_json).unwrap_or_default();

            moves.push(MoveEvaluation {
                ply: ply as u32,
                fen_before: mr.get("fen_before"),
                piece_moved: piece_moved_str.chars().next().unwrap_or('?'),
                played_uci: mr.get("played_uci"),
                played_san: mr.get("played_san"),
                best_move_uci: mr.get("best_move_uci"),
                best_move_san: mr.get("best_move_san"),
                eval_before_cp: mr.get("eval_before_cp"),
                eval_before_mate: mr.get("eval_before_mate"),
                eval_after_cp: mr.get("eval_after_cp"),
                eval_after_mate: mr.get("eval_after_mate"),
                eval_best_cp: mr.get("eval_best_cp"),
                eval_best_mate: mr.get("eval_best_mate"),
                quality: decode_quality(&quality_str),
                cp_loss: cp_loss as i32,
                weighted_cp_loss: mr.get("weighted_cp_loss"),
                blunder_subtype: decode_blunder_subtype(blunder_subtype_str.as_deref()),
                phase: decode_phase(&phase_str),
                accuracy: mr.get("accuracy"),
                pv,
                depth: depth as u8,
                clock_ms: clock_ms.map(|v| v as u64),
                degraded: mr.get("degraded"),
            });
        }

        Ok(Some(GameAnalysis {
            game_id: game_id.to_string(),
            status,
            moves,
            white,
            black,
            total_plies: total_plies as u32,
            analyzed_plies: analyzed_plies as u32,
            analysis_depth: analysis_depth as u8,
            started_at,
            completed_at,
            winner,
        }))
    }

    async fn list_reviews(&self) -> Result<Vec<GameAnalysis>, PersistenceError> {
        let game_ids: Vec<(String,)> =
            sqlx::query_as("SELECT game_id FROM game_reviews ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        let mut reviews = Vec::with_capacity(game_ids.len());
        for (game_id,) in game_ids {
            if let Some(review) = self.load_review(&game_id).await? {
                reviews.push(review);
            }
        }

        Ok(reviews)
    }

    async fn delete_review(&self, game_id: &str) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM game_reviews WHERE game_id = ?")
            .bind(game_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::Database;
    use analysis::{BlunderSubType, Phase, QualityLabel, ReviewStatus};

    async fn test_db() -> (Database, SqliteReviewRepository) {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqliteReviewRepository::new(db.pool().clone());
        (db, repo)
    }

    /// Insert a stub finished game so FK constraints are satisfied.
    async fn insert_parent_game(db: &Database, game_id: &str) {
        sqlx::query(
            "INSERT OR IGNORE INTO finished_games \
             (game_id, start_fen, result, result_reason, game_mode, \
              human_side, skill_level, move_count, created_at) \
             VALUES (?, 'startpos', 'Draw', 'Agreement', 'HumanVsHuman', NULL, 10, 1, 0)",
        )
        .bind(game_id)
        .execute(db.pool())
        .await
        .unwrap();
    }

    fn sample_move(ply: u32) -> MoveEvaluation {
        MoveEvaluation {
            ply,
            fen_before: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
            piece_moved: 'P',
            played_uci: "e2e4".to_string(),
            played_san: "e4".to_string(),
            best_move_uci: "e2e4".to_string(),
            best_move_san: "e4".to_string(),
            eval_before_cp: 20,
            eval_before_mate: false,
            eval_after_cp: 25,
            eval_after_mate: false,
            eval_best_cp: 25,
            eval_best_mate: false,
            quality: QualityLabel::Best,
            cp_loss: 0,
            weighted_cp_loss: 0.0,
            blunder_subtype: None,
            phase: Phase::Opening,
            accuracy: 100.0,
            pv: vec!["e5".to_string(), "Nf3".to_string()],
            depth: 18,
            clock_ms: Some(60000),
            degraded: false,
        }
    }

    fn complete_review(game_id: &str) -> GameAnalysis {
        GameAnalysis {
            game_id: game_id.to_string(),
            status: ReviewStatus::Complete,
            moves: vec![sample_move(1), sample_move(2)],
            white: ColorSummary {
                accuracy: 92.5,
                ..ColorSummary::default()
            },
            black: ColorSummary {
                accuracy: 88.3,
                ..ColorSummary::default()
            },
            total_plies: 2,
            analyzed_plies: 2,
            analysis_depth: 18,
            started_at: Some(1000),
            completed_at: Some(2000),
            winner: Some("White".to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_001").await;
        let review = complete_review("game_001");

        repo.save_review(&review).await.unwrap();
        let loaded = repo.load_review("game_001").await.unwrap().unwrap();

        assert_eq!(loaded.game_id, review.game_id);
        assert_eq!(loaded.status, review.status);
        assert_eq!(loaded.moves.len(), 2);
        assert_eq!(loaded.white.accuracy, review.white.accuracy);
        assert_eq!(loaded.black.accuracy, review.black.accuracy);
        assert_eq!(loaded.total_plies, review.total_plies);
        assert_eq!(loaded.analyzed_plies, review.analyzed_plies);
        assert_eq!(loaded.analysis_depth, review.analysis_depth);
        assert_eq!(loaded.started_at, review.started_at);
        assert_eq!(loaded.completed_at, review.completed_at);
        assert_eq!(loaded.winner, review.winner);

        let mv = &loaded.moves[0];
        assert_eq!(mv.ply, 1);
        assert_eq!(mv.played_san, "e4");
        assert_eq!(mv.eval_before_cp, 20);
        assert!(!mv.eval_before_mate);
        assert_eq!(mv.quality, QualityLabel::Best);
        assert_eq!(mv.cp_loss, 0);
        assert_eq!(mv.pv, vec!["e5".to_string(), "Nf3".to_string()]);
        assert_eq!(mv.clock_ms, Some(60000));
    }

    #[tokio::test]
    async fn test_partial_review_analyzing_status() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_002").await;
        let review = GameAnalysis {
            game_id: "game_002".to_string(),
            status: ReviewStatus::Analyzing {
                current_ply: 5,
                total_plies: 40,
            },
            moves: vec![sample_move(1), sample_move(2), sample_move(3)],
            white: ColorSummary::default(),
            black: ColorSummary::default(),
            total_plies: 40,
            analyzed_plies: 5,
            analysis_depth: 20,
            started_at: Some(5000),
            completed_at: None,
            winner: None,
        };

        repo.save_review(&review).await.unwrap();
        let loaded = repo.load_review("game_002").await.unwrap().unwrap();

        assert_eq!(
            loaded.status,
            ReviewStatus::Analyzing {
                current_ply: 5,
                total_plies: 40
            }
        );
        assert_eq!(loaded.moves.len(), 3);
        assert_eq!(loaded.completed_at, None);
        assert_eq!(loaded.winner, None);
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let (_db, repo) = test_db().await;
        let result = repo.load_review("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_reviews() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_a").await;
        insert_parent_game(&db, "game_b").await;
        insert_parent_game(&db, "game_c").await;

        repo.save_review(&complete_review("game_a")).await.unwrap();
        repo.save_review(&complete_review("game_b")).await.unwrap();
        repo.save_review(&complete_review("game_c")).await.unwrap();

        let list = repo.list_reviews().await.unwrap();
        assert_eq!(list.len(), 3);
        let ids: Vec<&str> = list.iter().map(|r| r.game_id.as_str()).collect();
        assert!(ids.contains(&"game_a"));
        assert!(ids.contains(&"game_b"));
        assert!(ids.contains(&"game_c"));
    }

    #[tokio::test]
    async fn test_delete_review() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_del").await;

        repo.save_review(&complete_review("game_del")).await.unwrap();
        repo.delete_review("game_del").await.unwrap();

        let result = repo.load_review("game_del").await.unwrap();
        assert!(result.is_none());

        let list = repo.list_reviews().await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_positions() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_cascade").await;

        repo.save_review(&complete_review("game_cascade")).await.unwrap();
        let loaded = repo.load_review("game_cascade").await.unwrap().unwrap();
        assert_eq!(loaded.moves.len(), 2);

        repo.delete_review("game_cascade").await.unwrap();
        let result = repo.load_review("game_cascade").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_insert_or_ignore_positions_on_resave() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_resave").await;

        let mut review = complete_review("game_resave");
        repo.save_review(&review).await.unwrap();

        review.analyzed_plies = 3;
        review.moves.push(sample_move(3));
        repo.save_review(&review).await.unwrap();

        let loaded = repo.load_review("game_resave").await.unwrap().unwrap();
        // The 2 existing moves were ignored (INSERT OR IGNORE), new one added
        assert_eq!(loaded.moves.len(), 3);
        assert_eq!(loaded.analyzed_plies, 3);
    }

    #[tokio::test]
    async fn test_failed_status_roundtrip() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_fail").await;
        let review = GameAnalysis {
            game_id: "game_fail".to_string(),
            status: ReviewStatus::Failed {
                error: "engine timed out".to_string(),
            },
            moves: vec![],
            white: ColorSummary::default(),
            black: ColorSummary::default(),
            total_plies: 50,
            analyzed_plies: 3,
            analysis_depth: 18,
            started_at: Some(9000),
            completed_at: None,
            winner: None,
        };

        repo.save_review(&review).await.unwrap();
        let loaded = repo.load_review("game_fail").await.unwrap().unwrap();

        assert_eq!(
            loaded.status,
            ReviewStatus::Failed {
                error: "engine timed out".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_mate_score_roundtrip() {
        let (db, repo) = test_db().await;
        insert_parent_game(&db, "game_mate").await;
        let mut mv = sample_move(1);
        mv.eval_before_cp = analysis::MATE_SCORE_CP;
        mv.eval_before_mate = true;
        mv.eval_after_cp = -analysis::MATE_SCORE_CP;
        mv.eval_after_mate = true;
        mv.eval_best_cp = analysis::MATE_SCORE_CP;
        mv.eval_best_mate = true;
        mv.quality = QualityLabel::Best;
        mv.blunder_subtype = Some(BlunderSubType::MissedMate);

        let review = GameAnalysis {
            game_id: "game_mate".to_string(),
            status: ReviewStatus::Complete,
            moves: vec![mv],
            white: ColorSummary {
                accuracy: 100.0,
                ..ColorSummary::default()
            },
            black: ColorSummary::default(),
            total_plies: 1,
            analyzed_plies: 1,
            analysis_depth: 20,
            started_at: None,
            completed_at: None,
            winner: Some("White".to_string()),
        };

        repo.save_review(&review).await.unwrap();
        let loaded = repo.load_review("game_mate").await.unwrap().unwrap();

        let m = &loaded.moves[0];
        assert_eq!(m.eval_before_cp, analysis::MATE_SCORE_CP);
        assert!(m.eval_before_mate);
        assert_eq!(m.eval_after_cp, -analysis::MATE_SCORE_CP);
        assert!(m.eval_after_mate);
        assert_eq!(m.blunder_subtype, Some(BlunderSubType::MissedMate));
    }
}
