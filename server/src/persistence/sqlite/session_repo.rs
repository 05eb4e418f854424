//! SQLite-backed repository for suspended sessions.

use sqlx::SqlitePool;

use crate::persistence::{PersistenceError, SuspendedSessionData};
use crate::persistence::traits::SessionRepository;
use super::helpers::normalize_game_mode;

/// SQLite implementation of [`SessionRepository`].
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn save_session(&self, data: &SuspendedSessionData) -> Result<(), PersistenceError> {
        let game_mode = normalize_game_mode(&data.game_mode);
        let move_count = data.move_count as i64;
        let skill_level = data.skill_level as i64;
        let created_at = data.created_at as i64;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO suspended_sessions
                (suspended_id, fen, side_to_move, move_count, game_mode,
                 human_side, skill_level, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.suspended_id)
        .bind(&data.fen)
        .bind(&data.side_to_move)
        .bind(move_count)
        .bind(game_mode)
        .bind(&data.human_side)
        .bind(skill_level)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SuspendedSessionData>, PersistenceError> {
        let rows: Vec<(String, String, String, i64, String, Option<String>, i64, i64)> =
            sqlx::query_as(
                r#"
                SELECT suspended_id, fen, side_to_move, move_count, game_mode,
                       human_side, skill_level, created_at
                FROM suspended_sessions
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

        let sessions = rows
            .into_iter()
            .map(
                |(suspended_id, fen, side_to_move, move_count, game_mode, human_side, skill_level, created_at)| {
                    SuspendedSessionData {
                        suspended_id,
                        fen,
                        side_to_move,
                        move_count: move_count as u32,
                        game_mode,
                        human_side,
                        skill_level: skill_level as u8,
                        created_at: created_at as u64,
                    }
                },
            )
            .collect();

        Ok(sessions)
    }

    async fn load_session(&self, id: &str) -> Result<Option<SuspendedSessionData>, PersistenceError> {
        let row: Option<(String, String, String, i64, String, Option<String>, i64, i64)> =
            sqlx::query_as(
                r#"
                SELECT suspended_id, fen, side_to_move, move_count, game_mode,
                       human_side, skill_level, created_at
                FROM suspended_sessions
                WHERE suspended_id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(
            |(suspended_id, fen, side_to_move, move_count, game_mode, human_side, skill_level, created_at)| {
                SuspendedSessionData {
                    suspended_id,
                    fen,
                    side_to_move,
                    move_count: move_count as u32,
                    game_mode,
                    human_side,
                    skill_level: skill_level as u8,
                    created_at: created_at as u64,
                }
            },
        ))
    }

    async fn delete_session(&self, id: &str) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM suspended_sessions WHERE suspended_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
