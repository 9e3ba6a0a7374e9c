//! Database repository for participant management operations.

use crate::database::models::{Participant, Role};
use crate::repositories::ParticipantPort;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct ParticipantRow {
    id: i64,
    name: String,
    first_name: String,
    role: Role,
}

/// Repository for participant database operations.
///
/// Handles persistence of the Participant entity and of the participant
/// side of the `event_participants` relation.
pub struct ParticipantRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ParticipantRepository<'a> {
    /// Creates a new ParticipantRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> ParticipantPort for ParticipantRepository<'a> {
    /// Retrieves a participant by its ID.
    ///
    /// # Returns
    /// `Some(Participant)` with its event ids if found, `None` otherwise
    async fn find_by_id(&self, id: i64) -> Result<Option<Participant>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, ParticipantRow>(
            "SELECT id, name, first_name, role FROM participants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let events = sqlx::query_scalar::<_, i64>(
            "SELECT event_id FROM event_participants WHERE participant_id = ? ORDER BY event_id",
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(Participant {
            id: Some(row.id),
            name: row.name,
            first_name: row.first_name,
            role: row.role,
            events: events.into_iter().collect(),
        }))
    }

    /// Inserts or updates the participant and adds its event pairs.
    async fn save(&self, mut participant: Participant) -> Result<Participant> {
        let mut tx = self.pool.begin().await?;

        let id = match participant.id {
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO participants (id, name, first_name, role)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    first_name = excluded.first_name,
                    role = excluded.role
                    "#,
                )
                .bind(id)
                .bind(&participant.name)
                .bind(&participant.first_name)
                .bind(participant.role)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO participants (name, first_name, role) VALUES (?, ?, ?) RETURNING id",
                )
                .bind(&participant.name)
                .bind(&participant.first_name)
                .bind(participant.role)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        for event_id in &participant.events {
            sqlx::query(
                "INSERT OR IGNORE INTO event_participants (event_id, participant_id) VALUES (?, ?)",
            )
            .bind(*event_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        participant.id = Some(id);
        Ok(participant)
    }
}
