//! Database repository for event management operations.
//!
//! An event is stored across three tables: its own row, the logistics rows
//! pointing at it, and its pairs in `event_participants`. Reads hydrate all
//! three; `save` writes all three in one transaction.

use crate::database::models::{Event, Role};
use crate::repositories::{EventPort, logistics_repository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    description: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    cost: f64,
}

/// Repository for event database operations.
pub struct EventRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> EventRepository<'a> {
    /// Creates a new EventRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn hydrate(conn: &mut SqliteConnection, row: EventRow) -> Result<Event> {
        let participants = sqlx::query_scalar::<_, i64>(
            "SELECT participant_id FROM event_participants WHERE event_id = ? ORDER BY participant_id",
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?;

        let logistics = logistics_repository::find_by_event_id(conn, row.id).await?;

        Ok(Event {
            id: Some(row.id),
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            cost: row.cost,
            participants: participants.into_iter().collect(),
            logistics,
        })
    }

    async fn hydrate_all(conn: &mut SqliteConnection, rows: Vec<EventRow>) -> Result<Vec<Event>> {
        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(Self::hydrate(conn, row).await?);
        }
        Ok(events)
    }
}

#[async_trait]
impl<'a> EventPort for EventRepository<'a> {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, description, start_date, end_date, cost FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Event>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, description, start_date, end_date, cost FROM events WHERE description = ?",
        )
        .bind(description)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_start_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, description, start_date, end_date, cost
            FROM events
            WHERE start_date BETWEEN ? AND ?
            ORDER BY start_date, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *conn)
        .await?;

        Self::hydrate_all(&mut conn, rows).await
    }

    async fn find_by_participant(
        &self,
        name: &str,
        first_name: &str,
        role: Role,
    ) -> Result<Vec<Event>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT DISTINCT e.id, e.description, e.start_date, e.end_date, e.cost
            FROM events e
            JOIN event_participants ep ON ep.event_id = e.id
            JOIN participants p ON p.id = ep.participant_id
            WHERE p.name = ? AND p.first_name = ? AND p.role = ?
            ORDER BY e.id
            "#,
        )
        .bind(name)
        .bind(first_name)
        .bind(role)
        .fetch_all(&mut *conn)
        .await?;

        Self::hydrate_all(&mut conn, rows).await
    }

    async fn save(&self, mut event: Event) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        let id = match event.id {
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO events (id, description, start_date, end_date, cost)
                    VALUES (?, ?, ?, ?, ?)
                    ON CONFLICT (id) DO UPDATE SET
                    description = excluded.description,
                    start_date = excluded.start_date,
                    end_date = excluded.end_date,
                    cost = excluded.cost
                    "#,
                )
                .bind(id)
                .bind(&event.description)
                .bind(event.start_date)
                .bind(event.end_date)
                .bind(event.cost)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO events (description, start_date, end_date, cost)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(&event.description)
                .bind(event.start_date)
                .bind(event.end_date)
                .bind(event.cost)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        for participant_id in &event.participants {
            sqlx::query(
                "INSERT OR IGNORE INTO event_participants (event_id, participant_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(*participant_id)
            .execute(&mut *tx)
            .await?;
        }

        let items = std::mem::take(&mut event.logistics);
        let mut logistics = Vec::with_capacity(items.len());
        for mut item in items {
            item.event_id = Some(id);
            logistics.push(logistics_repository::upsert(&mut tx, item).await?);
        }

        tx.commit().await?;

        event.id = Some(id);
        event.logistics = logistics;
        Ok(event)
    }
}
