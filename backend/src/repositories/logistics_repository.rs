//! Database repository for logistics items.
//!
//! Besides the `LogisticsPort` implementation this module exposes the row
//! helpers the event repository uses to cascade an event's items inside its
//! own transaction.

use crate::database::models::Logistics;
use crate::repositories::LogisticsPort;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, FromRow)]
struct LogisticsRow {
    id: i64,
    description: String,
    reserved: bool,
    unit_price: f64,
    quantity: i32,
    event_id: Option<i64>,
}

impl From<LogisticsRow> for Logistics {
    fn from(row: LogisticsRow) -> Self {
        Logistics {
            id: Some(row.id),
            description: row.description,
            reserved: row.reserved,
            unit_price: row.unit_price,
            quantity: row.quantity,
            event_id: row.event_id,
        }
    }
}

/// Inserts or updates one logistics row and returns the item with its id.
pub(crate) async fn upsert(conn: &mut SqliteConnection, logistics: Logistics) -> Result<Logistics> {
    let id = match logistics.id {
        Some(id) => {
            sqlx::query(
                r#"
                INSERT INTO logistics (id, description, reserved, unit_price, quantity, event_id)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                description = excluded.description,
                reserved = excluded.reserved,
                unit_price = excluded.unit_price,
                quantity = excluded.quantity,
                event_id = excluded.event_id
                "#,
            )
            .bind(id)
            .bind(&logistics.description)
            .bind(logistics.reserved)
            .bind(logistics.unit_price)
            .bind(logistics.quantity)
            .bind(logistics.event_id)
            .execute(&mut *conn)
            .await?;
            id
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO logistics (description, reserved, unit_price, quantity, event_id)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&logistics.description)
            .bind(logistics.reserved)
            .bind(logistics.unit_price)
            .bind(logistics.quantity)
            .bind(logistics.event_id)
            .fetch_one(&mut *conn)
            .await?
        }
    };

    Ok(Logistics {
        id: Some(id),
        ..logistics
    })
}

/// Loads the items owned by an event, oldest first.
pub(crate) async fn find_by_event_id(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<Logistics>> {
    let rows = sqlx::query_as::<_, LogisticsRow>(
        r#"
        SELECT id, description, reserved, unit_price, quantity, event_id
        FROM logistics WHERE event_id = ?
        ORDER BY id
        "#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Logistics::from).collect())
}

/// Repository for logistics database operations.
pub struct LogisticsRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> LogisticsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a logistics item by its ID.
    pub async fn get_logistics_by_id(&self, id: i64) -> Result<Option<Logistics>> {
        let row = sqlx::query_as::<_, LogisticsRow>(
            r#"
            SELECT id, description, reserved, unit_price, quantity, event_id
            FROM logistics WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Logistics::from))
    }
}

#[async_trait]
impl<'a> LogisticsPort for LogisticsRepository<'a> {
    async fn save(&self, logistics: Logistics) -> Result<Logistics> {
        let mut conn = self.pool.acquire().await?;
        upsert(&mut conn, logistics).await
    }
}
