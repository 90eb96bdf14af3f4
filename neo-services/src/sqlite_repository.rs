//! SQLite portfolio repository
//!
//! Each portfolio is one JSON document in the `data` column. The timestamps are
//! mirrored into integer columns so listings can be ordered without parsing
//! documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo_core::{NeoError, NeoResult, Portfolio};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

use crate::repository::{ArrayEntry, PortfolioRepository, SortKey, SortOrder};

/// Portfolio repository backed by a single SQLite connection
pub struct SqlitePortfolioRepository {
    conn: Mutex<Connection>,
}

impl SqlitePortfolioRepository {
    /// Open (or create) the database at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> NeoResult<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NeoError::storage(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path.as_ref()).map_err(db_error)?;
        info!("Opened portfolio database at {}", db_path.as_ref().display());

        Self::with_connection(conn)
    }

    /// In-memory database, for tests
    pub fn new_in_memory() -> NeoResult<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_error)?)
    }

    fn with_connection(conn: Connection) -> NeoResult<Self> {
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn init_schema(&self) -> NeoResult<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS portfolios (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                data TEXT NOT NULL CHECK (json_valid(data))
            );

            CREATE INDEX IF NOT EXISTS idx_portfolios_created
            ON portfolios(created_at);
            "#,
        )
        .map_err(db_error)
    }
}

#[async_trait]
impl PortfolioRepository for SqlitePortfolioRepository {
    async fn create(&self, portfolio: &Portfolio) -> NeoResult<()> {
        let data = to_json_text(portfolio)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO portfolios (id, created_at, updated_at, data) VALUES (?1, ?2, ?3, ?4)",
            params![
                portfolio.id,
                portfolio.created_at.timestamp_millis(),
                portfolio.updated_at.timestamp_millis(),
                data,
            ],
        )
        .map_err(db_error)?;

        debug!("Stored portfolio {}", portfolio.id);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> NeoResult<Option<Portfolio>> {
        let conn = self.conn.lock();

        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM portfolios WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;

        data.as_deref().map(from_json_text).transpose()
    }

    async fn append_to_array_field(
        &self,
        id: &str,
        entry: ArrayEntry,
        updated_at: DateTime<Utc>,
    ) -> NeoResult<bool> {
        let path = format!("$.{}[#]", entry.field());
        let value = entry
            .to_json()
            .map_err(|e| NeoError::storage(format!("Failed to encode entry: {}", e)))?;
        let stamp = to_json_text(&updated_at)?;

        let conn = self.conn.lock();
        let changed = conn
            .execute(
                r#"
                UPDATE portfolios
                SET data = json_set(json_insert(data, ?2, json(?3)), '$.updated_at', json(?4)),
                    updated_at = ?5
                WHERE id = ?1
                "#,
                params![
                    id,
                    path,
                    value.to_string(),
                    stamp,
                    updated_at.timestamp_millis(),
                ],
            )
            .map_err(db_error)?;

        debug!("Appended to {} of portfolio {} ({} rows)", entry.field(), id, changed);
        Ok(changed > 0)
    }

    async fn list_sorted_by(&self, key: SortKey, order: SortOrder) -> NeoResult<Vec<Portfolio>> {
        let column = match key {
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
        };
        let direction = match order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        // rowid breaks ties between documents stamped in the same millisecond
        let sql = format!(
            "SELECT data FROM portfolios ORDER BY {column} {direction}, rowid {direction}"
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(db_error)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_error)?;

        let mut portfolios = Vec::new();
        for row in rows {
            portfolios.push(from_json_text(&row.map_err(db_error)?)?);
        }
        Ok(portfolios)
    }
}

fn db_error(e: rusqlite::Error) -> NeoError {
    NeoError::storage(format!("Database error: {}", e))
}

fn to_json_text<T: serde::Serialize>(value: &T) -> NeoResult<String> {
    serde_json::to_string(value)
        .map_err(|e| NeoError::storage(format!("Failed to encode document: {}", e)))
}

fn from_json_text(data: &str) -> NeoResult<Portfolio> {
    serde_json::from_str(data)
        .map_err(|e| NeoError::storage(format!("Corrupt portfolio document: {}", e)))
}
