//! sqlx-backed sql collaborator.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use flowbot_core::SessionValue;
use flowbot_engine::{ClientError, SqlClient};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, SqlitePool};

pub type DbPool = SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Runs jdbc-read and jdbc-write statements against a sqlite pool.
#[derive(Clone)]
pub struct SqlxSqlClient {
    pool: DbPool,
}

impl SqlxSqlClient {
    pub fn new(pool: DbPool) -> Self {
        SqlxSqlClient { pool }
    }
}

#[async_trait]
impl SqlClient for SqlxSqlClient {
    async fn query_for_list(
        &self,
        sql: &str,
    ) -> Result<Vec<BTreeMap<String, SessionValue>>, ClientError> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await.map_err(ClientError::call)?;
        Ok(rows
            .iter()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| (column.name().to_owned(), decode(row, column.ordinal())))
                    .collect()
            })
            .collect())
    }

    async fn update(&self, sql: &str) -> Result<u64, ClientError> {
        let result = sqlx::query(sql).execute(&self.pool).await.map_err(ClientError::call)?;
        Ok(result.rows_affected())
    }
}

/// Sqlite is dynamically typed, so each cell is tried as an integer, then
/// a real, then falls back to its text form. Nulls decode to empty text.
fn decode(row: &SqliteRow, ordinal: usize) -> SessionValue {
    if let Ok(value) = row.try_get::<i64, _>(ordinal) {
        return SessionValue::from(value);
    }
    if let Ok(value) = row.try_get::<f64, _>(ordinal) {
        return match serde_json::Number::from_f64(value) {
            Some(number) => SessionValue::Number(number),
            None => SessionValue::Text(value.to_string()),
        };
    }
    row.try_get::<String, _>(ordinal)
        .map(SessionValue::Text)
        .unwrap_or_else(|_| SessionValue::Text(String::new()))
}
