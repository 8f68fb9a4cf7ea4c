// SQLite-backed search record store

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::recorder::{RecordStore, SearchRecord, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS flight_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fly_to TEXT NOT NULL,
    currency TEXT NOT NULL,
    date_to TEXT NOT NULL,
    date_from TEXT NOT NULL,
    record_date_time TEXT NOT NULL
)";

const SELECT_COLUMNS: &str =
    "SELECT id, fly_to, currency, date_from, date_to, record_date_time FROM flight_records";

#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, []).map_err(db_error)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // Runs a closure against the connection off the async runtime
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn db_error(e: rusqlite::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SearchRecord> {
    Ok(SearchRecord {
        id: Some(row.get(0)?),
        fly_to: row.get(1)?,
        currency: row.get(2)?,
        date_from: row.get(3)?,
        date_to: row.get(4)?,
        record_date_time: row.get(5)?,
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, mut record: SearchRecord) -> Result<SearchRecord, StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO flight_records (fly_to, currency, date_to, date_from, record_date_time) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.fly_to,
                    record.currency,
                    record.date_to,
                    record.date_from,
                    record.record_date_time
                ],
            )
            .map_err(db_error)?;
            record.id = Some(conn.last_insert_rowid());
            Ok(record)
        })
        .await
    }

    async fn get(&self, id: i64) -> Result<SearchRecord, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()
            .map_err(db_error)?
            .ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn list(&self) -> Result<Vec<SearchRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
                .map_err(db_error)?;

            let rows = stmt.query_map([], row_to_record).map_err(db_error)?;

            let mut records = Vec::new();
            for r in rows {
                records.push(r.map_err(db_error)?);
            }
            Ok(records)
        })
        .await
    }
}
