// Audit trail of executed searches

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::params::SearchParams;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store task failed: {0}")]
    Task(String),

    #[error("Search record {0} not found")]
    NotFound(i64),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    // Assigned by the store on create
    pub id: Option<i64>,
    pub fly_to: String,
    pub currency: String,
    pub date_from: String,
    pub date_to: String,
    pub record_date_time: NaiveDateTime,
}

impl SearchRecord {
    pub fn from_params(params: &SearchParams, recorded_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            fly_to: params.fly_to.clone(),
            currency: params.currency.clone(),
            date_from: params.date_from.clone(),
            date_to: params.date_to.clone(),
            record_date_time: recorded_at,
        }
    }
}

// Create/read persistence for search records
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn create(&self, record: SearchRecord) -> Result<SearchRecord, StoreError>;

    async fn get(&self, id: i64) -> Result<SearchRecord, StoreError>;

    // All records, ascending by id
    async fn list(&self) -> Result<Vec<SearchRecord>, StoreError>;
}

pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub struct SearchRecorder {
    store: Arc<dyn RecordStore>,
    clock: Clock,
}

impl SearchRecorder {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            clock: Arc::new(local_now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn record(&self, params: &SearchParams) -> Result<SearchRecord, StoreError> {
        let record = SearchRecord::from_params(params, (self.clock)());
        let saved = self.store.create(record).await?;
        debug!("Saved search record {:?} for {}", saved.id, saved.fly_to);
        Ok(saved)
    }
}

#[derive(Debug)]
pub struct InMemoryRecordStore {
    records: DashMap<i64, SearchRecord>,
    next_id: AtomicI64,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, mut record: SearchRecord) -> Result<SearchRecord, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.id = Some(id);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<SearchRecord, StoreError> {
        self.records
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<SearchRecord>, StoreError> {
        let mut records: Vec<SearchRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
