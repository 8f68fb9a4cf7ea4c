// Flight price averages over the SkyPicker flight search API

pub mod aggregate;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod orchestrator;
pub mod params;
pub mod recorder;
pub mod sqlite_store;
pub mod supplier;

#[cfg(test)]
mod mock_supplier;

// Re-export key types for convenience
pub use aggregate::{AggregationError, BagsAverage, DestinationAggregator, DestinationSummary};
pub use client::{ApiError, ClientConfig, ClientError, SkyPickerClient};
pub use error::{ErrorKind, ErrorResponse, SearchError};
pub use fetcher::{FlightFetcher, FlightSearch};
pub use location::{LocationLookup, LocationValidator};
pub use orchestrator::{SearchHeaderResult, SearchOrchestrator};
pub use params::SearchParams;
pub use recorder::{InMemoryRecordStore, RecordStore, SearchRecord, SearchRecorder, StoreError};
pub use sqlite_store::SqliteRecordStore;
pub use supplier::{Baggage, FlightOffer, FlightSearchResponse, Location, LocationResult};
