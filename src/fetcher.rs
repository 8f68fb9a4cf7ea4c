use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::client::ApiError;
use crate::error::SearchError;
use crate::params::SearchParams;
use crate::supplier::FlightSearchResponse;

// Flight search capability provided by the supplier
#[async_trait]
pub trait FlightSearch: Send + Sync + 'static {
    async fn search_flights(&self, params: &SearchParams) -> Result<FlightSearchResponse, ApiError>;
}

pub struct FlightFetcher {
    search: Arc<dyn FlightSearch>,
}

impl FlightFetcher {
    pub fn new(search: Arc<dyn FlightSearch>) -> Self {
        Self { search }
    }

    // Single attempt; a missing or malformed body fails the search
    pub async fn fetch(&self, params: &SearchParams) -> Result<FlightSearchResponse, SearchError> {
        let response = self
            .search
            .search_flights(params)
            .await
            .map_err(SearchError::Fetch)?;

        info!(
            "Flights from supplier: {} offers in {}",
            response.data.len(),
            response.currency
        );
        Ok(response)
    }
}
