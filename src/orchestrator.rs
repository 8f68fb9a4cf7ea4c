// Validate -> fetch -> aggregate -> record pipeline behind a single search call

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::aggregate::{DestinationAggregator, DestinationSummary};
use crate::error::SearchError;
use crate::fetcher::{FlightFetcher, FlightSearch};
use crate::location::{LocationLookup, LocationValidator};
use crate::params::SearchParams;
use crate::recorder::{Clock, RecordStore, SearchRecorder};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHeaderResult {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub average_flights: BTreeMap<String, DestinationSummary>,
}

impl SearchHeaderResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

pub struct SearchOrchestrator {
    validator: LocationValidator,
    fetcher: FlightFetcher,
    aggregator: DestinationAggregator,
    recorder: SearchRecorder,
}

impl SearchOrchestrator {
    pub fn new(
        locations: Arc<dyn LocationLookup>,
        flights: Arc<dyn FlightSearch>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            validator: LocationValidator::new(locations),
            fetcher: FlightFetcher::new(flights),
            aggregator: DestinationAggregator::new(),
            recorder: SearchRecorder::new(store),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.recorder = self.recorder.with_clock(clock);
        self
    }

    /// Runs one search end to end.
    ///
    /// Airport validation errors are returned as-is. Anything failing after
    /// validation is wrapped in [`SearchError::AverageFlights`], with the
    /// original error kept as its source.
    pub async fn filter_flights(
        &self,
        mut params: SearchParams,
    ) -> Result<SearchHeaderResult, SearchError> {
        info!("filterFlights started: {}", params.to_json());

        params.fly_from = self.validator.validate(&params.fly_to).await?;

        match self.run_pipeline(&params).await {
            Ok(result) => {
                info!("Flights average response: {}", result.to_json());
                Ok(result)
            }
            Err(e) => {
                error!("Search for {} failed after validation: {}", params.fly_from, e);
                Err(SearchError::AverageFlights(Box::new(e)))
            }
        }
    }

    async fn run_pipeline(&self, params: &SearchParams) -> Result<SearchHeaderResult, SearchError> {
        let response = self.fetcher.fetch(params).await?;
        let average_flights = self.aggregator.aggregate(&response)?;

        // Checked before persisting so a bad date leaves no record behind
        let (date_from, date_to) = params.normalized_dates()?;

        self.recorder.record(params).await?;

        Ok(SearchHeaderResult {
            date_from,
            date_to,
            average_flights,
        })
    }
}
