// Fake supplier and store collaborators for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::client::ApiError;
use crate::fetcher::FlightSearch;
use crate::location::LocationLookup;
use crate::params::SearchParams;
use crate::recorder::{RecordStore, SearchRecord, StoreError};
use crate::supplier::{Baggage, FlightOffer, FlightSearchResponse, Location, LocationResult};

// Builds an offer from amounts given in cents
pub fn offer(fly_to: &str, city_to: &str, price: i64, bag_one: i64, bag_two: i64) -> FlightOffer {
    FlightOffer {
        fly_to: fly_to.to_string(),
        city_to: city_to.to_string(),
        price: Decimal::new(price, 2),
        baggage: Some(Baggage::new(Decimal::new(bag_one, 2), Decimal::new(bag_two, 2))),
    }
}

// ApiError is not Clone, so failures are described and rebuilt per call
#[derive(Debug, Clone)]
enum Failure {
    Network(String),
    EmptyBody,
    Decode(String),
}

impl From<ApiError> for Failure {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::EmptyBody => Failure::EmptyBody,
            ApiError::DecodeError(msg) => Failure::Decode(msg),
            other => Failure::Network(other.to_string()),
        }
    }
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Network(msg) => ApiError::NetworkError(msg.clone()),
            Failure::EmptyBody => ApiError::EmptyBody,
            Failure::Decode(msg) => ApiError::DecodeError(msg.clone()),
        }
    }
}

pub struct MockLocations {
    known: HashMap<String, Location>,
    failure: Mutex<Option<Failure>>,
    calls: AtomicUsize,
}

impl MockLocations {
    pub fn with_codes(codes: &[&str]) -> Self {
        let known = codes
            .iter()
            .map(|code| {
                (
                    code.to_string(),
                    Location {
                        id: code.to_string(),
                        code: code.to_string(),
                        name: format!("{} Airport", code),
                        location_type: "airport".to_string(),
                    },
                )
            })
            .collect();

        Self {
            known,
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock() = Some(error.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationLookup for MockLocations {
    async fn get_location(&self, code: &str) -> Result<LocationResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure.lock().as_ref() {
            return Err(failure.to_error());
        }

        Ok(LocationResult {
            locations: self.known.get(code).cloned().into_iter().collect(),
        })
    }
}

pub struct MockFlights {
    response: Result<FlightSearchResponse, Failure>,
    calls: AtomicUsize,
    last_params: Mutex<Option<SearchParams>>,
}

impl MockFlights {
    pub fn returning(currency: &str, offers: Vec<FlightOffer>) -> Self {
        Self {
            response: Ok(FlightSearchResponse {
                currency: currency.to_string(),
                data: offers,
            }),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            response: Err(error.into()),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<SearchParams> {
        self.last_params.lock().clone()
    }
}

#[async_trait]
impl FlightSearch for MockFlights {
    async fn search_flights(&self, params: &SearchParams) -> Result<FlightSearchResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock() = Some(params.clone());
        self.response.clone().map_err(|f| f.to_error())
    }
}

// Store whose writes always fail
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn create(&self, _record: SearchRecord) -> Result<SearchRecord, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Database("connection to store lost".to_string()))
    }

    async fn get(&self, id: i64) -> Result<SearchRecord, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<SearchRecord>, StoreError> {
        Ok(vec![])
    }
}
