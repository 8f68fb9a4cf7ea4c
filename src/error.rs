use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::AggregationError;
use crate::client::ApiError;
use crate::recorder::StoreError;

pub const INVALID_AIRPORT_FORMAT_MESSAGE: &str = "The flight codes are invalid. Please insert TWO AIRPORT CODES separated by commas, example: (OPO,LIS) or (LIS,OPO) to fetch data from PORTO and LISBON flights. Consult the link: https://airportcodes.aero/iata/ and see if the codes are valid.";

pub const INVALID_AIRPORT_CODE_MESSAGE: &str = "At least one of the airport codes is invalid. Consult the link: https://airportcodes.aero/iata/ and see if the codes are valid.";

pub const AVERAGE_FLIGHTS_MESSAGE: &str =
    "Unable to compute flight averages for the requested search. Please try again later.";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{message}")]
    InvalidAirportFormat {
        message: String,
        #[source]
        source: Option<ApiError>,
    },

    #[error("{message}")]
    InvalidAirportCode { message: String },

    #[error("Fetch error: {0}")]
    Fetch(#[source] ApiError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Invalid date '{value}'")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{}", AVERAGE_FLIGHTS_MESSAGE)]
    AverageFlights(#[source] Box<SearchError>),
}

/// Coarse classification of a search failure, looking through the
/// post-validation wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAirportFormat,
    InvalidAirportCode,
    Fetch,
    Aggregation,
    Persistence,
    InvalidDate,
}

impl SearchError {
    pub fn invalid_format(source: Option<ApiError>) -> Self {
        SearchError::InvalidAirportFormat {
            message: INVALID_AIRPORT_FORMAT_MESSAGE.to_string(),
            source,
        }
    }

    pub fn invalid_code() -> Self {
        SearchError::InvalidAirportCode {
            message: INVALID_AIRPORT_CODE_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::InvalidAirportFormat { .. } => ErrorKind::InvalidAirportFormat,
            SearchError::InvalidAirportCode { .. } => ErrorKind::InvalidAirportCode,
            SearchError::Fetch(_) => ErrorKind::Fetch,
            SearchError::Aggregation(_) => ErrorKind::Aggregation,
            SearchError::Persistence(_) => ErrorKind::Persistence,
            SearchError::InvalidDate { .. } => ErrorKind::InvalidDate,
            SearchError::AverageFlights(inner) => inner.kind(),
        }
    }

    // Client-caused errors are the only ones surfaced unwrapped
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidAirportFormat { .. } | SearchError::InvalidAirportCode { .. }
        )
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            status: self.status_code(),
        }
    }
}

/// Error body returned to the inbound caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
}
