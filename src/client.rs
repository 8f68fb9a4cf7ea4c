// Supplier API client for location lookups and flight searches

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::fetcher::FlightSearch;
use crate::location::LocationLookup;
use crate::params::SearchParams;
use crate::supplier::{FlightSearchResponse, LocationResult};

// Transport-level errors from the supplier API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Empty response body")]
    EmptyBody,

    #[error("Decode error: {0}")]
    DecodeError(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub partner: String,
    pub timeout_ms: u64,
    pub location_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.skypicker.com".to_string(),
            api_key: String::new(),
            partner: "picky".to_string(),
            timeout_ms: 10000,
            location_limit: 10,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::ConfigError("base_url must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub struct SkyPickerClient {
    config: ClientConfig,
    client: Client,
}

impl SkyPickerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn location_query(&self, code: &str) -> Vec<(&'static str, String)> {
        vec![
            ("term", code.to_string()),
            ("location_types", "airport".to_string()),
            ("limit", self.config.location_limit.to_string()),
        ]
    }

    // The validated pair travels as origin, the caller's raw pair as destination
    pub fn flights_query(&self, params: &SearchParams) -> Vec<(&'static str, String)> {
        vec![
            ("flyFrom", params.fly_from.clone()),
            ("to", params.fly_to.clone()),
            ("dateFrom", params.date_from.clone()),
            ("dateTo", params.date_to.clone()),
            ("curr", params.currency.clone()),
            ("partner", self.config.partner.clone()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if !self.config.api_key.is_empty() {
            request = request.header("apikey", &self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        check_status(status, &body)?;
        decode_body(body)
    }
}

fn check_status(status: StatusCode, body: &Bytes) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ApiError::ApiResponseError {
        status_code: status.as_u16(),
        message: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Decodes a supplier response body, treating a blank body as absent.
pub fn decode_body<T: DeserializeOwned>(body: Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptyBody);
    }
    serde_json::from_slice(&body).map_err(|e| ApiError::DecodeError(e.to_string()))
}

#[async_trait]
impl LocationLookup for SkyPickerClient {
    async fn get_location(&self, code: &str) -> Result<LocationResult, ApiError> {
        self.get_json("locations", &self.location_query(code)).await
    }
}

#[async_trait]
impl FlightSearch for SkyPickerClient {
    async fn search_flights(&self, params: &SearchParams) -> Result<FlightSearchResponse, ApiError> {
        self.get_json("flights", &self.flights_query(params)).await
    }
}
