// Airport pair validation against the supplier location lookup

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ApiError;
use crate::error::SearchError;
use crate::supplier::LocationResult;

// Location lookup capability provided by the supplier
#[async_trait]
pub trait LocationLookup: Send + Sync + 'static {
    async fn get_location(&self, code: &str) -> Result<LocationResult, ApiError>;
}

/// Strips everything that is not an ASCII letter or digit from an airport code.
pub fn sanitize_code(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Splits a raw `"A,B"` pair into exactly two sanitized, non-empty codes.
pub fn split_pair(raw: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = raw.trim().split(',').map(str::trim).collect();
    if tokens.len() != 2 || tokens.iter().any(|t| t.is_empty()) {
        return None;
    }

    let first = sanitize_code(tokens[0]);
    let second = sanitize_code(tokens[1]);
    if first.is_empty() || second.is_empty() {
        return None;
    }

    Some((first, second))
}

pub struct LocationValidator {
    lookup: Arc<dyn LocationLookup>,
}

impl LocationValidator {
    pub fn new(lookup: Arc<dyn LocationLookup>) -> Self {
        Self { lookup }
    }

    /// Validates the raw airport pair and returns the sanitized codes joined
    /// by a comma, in their original order.
    pub async fn validate(&self, fly_to: &str) -> Result<String, SearchError> {
        let (first, second) = match split_pair(fly_to) {
            Some(pair) => pair,
            None => {
                warn!("Rejected airport pair '{}': expected two codes", fly_to);
                return Err(SearchError::invalid_format(None));
            }
        };

        // Both lookups must succeed; order between them is irrelevant
        let (first_result, second_result) = futures::try_join!(
            self.lookup.get_location(&first),
            self.lookup.get_location(&second)
        )
        .map_err(|e| {
            warn!("Location lookup failed for '{},{}': {}", first, second, e);
            SearchError::invalid_format(Some(e))
        })?;

        debug!(
            "Location lookup {} -> {} matches, {} -> {} matches",
            first,
            first_result.locations.len(),
            second,
            second_result.locations.len()
        );

        if first_result.is_empty() || second_result.is_empty() {
            warn!("Unknown airport code in pair '{},{}'", first, second);
            return Err(SearchError::invalid_code());
        }

        Ok(format!("{},{}", first, second))
    }
}
