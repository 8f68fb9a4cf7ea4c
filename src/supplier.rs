use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Data structures for the supplier location lookup response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationResult {
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl LocationResult {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub location_type: String,
}

// Data structures for the supplier flight search response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlightSearchResponse {
    pub currency: String,
    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub fly_to: String,
    pub city_to: String,
    pub price: Decimal,
    #[serde(default, rename = "bags_price")]
    pub baggage: Option<Baggage>,
}

/// Per-tier checked baggage fees. The supplier keys them by bag count and
/// leaves a tier out when the carrier does not sell it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Baggage {
    #[serde(default, rename = "1")]
    pub bag_one_price: Option<Decimal>,
    #[serde(default, rename = "2")]
    pub bag_two_price: Option<Decimal>,
}

impl Baggage {
    pub fn new(bag_one_price: Decimal, bag_two_price: Decimal) -> Self {
        Self {
            bag_one_price: Some(bag_one_price),
            bag_two_price: Some(bag_two_price),
        }
    }
}

// Sample payload recorded from the supplier
pub const SAMPLE_FLIGHTS_PATH: &str = "samples/flights_response.json";
