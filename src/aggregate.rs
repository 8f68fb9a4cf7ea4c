// Per-destination price averages over a flight search response

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::supplier::{FlightOffer, FlightSearchResponse};

// Averages are rounded to two decimal places, half-up
pub const AVERAGE_SCALE: u32 = 2;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Missing baggage price (tier {tier}) for destination {destination}")]
    MissingBaggage { destination: String, tier: u8 },

    #[error("Arithmetic overflow while averaging destination {destination}")]
    Overflow { destination: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BagsAverage {
    #[serde(with = "rust_decimal::serde::float")]
    pub bag_one_average_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bag_two_average_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSummary {
    pub city_name: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_average: Decimal,
    #[serde(rename = "bagsPrice")]
    pub bags_average: BagsAverage,
}

pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Groups offers by destination code and averages each group.
///
/// Stateless: the same response always yields the same summaries. The city
/// name of a destination is taken from the first offer for it in response
/// order; the currency is the response-level one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DestinationAggregator;

impl DestinationAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn group_by_destination<'a>(
        &self,
        response: &'a FlightSearchResponse,
    ) -> BTreeMap<&'a str, Vec<&'a FlightOffer>> {
        let mut groups: BTreeMap<&str, Vec<&FlightOffer>> = BTreeMap::new();
        for offer in &response.data {
            groups.entry(offer.fly_to.as_str()).or_default().push(offer);
        }
        groups
    }

    pub fn aggregate(
        &self,
        response: &FlightSearchResponse,
    ) -> Result<BTreeMap<String, DestinationSummary>, AggregationError> {
        self.group_by_destination(response)
            .into_iter()
            .map(|(destination, offers)| {
                let summary = summarize(destination, &offers, &response.currency)?;
                Ok((destination.to_string(), summary))
            })
            .collect()
    }
}

fn summarize(
    destination: &str,
    offers: &[&FlightOffer],
    currency: &str,
) -> Result<DestinationSummary, AggregationError> {
    // Groups are built from at least one offer
    let representative = offers[0];

    let price_average = average(destination, offers.iter().map(|o| Ok(o.price)))?;
    let bag_one_average_price = average(
        destination,
        offers.iter().map(|o| bag_price(destination, o, 1)),
    )?;
    let bag_two_average_price = average(
        destination,
        offers.iter().map(|o| bag_price(destination, o, 2)),
    )?;

    Ok(DestinationSummary {
        city_name: representative.city_to.clone(),
        currency: currency.to_string(),
        price_average,
        bags_average: BagsAverage {
            bag_one_average_price,
            bag_two_average_price,
        },
    })
}

fn bag_price(destination: &str, offer: &FlightOffer, tier: u8) -> Result<Decimal, AggregationError> {
    let price = offer.baggage.as_ref().and_then(|b| match tier {
        1 => b.bag_one_price,
        _ => b.bag_two_price,
    });
    price.ok_or_else(|| AggregationError::MissingBaggage {
        destination: destination.to_string(),
        tier,
    })
}

fn average<I>(destination: &str, values: I) -> Result<Decimal, AggregationError>
where
    I: Iterator<Item = Result<Decimal, AggregationError>>,
{
    let overflow = || AggregationError::Overflow {
        destination: destination.to_string(),
    };

    let mut sum = Decimal::ZERO;
    let mut count: u64 = 0;
    for value in values {
        sum = sum.checked_add(value?).ok_or_else(overflow)?;
        count += 1;
    }

    let mean = sum.checked_div(Decimal::from(count)).ok_or_else(overflow)?;
    Ok(round_half_up(mean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_supplier::offer;
    use crate::supplier::Baggage;
    use rand::Rng;
    use test_case::test_case;

    fn response(offers: Vec<FlightOffer>) -> FlightSearchResponse {
        FlightSearchResponse {
            currency: "EUR".to_string(),
            data: offers,
        }
    }

    #[test_case(Decimal::new(1251666, 4), Decimal::new(12517, 2); "rounds up")]
    #[test_case(Decimal::new(1005, 3), Decimal::new(101, 2); "midpoint goes up")]
    #[test_case(Decimal::new(10049, 4), Decimal::new(100, 2); "below midpoint")]
    #[test_case(Decimal::new(42, 0), Decimal::new(4200, 2); "integer")]
    fn test_round_half_up(input: Decimal, expected: Decimal) {
        assert_eq!(round_half_up(input), expected);
    }

    #[test]
    fn test_average_of_three_prices() {
        let response = response(vec![
            offer("LIS", "Lisbon", 10000, 2000, 4000),
            offer("LIS", "Lisbon", 15000, 2500, 4500),
            offer("LIS", "Lisbon", 12550, 3000, 5001),
        ]);

        let summaries = DestinationAggregator::new().aggregate(&response).unwrap();
        assert_eq!(summaries.len(), 1);

        let lisbon = &summaries["LIS"];
        assert_eq!(lisbon.price_average, Decimal::new(12517, 2));
        assert_eq!(lisbon.bags_average.bag_one_average_price, Decimal::new(2500, 2));
        // (40.00 + 45.00 + 50.01) / 3 = 45.0033..
        assert_eq!(lisbon.bags_average.bag_two_average_price, Decimal::new(4500, 2));
        assert_eq!(lisbon.currency, "EUR");
    }

    #[test]
    fn test_groups_by_destination() {
        let response = response(vec![
            offer("LIS", "Lisbon", 5000, 1000, 2000),
            offer("OPO", "Porto", 7000, 1500, 3000),
            offer("LIS", "Lisboa", 6000, 1200, 2200),
        ]);

        let aggregator = DestinationAggregator::new();
        let groups = aggregator.group_by_destination(&response);
        assert_eq!(groups["LIS"].len(), 2);
        assert_eq!(groups["OPO"].len(), 1);

        let summaries = aggregator.aggregate(&response).unwrap();
        assert_eq!(summaries.len(), 2);
        // First offer in arrival order names the city
        assert_eq!(summaries["LIS"].city_name, "Lisbon");
        assert_eq!(summaries["LIS"].price_average, Decimal::new(5500, 2));
        assert_eq!(summaries["OPO"].city_name, "Porto");
        assert_eq!(summaries["OPO"].price_average, Decimal::new(7000, 2));
    }

    #[test]
    fn test_empty_response_has_no_summaries() {
        let summaries = DestinationAggregator::new()
            .aggregate(&response(vec![]))
            .unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_missing_baggage_aborts_whole_aggregation() {
        let mut without_bags = offer("OPO", "Porto", 7000, 0, 0);
        without_bags.baggage = None;
        let response = response(vec![offer("LIS", "Lisbon", 5000, 1000, 2000), without_bags]);

        match DestinationAggregator::new().aggregate(&response) {
            Err(AggregationError::MissingBaggage { destination, tier }) => {
                assert_eq!(destination, "OPO");
                assert_eq!(tier, 1);
            }
            other => panic!("Expected missing baggage error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_second_bag_tier() {
        let mut partial = offer("LIS", "Lisbon", 5000, 1000, 0);
        partial.baggage = Some(Baggage {
            bag_one_price: Some(Decimal::new(1000, 2)),
            bag_two_price: None,
        });

        let result = DestinationAggregator::new().aggregate(&response(vec![partial]));
        assert!(matches!(
            result,
            Err(AggregationError::MissingBaggage { tier: 2, .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut first = offer("LIS", "Lisbon", 0, 0, 0);
        first.price = Decimal::MAX;
        let mut second = offer("LIS", "Lisbon", 0, 0, 0);
        second.price = Decimal::MAX;

        let result = DestinationAggregator::new().aggregate(&response(vec![first, second]));
        assert!(matches!(result, Err(AggregationError::Overflow { .. })));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let response = response(vec![
            offer("LIS", "Lisbon", 3999, 1234, 5678),
            offer("MAD", "Madrid", 8950, 2000, 4100),
            offer("LIS", "Lisbon", 4101, 1111, 2222),
        ]);

        let aggregator = DestinationAggregator::new();
        let first = aggregator.aggregate(&response).unwrap();
        let second = aggregator.aggregate(&response).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_groups_match_rounded_mean() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let count = rng.gen_range(1..=25);
            let cents: Vec<i64> = (0..count).map(|_| rng.gen_range(0..500_000)).collect();
            let offers = cents
                .iter()
                .map(|&c| offer("LIS", "Lisbon", c, c, c))
                .collect();

            // Half-up mean in integer cents: floor((2 * sum + n) / (2 * n))
            let sum: i64 = cents.iter().sum();
            let n = cents.len() as i64;
            let expected = Decimal::new((2 * sum + n) / (2 * n), 2);

            let summaries = DestinationAggregator::new()
                .aggregate(&response(offers))
                .unwrap();
            assert_eq!(summaries["LIS"].price_average, expected, "prices: {:?}", cents);
        }
    }

    #[test]
    fn test_summary_serializes_numbers() {
        let response = response(vec![offer("LIS", "Lisbon", 12550, 2000, 4000)]);
        let summaries = DestinationAggregator::new().aggregate(&response).unwrap();

        let json = serde_json::to_string(&summaries["LIS"]).unwrap();
        assert!(json.contains("\"priceAverage\":125.5"));
        assert!(json.contains("\"bagsPrice\":{\"bagOneAveragePrice\":20.0"));
    }
}
