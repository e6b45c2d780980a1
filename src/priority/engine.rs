use serde::Serialize;
use std::fmt;

use super::factors::{Priority, PriorityFactors, Urgency};
use crate::clock::Clock;

/// Named factor in a score breakdown. Labels are stable and shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKey {
    ServiceValue,
    ResponseUrgency,
    BusinessType,
    CustomerHistory,
    ServiceComplexity,
}

impl FactorKey {
    pub const ALL: [FactorKey; 5] = [
        FactorKey::ServiceValue,
        FactorKey::ResponseUrgency,
        FactorKey::BusinessType,
        FactorKey::CustomerHistory,
        FactorKey::ServiceComplexity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FactorKey::ServiceValue => "Service Value",
            FactorKey::ResponseUrgency => "Response Urgency",
            FactorKey::BusinessType => "Business Type",
            FactorKey::CustomerHistory => "Customer History",
            FactorKey::ServiceComplexity => "Service Complexity",
        }
    }

    /// Upper bound of this factor's contribution.
    pub fn max(&self) -> u32 {
        match self {
            FactorKey::ServiceValue => 40,
            FactorKey::ResponseUrgency => 25,
            FactorKey::BusinessType => 20,
            FactorKey::CustomerHistory => 10,
            FactorKey::ServiceComplexity => 5,
        }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FactorKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Per-factor contributions, in scoring order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Breakdown {
    entries: Vec<(FactorKey, u32)>,
}

impl Breakdown {
    fn push(&mut self, key: FactorKey, points: u32) {
        self.entries.push((key, points));
    }

    pub fn get(&self, key: FactorKey) -> Option<u32> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactorKey, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

// Serialized as a JSON object keyed by label, like the dashboard expects.
impl Serialize for Breakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, points) in &self.entries {
            map.serialize_entry(key.label(), points)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityResult {
    pub priority: Priority,
    pub score: u32,
    pub breakdown: Breakdown,
}

pub fn calculate_priority(factors: &PriorityFactors, clock: &dyn Clock) -> PriorityResult {
    let mut breakdown = Breakdown::default();

    breakdown.push(FactorKey::ServiceValue, service_value_points(factors.service_value));

    let days = factors
        .inquiry_date
        .map(|date| (clock.now() - date).num_days());
    breakdown.push(
        FactorKey::ResponseUrgency,
        urgency_points(days, factors.response_urgency),
    );

    breakdown.push(FactorKey::BusinessType, factors.business_type.weight());
    breakdown.push(FactorKey::CustomerHistory, factors.customer_history.weight());
    breakdown.push(FactorKey::ServiceComplexity, factors.service_complexity.weight());

    let score = breakdown.total();
    PriorityResult {
        priority: Priority::from_score(score),
        score,
        breakdown,
    }
}

fn service_value_points(value: f64) -> u32 {
    // NaN fails every comparison and lands in the lowest tier.
    if value >= 50_000.0 {
        40
    } else if value >= 20_000.0 {
        25
    } else if value >= 10_000.0 {
        15
    } else {
        5
    }
}

/// Elapsed days OR the explicit urgency decide the tier, so a stale inquiry
/// marked `low` still lands in the top tier.
fn urgency_points(days_since_inquiry: Option<i64>, urgency: Urgency) -> u32 {
    let days = days_since_inquiry.unwrap_or(0);
    if days > 7 || urgency == Urgency::Urgent {
        25
    } else if days > 3 || urgency == Urgency::Normal {
        15
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::priority::factors::{BusinessType, CustomerHistory, ServiceComplexity};
    use chrono::Duration;

    fn clock() -> FixedClock {
        FixedClock::at_noon(2025, 6, 15)
    }

    fn factors(days_ago: i64) -> PriorityFactors {
        PriorityFactors {
            service_value: 15_000.0,
            inquiry_date: Some(clock().now() - Duration::days(days_ago)),
            business_type: BusinessType::Individual,
            response_urgency: Urgency::Low,
            customer_history: CustomerHistory::New,
            service_complexity: ServiceComplexity::Low,
        }
    }

    #[test]
    fn test_all_max_factors_score_hundred() {
        let f = PriorityFactors {
            service_value: 75_000.0,
            inquiry_date: Some(clock().now()),
            business_type: BusinessType::Enterprise,
            response_urgency: Urgency::Urgent,
            customer_history: CustomerHistory::Vip,
            service_complexity: ServiceComplexity::High,
        };
        let result = calculate_priority(&f, &clock());
        assert_eq!(result.score, 100);
        assert_eq!(result.priority, Priority::High);
    }

    #[test]
    fn test_low_everything_scores_twenty_two() {
        let f = PriorityFactors {
            service_value: 9_999.0,
            inquiry_date: Some(clock().now()),
            business_type: BusinessType::parse("Space Mining"),
            response_urgency: Urgency::Low,
            customer_history: CustomerHistory::New,
            service_complexity: ServiceComplexity::Low,
        };
        let result = calculate_priority(&f, &clock());
        assert_eq!(result.breakdown.get(FactorKey::ServiceValue), Some(5));
        assert_eq!(result.breakdown.get(FactorKey::ResponseUrgency), Some(5));
        assert_eq!(result.breakdown.get(FactorKey::BusinessType), Some(8));
        assert_eq!(result.breakdown.get(FactorKey::CustomerHistory), Some(3));
        assert_eq!(result.breakdown.get(FactorKey::ServiceComplexity), Some(1));
        assert_eq!(result.score, 22);
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn test_service_value_tiers() {
        assert_eq!(service_value_points(50_000.0), 40);
        assert_eq!(service_value_points(49_999.99), 25);
        assert_eq!(service_value_points(20_000.0), 25);
        assert_eq!(service_value_points(10_000.0), 15);
        assert_eq!(service_value_points(9_999.0), 5);
        assert_eq!(service_value_points(0.0), 5);
        assert_eq!(service_value_points(-10.0), 5);
        assert_eq!(service_value_points(f64::NAN), 5);
    }

    #[test]
    fn test_urgency_day_boundaries() {
        let c = clock();
        let points = |days| {
            calculate_priority(&factors(days), &c)
                .breakdown
                .get(FactorKey::ResponseUrgency)
                .unwrap()
        };
        assert_eq!(points(0), 5);
        assert_eq!(points(3), 5);
        assert_eq!(points(4), 15);
        assert_eq!(points(7), 15);
        assert_eq!(points(8), 25);
    }

    #[test]
    fn test_partial_day_does_not_count() {
        let mut f = factors(0);
        f.inquiry_date = Some(clock().now() - Duration::days(3) - Duration::hours(23));
        let result = calculate_priority(&f, &clock());
        assert_eq!(result.breakdown.get(FactorKey::ResponseUrgency), Some(5));
    }

    #[test]
    fn test_stale_low_urgency_still_scores_top_tier() {
        let f = factors(30);
        let result = calculate_priority(&f, &clock());
        assert_eq!(result.breakdown.get(FactorKey::ResponseUrgency), Some(25));
    }

    #[test]
    fn test_explicit_urgency_overrides_fresh_date() {
        let mut f = factors(0);
        f.response_urgency = Urgency::Urgent;
        assert_eq!(
            calculate_priority(&f, &clock()).breakdown.get(FactorKey::ResponseUrgency),
            Some(25)
        );
        f.response_urgency = Urgency::Normal;
        assert_eq!(
            calculate_priority(&f, &clock()).breakdown.get(FactorKey::ResponseUrgency),
            Some(15)
        );
    }

    #[test]
    fn test_missing_date_uses_urgency_only() {
        let mut f = factors(0);
        f.inquiry_date = None;
        f.response_urgency = Urgency::Low;
        assert_eq!(
            calculate_priority(&f, &clock()).breakdown.get(FactorKey::ResponseUrgency),
            Some(5)
        );
    }

    #[test]
    fn test_future_date_counts_as_fresh() {
        let f = factors(-10);
        assert_eq!(
            calculate_priority(&f, &clock()).breakdown.get(FactorKey::ResponseUrgency),
            Some(5)
        );
    }

    #[test]
    fn test_breakdown_sums_to_score() {
        let c = clock();
        let values = [0.0, 9_999.0, 10_000.0, 25_000.0, 80_000.0];
        let businesses = ["Enterprise", "Retail", "Individual", "Unknown Co"];
        let urgencies = [Urgency::Urgent, Urgency::Normal, Urgency::Low];
        for value in values {
            for business in businesses {
                for urgency in urgencies {
                    for days in [0, 5, 10] {
                        let f = PriorityFactors {
                            service_value: value,
                            inquiry_date: Some(c.now() - Duration::days(days)),
                            business_type: BusinessType::parse(business),
                            response_urgency: urgency,
                            customer_history: CustomerHistory::Returning,
                            service_complexity: ServiceComplexity::Medium,
                        };
                        let result = calculate_priority(&f, &c);
                        assert_eq!(result.breakdown.total(), result.score);
                        assert!(result.score <= 100);
                        for (key, points) in result.breakdown.iter() {
                            assert!(points <= key.max());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_breakdown_has_stable_keys_in_order() {
        let result = calculate_priority(&factors(1), &clock());
        let keys: Vec<_> = result.breakdown.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, FactorKey::ALL.to_vec());
    }

    #[test]
    fn test_same_input_same_output() {
        let f = factors(5);
        let c = clock();
        assert_eq!(calculate_priority(&f, &c), calculate_priority(&f, &c));
    }

    #[test]
    fn test_medium_classification() {
        // 25 + 15 + 15 + 3 + 3 = 61
        let f = PriorityFactors {
            service_value: 20_000.0,
            inquiry_date: Some(clock().now() - Duration::days(5)),
            business_type: BusinessType::Finance,
            response_urgency: Urgency::Low,
            customer_history: CustomerHistory::New,
            service_complexity: ServiceComplexity::Medium,
        };
        let result = calculate_priority(&f, &clock());
        assert_eq!(result.score, 61);
        assert_eq!(result.priority, Priority::Medium);
    }

    #[test]
    fn test_breakdown_serializes_as_label_map() {
        let result = calculate_priority(&factors(0), &clock());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["priority"], "low");
        assert_eq!(json["breakdown"]["Service Value"], 15);
        assert_eq!(json["breakdown"]["Business Type"], 5);
    }
}
