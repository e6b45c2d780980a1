use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Instant;

use crate::api::{fetch_customers, fetch_leads, fetch_services, ApiClient};
use crate::buffered_eprintln;
use crate::clock::Clock;
use crate::priority::{
    calculate_priority, factors_for_customer, factors_for_lead, PriorityConfig, PriorityResult,
};
use crate::records::{Customer, Dataset, Lead};

/// Fetch leads, customers and services concurrently.
///
/// Leads and customers are required. A failing services endpoint is reported
/// as a warning and treated as an empty collection.
pub async fn fetch_dataset(client: &ApiClient, verbose: bool) -> Result<Dataset> {
    let start = Instant::now();

    let (leads, customers, services) = tokio::join!(
        fetch_leads(client),
        fetch_customers(client),
        fetch_services(client),
    );

    let leads = leads.context("Failed to fetch leads")?;
    let customers = customers.context("Failed to fetch customers")?;
    let services = services.unwrap_or_else(|e| {
        buffered_eprintln!("Warning: failed to fetch services, treating as empty: {:#}", e);
        Vec::new()
    });

    if verbose {
        eprintln!(
            "Fetched {} leads, {} customers, {} services in {:?}",
            leads.len(),
            customers.len(),
            services.len(),
            start.elapsed()
        );
    }

    Ok(Dataset {
        leads,
        customers,
        services,
    })
}

/// A record paired with its computed priority.
#[derive(Debug, Clone, Serialize)]
pub struct Scored<T> {
    pub record: T,
    pub result: PriorityResult,
}

/// Score every lead and sort highest first.
pub fn rank_leads(leads: Vec<Lead>, config: &PriorityConfig, clock: &dyn Clock) -> Vec<Scored<Lead>> {
    let mut scored: Vec<_> = leads
        .into_iter()
        .map(|lead| {
            let result = calculate_priority(&factors_for_lead(&lead, config), clock);
            Scored { record: lead, result }
        })
        .collect();
    scored.sort_by(|a, b| compare_ranked(&a.result, a.record.date, &b.result, b.record.date));
    scored
}

/// Score every customer and sort highest first.
pub fn rank_customers(
    customers: Vec<Customer>,
    config: &PriorityConfig,
    clock: &dyn Clock,
) -> Vec<Scored<Customer>> {
    let mut scored: Vec<_> = customers
        .into_iter()
        .map(|customer| {
            let result = calculate_priority(&factors_for_customer(&customer, config), clock);
            Scored {
                record: customer,
                result,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        compare_ranked(
            &a.result,
            a.record.activity_date(),
            &b.result,
            b.record.activity_date(),
        )
    });
    scored
}

// Primary: score descending. Tie-breaker: older first, undated last.
fn compare_ranked(
    a: &PriorityResult,
    a_date: Option<NaiveDateTime>,
    b: &PriorityResult,
    b_date: Option<NaiveDateTime>,
) -> Ordering {
    b.score.cmp(&a.score).then_with(|| match (a_date, b_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::Duration;

    fn clock() -> FixedClock {
        FixedClock::at_noon(2025, 6, 15)
    }

    fn lead(name: &str, budget: f64, days_ago: Option<i64>) -> Lead {
        Lead {
            name: name.to_string(),
            budget: Some(budget),
            status: "new".to_string(),
            date: days_ago.map(|d| clock().now() - Duration::days(d)),
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_leads_by_score() {
        let leads = vec![
            lead("small", 1_000.0, Some(0)),
            lead("big", 80_000.0, Some(0)),
            lead("mid", 25_000.0, Some(0)),
        ];
        let ranked = rank_leads(leads, &PriorityConfig::default(), &clock());
        let names: Vec<_> = ranked.iter().map(|s| s.record.name.as_str()).collect();
        assert_eq!(names, vec!["big", "mid", "small"]);
        assert!(ranked[0].result.score > ranked[1].result.score);
    }

    #[test]
    fn test_rank_ties_older_first_undated_last() {
        // All within 0..=3 days so the urgency tier is identical.
        let leads = vec![
            lead("undated", 1_000.0, None),
            lead("fresh", 1_000.0, Some(0)),
            lead("older", 1_000.0, Some(2)),
        ];
        let ranked = rank_leads(leads, &PriorityConfig::default(), &clock());
        let names: Vec<_> = ranked.iter().map(|s| s.record.name.as_str()).collect();
        assert_eq!(names, vec!["older", "fresh", "undated"]);
    }

    #[test]
    fn test_rank_customers_uses_hints() {
        let customers = vec![
            Customer {
                name: "plain".to_string(),
                ..Default::default()
            },
            Customer {
                name: "vip".to_string(),
                customer_history: Some("vip".to_string()),
                business_type: Some("Enterprise".to_string()),
                ..Default::default()
            },
        ];
        let ranked = rank_customers(customers, &PriorityConfig::default(), &clock());
        assert_eq!(ranked[0].record.name, "vip");
    }
}
