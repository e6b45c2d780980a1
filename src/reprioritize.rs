use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::future::Future;

use crate::api::{update_priority, ApiClient, ApiError, RecordKind};
use crate::fetch::Scored;
use crate::priority::Priority;
use crate::records::{Customer, Lead, RecordId};

/// PATCH requests kept in flight at once.
pub const MAX_CONCURRENT_UPDATES: usize = 8;

/// A record whose stored priority tag can be compared against a computed one.
pub trait Tagged {
    fn record_id(&self) -> &RecordId;
    fn display_name(&self) -> &str;
    fn stored_priority(&self) -> Option<Priority>;
}

impl Tagged for Lead {
    fn record_id(&self) -> &RecordId {
        &self.lead_id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn stored_priority(&self) -> Option<Priority> {
        self.priority
    }
}

impl Tagged for Customer {
    fn record_id(&self) -> &RecordId {
        &self.customer_id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn stored_priority(&self) -> Option<Priority> {
        self.priority
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityChange {
    pub id: RecordId,
    pub name: String,
    pub current: Option<Priority>,
    pub computed: Priority,
    pub score: u32,
}

/// Records whose stored tag differs from the computed one, in ranked order.
/// Untagged records always count as changed.
pub fn plan_changes<T: Tagged>(ranked: &[Scored<T>]) -> Vec<PriorityChange> {
    ranked
        .iter()
        .filter(|s| s.record.stored_priority() != Some(s.result.priority))
        .map(|s| PriorityChange {
            id: s.record.record_id().clone(),
            name: s.record.display_name().to_string(),
            current: s.record.stored_priority(),
            computed: s.result.priority,
            score: s.result.score,
        })
        .collect()
}

#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    pub updated: Vec<RecordId>,
    pub failed: Vec<(RecordId, String)>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Send one PATCH per change, at most `MAX_CONCURRENT_UPDATES` at a time.
///
/// A failed update does not stop the others. Each one ends up in either
/// `updated` or `failed`.
pub async fn apply_changes(
    client: &ApiClient,
    kind: RecordKind,
    changes: &[PriorityChange],
    verbose: bool,
) -> ApplyReport {
    apply_with(changes, move |id, priority| async move {
        let result = update_priority(client, kind, &id, priority).await;
        if verbose && result.is_ok() {
            eprintln!("Updated {} {}", kind.collection(), id);
        }
        result
    })
    .await
}

async fn apply_with<F, Fut>(changes: &[PriorityChange], update: F) -> ApplyReport
where
    F: Fn(RecordId, Priority) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let mut report = ApplyReport::default();
    let mut futures = FuturesUnordered::new();
    let mut pending = changes.iter();

    let submit = |change: &PriorityChange| {
        let id = change.id.clone();
        let sent = update(id.clone(), change.computed);
        async move { (id, sent.await) }
    };

    for change in pending.by_ref().take(MAX_CONCURRENT_UPDATES) {
        futures.push(submit(change));
    }

    while let Some((id, result)) = futures.next().await {
        match result {
            Ok(()) => report.updated.push(id),
            Err(e) => report.failed.push((id, e.to_string())),
        }

        if let Some(next) = pending.next() {
            futures.push(submit(next));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::fetch::rank_leads;
    use crate::priority::PriorityConfig;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn lead(id: i64, budget: f64, priority: Option<Priority>) -> Lead {
        Lead {
            lead_id: RecordId::Number(id),
            name: format!("Lead {}", id),
            budget: Some(budget),
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_changes_skips_matching_tags() {
        let clock = FixedClock::at_noon(2025, 6, 15);
        let ranked = rank_leads(
            vec![lead(1, 1_000.0, Some(Priority::Low)), lead(2, 1_000.0, None)],
            &PriorityConfig::default(),
            &clock,
        );
        assert!(ranked.iter().all(|s| s.result.priority == Priority::Low));

        let changes = plan_changes(&ranked);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id, RecordId::Number(2));
        assert_eq!(changes[0].current, None);
        assert_eq!(changes[0].computed, Priority::Low);
    }

    #[test]
    fn test_plan_changes_detects_stale_tag() {
        let clock = FixedClock::at_noon(2025, 6, 15);
        let ranked = rank_leads(
            vec![lead(7, 1_000.0, Some(Priority::High))],
            &PriorityConfig::default(),
            &clock,
        );
        let changes = plan_changes(&ranked);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current, Some(Priority::High));
        assert_eq!(changes[0].name, "Lead 7");
    }

    #[test]
    fn test_report_success() {
        let mut report = ApplyReport::default();
        assert!(report.is_success());
        report
            .failed
            .push((RecordId::Number(1), "Server error".to_string()));
        assert!(!report.is_success());
    }

    fn changes(count: i64) -> Vec<PriorityChange> {
        (1..=count)
            .map(|id| PriorityChange {
                id: RecordId::Number(id),
                name: format!("Lead {}", id),
                current: None,
                computed: Priority::Medium,
                score: 50,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_apply_bounds_in_flight_updates_and_partitions_results() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let planned = changes(20);

        let report = apply_with(&planned, |id, _priority| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                match id {
                    RecordId::Number(n) if n % 2 == 1 => {
                        Err(ApiError::Backend(format!("rejected {}", n)))
                    }
                    _ => Ok(()),
                }
            }
        })
        .await;

        assert_eq!(peak.load(Ordering::SeqCst), MAX_CONCURRENT_UPDATES);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);

        let updated: BTreeSet<_> = report.updated.iter().map(|id| id.to_string()).collect();
        let failed: BTreeSet<_> = report.failed.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(report.updated.len() + report.failed.len(), 20);
        assert!(updated.is_disjoint(&failed));

        let odd: BTreeSet<_> = (1..=20).filter(|n| n % 2 == 1).map(|n: i64| n.to_string()).collect();
        let even: BTreeSet<_> = (1..=20).filter(|n| n % 2 == 0).map(|n: i64| n.to_string()).collect();
        assert_eq!(failed, odd);
        assert_eq!(updated, even);
        assert!(report.failed.iter().all(|(id, e)| e.contains(&id.to_string())));
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_apply_with_no_changes() {
        let report = apply_with(&[], |_id, _priority| async { Ok::<(), ApiError>(()) }).await;
        assert!(report.updated.is_empty());
        assert!(report.is_success());
    }
}
