//! FEFO deduction planning
//!
//! Pure planning over already-loaded batches: the service loads the rows
//! under a row lock, the planner decides what to deduct, the service
//! persists the plan. Expired batches are never deducted.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use quitanda_persistence::entity::inventory_batch;

use crate::model::BatchStock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductionOutcome {
    /// Per-batch deduction amounts covering the full request.
    Deducted { per_batch: BTreeMap<String, i32> },
    /// Live stock does not cover the request; nothing is deducted.
    Insufficient { available: i32 },
}

/// Plan a first-expiring-first-out deduction of `requested` units.
///
/// Only batches with `expires_at >= now` count as available. The earliest
/// expiring live batch is drained first; ties break on batch id so the plan
/// is deterministic.
pub fn plan_deduction(
    batches: &[inventory_batch::Model],
    now: NaiveDateTime,
    requested: i32,
) -> DeductionOutcome {
    let mut live: Vec<inventory_batch::Model> = batches
        .iter()
        .filter(|b| b.expires_at >= now && b.quantity > 0)
        .cloned()
        .collect();
    live.sort_by(|a, b| (a.expires_at, &a.id).cmp(&(b.expires_at, &b.id)));

    let available: i32 = live.iter().map(|b| b.quantity).sum();
    if available < requested {
        return DeductionOutcome::Insufficient { available };
    }

    let mut remaining = requested;
    let mut per_batch = BTreeMap::new();
    for batch in &mut live {
        if remaining == 0 {
            break;
        }
        let deducted = batch.decrease(remaining);
        if deducted > 0 {
            per_batch.insert(batch.id.clone(), deducted);
        }
        remaining -= deducted;
    }

    DeductionOutcome::Deducted { per_batch }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    use super::*;

    fn batch(id: &str, quantity: i32, expires_in_days: i64) -> inventory_batch::Model {
        let now = Utc::now().naive_utc();
        inventory_batch::Model {
            id: id.to_string(),
            product_id: "apple".to_string(),
            quantity,
            expires_at: now + Duration::days(expires_in_days),
            created_at: now,
        }
    }

    #[test]
    fn drains_earliest_expiring_batch_first() {
        let now = Utc::now().naive_utc();
        let batches = vec![batch("late", 10, 30), batch("soon", 10, 1)];

        match plan_deduction(&batches, now, 11) {
            DeductionOutcome::Deducted { per_batch } => {
                assert_eq!(per_batch.get("soon"), Some(&10));
                assert_eq!(per_batch.get("late"), Some(&1));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn expired_batches_are_never_deducted() {
        let now = Utc::now().naive_utc();
        let batches = vec![batch("expired", 10, -1), batch("live", 5, 5)];

        match plan_deduction(&batches, now, 5) {
            DeductionOutcome::Deducted { per_batch } => {
                assert_eq!(per_batch.len(), 1);
                assert_eq!(per_batch.get("live"), Some(&5));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn rejects_when_only_expired_stock_remains() {
        let now = Utc::now().naive_utc();
        let batches = vec![batch("expired", 10, -1)];

        assert_eq!(
            plan_deduction(&batches, now, 5),
            DeductionOutcome::Insufficient { available: 0 }
        );
    }

    #[test]
    fn reports_available_on_insufficient_stock() {
        let now = Utc::now().naive_utc();
        let batches = vec![batch("a", 1, 1), batch("b", 2, 2)];

        assert_eq!(
            plan_deduction(&batches, now, 4),
            DeductionOutcome::Insufficient { available: 3 }
        );
    }

    #[test]
    fn exact_fit_across_batches() {
        let now = Utc::now().naive_utc();
        let batches = vec![batch("a", 3, 1), batch("b", 4, 2)];

        match plan_deduction(&batches, now, 7) {
            DeductionOutcome::Deducted { per_batch } => {
                assert_eq!(per_batch.get("a"), Some(&3));
                assert_eq!(per_batch.get("b"), Some(&4));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn plan_never_exceeds_batch_stock_and_sums_to_request(
            quantities in proptest::collection::vec(0..50i32, 1..8),
            requested in 1..100i32,
        ) {
            let now = Utc::now().naive_utc();
            let batches: Vec<inventory_batch::Model> = quantities
                .iter()
                .enumerate()
                .map(|(i, q)| batch(&format!("b-{}", i), *q, (i as i64 % 5) + 1))
                .collect();

            match plan_deduction(&batches, now, requested) {
                DeductionOutcome::Deducted { per_batch } => {
                    let total: i32 = per_batch.values().sum();
                    prop_assert_eq!(total, requested);
                    for (id, deducted) in &per_batch {
                        let source = batches.iter().find(|b| &b.id == id).unwrap();
                        prop_assert!(*deducted > 0);
                        prop_assert!(*deducted <= source.quantity);
                    }
                }
                DeductionOutcome::Insufficient { available } => {
                    let live_total: i32 = batches.iter().map(|b| b.quantity).sum();
                    prop_assert_eq!(available, live_total);
                    prop_assert!(live_total < requested);
                }
            }
        }
    }
}
