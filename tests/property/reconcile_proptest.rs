//! Property-based tests for reconciliation

use chrono::{Duration, TimeZone, Utc};
use notebrain_sync::client::offline::{superseded, AddKeying, ReconcileKey, Reconciler};
use notebrain_sync::shared::{ArticleAction, Intent, PendingAction};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_action() -> impl Strategy<Value = ArticleAction> {
    prop::sample::select(ArticleAction::ALL.to_vec())
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => (1i64..6, arb_action()).prop_map(|(article_id, action)| Intent::ForArticle { article_id, action }),
        1 => "[abc]".prop_map(|slug| Intent::add_url(format!("https://{slug}.example"))),
    ]
}

/// Log in timestamp order, one second apart
fn as_log(intents: Vec<Intent>) -> Vec<PendingAction> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    intents
        .into_iter()
        .enumerate()
        .map(|(i, intent)| PendingAction {
            id: i as i64 + 1,
            intent,
            timestamp: start + Duration::seconds(i as i64),
        })
        .collect()
}

proptest! {
    #[test]
    fn test_latest_entry_wins_per_article(intents in prop::collection::vec(arb_intent(), 0..40)) {
        let log = as_log(intents);
        let reconciled = Reconciler::new(AddKeying::PerUrl).reconcile(&log);

        for action in &log {
            if let Some(article_id) = action.intent.article_id() {
                let newest = log
                    .iter()
                    .filter(|a| a.intent.article_id() == Some(article_id))
                    .max_by_key(|a| a.timestamp)
                    .unwrap();
                prop_assert_eq!(&reconciled[&ReconcileKey::Article(article_id)], newest);
            }
        }
    }

    #[test]
    fn test_one_survivor_per_target(intents in prop::collection::vec(arb_intent(), 0..40)) {
        let log = as_log(intents);
        let reconciled = Reconciler::new(AddKeying::PerUrl).reconcile(&log);

        let targets: HashSet<String> = log
            .iter()
            .map(|a| match &a.intent {
                Intent::ForArticle { article_id, .. } => format!("article:{article_id}"),
                Intent::ForNewUrl { url } => format!("url:{url}"),
            })
            .collect();
        prop_assert_eq!(reconciled.len(), targets.len());
    }

    #[test]
    fn test_superseded_and_survivors_partition_the_log(intents in prop::collection::vec(arb_intent(), 0..40)) {
        let log = as_log(intents);
        let reconciled = Reconciler::new(AddKeying::SharedSentinel).reconcile(&log);
        let lost = superseded(&log, &reconciled);

        prop_assert_eq!(lost.len() + reconciled.len(), log.len());
        let survivor_ids: HashSet<i64> = reconciled.values().map(|a| a.id).collect();
        prop_assert!(lost.iter().all(|a| !survivor_ids.contains(&a.id)));
    }

    #[test]
    fn test_shared_sentinel_keeps_at_most_one_add(intents in prop::collection::vec(arb_intent(), 0..40)) {
        let log = as_log(intents);
        let reconciled = Reconciler::new(AddKeying::SharedSentinel).reconcile(&log);

        let adds = reconciled
            .values()
            .filter(|a| matches!(a.intent, Intent::ForNewUrl { .. }))
            .count();
        prop_assert!(adds <= 1);
    }
}

#[test]
fn test_empty_log_reconciles_to_nothing() {
    assert!(Reconciler::new(AddKeying::PerUrl).reconcile(&[]).is_empty());
    assert!(Reconciler::new(AddKeying::SharedSentinel).reconcile(&[]).is_empty());
}
