//! Assertion and polling helpers
//!
//! Background triggers run on their own tasks, so tests observe their
//! effects by polling instead of awaiting a handle.

use notebrain_sync::client::LocalDatabase;
use std::future::Future;
use std::time::Duration;

/// Assert the action log holds exactly `$expected` entries
#[macro_export]
macro_rules! assert_pending {
    ($db:expr, $expected:expr) => {
        assert_eq!(
            $db.pending_count().await.expect("Failed to count pending actions"),
            $expected,
            "unexpected number of pending actions"
        );
    };
}

/// Poll `check` until it returns true, failing the test after `within`
pub async fn wait_until<F, Fut>(within: Duration, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let polled = tokio::time::timeout(within, async {
        loop {
            if check().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "condition not reached within {:?}", within);
}

/// Wait for the action log to drain
pub async fn wait_for_empty_log(db: &LocalDatabase) {
    wait_until(Duration::from_secs(5), move || async move {
        db.pending_count().await.map(|n| n == 0).unwrap_or(false)
    })
    .await;
}
