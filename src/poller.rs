//! Account-readiness poller — level-triggered refetch on a fixed delay.
//!
//! The accounts screen shows a spinner until the banking backend finishes
//! provisioning, signalled by at least one account carrying the liability
//! flag. This poller refetches the account list every tick, publishes each
//! snapshot, and stops on its own once a ready account appears. The shutdown
//! flag is the teardown contract: setting it guarantees no further fetch
//! fires after the owning view is dismissed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::ComplianceApi;
use crate::models::SyntheticAccount;

/// Spawn a background task polling the customer's accounts.
///
/// Returns the task handle, a shutdown flag (set it to cancel), and a watch
/// receiver carrying the latest account snapshot.
pub fn spawn_account_poller(
    api: Arc<dyn ComplianceApi>,
    customer_uid: String,
    interval: Duration,
) -> (
    JoinHandle<()>,
    Arc<AtomicBool>,
    watch::Receiver<Vec<SyntheticAccount>>,
) {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    let (tx, rx) = watch::channel(Vec::new());

    let handle = tokio::spawn(async move {
        info!(
            customer_uid = %customer_uid,
            interval_secs = interval.as_secs(),
            "Account poller started"
        );

        let mut tick = tokio::time::interval(interval);

        loop {
            tick.tick().await;

            if shutdown.load(Ordering::Relaxed) {
                info!("Account poller shutting down");
                return;
            }

            let accounts = match api.list_accounts(&customer_uid).await {
                Ok(list) => list.data,
                Err(e) => {
                    error!("Account poll failed: {e}");
                    continue;
                }
            };

            let ready = accounts.iter().any(SyntheticAccount::is_ready);
            debug!(count = accounts.len(), ready, "Fetched accounts");

            if tx.send(accounts).is_err() {
                // All receivers dropped; the view is gone.
                return;
            }

            if ready {
                info!("Liability account present; account poller done");
                return;
            }
        }
    });

    (handle, shutdown_flag, rx)
}
