//! Periodic removal of expired sessions.
//!
//! Expiry is enforced on every read, so the sweeper only reclaims storage.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use docspace_core::events::AuthEvent;
use docspace_core::result::AppResult;

use super::store::SessionStore;

/// Deletes expired session rows on an interval.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    store: Arc<SessionStore>,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Run one sweep. Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let count = self.store.purge_expired(Utc::now()).await?;
        if count > 0 {
            AuthEvent::ExpiredPurged { count }.emit();
        }
        Ok(count)
    }

    /// Sweep every `interval` until `shutdown` flips to `true`.
    pub fn spawn(self, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Session cleanup started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Session cleanup failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Session cleanup stopped");
        })
    }
}
