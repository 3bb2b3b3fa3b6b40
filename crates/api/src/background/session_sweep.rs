//! Periodic deletion of expired sessions.
//!
//! Validation already deletes expired sessions lazily when it happens to
//! touch them; this job catches the ones no request ever looks at again.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::session::SessionService;

/// Run the session sweep loop.
///
/// Scans the sessions namespace every `interval_secs` and deletes every
/// expired record. Runs until `cancel` is triggered.
pub async fn run(sessions: SessionService, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Session sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match sessions.sweep_expired_sessions().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session sweep: purged expired sessions");
                        } else {
                            tracing::debug!("Session sweep: nothing to purge");
                        }
                    }
                    Err(error) => {
                        tracing::error!(%error, "Session sweep failed");
                    }
                }
            }
        }
    }
}
