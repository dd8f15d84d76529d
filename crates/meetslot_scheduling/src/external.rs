// --- File: crates/meetslot_scheduling/src/external.rs ---
// Time-boxing for calls into collaborators.

use meetslot_common::services::ServiceError;
use std::future::Future;
use std::time::Duration;

pub(crate) const BUSY_SOURCE: &str = "busy-time-source";
pub(crate) const CONFERENCE: &str = "conference";
pub(crate) const CALENDAR: &str = "calendar";
pub(crate) const PERSISTENCE: &str = "persistence";

/// Runs `call`, turning an elapsed `limit` into [`ServiceError::Timeout`].
pub(crate) async fn time_boxed<T, F>(
    service: &str,
    limit: Duration,
    call: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout {
            service: service.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}
