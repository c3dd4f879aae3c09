//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::auth::AuthError;

/// Wrap an acquisition future with an optional timeout.
///
/// `None` awaits the future as-is.
pub async fn with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    let Some(duration) = duration else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::Timeout(duration.as_millis() as u64)),
    }
}
