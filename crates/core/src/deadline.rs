//! Deadline combinator for external calls.
//!
//! Every network-bound operation (generation, storage upload, database
//! counting query) is raced against a fixed duration through
//! [`with_deadline`] instead of ad-hoc timeout wrapping at each call site.

use std::future::Future;
use std::time::Duration;

/// Returned when a future did not complete within its deadline.
#[derive(Debug, thiserror::Error)]
#[error("Operation exceeded its {}s deadline", .0.as_secs())]
pub struct DeadlineExceeded(pub Duration);

/// Race `fut` against `duration`.
///
/// A future that exceeds its bound is treated as failed, never left to
/// hang; the inner result is returned untouched otherwise.
pub async fn with_deadline<F>(duration: Duration, fut: F) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| DeadlineExceeded(duration))
}
