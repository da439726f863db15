use hyper::StatusCode;
use rbx_asset_models::operation::OperationResponse;
use std::{future::Future, time::Duration};

use crate::error::{DeserializeBodyError, ErrorKind, RobloxError};

/// The poll budget: after this many status fetches the last body is returned
/// as-is, complete or not.
pub(crate) const MAX_POLL_ATTEMPTS: u32 = 5;

/// Backoff before retrying after attempt `n`: 2^n seconds.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum PollStep {
    /// Return the body just fetched. Either the operation reported done or
    /// the attempt budget is spent.
    Done,
    Retry(Duration),
}

pub(crate) fn next_step(attempt: u32, done: bool) -> PollStep {
    if done || attempt >= MAX_POLL_ATTEMPTS {
        PollStep::Done
    } else {
        PollStep::Retry(backoff_delay(attempt))
    }
}

/// Drive the poll loop over a fetch of the operation url.
///
/// A non-200 status on any attempt is terminal: no further fetches, no
/// waits. Otherwise the body is parsed and [`next_step`] decides between
/// returning it and sleeping out the backoff.
pub(crate) async fn drive<F, Fut>(
    route: &str,
    mut fetch: F,
) -> Result<OperationResponse, RobloxError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(StatusCode, Vec<u8>), RobloxError>>,
{
    let mut attempt = 0;

    loop {
        let (status, bytes) = fetch().await?;
        attempt += 1;

        if status != StatusCode::OK {
            return Err(RobloxError {
                source: None,
                kind: ErrorKind::Response {
                    route: route.to_string(),
                    status,
                    bytes,
                },
            });
        }

        let operation =
            serde_json::from_slice::<OperationResponse>(&bytes).map_err(|source| RobloxError {
                source: Some(Box::new(DeserializeBodyError {
                    source: Some(Box::new(source)),
                    bytes,
                })),
                kind: ErrorKind::Deserialize,
            })?;

        match next_step(attempt, operation.done) {
            PollStep::Done => return Ok(operation),
            PollStep::Retry(delay) => {
                tracing::trace!(attempt, ?delay, "operation still pending");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
