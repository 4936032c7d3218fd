//! Explicit waits. Every wait polls at a fixed interval up to a deadline and
//! treats running out of time as an answer, not a failure.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::driver::Driver;
use crate::error::{Error, Result};

/// Re-evaluate `predicate` every `interval` until it holds or `timeout`
/// passes. Returns `Ok(false)` on timeout.
///
/// Transient errors from the predicate count as "not yet"; anything else
/// aborts the wait.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match predicate().await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) if e.is_transient() => trace!("wait predicate not ready: {e}"),
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait for an element matching `selector` to appear in the DOM.
pub async fn wait_for_element<D: Driver>(
    driver: &D,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<D::Element> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(el) = driver.query_one(selector).await? {
            return Ok(el);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::Timeout(format!(
                "Timed out waiting for selector: {}",
                selector
            )));
        }
        sleep(interval.min(deadline - now)).await;
    }
}
