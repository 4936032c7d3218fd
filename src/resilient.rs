//! Bounded, failure-tolerant browser actions.
//!
//! Clicking a control that may not exist, may be covered by an overlay, or may
//! never finish loading is routine on a live catalog. These helpers turn those
//! outcomes into `None`/`false` and only let environment faults through.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::driver::{Driver, ElementHandle};
use crate::error::Result;
use crate::wait::wait_for_element;

/// Run `action` with an upper bound of `timeout`.
///
/// `Ok(None)` when the action ran out of time or failed with a transient UI
/// fault; `Err` for everything else.
pub async fn attempt<T, Fut>(timeout: Duration, action: Fut) -> Result<Option<T>>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, action).await {
        Ok(Ok(value)) => Ok(Some(value)),
        Ok(Err(e)) if e.is_transient() => {
            debug!("action gave up: {e}");
            Ok(None)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            debug!("action gave up after {:?}", timeout);
            Ok(None)
        }
    }
}

/// Wait up to `timeout` for `selector` to appear, then click it.
/// Returns whether the click happened.
pub async fn click_if_present<D: Driver>(
    driver: &D,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<bool> {
    let clicked = attempt(timeout, async {
        let el = wait_for_element(driver, selector, timeout, interval).await?;
        el.click().await
    })
    .await?;

    Ok(clicked.is_some())
}

/// Downgrade a transient UI fault to `None`, keeping fatal errors.
pub fn recover<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_transient() => {
            debug!("recovered: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Like [`attempt`], but for actions whose only output is success.
pub async fn succeeded<Fut>(timeout: Duration, action: Fut) -> Result<bool>
where
    Fut: Future<Output = Result<()>>,
{
    Ok(attempt(timeout, action).await?.is_some())
}
