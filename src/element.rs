use async_trait::async_trait;
use chromiumoxide::element::Element as CrElement;
use chromiumoxide::error::CdpError;

use crate::driver::{ElementHandle, ElementId};
use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Element, exposing the handful of reads and
/// actions the scraper needs.
pub struct ChromiumElement {
    inner: CrElement,
}

impl ChromiumElement {
    pub(crate) fn new(inner: CrElement) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ElementHandle for ChromiumElement {
    fn identity(&self) -> ElementId {
        ElementId::new(*self.inner.backend_node_id.inner())
    }

    async fn text(&self) -> Result<String> {
        Ok(self
            .inner
            .inner_text()
            .await
            .map_err(|e| classify(e, "inner text"))?
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .map_err(|e| classify(e, name))
    }

    /// Click this element (scrolls into view first).
    async fn click(&self) -> Result<()> {
        self.inner
            .click()
            .await
            .map_err(|e| classify(e, "click"))?;
        Ok(())
    }
}

/// Chrome's wording for a node or execution context that no longer exists.
const NODE_GONE: [&str; 3] = [
    "No node with given id",
    "Could not find node",
    "Cannot find context",
];

/// Sort a CDP failure into the error taxonomy. Only complaints that the node
/// itself is gone mean the page moved under us; every other protocol error
/// (a malformed selector included) is fatal.
pub(crate) fn classify(err: CdpError, what: &str) -> Error {
    match err {
        CdpError::NotFound => Error::ElementNotFound(what.to_string()),
        CdpError::ScrollingFailed(msg) => Error::NotInteractable(format!("{what}: {msg}")),
        CdpError::Chrome(ref e) if NODE_GONE.iter().any(|m| e.message.contains(m)) => {
            Error::StaleElement(format!("{what}: {}", e.message))
        }
        other => Error::CdpError(other),
    }
}
