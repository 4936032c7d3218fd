//! The narrow browser surface the scraper needs.
//!
//! Everything above this module talks to a [`Driver`] and its
//! [`ElementHandle`]s; [`crate::page::ChromiumPage`] is the real
//! implementation, tests supply an in-memory catalog.

use async_trait::async_trait;

use crate::error::Result;

/// Opaque identity of a DOM node.
///
/// Two handles carry the same id only when they point at the same live node,
/// so a re-rendered list item gets a fresh id even when its markup is
/// identical to the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(i64);

impl ElementId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
}

/// A single element found on the current page.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    fn identity(&self) -> ElementId;

    /// Rendered text of the element.
    async fn text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn click(&self) -> Result<()>;
}

/// A browser tab the scraper drives one call at a time.
#[async_trait]
pub trait Driver: Send + Sync {
    type Element: ElementHandle;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// First element matching `selector`, or `None` when nothing matches.
    async fn query_one(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// Every element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Scroll to the bottom of the document so lazy lists load more items.
    async fn scroll_to_end(&self) -> Result<()>;
}
