use async_trait::async_trait;
use chromiumoxide::page::Page as CrPage;

use crate::driver::Driver;
use crate::element::{classify, ChromiumElement};
use crate::error::{Error, Result};

/// A Chromium tab behind the [`Driver`] interface.
pub struct ChromiumPage {
    inner: CrPage,
}

impl ChromiumPage {
    pub(crate) fn new(inner: CrPage) -> Self {
        Self { inner }
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.into_value::<String>() {
            Ok(title) => Ok(title),
            Err(_) => Ok(String::new()),
        }
    }

    /// Close the tab.
    pub async fn close(self) -> Result<()> {
        self.inner.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Driver for ChromiumPage {
    type Element = ChromiumElement;

    /// Navigate to the given URL and wait for the page to load.
    async fn navigate(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .ok_or_else(|| Error::NavigationError("No URL found".into()))
    }

    async fn query_one(&self, selector: &str) -> Result<Option<ChromiumElement>> {
        // querySelectorAll never errors on zero matches, unlike querySelector
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ChromiumElement>> {
        let els = self
            .inner
            .find_elements(selector)
            .await
            .map_err(|e| classify(e, selector))?;
        Ok(els.into_iter().map(ChromiumElement::new).collect())
    }

    async fn scroll_to_end(&self) -> Result<()> {
        self.inner
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(())
    }
}
