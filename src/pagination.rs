//! Walks the catalog listing and gathers product URLs.
//!
//! ## Phases
//!
//! `Init` opens the start page and dismisses any overlay, `CollectingPage`
//! reads the product links currently shown, `Advancing` asks the site for
//! more, `Done` ends the walk. An empty batch or a failed advance ends it.
//!
//! A next-page click counts as loaded once the first product link is a
//! different DOM node than before the click. Text and URLs are not compared,
//! since a re-rendered list can repeat both.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::{AdvanceStrategy, ScraperConfig};
use crate::driver::{Driver, ElementHandle, ElementId};
use crate::error::{Error, Result};
use crate::resilient::{click_if_present, recover, succeeded};
use crate::wait::poll_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    CollectingPage,
    Advancing,
    Done,
}

/// Everything the walk knows between iterations.
#[derive(Debug, Default)]
pub struct PaginationState {
    pub current_page_url: Option<String>,
    pub last_seen_first_product: Option<ElementId>,
    pub collected: Vec<String>,
    pub pages_visited: usize,
    /// Links already consumed from a list that grows in place.
    offset: usize,
}

pub struct Paginator<'a, D: Driver> {
    driver: &'a D,
    config: &'a ScraperConfig,
}

impl<'a, D: Driver> Paginator<'a, D> {
    pub fn new(driver: &'a D, config: &'a ScraperConfig) -> Self {
        Self { driver, config }
    }

    /// Run the walk to completion and return every product URL once, in the
    /// order first seen.
    pub async fn collect(&self) -> Result<Vec<String>> {
        let mut state = PaginationState::default();
        let mut phase = Phase::Init;

        while phase != Phase::Done {
            phase = match phase {
                Phase::Init => self.open_catalog().await?,
                Phase::CollectingPage => self.collect_page(&mut state).await?,
                Phase::Advancing => self.advance(&mut state).await?,
                Phase::Done => Phase::Done,
            };
        }

        let urls = dedup_preserving_order(state.collected);
        info!(
            "Collected {} unique product URLs from {} page(s)",
            urls.len(),
            state.pages_visited
        );
        Ok(urls)
    }

    async fn open_catalog(&self) -> Result<Phase> {
        info!("Opening catalog {}", self.config.start_url);
        self.driver.navigate(&self.config.start_url).await?;

        if !self.wait_for_products().await? {
            debug!("no product links after {:?}", self.config.action_timeout());
        }

        info!("Closing modal (if any)...");
        let closed = click_if_present(
            self.driver,
            &self.config.selectors.close_button,
            self.config.overlay_timeout(),
            self.config.poll_interval(),
        )
        .await?;
        debug!(closed, "overlay check finished");

        Ok(Phase::CollectingPage)
    }

    async fn collect_page(&self, state: &mut PaginationState) -> Result<Phase> {
        state.current_page_url = self.driver.current_url().await.ok();

        self.wait_for_products().await?;

        let links = recover(self.driver.query_all(&self.config.selectors.product_link).await)?
            .unwrap_or_default();
        state.last_seen_first_product = links.first().map(|el| el.identity());

        let mut hrefs = Vec::with_capacity(links.len());
        for el in &links {
            hrefs.push(recover(el.attribute("href").await)?.flatten());
        }

        let start = state.offset.min(hrefs.len());
        let batch: Vec<String> = hrefs[start..].iter().flatten().cloned().collect();

        if batch.is_empty() {
            info!("No product links on this page, stopping.");
            return Ok(Phase::Done);
        }

        state.pages_visited += 1;
        info!(
            "Page {} ({}): {} product links",
            state.pages_visited,
            state.current_page_url.as_deref().unwrap_or("?"),
            batch.len()
        );
        state.collected.extend(batch);

        if self.config.strategy.grows_in_place() {
            state.offset = hrefs.len();
        }

        if state.pages_visited >= self.config.max_pages {
            warn!("Reached page limit ({}), stopping", self.config.max_pages);
            return Ok(Phase::Done);
        }

        Ok(Phase::Advancing)
    }

    async fn advance(&self, state: &mut PaginationState) -> Result<Phase> {
        let advanced = match self.config.strategy {
            AdvanceStrategy::NextButton => self.next_page(state.last_seen_first_product).await?,
            AdvanceStrategy::LoadMore => self.load_more().await?,
            AdvanceStrategy::InfiniteScroll => self.scroll_for_more().await?,
            AdvanceStrategy::None => false,
        };

        if !advanced {
            info!("No more pages to load.");
            return Ok(Phase::Done);
        }

        if !self.config.strategy.grows_in_place() {
            state.offset = 0;
        }
        Ok(Phase::CollectingPage)
    }

    /// Click "next" and wait for the first product link to be replaced.
    async fn next_page(&self, before: Option<ElementId>) -> Result<bool> {
        let clicked = click_if_present(
            self.driver,
            &self.config.selectors.next_button,
            self.config.action_timeout(),
            self.config.poll_interval(),
        )
        .await?;
        if !clicked {
            return Ok(false);
        }

        let driver = self.driver;
        let selector = self.config.selectors.product_link.as_str();
        let replaced = poll_until(
            self.config.action_timeout(),
            self.config.poll_interval(),
            move || async move {
                let first = driver.query_one(selector).await?;
                Ok::<_, Error>(first.is_some_and(|el| Some(el.identity()) != before))
            },
        )
        .await?;

        if !replaced {
            warn!("Clicked next but the product list never changed");
        }
        Ok(replaced)
    }

    async fn load_more(&self) -> Result<bool> {
        let before = self.product_count().await?;

        let clicked = click_if_present(
            self.driver,
            &self.config.selectors.load_more_button,
            self.config.action_timeout(),
            self.config.poll_interval(),
        )
        .await?;
        if !clicked {
            return Ok(false);
        }

        self.wait_for_growth(before).await
    }

    async fn scroll_for_more(&self) -> Result<bool> {
        let before = self.product_count().await?;

        if !succeeded(self.config.action_timeout(), self.driver.scroll_to_end()).await? {
            return Ok(false);
        }

        self.wait_for_growth(before).await
    }

    async fn product_count(&self) -> Result<usize> {
        let links = recover(self.driver.query_all(&self.config.selectors.product_link).await)?;
        Ok(links.map_or(0, |l| l.len()))
    }

    async fn wait_for_products(&self) -> Result<bool> {
        self.wait_for_growth(0).await
    }

    /// Wait until more than `count` product links are on the page.
    async fn wait_for_growth(&self, count: usize) -> Result<bool> {
        let driver = self.driver;
        let selector = self.config.selectors.product_link.as_str();
        poll_until(
            self.config.action_timeout(),
            self.config.poll_interval(),
            move || async move { Ok::<_, Error>(driver.query_all(selector).await?.len() > count) },
        )
        .await
    }
}

/// Drop repeated URLs, keeping the first occurrence of each.
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
