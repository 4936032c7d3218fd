//! In-memory catalog that behaves like a small storefront behind the
//! [`Driver`] traits. Every navigation re-renders the target page with fresh
//! node ids, the way a browser replaces DOM nodes.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fan_scraper::config::{AdvanceStrategy, ScraperConfig, SelectorMap};
use fan_scraper::driver::{Driver, ElementHandle, ElementId};
use fan_scraper::error::{Error, Result};

pub const START: &str = "https://shop.test/category/exhaust-fans";

pub fn url(slug: &str) -> String {
    format!("https://shop.test/p/{slug}")
}

pub fn listing_url(page: usize) -> String {
    format!("{START}?page={page}")
}

/// Scraper settings with short waits, pointed at [`START`].
pub fn test_config(strategy: AdvanceStrategy) -> ScraperConfig {
    ScraperConfig {
        start_url: listing_url(1),
        action_timeout_secs: 2,
        overlay_timeout_secs: 1,
        poll_interval_ms: 50,
        strategy,
        ..ScraperConfig::default()
    }
}

// ── Page templates ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Action {
    Nothing,
    Navigate(String),
    LoadMore,
    Intercepted,
    Dismiss,
}

#[derive(Debug, Clone)]
struct NodeSpec {
    selector: String,
    text: String,
    href: Option<String>,
    action: Action,
}

/// What a URL renders to.
#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    nodes: Vec<NodeSpec>,
    load_more: VecDeque<Vec<String>>,
    scroll_more: VecDeque<Vec<String>>,
}

impl PageSpec {
    fn selectors() -> SelectorMap {
        SelectorMap::default()
    }

    fn node(mut self, selector: &str, text: &str, href: Option<String>, action: Action) -> Self {
        self.nodes.push(NodeSpec {
            selector: selector.to_string(),
            text: text.to_string(),
            href,
            action,
        });
        self
    }

    fn product_links(mut self, slugs: &[&str]) -> Self {
        let sel = Self::selectors().product_link;
        for slug in slugs {
            self = self.node(&sel, slug, Some(url(slug)), Action::Nothing);
        }
        self
    }

    /// A listing page showing links to the given product slugs.
    pub fn listing(slugs: &[&str]) -> Self {
        Self::default().product_links(slugs)
    }

    pub fn with_next(self, target: &str) -> Self {
        let sel = Self::selectors().next_button;
        self.node(&sel, "Next", None, Action::Navigate(target.to_string()))
    }

    /// A next control that never changes the page when clicked.
    pub fn with_dead_next(self) -> Self {
        let sel = Self::selectors().next_button;
        self.node(&sel, "Next", None, Action::Nothing)
    }

    /// A next control hidden behind something that swallows the click.
    pub fn with_blocked_next(self) -> Self {
        let sel = Self::selectors().next_button;
        self.node(&sel, "Next", None, Action::Intercepted)
    }

    pub fn with_overlay(self) -> Self {
        let sel = Self::selectors().close_button;
        self.node(&sel, "×", None, Action::Dismiss)
    }

    /// An overlay whose close control cannot be clicked.
    pub fn with_blocked_overlay(self) -> Self {
        let sel = Self::selectors().close_button;
        self.node(&sel, "×", None, Action::Intercepted)
    }

    /// Each click on "load more" appends the next batch; the control vanishes
    /// once the batches run out.
    pub fn with_load_more(mut self, batches: &[&[&str]]) -> Self {
        self.load_more = batches
            .iter()
            .map(|b| b.iter().map(|s| s.to_string()).collect())
            .collect();
        let sel = Self::selectors().load_more_button;
        self.node(&sel, "Load more", None, Action::LoadMore)
    }

    /// Each scroll to the bottom appends the next batch.
    pub fn with_scroll_batches(mut self, batches: &[&[&str]]) -> Self {
        self.scroll_more = batches
            .iter()
            .map(|b| b.iter().map(|s| s.to_string()).collect())
            .collect();
        self
    }

    /// A product detail page.
    pub fn product(name: Option<&str>, price: Option<&str>, specs: &[(&str, &str)]) -> Self {
        let sel = Self::selectors();
        let mut page = Self::default();
        if let Some(name) = name {
            page = page.node(&sel.name, name, None, Action::Nothing);
        }
        if let Some(price) = price {
            page = page.node(&sel.price, price, None, Action::Nothing);
        }
        for (header, _) in specs {
            page = page.node(&sel.spec_row_header, header, None, Action::Nothing);
        }
        for (_, value) in specs {
            page = page.node(&sel.spec_row_value, value, None, Action::Nothing);
        }
        page
    }

    /// Add an arbitrary element.
    pub fn with(self, selector: &str, text: &str) -> Self {
        self.node(selector, text, None, Action::Nothing)
    }
}

// ── Live state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Node {
    id: i64,
    spec: NodeSpec,
}

#[derive(Default)]
struct State {
    pages: HashMap<String, PageSpec>,
    unreachable: HashSet<String>,
    current_url: String,
    dom: Vec<Node>,
    pending_load_more: VecDeque<Vec<String>>,
    pending_scroll: VecDeque<Vec<String>>,
    next_id: i64,
    visits: Vec<String>,
    clicks: Vec<String>,
}

impl State {
    fn fresh_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn render(&mut self, url: &str) {
        let page = self.pages.get(url).cloned().unwrap_or_default();
        self.current_url = url.to_string();
        self.visits.push(url.to_string());
        self.dom = page
            .nodes
            .into_iter()
            .map(|spec| Node {
                id: self.fresh_id(),
                spec,
            })
            .collect();
        self.pending_load_more = page.load_more;
        self.pending_scroll = page.scroll_more;
    }

    fn append_products(&mut self, slugs: Vec<String>) {
        let sel = SelectorMap::default().product_link;
        // new links go right after the existing ones
        let at = self
            .dom
            .iter()
            .rposition(|n| n.spec.selector == sel)
            .map_or(self.dom.len(), |i| i + 1);
        let nodes: Vec<Node> = slugs
            .iter()
            .map(|slug| Node {
                id: self.fresh_id(),
                spec: NodeSpec {
                    selector: sel.clone(),
                    text: slug.clone(),
                    href: Some(url(slug)),
                    action: Action::Nothing,
                },
            })
            .collect();
        self.dom.splice(at..at, nodes);
    }

    fn contains(&self, id: i64) -> bool {
        self.dom.iter().any(|n| n.id == id)
    }
}

/// The fake browser tab.
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<State>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, spec: PageSpec) -> Self {
        self.state.lock().unwrap().pages.insert(url.into(), spec);
        self
    }

    /// Navigating to `url` fails like a dropped connection.
    pub fn unreachable(self, url: impl Into<String>) -> Self {
        self.state.lock().unwrap().unreachable.insert(url.into());
        self
    }

    /// Every URL rendered so far, in order.
    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    /// Selectors of every element clicked so far, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn count(&self, selector: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.dom.iter().filter(|n| n.spec.selector == selector).count()
    }
}

pub struct FakeElement {
    node: Node,
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl ElementHandle for FakeElement {
    fn identity(&self) -> ElementId {
        ElementId::new(self.node.id)
    }

    async fn text(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        if !state.contains(self.node.id) {
            return Err(Error::StaleElement(format!("node {}", self.node.id)));
        }
        Ok(self.node.spec.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if !state.contains(self.node.id) {
            return Err(Error::StaleElement(format!("node {}", self.node.id)));
        }
        Ok(match name {
            "href" => self.node.spec.href.clone(),
            _ => None,
        })
    }

    async fn click(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.contains(self.node.id) {
            return Err(Error::StaleElement(format!("node {}", self.node.id)));
        }
        state.clicks.push(self.node.spec.selector.clone());

        match &self.node.spec.action {
            Action::Nothing => {}
            Action::Navigate(target) => state.render(target),
            Action::LoadMore => {
                if let Some(batch) = state.pending_load_more.pop_front() {
                    state.append_products(batch);
                }
                if state.pending_load_more.is_empty() {
                    let sel = self.node.spec.selector.clone();
                    state.dom.retain(|n| n.spec.selector != sel);
                }
            }
            Action::Intercepted => {
                return Err(Error::NotInteractable(
                    "another element would receive the click".into(),
                ))
            }
            Action::Dismiss => {
                let sel = self.node.spec.selector.clone();
                state.dom.retain(|n| n.spec.selector != sel);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Driver for FakeSite {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable.contains(url) {
            return Err(Error::NavigationError(format!("{url}: net::ERR_CONNECTION_RESET")));
        }
        state.render(url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().current_url.clone())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<FakeElement>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dom
            .iter()
            .filter(|n| n.spec.selector == selector)
            .map(|n| FakeElement {
                node: n.clone(),
                state: Arc::clone(&self.state),
            })
            .collect())
    }

    async fn scroll_to_end(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(batch) = state.pending_scroll.pop_front() {
            state.append_products(batch);
        }
        Ok(())
    }
}
