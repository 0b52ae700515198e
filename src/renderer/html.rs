//! Script-free engine: pages are fetched as served and queries are answered
//! with CSS selectors. Suited to statically rendered directories.

use super::{PageQuery, DEFAULT_NAVIGATION_TIMEOUT};
use crate::advisor::{ADDRESS, NAME, PHONE, SIDEBAR, WEBSITE};
use crate::utils::{inner_text, resolve_url, text_content};
use crate::{CrawlerError, RenderSession, Renderer};
use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const E: &str = "Invalid selector";
lazy_static! {
    static ref A: Selector = Selector::parse("a").expect(E);
    static ref SIDEBAR_SEL: Selector = Selector::parse(SIDEBAR).expect(E);
    static ref NAME_SEL: Selector = Selector::parse(NAME).expect(E);
    static ref ADDRESS_SEL: Selector = Selector::parse(ADDRESS).expect(E);
    static ref PHONE_SEL: Selector = Selector::parse(PHONE).expect(E);
    static ref WEBSITE_SEL: Selector = Selector::parse(WEBSITE).expect(E);
}

/// Source of raw page markup.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError>;
}

#[async_trait::async_trait]
impl Fetch for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
        self.get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| CrawlerError::navigation(url, e))?
            .text()
            .await
            .map_err(|e| CrawlerError::navigation(url, e))
    }
}

pub struct HtmlRenderer<F> {
    fetcher: Arc<F>,
    timeout: Duration,
    launched: AtomicUsize,
    active: Arc<AtomicUsize>,
}

impl<F: Fetch> HtmlRenderer<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
            launched: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sessions started so far.
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::Relaxed)
    }

    /// Sessions started and not yet closed.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl<F: Fetch + 'static> Renderer for HtmlRenderer<F> {
    type Session = HtmlSession<F>;

    async fn launch(&self) -> Result<HtmlSession<F>, CrawlerError> {
        self.launched.fetch_add(1, Ordering::Relaxed);
        self.active.fetch_add(1, Ordering::Relaxed);

        Ok(HtmlSession {
            fetcher: Arc::clone(&self.fetcher),
            timeout: self.timeout,
            active: Arc::clone(&self.active),
            page: None,
        })
    }
}

struct LoadedPage {
    url: Url,
    html: String,
}

pub struct HtmlSession<F> {
    fetcher: Arc<F>,
    timeout: Duration,
    active: Arc<AtomicUsize>,
    page: Option<LoadedPage>,
}

#[async_trait::async_trait]
impl<F: Fetch + 'static> RenderSession for HtmlSession<F> {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlerError> {
        let parsed = Url::parse(url).map_err(|e| CrawlerError::navigation(url, e))?;

        let html = match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(html) => html?,
            Err(_) => {
                let reason = format!("timed out after {:?}", self.timeout);
                return Err(CrawlerError::navigation(url, reason));
            }
        };

        debug!("Loaded {} ({} bytes)", url, html.len());
        self.page = Some(LoadedPage { url: parsed, html });
        Ok(())
    }

    async fn evaluate(&self, query: PageQuery) -> Result<Value, CrawlerError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| CrawlerError::Browser(format!("{:?} on a blank page", query)))?;

        let doc = Html::parse_document(&page.html);
        Ok(match query {
            PageQuery::AnchorHrefs => anchor_hrefs(&doc, &page.url),
            PageQuery::AdvisorSidebar => advisor_sidebar(&doc, &page.url),
        })
    }

    async fn close(self) -> Result<(), CrawlerError> {
        self.active.fetch_sub(1, Ordering::Relaxed);
        Ok(())
    }
}

fn href(el: ElementRef, base: &Url) -> String {
    el.value()
        .attr("href")
        .map(|h| resolve_url(base, h))
        .unwrap_or_default()
}

fn anchor_hrefs(doc: &Html, base: &Url) -> Value {
    json!(doc.select(&A).map(|a| href(a, base)).collect::<Vec<_>>())
}

fn advisor_sidebar(doc: &Html, base: &Url) -> Value {
    let sidebar = match doc.select(&SIDEBAR_SEL).next() {
        Some(sidebar) => sidebar,
        None => return json!({ "found": false }),
    };
    let first = |selector: &Selector| sidebar.select(selector).next();

    json!({
        "found": true,
        "name": first(&NAME_SEL).map(text_content),
        "address": first(&ADDRESS_SEL).map(inner_text),
        "phone": first(&PHONE_SEL).map(text_content),
        "website": first(&WEBSITE_SEL).map(|el| href(el, base)),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub const LISTING: &str = "https://northwesternmutual.com/financial/advisors/wi";
    pub const SECOND_LISTING: &str = "https://northwesternmutual.com/financial/advisors/mn";

    /// Serves `tests/htmls` files by URL and records every visit.
    #[derive(Clone, Default)]
    pub struct FixtureFetcher {
        pages: HashMap<String, String>,
        visited: Arc<Mutex<Vec<String>>>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl FixtureFetcher {
        pub fn standard() -> Self {
            let profile = "https://northwesternmutual.com/financial/advisor";
            Self::default()
                .with_page(LISTING, "tests/htmls/listing_wi.html")
                .with_page(SECOND_LISTING, "tests/htmls/listing_mn.html")
                .with_page(&format!("{}/jane-doe", profile), "tests/htmls/profile_jane.html")
                .with_page(&format!("{}/john-roe", profile), "tests/htmls/profile_john.html")
                .with_page(&format!("{}/ann-lee", profile), "tests/htmls/profile_ann.html")
        }

        pub fn with_page(mut self, url: &str, path: &str) -> Self {
            self.pages.insert(url.to_string(), path.to_string());
            self
        }

        pub fn without(mut self, url: &str) -> Self {
            self.pages.remove(url);
            self
        }

        pub fn visited(&self) -> Vec<String> {
            self.visited.lock().unwrap().clone()
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Fetch for FixtureFetcher {
        async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.visited.lock().unwrap().push(url.to_string());

            tokio::task::yield_now().await;

            let res = match self.pages.get(url) {
                Some(path) => {
                    std::fs::read_to_string(path).map_err(|e| CrawlerError::navigation(url, e))
                }
                None => Err(CrawlerError::navigation(url, "404 Not Found")),
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            res
        }
    }
}
