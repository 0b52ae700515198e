//! Headless Chromium engine driven over CDP by chromiumoxide.

use super::{PageQuery, DEFAULT_NAVIGATION_TIMEOUT};
use crate::{CrawlerError, RenderSession, Renderer};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
    timeout: Duration,
}

impl ChromiumRenderer {
    /// Without an `executable`, chromiumoxide looks for a local Chrome or
    /// Chromium install.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl Renderer for ChromiumRenderer {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, CrawlerError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.timeout)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| CrawlerError::Browser(format!("invalid browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlerError::Browser(format!("failed to launch Chromium: {}", e)))?;

        // CDP events have to be drained for any page command to resolve
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(CrawlerError::Browser(format!("failed to open a page: {}", e)));
            }
        };
        debug!("Chromium session started");

        Ok(ChromiumSession {
            browser,
            page,
            handler,
            timeout: self.timeout,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    timeout: Duration,
}

#[async_trait::async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlerError> {
        let page = &self.page;
        let load = async move {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(self.timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CrawlerError::navigation(url, e)),
            Err(_) => {
                let reason = format!("timed out after {:?}", self.timeout);
                Err(CrawlerError::navigation(url, reason))
            }
        }
    }

    async fn evaluate(&self, query: PageQuery) -> Result<serde_json::Value, CrawlerError> {
        self.page
            .evaluate(query.script())
            .await
            .map_err(|e| CrawlerError::Browser(format!("{:?} evaluation failed: {}", query, e)))?
            .into_value()
            .map_err(|e| CrawlerError::Browser(format!("{:?} returned no value: {}", query, e)))
    }

    async fn close(self) -> Result<(), CrawlerError> {
        let ChromiumSession {
            mut browser,
            page,
            handler,
            ..
        } = self;

        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }
        let closed = browser.close().await;
        let _ = browser.wait().await;
        handler.abort();
        debug!("Chromium session closed");

        closed
            .map(|_| ())
            .map_err(|e| CrawlerError::Browser(format!("failed to close Chromium: {}", e)))
    }
}
