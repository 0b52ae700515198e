use itertools::Itertools;
use std::path::Path;
use tracing::info;

pub mod advisor;
pub mod config;
pub mod output;
pub mod renderer;

mod error;
mod utils;

pub use advisor::{discover_profile_links, extract_advisor_details, AdvisorRecord, Field};
pub use error::CrawlerError;
pub use renderer::PageQuery;

/// A rendering engine able to start browser sessions.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    type Session: RenderSession;

    /// Launch the engine and open a single page.
    async fn launch(&self) -> Result<Self::Session, CrawlerError>;
}

/// One browser instance with one active page.
///
/// Callers drive it strictly one operation at a time: `navigate` resolves
/// only once the page has rendered, and nothing else touches the page while
/// a navigation or evaluation is in flight.
#[async_trait::async_trait]
pub trait RenderSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlerError>;

    /// Run `query` inside the page. Only JSON crosses back.
    async fn evaluate(&self, query: PageQuery) -> Result<serde_json::Value, CrawlerError>;

    async fn close(self) -> Result<(), CrawlerError>;
}

/// Listing page URL for each region, in argument order.
pub fn seed_urls<S: AsRef<str>>(base: &str, regions: &[S]) -> Vec<String> {
    let base = base.trim_end_matches('/');
    regions
        .iter()
        .map(|r| format!("{}/{}", base, r.as_ref().trim().to_lowercase()))
        .collect_vec()
}

/// Discover every advisor profile in `regions` and extract their records.
pub async fn scrape<R, S>(
    renderer: &R,
    base: &str,
    regions: &[S],
) -> Result<Vec<AdvisorRecord>, CrawlerError>
where
    R: Renderer,
    S: AsRef<str>,
{
    if regions.is_empty() {
        return Err(CrawlerError::Usage);
    }

    let seeds = seed_urls(base, regions);
    info!("Seed pages: {}", seeds.len());

    let links = discover_profile_links(renderer, &seeds).await?;
    info!("Profile links discovered: {}", links.len());

    extract_advisor_details(renderer, &links).await
}

/// Like [`scrape`], then writes the records to `path`. Nothing is written
/// unless every page succeeded.
pub async fn scrape_to_csv<R, S, P>(
    renderer: &R,
    base: &str,
    regions: &[S],
    path: P,
) -> Result<usize, CrawlerError>
where
    R: Renderer,
    S: AsRef<str>,
    P: AsRef<Path>,
{
    let records = scrape(renderer, base, regions).await?;
    output::write_csv(&records, path.as_ref())?;
    info!("Wrote {} records to {}", records.len(), path.as_ref().display());
    Ok(records.len())
}
