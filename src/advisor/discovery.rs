use super::PROFILE_MARKER;
use crate::{CrawlerError, PageQuery, RenderSession, Renderer};
use tracing::{debug, warn};

/// Drops exactly one trailing `/`.
pub fn normalize_href(href: &str) -> &str {
    href.strip_suffix('/').unwrap_or(href)
}

/// Profile pages carry the marker segment. Links ending in a bare `#` are
/// menu toggles even when they point into a profile.
pub fn is_profile_link(href: &str) -> bool {
    href.contains(PROFILE_MARKER) && !href.ends_with('#')
}

/// Collects advisor profile URLs from every seed page, in seed order then
/// document order. Duplicates are kept.
pub async fn discover_profile_links<R: Renderer>(
    renderer: &R,
    seeds: &[String],
) -> Result<Vec<String>, CrawlerError> {
    let mut session = renderer.launch().await?;
    let result = collect_links(&mut session, seeds).await;

    let closed = session.close().await;
    let links = result?;
    if let Err(e) = closed {
        warn!("Discovery session did not close cleanly: {}", e);
    }
    Ok(links)
}

async fn collect_links<S: RenderSession>(
    session: &mut S,
    seeds: &[String],
) -> Result<Vec<String>, CrawlerError> {
    let mut links = vec![];

    for seed in seeds {
        debug!("Visit {}", seed);
        session.navigate(seed).await?;

        let value = session.evaluate(PageQuery::AnchorHrefs).await?;
        let hrefs: Vec<Option<String>> = serde_json::from_value(value).map_err(|e| {
            CrawlerError::Browser(format!("unexpected anchor list on {}: {}", seed, e))
        })?;

        let before = links.len();
        links.extend(
            hrefs
                .iter()
                .flatten()
                .filter(|href| !href.is_empty())
                .map(|href| normalize_href(href))
                .filter(|href| is_profile_link(href))
                .map(ToString::to_string),
        );
        debug!("{} profile links on {}", links.len() - before, seed);
    }

    Ok(links)
}
