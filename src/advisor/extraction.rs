use super::{AdvisorRecord, Field};
use crate::utils::collapse_first_line_break;
use crate::{CrawlerError, PageQuery, RenderSession, Renderer};
use serde::Deserialize;
use tracing::{info, warn};

/// Raw answer of [`PageQuery::AdvisorSidebar`]. `None` marks a missing
/// element.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SidebarPayload {
    pub found: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl SidebarPayload {
    pub fn into_record(self, url: &str) -> Result<AdvisorRecord, CrawlerError> {
        let missing = |field| CrawlerError::Extraction {
            url: url.to_string(),
            field,
        };
        if !self.found {
            return Err(missing(Field::Sidebar));
        }

        let name = self.name.ok_or_else(|| missing(Field::Name))?;
        let address = self.address.ok_or_else(|| missing(Field::Address))?;
        let phone = self.phone.ok_or_else(|| missing(Field::Phone))?;
        let website = self.website.ok_or_else(|| missing(Field::Website))?;

        Ok(AdvisorRecord {
            name: name.trim().to_string(),
            address: collapse_first_line_break(address.trim()),
            phone: phone.trim().to_string(),
            website,
        })
    }
}

/// Visits each profile in order and builds one record per URL. The first
/// page that fails aborts the whole run.
pub async fn extract_advisor_details<R: Renderer>(
    renderer: &R,
    urls: &[String],
) -> Result<Vec<AdvisorRecord>, CrawlerError> {
    let mut session = renderer.launch().await?;
    let result = collect_records(&mut session, urls).await;

    let closed = session.close().await;
    let records = result?;
    if let Err(e) = closed {
        warn!("Extraction session did not close cleanly: {}", e);
    }
    Ok(records)
}

async fn collect_records<S: RenderSession>(
    session: &mut S,
    urls: &[String],
) -> Result<Vec<AdvisorRecord>, CrawlerError> {
    let total = urls.len();
    let mut records = Vec::with_capacity(total);

    for (i, url) in urls.iter().enumerate() {
        session.navigate(url).await?;
        info!("[{}/{}] Extract {}", i + 1, total, url);

        let value = session.evaluate(PageQuery::AdvisorSidebar).await?;
        let payload: SidebarPayload = serde_json::from_value(value).map_err(|e| {
            CrawlerError::Browser(format!("unexpected sidebar payload on {}: {}", url, e))
        })?;
        records.push(payload.into_record(url)?);
    }

    Ok(records)
}
