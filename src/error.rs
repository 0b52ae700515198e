use crate::advisor::Field;

#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("You must supply at least one state abbreviation")]
    Usage,

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Missing {field} on {url}")]
    Extraction { url: String, field: Field },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl CrawlerError {
    pub(crate) fn navigation<U: Into<String>, R: ToString>(url: U, reason: R) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
