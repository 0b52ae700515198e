use crate::{AdvisorRecord, CrawlerError};
use std::path::Path;

/// Renders `records` as header-less CSV rows.
pub fn to_csv_string(records: &[AdvisorRecord]) -> Result<String, CrawlerError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CrawlerError::Output(e.into_error()))?;

    String::from_utf8(bytes)
        .map_err(|e| CrawlerError::Output(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Overwrites `path` with the CSV rendering of `records`.
pub fn write_csv(records: &[AdvisorRecord], path: &Path) -> Result<(), CrawlerError> {
    let contents = to_csv_string(records)?;
    std::fs::write(path, contents)?;
    Ok(())
}
