use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://northwesternmutual.com/financial/advisors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Headless Chromium, runs page scripts
    Chromium,
    /// Plain HTTP fetch, no script execution
    Http,
}

/// Scrape financial advisor contact cards into a CSV file.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// State abbreviations, e.g. `WI MN`
    pub regions: Vec<String>,

    /// Directory section the state codes are appended to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = Engine::Chromium)]
    pub engine: Engine,

    /// Seconds a single page may take to load
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Chrome/Chromium binary, auto-detected when unset
    #[arg(long, env = "ADVISOR_SCRAPER_CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,
}

impl Config {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["advisor-scraper", "WI", "mn"]).unwrap();
        assert_eq!(config.regions, vec!["WI", "mn"]);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output, PathBuf::from("output.csv"));
        assert_eq!(config.engine, Engine::Chromium);
        assert_eq!(config.navigation_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_no_regions_parses() {
        let config = Config::try_parse_from(["advisor-scraper"]).unwrap();
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_engine_flag() {
        let config = Config::try_parse_from([
            "advisor-scraper",
            "--engine",
            "http",
            "--timeout-secs",
            "5",
            "IL",
        ])
        .unwrap();
        assert_eq!(config.engine, Engine::Http);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.regions, vec!["IL"]);
    }
}
