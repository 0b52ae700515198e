use advisor_scraper::config::{Config, Engine};
use advisor_scraper::renderer::{ChromiumRenderer, HtmlRenderer};
use advisor_scraper::{scrape_to_csv, CrawlerError};
use clap::Parser;
use std::process::ExitCode;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

async fn run(config: Config) -> Result<usize, CrawlerError> {
    match config.engine {
        Engine::Chromium => {
            let renderer = ChromiumRenderer::new(config.chromium_path.clone())
                .with_timeout(config.navigation_timeout());
            scrape_to_csv(&renderer, &config.base_url, &config.regions, &config.output).await
        }
        Engine::Http => {
            let client = reqwest::Client::builder()
                .timeout(config.navigation_timeout())
                .build()
                .map_err(|e| {
                    CrawlerError::Browser(format!("failed to build HTTP client: {}", e))
                })?;
            let renderer = HtmlRenderer::new(client).with_timeout(config.navigation_timeout());
            scrape_to_csv(&renderer, &config.base_url, &config.regions, &config.output).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info,chromiumoxide=warn"
                    .into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let config = Config::parse();

    match run(config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("There was a problem: {}", e);
            ExitCode::FAILURE
        }
    }
}
