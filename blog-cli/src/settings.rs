use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use blog_feed::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, SourceConfig};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) api_url: String,
    pub(crate) site_url: String,
    pub(crate) log_level: String,
    pub(crate) posts_per_page: u32,
    pub(crate) http_connect_timeout_secs: u64,
    pub(crate) http_request_timeout_secs: u64,
    pub(crate) rng_seed: Option<u64>,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let api_url = get_or_default("BLOG_API_URL", DEFAULT_BASE_URL);
        let site_url = get_or_default("BLOG_SITE_URL", DEFAULT_SITE_URL);
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let posts_per_page = parse_positive_env("POSTS_PER_PAGE", DEFAULT_PAGE_SIZE as u64)?;
        let posts_per_page = u32::try_from(posts_per_page)
            .context("POSTS_PER_PAGE does not fit into u32")?;
        let http_connect_timeout_secs = parse_positive_env("HTTP_CONNECT_TIMEOUT_SECS", 5)?;
        let http_request_timeout_secs = parse_positive_env("HTTP_REQUEST_TIMEOUT_SECS", 15)?;
        let rng_seed = match std::env::var("BLOG_RNG_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .context("Failed to parse BLOG_RNG_SEED, expecting unsigned integer")?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            api_url,
            site_url,
            log_level,
            posts_per_page,
            http_connect_timeout_secs,
            http_request_timeout_secs,
            rng_seed,
        })
    }

    pub(crate) fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.http_connect_timeout_secs),
            request_timeout: Duration::from_secs(self.http_request_timeout_secs),
        }
    }
}

fn get_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_positive_env(key: &str, default: u64) -> Result<u64> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_positive(key, &raw)
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    let value = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
