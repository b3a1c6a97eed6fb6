use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::{FeedError, FeedResult};
use crate::models::RawPost;

/// Адрес внешнего источника постов по умолчанию.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Внешний источник сырых постов.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Загружает всю коллекцию сырых постов одним запросом.
    async fn fetch_all(&self) -> FeedResult<Vec<RawPost>>;
}

#[derive(Debug, Clone)]
/// Параметры HTTP-источника.
pub struct SourceConfig {
    /// Базовый URL, например `https://jsonplaceholder.typicode.com`.
    pub base_url: String,
    /// Таймаут установки соединения.
    pub connect_timeout: Duration,
    /// Таймаут всего запроса.
    pub request_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-источник: `GET {base_url}/posts` возвращает JSON-массив постов.
pub struct HttpPostSource {
    base_url: String,
    client: Client,
}

impl HttpPostSource {
    /// Создаёт HTTP-источник с заданными таймаутами.
    pub fn new(config: SourceConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| FeedError::Unexpected(format!("failed to build http client: {err}")))?;

        Ok(Self {
            base_url: config.base_url,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_all(&self) -> FeedResult<Vec<RawPost>> {
        let url = self.endpoint("/posts");
        tracing::debug!(%url, "fetching posts from upstream");

        let response = self
            .client
            .request(Method::GET, url)
            .send()
            .await
            .map_err(FeedError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(FeedError::from_http_status(response.status()));
        }

        response
            .json::<Vec<RawPost>>()
            .await
            .map_err(FeedError::from_reqwest)
    }
}
