use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки библиотеки `blog-feed`.
pub enum FeedError {
    /// Внешний источник постов недоступен или ответил неуспешным статусом.
    #[error("upstream fetch failed: {0}")]
    FetchFailure(String),

    /// В заполненном кэше нет поста с таким идентификатором.
    #[error("post not found: {0}")]
    NotFound(String),

    /// Кэш заполнен, но внешний источник не вернул ни одного поста.
    #[error("no posts available")]
    EmptyCollection,

    /// Некорректные аргументы запроса (например, `page == 0`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Внутренняя ошибка (например, паника фоновой задачи заполнения кэша).
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Результат операций `blog-feed`.
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode) -> Self {
        Self::FetchFailure(format!("http status {status}"))
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status);
        }
        if err.is_decode() {
            return Self::FetchFailure(format!("malformed response body: {err}"));
        }
        Self::FetchFailure(err.to_string())
    }

    /// `true`, если ошибка означает, что запрошенный пост показать нельзя
    /// (устаревший или неверный идентификатор).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::EmptyCollection)
    }
}

#[cfg(test)]
mod tests {
    use super::FeedError;

    #[test]
    fn http_status_maps_to_fetch_failure() {
        let err = FeedError::from_http_status(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        match err {
            FeedError::FetchFailure(message) => assert!(message.contains("503")),
            other => panic!("expected FetchFailure, got {other:?}"),
        }
    }

    #[test]
    fn not_found_outcomes_are_grouped() {
        assert!(FeedError::NotFound("7".to_string()).is_not_found());
        assert!(FeedError::EmptyCollection.is_not_found());
        assert!(!FeedError::FetchFailure("boom".to_string()).is_not_found());
    }
}
