use crate::filter::{self, FilterCriteria};
use crate::models::Post;
use crate::repository::PostRepository;

/// Размер страницы ленты по умолчанию.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

#[derive(Debug, Clone)]
/// Накопленная лента с бесконечной прокруткой.
///
/// Принадлежит вызывающей стороне: репозиторий отдаёт отдельные страницы,
/// а склейка и отображение происходят здесь.
pub struct Feed {
    posts: Vec<Post>,
    page: u32,
    page_size: u32,
    has_more: bool,
}

impl Feed {
    /// Пустая лента, ни одна страница ещё не загружена.
    pub fn new(page_size: u32) -> Self {
        Self {
            posts: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
        }
    }

    /// Лента с загруженной первой страницей.
    pub async fn initial(repo: &PostRepository, page_size: u32) -> Self {
        let mut feed = Self::new(page_size);
        feed.load_more(repo).await;
        feed
    }

    /// Подгружает следующую страницу и возвращает количество новых постов.
    ///
    /// Пустая страница (в том числе после ошибки загрузки) означает конец
    /// ленты: номер страницы не сдвигается, `has_more` становится `false`.
    pub async fn load_more(&mut self, repo: &PostRepository) -> usize {
        if !self.has_more {
            return 0;
        }

        let next_page = self.page + 1;
        let fresh = repo.fetch_page(next_page, self.page_size).await;
        if fresh.is_empty() {
            self.has_more = false;
            return 0;
        }

        let loaded = fresh.len();
        self.posts.extend(fresh);
        self.page = next_page;
        loaded
    }

    /// Все накопленные посты в порядке загрузки.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Номер последней загруженной страницы (0, если ничего не загружено).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Размер страницы.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `false`, когда очередная страница пришла пустой.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// То, что показывается пользователю при текущих критериях.
    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<Post> {
        filter::apply(&self.posts, criteria)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{DEFAULT_PAGE_SIZE, Feed};
    use crate::error::{FeedError, FeedResult};
    use crate::filter::{FilterCriteria, SortKey};
    use crate::models::RawPost;
    use crate::repository::PostRepository;
    use crate::source::PostSource;

    struct StaticSource(Vec<RawPost>);

    #[async_trait]
    impl PostSource for StaticSource {
        async fn fetch_all(&self) -> FeedResult<Vec<RawPost>> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl PostSource for DownSource {
        async fn fetch_all(&self) -> FeedResult<Vec<RawPost>> {
            Err(FeedError::FetchFailure("connection refused".to_string()))
        }
    }

    fn repo(count: i64) -> PostRepository {
        let posts = (1..=count)
            .map(|id| RawPost {
                id,
                title: if id % 2 == 0 {
                    format!("Rust notes {id}")
                } else {
                    format!("Cooking {id}")
                },
                body: "body".to_string(),
                user_id: 1,
            })
            .collect();
        PostRepository::with_seed(Arc::new(StaticSource(posts)), 3)
    }

    #[tokio::test]
    async fn scrolling_accumulates_until_exhausted() {
        let repo = repo(20);
        let mut feed = Feed::initial(&repo, DEFAULT_PAGE_SIZE).await;
        assert_eq!(feed.posts().len(), 9);
        assert_eq!(feed.page(), 1);

        assert_eq!(feed.load_more(&repo).await, 9);
        assert_eq!(feed.load_more(&repo).await, 2);
        assert_eq!(feed.page(), 3);
        assert!(feed.has_more());

        assert_eq!(feed.load_more(&repo).await, 0);
        assert!(!feed.has_more());
        assert_eq!(feed.page(), 3);
        assert_eq!(feed.posts().len(), 20);
        assert_eq!(feed.posts(), repo.fetch_all().await.as_slice());
    }

    #[tokio::test]
    async fn upstream_failure_ends_the_feed_without_panicking() {
        let repo = PostRepository::with_seed(Arc::new(DownSource), 1);
        let feed = Feed::initial(&repo, DEFAULT_PAGE_SIZE).await;

        assert!(feed.posts().is_empty());
        assert!(!feed.has_more());
        assert_eq!(feed.page(), 0);
    }

    #[tokio::test]
    async fn visible_filters_accumulated_posts_only() {
        let repo = repo(20);
        let mut feed = Feed::initial(&repo, 4).await;

        let criteria = FilterCriteria {
            search_term: "rust".to_string(),
            selected_tags: Vec::new(),
            sort: SortKey::Unsorted,
        };
        let ids: Vec<_> = feed.visible(&criteria).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "4"]);

        feed.load_more(&repo).await;
        let ids: Vec<_> = feed.visible(&criteria).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "4", "6", "8"]);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Feed::new(0).page_size(), 1);
    }
}
