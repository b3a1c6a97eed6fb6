use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::enrichment::enrich;
use crate::error::{FeedError, FeedResult};
use crate::models::{Post, PostWithNeighbors};
use crate::source::PostSource;

type PostCache = Arc<OnceCell<Arc<[Post]>>>;

#[derive(Clone)]
/// Единственный источник истины для коллекции постов.
///
/// Внешний источник опрашивается один раз: первый запрос заполняет кэш,
/// все конкурентные запросы дожидаются этого же заполнения. После заполнения
/// кэш только читается. Клоны разделяют один и тот же кэш.
pub struct PostRepository {
    source: Arc<dyn PostSource>,
    rng: Arc<Mutex<StdRng>>,
    cache: PostCache,
}

impl PostRepository {
    /// Создаёт репозиторий с явно переданным генератором случайных чисел.
    pub fn new(source: Arc<dyn PostSource>, rng: StdRng) -> Self {
        Self {
            source,
            rng: Arc::new(Mutex::new(rng)),
            cache: Arc::new(OnceCell::new()),
        }
    }

    /// Репозиторий с воспроизводимым обогащением.
    pub fn with_seed(source: Arc<dyn PostSource>, seed: u64) -> Self {
        Self::new(source, StdRng::seed_from_u64(seed))
    }

    /// Репозиторий с генератором, инициализированным энтропией ОС.
    pub fn from_entropy(source: Arc<dyn PostSource>) -> Self {
        Self::new(source, StdRng::from_entropy())
    }

    /// `true`, если кэш уже заполнен.
    pub fn is_populated(&self) -> bool {
        self.cache.initialized()
    }

    /// Количество постов в кэше или `None`, пока кэш не заполнен.
    pub fn len(&self) -> Option<usize> {
        self.cache.get().map(|posts| posts.len())
    }

    /// Возвращает страницу постов.
    ///
    /// `page` начинается с 1, `page_size == 0` означает «весь кэш».
    /// Страница за пределами кэша пуста.
    pub async fn try_fetch_page(&self, page: u32, page_size: u32) -> FeedResult<Vec<Post>> {
        if page == 0 {
            return Err(FeedError::InvalidRequest("page must be >= 1".to_string()));
        }

        let posts = self.posts().await?;
        let slice = slice_page(&posts, page, page_size);
        debug!(page, page_size, returned = slice.len(), "page sliced from cache");
        Ok(slice.to_vec())
    }

    /// Как [`try_fetch_page`](Self::try_fetch_page), но ошибка логируется и
    /// превращается в пустую страницу: для ленты это означает «больше постов нет».
    pub async fn fetch_page(&self, page: u32, page_size: u32) -> Vec<Post> {
        match self.try_fetch_page(page, page_size).await {
            Ok(posts) => posts,
            Err(err) => {
                error!(page, page_size, error = %err, "failed to fetch posts page");
                Vec::new()
            }
        }
    }

    /// Весь кэш целиком (`fetch_page(1, 0)`).
    pub async fn fetch_all(&self) -> Vec<Post> {
        self.fetch_page(1, 0).await
    }

    /// Возвращает пост и его соседей в порядке заполнения кэша.
    ///
    /// Ошибка загрузки не подменяется пустым результатом.
    pub async fn fetch_with_neighbors(&self, id: &str) -> FeedResult<PostWithNeighbors> {
        let posts = self.posts().await?;
        if posts.is_empty() {
            return Err(FeedError::EmptyCollection);
        }

        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| FeedError::NotFound(format!("post id: {id}")))?;

        Ok(PostWithNeighbors {
            post: posts[index].clone(),
            previous_post: index.checked_sub(1).map(|prev| posts[prev].clone()),
            next_post: posts.get(index + 1).cloned(),
        })
    }

    /// Заполненный кэш; при необходимости запускает единственное заполнение.
    ///
    /// Заполнение выполняется в отдельной задаче, поэтому отмена вызывающего
    /// не прерывает общую работу: кэш всё равно будет заполнен.
    async fn posts(&self) -> FeedResult<Arc<[Post]>> {
        if let Some(posts) = self.cache.get() {
            return Ok(Arc::clone(posts));
        }

        let cache = Arc::clone(&self.cache);
        let source = Arc::clone(&self.source);
        let rng = Arc::clone(&self.rng);

        let population = tokio::spawn(async move {
            cache
                .get_or_try_init(|| populate(source.as_ref(), &rng))
                .await
                .map(Arc::clone)
        });

        population
            .await
            .map_err(|err| FeedError::Unexpected(format!("cache population task failed: {err}")))?
    }
}

async fn populate(source: &dyn PostSource, rng: &Mutex<StdRng>) -> FeedResult<Arc<[Post]>> {
    let raw_posts = source.fetch_all().await?;
    let now = Utc::now();

    let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
    let mut seen = HashSet::with_capacity(raw_posts.len());
    let mut posts = Vec::with_capacity(raw_posts.len());
    for raw in raw_posts {
        if !seen.insert(raw.id) {
            warn!(id = raw.id, "duplicate upstream post id skipped");
            continue;
        }
        posts.push(enrich(raw, &mut *rng, now));
    }

    info!(count = posts.len(), "post cache populated");
    Ok(posts.into())
}

fn slice_page(posts: &[Post], page: u32, page_size: u32) -> &[Post] {
    if page_size == 0 {
        return posts;
    }

    let page_size = page_size as usize;
    let offset = (page as usize - 1).saturating_mul(page_size);
    if offset >= posts.len() {
        return &[];
    }
    let end = offset.saturating_add(page_size).min(posts.len());
    &posts[offset..end]
}
