//! Слой данных ленты блога.
//!
//! - `PostRepository` один раз загружает посты из внешнего HTTP-источника,
//!   обогащает их отображаемыми метаданными и отдаёт страницами из кэша;
//! - `filter::apply` ищет, фильтрует по тегам и сортирует уже загруженные посты;
//! - `Feed` склеивает страницы для бесконечной прокрутки на стороне вызывающего.
#![warn(missing_docs)]

mod enrichment;
mod error;
mod feed;
mod interaction;
mod models;
mod repository;
mod source;

/// Поиск, фильтрация по тегам и сортировка постов.
pub mod filter;

pub use enrichment::{CATEGORY_VOCABULARY, TAG_VOCABULARY, enrich, reading_time};
pub use error::{FeedError, FeedResult};
pub use feed::{DEFAULT_PAGE_SIZE, Feed};
pub use filter::{FilterCriteria, SortKey};
pub use interaction::{LikeState, SharePlatform, post_page_url, share_url};
pub use models::{Author, Post, PostWithNeighbors, RawPost};
pub use repository::PostRepository;
pub use source::{DEFAULT_BASE_URL, HttpPostSource, PostSource, SourceConfig};
