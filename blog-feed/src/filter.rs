use std::cmp::Reverse;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Порядок сортировки ленты.
pub enum SortKey {
    /// Сначала новые (`created_at` по убыванию).
    #[default]
    Latest,
    /// Сначала старые.
    Oldest,
    /// По просмотрам, по убыванию.
    MostViewed,
    /// По лайкам, по убыванию.
    MostLiked,
    /// Исходный порядок.
    Unsorted,
}

impl SortKey {
    /// Все ключи, которые предлагаются пользователю.
    pub const OPTIONS: [SortKey; 4] = [
        SortKey::Latest,
        SortKey::Oldest,
        SortKey::MostViewed,
        SortKey::MostLiked,
    ];

    /// Значение ключа в query-строке.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::MostViewed => "mostViewed",
            Self::MostLiked => "mostLiked",
            Self::Unsorted => "unsorted",
        }
    }

    /// Подпись для выпадающего списка.
    pub fn label(self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::Oldest => "Oldest",
            Self::MostViewed => "Most Viewed",
            Self::MostLiked => "Most Liked",
            Self::Unsorted => "Unsorted",
        }
    }
}

/// Неизвестное значение не является ошибкой: оно означает «без сортировки».
impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "latest" => Self::Latest,
            "oldest" => Self::Oldest,
            "mostViewed" => Self::MostViewed,
            "mostLiked" => Self::MostLiked,
            _ => Self::Unsorted,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Критерии поиска, фильтрации и сортировки ленты.
pub struct FilterCriteria {
    /// Подстрока для поиска по заголовку и тексту (без учёта регистра).
    pub search_term: String,
    /// Выбранные теги; пост проходит, если у него есть хотя бы один из них.
    pub selected_tags: Vec<String>,
    /// Порядок сортировки.
    pub sort: SortKey,
}

impl FilterCriteria {
    /// Восстанавливает критерии из query-параметров `search`, `tags` (через запятую)
    /// и `sort` страницы списка.
    pub fn from_query(search: Option<&str>, tags: Option<&str>, sort: Option<&str>) -> Self {
        let selected_tags = tags
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            search_term: search.unwrap_or_default().to_string(),
            selected_tags,
            sort: sort
                .map(|raw| raw.parse::<SortKey>().unwrap_or_default())
                .unwrap_or_default(),
        }
    }

    /// Обратное к [`from_query`](Self::from_query): пары для query-строки.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search_term.clone()),
            ("tags", self.selected_tags.join(",")),
            ("sort", self.sort.to_string()),
        ]
    }

    /// Добавляет тег, если его нет, или убирает, если он уже выбран.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(index) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(index);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }
}

/// Фильтрует и сортирует посты; вход не изменяется.
///
/// Сначала применяется поиск, затем фильтр по тегам (оба условия через И),
/// затем стабильная сортировка. Отсутствующие даты считаются эпохой,
/// отсутствующие счётчики равны нулю.
pub fn apply(posts: &[Post], criteria: &FilterCriteria) -> Vec<Post> {
    let needle = search_needle(&criteria.search_term);

    let mut filtered: Vec<Post> = posts
        .iter()
        .filter(|post| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_search(post, needle))
        })
        .filter(|post| {
            criteria.selected_tags.is_empty() || post.has_any_tag(&criteria.selected_tags)
        })
        .cloned()
        .collect();

    sort_posts(&mut filtered, criteria.sort);
    filtered
}

fn search_needle(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        return None;
    }
    Some(term.to_lowercase())
}

fn matches_search(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle) || post.body.to_lowercase().contains(needle)
}

fn created_millis(post: &Post) -> i64 {
    post.created_at
        .map(|ts| ts.timestamp_millis())
        .unwrap_or(0)
}

// sort_by_key стабилен, поэтому равные элементы сохраняют исходный порядок
fn sort_posts(posts: &mut [Post], sort: SortKey) {
    match sort {
        SortKey::Latest => posts.sort_by_key(|post| Reverse(created_millis(post))),
        SortKey::Oldest => posts.sort_by_key(created_millis),
        SortKey::MostViewed => posts.sort_by_key(|post| Reverse(post.views)),
        SortKey::MostLiked => posts.sort_by_key(|post| Reverse(post.likes)),
        SortKey::Unsorted => {}
    }
}
