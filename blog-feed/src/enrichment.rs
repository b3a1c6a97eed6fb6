use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Author, Post, RawPost};

/// Словарь тегов, из которого выбираются `hashtags`.
pub const TAG_VOCABULARY: [&str; 5] = ["tech", "news", "tutorial", "design", "coding"];

/// Словарь категорий.
pub const CATEGORY_VOCABULARY: [&str; 7] = [
    "nature",
    "technology",
    "business",
    "design",
    "science",
    "education",
    "health",
];

const WORDS_PER_MINUTE: usize = 200;
const TAGS_PER_POST: usize = 2;
const HISTORY_DAYS: i64 = 365;
const MAX_LIKES: u32 = 100;
const MAX_VIEWS: u32 = 1000;

/// Время чтения в минутах: `ceil(words / 200)`, но не меньше 1 для любого
/// непустого текста. Только пустая строка даёт 0.
pub fn reading_time(body: &str) -> u32 {
    if body.is_empty() {
        return 0;
    }
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Превращает сырой пост в отображаемую запись.
///
/// Вся случайность берётся из `rng`, время заполнения кэша передаётся явно,
/// поэтому при фиксированном seed результат воспроизводим.
pub fn enrich<R: Rng>(raw: RawPost, rng: &mut R, now: DateTime<Utc>) -> Post {
    let hashtags = TAG_VOCABULARY
        .choose_multiple(rng, TAGS_PER_POST)
        .map(|tag| tag.to_string())
        .collect();
    let categories = (0..2)
        .map(|_| random_category(rng).to_string())
        .collect();

    let (created_at, updated_at) = random_timestamps(rng, now);

    Post {
        id: raw.id.to_string(),
        read_time: reading_time(&raw.body),
        title: raw.title,
        body: raw.body,
        user_id: Some(raw.user_id),
        hashtags,
        categories,
        author: Some(Author::for_user(raw.user_id)),
        created_at: Some(created_at),
        updated_at: Some(updated_at),
        likes: rng.gen_range(0..MAX_LIKES),
        views: rng.gen_range(0..MAX_VIEWS),
    }
}

fn random_category<R: Rng>(rng: &mut R) -> &'static str {
    CATEGORY_VOCABULARY[rng.gen_range(0..CATEGORY_VOCABULARY.len())]
}

fn random_timestamps<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let history_ms = Duration::days(HISTORY_DAYS).num_milliseconds();
    let created_at = now - Duration::milliseconds(rng.gen_range(0..=history_ms));

    let since_created_ms = (now - created_at).num_milliseconds();
    let updated_at = created_at + Duration::milliseconds(rng.gen_range(0..=since_created_ms));

    (created_at, updated_at)
}
