use url::form_urlencoded::byte_serialize;

use crate::models::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Локальный лайк на странице поста. В репозиторий не сохраняется.
pub struct LikeState {
    likes: u32,
    has_liked: bool,
}

impl LikeState {
    /// Начальное состояние: счётчик поста, лайк ещё не поставлен.
    pub fn for_post(post: &Post) -> Self {
        Self {
            likes: post.likes,
            has_liked: false,
        }
    }

    /// Увеличивает счётчик один раз; повторные вызовы ничего не меняют.
    /// Возвращает `true`, если лайк засчитан.
    pub fn like(&mut self) -> bool {
        if self.has_liked {
            return false;
        }
        self.likes = self.likes.saturating_add(1);
        self.has_liked = true;
        true
    }

    /// Текущее значение счётчика.
    pub fn likes(&self) -> u32 {
        self.likes
    }

    /// Поставлен ли лайк в этой сессии.
    pub fn has_liked(&self) -> bool {
        self.has_liked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Соцсеть, в которую можно поделиться постом.
pub enum SharePlatform {
    /// Twitter / X.
    Twitter,
    /// Facebook.
    Facebook,
    /// LinkedIn.
    LinkedIn,
}

impl SharePlatform {
    /// Все поддерживаемые соцсети.
    pub const ALL: [SharePlatform; 3] = [Self::Twitter, Self::Facebook, Self::LinkedIn];

    /// Короткое имя для вывода.
    pub fn name(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
        }
    }
}

/// Ссылка «поделиться» для страницы `page_url` с заголовком `title`.
pub fn share_url(platform: SharePlatform, page_url: &str, title: &str) -> String {
    let url = encode(page_url);
    match platform {
        SharePlatform::Twitter => {
            let text = encode(&format!("Check out this post: {title}"));
            format!("https://twitter.com/intent/tweet?url={url}&text={text}")
        }
        SharePlatform::Facebook => {
            format!("https://www.facebook.com/sharer/sharer.php?u={url}")
        }
        SharePlatform::LinkedIn => {
            format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
        }
    }
}

/// Адрес страницы поста на сайте.
pub fn post_page_url(site_url: &str, post_id: &str) -> String {
    format!("{}/post/{post_id}", site_url.trim_end_matches('/'))
}

/// Кодирование компонента URL: пробел становится `%20`, а не `+`.
/// Литеральный `+` `byte_serialize` уже превращает в `%2B`, так что замена однозначна.
fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
