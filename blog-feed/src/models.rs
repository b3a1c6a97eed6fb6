use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель автора поста.
pub struct Author {
    /// Идентификатор автора во внешнем источнике.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Отображаемое имя.
    pub name: String,
    /// Email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// URL аватара.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Короткая биография.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Author {
    /// Синтетический автор для `userId` внешнего источника.
    ///
    /// Содержимое зависит только от `user_id`, поэтому у всех постов одного
    /// пользователя один и тот же автор.
    pub fn for_user(user_id: i64) -> Self {
        Self {
            id: Some(user_id),
            name: format!("Author {user_id}"),
            email: Some(format!("author{user_id}@example.com")),
            avatar: Some(format!(
                "https://picsum.photos/seed/author{user_id}/150/150"
            )),
            bio: Some("Sample author bio".to_string()),
        }
    }

    /// Автор по умолчанию для записей без автора.
    pub fn anonymous(post_id: &str) -> Self {
        Self {
            id: None,
            name: "Anonymous".to_string(),
            email: None,
            avatar: Some(format!("https://picsum.photos/seed/anonymous-{post_id}/150/150")),
            bio: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель поста, готовая к отображению.
pub struct Post {
    /// Идентификатор поста (уникален в пределах кэша).
    pub id: String,
    /// Заголовок.
    pub title: String,
    /// Текст поста.
    pub body: String,
    /// Идентификатор пользователя во внешнем источнике.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Теги (без повторов).
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Категории; первая используется для обложки.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Автор; у записей из репозитория всегда заполнен.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Дата и время создания (UTC).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Дата и время последнего обновления (UTC), не раньше `created_at`.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Время чтения в минутах.
    #[serde(default)]
    pub read_time: u32,
    /// Количество лайков.
    #[serde(default)]
    pub likes: u32,
    /// Количество просмотров.
    #[serde(default)]
    pub views: u32,
}

impl Post {
    /// Автор поста или детерминированный автор по умолчанию.
    pub fn author_or_default(&self) -> Author {
        self.author
            .clone()
            .unwrap_or_else(|| Author::anonymous(&self.id))
    }

    /// URL обложки, зависящий от id и первой категории.
    pub fn cover_image_url(&self) -> String {
        let category = self
            .categories
            .first()
            .map(String::as_str)
            .unwrap_or("uncategorized");
        format!(
            "https://picsum.photos/seed/post{}-{category}/1200/800",
            self.id
        )
    }

    /// `true`, если у поста есть хотя бы один тег из `tags`.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.hashtags.iter().any(|tag| tags.contains(tag))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Сырой пост внешнего источника.
pub struct RawPost {
    /// Числовой идентификатор поста.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub body: String,
    /// Ссылка на автора (`userId`).
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Пост вместе с соседями в порядке кэша.
pub struct PostWithNeighbors {
    /// Запрошенный пост.
    pub post: Post,
    /// Предыдущий пост или `None`, если запрошенный первый.
    pub previous_post: Option<Post>,
    /// Следующий пост или `None`, если запрошенный последний.
    pub next_post: Option<Post>,
}

#[cfg(test)]
mod tests {
    use super::{Author, Post, RawPost};

    #[test]
    fn post_deserializes_with_missing_optional_fields() {
        let post: Post =
            serde_json::from_str(r#"{"id":"3","title":"t","body":"b"}"#).expect("valid json");

        assert_eq!(post.id, "3");
        assert!(post.hashtags.is_empty());
        assert!(post.created_at.is_none());
        assert_eq!(post.views, 0);
        assert_eq!(post.likes, 0);
        let author = post.author_or_default();
        assert_eq!(author.name, "Anonymous");
        assert_eq!(
            author.avatar.as_deref(),
            Some("https://picsum.photos/seed/anonymous-3/150/150")
        );
    }

    #[test]
    fn raw_post_reads_camel_case_user_id() {
        let raw: RawPost =
            serde_json::from_str(r#"{"userId":4,"id":31,"title":"t","body":"b"}"#)
                .expect("valid json");
        assert_eq!(raw.user_id, 4);
        assert_eq!(raw.id, 31);
    }

    #[test]
    fn author_for_user_is_deterministic() {
        assert_eq!(Author::for_user(5), Author::for_user(5));
        assert_eq!(Author::for_user(5).name, "Author 5");
    }

    #[test]
    fn cover_image_falls_back_to_uncategorized() {
        let mut post: Post =
            serde_json::from_str(r#"{"id":"9","title":"t","body":"b"}"#).expect("valid json");
        assert_eq!(
            post.cover_image_url(),
            "https://picsum.photos/seed/post9-uncategorized/1200/800"
        );

        post.categories = vec!["science".to_string(), "health".to_string()];
        assert_eq!(
            post.cover_image_url(),
            "https://picsum.photos/seed/post9-science/1200/800"
        );
    }
}
