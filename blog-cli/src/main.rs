use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use blog_feed::{
    Feed, FeedError, FilterCriteria, HttpPostSource, LikeState, Post, PostRepository,
    PostWithNeighbors, SharePlatform, SortKey, post_page_url, share_url,
};
use clap::{Parser, Subcommand};
use tracing::info;

mod logging;
mod settings;

use logging::init_logging;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "CLI для просмотра ленты блога")]
struct Cli {
    /// Адрес внешнего API постов (перекрывает BLOG_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Seed генератора для воспроизводимых метаданных (перекрывает BLOG_RNG_SEED).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Лента постов с поиском, фильтром по тегам и сортировкой.
    List {
        /// Сколько страниц подгрузить (первая + прокрутка).
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Размер страницы (по умолчанию POSTS_PER_PAGE).
        #[arg(long)]
        page_size: Option<u32>,
        /// Подстрока для поиска по заголовку и тексту.
        #[arg(long)]
        search: Option<String>,
        /// Тег для фильтра; можно указать несколько раз.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// latest | oldest | mostViewed | mostLiked.
        #[arg(long, default_value = "latest", value_parser = parse_sort)]
        sort: SortKey,
        /// Вывести JSON вместо текста.
        #[arg(long)]
        json: bool,
    },
    /// Пост с соседями, лайками и ссылками «поделиться».
    Show {
        /// Идентификатор поста.
        id: String,
        /// Поставить лайк (только локально).
        #[arg(long)]
        like: bool,
        /// Вывести JSON вместо текста.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if cli.seed.is_some() {
        settings.rng_seed = cli.seed;
    }

    init_logging(&settings.log_level)?;

    let source = HttpPostSource::new(settings.source_config())
        .context("не удалось создать HTTP-клиент")?;
    let repo = match settings.rng_seed {
        Some(seed) => PostRepository::with_seed(Arc::new(source), seed),
        None => PostRepository::from_entropy(Arc::new(source)),
    };
    info!(api_url = %settings.api_url, "post repository ready");

    match cli.command {
        Command::List {
            pages,
            page_size,
            search,
            tags,
            sort,
            json,
        } => {
            let page_size = page_size.unwrap_or(settings.posts_per_page);
            let mut feed = Feed::initial(&repo, page_size).await;
            for _ in 1..pages {
                if feed.load_more(&repo).await == 0 {
                    break;
                }
            }

            let criteria = FilterCriteria {
                search_term: search.unwrap_or_default(),
                selected_tags: tags,
                sort,
            };
            let visible = feed.visible(&criteria);

            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                print_feed(&feed, &criteria, &visible);
            }
        }
        Command::Show { id, like, json } => {
            let detail = repo
                .fetch_with_neighbors(&id)
                .await
                .map_err(map_feed_error)?;

            let mut likes = LikeState::for_post(&detail.post);
            if like {
                likes.like();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&detail, &likes, &settings.site_url);
            }
        }
    }

    Ok(())
}

/// В CLI принимаются только ключи из `SortKey::OPTIONS`.
fn parse_sort(raw: &str) -> Result<SortKey, String> {
    SortKey::OPTIONS
        .into_iter()
        .find(|key| key.as_str() == raw)
        .ok_or_else(|| {
            format!(
                "неизвестная сортировка '{raw}', ожидается одно из: {}",
                SortKey::OPTIONS.map(SortKey::as_str).join(", ")
            )
        })
}

fn map_feed_error(err: FeedError) -> anyhow::Error {
    if err.is_not_found() {
        return anyhow::anyhow!("пост не найден");
    }
    let message = match err {
        FeedError::FetchFailure(message) => format!("не удалось загрузить посты: {message}"),
        FeedError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        other => format!("внутренняя ошибка: {other}"),
    };
    anyhow::anyhow!(message)
}

fn print_feed(feed: &Feed, criteria: &FilterCriteria, visible: &[Post]) {
    println!(
        "Постов: {} из {} загруженных (страниц: {}, сортировка: {}{})",
        visible.len(),
        feed.posts().len(),
        feed.page(),
        criteria.sort.label(),
        if criteria.selected_tags.is_empty() {
            String::new()
        } else {
            format!(", tags={}", criteria.selected_tags.join(","))
        }
    );

    for post in visible {
        println!(
            "- [{}] {} ({} мин, {} просмотров, {} лайков) #{}",
            post.id,
            post.title,
            post.read_time,
            post.views,
            post.likes,
            post.hashtags.join(" #")
        );
    }

    if !feed.has_more() {
        println!("Больше постов нет");
    }
}

fn print_detail(detail: &PostWithNeighbors, likes: &LikeState, site_url: &str) {
    let post = &detail.post;
    let author = post.author_or_default();

    println!("{}", post.title);
    println!("id: {}", post.id);
    println!("author: {}", author.name);
    if let Some(created_at) = post.created_at {
        println!("created_at: {}", created_at.format("%B %-d, %Y"));
    }
    println!("read_time: {} мин", post.read_time);
    println!("views: {}", post.views);
    println!(
        "likes: {}{}",
        likes.likes(),
        if likes.has_liked() { " (вы лайкнули)" } else { "" }
    );
    println!("cover: {}", post.cover_image_url());
    println!();
    println!("{}", post.body);
    if !post.hashtags.is_empty() {
        println!();
        println!("#{}", post.hashtags.join(" #"));
    }

    println!();
    if let Some(prev) = &detail.previous_post {
        println!("← [{}] {}", prev.id, prev.title);
    }
    if let Some(next) = &detail.next_post {
        println!("→ [{}] {}", next.id, next.title);
    }

    let page_url = post_page_url(site_url, &post.id);
    println!();
    for platform in SharePlatform::ALL {
        println!(
            "share {}: {}",
            platform.name(),
            share_url(platform, &page_url, &post.title)
        );
    }
}
