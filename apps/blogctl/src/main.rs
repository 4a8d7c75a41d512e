use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    feed::{category_counts, filter_posts, CategoryFilter, FeedFilter, FeedView, SavedPosts},
    liked_by_line, load_settings, BlogApiClient, DoubleTapOutcome, EngagementController,
    EngagementOptions, EngagementSnapshot, FileSessionStore, PostsService, ToggleOutcome,
    ViewerProvider,
};
use futures::future::join_all;
use shared::{
    domain::{Category, PostId, SessionIdentity, UserId},
    protocol::{NewPost, PostSummary},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "blogctl", about = "Browse, like and comment on blog posts")]
struct Cli {
    /// Overrides the configured API base url.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Feed {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        popular: bool,
        /// Post ids to mark as saved; combine with --saved-only.
        #[arg(long, value_delimiter = ',')]
        saved: Vec<i64>,
        #[arg(long)]
        saved_only: bool,
    },
    Likes {
        post_id: i64,
    },
    Like {
        post_id: i64,
    },
    DoubleTap {
        post_id: i64,
    },
    Comments {
        post_id: i64,
    },
    Comment {
        post_id: i64,
        text: String,
    },
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        excerpt: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        cover_image: String,
        #[arg(long)]
        content: String,
    },
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    Set {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        username: String,
    },
    Show,
    Clear,
}

fn parse_category(raw: &str) -> Result<Category> {
    Category::parse(raw).ok_or_else(|| anyhow!("unknown category '{raw}'"))
}

fn print_engagement(snapshot: &EngagementSnapshot, names: &[String], viewer: Option<&SessionIdentity>) {
    let heart = if snapshot.has_liked { "♥" } else { "♡" };
    println!("{heart} {}", snapshot.display_count());
    if let Some(line) = liked_by_line(
        names,
        snapshot.has_liked,
        viewer.map(|identity| identity.username.as_str()),
    ) {
        println!("Liked by: {line}");
    }
    if let Some(kind) = snapshot.last_error {
        println!("{}", kind.user_message());
    }
}

async fn show_likes(
    controller: &EngagementController,
    post_id: PostId,
    viewer: Option<&SessionIdentity>,
) -> Result<()> {
    let viewer_id = viewer.map(|identity| identity.id);
    if viewer_id.is_none() {
        let count = controller.like_count(post_id).await?;
        println!("♡ {count}");
        return Ok(());
    }
    if let Err(err) = controller.load_likers(post_id).await {
        tracing::warn!("blogctl: liker set unavailable: {err}");
        let info = controller.like_info(post_id, viewer_id).await?;
        let heart = if info.user_has_liked { "♥" } else { "♡" };
        println!("{heart} {}", info.like_count);
        return Ok(());
    }
    let names = controller.liker_names(post_id).await;
    if let Some(snapshot) = controller.snapshot(post_id, viewer_id).await {
        print_engagement(&snapshot, &names, viewer);
    }
    Ok(())
}

async fn load_posts(api: &BlogApiClient, category: Option<Category>) -> Result<Vec<PostSummary>> {
    match category {
        Some(category) => api.posts_by_category(category).await,
        None => {
            let pages = join_all(
                Category::ALL
                    .into_iter()
                    .map(|category| api.posts_by_category(category)),
            )
            .await;
            let mut posts = Vec::new();
            for page in pages {
                posts.extend(page?);
            }
            Ok(posts)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        settings.session_file = session_file;
    }
    settings.api_url()?;

    let api = Arc::new(BlogApiClient::from_settings(&settings)?);
    let session = Arc::new(FileSessionStore::new(settings.session_file.clone()));
    let controller = EngagementController::new_with_dependencies(
        api.clone(),
        api.clone(),
        session.clone(),
        EngagementOptions::from(&settings),
    );
    let viewer = session.current_viewer();

    match cli.command {
        Command::Feed {
            category,
            search,
            popular,
            saved,
            saved_only,
        } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let posts = load_posts(&api, category).await?;

            let mut saved_posts = SavedPosts::default();
            for id in saved {
                saved_posts.toggle(PostId(id));
            }
            let mut filter = FeedFilter {
                search,
                ..FeedFilter::default()
            };
            if let Some(category) = category {
                filter.select_category(CategoryFilter::Only(category));
            }
            if popular {
                filter.select_view(FeedView::Popular);
            } else if saved_only {
                filter.select_view(FeedView::Saved);
            }

            let visible = filter_posts(&posts, &filter, &saved_posts);
            let ids: Vec<PostId> = visible.iter().map(|post| post.id).collect();
            let viewer_id = viewer.as_ref().map(|identity| identity.id);
            for (post_id, result) in controller.load_feed(&ids).await {
                if let Err(err) = result {
                    tracing::warn!("blogctl: likes unavailable for post {post_id}: {err}");
                }
            }

            for post in visible {
                let snapshot = controller.snapshot(post.id, viewer_id).await;
                let (count, liked) = snapshot
                    .map(|s| (s.display_count(), s.has_liked))
                    .unwrap_or((post.likes, false));
                let marker = if saved_posts.contains(post.id) { " [saved]" } else { "" };
                println!(
                    "#{} [{}] {}{marker}\n    {}\n    {} {}  comments: {}",
                    post.id,
                    post.category,
                    post.title,
                    post.excerpt,
                    if liked { "♥" } else { "♡" },
                    count,
                    post.comments
                );
            }
            if category.is_none() {
                let counts = category_counts(&posts)
                    .into_iter()
                    .map(|(category, count)| format!("{category}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("All posts: {} ({counts})", posts.len());
            }
        }
        Command::Likes { post_id } => {
            show_likes(&controller, PostId(post_id), viewer.as_ref()).await?;
        }
        Command::Like { post_id } => {
            let post_id = PostId(post_id);
            match controller.toggle_like_as_viewer(post_id).await {
                Ok(ToggleOutcome::Committed { liked, like_count }) => {
                    let verb = if liked { "Liked" } else { "Unliked" };
                    println!("{verb} post {post_id} ({like_count} likes)");
                }
                Ok(other) => println!("No change: {other:?}"),
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            }
            show_likes(&controller, post_id, viewer.as_ref()).await?;
        }
        Command::DoubleTap { post_id } => {
            let post_id = PostId(post_id);
            match controller.double_tap_as_viewer(post_id).await {
                Ok(DoubleTapOutcome::Liked(_)) => println!("♥ Liked post {post_id}"),
                Ok(DoubleTapOutcome::Acknowledged) => println!("♥"),
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            }
        }
        Command::Comments { post_id } => {
            let comments = controller.load_comments(PostId(post_id)).await?;
            println!("Comments ({})", comments.len());
            for comment in comments {
                println!("  {}: {}", comment.user_name, comment.text);
            }
        }
        Command::Comment { post_id, text } => {
            let viewer_id = viewer.as_ref().map(|identity| identity.id);
            match controller
                .add_comment(PostId(post_id), viewer_id, &text)
                .await
            {
                Ok(comment) => println!("{}: {}", comment.user_name, comment.text),
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            }
        }
        Command::Post {
            title,
            excerpt,
            category,
            cover_image,
            content,
        } => {
            let author = viewer
                .as_ref()
                .map(|identity| identity.id)
                .ok_or_else(|| anyhow!("please log in before creating a post"))?;
            let created = api
                .create_post(
                    author,
                    &NewPost {
                        title,
                        excerpt,
                        category: parse_category(&category)?,
                        cover_image,
                        content,
                    },
                )
                .await?;
            println!("Created post #{} \"{}\"", created.id, created.title);
        }
        Command::Session(SessionCommand::Set { user_id, username }) => {
            let identity = SessionIdentity {
                id: UserId(user_id),
                username,
            };
            session.save(&identity)?;
            println!(
                "Signed in as {} (id {}) via {}",
                identity.username,
                identity.id,
                session.path().display()
            );
        }
        Command::Session(SessionCommand::Show) => match session.load()? {
            Some(identity) => println!("{} (id {})", identity.username, identity.id),
            None => println!("anonymous"),
        },
        Command::Session(SessionCommand::Clear) => {
            if session.clear()? {
                println!("Session cleared");
            } else {
                println!("No session to clear");
            }
        }
    }

    Ok(())
}
