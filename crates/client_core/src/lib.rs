use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Category, PostId, UserId},
    error::ApiError,
    protocol::{
        Comment, LikeCountResponse, LikeInfo, NewCommentRequest, NewPost, PostSummary,
        ToggleLikeRequest, UsernamesResponse,
    },
};
use tracing::debug;
use url::Url;

pub mod config;
pub mod engagement;
pub mod feed;
pub mod session;

pub use config::{load_settings, ClientSettings};
pub use engagement::{
    liked_by_line, DoubleTapOutcome, EngagementController, EngagementError, EngagementOptions,
    EngagementSnapshot, ErrorKind, LikePhase, LikerSet, PendingOrigin, Resolution, ToggleOutcome,
};
pub use session::{FileSessionStore, StaticViewer, ViewerProvider};

/// Remote source of truth for like membership and counts.
#[async_trait]
pub trait LikesService: Send + Sync {
    async fn fetch_likers(&self, post_id: PostId) -> Result<Vec<UserId>>;
    /// Like count plus whether `user_id` has liked the post.
    async fn like_info(&self, post_id: PostId, user_id: UserId) -> Result<LikeInfo>;
    async fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeInfo>;
    async fn like_count(&self, post_id: PostId) -> Result<u64>;
    async fn usernames(&self, user_ids: &[UserId]) -> Result<Vec<String>>;
}

#[async_trait]
pub trait CommentsService: Send + Sync {
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;
    async fn add_comment(&self, post_id: PostId, user_id: UserId, text: &str) -> Result<()>;
}

#[async_trait]
pub trait PostsService: Send + Sync {
    async fn posts_by_category(&self, category: Category) -> Result<Vec<PostSummary>>;
    async fn create_post(&self, author: UserId, post: &NewPost) -> Result<PostSummary>;
}

pub struct MissingCommentsService;

#[async_trait]
impl CommentsService for MissingCommentsService {
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        Err(anyhow!("comments service unavailable for post {post_id}"))
    }

    async fn add_comment(&self, post_id: PostId, _user_id: UserId, _text: &str) -> Result<()> {
        Err(anyhow!("comments service unavailable for post {post_id}"))
    }
}

/// HTTP client for the blog REST API.
#[derive(Clone)]
pub struct BlogApiClient {
    http: Client,
    base_url: Url,
}

impl BlogApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&settings.api_base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {path}"))
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash).with_context(|| format!("invalid api base url: {raw}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("api base url must use http or https, got {other}")),
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = status.canonical_reason().unwrap_or_default();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_body(status.as_u16(), reason, &body).into())
}

#[async_trait]
impl LikesService for BlogApiClient {
    async fn fetch_likers(&self, post_id: PostId) -> Result<Vec<UserId>> {
        let url = self.endpoint(&format!("posts/{post_id}/likes"))?;
        let response = self.http.get(url).send().await?;
        let likers = ensure_success(response).await?.json().await?;
        Ok(likers)
    }

    async fn like_info(&self, post_id: PostId, user_id: UserId) -> Result<LikeInfo> {
        let url = self.endpoint(&format!("posts/{post_id}/likes"))?;
        let response = self
            .http
            .get(url)
            .query(&[("userId", user_id.0)])
            .send()
            .await?;
        let info = ensure_success(response).await?.json().await?;
        Ok(info)
    }

    async fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeInfo> {
        let url = self.endpoint(&format!("posts/{post_id}/toggle-like"))?;
        let response = self
            .http
            .post(url)
            .json(&ToggleLikeRequest { user_id })
            .send()
            .await?;
        let info: LikeInfo = ensure_success(response).await?.json().await?;
        debug!(
            "likes: toggled post={} user={} liked={} count={}",
            post_id, user_id, info.user_has_liked, info.like_count
        );
        Ok(info)
    }

    async fn like_count(&self, post_id: PostId) -> Result<u64> {
        let url = self.endpoint(&format!("posts/{post_id}/likes/count"))?;
        let response = self.http.get(url).send().await?;
        let body: LikeCountResponse = ensure_success(response).await?.json().await?;
        Ok(body.count)
    }

    async fn usernames(&self, user_ids: &[UserId]) -> Result<Vec<String>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = user_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint("auth/getUserNames")?;
        let response = self
            .http
            .get(url)
            .query(&[("userIds", joined)])
            .send()
            .await?;
        let body: UsernamesResponse = ensure_success(response).await?.json().await?;
        Ok(body.usernames)
    }
}

#[async_trait]
impl CommentsService for BlogApiClient {
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let url = self.endpoint(&format!("posts/{post_id}/comments"))?;
        let response = self.http.get(url).send().await?;
        let comments = ensure_success(response).await?.json().await?;
        Ok(comments)
    }

    async fn add_comment(&self, post_id: PostId, user_id: UserId, text: &str) -> Result<()> {
        let url = self.endpoint(&format!("posts/{post_id}/comments"))?;
        let response = self
            .http
            .post(url)
            .json(&NewCommentRequest {
                user_id,
                text: text.to_string(),
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PostsService for BlogApiClient {
    async fn posts_by_category(&self, category: Category) -> Result<Vec<PostSummary>> {
        let url = self.endpoint(&format!("posts/{category}"))?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let posts = ensure_success(response).await?.json().await?;
        Ok(posts)
    }

    async fn create_post(&self, author: UserId, post: &NewPost) -> Result<PostSummary> {
        let url = self.endpoint("posts")?;
        let response = self
            .http
            .post(url)
            .query(&[("userId", author.0)])
            .json(post)
            .send()
            .await?;
        let created = ensure_success(response).await?.json().await?;
        Ok(created)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
