//! Per-post like/comment state with optimistic updates.
//!
//! Every like mutation is applied locally first, marked pending, and then
//! either committed against the server response or rolled back to the
//! viewer's prior membership. At most one like request is in flight per
//! post; a second gesture while one is pending is rejected without a
//! network call.
//!
//! State is keyed by post and tagged with a mount epoch. Completions that
//! arrive after the post was unmounted (or remounted) are discarded. Reads
//! are also stamped with the post's commit sequence, so a liker set fetched
//! before a like committed never overwrites the committed membership.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use futures::future::join_all;
use shared::{
    domain::{PostId, UserId},
    protocol::{Comment, LikeInfo},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    session::ViewerProvider, ClientSettings, CommentsService, LikesService, MissingCommentsService,
};

pub type LikerSet = BTreeSet<UserId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    FetchFailed,
    ToggleFailed,
    CommentsFailed,
    CommentFailed,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "Please log in to like this post.",
            ErrorKind::FetchFailed => "Could not load likes.",
            ErrorKind::ToggleFailed => "Could not update like status.",
            ErrorKind::CommentsFailed => "Failed to fetch comments.",
            ErrorKind::CommentFailed => "Failed to add comment.",
        }
    }
}

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("please log in first")]
    Unauthenticated,
    #[error("comment text must not be empty")]
    EmptyComment,
    #[error("could not load likes for post {post_id}: {source}")]
    FetchFailed {
        post_id: PostId,
        source: anyhow::Error,
    },
    #[error("could not update like status for post {post_id}: {source}")]
    ToggleFailed {
        post_id: PostId,
        source: anyhow::Error,
    },
    #[error("like request for post {post_id} timed out after {after:?}")]
    ToggleTimedOut { post_id: PostId, after: Duration },
    #[error("could not load comments for post {post_id}: {source}")]
    CommentsFailed {
        post_id: PostId,
        source: anyhow::Error,
    },
    #[error("could not add comment to post {post_id}: {source}")]
    CommentFailed {
        post_id: PostId,
        source: anyhow::Error,
    },
}

impl EngagementError {
    /// `None` for validation failures that never reach the network.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EngagementError::Unauthenticated => Some(ErrorKind::Unauthenticated),
            EngagementError::EmptyComment => None,
            EngagementError::FetchFailed { .. } => Some(ErrorKind::FetchFailed),
            EngagementError::ToggleFailed { .. } | EngagementError::ToggleTimedOut { .. } => {
                Some(ErrorKind::ToggleFailed)
            }
            EngagementError::CommentsFailed { .. } => Some(ErrorKind::CommentsFailed),
            EngagementError::CommentFailed { .. } => Some(ErrorKind::CommentFailed),
        }
    }

    pub fn user_message(&self) -> String {
        match self.kind() {
            Some(kind) => kind.user_message().to_string(),
            None => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOrigin {
    Toggle,
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePhase {
    /// No liker data fetched yet.
    Unknown,
    Loaded,
    /// Optimistic mutation in flight; `prior_membership` is what a rollback restores.
    Pending {
        viewer: UserId,
        prior_membership: bool,
        origin: PendingOrigin,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Committed,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Committed { liked: bool, like_count: u64 },
    /// Another like request for this post is still in flight.
    AlreadyPending,
    /// The post was unmounted before the server answered.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleTapOutcome {
    Liked(ToggleOutcome),
    /// Visual acknowledgment only.
    Acknowledged,
}

#[derive(Debug, Clone, Copy)]
pub struct EngagementOptions {
    pub request_timeout: Duration,
    pub refresh_after_toggle: bool,
}

impl Default for EngagementOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            refresh_after_toggle: true,
        }
    }
}

impl From<&ClientSettings> for EngagementOptions {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            request_timeout: settings.request_timeout,
            refresh_after_toggle: settings.refresh_after_toggle,
        }
    }
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementSnapshot {
    pub post_id: PostId,
    pub liker_ids: LikerSet,
    pub has_liked: bool,
    pub is_pending: bool,
    pub phase: LikePhase,
    pub confirmed_like_count: Option<u64>,
    pub last_error: Option<ErrorKind>,
    pub last_resolution: Option<Resolution>,
    pub comments: Vec<Comment>,
    pub double_tap_consumed: bool,
}

impl EngagementSnapshot {
    /// Count shown next to the heart: the liker set once known, else the server count.
    pub fn display_count(&self) -> u64 {
        match (self.phase, self.confirmed_like_count) {
            (LikePhase::Unknown, Some(count)) if self.liker_ids.is_empty() => count,
            _ => self.liker_ids.len() as u64,
        }
    }
}

#[derive(Debug)]
struct PostEngagement {
    epoch: u64,
    liker_ids: LikerSet,
    phase: LikePhase,
    confirmed_like_count: Option<u64>,
    last_error: Option<ErrorKind>,
    last_resolution: Option<Resolution>,
    comments: Vec<Comment>,
    double_tap_consumed: bool,
    /// Bumped on every committed like; reads issued under an older value are stale.
    commit_seq: u64,
}

impl PostEngagement {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            liker_ids: LikerSet::new(),
            phase: LikePhase::Unknown,
            confirmed_like_count: None,
            last_error: None,
            last_resolution: None,
            comments: Vec::new(),
            double_tap_consumed: false,
            commit_seq: 0,
        }
    }

    fn set_membership(&mut self, viewer: UserId, member: bool) {
        if member {
            self.liker_ids.insert(viewer);
        } else {
            self.liker_ids.remove(&viewer);
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self.phase, LikePhase::Pending { .. })
    }

    fn read_ticket(&self) -> ReadTicket {
        ReadTicket {
            epoch: self.epoch,
            commit_seq: self.commit_seq,
        }
    }

    /// Flips the viewer's membership and enters `Pending`. Caller has checked
    /// that the likers are loaded and nothing is pending yet.
    fn begin_optimistic(
        &mut self,
        viewer: UserId,
        liked: bool,
        origin: PendingOrigin,
    ) -> PendingTicket {
        let prior_membership = self.liker_ids.contains(&viewer);
        let ticket = PendingTicket {
            epoch: self.epoch,
            viewer,
            prior_membership,
            origin,
        };
        self.set_membership(viewer, liked);
        self.phase = LikePhase::Pending {
            viewer,
            prior_membership,
            origin,
        };
        ticket
    }

    fn snapshot(&self, post_id: PostId, viewer: Option<UserId>) -> EngagementSnapshot {
        EngagementSnapshot {
            post_id,
            liker_ids: self.liker_ids.clone(),
            has_liked: viewer.is_some_and(|viewer| self.liker_ids.contains(&viewer)),
            is_pending: self.is_pending(),
            phase: self.phase,
            confirmed_like_count: self.confirmed_like_count,
            last_error: self.last_error,
            last_resolution: self.last_resolution,
            comments: self.comments.clone(),
            double_tap_consumed: self.double_tap_consumed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTicket {
    epoch: u64,
    viewer: UserId,
    prior_membership: bool,
    origin: PendingOrigin,
}

#[derive(Debug, Clone, Copy)]
struct ReadTicket {
    epoch: u64,
    commit_seq: u64,
}

#[derive(Default)]
struct ControllerState {
    posts: HashMap<PostId, PostEngagement>,
    next_epoch: u64,
}

impl ControllerState {
    fn entry(&mut self, post_id: PostId) -> &mut PostEngagement {
        let next_epoch = &mut self.next_epoch;
        self.posts.entry(post_id).or_insert_with(|| {
            *next_epoch += 1;
            PostEngagement::new(*next_epoch)
        })
    }

    /// State for `post_id` only if it is still the mount that issued the request.
    fn live(&mut self, post_id: PostId, epoch: u64) -> Option<&mut PostEngagement> {
        self.posts
            .get_mut(&post_id)
            .filter(|state| state.epoch == epoch)
    }
}

pub struct EngagementController {
    likes: Arc<dyn LikesService>,
    comments: Arc<dyn CommentsService>,
    viewer: Arc<dyn ViewerProvider>,
    options: EngagementOptions,
    inner: Mutex<ControllerState>,
}

impl EngagementController {
    pub fn new(likes: Arc<dyn LikesService>, viewer: Arc<dyn ViewerProvider>) -> Arc<Self> {
        Self::new_with_dependencies(
            likes,
            Arc::new(MissingCommentsService),
            viewer,
            EngagementOptions::default(),
        )
    }

    pub fn new_with_dependencies(
        likes: Arc<dyn LikesService>,
        comments: Arc<dyn CommentsService>,
        viewer: Arc<dyn ViewerProvider>,
        options: EngagementOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            likes,
            comments,
            viewer,
            options,
            inner: Mutex::new(ControllerState::default()),
        })
    }

    pub fn viewer(&self) -> &Arc<dyn ViewerProvider> {
        &self.viewer
    }

    /// Creates state for a feed item if absent. Returns the mount epoch.
    pub async fn mount(&self, post_id: PostId) -> u64 {
        self.inner.lock().await.entry(post_id).epoch
    }

    /// Drops all state for the post; in-flight results for it are discarded.
    pub async fn unmount(&self, post_id: PostId) -> bool {
        let removed = self.inner.lock().await.posts.remove(&post_id).is_some();
        if removed {
            debug!(post = %post_id, "engagement: unmounted");
        }
        removed
    }

    pub async fn snapshot(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Option<EngagementSnapshot> {
        let guard = self.inner.lock().await;
        guard
            .posts
            .get(&post_id)
            .map(|state| state.snapshot(post_id, viewer))
    }

    pub async fn load_likers(&self, post_id: PostId) -> Result<LikerSet, EngagementError> {
        let read = self.inner.lock().await.entry(post_id).read_ticket();
        self.fetch_likers_into(post_id, read).await
    }

    /// Re-fetches likers for the mount that issued `epoch`; skipped once that
    /// mount is gone.
    async fn refresh_likers(
        &self,
        post_id: PostId,
        epoch: u64,
    ) -> Option<Result<LikerSet, EngagementError>> {
        let read = {
            let mut guard = self.inner.lock().await;
            guard.live(post_id, epoch).map(|state| state.read_ticket())
        };
        let Some(read) = read else {
            debug!(post = %post_id, "engagement: skipping refresh for unmounted post");
            return None;
        };
        Some(self.fetch_likers_into(post_id, read).await)
    }

    async fn fetch_likers_into(
        &self,
        post_id: PostId,
        read: ReadTicket,
    ) -> Result<LikerSet, EngagementError> {
        let fetched = self.likes.fetch_likers(post_id).await;

        let mut guard = self.inner.lock().await;
        let state = guard.live(post_id, read.epoch);
        match fetched {
            Ok(ids) => {
                let likers: LikerSet = ids.into_iter().collect();
                let Some(state) = state else {
                    debug!(post = %post_id, "engagement: discarding likers for unmounted post");
                    return Ok(likers);
                };
                if state.commit_seq != read.commit_seq {
                    debug!(post = %post_id, "engagement: discarding likers fetched before a commit");
                    return Ok(likers);
                }
                state.liker_ids = likers.clone();
                match state.phase {
                    LikePhase::Pending {
                        viewer,
                        prior_membership,
                        ..
                    } => state.set_membership(viewer, !prior_membership),
                    _ => state.phase = LikePhase::Loaded,
                }
                if state.last_error == Some(ErrorKind::FetchFailed) {
                    state.last_error = None;
                }
                Ok(likers)
            }
            Err(source) => {
                warn!("engagement: failed to load likers post={post_id}: {source:#}");
                if let Some(state) = state {
                    state.last_error = Some(ErrorKind::FetchFailed);
                }
                Err(EngagementError::FetchFailed { post_id, source })
            }
        }
    }

    /// A gesture on a post whose likers were never fetched would toggle blind,
    /// so the set is loaded first. Load failures abort the gesture.
    async fn ensure_likers_known(&self, post_id: PostId) -> Result<(), EngagementError> {
        let unknown = self.inner.lock().await.entry(post_id).phase == LikePhase::Unknown;
        if unknown {
            self.load_likers(post_id).await?;
        }
        Ok(())
    }

    /// Loads liker sets for a page of feed items concurrently.
    pub async fn load_feed(
        &self,
        post_ids: &[PostId],
    ) -> Vec<(PostId, Result<LikerSet, EngagementError>)> {
        let loads = post_ids.iter().map(|&post_id| async move {
            let result = self.load_likers(post_id).await;
            (post_id, result)
        });
        join_all(loads).await
    }

    /// Count-only path for viewers without a session.
    pub async fn like_count(&self, post_id: PostId) -> Result<u64, EngagementError> {
        let epoch = self.mount(post_id).await;
        let fetched = self.likes.like_count(post_id).await;

        let mut guard = self.inner.lock().await;
        let state = guard.live(post_id, epoch);
        match fetched {
            Ok(count) => {
                if let Some(state) = state {
                    state.confirmed_like_count = Some(count);
                }
                Ok(count)
            }
            Err(source) => {
                if let Some(state) = state {
                    state.last_error = Some(ErrorKind::FetchFailed);
                }
                Err(EngagementError::FetchFailed { post_id, source })
            }
        }
    }

    /// Authenticated count and liked-state read for one viewer.
    pub async fn like_info(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Result<LikeInfo, EngagementError> {
        let viewer = viewer.ok_or(EngagementError::Unauthenticated)?;
        let read = self.inner.lock().await.entry(post_id).read_ticket();
        let fetched = self.likes.like_info(post_id, viewer).await;

        let mut guard = self.inner.lock().await;
        let state = guard
            .live(post_id, read.epoch)
            .filter(|state| state.commit_seq == read.commit_seq);
        match fetched {
            Ok(info) => {
                if let Some(state) = state {
                    state.confirmed_like_count = Some(info.like_count);
                    if state.phase == LikePhase::Loaded {
                        state.set_membership(viewer, info.user_has_liked);
                    }
                }
                Ok(info)
            }
            Err(source) => {
                warn!("engagement: failed to load like info post={post_id}: {source:#}");
                if let Some(state) = state {
                    state.last_error = Some(ErrorKind::FetchFailed);
                }
                Err(EngagementError::FetchFailed { post_id, source })
            }
        }
    }

    pub async fn toggle_like(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Result<ToggleOutcome, EngagementError> {
        let viewer = viewer.ok_or(EngagementError::Unauthenticated)?;
        self.ensure_likers_known(post_id).await?;

        let ticket = {
            let mut guard = self.inner.lock().await;
            let state = guard.entry(post_id);
            if state.is_pending() {
                debug!(post = %post_id, viewer = %viewer, "engagement: toggle ignored, already pending");
                return Ok(ToggleOutcome::AlreadyPending);
            }
            if state.phase == LikePhase::Unknown {
                // Remounted while the likers were loading.
                return Ok(ToggleOutcome::Discarded);
            }
            let liked = !state.liker_ids.contains(&viewer);
            state.begin_optimistic(viewer, liked, PendingOrigin::Toggle)
        };

        self.confirm(post_id, ticket).await
    }

    /// One-directional like: only the first double-tap of a viewing session
    /// may reach the network, and it never unlikes.
    pub async fn double_tap_like(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Result<DoubleTapOutcome, EngagementError> {
        let viewer = viewer.ok_or(EngagementError::Unauthenticated)?;
        let consumed = self
            .inner
            .lock()
            .await
            .entry(post_id)
            .double_tap_consumed;
        if !consumed {
            self.ensure_likers_known(post_id).await?;
        }

        let ticket = {
            let mut guard = self.inner.lock().await;
            let state = guard.entry(post_id);
            if state.double_tap_consumed || state.is_pending() {
                return Ok(DoubleTapOutcome::Acknowledged);
            }
            if state.phase == LikePhase::Unknown {
                return Ok(DoubleTapOutcome::Liked(ToggleOutcome::Discarded));
            }
            state.double_tap_consumed = true;
            if state.liker_ids.contains(&viewer) {
                return Ok(DoubleTapOutcome::Acknowledged);
            }
            state.begin_optimistic(viewer, true, PendingOrigin::DoubleTap)
        };

        self.confirm(post_id, ticket)
            .await
            .map(DoubleTapOutcome::Liked)
    }

    pub async fn toggle_like_as_viewer(
        &self,
        post_id: PostId,
    ) -> Result<ToggleOutcome, EngagementError> {
        self.toggle_like(post_id, self.viewer.current_viewer_id())
            .await
    }

    pub async fn double_tap_as_viewer(
        &self,
        post_id: PostId,
    ) -> Result<DoubleTapOutcome, EngagementError> {
        self.double_tap_like(post_id, self.viewer.current_viewer_id())
            .await
    }

    async fn request_toggle(
        &self,
        post_id: PostId,
        viewer: UserId,
    ) -> Result<LikeInfo, EngagementError> {
        let after = self.options.request_timeout;
        match tokio::time::timeout(after, self.likes.toggle_like(post_id, viewer)).await {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(source)) => Err(EngagementError::ToggleFailed { post_id, source }),
            Err(_) => Err(EngagementError::ToggleTimedOut { post_id, after }),
        }
    }

    /// Issues the like request for an optimistic mutation and resolves it.
    async fn confirm(
        &self,
        post_id: PostId,
        ticket: PendingTicket,
    ) -> Result<ToggleOutcome, EngagementError> {
        let mut result = self.request_toggle(post_id, ticket.viewer).await;

        // The server toggles, so a double-tap racing a like from elsewhere
        // can come back unliked. Toggle again to restore the like.
        if ticket.origin == PendingOrigin::DoubleTap
            && matches!(result, Ok(LikeInfo { user_has_liked: false, .. }))
        {
            warn!(
                "engagement: double-tap removed an existing like, re-liking post={post_id} viewer={}",
                ticket.viewer
            );
            result = match self.request_toggle(post_id, ticket.viewer).await {
                Ok(info) if !info.user_has_liked => Err(EngagementError::ToggleFailed {
                    post_id,
                    source: anyhow::anyhow!("server still reports the post as unliked"),
                }),
                other => other,
            };
        }

        let outcome = self.resolve(post_id, ticket, result).await?;

        if self.options.refresh_after_toggle
            && matches!(outcome, ToggleOutcome::Committed { .. })
        {
            // Picks up likes by other viewers; the toggle itself already succeeded.
            let _ = self.refresh_likers(post_id, ticket.epoch).await;
        }

        Ok(outcome)
    }

    async fn resolve(
        &self,
        post_id: PostId,
        ticket: PendingTicket,
        result: Result<LikeInfo, EngagementError>,
    ) -> Result<ToggleOutcome, EngagementError> {
        let mut guard = self.inner.lock().await;
        let Some(state) = guard.live(post_id, ticket.epoch) else {
            debug!(post = %post_id, "engagement: discarding like result for unmounted post");
            return Ok(ToggleOutcome::Discarded);
        };

        match result {
            Ok(info) => {
                state.set_membership(ticket.viewer, info.user_has_liked);
                state.confirmed_like_count = Some(info.like_count);
                state.phase = LikePhase::Loaded;
                state.commit_seq += 1;
                state.last_error = None;
                state.last_resolution = Some(Resolution::Committed);
                info!(
                    "engagement: like committed post={} viewer={} liked={} count={}",
                    post_id, ticket.viewer, info.user_has_liked, info.like_count
                );
                Ok(ToggleOutcome::Committed {
                    liked: info.user_has_liked,
                    like_count: info.like_count,
                })
            }
            Err(err) => {
                state.set_membership(ticket.viewer, ticket.prior_membership);
                // Gestures only start from a loaded set, and loads during the
                // pending window keep it loaded.
                state.phase = LikePhase::Loaded;
                state.last_error = Some(ErrorKind::ToggleFailed);
                state.last_resolution = Some(Resolution::RolledBack);
                if ticket.origin == PendingOrigin::DoubleTap {
                    state.double_tap_consumed = false;
                }
                warn!("engagement: like rolled back post={post_id} viewer={}: {err}", ticket.viewer);
                Err(err)
            }
        }
    }

    /// Usernames of the current likers. Lookup failures degrade to an empty list.
    pub async fn liker_names(&self, post_id: PostId) -> Vec<String> {
        let likers: Vec<UserId> = {
            let guard = self.inner.lock().await;
            match guard.posts.get(&post_id) {
                Some(state) => state.liker_ids.iter().copied().collect(),
                None => return Vec::new(),
            }
        };
        if likers.is_empty() {
            return Vec::new();
        }
        match self.likes.usernames(&likers).await {
            Ok(names) => names,
            Err(err) => {
                warn!("engagement: failed to resolve liker names post={post_id}: {err:#}");
                Vec::new()
            }
        }
    }

    pub async fn load_comments(&self, post_id: PostId) -> Result<Vec<Comment>, EngagementError> {
        let epoch = self.mount(post_id).await;
        let fetched = self.comments.fetch_comments(post_id).await;

        let mut guard = self.inner.lock().await;
        let state = guard.live(post_id, epoch);
        match fetched {
            Ok(comments) => {
                if let Some(state) = state {
                    state.comments = comments.clone();
                    if state.last_error == Some(ErrorKind::CommentsFailed) {
                        state.last_error = None;
                    }
                }
                Ok(comments)
            }
            Err(source) => {
                warn!("engagement: failed to load comments post={post_id}: {source:#}");
                if let Some(state) = state {
                    state.last_error = Some(ErrorKind::CommentsFailed);
                }
                Err(EngagementError::CommentsFailed { post_id, source })
            }
        }
    }

    pub async fn add_comment(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
        text: &str,
    ) -> Result<Comment, EngagementError> {
        let viewer = viewer.ok_or(EngagementError::Unauthenticated)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EngagementError::EmptyComment);
        }

        let epoch = self.mount(post_id).await;
        let posted = self.comments.add_comment(post_id, viewer, text).await;

        let user_name = self
            .viewer
            .current_viewer()
            .filter(|identity| identity.id == viewer)
            .map(|identity| identity.username)
            .unwrap_or_else(|| format!("user {viewer}"));
        let comment = Comment {
            user_name,
            text: text.to_string(),
        };

        let mut guard = self.inner.lock().await;
        let state = guard.live(post_id, epoch);
        match posted {
            Ok(()) => {
                if let Some(state) = state {
                    state.comments.push(comment.clone());
                }
                Ok(comment)
            }
            Err(source) => {
                warn!("engagement: failed to add comment post={post_id}: {source:#}");
                if let Some(state) = state {
                    state.last_error = Some(ErrorKind::CommentFailed);
                }
                Err(EngagementError::CommentFailed { post_id, source })
            }
        }
    }
}

/// "Liked by" line: the viewer shows as "You" first, followed by everyone else.
pub fn liked_by_line(
    names: &[String],
    viewer_liked: bool,
    viewer_username: Option<&str>,
) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    if !viewer_liked {
        return Some(names.join(", "));
    }
    let mut parts = vec!["You"];
    parts.extend(
        names
            .iter()
            .map(String::as_str)
            .filter(|name| Some(*name) != viewer_username),
    );
    Some(parts.join(", "))
}

#[cfg(test)]
#[path = "tests/engagement_tests.rs"]
mod tests;
