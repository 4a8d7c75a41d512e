use super::*;

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::protocol::LikeInfo;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{EngagementController, EngagementOptions, StaticViewer, ToggleOutcome};

const MISSING_POST: i64 = 404;

#[derive(Clone, Default)]
struct ServerState {
    likes: Arc<Mutex<HashMap<i64, BTreeSet<i64>>>>,
    comments: Arc<Mutex<HashMap<i64, Vec<Comment>>>>,
    toggle_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    created: Arc<Mutex<Vec<(i64, serde_json::Value)>>>,
}

async fn handle_likers(
    State(state): State<ServerState>,
    Path(post_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let likes = state.likes.lock().await;
    let set = likes.get(&post_id).cloned().unwrap_or_default();
    match query.get("userId").and_then(|raw| raw.parse::<i64>().ok()) {
        Some(user_id) => Json(LikeInfo {
            like_count: set.len() as u64,
            user_has_liked: set.contains(&user_id),
        })
        .into_response(),
        None => Json(set.into_iter().collect::<Vec<_>>()).into_response(),
    }
}

async fn handle_like_count(
    State(state): State<ServerState>,
    Path(post_id): Path<i64>,
) -> Json<serde_json::Value> {
    let likes = state.likes.lock().await;
    let count = likes.get(&post_id).map(BTreeSet::len).unwrap_or_default();
    Json(serde_json::json!({ "count": count }))
}

async fn handle_toggle(
    State(state): State<ServerState>,
    Path(post_id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if post_id == MISSING_POST {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "post not found" })),
        )
            .into_response();
    }
    state.toggle_bodies.lock().await.push(body.clone());
    let user_id = body["userId"].as_i64().unwrap_or_default();
    let mut likes = state.likes.lock().await;
    let set = likes.entry(post_id).or_default();
    let user_has_liked = if set.remove(&user_id) {
        false
    } else {
        set.insert(user_id);
        true
    };
    Json(LikeInfo {
        like_count: set.len() as u64,
        user_has_liked,
    })
    .into_response()
}

async fn handle_usernames(Query(query): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let usernames: Vec<String> = query
        .get("userIds")
        .map(|raw| raw.split(',').map(|id| format!("user{id}")).collect())
        .unwrap_or_default();
    Json(serde_json::json!({ "usernames": usernames }))
}

async fn handle_comments(
    State(state): State<ServerState>,
    Path(post_id): Path<i64>,
) -> Json<Vec<Comment>> {
    let comments = state.comments.lock().await;
    Json(comments.get(&post_id).cloned().unwrap_or_default())
}

async fn handle_add_comment(
    State(state): State<ServerState>,
    Path(post_id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let user_id = body["userId"].as_i64().unwrap_or_default();
    let text = body["text"].as_str().unwrap_or_default().to_string();
    state
        .comments
        .lock()
        .await
        .entry(post_id)
        .or_default()
        .push(Comment {
            user_name: format!("user{user_id}"),
            text,
        });
    StatusCode::CREATED
}

async fn handle_posts_by_category(Path(category): Path<String>) -> impl IntoResponse {
    if category == "Lifestyle" {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(serde_json::json!([
        {
            "id": 1,
            "title": "How to Master React in 30 Days",
            "excerpt": "Learn the fundamentals",
            "category": category,
            "likes": 120,
            "comments": 30,
            "createdAt": "2025-03-01T10:00:00Z"
        }
    ]))
    .into_response()
}

async fn handle_create_post(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let author = query
        .get("userId")
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or_default();
    state.created.lock().await.push((author, body.clone()));
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": 99,
            "title": body["title"],
            "excerpt": body["excerpt"],
            "category": body["category"],
            "coverImage": body["coverImage"],
            "content": body["content"]
        })),
    )
}

async fn spawn_blog_server(state: ServerState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/posts", post(handle_create_post))
        .route("/api/posts/:id", get(handle_posts_by_category))
        .route("/api/posts/:id/likes", get(handle_likers))
        .route("/api/posts/:id/likes/count", get(handle_like_count))
        .route("/api/posts/:id/toggle-like", post(handle_toggle))
        .route(
            "/api/posts/:id/comments",
            get(handle_comments).post(handle_add_comment),
        )
        .route("/api/auth/getUserNames", get(handle_usernames))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

async fn seeded_state() -> ServerState {
    let state = ServerState::default();
    state
        .likes
        .lock()
        .await
        .insert(4, [1, 2, 9].into_iter().collect());
    state
}

#[tokio::test]
async fn fetches_likers_and_count() {
    let state = seeded_state().await;
    let base_url = spawn_blog_server(state).await.expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let likers = client.fetch_likers(PostId(4)).await.expect("likers");
    assert_eq!(likers, vec![UserId(1), UserId(2), UserId(9)]);
    assert_eq!(client.like_count(PostId(4)).await.expect("count"), 3);
    assert!(client
        .fetch_likers(PostId(5))
        .await
        .expect("empty likers")
        .is_empty());
}

#[tokio::test]
async fn like_info_reports_viewer_membership() {
    let state = seeded_state().await;
    let base_url = spawn_blog_server(state).await.expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let info = client.like_info(PostId(4), UserId(9)).await.expect("info");
    assert_eq!(
        info,
        LikeInfo {
            like_count: 3,
            user_has_liked: true
        }
    );
    let info = client.like_info(PostId(4), UserId(5)).await.expect("info");
    assert!(!info.user_has_liked);
}

#[tokio::test]
async fn toggle_posts_user_id_body() {
    let state = seeded_state().await;
    let base_url = spawn_blog_server(state.clone()).await.expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let info = client
        .toggle_like(PostId(4), UserId(2))
        .await
        .expect("toggle");
    assert_eq!(
        info,
        LikeInfo {
            like_count: 2,
            user_has_liked: false
        }
    );
    let bodies = state.toggle_bodies.lock().await.clone();
    assert_eq!(bodies, vec![serde_json::json!({ "userId": 2 })]);
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let base_url = spawn_blog_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let err = client
        .toggle_like(PostId(MISSING_POST), UserId(2))
        .await
        .expect_err("missing post");
    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    assert_eq!(api_error.status, 404);
    assert_eq!(api_error.message, "post not found");
}

#[tokio::test]
async fn resolves_usernames_and_skips_empty_lookup() {
    let base_url = spawn_blog_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let names = client
        .usernames(&[UserId(3), UserId(5)])
        .await
        .expect("names");
    assert_eq!(names, vec!["user3".to_string(), "user5".to_string()]);
    assert!(client.usernames(&[]).await.expect("empty").is_empty());
}

#[tokio::test]
async fn comments_round_trip() {
    let base_url = spawn_blog_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    assert!(client
        .fetch_comments(PostId(8))
        .await
        .expect("no comments")
        .is_empty());
    client
        .add_comment(PostId(8), UserId(3), "Nice read")
        .await
        .expect("add comment");
    let comments = client.fetch_comments(PostId(8)).await.expect("comments");
    assert_eq!(
        comments,
        vec![Comment {
            user_name: "user3".into(),
            text: "Nice read".into()
        }]
    );
}

#[tokio::test]
async fn posts_by_category_handles_no_content() {
    let base_url = spawn_blog_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let posts = client
        .posts_by_category(Category::Technology)
        .await
        .expect("posts");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].category(), Some(Category::Technology));
    assert!(posts[0].created_at.is_some());

    let empty = client
        .posts_by_category(Category::Lifestyle)
        .await
        .expect("no content");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn create_post_sends_author_query() {
    let state = ServerState::default();
    let base_url = spawn_blog_server(state.clone()).await.expect("spawn server");
    let client = BlogApiClient::new(&base_url).expect("client");

    let created = client
        .create_post(
            UserId(7),
            &NewPost {
                title: "Creating the Perfect Home Office".into(),
                excerpt: "Ergonomics and lighting".into(),
                category: Category::Lifestyle,
                cover_image: String::new(),
                content: "Long form".into(),
            },
        )
        .await
        .expect("create");
    assert_eq!(created.id, PostId(99));
    assert_eq!(created.category(), Some(Category::Lifestyle));

    let recorded = state.created.lock().await.clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, 7);
    assert_eq!(recorded[0].1["coverImage"], "");
}

#[test]
fn base_url_is_normalized_and_validated() {
    let client = BlogApiClient::new("http://localhost:8080/api").expect("client");
    assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/");
    assert_eq!(
        client
            .endpoint("posts/4/likes")
            .expect("endpoint")
            .as_str(),
        "http://localhost:8080/api/posts/4/likes"
    );
    assert!(BlogApiClient::new("ftp://example.com").is_err());
    assert!(BlogApiClient::new("::not a url").is_err());
}

#[tokio::test]
async fn controller_over_http_double_tap_scenario() {
    let state = ServerState::default();
    state
        .likes
        .lock()
        .await
        .insert(11, [3, 5].into_iter().collect());
    let base_url = spawn_blog_server(state.clone()).await.expect("spawn server");
    let client = Arc::new(BlogApiClient::new(&base_url).expect("client"));
    let controller = EngagementController::new_with_dependencies(
        client.clone(),
        client,
        Arc::new(StaticViewer::new(UserId(7), "grace")),
        EngagementOptions::default(),
    );

    controller.load_likers(PostId(11)).await.expect("load");
    controller
        .double_tap_as_viewer(PostId(11))
        .await
        .expect("double tap");
    controller
        .double_tap_as_viewer(PostId(11))
        .await
        .expect("second double tap");

    let snapshot = controller
        .snapshot(PostId(11), Some(UserId(7)))
        .await
        .expect("mounted");
    assert_eq!(
        snapshot.liker_ids,
        [UserId(3), UserId(5), UserId(7)].into_iter().collect()
    );
    assert_eq!(state.toggle_bodies.lock().await.len(), 1);

    let outcome = controller
        .toggle_like_as_viewer(PostId(11))
        .await
        .expect("unlike");
    assert!(matches!(
        outcome,
        ToggleOutcome::Committed { liked: false, like_count: 2 }
    ));
}
