use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, PostId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeInfo {
    pub like_count: u64,
    pub user_has_liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsernamesResponse {
    #[serde(default)]
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub user_id: UserId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PostSummary {
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    pub cover_image: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_response_uses_camel_case_fields() {
        let info: LikeInfo =
            serde_json::from_str(r#"{"likeCount":3,"userHasLiked":true}"#).expect("decode");
        assert_eq!(
            info,
            LikeInfo {
                like_count: 3,
                user_has_liked: true
            }
        );

        let body = serde_json::to_value(ToggleLikeRequest { user_id: UserId(7) }).expect("encode");
        assert_eq!(body, serde_json::json!({ "userId": 7 }));
    }

    #[test]
    fn post_summary_tolerates_missing_optional_fields() {
        let post: PostSummary = serde_json::from_str(
            r#"{"id":4,"title":"Color Theory","category":"design","coverImage":"c.png"}"#,
        )
        .expect("decode");
        assert_eq!(post.id, PostId(4));
        assert_eq!(post.likes, 0);
        assert_eq!(post.category(), Some(Category::Design));
        assert_eq!(post.cover_image.as_deref(), Some("c.png"));
        assert!(post.created_at.is_none());
    }
}
