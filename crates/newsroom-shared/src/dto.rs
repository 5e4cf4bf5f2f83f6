//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to create a new article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
}

/// Request to edit an article. Only these fields are accepted; anything
/// else (status, author, counters) is rejected at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
}

/// Review action requested by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Request to review a pending article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewArticleRequest {
    pub action: ReviewAction,
    pub rejection_reason: Option<String>,
}

/// Query string of the article listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListArticlesQuery {
    pub status: Option<String>,
    /// Restrict to the caller's own articles.
    #[serde(default)]
    pub mine: bool,
}

/// Public representation of an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub status: String,
    pub view_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_rejects_smuggled_fields() {
        let result: Result<UpdateArticleRequest, _> =
            serde_json::from_str(r#"{"title":"ok","status":"published"}"#);
        assert!(result.is_err());

        let update: UpdateArticleRequest =
            serde_json::from_str(r#"{"title":"ok","coverImage":"cover.png"}"#).unwrap();
        assert_eq!(update.cover_image.as_deref(), Some("cover.png"));
    }

    #[test]
    fn test_review_request_wire_format() {
        let request: ReviewArticleRequest =
            serde_json::from_str(r#"{"action":"reject","rejectionReason":"needs citations"}"#)
                .unwrap();

        assert_eq!(request.action, ReviewAction::Reject);
        assert_eq!(request.rejection_reason.as_deref(), Some("needs citations"));
    }
}
