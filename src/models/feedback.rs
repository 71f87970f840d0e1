//! Customer feedback, threaded through an optional parent

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback_id: i32,
    pub user_id: i32,
    /// None for top-level feedback, the replied-to feedback otherwise
    pub parent_id: Option<i32>,
    pub content: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

/// Feedback row joined with its author, as listed in FeedbackManagement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithAuthor {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
    pub author_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
}

/// Model of the ReplyFeedback view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyFeedbackView {
    pub feedback: Feedback,
    pub user_avatar: Option<String>,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub replies: Vec<Feedback>,
}

/// Query string of FeedbackManagement
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackManagementQuery {
    pub search_query: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Body of a new feedback or a reply
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackForm {
    #[validate(length(min = 1, max = 4000, message = "Content is required (at most 4000 characters)."))]
    pub content: String,
}

impl FeedbackForm {
    pub fn trimmed(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}
