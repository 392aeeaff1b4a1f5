//! WordPress REST records
//!
//! Shapes follow `/wp-json/wp/v2` verbatim; fields the site never reads are
//! left out and ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::client::{MSG_SEND_FAILED, MSG_SENT};

/// `{ "rendered": "<p>...</p>" }` wrapper used for titles and bodies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostLinks {
    #[serde(rename = "wp:featuredmedia", default, skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default)]
    pub author: u64,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(rename = "_links", default)]
    pub links: PostLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSize {
    pub source_url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub sizes: HashMap<String, MediaSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    pub source_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub media_details: MediaDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub featured_media: u64,
}

/// Filters for the post listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PostQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub search: Option<String>,
    pub categories: Vec<u64>,
}

impl PostQuery {
    pub fn latest(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    /// Query string with only the parameters that are set
    ///
    /// Zero and empty values count as unset.
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();

        if let Some(per_page) = self.per_page.filter(|n| *n > 0) {
            params.push(format!("per_page={}", per_page));
        }
        if let Some(page) = self.page.filter(|n| *n > 0) {
            params.push(format!("page={}", page));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if !self.categories.is_empty() {
            let joined = self
                .categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(format!("categories={}", urlencoding::encode(&joined)));
        }

        params.join("&")
    }
}

/// Legacy four-field contact form payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// Reply of `POST .../contact-forms/{id}/feedback`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl FeedbackResponse {
    pub fn is_mail_sent(&self) -> bool {
        self.status == "mail_sent"
    }

    /// User-facing outcome of a relayed submission
    ///
    /// Failure text prefers the plugin's `message`, then `response`.
    pub fn into_outcome(self) -> SubmitOutcome {
        if self.is_mail_sent() {
            return SubmitOutcome {
                success: true,
                message: MSG_SENT.to_string(),
            };
        }
        let message = self
            .message
            .filter(|m| !m.is_empty())
            .or(self.response.filter(|r| !r.is_empty()))
            .unwrap_or_else(|| MSG_SEND_FAILED.to_string());
        SubmitOutcome {
            success: false,
            message,
        }
    }
}

/// User-facing result of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}
