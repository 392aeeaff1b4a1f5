//! Headless WordPress integration
//!
//! - `types`: Post, media and page records as the REST API returns them
//! - `client`: Async client for the core API and the Contact Form 7 API

pub mod client;
pub mod types;

pub use client::WordPressClient;
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("WordPress API credentials not configured")]
    MissingCredentials,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to parse JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
