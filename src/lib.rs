//! Bakery marketing site
//!
//! Server-rendered pages backed by a headless WordPress:
//! - `wordpress/`: REST client for posts, media, pages and Contact Form 7
//! - `contact_form/`: Field extraction from form markup and form schemas
//! - `utils/`: HTML stripping and Italian date formatting
//! - `api_server`, `web/`, `page_cache`: Axum router, Askama pages and the
//!   revalidating cache (feature `server`)

pub mod config;
pub mod contact_form;
pub mod utils;
pub mod wordpress;

#[cfg(feature = "server")]
pub mod api_server;
#[cfg(feature = "server")]
pub mod page_cache;
#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use config::SiteConfig;
pub use contact_form::{FieldKind, FormConfig, FormField};
pub use wordpress::{CmsError, WordPressClient};

#[cfg(feature = "server")]
pub use api_server::{create_router, AppState};
