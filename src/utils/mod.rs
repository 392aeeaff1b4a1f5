//! Text utilities shared by the page handlers
//!
//! - html: Tag stripping, entity decoding and excerpts for CMS content
//! - dates: Italian long-form dates for post bylines

pub mod html;
pub mod dates;

// Re-export commonly used helpers
pub use html::{strip_html, excerpt};
pub use dates::format_date;
