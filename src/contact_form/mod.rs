//! Contact Form 7 field extraction
//!
//! The CMS describes forms in two shapes:
//! - `markup`: shortcode text such as `[email* your-email placeholder "..."]`
//!   returned by the form list endpoint
//! - `schema`: the structured `properties.form.fields` array returned by the
//!   single-form endpoint
//!
//! Both are turned into `FormField`s that templates and the JSON API render.

pub mod labels;
pub mod markup;
pub mod schema;

use serde::{Deserialize, Serialize};

pub use markup::parse_form_markup;
pub use schema::{fields_from_properties, public_fields};

/// Input kinds supported by the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Checkbox,
    Radio,
}

impl FieldKind {
    /// Markup order: the parser emits fields grouped by kind in this order
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Tel,
        FieldKind::Textarea,
        FieldKind::Select,
        FieldKind::Checkbox,
        FieldKind::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
        }
    }

    /// Map a plugin basetype; unknown basetypes render as text inputs
    pub fn from_basetype(basetype: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == basetype)
            .unwrap_or(FieldKind::Text)
    }
}

/// One renderable form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// A form as the site uses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    pub id: u64,
    pub title: String,
    pub fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_html: Option<String>,
}
