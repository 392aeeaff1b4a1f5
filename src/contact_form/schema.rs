//! Structured form schema from the single-form endpoint

use serde::{Deserialize, Serialize};

use super::labels::{
    public_label, public_placeholder, translated_label, EMAIL_PLACEHOLDER, PHONE_PLACEHOLDER,
};
use super::{FieldKind, FormField};

/// Raw form record: `GET /contact-form-7/v1/contact-forms/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub properties: Option<FormProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormProperties {
    #[serde(default)]
    pub form: Option<FormBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<SchemaField>>,
}

/// One tag as the plugin reports it (`type` carries the `*` required marker)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(default)]
    pub basetype: String,
    #[serde(rename = "type", default)]
    pub tag_type: String,
    #[serde(default)]
    pub name: String,
}

impl SchemaField {
    pub fn is_required(&self) -> bool {
        self.tag_type.contains('*')
    }
}

impl FormSchema {
    fn schema_fields(&self) -> &[SchemaField] {
        self.properties
            .as_ref()
            .and_then(|p| p.form.as_ref())
            .and_then(|f| f.fields.as_deref())
            .unwrap_or_default()
    }

    /// Raw form markup, empty when the plugin omitted it
    pub fn form_content(&self) -> String {
        self.properties
            .as_ref()
            .and_then(|p| p.form.as_ref())
            .and_then(|f| f.content.clone())
            .unwrap_or_default()
    }
}

/// Fields for forms rendered by the site itself
///
/// Submit buttons are skipped; labels are title-cased and translated.
pub fn fields_from_properties(schema: &FormSchema) -> Vec<FormField> {
    schema
        .schema_fields()
        .iter()
        .filter(|field| field.basetype != "submit")
        .map(|field| {
            let kind = FieldKind::from_basetype(&field.basetype);
            let label = translated_label(&field.name);

            let placeholder = if kind == FieldKind::Email {
                EMAIL_PLACEHOLDER.to_string()
            } else if field.name == "your-phone" {
                PHONE_PLACEHOLDER.to_string()
            } else {
                format!("Inserisci {}", label.to_lowercase())
            };

            FormField {
                name: field.name.clone(),
                kind,
                label,
                required: field.is_required(),
                placeholder: Some(placeholder),
            }
        })
        .collect()
}

/// Fields exposed by the public form API
///
/// Only `your-*` fields are published, and only plain input kinds.
pub fn public_fields(schema: &FormSchema) -> Vec<FormField> {
    schema
        .schema_fields()
        .iter()
        .filter(|field| field.name.starts_with("your-"))
        .map(|field| FormField {
            name: field.name.clone(),
            kind: match FieldKind::from_basetype(&field.basetype) {
                kind @ (FieldKind::Text | FieldKind::Email | FieldKind::Tel | FieldKind::Textarea) => kind,
                _ => FieldKind::Text,
            },
            label: public_label(&field.name),
            required: field.is_required(),
            placeholder: Some(public_placeholder(&field.name)),
        })
        .collect()
}
