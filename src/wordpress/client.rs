//! Async WordPress client
//!
//! Two layers:
//! - `fetch_*`: fallible calls returning `Result<_, CmsError>`
//! - `get_*`: page-facing wrappers that log failures and fall back to empty
//!   results, so a CMS outage degrades a page instead of failing it

use serde::de::DeserializeOwned;

use super::types::{
    ContactFormData, FeedbackResponse, Media, Page, Post, PostQuery, SubmitOutcome,
};
use super::CmsError;
use crate::config::{Credentials, SiteConfig};
use crate::contact_form::schema::FormSchema;
use crate::contact_form::{fields_from_properties, parse_form_markup, FormConfig};

/// Plugin version advertised in feedback submissions
pub const WPCF7_VERSION: &str = "5.8.1";
pub const WPCF7_LOCALE: &str = "it_IT";

pub const MSG_SENT: &str = "Messaggio inviato con successo!";
pub const MSG_SEND_FAILED: &str = "Errore nell'invio del messaggio";
pub const MSG_CONNECTION: &str = "Errore di connessione. Riprova più tardi.";

/// Entry of the form list endpoint
#[derive(Debug, serde::Deserialize)]
struct FormListEntry {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    form: String,
}

#[derive(Clone)]
pub struct WordPressClient {
    http: reqwest::Client,
    config: SiteConfig,
}

impl WordPressClient {
    pub fn new(config: SiteConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .timeout(config.cms_timeout)
            .build()
            .map_err(|source| CmsError::Transport {
                url: config.wordpress_url.clone(),
                source,
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn default_form_id(&self) -> u64 {
        self.config.default_form_id
    }

    fn credentials(&self) -> Result<&Credentials, CmsError> {
        self.config
            .credentials
            .as_ref()
            .ok_or(CmsError::MissingCredentials)
    }

    // ------------------------------------------------------------------------
    // Core content API
    // ------------------------------------------------------------------------

    pub async fn fetch_posts(&self, query: &PostQuery) -> Result<Vec<Post>, CmsError> {
        let url = format!("{}/posts?{}", self.config.api_base(), query.to_query_string());
        self.fetch_json(self.http.get(&url), &url).await
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        let url = format!(
            "{}/posts?slug={}",
            self.config.api_base(),
            urlencoding::encode(slug)
        );
        let posts: Vec<Post> = self.fetch_json(self.http.get(&url), &url).await?;
        Ok(posts.into_iter().next())
    }

    pub async fn fetch_media(&self, media_id: u64) -> Result<Media, CmsError> {
        let url = format!("{}/media/{}", self.config.api_base(), media_id);
        self.fetch_json(self.http.get(&url), &url).await
    }

    pub async fn fetch_pages(&self) -> Result<Vec<Page>, CmsError> {
        let url = format!("{}/pages", self.config.api_base());
        self.fetch_json(self.http.get(&url), &url).await
    }

    /// Posts matching `query`; empty on any failure
    pub async fn get_posts(&self, query: &PostQuery) -> Vec<Post> {
        self.fetch_posts(query).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching posts: {}", e);
            Vec::new()
        })
    }

    /// First post with `slug`, if any
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        self.fetch_post_by_slug(slug).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching post '{}': {}", slug, e);
            None
        })
    }

    /// Media record; id 0 means "no featured image" and is never requested
    pub async fn get_media(&self, media_id: u64) -> Option<Media> {
        if media_id == 0 {
            return None;
        }
        match self.fetch_media(media_id).await {
            Ok(media) => Some(media),
            Err(e) => {
                tracing::error!("Error fetching media {}: {}", media_id, e);
                None
            }
        }
    }

    pub async fn get_pages(&self) -> Vec<Page> {
        self.fetch_pages().await.unwrap_or_else(|e| {
            tracing::error!("Error fetching pages: {}", e);
            Vec::new()
        })
    }

    // ------------------------------------------------------------------------
    // Contact Form 7 API
    // ------------------------------------------------------------------------

    /// Raw form record (authenticated)
    pub async fn fetch_form_schema(&self, form_id: u64) -> Result<FormSchema, CmsError> {
        let creds = self.credentials()?;
        let url = format!("{}/{}", self.config.forms_base(), form_id);
        let request = self
            .http
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.password));
        self.fetch_json(request, &url).await
    }

    /// Every form on the CMS with fields parsed from its markup
    pub async fn get_contact_forms(&self) -> Vec<FormConfig> {
        match self.fetch_contact_forms().await {
            Ok(forms) => forms,
            Err(e) => {
                tracing::error!("Error fetching contact forms: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_contact_forms(&self) -> Result<Vec<FormConfig>, CmsError> {
        let creds = self.credentials()?;
        let url = self.config.forms_base();
        let request = self
            .http
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.password));
        let entries: Vec<FormListEntry> = self.fetch_json(request, &url).await?;

        Ok(entries
            .into_iter()
            .map(|entry| FormConfig {
                id: entry.id,
                title: entry.title,
                fields: parse_form_markup(&entry.form),
                form_html: Some(entry.form),
            })
            .collect())
    }

    /// Form configuration for server-rendered forms; `None` uses the default form
    pub async fn get_contact_form_config(&self, form_id: Option<u64>) -> Option<FormConfig> {
        let form_id = form_id.unwrap_or(self.config.default_form_id);
        match self.fetch_form_schema(form_id).await {
            Ok(schema) => Some(FormConfig {
                id: schema.id,
                title: schema.title.clone(),
                fields: fields_from_properties(&schema),
                form_html: Some(schema.form_content()),
            }),
            Err(e) => {
                tracing::error!("Error fetching contact form config {}: {}", form_id, e);
                None
            }
        }
    }

    /// Relay a submission as multipart form data
    ///
    /// The plugin's hidden fields are prepended so the CMS treats the request
    /// like one coming from its own rendered form.
    pub async fn submit_feedback(
        &self,
        form_id: u64,
        fields: &[(String, String)],
    ) -> Result<FeedbackResponse, CmsError> {
        let url = feedback_url(&self.config, form_id);

        let mut form = reqwest::multipart::Form::new()
            .text("_wpcf7", form_id.to_string())
            .text("_wpcf7_version", WPCF7_VERSION)
            .text("_wpcf7_locale", WPCF7_LOCALE)
            .text("_wpcf7_unit_tag", format!("wpcf7-f{}-o1", form_id));
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let mut request = self.http.post(&url).multipart(form);
        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await.map_err(|source| CmsError::Transport {
            url: url.clone(),
            source,
        })?;
        decode_body(response, &url).await
    }

    /// Unauthenticated url-encoded submission with user-facing messages
    pub async fn submit_urlencoded(&self, form_id: u64, fields: &[(String, String)]) -> SubmitOutcome {
        let url = feedback_url(&self.config, form_id);

        let result: Result<FeedbackResponse, CmsError> = async {
            let response = self
                .http
                .post(&url)
                .form(fields)
                .send()
                .await
                .map_err(|source| CmsError::Transport {
                    url: url.clone(),
                    source,
                })?;
            decode_body(response, &url).await
        }
        .await;

        match result {
            // This path only reports the plugin `message`, never `response`
            Ok(feedback) => FeedbackResponse {
                response: None,
                ..feedback
            }
            .into_outcome(),
            Err(e) => {
                tracing::error!("Error submitting form {}: {}", form_id, e);
                SubmitOutcome {
                    success: false,
                    message: MSG_CONNECTION.to_string(),
                }
            }
        }
    }

    /// Four-field legacy form, sent to the default form
    pub async fn submit_contact(&self, data: &ContactFormData) -> SubmitOutcome {
        let fields = vec![
            ("your-name".to_string(), data.name.clone()),
            ("your-email".to_string(), data.email.clone()),
            ("your-phone".to_string(), data.phone.clone().unwrap_or_default()),
            ("your-message".to_string(), data.message.clone()),
        ];
        self.submit_urlencoded(self.config.default_form_id, &fields).await
    }

    /// Send a request and decode a JSON body, failing on non-2xx
    async fn fetch_json<T>(&self, request: reqwest::RequestBuilder, url: &str) -> Result<T, CmsError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let response = request.send().await.map_err(|source| CmsError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        decode_body(response, url).await
    }
}

impl std::fmt::Debug for WordPressClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressClient")
            .field("wordpress_url", &self.config.wordpress_url)
            .finish()
    }
}

fn feedback_url(config: &SiteConfig, form_id: u64) -> String {
    format!("{}/{}/feedback", config.forms_base(), form_id)
}

async fn decode_body<T>(response: reqwest::Response, url: &str) -> Result<T, CmsError>
where
    T: DeserializeOwned,
{
    let text = response.text().await.map_err(|source| CmsError::Transport {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| CmsError::Decode {
        url: url.to_string(),
        source,
    })
}
