// Axum site server
//
// Purpose: HTML pages (home, blog) plus the JSON contact-form relay that
// proxies Contact Form 7 on the CMS

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use indexmap::IndexMap;

use crate::config::SiteConfig;
use crate::contact_form::public_fields;
use crate::page_cache::PageCache;
use crate::web::handlers::pages;
use crate::wordpress::WordPressClient;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub client: WordPressClient,
    pub pages: PageCache,
}

impl AppState {
    pub fn new(config: SiteConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing WordPress client for {}...", config.wordpress_url);
        if config.credentials.is_none() {
            tracing::warn!("WP_API_USERNAME/WP_API_PASSWORD not set; contact forms will be unavailable");
        }
        let client = WordPressClient::new(config)?;

        tracing::info!("Initializing Moka page cache...");
        let pages = PageCache::new(client.clone());

        Ok(Self { client, pages })
    }

    pub fn default_form_id(&self) -> u64 {
        self.client.default_form_id()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Pages (HTML)
        .route("/", get(pages::home_page))
        .route("/contatti", axum::routing::post(pages::submit_contact))
        .route("/blog", get(pages::blog_index))
        .route("/blog/:slug", get(pages::blog_post))

        // Contact form relay (JSON)
        .route("/api/contact-form", get(get_form_config).post(submit_form))

        .fallback(pages::not_found)

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/contact-form?id=14
///
/// Publishes the `your-*` fields of a form with site labels and placeholders.
async fn get_form_config(
    State(state): State<AppState>,
    Query(query): Query<FormIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let form_id = match query.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => state.default_form_id(),
        Some(raw) => raw.parse().map_err(|_| {
            tracing::error!("Error fetching form config: invalid form id {:?}", raw);
            AppError::FormConfig
        })?,
    };

    let schema = state.client.fetch_form_schema(form_id).await.map_err(|e| {
        tracing::error!("Error fetching form config: {}", e);
        AppError::FormConfig
    })?;

    Ok(Json(serde_json::json!({
        "id": schema.id,
        "title": schema.title,
        "fields": public_fields(&schema),
    })))
}

/// POST /api/contact-form
/// Body: { "formData": { "your-name": "..." }, "formId": 14 }
///
/// The body is parsed as JSON whatever its Content-Type; an unreadable body
/// gets the same generic error as a failed relay.
async fn submit_form(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let request: SubmitRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Error reading contact form payload: {}", e);
        AppError::Relay
    })?;

    let form_id = resolve_form_id(request.form_id, state.default_form_id()).ok_or_else(|| {
        tracing::error!("Error submitting form: invalid form id");
        AppError::Relay
    })?;
    let fields: Vec<(String, String)> = request
        .form_data
        .into_iter()
        .map(|(name, value)| (name, field_value(value)))
        .collect();

    tracing::debug!("Relaying {} fields to form {}", fields.len(), form_id);
    let feedback = state
        .client
        .submit_feedback(form_id, &fields)
        .await
        .map_err(|e| {
            tracing::error!("Error submitting form: {}", e);
            AppError::Relay
        })?;

    let outcome = feedback.into_outcome();
    if outcome.success {
        tracing::info!("Form {} submission delivered", form_id);
    }
    Ok(Json(serde_json::to_value(outcome).map_err(|_| AppError::Relay)?))
}

/// `formId` may be a number or a numeric string; missing or blank uses the default
fn resolve_form_id(param: Option<FormIdParam>, default: u64) -> Option<u64> {
    match param {
        None => Some(default),
        Some(FormIdParam::Number(id)) => Some(id),
        Some(FormIdParam::Text(raw)) => match raw.trim() {
            "" => Some(default),
            id => id.parse().ok(),
        },
    }
}

/// Form values arrive as JSON; non-strings are sent in their JSON text form
fn field_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct FormIdQuery {
    id: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct SubmitRequest {
    #[serde(rename = "formData", default)]
    form_data: IndexMap<String, serde_json::Value>,
    #[serde(rename = "formId", default)]
    form_id: Option<FormIdParam>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum FormIdParam {
    Number(u64),
    Text(String),
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    FormConfig,
    Relay,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::FormConfig => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Failed to fetch form configuration" }),
            ),
            AppError::Relay => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "success": false, "message": "Errore del server" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
