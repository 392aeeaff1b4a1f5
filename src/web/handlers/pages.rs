// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_htmx::HxRequest;
use futures::future::join_all;

use crate::api_server::AppState;
use crate::contact_form::{FieldKind, FormConfig, FormField};
use crate::utils::{excerpt, format_date, strip_html};
use crate::wordpress::client::MSG_CONNECTION;
use crate::wordpress::{Post, PostQuery, SubmitOutcome};

const SITE_NAME: &str = "Fattore F Bakery";
const BLOG_PAGE_SIZE: u32 = 10;
const EXCERPT_CHARS: usize = 150;

fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template error: {}", e);
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// View models
// ============================================================================

/// Form field as the template renders it
pub struct FieldView {
    pub name: String,
    pub kind: &'static str,
    pub label: String,
    pub required: bool,
    pub placeholder: String,
    pub value: String,
    pub is_textarea: bool,
}

impl FieldView {
    fn from_field(field: &FormField, value: &str) -> Self {
        // Option lists are not part of the field model; those render as text
        let kind = match field.kind {
            FieldKind::Select | FieldKind::Checkbox | FieldKind::Radio => FieldKind::Text,
            kind => kind,
        };
        Self {
            name: field.name.clone(),
            kind: kind.as_str(),
            label: field.label.clone(),
            required: field.required,
            placeholder: field.placeholder.clone().unwrap_or_default(),
            value: value.to_string(),
            is_textarea: field.kind == FieldKind::Textarea,
        }
    }
}

/// Blog listing card
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub has_image: bool,
    pub image_url: String,
    pub image_alt: String,
}

/// Featured image resolved from the media endpoint
struct FeaturedImage {
    url: String,
    alt: String,
}

async fn featured_image(state: &AppState, post: &Post) -> Option<FeaturedImage> {
    let media = state.pages.media(post.featured_media).await?;
    let alt = if media.alt_text.is_empty() {
        strip_html(&post.title.rendered)
    } else {
        media.alt_text.clone()
    };
    Some(FeaturedImage {
        url: media.source_url.clone(),
        alt,
    })
}

fn value_of<'a>(values: &'a [(String, String)], name: &str) -> &'a str {
    values
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or_default()
}

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub has_form: bool,
    pub form_id: u64,
    pub form_title: String,
    pub fields: Vec<FieldView>,
    pub has_status: bool,
    pub status_success: bool,
    pub status_message: String,
}

impl HomeTemplate {
    fn new(form: Option<&FormConfig>, values: &[(String, String)], status: Option<&SubmitOutcome>) -> Self {
        Self {
            title: format!("{} - Prodotti Lievitati per Ristorazione", SITE_NAME),
            has_form: form.is_some(),
            form_id: form.map(|f| f.id).unwrap_or_default(),
            form_title: form.map(|f| f.title.clone()).unwrap_or_default(),
            fields: form
                .map(|f| {
                    f.fields
                        .iter()
                        .map(|field| FieldView::from_field(field, value_of(values, &field.name)))
                        .collect()
                })
                .unwrap_or_default(),
            has_status: status.is_some(),
            status_success: status.map(|s| s.success).unwrap_or_default(),
            status_message: status.map(|s| s.message.clone()).unwrap_or_default(),
        }
    }
}

pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let form = state.pages.form_config(state.default_form_id()).await;
    render(&HomeTemplate::new(form.as_deref(), &[], None))
}

// ============================================================================
// Contact form submission (plain POST or HTMX)
// ============================================================================

#[derive(Template)]
#[template(path = "partials/form_status.html")]
pub struct FormStatusTemplate {
    pub status_success: bool,
    pub status_message: String,
}

/// POST /contatti
///
/// HTMX requests get the status fragment only; plain form posts get the home
/// page back, with the values kept when delivery failed.
pub async fn submit_contact(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let form_id = state.default_form_id();
    let fields: Vec<(String, String)> = fields
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let outcome = match state.client.submit_feedback(form_id, &fields).await {
        Ok(feedback) => feedback.into_outcome(),
        Err(e) => {
            tracing::error!("Error submitting contact form: {}", e);
            SubmitOutcome {
                success: false,
                message: MSG_CONNECTION.to_string(),
            }
        }
    };

    if is_htmx {
        return render(&FormStatusTemplate {
            status_success: outcome.success,
            status_message: outcome.message,
        })
        .into_response();
    }

    let form = state.pages.form_config(form_id).await;
    let kept: &[(String, String)] = if outcome.success { &[] } else { &fields };
    render(&HomeTemplate::new(form.as_deref(), kept, Some(&outcome))).into_response()
}

// ============================================================================
// Blog
// ============================================================================

#[derive(Template)]
#[template(path = "pages/blog.html")]
pub struct BlogTemplate {
    pub title: String,
    pub posts: Vec<PostCard>,
}

pub async fn blog_index(State(state): State<AppState>) -> impl IntoResponse {
    let posts = state.pages.posts(&PostQuery::latest(BLOG_PAGE_SIZE)).await;

    let images = join_all(posts.iter().map(|post| featured_image(&state, post))).await;

    let cards = posts
        .iter()
        .zip(images)
        .map(|(post, image)| PostCard {
            slug: post.slug.clone(),
            title: strip_html(&post.title.rendered),
            date: format_date(&post.date),
            excerpt: excerpt(&post.excerpt.rendered, EXCERPT_CHARS),
            has_image: image.is_some(),
            image_url: image.as_ref().map(|i| i.url.clone()).unwrap_or_default(),
            image_alt: image.map(|i| i.alt).unwrap_or_default(),
        })
        .collect();

    render(&BlogTemplate {
        title: format!("Blog {} - Ricette, Consigli e Segreti della Panificazione", SITE_NAME),
        posts: cards,
    })
}

#[derive(Template)]
#[template(path = "pages/post.html")]
pub struct PostTemplate {
    pub title: String,
    pub heading: String,
    pub date: String,
    pub content_html: String,
    pub has_image: bool,
    pub image_url: String,
    pub image_alt: String,
}

pub async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(post) = state.pages.post_by_slug(&slug).await else {
        tracing::debug!("No post for slug '{}'", slug);
        return not_found_page("Post non trovato");
    };

    let heading = strip_html(&post.title.rendered);
    let image = featured_image(&state, &post).await;

    render(&PostTemplate {
        title: format!("{} | Blog {}", heading, SITE_NAME),
        heading,
        date: format_date(&post.date),
        content_html: post.content.rendered.clone(),
        has_image: image.is_some(),
        image_url: image.as_ref().map(|i| i.url.clone()).unwrap_or_default(),
        image_alt: image.map(|i| i.alt).unwrap_or_default(),
    })
    .into_response()
}

// ============================================================================
// Not found
// ============================================================================

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub message: String,
}

fn not_found_page(message: &str) -> Response {
    let template = NotFoundTemplate {
        title: format!("{} | {}", message, SITE_NAME),
        message: message.to_string(),
    };
    (StatusCode::NOT_FOUND, render(&template)).into_response()
}

pub async fn not_found() -> Response {
    not_found_page("Pagina non trovata")
}
