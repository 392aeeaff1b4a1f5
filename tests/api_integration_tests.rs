// Site server integration tests
//
// Purpose: Drive the router end to end with a mocked WordPress behind it
// Run with: cargo test --test api_integration_tests

#[cfg(feature = "server")]
mod api_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use bakery_site::{create_router, AppState, SiteConfig};
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    // Helper: Router pointed at the mock CMS
    fn create_test_app(server: &MockServer) -> axum::Router {
        let config = SiteConfig::default()
            .with_wordpress_url(server.base_url())
            .with_credentials("admin", "secret");
        create_router(AppState::new(config).unwrap())
    }

    // Helper: Router without forms API credentials
    fn create_anonymous_app(server: &MockServer) -> axum::Router {
        let config = SiteConfig::default().with_wordpress_url(server.base_url());
        create_router(AppState::new(config).unwrap())
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec()
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON")
    }

    async fn html_response(response: axum::response::Response) -> String {
        String::from_utf8(body_bytes(response).await).expect("Body is not UTF-8")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_schema() -> Value {
        json!({
            "id": 14,
            "title": "Form richiedi maggiori informazioni",
            "properties": {
                "form": {
                    "content": "[text* your-name] [email* your-email] [textarea your-message] [submit \"Invia\"]",
                    "fields": [
                        {"basetype": "text", "type": "text*", "name": "your-name"},
                        {"basetype": "email", "type": "email*", "name": "your-email"},
                        {"basetype": "textarea", "type": "textarea", "name": "your-message"},
                        {"basetype": "acceptance", "type": "acceptance", "name": "privacy"},
                        {"basetype": "submit", "type": "submit", "name": ""}
                    ]
                }
            }
        })
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start_async().await;
        let app = create_test_app(&server);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Form configuration relay
    // =========================================================================

    #[tokio::test]
    async fn test_form_config_default_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14")
                    .header("authorization", "Basic YWRtaW46c2VjcmV0");
                then.status(200).json_body(form_schema());
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(get("/api/contact-form"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;

        let body = json_response(response).await;
        assert_eq!(body["id"], 14);
        assert_eq!(body["title"], "Form richiedi maggiori informazioni");

        let fields = body["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 3, "only your-* fields are published");
        assert_eq!(fields[0]["name"], "your-name");
        assert_eq!(fields[0]["label"], "Nome");
        assert_eq!(fields[0]["required"], true);
        assert_eq!(fields[0]["placeholder"], "Il tuo nome");
        assert_eq!(fields[1]["type"], "email");
        assert_eq!(fields[2]["type"], "textarea");
        assert_eq!(fields[2]["required"], false);
        assert_eq!(fields[2]["placeholder"], "Il tuo messaggio...");
    }

    #[tokio::test]
    async fn test_form_config_cms_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/contact-form-7/v1/contact-forms/99");
                then.status(404).json_body(json!({"code": "wpcf7_not_found"}));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(get("/api/contact-form?id=99"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_response(response).await;
        assert_eq!(body["error"], "Failed to fetch form configuration");
    }

    #[tokio::test]
    async fn test_form_config_without_credentials() {
        let server = MockServer::start_async().await;

        let response = create_anonymous_app(&server)
            .oneshot(get("/api/contact-form?id=14"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_response(response).await["error"],
            "Failed to fetch form configuration"
        );
    }

    #[tokio::test]
    async fn test_form_config_invalid_id() {
        let server = MockServer::start_async().await;

        let response = create_test_app(&server)
            .oneshot(get("/api/contact-form?id=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // =========================================================================
    // Section 3: Submission relay
    // =========================================================================

    #[tokio::test]
    async fn test_submit_mail_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback")
                    .header("authorization", "Basic YWRtaW46c2VjcmV0");
                then.status(200)
                    .json_body(json!({"status": "mail_sent", "message": "Thank you"}));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(post_json(
                "/api/contact-form",
                r#"{"formData": {"your-name": "Mario", "your-email": "mario@example.com"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;

        let body = json_response(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Messaggio inviato con successo!");
    }

    #[tokio::test]
    async fn test_submit_uses_requested_form() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/7/feedback");
                then.status(200).json_body(json!({"status": "mail_sent"}));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(post_json(
                "/api/contact-form",
                r#"{"formData": {"your-name": "Mario"}, "formId": 7}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_validation_failed_uses_response_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback");
                then.status(200).json_body(json!({
                    "status": "validation_failed",
                    "response": "Compila i campi obbligatori."
                }));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(post_json("/api/contact-form", r#"{"formData": {}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Compila i campi obbligatori.");
    }

    #[tokio::test]
    async fn test_submit_unparseable_cms_reply() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback");
                then.status(500).body("<html>Fatal error</html>");
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(post_json("/api/contact-form", r#"{"formData": {"your-name": "Mario"}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_response(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Errore del server");
    }

    #[tokio::test]
    async fn test_submit_malformed_json() {
        let server = MockServer::start_async().await;

        let response = create_test_app(&server)
            .oneshot(post_json("/api/contact-form", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Parser details never reach the visitor
        let body = json_response(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Errore del server");
    }

    #[tokio::test]
    async fn test_submit_ignores_content_type() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback");
                then.status(200).json_body(json!({"status": "mail_sent"}));
            })
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/contact-form")
            .header("content-type", "text/plain;charset=UTF-8")
            .body(Body::from(r#"{"formData": {"your-name": "Mario"}, "formId": "14"}"#))
            .unwrap();

        let response = create_test_app(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
        assert_eq!(json_response(response).await["success"], true);
    }

    // =========================================================================
    // Section 4: Blog pages
    // =========================================================================

    #[tokio::test]
    async fn test_blog_index_renders_posts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/wp/v2/posts")
                    .query_param("per_page", "10");
                then.status(200).json_body(json!([
                    {
                        "id": 1,
                        "date": "2025-03-05T09:00:00",
                        "slug": "pizza-in-teglia",
                        "title": {"rendered": "Pizza &amp; teglia"},
                        "content": {"rendered": "<p>...</p>"},
                        "excerpt": {"rendered": "<p>La nostra teglia romana</p>"},
                        "featured_media": 31
                    }
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/media/31");
                then.status(200).json_body(json!({
                    "id": 31,
                    "source_url": "https://cms/wp-content/uploads/teglia.jpg",
                    "alt_text": ""
                }));
            })
            .await;

        let response = create_test_app(&server).oneshot(get("/blog")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = html_response(response).await;
        assert!(html.contains("/blog/pizza-in-teglia"));
        assert!(html.contains("5 marzo 2025"));
        assert!(html.contains("La nostra teglia romana..."));
        assert!(html.contains("teglia.jpg"));
        // Alt text falls back to the stripped title (escaped by the template)
        assert!(html.contains(r#"alt="Pizza &amp; teglia""#));
    }

    #[tokio::test]
    async fn test_blog_index_cms_down() {
        let server = MockServer::start_async().await;

        let response = create_test_app(&server).oneshot(get("/blog")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(html_response(response)
            .await
            .contains("Non ci sono ancora articoli pubblicati."));
    }

    #[tokio::test]
    async fn test_blog_post_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/wp/v2/posts")
                    .query_param("slug", "lievito-madre");
                then.status(200).json_body(json!([
                    {
                        "id": 4,
                        "date": "2024-11-20T10:00:00",
                        "slug": "lievito-madre",
                        "title": {"rendered": "Il lievito madre"},
                        "content": {"rendered": "<h2>Rinfresco</h2><p>Ogni giorno.</p>"},
                        "excerpt": {"rendered": ""},
                        "featured_media": 0
                    }
                ]));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(get("/blog/lievito-madre"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = html_response(response).await;
        assert!(html.contains("<h1>Il lievito madre</h1>"));
        assert!(html.contains("<h2>Rinfresco</h2><p>Ogni giorno.</p>"));
        assert!(html.contains("20 novembre 2024"));
    }

    #[tokio::test]
    async fn test_blog_post_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/posts");
                then.status(200).json_body(json!([]));
            })
            .await;

        let response = create_test_app(&server)
            .oneshot(get("/blog/non-esiste"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(html_response(response).await.contains("Post non trovato"));
    }

    #[tokio::test]
    async fn test_blog_index_served_from_cache() {
        let server = MockServer::start_async().await;
        let posts = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/posts");
                then.status(200).json_body(json!([
                    {
                        "id": 1,
                        "date": "2025-03-05T09:00:00",
                        "slug": "focaccia",
                        "title": {"rendered": "Focaccia"},
                        "content": {"rendered": ""},
                        "excerpt": {"rendered": "Soffice"},
                        "featured_media": 31
                    }
                ]));
            })
            .await;
        let media = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/media/31");
                then.status(200).json_body(json!({
                    "id": 31,
                    "source_url": "https://cms/focaccia.jpg",
                    "alt_text": "Focaccia"
                }));
            })
            .await;

        let app = create_test_app(&server);
        for _ in 0..3 {
            let response = app.clone().oneshot(get("/blog")).await.unwrap();
            assert!(html_response(response).await.contains("/blog/focaccia"));
        }

        posts.assert_calls_async(1).await;
        media.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_blog_index_retries_after_cms_error() {
        let server = MockServer::start_async().await;
        let mut failing = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/posts");
                then.status(500);
            })
            .await;

        let app = create_test_app(&server);
        let response = app.clone().oneshot(get("/blog")).await.unwrap();
        assert!(html_response(response)
            .await
            .contains("Non ci sono ancora articoli pubblicati."));
        failing.assert_calls_async(1).await;
        failing.delete_async().await;

        let recovered = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/posts");
                then.status(200).json_body(json!([
                    {
                        "id": 2,
                        "date": "2025-04-01T09:00:00",
                        "slug": "pane-cafone",
                        "title": {"rendered": "Pane cafone"},
                        "content": {"rendered": ""},
                        "excerpt": {"rendered": ""},
                        "featured_media": 0
                    }
                ]));
            })
            .await;

        let response = app.oneshot(get("/blog")).await.unwrap();
        assert!(html_response(response).await.contains("/blog/pane-cafone"));
        recovered.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_blog_post_cached_including_missing_slug() {
        let server = MockServer::start_async().await;
        let found = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/wp/v2/posts")
                    .query_param("slug", "lievito-madre");
                then.status(200).json_body(json!([
                    {
                        "id": 4,
                        "date": "2024-11-20T10:00:00",
                        "slug": "lievito-madre",
                        "title": {"rendered": "Il lievito madre"},
                        "content": {"rendered": "<p>Rinfresco</p>"},
                        "excerpt": {"rendered": ""},
                        "featured_media": 0
                    }
                ]));
            })
            .await;
        let missing = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/wp/v2/posts")
                    .query_param("slug", "non-esiste");
                then.status(200).json_body(json!([]));
            })
            .await;

        let app = create_test_app(&server);
        for _ in 0..2 {
            let response = app.clone().oneshot(get("/blog/lievito-madre")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let response = app.clone().oneshot(get("/blog/non-esiste")).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        found.assert_calls_async(1).await;
        missing.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = MockServer::start_async().await;
        let response = create_test_app(&server)
            .oneshot(get("/chi-siamo"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // Section 5: Home page and HTML contact form
    // =========================================================================

    #[tokio::test]
    async fn test_home_renders_dynamic_form() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14");
                then.status(200).json_body(form_schema());
            })
            .await;

        let response = create_test_app(&server).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = html_response(response).await;
        assert!(html.contains(r#"action="/contatti""#));
        assert!(html.contains(r#"name="your-email""#));
        assert!(html.contains(r#"placeholder="la-tua-email@esempio.com""#));
        assert!(html.contains(r#"name="privacy""#));
        assert!(!html.contains(r#"type="submit" name"#));
    }

    #[tokio::test]
    async fn test_home_without_form_config() {
        let server = MockServer::start_async().await;

        let response = create_anonymous_app(&server).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(html_response(response)
            .await
            .contains("Il modulo di contatto non è al momento disponibile"));
    }

    #[tokio::test]
    async fn test_htmx_submission_returns_fragment() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback");
                then.status(200).json_body(json!({"status": "mail_sent"}));
            })
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/contatti")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("hx-request", "true")
            .body(Body::from("your-name=Mario&your-email=mario%40example.com"))
            .unwrap();

        let response = create_test_app(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = html_response(response).await;
        assert!(html.contains("Messaggio inviato con successo!"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_plain_submission_keeps_values_on_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14");
                then.status(200).json_body(form_schema());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/wp-json/contact-form-7/v1/contact-forms/14/feedback");
                then.status(200).json_body(json!({
                    "status": "validation_failed",
                    "message": "Uno o più campi contengono errori."
                }));
            })
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/contatti")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("your-name=Mario&your-email=sbagliata"))
            .unwrap();

        let response = create_test_app(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = html_response(response).await;
        assert!(html.contains("<html"));
        assert!(html.contains("Uno o più campi contengono errori."));
        assert!(html.contains(r#"value="sbagliata""#));
    }
}
