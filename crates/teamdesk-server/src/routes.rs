//! Router assembly.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health));

    // Public form intake and login
    let public_routes = Router::new()
        .route("/api/employees", post(handlers::employees::submit_employee))
        .route("/api/admin/login", post(handlers::admin::login));

    // Admin routes (bearer token required)
    let admin_routes = Router::new()
        .route("/api/admin/me", get(handlers::admin::me))
        .route("/api/admin/entries", get(handlers::admin::entries))
        .route("/api/admin/submissions", get(handlers::admin::submissions))
        .route(
            "/api/admin/submissions/{id}/verify",
            post(handlers::admin::verify_submission),
        )
        .route(
            "/api/admin/submissions/{id}",
            delete(handlers::admin::reject_submission),
        )
        .route(
            "/api/admin/download-excel",
            get(handlers::export::download_excel),
        )
        .route("/api/admin/download-csv", get(handlers::export::download_csv))
        .route_layer(middleware::from_fn_with_state(
            state.signer.clone(),
            require_admin,
        ));

    // Admin pages and everything else come from the static directory
    let static_dir = state.config.static_dir.clone();
    let page_routes = Router::new()
        .route_service(
            "/admin/login",
            ServeFile::new(static_dir.join("admin-login.html")),
        )
        .route_service(
            "/admin/dashboard",
            ServeFile::new(static_dir.join("admin.html")),
        );

    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .merge(health_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
        .merge(page_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, TokenSigner};
    use crate::config::AppConfig;
    use crate::store::{AdminUser, SheetStore, SubmissionStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        _dir: TempDir,
        router: Router,
    }

    impl TestApp {
        async fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = SheetStore::open(dir.path().join("data")).await.unwrap();
            store
                .init(&AdminUser {
                    username: "admin".into(),
                    password_hash: hash_password("admin123"),
                })
                .await
                .unwrap();

            let static_dir = dir.path().join("public");
            std::fs::create_dir_all(&static_dir).unwrap();
            std::fs::write(static_dir.join("admin.html"), "<h1>dashboard</h1>").unwrap();
            std::fs::write(static_dir.join("index.html"), "<h1>form</h1>").unwrap();

            let config = AppConfig {
                static_dir,
                body_limit_bytes: 64 * 1024,
                ..AppConfig::default()
            };
            let state = AppState::new(
                Arc::new(store),
                TokenSigner::new("test-secret", 3600),
                config,
            );

            Self {
                _dir: dir,
                router: build_router(state),
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn json(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {}", token));
            }
            let body = match body {
                Some(value) => {
                    builder = builder.header("content-type", "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };

            let response = self.send(builder.body(body).unwrap()).await;
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn token(&self) -> String {
            let (status, body) = self
                .json(
                    "POST",
                    "/api/admin/login",
                    None,
                    Some(json!({ "username": "admin", "password": "admin123" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            body["token"].as_str().unwrap().to_string()
        }

        async fn submit(&self, first_name: &str) -> i64 {
            let (status, body) = self
                .json(
                    "POST",
                    "/api/employees",
                    None,
                    Some(json!({
                        "personal": { "firstName": first_name, "contactNumber": "9876543210" },
                        "company": { "department": "Sales" },
                        "education": [{ "level": "Graduate" }, { "level": "Diploma" }]
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["submissionId"].as_i64().unwrap()
        }
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new().await;

        let (status, body) = app.json("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, body) = app.json("GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["database"], "connected");
        assert_eq!(body["storage"], "spreadsheet");
    }

    #[tokio::test]
    async fn test_submit_employee() {
        let app = TestApp::new().await;

        let (status, body) = app
            .json(
                "POST",
                "/api/employees",
                None,
                Some(json!({ "personal": { "firstName": "Asha" } })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing required employee details");

        let (status, _) = app.json("POST", "/api/employees", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(app.submit("Asha").await, 1);
        assert_eq!(app.submit("Ravi").await, 2);
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let app = TestApp::new().await;

        for uri in [
            "/api/admin/me",
            "/api/admin/entries",
            "/api/admin/submissions",
            "/api/admin/download-excel",
            "/api/admin/download-csv",
        ] {
            let (status, body) = app.json("GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["message"], "Unauthorized");
        }

        let (status, _) = app
            .json("GET", "/api/admin/me", Some("forged.token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login() {
        let app = TestApp::new().await;

        let (status, body) = app
            .json(
                "POST",
                "/api/admin/login",
                None,
                Some(json!({ "username": "admin", "password": "nope" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid username or password");

        let token = app.token().await;
        let (status, body) = app.json("GET", "/api/admin/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["admin"], json!({ "username": "admin", "role": "admin" }));
    }

    #[tokio::test]
    async fn test_entries_and_submissions() {
        let app = TestApp::new().await;
        let token = app.token().await;
        app.submit("Asha").await;

        let (status, body) = app
            .json("GET", "/api/admin/entries", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scope"], "pending");
        assert_eq!(body["totalRows"], 2);
        assert_eq!(body["headers"].as_array().unwrap().len(), 52);
        assert_eq!(body["rows"][0]["First Name"], "Asha");
        assert_eq!(body["rows"][1]["Education Level"], "Diploma");

        let (status, body) = app
            .json("GET", "/api/admin/submissions?scope=bogus", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scope"], "pending");
        assert_eq!(body["totalRows"], 1);
        assert_eq!(body["rows"][0]["fullName"], "Asha");
        assert_eq!(body["rows"][0]["department"], "Sales");
        assert_eq!(body["rows"][0]["originalSubmissionId"], 1);
    }

    #[tokio::test]
    async fn test_verify_and_reject() {
        let app = TestApp::new().await;
        let token = app.token().await;
        let first = app.submit("Asha").await;
        let second = app.submit("Ravi").await;

        let (status, body) = app
            .json("POST", "/api/admin/submissions/abc/verify", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid submission id");

        let uri = format!("/api/admin/submissions/{}/verify", first);
        let (status, body) = app.json("POST", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Reviewer name is required");

        let review = json!({ "reviewerName": " Meera " });
        let (status, _) = app
            .json("POST", &uri, Some(&token), Some(review.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .json("POST", &uri, Some(&token), Some(review.clone()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Submission not found or already processed");

        let (_, body) = app
            .json("GET", "/api/admin/submissions?scope=verified", Some(&token), None)
            .await;
        assert_eq!(body["rows"][0]["originalSubmissionId"], first);
        assert_eq!(body["rows"][0]["verifiedBy"], "Meera");

        let uri = format!("/api/admin/submissions/{}", second);
        let (status, body) = app
            .json("DELETE", &uri, Some(&token), Some(review))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rejectedBy"], "Meera");

        let (_, body) = app
            .json("GET", "/api/admin/submissions", Some(&token), None)
            .await;
        assert_eq!(body["totalRows"], 0);
    }

    #[tokio::test]
    async fn test_downloads() {
        let app = TestApp::new().await;
        let token = app.token().await;
        app.submit("Asha").await;

        let request = Request::builder()
            .uri("/api/admin/download-csv")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"employee_data.csv\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"Salutation,First Name"));

        let request = Request::builder()
            .uri("/api/admin/download-excel?scope=verified")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            crate::sheet::workbook::CONTENT_TYPE
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"verified_employee_data.xlsx\""
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/admin/entries")
            .header("origin", "http://example.com")
            .header("access-control-request-method", "GET")
            .header("access-control-request-headers", "authorization")
            .body(Body::empty())
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_static_pages() {
        let app = TestApp::new().await;

        let request = Request::builder()
            .uri("/admin/dashboard")
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>dashboard</h1>");

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/admin/login")
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let app = TestApp::new().await;
        let padding = "x".repeat(128 * 1024);
        let (status, body) = app
            .json(
                "POST",
                "/api/employees",
                None,
                Some(json!({ "personal": { "firstName": padding, "contactNumber": "9876543210" } })),
            )
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Request body too large");
    }
}
