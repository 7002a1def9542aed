//! API routes

mod accounts;
mod auth;
mod balance;
mod health;
mod types;

use axum::Router;

use crate::state::AppState;

pub use auth::RequireSession;

/// Create the main router
///
/// A deployment may mount every route under a shared prefix (for example
/// `/api`); an empty prefix serves them at the root.
pub fn create_router(state: AppState, path_prefix: &str) -> Router {
    let api = Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(auth::routes())
        .merge(balance::routes())
        .with_state(state);

    if path_prefix.is_empty() {
        api
    } else {
        Router::new().nest(path_prefix, api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use teller_auth::{CookiePolicy, JwtManager};
    use teller_db::Database;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-signing-secret";

    async fn test_state(dir: &tempfile::TempDir, token_ttl_secs: i64) -> AppState {
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        let jwt = Arc::new(JwtManager::new(TEST_SECRET, token_ttl_secs));
        AppState::new(db, jwt, CookiePolicy::SameOrigin, 100_000)
    }

    async fn test_app(dir: &tempfile::TempDir) -> Router {
        create_router(test_state(dir, 3600).await, "")
    }

    async fn send_json(app: &Router, path: &str, body: Value) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_with_cookie(
        app: &Router,
        path: &str,
        cookie: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(uid: &str, uname: &str) -> Value {
        json!({
            "uid": uid,
            "uname": uname,
            "password": "pw1234",
            "email": "a@x.com",
            "phone": "123"
        })
    }

    #[tokio::test]
    async fn health_is_open() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        let response = get_with_cookie(&app, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn register_login_balance_flow() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        let response = send_json(&app, "/register", register_body("u1", "alice")).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Same uid again, other fields changed
        let mut body = register_body("u1", "alice2");
        body["email"] = json!("b@x.com");
        let response = send_json(&app, "/register", body).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Same username, fresh uid
        let response = send_json(&app, "/register", register_body("u2", "alice")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send_json(&app, "/login", json!({"uname": "alice", "password": "pw1234"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("auth_token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=3600"));

        let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
        let response = get_with_cookie(&app, "/balance", Some(&cookie_pair)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["balance"], 100_000);

        let response = get_with_cookie(&app, "/balance", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Missing auth token");
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        // Missing phone
        let response = send_json(
            &app,
            "/register",
            json!({"uid": "u1", "uname": "alice", "password": "pw", "email": "a@x.com"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Empty field counts as missing
        let mut body = register_body("u1", "alice");
        body["password"] = json!("");
        let response = send_json(&app, "/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Any role other than customer is rejected
        let mut body = register_body("u1", "alice");
        body["role"] = json!("admin");
        let response = send_json(&app, "/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Only role customer is allowed");

        // An explicit customer role is fine
        let mut body = register_body("u1", "alice");
        body["role"] = json!("customer");
        let response = send_json(&app, "/register", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn login_failures_share_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        send_json(&app, "/register", register_body("u1", "bob")).await;

        let response = send_json(&app, "/login", json!({"uname": "bob", "password": "wrong"})).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let wrong_password = read_json(response).await;

        let response = send_json(&app, "/login", json!({"uname": "nobody", "password": "wrong"})).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let unknown_user = read_json(response).await;

        assert_eq!(wrong_password, unknown_user);

        let response = send_json(&app, "/login", json!({"uname": "bob"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn balance_rejects_bad_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        send_json(&app, "/register", register_body("u1", "alice")).await;

        // Garbage token
        let response = get_with_cookie(&app, "/balance", Some("auth_token=garbage")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Invalid or expired token");

        // Token signed with a different secret
        let forged = JwtManager::new("other-secret", 3600);
        let (token, _) = forged.issue_token("alice", "customer").unwrap();
        let cookie = format!("auth_token={}", token);
        let response = get_with_cookie(&app, "/balance", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // Tokens expire the instant they are issued
        let app = create_router(test_state(&dir, 0).await, "");

        send_json(&app, "/register", register_body("u1", "alice")).await;
        let response = send_json(&app, "/login", json!({"uname": "alice", "password": "pw1234"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie_pair = set_cookie.split(';').next().unwrap().to_string();

        let response = get_with_cookie(&app, "/balance", Some(&cookie_pair)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn routes_honor_path_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(test_state(&dir, 3600).await, "/api");

        let response = send_json(&app, "/api/register", register_body("u1", "alice")).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send_json(&app, "/register", register_body("u2", "bob")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_with_cookie(&app, "/api/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
