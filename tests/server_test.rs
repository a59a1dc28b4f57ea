use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use promptify::{
    api::{AppState, STATE_COOKIE},
    completion::CompletionParams,
    server::{backend_router, login_router},
    spotify::auth::OAuthApp,
    types::LoginRedirect,
    utils,
};

const SECRET: &str = "cookie-secret";

fn state() -> Arc<AppState> {
    Arc::new(AppState {
        client: Client::new(),
        oauth: OAuthApp {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://127.0.0.1:5000/api/callback".to_string(),
            scope: "user-library-read streaming".to_string(),
            auth_url: "https://accounts.example.com/authorize".to_string(),
            token_url: "http://127.0.0.1:1/api/token".to_string(),
        },
        completion: CompletionParams {
            api_url: "http://127.0.0.1:1/v1".to_string(),
            api_key: "key".to_string(),
            model: "model".to_string(),
            temperature: 0.7,
            max_tokens: 256,
        },
        cookie_secret: SECRET.to_string(),
        frontend_url: "http://127.0.0.1:5173/".to_string(),
    })
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn location(response: &Response) -> Url {
    let value = response.headers()[header::LOCATION].to_str().unwrap();
    Url::parse(value).unwrap()
}

fn query(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_health() {
    let response = send(backend_router(state()), get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_login_sets_signed_state_and_redirects() {
    let response = send(backend_router(state()), get("/api/login")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = location(&response);
    assert_eq!(target.host_str(), Some("accounts.example.com"));
    assert_eq!(query(&target, "client_id").as_deref(), Some("client-id"));
    assert_eq!(query(&target, "response_type").as_deref(), Some("code"));
    assert_eq!(
        query(&target, "scope").as_deref(),
        Some("user-library-read streaming")
    );
    let state_param = query(&target, "state").unwrap();
    assert_eq!(state_param.len(), 15);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=300"));
    assert!(cookie.contains("HttpOnly"));
    let signed = utils::cookie_value(cookie, STATE_COOKIE).unwrap();
    assert_eq!(utils::unsign_cookie(&signed, SECRET), Some(state_param));
}

#[tokio::test]
async fn test_callback_without_cookie_is_rejected() {
    let response = send(
        backend_router(state()),
        get("/api/callback?code=abc&state=xyz"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, "Invalid State");
}

#[tokio::test]
async fn test_callback_with_mismatched_state_is_rejected() {
    let request = Request::builder()
        .uri("/api/callback?code=abc&state=other")
        .header(
            header::COOKIE,
            format!("{STATE_COOKIE}={}", utils::sign_cookie("expected", SECRET)),
        )
        .body(Body::empty())
        .unwrap();

    let response = send(backend_router(state()), request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_callback_with_forged_cookie_is_rejected() {
    let request = Request::builder()
        .uri("/api/callback?code=abc&state=expected")
        .header(
            header::COOKIE,
            format!("{STATE_COOKIE}={}", utils::sign_cookie("expected", "wrong")),
        )
        .body(Body::empty())
        .unwrap();

    let response = send(backend_router(state()), request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_callback_forwards_provider_error_to_frontend() {
    let request = Request::builder()
        .uri("/api/callback?error=access_denied&state=expected")
        .header(
            header::COOKIE,
            format!(
                "theme=dark; {STATE_COOKIE}={}",
                utils::sign_cookie("expected", SECRET)
            ),
        )
        .body(Body::empty())
        .unwrap();

    let response = send(backend_router(state()), request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert_eq!(target.port(), Some(5173));
    assert_eq!(query(&target, "error").as_deref(), Some("access_denied"));
    assert_eq!(query(&target, "access_token"), None);
}

#[tokio::test]
async fn test_callback_token_failure_redirects_with_error() {
    let request = Request::builder()
        .uri("/api/callback?code=abc&state=expected")
        .header(
            header::COOKIE,
            format!("{STATE_COOKIE}={}", utils::sign_cookie("expected", SECRET)),
        )
        .body(Body::empty())
        .unwrap();

    let response = send(backend_router(state()), request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert_eq!(query(&target, "error").as_deref(), Some("invalid_token"));
}

#[tokio::test]
async fn test_refresh_requires_token() {
    let response = send(backend_router(state()), get("/api/refresh_token")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completion_transport_failure_is_500() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/completion")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"prompt":"rainy sunday"}"#))
        .unwrap();

    let response = send(backend_router(state()), request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["error"].is_string());
}

#[test]
fn test_completion_request_uses_fixed_parameters() {
    let request = state().completion.request_for("rainy sunday");

    assert_eq!(request.prompt, "song list of rainy sunday");
    assert_eq!(request.max_tokens, 256);
    assert_eq!(request.top_p, 1.0);
    assert_eq!(request.frequency_penalty, 0.0);
    assert_eq!(request.presence_penalty, 0.0);
}

#[tokio::test]
async fn test_capture_stores_redirect() {
    let shared: Arc<Mutex<Option<LoginRedirect>>> = Arc::new(Mutex::new(None));
    let app = login_router("/", Arc::clone(&shared));

    let response = send(
        app,
        get("/?access_token=a1&refresh_token=r1&expires_in=3600"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let captured = shared.lock().await.clone().unwrap();
    assert_eq!(captured.access_token.as_deref(), Some("a1"));
    assert_eq!(captured.refresh_token.as_deref(), Some("r1"));
    assert_eq!(captured.expires_in.as_deref(), Some("3600"));
    assert_eq!(captured.error, None);
}

#[tokio::test]
async fn test_capture_ignores_empty_query() {
    let shared: Arc<Mutex<Option<LoginRedirect>>> = Arc::new(Mutex::new(None));
    let app = login_router("/", Arc::clone(&shared));

    let response = send(app, get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(shared.lock().await.is_none());
}
