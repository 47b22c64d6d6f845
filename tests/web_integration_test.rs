use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use grocy_frame::config::{AppConfig, AuthConfig};
use grocy_frame::utils::validation::Validate;
use grocy_frame::web::{router, AppState};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use tower::ServiceExt;

fn app_for(server: &MockServer, auth: Option<AuthConfig>) -> Router {
    let mut config = AppConfig::default();
    config.grocy.url = server.base_url();
    config.grocy.api_key = "web-key".to_string();
    config.sync.settle_delay_ms = 0;
    config.sync.search_url_template = "https://shop.example.com/?q={query}".to_string();
    config.auth = auth;
    router(AppState::from_config(&config).unwrap())
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn mock_list(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stock/shopping_list");
            then.status(200)
                .json_body(serde_json::json!([{"id": 5, "product_id": 1, "amount": 3}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/objects/products/1");
            then.status(200)
                .json_body(serde_json::json!({"id": 1, "name": "Oat milk", "qu_id_purchase_unit": 2}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/objects/quantity_units/2");
            then.status(200).json_body(serde_json::json!({"id": 2, "name": "Carton"}));
        })
        .await;
}

// --- pages ---

#[tokio::test]
async fn healthz_is_always_open() {
    let server = MockServer::start_async().await;
    let app = app_for(&server, Some(AuthConfig::new("admin", "pw")));

    let resp = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
}

#[tokio::test]
async fn import_renders_enriched_list() {
    let server = MockServer::start_async().await;
    mock_list(&server).await;

    let resp = app_for(&server, None).oneshot(get("/import")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::X_FRAME_OPTIONS).is_none());
    let html = body_text(resp).await;
    assert!(html.contains("Oat milk"));
    assert!(html.contains("Carton"));
    assert!(html.contains(r#"value="5""#));
}

#[tokio::test]
async fn import_shows_warning_when_grocy_is_down() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stock/shopping_list");
            then.status(502);
        })
        .await;

    let resp = app_for(&server, None).oneshot(get("/import")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Could not load the shopping list"));
    assert!(html.contains("The shopping list is empty."));
}

// --- delete ---

#[tokio::test]
async fn delete_selected_redirects_with_summary() {
    let server = MockServer::start_async().await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/stock/shopping_list/5")
                .header("grocy-api-key", "web-key");
            then.status(204);
        })
        .await;

    let resp = app_for(&server, None)
        .oneshot(form_post("/delete", "id=5"))
        .await
        .unwrap();

    delete_mock.assert_async().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/import?notice=Deleted%201%20item%28s%29");
}

#[tokio::test]
async fn delete_without_selection_makes_no_calls() {
    let server = MockServer::start_async().await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE);
            then.status(204);
        })
        .await;

    let resp = app_for(&server, None)
        .oneshot(form_post("/delete", ""))
        .await
        .unwrap();

    delete_mock.assert_hits_async(0).await;
    assert_eq!(location(&resp), "/import?notice=Nothing%20selected");
}

#[tokio::test]
async fn delete_data_clears_everything() {
    let server = MockServer::start_async().await;
    mock_list(&server).await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/stock/shopping_list/5");
            then.status(204);
        })
        .await;

    let resp = app_for(&server, None).oneshot(get("/delete_data")).await.unwrap();

    delete_mock.assert_async().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/?notice="));
}

// --- search ---

#[tokio::test]
async fn search_without_query_redirects_to_list() {
    let server = MockServer::start_async().await;

    let resp = app_for(&server, None).oneshot(get("/search?q=")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/import");
}

#[tokio::test]
async fn search_renders_frame_and_list() {
    let server = MockServer::start_async().await;
    mock_list(&server).await;

    let resp = app_for(&server, None)
        .oneshot(get("/search?q=oat%20milk"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<iframe src="https://shop.example.com/?q=oat%20milk""#));
    assert!(html.contains("Carton"));
}

#[tokio::test]
async fn redirects_stay_under_ingress_prefix() {
    let server = MockServer::start_async().await;

    let request = Request::builder()
        .uri("/search")
        .header("X-Ingress-Path", "/api/hassio_ingress/tok3n")
        .body(Body::empty())
        .unwrap();
    let resp = app_for(&server, None).oneshot(request).await.unwrap();

    assert_eq!(location(&resp), "/api/hassio_ingress/tok3n/import");
}

// --- auth ---

#[tokio::test]
async fn delete_data_is_post_only_when_auth_is_configured() {
    let server = MockServer::start_async().await;
    mock_list(&server).await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE);
            then.status(204);
        })
        .await;
    let app = app_for(&server, Some(AuthConfig::new("admin", "pw")));

    let resp = app
        .clone()
        .oneshot(form_post("/login", "username=admin&password=pw"))
        .await
        .unwrap();
    let session = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .unwrap()
        .to_string();

    let cross_site_get = Request::builder()
        .uri("/delete_data")
        .header(header::COOKIE, session.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(cross_site_get).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    delete_mock.assert_hits_async(0).await;

    let form = Request::builder()
        .method("POST")
        .uri("/delete_data")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(form).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    delete_mock.assert_hits_async(1).await;
}

#[test]
fn unset_password_reference_is_refused_at_startup() {
    let config = AppConfig::from_toml_str(
        "[auth]\nusername = \"admin\"\npassword = \"${GROCY_FRAME_WEB_UNSET_PASSWORD}\"\n",
    )
    .unwrap();

    assert!(config.validate().is_err());
}

#[tokio::test]
async fn pages_require_login_when_auth_is_configured() {
    let server = MockServer::start_async().await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stock/shopping_list");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;

    let resp = app_for(&server, Some(AuthConfig::new("admin", "pw")))
        .oneshot(get("/import"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    list_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = MockServer::start_async().await;

    let resp = app_for(&server, Some(AuthConfig::new("admin", "pw")))
        .oneshot(form_post("/login", "username=admin&password=nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(resp).await.contains("Invalid username or password"));
}

#[tokio::test]
async fn login_session_unlocks_pages_until_logout() {
    let server = MockServer::start_async().await;
    mock_list(&server).await;
    let app = app_for(&server, Some(AuthConfig::new("admin", "pw")));

    let resp = app
        .clone()
        .oneshot(form_post("/login", "username=admin&password=pw"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("SameSite=None"));
    let session = set_cookie.split(';').next().unwrap().to_string();

    let authed = |uri: &str| {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, session.clone())
            .body(Body::empty())
            .unwrap()
    };

    let resp = app.clone().oneshot(authed("/import")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Oat milk"));

    let resp = app.clone().oneshot(authed("/logout")).await.unwrap();
    assert_eq!(location(&resp), "/login");

    let resp = app.oneshot(authed("/import")).await.unwrap();
    assert_eq!(location(&resp), "/login");
}
