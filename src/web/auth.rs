//! Optional session login in front of the shopping-list pages.
//!
//! Sessions are random tokens kept in memory and handed out as a cookie that
//! still works inside a cross-site iframe (`SameSite=None; Secure`). They
//! expire after `auth.session_ttl_hours` and do not survive a restart.

use crate::config::AuthConfig;
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use cookie::{Cookie, SameSite};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::web::{location, AppState};

#[derive(Debug, Clone)]
pub struct SessionAuth {
    config: Arc<AuthConfig>,
    /// token -> expiry
    sessions: Arc<RwLock<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl SessionAuth {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            ttl: config.session_ttl(),
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Constant-time check, both fields are always compared.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let username_ok = username.as_bytes().ct_eq(self.config.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.config.password.as_bytes());
        (username_ok & password_ok).into()
    }

    /// Start a session for valid credentials and return its token.
    pub async fn login(&self, username: &str, password: &str) -> Option<String> {
        if !self.check_credentials(username, password) {
            tracing::warn!("Rejected login attempt for user '{}'", username);
            return None;
        }

        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expires_at| *expires_at > now);
        if sessions.len() < before {
            tracing::debug!("Evicted {} expired session(s)", before - sessions.len());
        }
        sessions.insert(token.clone(), now + self.ttl);
        drop(sessions);

        tracing::info!("User '{}' logged in", username);
        Some(token)
    }

    pub async fn logout(&self, headers: &HeaderMap) {
        if let Some(token) = self.session_token(headers) {
            self.sessions.write().await.remove(&token);
        }
    }

    pub async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        match self.session_token(headers) {
            Some(token) => self
                .sessions
                .read()
                .await
                .get(&token)
                .is_some_and(|expires_at| *expires_at > Instant::now()),
            None => false,
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(|cookie| cookie.ok())
            .find(|cookie| cookie.name() == self.cookie_name())
            .map(|cookie| cookie.value().to_string())
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .max_age(cookie::time::Duration::seconds(self.ttl.as_secs() as i64))
            .build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}

/// Route guard: lets the request through only with a live session cookie.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(auth) = &state.auth else {
        return next.run(request).await;
    };

    if auth.is_authenticated(request.headers()).await {
        return next.run(request).await;
    }

    tracing::debug!("Unauthenticated request to {}, redirecting to login", request.uri());
    Redirect::to(&location(&state, request.headers(), "/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth() -> SessionAuth {
        SessionAuth::new(AuthConfig::new("admin", "hunter2"))
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_login_and_session_lookup() {
        let auth = auth();
        assert!(auth.login("admin", "wrong").await.is_none());

        let token = auth.login("admin", "hunter2").await.unwrap();
        let headers = headers_with_cookie(&format!("theme=dark; grocy_frame_session={}", token));

        assert!(auth.is_authenticated(&headers).await);
        assert!(!auth.is_authenticated(&HeaderMap::new()).await);
        assert!(!auth.is_authenticated(&headers_with_cookie("grocy_frame_session=forged")).await);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let auth = auth();
        let token = auth.login("admin", "hunter2").await.unwrap();
        let headers = headers_with_cookie(&format!("grocy_frame_session={}", token));

        auth.logout(&headers).await;

        assert!(!auth.is_authenticated(&headers).await);
        assert_eq!(auth.active_sessions().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_expire_and_are_evicted() {
        let mut config = AuthConfig::new("admin", "hunter2");
        config.session_ttl_hours = 1;
        let auth = SessionAuth::new(config);

        let old = auth.login("admin", "hunter2").await.unwrap();
        let old_headers = headers_with_cookie(&format!("grocy_frame_session={}", old));
        assert!(auth.is_authenticated(&old_headers).await);

        tokio::time::advance(Duration::from_secs(3601)).await;
        assert!(!auth.is_authenticated(&old_headers).await);

        auth.login("admin", "hunter2").await.unwrap();
        assert_eq!(auth.active_sessions().await, 1);
    }

    #[test]
    fn test_credentials_must_match_exactly() {
        let auth = auth();
        assert!(auth.check_credentials("admin", "hunter2"));
        assert!(!auth.check_credentials("admin", "hunter"));
        assert!(!auth.check_credentials("admin", "hunter22"));
        assert!(!auth.check_credentials("Admin", "hunter2"));
        assert!(!auth.check_credentials("", ""));
    }

    #[test]
    fn test_session_cookie_works_in_iframes() {
        let cookie = auth().session_cookie("abc".to_string()).to_string();
        assert!(cookie.starts_with("grocy_frame_session=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_removal_cookie_expires() {
        let cookie = auth().removal_cookie().to_string();
        assert!(cookie.starts_with("grocy_frame_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
