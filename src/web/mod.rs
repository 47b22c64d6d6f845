//! HTTP front end: composes `ShoppingListSync` with the optional login
//! collaborator and serves the HTML pages.

pub mod auth;
pub mod handlers;
pub mod render;

use std::sync::Arc;

use axum::http::header::X_FRAME_OPTIONS;
use axum::http::HeaderMap;
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::adapters::GrocyClient;
use crate::config::AppConfig;
use crate::core::ShoppingListSync;
use crate::utils::error::{AppError, Result};

pub use auth::SessionAuth;

/// Set by the Home Assistant ingress proxy to the public path prefix.
pub const INGRESS_PATH_HEADER: &str = "x-ingress-path";

#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<ShoppingListSync<GrocyClient>>,
    pub auth: Option<SessionAuth>,
    pub trust_forwarded_headers: bool,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = GrocyClient::new(&config.grocy)?;
        tracing::info!("Using Grocy API at {}", client.base_url());

        Ok(Self {
            sync: Arc::new(ShoppingListSync::new(client, &config.sync)?),
            auth: config.auth.clone().map(SessionAuth::new),
            trust_forwarded_headers: config.server.trust_forwarded_headers,
        })
    }
}

/// Redirect target for `path`, kept under the ingress prefix when the
/// forwarded headers are trusted.
pub fn location(state: &AppState, headers: &HeaderMap, path: &str) -> String {
    if !state.trust_forwarded_headers {
        return path.to_string();
    }

    match headers
        .get(INGRESS_PATH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|prefix| prefix.trim().trim_end_matches('/'))
        .filter(|prefix| prefix.starts_with('/') && !prefix.starts_with("//"))
    {
        Some(prefix) => format!("{}{}", prefix, path),
        None => path.to_string(),
    }
}

/// Drop `X-Frame-Options` so dashboards can embed every page.
async fn allow_framing(mut response: Response) -> Response {
    response.headers_mut().remove(X_FRAME_OPTIONS);
    response
}

pub fn router(state: AppState) -> Router {
    // Clearing is POST-only while sessions are in use.
    let clear_route = if state.auth.is_some() {
        post(handlers::clear_list)
    } else {
        get(handlers::clear_list).post(handlers::clear_list)
    };

    let mut pages = Router::new()
        .route("/", get(handlers::index))
        .route("/import", get(handlers::import))
        .route("/delete", post(handlers::delete_selected))
        .route("/delete_data", clear_route)
        .route("/search", get(handlers::search));

    if state.auth.is_some() {
        pages = pages
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
            .route("/login", get(handlers::login_form).post(handlers::login))
            .route("/logout", get(handlers::logout));
    }

    pages
        .route("/healthz", get(handlers::healthz))
        .layer(middleware::map_response(allow_framing))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    if state.auth.is_some() {
        tracing::info!("Login required for the shopping list pages");
    }

    let app = router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::ServerError {
            message: e.to_string(),
        })?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
