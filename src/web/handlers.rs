use axum::body::Bytes;
use axum::extract::{Query, RawForm, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::domain::model::SearchOutcome;
use crate::web::{location, render, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "query")]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn redirect_with_notice(state: &AppState, headers: &HeaderMap, path: &str, notice: &str) -> Response {
    let target = format!("{}?notice={}", path, urlencoding::encode(notice));
    Redirect::to(&location(state, headers, &target)).into_response()
}

/// Collect every `id` field of a checkbox form. Unparseable ids are skipped.
pub fn selected_ids(body: &Bytes) -> BTreeSet<i64> {
    url::form_urlencoded::parse(body)
        .filter(|(key, _)| key == "id")
        .filter_map(|(_, value)| match value.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring invalid shopping list id '{}'", value);
                None
            }
        })
        .collect()
}

pub async fn index(Query(query): Query<PageQuery>) -> Html<String> {
    Html(render::landing_page(query.notice.as_deref()))
}

pub async fn import(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let listing = state.sync.list_items().await;
    Html(render::list_page(&listing, query.notice.as_deref(), None))
}

pub async fn delete_selected(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawForm(body): RawForm,
) -> Response {
    let ids = selected_ids(&body);
    let outcome = state.sync.delete_items(&ids).await;
    redirect_with_notice(&state, &headers, "/import", &outcome.summary())
}

pub async fn clear_list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let outcome = state.sync.clear_list().await;
    redirect_with_notice(&state, &headers, "/", &outcome.summary())
}

pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let raw_query = query.q.unwrap_or_default();
    match state.sync.search_redirect(&raw_query).await {
        SearchOutcome::NoQuery => Redirect::to(&location(&state, &headers, "/import")).into_response(),
        SearchOutcome::Ready {
            query,
            search_url,
            listing,
        } => {
            let search = Some((query.as_str(), search_url.as_str()));
            Html(render::list_page(&listing, None, search)).into_response()
        }
    }
}

pub async fn login_form() -> Html<String> {
    Html(render::login_page(None))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let Some(auth) = &state.auth else {
        return Redirect::to(&location(&state, &headers, "/")).into_response();
    };

    match auth.login(&form.username, &form.password).await {
        Some(token) => (
            [(SET_COOKIE, auth.session_cookie(token).to_string())],
            Redirect::to(&location(&state, &headers, "/")),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Html(render::login_page(Some("Invalid username or password"))),
        )
            .into_response(),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(auth) = &state.auth else {
        return Redirect::to(&location(&state, &headers, "/")).into_response();
    };

    auth.logout(&headers).await;
    (
        [(SET_COOKIE, auth.removal_cookie().to_string())],
        Redirect::to(&location(&state, &headers, "/login")),
    )
        .into_response()
}

pub async fn healthz() -> &'static str {
    "ok"
}
