use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use url::Url;

use crate::{
    AppStateRef, bad_request_with_log, internal_error_with_log, m3u,
    routes::control_error_status,
};

#[derive(Deserialize)]
pub struct ImportQuery {
    pub name: String,
}

pub async fn import_playlist(
    State(state): State<AppStateRef>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<Response, StatusCode> {
    let playlist = state
        .controller
        .import_playlist(body, &query.name)
        .await
        .map_err(control_error_status)?;

    Ok(Json(playlist).into_response())
}

#[derive(Deserialize)]
pub struct ImportUrlQuery {
    pub name: String,
    pub origin: String,
}

pub async fn import_playlist_url(
    State(state): State<AppStateRef>,
    Query(query): Query<ImportUrlQuery>,
) -> Result<Response, StatusCode> {
    Url::parse(&query.origin).map_err(bad_request_with_log!("Parse url"))?;

    let text = state
        .http_client
        .get(&query.origin)
        .send()
        .await
        .map_err(internal_error_with_log!("Request origin"))?
        .text()
        .await
        .map_err(internal_error_with_log!("Request text"))?;

    let playlist = state
        .controller
        .import_playlist(text, &query.name)
        .await
        .map_err(control_error_status)?;

    Ok(Json(playlist).into_response())
}

pub async fn list_playlists(State(state): State<AppStateRef>) -> Result<Response, StatusCode> {
    let names = state
        .store
        .list_names()
        .await
        .map_err(internal_error_with_log!("List playlists"))?;

    Ok(Json(names).into_response())
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: String,
}

pub async fn get_playlist(
    State(state): State<AppStateRef>,
    Query(query): Query<NameQuery>,
) -> Result<Response, StatusCode> {
    let entries = state
        .controller
        .open_playlist(&query.name)
        .await
        .map_err(control_error_status)?;

    Ok(Json(entries).into_response())
}

pub async fn remove_playlist(
    State(state): State<AppStateRef>,
    Query(query): Query<NameQuery>,
) -> Result<StatusCode, StatusCode> {
    state
        .controller
        .remove_playlist(&query.name)
        .await
        .map_err(control_error_status)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_playlist(
    State(state): State<AppStateRef>,
    Query(query): Query<NameQuery>,
) -> Result<Response, StatusCode> {
    let entries = state
        .store
        .load(&query.name)
        .await
        .map_err(internal_error_with_log!("Load playlist"))?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(m3u::to_channel_list(&entries).to_string().into_response())
}
