use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{AppStateRef, internal_error_with_log, routes::control_error_status};

#[derive(Deserialize)]
pub struct SelectQuery {
    pub playlist: String,
    pub index: usize,
}

pub async fn select_channel(
    State(state): State<AppStateRef>,
    Query(query): Query<SelectQuery>,
) -> Result<Response, StatusCode> {
    let current = state
        .controller
        .select_channel(&query.playlist, query.index)
        .await
        .map_err(control_error_status)?;

    Ok(Json(current).into_response())
}

pub async fn resume_channel(State(state): State<AppStateRef>) -> Result<StatusCode, StatusCode> {
    state
        .controller
        .resume_last_channel()
        .await
        .map_err(control_error_status)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_current(State(state): State<AppStateRef>) -> Result<Response, StatusCode> {
    let current = state
        .store
        .get_current()
        .await
        .map_err(internal_error_with_log!("Read current channel"))?;

    Ok(Json(current).into_response())
}

pub async fn get_state(State(state): State<AppStateRef>) -> Response {
    Json(state.controller.view().await).into_response()
}
