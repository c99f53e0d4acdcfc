use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use log::error;

use crate::{AppStateRef, control::ControlError};

mod channel;
mod events;
mod playlist;

pub fn get_routes(app_state: &AppStateRef) -> Router {
    Router::new()
        .route("/playlists", get(playlist::list_playlists))
        .route("/playlists/import", post(playlist::import_playlist))
        .route("/playlists/import-url", post(playlist::import_playlist_url))
        .route(
            "/playlist",
            get(playlist::get_playlist).delete(playlist::remove_playlist),
        )
        .route("/playlist/export", get(playlist::export_playlist))
        .route("/channels/select", post(channel::select_channel))
        .route("/channels/resume", post(channel::resume_channel))
        .route("/channels/current", get(channel::get_current))
        .route("/state", get(channel::get_state))
        .route("/player/events", get(events::player_events))
        .with_state(app_state.clone())
}

pub(crate) fn control_error_status(e: ControlError) -> StatusCode {
    error!("{}", e);
    match e {
        ControlError::Format(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ControlError::NotFound(_) => StatusCode::NOT_FOUND,
        ControlError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ControlError::Playback(_) => StatusCode::BAD_GATEWAY,
    }
}
