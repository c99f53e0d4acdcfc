use async_stream::stream;
use axum::{
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};

use crate::AppStateRef;

/// SSE stream of load commands for the attached media/presentation
/// component. Attaching here is what makes channel selection succeed.
pub async fn player_events(State(state): State<AppStateRef>) -> impl IntoResponse {
    let mut rx = state.player.subscribe();

    let stream = stream! {
        while let Ok(command) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&command) {
                yield Ok::<_, axum::Error>(Event::default().event("load").data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
