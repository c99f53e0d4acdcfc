use std::{error::Error, fmt::Display};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    Single,
    Loop,
}

/// Seam to the external media-playback component: load one resource URL,
/// answer with loaded or error. Decoding and transport stay on the other
/// side of this trait.
#[async_trait]
pub trait Player: Send + Sync {
    async fn load(&self, url: &str, mode: PlaybackMode) -> Result<(), PlaybackError>;
}

#[derive(Debug)]
pub enum PlaybackError {
    NotAttached,
    Rejected(String),
}

impl Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttached => write!(f, "No media component is attached"),
            Self::Rejected(msg) => write!(f, "Media component rejected the resource: {}", msg),
        }
    }
}

impl Error for PlaybackError {}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerCommand {
    pub url: String,
    pub mode: PlaybackMode,
}

/// Forwards load commands to whatever presentation/media component is
/// attached to the command stream. Loading fails while nothing listens,
/// which keeps the controller from advancing to a playing state nobody
/// can render.
pub struct ChannelPlayer {
    tx: broadcast::Sender<PlayerCommand>,
}

impl ChannelPlayer {
    pub fn new(buffer: usize) -> Self {
        Self {
            tx: broadcast::channel(buffer).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerCommand> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl Player for ChannelPlayer {
    async fn load(&self, url: &str, mode: PlaybackMode) -> Result<(), PlaybackError> {
        let command = PlayerCommand {
            url: url.to_owned(),
            mode,
        };

        self.tx
            .send(command)
            .map(|_| ())
            .map_err(|_| PlaybackError::NotAttached)
    }
}
