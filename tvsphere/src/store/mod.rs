//! Durable playlist and current-channel records over the key-value table.

pub mod kv;

use std::{error::Error, fmt::Display};

use serde::{Deserialize, Serialize};

use kv::KvStore;

const PLAYLIST_PREFIX: &str = "playlist.";
const CURRENT_CHANNEL_KEY: &str = "current_channel";

/// One channel of a playlist. Ordering within a playlist is significant:
/// display and selection both use file order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredPlaylist {
    pub name: String,
    pub entries: Vec<ChannelEntry>,
}

/// The single resume pointer, overwritten on every selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentChannel {
    pub playlist: String,
    pub channel_name: String,
    pub channel_url: String,
    /// Written by older revisions of the record format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_number: Option<u32>,
}

#[derive(Debug)]
pub enum StoreError {
    Backend(String),
    Encoding(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            Self::Encoding(e) => write!(f, "Record encoding error: {}", e),
        }
    }
}

impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encoding(value)
    }
}

fn playlist_key(name: &str) -> String {
    format!("{}{}", PLAYLIST_PREFIX, name)
}

pub struct ChannelStore {
    kv: KvStore,
}

impl ChannelStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Writes `playlist.<name>`, replacing any playlist of the same name.
    pub async fn save(&self, playlist: &StoredPlaylist) -> Result<(), StoreError> {
        let value = serde_json::to_string(&playlist.entries)?;
        self.kv.put(&playlist_key(&playlist.name), &value).await
    }

    pub async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.kv.keys_with_prefix(PLAYLIST_PREFIX).await?;

        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(PLAYLIST_PREFIX))
            .map(|name| name.to_owned())
            .collect())
    }

    pub async fn load(&self, name: &str) -> Result<Option<Vec<ChannelEntry>>, StoreError> {
        match self.kv.get(&playlist_key(name)).await? {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        }
    }

    /// Deleting a missing playlist is a no-op. The current-channel record is
    /// left alone here; the controller decides whether to invalidate it.
    pub async fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.kv.delete(&playlist_key(name)).await
    }

    pub async fn set_current(&self, current: &CurrentChannel) -> Result<(), StoreError> {
        let value = serde_json::to_string(current)?;
        self.kv.put(CURRENT_CHANNEL_KEY, &value).await
    }

    pub async fn get_current(&self) -> Result<Option<CurrentChannel>, StoreError> {
        match self.kv.get(CURRENT_CHANNEL_KEY).await? {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        }
    }

    pub async fn clear_current(&self) -> Result<(), StoreError> {
        self.kv.delete(CURRENT_CHANNEL_KEY).await
    }
}
