//! Channel-selection controller.
//!
//! A single logical actor: the presentation layer serializes user intents
//! into these methods, so no mutation happens outside one call at a time.
//! The only concurrent path is the startup resume, which is ordered against
//! manual selections with an intent sequence number.

pub mod player;

use std::{
    error::Error,
    fmt::Display,
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    m3u::{self, ParseChannelsError},
    store::{ChannelEntry, ChannelStore, CurrentChannel, StoreError, StoredPlaylist},
};
use player::{PlaybackError, PlaybackMode, Player};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewState {
    Idle,
    Browsing {
        playlist: String,
        entries: Vec<ChannelEntry>,
    },
    Playing {
        playlist: String,
        entries: Vec<ChannelEntry>,
        index: usize,
    },
}

#[derive(Debug)]
pub enum ControlError {
    Format(ParseChannelsError),
    NotFound(String),
    Storage(StoreError),
    Playback(PlaybackError),
}

impl Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(e) => write!(f, "Playlist format error: {}", e),
            Self::NotFound(what) => write!(f, "{}", what),
            Self::Storage(e) => e.fmt(f),
            Self::Playback(e) => e.fmt(f),
        }
    }
}

impl Error for ControlError {}

impl From<ParseChannelsError> for ControlError {
    fn from(value: ParseChannelsError) -> Self {
        Self::Format(value)
    }
}

impl From<StoreError> for ControlError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<PlaybackError> for ControlError {
    fn from(value: PlaybackError) -> Self {
        Self::Playback(value)
    }
}

pub struct Controller {
    store: Arc<ChannelStore>,
    player: Arc<dyn Player>,
    default_mode: PlaybackMode,
    resume_timeout: Duration,
    view: RwLock<ViewState>,
    intent_seq: AtomicU64,
}

impl Controller {
    pub fn new(
        store: Arc<ChannelStore>,
        player: Arc<dyn Player>,
        default_mode: PlaybackMode,
        resume_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            player,
            default_mode,
            resume_timeout,
            view: RwLock::new(ViewState::Idle),
            intent_seq: AtomicU64::new(0),
        })
    }

    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    /// Parse and persist in one step: a malformed list never reaches the
    /// store, a parsed one is saved whole.
    pub async fn import_playlist(
        &self,
        raw_text: String,
        display_name: &str,
    ) -> Result<StoredPlaylist, ControlError> {
        let list = m3u::parse_channels_async(Cursor::new(raw_text.into_bytes())).await?;

        let playlist = StoredPlaylist {
            name: display_name.to_owned(),
            entries: m3u::to_entries(&list),
        };
        self.store.save(&playlist).await?;

        info!(
            "Imported playlist {} ({} channels)",
            playlist.name,
            playlist.entries.len()
        );
        Ok(playlist)
    }

    pub async fn open_playlist(&self, name: &str) -> Result<Vec<ChannelEntry>, ControlError> {
        match self.store.load(name).await? {
            None => {
                // the referenced playlist vanished under us
                *self.view.write().await = ViewState::Idle;
                Err(ControlError::NotFound(format!(
                    "Playlist {} not found",
                    name
                )))
            }
            Some(entries) => {
                *self.view.write().await = ViewState::Browsing {
                    playlist: name.to_owned(),
                    entries: entries.clone(),
                };
                Ok(entries)
            }
        }
    }

    /// Lookup is by position, never by display name: duplicate names are
    /// legal within a playlist.
    pub async fn select_channel(
        &self,
        playlist_name: &str,
        index: usize,
    ) -> Result<CurrentChannel, ControlError> {
        // a manual intent supersedes any in-flight resume
        self.bump_intent();

        let entries = self.entries_for(playlist_name).await?;
        let entry = entries
            .get(index)
            .ok_or_else(|| {
                ControlError::NotFound(format!(
                    "Channel index {} out of range for playlist {}",
                    index, playlist_name
                ))
            })?
            .clone();

        self.player.load(&entry.url, self.default_mode).await?;

        *self.view.write().await = ViewState::Playing {
            playlist: playlist_name.to_owned(),
            entries,
            index,
        };

        // playback is already running at this point, so the view above
        // stays truthful even if persisting the resume pointer fails
        let current = CurrentChannel {
            playlist: playlist_name.to_owned(),
            channel_name: entry.name,
            channel_url: entry.url,
            channel_number: None,
        };
        self.store.set_current(&current).await?;

        Ok(current)
    }

    /// Startup-only. A missing record is a fresh install, not an error.
    /// The result is discarded when a manual intent lands first.
    pub async fn resume_last_channel(&self) -> Result<(), ControlError> {
        let seq = self.intent_seq.load(Ordering::SeqCst);

        let Some(current) = self.store.get_current().await? else {
            debug!("No current channel to resume");
            return Ok(());
        };

        let load = self.player.load(&current.channel_url, self.default_mode);
        match tokio::time::timeout(self.resume_timeout, load).await {
            Err(_) => {
                warn!("Resume of {} timed out, abandoned", current.channel_url);
                return Ok(());
            }
            Ok(Err(e)) => return Err(ControlError::Playback(e)),
            Ok(Ok(())) => {}
        }

        if self.intent_seq.load(Ordering::SeqCst) != seq {
            debug!("Resume superseded by a newer intent, result discarded");
            return Ok(());
        }

        let resumed = self.resume_view(&current).await?;

        let mut view = self.view.write().await;
        if self.intent_seq.load(Ordering::SeqCst) != seq {
            debug!("Resume superseded by a newer intent, result discarded");
            return Ok(());
        }
        *view = resumed;

        info!(
            "Resumed channel {} from playlist {}",
            current.channel_name, current.playlist
        );
        Ok(())
    }

    pub async fn remove_playlist(&self, name: &str) -> Result<(), ControlError> {
        self.bump_intent();
        self.store.remove(name).await?;

        // a resume pointer into the removed playlist would replay an
        // orphaned URL at the next startup
        if let Some(current) = self.store.get_current().await? {
            if current.playlist == name {
                self.store.clear_current().await?;
                debug!(
                    "Cleared current channel pointing into removed playlist {}",
                    name
                );
            }
        }

        let mut view = self.view.write().await;
        let viewing_removed = match &*view {
            ViewState::Browsing { playlist, .. } | ViewState::Playing { playlist, .. } => {
                playlist == name
            }
            ViewState::Idle => false,
        };
        if viewing_removed {
            *view = ViewState::Idle;
        }

        Ok(())
    }

    async fn entries_for(&self, playlist_name: &str) -> Result<Vec<ChannelEntry>, ControlError> {
        {
            let view = self.view.read().await;
            match &*view {
                ViewState::Browsing { playlist, entries }
                | ViewState::Playing {
                    playlist, entries, ..
                } if playlist == playlist_name => return Ok(entries.clone()),
                _ => {}
            }
        }

        self.store.load(playlist_name).await?.ok_or_else(|| {
            ControlError::NotFound(format!("Playlist {} not found", playlist_name))
        })
    }

    async fn resume_view(&self, current: &CurrentChannel) -> Result<ViewState, ControlError> {
        let Some(entries) = self.store.load(&current.playlist).await? else {
            // stale pointer left behind by legacy data
            return Ok(ViewState::Idle);
        };

        Ok(
            match entries.iter().position(|e| e.url == current.channel_url) {
                Some(index) => ViewState::Playing {
                    playlist: current.playlist.clone(),
                    entries,
                    index,
                },
                None => ViewState::Browsing {
                    playlist: current.playlist.clone(),
                    entries,
                },
            },
        )
    }

    fn bump_intent(&self) {
        self.intent_seq.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::KvStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const SAMPLE: &str = "#EXTM3U
#EXTINF:-1,One
http://example.com/1.ts
#EXTINF:-1,Two
http://example.com/2.ts
";

    struct MockPlayer {
        delay: Option<Duration>,
        fail: bool,
        loads: Mutex<Vec<String>>,
    }

    impl MockPlayer {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                delay: None,
                fail: false,
                loads: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                delay: None,
                fail: true,
                loads: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay: Some(delay),
                fail: false,
                loads: Mutex::new(Vec::new()),
            })
        }

        fn loaded(&self) -> Vec<String> {
            self.loads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Player for MockPlayer {
        async fn load(&self, url: &str, _mode: PlaybackMode) -> Result<(), PlaybackError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(PlaybackError::Rejected("scripted failure".to_owned()));
            }

            self.loads.lock().unwrap().push(url.to_owned());
            Ok(())
        }
    }

    fn controller(player: Arc<dyn Player>) -> (Arc<Controller>, Arc<ChannelStore>) {
        let store = Arc::new(ChannelStore::new(KvStore::open_in_memory().unwrap()));
        let controller = Controller::new(
            store.clone(),
            player,
            PlaybackMode::Single,
            Duration::from_secs(60),
        );

        (controller, store)
    }

    #[tokio::test]
    async fn test_import_then_open() {
        let (controller, _) = controller(MockPlayer::ok());

        let playlist = controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        assert_eq!(playlist.entries.len(), 2);

        let entries = controller.open_playlist("tv").await.unwrap();
        assert_eq!(entries[0].name, "One");
        assert!(matches!(
            controller.view().await,
            ViewState::Browsing { .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_import_persists_nothing() {
        let (controller, store) = controller(MockPlayer::ok());

        let result = controller
            .import_playlist("#EXTINF:-1,One\nhttp://example.com/1.ts\n".to_owned(), "tv")
            .await;

        assert!(matches!(result, Err(ControlError::Format(_))));
        assert!(store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_missing_playlist_reverts_to_idle() {
        let (controller, _) = controller(MockPlayer::ok());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        controller.open_playlist("tv").await.unwrap();

        let result = controller.open_playlist("gone").await;
        assert!(matches!(result, Err(ControlError::NotFound(_))));
        assert_eq!(controller.view().await, ViewState::Idle);
    }

    #[tokio::test]
    async fn test_select_writes_current() {
        let player = MockPlayer::ok();
        let (controller, store) = controller(player.clone());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        controller.open_playlist("tv").await.unwrap();

        let current = controller.select_channel("tv", 1).await.unwrap();
        assert_eq!(current.channel_name, "Two");
        assert_eq!(current.channel_url, "http://example.com/2.ts");
        assert_eq!(store.get_current().await.unwrap(), Some(current));
        assert_eq!(player.loaded(), vec!["http://example.com/2.ts"]);
        assert!(matches!(
            controller.view().await,
            ViewState::Playing { index: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_select_out_of_range_leaves_state() {
        let (controller, store) = controller(MockPlayer::ok());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        let before = controller.open_playlist("tv").await.unwrap();

        let result = controller.select_channel("tv", 5).await;
        assert!(matches!(result, Err(ControlError::NotFound(_))));
        assert_eq!(
            controller.view().await,
            ViewState::Browsing {
                playlist: "tv".to_owned(),
                entries: before,
            }
        );
        assert_eq!(store.get_current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_playback_failure_keeps_view() {
        let (controller, store) = controller(MockPlayer::failing());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        controller.open_playlist("tv").await.unwrap();

        let result = controller.select_channel("tv", 0).await;
        assert!(matches!(result, Err(ControlError::Playback(_))));
        assert!(matches!(
            controller.view().await,
            ViewState::Browsing { .. }
        ));
        assert_eq!(store.get_current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resume_fresh_install_is_noop() {
        let (controller, _) = controller(MockPlayer::ok());

        controller.resume_last_channel().await.unwrap();
        assert_eq!(controller.view().await, ViewState::Idle);
    }

    #[tokio::test]
    async fn test_resume_restores_playing_view() {
        let player = MockPlayer::ok();
        let (controller, store) = controller(player.clone());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        store
            .set_current(&CurrentChannel {
                playlist: "tv".to_owned(),
                channel_name: "Two".to_owned(),
                channel_url: "http://example.com/2.ts".to_owned(),
                channel_number: None,
            })
            .await
            .unwrap();

        controller.resume_last_channel().await.unwrap();
        assert_eq!(player.loaded(), vec!["http://example.com/2.ts"]);
        assert!(matches!(
            controller.view().await,
            ViewState::Playing { index: 1, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_select_supersedes_pending_resume() {
        let player = MockPlayer::slow(Duration::from_millis(200));
        let (controller, store) = controller(player.clone());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        store
            .set_current(&CurrentChannel {
                playlist: "tv".to_owned(),
                channel_name: "One".to_owned(),
                channel_url: "http://example.com/1.ts".to_owned(),
                channel_number: None,
            })
            .await
            .unwrap();

        let resume_controller = controller.clone();
        let resume = tokio::spawn(async move { resume_controller.resume_last_channel().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        // manual pick while the resume's playback request is in flight
        controller.select_channel("tv", 1).await.unwrap();
        resume.await.unwrap().unwrap();

        assert!(matches!(
            controller.view().await,
            ViewState::Playing { index: 1, .. }
        ));
        let current = store.get_current().await.unwrap().unwrap();
        assert_eq!(current.channel_name, "Two");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_abandoned_on_timeout() {
        let player = MockPlayer::slow(Duration::from_millis(200));
        let store = Arc::new(ChannelStore::new(KvStore::open_in_memory().unwrap()));
        let controller = Controller::new(
            store.clone(),
            player.clone(),
            PlaybackMode::Single,
            Duration::from_millis(50),
        );
        store
            .set_current(&CurrentChannel {
                playlist: "tv".to_owned(),
                channel_name: "One".to_owned(),
                channel_url: "http://example.com/1.ts".to_owned(),
                channel_number: None,
            })
            .await
            .unwrap();

        controller.resume_last_channel().await.unwrap();
        assert_eq!(controller.view().await, ViewState::Idle);
        assert!(player.loaded().is_empty());
    }

    #[tokio::test]
    async fn test_remove_cascades_into_current() {
        let (controller, store) = controller(MockPlayer::ok());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        controller.open_playlist("tv").await.unwrap();
        controller.select_channel("tv", 0).await.unwrap();

        controller.remove_playlist("tv").await.unwrap();
        assert_eq!(controller.view().await, ViewState::Idle);
        assert_eq!(store.get_current().await.unwrap(), None);
        assert_eq!(store.load("tv").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_other_playlist_keeps_current() {
        let (controller, store) = controller(MockPlayer::ok());
        controller
            .import_playlist(SAMPLE.to_owned(), "tv")
            .await
            .unwrap();
        controller
            .import_playlist(SAMPLE.to_owned(), "other")
            .await
            .unwrap();
        controller.open_playlist("tv").await.unwrap();
        controller.select_channel("tv", 0).await.unwrap();

        controller.remove_playlist("other").await.unwrap();
        assert!(matches!(
            controller.view().await,
            ViewState::Playing { index: 0, .. }
        ));
        assert!(store.get_current().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_missing_playlist_is_noop() {
        let (controller, _) = controller(MockPlayer::ok());
        controller.remove_playlist("nope").await.unwrap();
        assert_eq!(controller.view().await, ViewState::Idle);
    }
}
