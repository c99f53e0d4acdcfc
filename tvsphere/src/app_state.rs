use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use log::info;
use reqwest::{Client, Proxy};

use crate::{
    Config,
    control::{
        Controller,
        player::{ChannelPlayer, PlaybackMode},
    },
    store::{ChannelStore, kv::KvStore},
};

pub type AppStateRef = Arc<AppState>;
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ChannelStore>,
    pub player: Arc<ChannelPlayer>,
    pub controller: Arc<Controller>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let mut builder = Client::builder();

        if let Some(user_agent) = &config.http.user_agent {
            builder = builder.user_agent(user_agent)
        }

        if let Some(proxy) = &config.http.proxy {
            info!("With proxy: {}", proxy);
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        let http_client = builder.build()?;

        let kv = KvStore::open(Path::new(
            config.db_path.as_deref().unwrap_or("tvsphere.db"),
        ))?;
        let store = Arc::new(ChannelStore::new(kv));

        let player = Arc::new(ChannelPlayer::new(
            config.player_buffer.unwrap_or(16), // 16 queued commands
        ));

        let default_mode = if config.loop_playback.unwrap_or(false) {
            PlaybackMode::Loop
        } else {
            PlaybackMode::Single
        };

        let controller = Controller::new(
            store.clone(),
            player.clone(),
            default_mode,
            Duration::from_secs(config.resume_timeout.unwrap_or(10).into()), // 10s
        );

        Ok(Self {
            config,
            store,
            player,
            controller,
            http_client,
        })
    }
}
