use std::{fmt::Display, io::BufRead};

use channelstream_rs::{ParseError, format::M3uChannelList};
use std::error::Error;
use tokio::task::JoinError;

use crate::store::ChannelEntry;

#[derive(Debug)]
pub enum ParseChannelsError {
    ParseError(ParseError),
    JoinError(JoinError),
}

impl Display for ParseChannelsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JoinError(e) => e.fmt(f),
            Self::ParseError(e) => e.fmt(f),
        }
    }
}

impl Error for ParseChannelsError {}

impl From<JoinError> for ParseChannelsError {
    fn from(value: JoinError) -> Self {
        Self::JoinError(value)
    }
}

impl From<ParseError> for ParseChannelsError {
    fn from(value: ParseError) -> Self {
        Self::ParseError(value)
    }
}

pub async fn parse_channels_async(
    stream: impl BufRead + Send + 'static,
) -> Result<M3uChannelList, ParseChannelsError> {
    Ok(tokio::task::spawn_blocking(move || {
        let mut parser = channelstream_rs::Parser::new(stream);
        if let Err(e) = parser.parse() {
            return Err(e);
        }
        Ok(parser.get_result())
    })
    .await??)
}

pub fn to_entries(list: &M3uChannelList) -> Vec<ChannelEntry> {
    list.channels
        .iter()
        .map(|channel| ChannelEntry {
            name: channel.name.to_string(),
            url: channel.location.to_string(),
        })
        .collect()
}

/// Rebuilds M3U text from stored entries, for export.
pub fn to_channel_list(entries: &[ChannelEntry]) -> M3uChannelList {
    let mut list = M3uChannelList::default();
    for entry in entries {
        let mut channel = channelstream_rs::format::M3uChannel::default();
        channel.name = entry.name.as_str().into();
        channel.location = entry.url.as_str().into();
        list.channels.push(channel);
    }

    list
}
