use std::{
    collections::HashMap,
    error::Error,
    fmt::Display,
    io::{self, BufRead},
    mem::swap,
};

use lazy_static::lazy_static;
use regex::Regex;
use smol_str::SmolStr;

use crate::format::{M3uChannel, M3uChannelList, directives};

pub struct Parser(Box<dyn ParserImplTrait>);

impl Parser {
    pub fn new<T: BufRead + 'static>(reader: T) -> Self {
        Self(Box::new(ParserImpl::new(reader)))
    }

    pub fn parse(&mut self) -> Result<(), ParseError> {
        self.0.parse()
    }

    pub fn get_result(&mut self) -> M3uChannelList {
        self.0.get_result()
    }
}

#[derive(Debug)]
pub enum ParseError {
    MissingHeader,
    UnexpectedEof,
    IoError(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::MissingHeader => write!(f, "Missing #EXTM3U header"),
            Self::UnexpectedEof => write!(f, "Unexpected EOF"),
            Self::IoError(e) => e.fmt(f),
        }
    }
}
impl Error for ParseError {}
impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

trait ParserImplTrait {
    fn parse(&mut self) -> Result<(), ParseError>;
    fn get_result(&mut self) -> M3uChannelList;
}

lazy_static! {
    static ref ATTRIBUTE_REGEX: Regex =
        Regex::new("([^ ]*?)=\"(.*?)\"").expect("Regular expression error");
}

fn parse_attributes(input: impl AsRef<str>) -> HashMap<SmolStr, SmolStr> {
    let mut result = HashMap::new();
    for (_, [key, value]) in ATTRIBUTE_REGEX
        .captures_iter(input.as_ref())
        .map(|x| x.extract())
    {
        result.insert(key.into(), value.into());
    }

    result
}

fn is_channel_info(line: &str) -> bool {
    line.starts_with(directives::EXTINF)
}

fn is_resource_locator(line: &str) -> bool {
    directives::LOCATOR_SCHEMES
        .iter()
        .any(|scheme| line.starts_with(scheme))
        || line.contains(directives::SCHEME_SEPARATOR)
}

struct ParserImpl<T: BufRead + 'static> {
    reader: T,
    buffer: String,
    list: M3uChannelList,
    // first half of the pair currently being consumed
    pending: Option<String>,
}

impl<T: BufRead + 'static> ParserImpl<T> {
    pub fn new(reader: T) -> Self {
        Self {
            reader,
            buffer: String::new(),
            list: M3uChannelList::default(),
            pending: None,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, io::Error> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) => return Err(e),
            }

            if self.buffer.trim().len() != 0 {
                return Ok(Some(self.buffer.trim().to_owned()));
            }
        }
    }

    fn parse_m3u_header(&mut self) -> Result<(), ParseError> {
        let first_line = self.next_line()?.ok_or(ParseError::UnexpectedEof)?;

        if !first_line.starts_with(directives::EXTM3U) {
            return Err(ParseError::MissingHeader);
        }

        let attributes = first_line
            .chars()
            .skip(directives::EXTM3U_LEN)
            .skip_while(|x| x.is_whitespace())
            .collect::<String>();

        let attributes = parse_attributes(attributes);
        self.list.attributes.extend(attributes);

        Ok(())
    }

    fn push_channel(&mut self, name_source: String, location: String) {
        let mut channel = M3uChannel::default();

        // display name is whatever follows the last comma of the first
        // half of the pair; the whole line when it has no comma
        let name = name_source
            .rsplit(',')
            .next()
            .unwrap_or(name_source.as_str())
            .trim();
        channel.name = SmolStr::new(name);

        if is_channel_info(&name_source) {
            let value = name_source.splitn(2, ':').nth(1).unwrap_or_default();
            let maybe_duration = value
                .splitn(2, ',')
                .next()
                .unwrap_or_default()
                .splitn(2, ' ')
                .next()
                .unwrap_or_default();
            // live streams commonly carry no usable duration, keep -1
            channel.duration = maybe_duration.parse().unwrap_or(-1.0);
            channel.attributes.extend(parse_attributes(&name_source));
        }

        channel.location = SmolStr::new(location);
        self.list.channels.push(channel);
    }
}

impl<T: BufRead + 'static> ParserImplTrait for ParserImpl<T> {
    fn parse(&mut self) -> Result<(), ParseError> {
        self.parse_m3u_header()?;

        while let Some(line) = self.next_line()? {
            if !is_channel_info(&line) && !is_resource_locator(&line) {
                // blank lines, comments, unrelated directives
                continue;
            }

            match self.pending.take() {
                None => self.pending = Some(line),
                Some(name_source) => self.push_channel(name_source, line),
            }
        }

        // a dangling half pair at EOF is dropped
        self.pending = None;

        Ok(())
    }

    fn get_result(&mut self) -> M3uChannelList {
        let mut result = M3uChannelList::default();
        swap(&mut self.list, &mut result);
        result
    }
}
