mod channel;
mod channel_list;

pub use channel::*;
pub use channel_list::*;

pub mod directives {
    pub const EXTM3U: &str = "#EXTM3U";
    pub const EXTM3U_LEN: usize = EXTM3U.len();
    pub const EXTINF: &str = "#EXTINF";

    /// Schemes accepted for a bare resource-locator line
    pub const LOCATOR_SCHEMES: [&str; 4] = ["http", "rtmp", "rtsp", "mmsh"];
    pub const SCHEME_SEPARATOR: &str = "://";
}
