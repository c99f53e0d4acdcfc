//! # channelstream-rs
//! A library for parsing and generating M3U/M3U8 channel lists
//!
//! # Example
//! ```rust
//! use channelstream_rs::Parser;
//! use std::io::Cursor;
//!
//! // 1. Parse
//! let mut parser = Parser::new(Cursor::new(r#"
//! #EXTM3U x-tvg-url="test"
//! #EXTINF:-1 tvg-id="a",Channel A
//! http://example.com/a.ts"#));
//! parser.parse().unwrap();
//! let result = parser.get_result();
//! // Do your works with result...
//!
//! // 2. Generate
//! println!("{}", result.to_string());
//! ```

mod builder;
pub mod format;
mod parser;
pub use parser::*;
