use std::fmt::Display;

use crate::format::{M3uChannel, M3uChannelList, directives};

impl Display for M3uChannelList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // header
        write!(f, "{}", directives::EXTM3U)?;
        for (key, value) in self.attributes.iter() {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        write!(f, "\n")?;

        // channels
        for it in self.channels.iter() {
            write!(f, "\n")?;
            it.fmt(f)?;
        }

        Ok(())
    }
}

impl Display for M3uChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // #EXTINF:duration attributes...,name
        write!(f, "{}:{}", directives::EXTINF, self.duration)?;
        for (key, value) in self.attributes.iter() {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        writeln!(f, ",{}", self.name)?;
        writeln!(f, "{}", self.location)?;

        Ok(())
    }
}
