use smol_str::SmolStr;
use std::collections::HashMap;

use crate::format::M3uChannel;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct M3uChannelList {
    /// Attributes of the `#EXTM3U` header line
    pub attributes: HashMap<SmolStr, SmolStr>,
    /// Channels of this list, in file order
    pub channels: Vec<M3uChannel>,
}
