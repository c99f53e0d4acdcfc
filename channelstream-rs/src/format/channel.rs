use std::collections::HashMap;

use smol_str::SmolStr;

#[derive(Clone, Debug, PartialEq)]
pub struct M3uChannel {
    pub name: SmolStr,
    pub duration: f32,
    pub location: SmolStr,
    pub attributes: HashMap<SmolStr, SmolStr>,
}

impl Default for M3uChannel {
    fn default() -> Self {
        Self {
            name: SmolStr::new(""),
            duration: -1.0,
            attributes: HashMap::new(),
            location: SmolStr::new(""),
        }
    }
}
