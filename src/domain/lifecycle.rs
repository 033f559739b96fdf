use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of the hosting UI container.
///
/// Owned by the container. The orchestration core only cares about
/// transitions into and out of `Resumed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    #[default]
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    Destroyed,
}

impl HostState {
    pub fn is_resumed(self) -> bool {
        self == Self::Resumed
    }
}

impl FromStr for HostState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "started" => Ok(Self::Started),
            "resumed" => Ok(Self::Resumed),
            "paused" => Ok(Self::Paused),
            "stopped" => Ok(Self::Stopped),
            "destroyed" => Ok(Self::Destroyed),
            other => Err(format!("unknown host state '{other}'")),
        }
    }
}
