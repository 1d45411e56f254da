use crate::country::CountryCode;
use serde::{Deserialize, Serialize};

/// A host/port pair the engine connects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerAddress {
    pub location: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(location: impl Into<String>, port: u16) -> Self {
        ServerAddress {
            location: location.into(),
            port,
        }
    }
}

/// How the game is being hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostType {
    /// An autonomous hosting program (e.g. SPADS) listening on `port`.
    Autohost { program_name: String, port: u16 },
    /// A human hosting from a lobby client.
    User { lobby_name: String },
}

/// Information about the host required by the engine to launch a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Lobby account ID of the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u32>,
    pub username: String,
    #[serde(rename = "type")]
    pub host_type: HostType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ServerAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<CountryCode>,
}

impl HostConfig {
    pub fn is_autohost(&self) -> bool {
        matches!(self.host_type, HostType::Autohost { .. })
    }
}
