use super::players::country_code;
use super::{fields, Builder};
use crate::error::ScriptError;
use crate::sections::SectionKey;
use springscript_model::{AllyTeam, HostConfig, HostType, Player, ServerAddress};

/// Host program or lobby name used when `hosttype` is absent.
pub(crate) const UNKNOWN_HOST_TYPE: &str = "Unknown";

impl Builder<'_> {
    /// Infer the host. An `autohostname`/`autohostport` pair makes it an
    /// autohost; otherwise `myplayername` names a user, whose account
    /// details are borrowed from the first participant of the same name.
    pub(super) fn host(
        &self,
        ally_teams: &[AllyTeam],
        spectators: &[Player],
    ) -> Result<HostConfig, ScriptError> {
        let s = self.sections;
        let game = SectionKey::Game;

        let address = match (
            fields::HOST_IP.read(s, game),
            fields::HOST_PORT.read(s, game),
        ) {
            (Some(ip), Some(port)) => Some(ServerAddress::new(ip, port)),
            _ => None,
        };
        let host_type_name = fields::HOST_TYPE
            .read(s, game)
            .unwrap_or_else(|| UNKNOWN_HOST_TYPE.to_owned());

        if let (Some(username), Some(port)) = (
            fields::AUTOHOST_NAME.read(s, game),
            fields::AUTOHOST_PORT.read(s, game),
        ) {
            return Ok(HostConfig {
                user_id: fields::AUTOHOST_ACCOUNT_ID.read(s, game),
                username,
                host_type: HostType::Autohost {
                    program_name: host_type_name,
                    port,
                },
                address,
                rank: fields::AUTOHOST_RANK.read(s, game),
                country_code: fields::AUTOHOST_COUNTRY_CODE
                    .read(s, game)
                    .and_then(|raw| country_code(&raw)),
            });
        }

        let username = fields::MY_PLAYER_NAME.read(s, game)?;
        let participant = ally_teams
            .iter()
            .flat_map(|a| &a.teams)
            .flat_map(|t| &t.players)
            .chain(spectators)
            .find(|p| p.username == username);
        if participant.is_none() {
            tracing::debug!(%username, "host does not take part in the game");
        }

        Ok(HostConfig {
            user_id: participant.and_then(|p| p.user_id),
            username,
            host_type: HostType::User {
                lobby_name: host_type_name,
            },
            address,
            rank: participant.and_then(|p| p.rank),
            country_code: participant.and_then(|p| p.country_code),
        })
    }
}
