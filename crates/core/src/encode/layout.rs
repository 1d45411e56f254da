//! Dense renumbering: the engine addresses every participant by its position
//! among the script's sections, so script IDs are mapped to `0..n` per kind
//! before rendering. Membership (team of a player, allyteam of a team, team
//! of an AI) is stored as positions in the slots, and player references
//! (team leader, AI host) are rewritten through [`Layout::player`]. Start
//! boxes and chosen start positions are written inside the section of the
//! entity that owns them, so they follow its position.
//!
//! Players (team players and spectators together), teams, allyteams and
//! AIs are each ordered by script ID. A reference to an ID with no entity
//! behind it is written unchanged.

use springscript_model::{Ai, AllyTeam, GameSpecification, Player, Team};
use std::collections::HashMap;

pub(crate) struct PlayerSlot<'a> {
    pub player: &'a Player,
    /// Position of the team played on; `None` for spectators.
    pub team: Option<usize>,
}

pub(crate) struct TeamSlot<'a> {
    pub team: &'a Team,
    /// Position of the owning allyteam.
    pub ally_team: usize,
}

pub(crate) struct AiSlot<'a> {
    pub ai: &'a Ai,
    /// Position of the controlled team.
    pub team: usize,
}

pub(crate) struct Layout<'a> {
    pub players: Vec<PlayerSlot<'a>>,
    pub teams: Vec<TeamSlot<'a>>,
    pub ally_teams: Vec<&'a AllyTeam>,
    pub ais: Vec<AiSlot<'a>>,
    player_index: HashMap<usize, usize>,
}

fn positions(ids: impl Iterator<Item = usize>) -> HashMap<usize, usize> {
    ids.enumerate().map(|(position, id)| (id, position)).collect()
}

fn remap(index: &HashMap<usize, usize>, id: usize) -> usize {
    index.get(&id).copied().unwrap_or(id)
}

impl<'a> Layout<'a> {
    pub fn new(spec: &'a GameSpecification) -> Self {
        let mut ally_teams: Vec<&AllyTeam> = spec.ally_teams().iter().collect();
        ally_teams.sort_by_key(|a| a.script_id);
        let ally_team_index = positions(ally_teams.iter().map(|a| a.script_id));

        let mut teams: Vec<(&Team, usize)> = spec
            .ally_teams()
            .iter()
            .flat_map(|a| a.teams.iter().map(move |t| (t, a.script_id)))
            .collect();
        teams.sort_by_key(|(t, _)| t.script_id);
        let team_index = positions(teams.iter().map(|(t, _)| t.script_id));

        let mut players: Vec<(&Player, Option<usize>)> = spec
            .team_players()
            .map(|(t, p)| (p, Some(t.script_id)))
            .chain(spec.spectators().iter().map(|p| (p, None)))
            .collect();
        players.sort_by_key(|(p, _)| p.script_id);
        let player_index = positions(players.iter().map(|(p, _)| p.script_id));

        let mut ais: Vec<(&Ai, usize)> = spec.ais().map(|(t, ai)| (ai, t.script_id)).collect();
        ais.sort_by_key(|(ai, _)| ai.script_id);

        Layout {
            players: players
                .into_iter()
                .map(|(player, team)| PlayerSlot {
                    player,
                    team: team.map(|id| remap(&team_index, id)),
                })
                .collect(),
            teams: teams
                .into_iter()
                .map(|(team, ally)| TeamSlot {
                    team,
                    ally_team: remap(&ally_team_index, ally),
                })
                .collect(),
            ally_teams,
            ais: ais
                .into_iter()
                .map(|(ai, team)| AiSlot {
                    ai,
                    team: remap(&team_index, team),
                })
                .collect(),
            player_index,
        }
    }

    /// Position of the player with script ID `id` (team leader, AI host).
    pub fn player(&self, id: usize) -> usize {
        remap(&self.player_index, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use springscript_model::{GameSetup, HostConfig, HostType};

    fn spec() -> GameSpecification {
        let mut red = Team::new(10, 7);
        red.players = vec![Player::new(7, "alice")];
        let mut blue = Team::new(4, 3);
        blue.players = vec![Player::new(3, "bob")];
        blue.ais = vec![Ai {
            script_id: 9,
            name: "Bot".into(),
            host_id: 3,
            short_name: "KAIK".into(),
            version: String::new(),
            is_from_demo: false,
        }];
        let setup = GameSetup {
            ally_teams: vec![AllyTeam::new(5, vec![red]), AllyTeam::new(2, vec![blue])],
            spectators: vec![Player::new(5, "carol")],
            demo_file: None,
            host: HostConfig {
                user_id: None,
                username: "alice".into(),
                host_type: HostType::User {
                    lobby_name: "Lobby".into(),
                },
                address: None,
                rank: None,
                country_code: None,
            },
            start: Default::default(),
            map_name: "m".into(),
            map_hash: None,
            game_type: "g".into(),
            mod_hash: None,
            game_start_delay: None,
            mod_options: Default::default(),
            map_options: Default::default(),
            restrictions: Default::default(),
        };
        GameSpecification::new(setup).unwrap()
    }

    #[test]
    fn ids_become_dense_positions() {
        let spec = spec();
        let layout = Layout::new(&spec);

        let players: Vec<_> = layout
            .players
            .iter()
            .map(|s| (s.player.username.as_str(), s.team))
            .collect();
        assert_eq!(
            players,
            vec![("bob", Some(0)), ("carol", None), ("alice", Some(1))]
        );

        let teams: Vec<_> = layout
            .teams
            .iter()
            .map(|s| (s.team.script_id, s.ally_team))
            .collect();
        assert_eq!(teams, vec![(4, 0), (10, 1)]);

        assert_eq!(layout.ais[0].team, 0);
        assert_eq!(layout.player(3), 0);
        assert_eq!(layout.player(7), 2);
    }

    #[test]
    fn dangling_references_are_kept() {
        let spec = spec();
        let layout = Layout::new(&spec);
        assert_eq!(layout.player(42), 42);
    }
}
