use super::players::PlayersByTeam;
use super::{fields, Builder};
use crate::error::{DecodeWarning, ScriptError};
use crate::sections::SectionKey;
use springscript_model::{Ai, AllyTeam, Coordinate, Team};
use std::collections::{BTreeMap, HashMap};

/// AIs grouped by the team they control.
pub(super) type AisByTeam = HashMap<usize, Vec<Ai>>;

impl Builder<'_> {
    /// Read `ai0..aiN-1`. There is no declared AI count to check against.
    pub(super) fn ais(&self) -> Result<AisByTeam, ScriptError> {
        let s = self.sections;
        let mut by_team = AisByTeam::new();
        for n in 0..s.count_like(SectionKey::Ai(0)) {
            let section = SectionKey::Ai(n);
            let ai = Ai {
                script_id: n,
                name: fields::AI_NAME.read(s, section)?,
                host_id: fields::AI_HOST.read(s, section)?,
                short_name: fields::AI_SHORT_NAME.read(s, section)?,
                version: fields::AI_VERSION.read(s, section).unwrap_or_default(),
                is_from_demo: fields::AI_IS_FROM_DEMO
                    .read(s, section)
                    .unwrap_or_else(|| self.from_demo()),
            };
            let team = fields::AI_TEAM.read(s, section)?;
            by_team.entry(team).or_default().push(ai);
        }
        Ok(by_team)
    }

    /// Assemble teams from their members, then allyteams from their teams.
    ///
    /// A team naming an allyteam with no section is dropped with an
    /// [`DecodeWarning::OrphanedTeam`]. Members naming a team with no
    /// section are dropped silently.
    pub(super) fn ally_teams(
        &mut self,
        mut players: PlayersByTeam,
        mut ais: AisByTeam,
    ) -> Result<Vec<AllyTeam>, ScriptError> {
        let team_count = self.section_count(SectionKey::Team(0), &fields::NUM_TEAMS);
        let mut teams_by_ally: BTreeMap<usize, Vec<Team>> = BTreeMap::new();

        for n in 0..team_count {
            let ally_team = fields::TEAM_ALLY_TEAM.read(self.sections, SectionKey::Team(n))?;
            let mut team = self.team(n)?;
            team.players = players.remove(&n).unwrap_or_default();
            team.ais = ais.remove(&n).unwrap_or_default();
            teams_by_ally.entry(ally_team).or_default().push(team);
        }

        for team in players.keys().chain(ais.keys()) {
            tracing::debug!(team, "members reference a team with no section");
        }

        let ally_count = self.section_count(SectionKey::AllyTeam(0), &fields::NUM_ALLY_TEAMS);
        let ally_teams = (0..ally_count)
            .map(|n| AllyTeam::new(n, teams_by_ally.remove(&n).unwrap_or_default()))
            .collect();

        for (ally_team, teams) in teams_by_ally {
            for team in teams {
                let warning = DecodeWarning::OrphanedTeam {
                    team: team.script_id,
                    ally_team,
                };
                tracing::warn!(%warning, "dropping orphaned team");
                self.warnings.push(warning);
            }
        }
        Ok(ally_teams)
    }

    fn team(&self, n: usize) -> Result<Team, ScriptError> {
        let section = SectionKey::Team(n);
        let s = self.sections;
        let start_position = match (
            fields::TEAM_START_POS_X.read(s, section),
            fields::TEAM_START_POS_Z.read(s, section),
        ) {
            (Some(x), Some(z)) => Some(Coordinate::new(x, z)),
            _ => None,
        };
        Ok(Team {
            script_id: n,
            leader: fields::TEAM_LEADER.read(s, section)?,
            players: Vec::new(),
            ais: Vec::new(),
            color: fields::TEAM_COLOR.read(s, section).map(|rgb| rgb.0),
            side: fields::TEAM_SIDE.read(s, section),
            handicap: fields::TEAM_HANDICAP.read(s, section).unwrap_or(0),
            advantage: fields::TEAM_ADVANTAGE.read(s, section),
            income_multiplier: fields::TEAM_INCOME_MULTIPLIER.read(s, section),
            start_position,
            lua_ai: fields::TEAM_LUA_AI.read(s, section),
        })
    }
}
