use super::{fields, Builder};
use crate::error::ScriptError;
use crate::sections::SectionKey;
use crate::units;
use springscript_model::{AllyTeam, Coordinate, StartBox, StartConfig};
use std::collections::BTreeMap;

impl Builder<'_> {
    /// Select the start mode from `startpostype` and collect its data.
    pub(super) fn start_config(&self, ally_teams: &[AllyTeam]) -> Result<StartConfig, ScriptError> {
        let Some(kind) = fields::START_POS_TYPE.read(self.sections, SectionKey::Game) else {
            return Ok(StartConfig::Unspecified);
        };
        match kind {
            0 => Ok(StartConfig::Fixed),
            1 => Ok(StartConfig::Random),
            2 => Ok(StartConfig::ChooseInGame {
                start_boxes: self.start_boxes(ally_teams),
            }),
            3 => Ok(StartConfig::ChooseBeforeGame {
                start_positions: self.start_positions(ally_teams)?,
            }),
            other => Err(ScriptError::InvalidValue {
                section: SectionKey::Game,
                key: fields::START_POS_TYPE.key.to_owned(),
                value: other.to_string(),
            }),
        }
    }

    /// Boxes for every allyteam carrying all four rectangle edges. An
    /// allyteam with a missing, malformed or off-map edge simply has no box.
    fn start_boxes(&self, ally_teams: &[AllyTeam]) -> BTreeMap<usize, StartBox> {
        let s = self.sections;
        ally_teams
            .iter()
            .filter_map(|ally| {
                let section = SectionKey::AllyTeam(ally.script_id);
                let Some(start_box) = units::start_box_from_rect(
                    fields::START_RECT_LEFT.read(s, section)?,
                    fields::START_RECT_TOP.read(s, section)?,
                    fields::START_RECT_RIGHT.read(s, section)?,
                    fields::START_RECT_BOTTOM.read(s, section)?,
                ) else {
                    tracing::debug!(ally_team = ally.script_id, "ignoring start rectangle outside the map");
                    return None;
                };
                Some((ally.script_id, start_box))
            })
            .collect()
    }

    /// Chosen positions for every assembled team; each must carry both
    /// coordinates.
    fn start_positions(
        &self,
        ally_teams: &[AllyTeam],
    ) -> Result<BTreeMap<usize, Coordinate>, ScriptError> {
        let s = self.sections;
        ally_teams
            .iter()
            .flat_map(|ally| &ally.teams)
            .map(|team| {
                let section = SectionKey::Team(team.script_id);
                let x = fields::CHOSEN_START_POS_X.read(s, section)?;
                let z = fields::CHOSEN_START_POS_Z.read(s, section)?;
                Ok((team.script_id, Coordinate::new(x, z)))
            })
            .collect()
    }
}
