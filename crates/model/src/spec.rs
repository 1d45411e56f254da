//! The participant hierarchy and the validated root aggregate.

use crate::country::CountryCode;
use crate::error::{EntityKind, ModelError};
use crate::host::HostConfig;
use crate::start::StartConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

// ── Participants ─────────────────────────────────────────────────────

/// A human player that will control units of a team, or spectate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique among players within one specification.
    pub script_id: usize,
    /// Lobby account ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u32>,
    pub username: String,
    /// Password the client sends on its connect attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_password: Option<String>,
    /// Opaque skill display value (e.g. a TrueSkill string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<CountryCode>,
    /// True when the player was reconstructed from a replay.
    #[serde(default)]
    pub is_from_demo: bool,
}

impl Player {
    pub fn new(script_id: usize, username: impl Into<String>) -> Self {
        Player {
            script_id,
            user_id: None,
            username: username.into(),
            script_password: None,
            skill: None,
            rank: None,
            country_code: None,
            is_from_demo: false,
        }
    }
}

/// An AI controlling the units of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ai {
    /// Unique among AIs within one specification.
    pub script_id: usize,
    pub name: String,
    /// Script ID of the player whose client runs the AI.
    pub host_id: usize,
    /// Short name as reported by unitsync.
    pub short_name: String,
    /// Version as reported by unitsync.
    pub version: String,
    #[serde(default)]
    pub is_from_demo: bool,
}

/// A single set of units and resources, controlled by players and/or AIs.
///
/// AIs are normally alone on their team; nothing enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique among teams within one specification. This is the team
    /// number, independent of the team's position inside its allyteam.
    pub script_id: usize,
    /// Script ID of the leading player.
    pub leader: usize,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub ais: Vec<Ai>,
    /// `0xRRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Faction, e.g. "Arm" or "Core".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Legacy resource bonus in percent; superseded by `advantage`.
    #[serde(default)]
    pub handicap: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advantage: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_multiplier: Option<f32>,
    /// Start position in map units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_position: Option<crate::start::Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lua_ai: Option<String>,
}

impl Team {
    pub fn new(script_id: usize, leader: usize) -> Self {
        Team {
            script_id,
            leader,
            players: Vec::new(),
            ais: Vec::new(),
            color: None,
            side: None,
            handicap: 0,
            advantage: None,
            income_multiplier: None,
            start_position: None,
            lua_ai: None,
        }
    }
}

/// A group of allied teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllyTeam {
    /// Unique among allyteams within one specification.
    pub script_id: usize,
    pub teams: Vec<Team>,
}

impl AllyTeam {
    pub fn new(script_id: usize, teams: Vec<Team>) -> Self {
        AllyTeam { script_id, teams }
    }
}

// ── Root aggregate ───────────────────────────────────────────────────

/// The unvalidated parts of a [`GameSpecification`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSetup {
    pub ally_teams: Vec<AllyTeam>,
    #[serde(default)]
    pub spectators: Vec<Player>,
    /// Replay this specification was reconstructed from, or should play back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_file: Option<PathBuf>,
    pub host: HostConfig,
    #[serde(default)]
    pub start: StartConfig,
    pub map_name: String,
    /// Unitsync checksum of the map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_hash: Option<i32>,
    /// Primary mod name, rapid tag or archive name.
    pub game_type: String,
    /// Unitsync checksum of the game archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_hash: Option<i32>,
    /// Seconds to wait once all players are in-game and ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_start_delay: Option<u32>,
    #[serde(default)]
    pub mod_options: BTreeMap<String, String>,
    #[serde(default)]
    pub map_options: BTreeMap<String, String>,
    /// Unit name to maximum count.
    #[serde(default)]
    pub restrictions: BTreeMap<String, u32>,
}

/// A validated description of how the engine should create a game.
///
/// Built with [`GameSpecification::new`], which rejects duplicate script IDs
/// within each entity kind, rejects start boxes and chosen positions that do
/// not match the participants, and sorts every list by script ID, so two
/// specifications describing the same game compare equal regardless of the
/// order their parts were supplied in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSetup", into = "GameSetup")]
pub struct GameSpecification {
    setup: GameSetup,
}

impl GameSpecification {
    pub fn new(mut setup: GameSetup) -> Result<Self, ModelError> {
        canonicalize(&mut setup);
        check_unique(
            EntityKind::AllyTeam,
            setup.ally_teams.iter().map(|a| a.script_id),
        )?;
        check_unique(
            EntityKind::Team,
            setup
                .ally_teams
                .iter()
                .flat_map(|a| &a.teams)
                .map(|t| t.script_id),
        )?;
        check_unique(
            EntityKind::Player,
            setup
                .ally_teams
                .iter()
                .flat_map(|a| &a.teams)
                .flat_map(|t| &t.players)
                .chain(&setup.spectators)
                .map(|p| p.script_id),
        )?;
        check_unique(
            EntityKind::Ai,
            setup
                .ally_teams
                .iter()
                .flat_map(|a| &a.teams)
                .flat_map(|t| &t.ais)
                .map(|ai| ai.script_id),
        )?;
        check_start(&mut setup)?;
        Ok(GameSpecification { setup })
    }

    /// Give back the parts, e.g. to build a modified specification.
    pub fn into_setup(self) -> GameSetup {
        self.setup
    }

    pub fn setup(&self) -> &GameSetup {
        &self.setup
    }

    pub fn ally_teams(&self) -> &[AllyTeam] {
        &self.setup.ally_teams
    }

    pub fn spectators(&self) -> &[Player] {
        &self.setup.spectators
    }

    pub fn demo_file(&self) -> Option<&Path> {
        self.setup.demo_file.as_deref()
    }

    pub fn host(&self) -> &HostConfig {
        &self.setup.host
    }

    pub fn start(&self) -> &StartConfig {
        &self.setup.start
    }

    pub fn map_name(&self) -> &str {
        &self.setup.map_name
    }

    pub fn map_hash(&self) -> Option<i32> {
        self.setup.map_hash
    }

    pub fn game_type(&self) -> &str {
        &self.setup.game_type
    }

    pub fn mod_hash(&self) -> Option<i32> {
        self.setup.mod_hash
    }

    pub fn game_start_delay(&self) -> Option<u32> {
        self.setup.game_start_delay
    }

    pub fn mod_options(&self) -> &BTreeMap<String, String> {
        &self.setup.mod_options
    }

    pub fn map_options(&self) -> &BTreeMap<String, String> {
        &self.setup.map_options
    }

    pub fn restrictions(&self) -> &BTreeMap<String, u32> {
        &self.setup.restrictions
    }

    /// Every team, in allyteam order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.setup.ally_teams.iter().flat_map(|a| &a.teams)
    }

    /// Every non-spectating player, paired with the team they play on.
    pub fn team_players(&self) -> impl Iterator<Item = (&Team, &Player)> {
        self.teams()
            .flat_map(|t| t.players.iter().map(move |p| (t, p)))
    }

    /// Every player, spectators included.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.team_players()
            .map(|(_, p)| p)
            .chain(&self.setup.spectators)
    }

    /// Every AI, paired with the team it controls.
    pub fn ais(&self) -> impl Iterator<Item = (&Team, &Ai)> {
        self.teams().flat_map(|t| t.ais.iter().map(move |ai| (t, ai)))
    }
}

impl TryFrom<GameSetup> for GameSpecification {
    type Error = ModelError;

    fn try_from(setup: GameSetup) -> Result<Self, Self::Error> {
        GameSpecification::new(setup)
    }
}

impl From<GameSpecification> for GameSetup {
    fn from(spec: GameSpecification) -> Self {
        spec.setup
    }
}

fn canonicalize(setup: &mut GameSetup) {
    setup.ally_teams.sort_by_key(|a| a.script_id);
    for ally in &mut setup.ally_teams {
        ally.teams.sort_by_key(|t| t.script_id);
        for team in &mut ally.teams {
            team.players.sort_by_key(|p| p.script_id);
            team.ais.sort_by_key(|ai| ai.script_id);
        }
    }
    setup.spectators.sort_by_key(|p| p.script_id);
}

/// Every start box must belong to an allyteam and lie on the 0-200 axis.
/// Chosen-before-game positions must cover exactly the teams, and each
/// team's own start position is replaced by its chosen one.
fn check_start(setup: &mut GameSetup) -> Result<(), ModelError> {
    match &setup.start {
        StartConfig::ChooseInGame { start_boxes } => {
            for (&ally_team, start_box) in start_boxes {
                if !setup.ally_teams.iter().any(|a| a.script_id == ally_team) {
                    return Err(ModelError::UnknownStartReference {
                        kind: EntityKind::AllyTeam,
                        script_id: ally_team,
                    });
                }
                if !start_box.is_within_scale() {
                    return Err(ModelError::StartBoxOutOfRange { ally_team });
                }
            }
        }
        StartConfig::ChooseBeforeGame { start_positions } => {
            let team_ids: HashSet<usize> = setup
                .ally_teams
                .iter()
                .flat_map(|a| &a.teams)
                .map(|t| t.script_id)
                .collect();
            if let Some(&script_id) = start_positions.keys().find(|id| !team_ids.contains(id)) {
                return Err(ModelError::UnknownStartReference {
                    kind: EntityKind::Team,
                    script_id,
                });
            }
            for team in setup.ally_teams.iter_mut().flat_map(|a| &mut a.teams) {
                let position = start_positions
                    .get(&team.script_id)
                    .ok_or(ModelError::MissingStartPosition {
                        team: team.script_id,
                    })?;
                team.start_position = Some(*position);
            }
        }
        StartConfig::Fixed | StartConfig::Random | StartConfig::Unspecified => {}
    }
    Ok(())
}

fn check_unique(kind: EntityKind, ids: impl Iterator<Item = usize>) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for script_id in ids {
        if !seen.insert(script_id) {
            return Err(ModelError::DuplicateScriptId { kind, script_id });
        }
    }
    Ok(())
}
