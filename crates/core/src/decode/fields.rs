//! Field table: every key the decoder reads, with its type and tolerance.
//!
//! A [`Required`] field aborts the decode when absent or malformed. An
//! [`Optional`] field turns either case into "not given". The same key can
//! appear twice when the mode being decoded changes its tolerance
//! (`startposx` is optional in general but required for
//! chosen-before-game starts).

use crate::error::ScriptError;
use crate::sections::{ScriptSections, ScriptValue, SectionKey};
use crate::units::{Checksum, Rgb};
use std::marker::PhantomData;

pub(crate) struct Required<T> {
    pub key: &'static str,
    _value: PhantomData<fn() -> T>,
}

pub(crate) struct Optional<T> {
    pub key: &'static str,
    _value: PhantomData<fn() -> T>,
}

/// A required `{prefix}{index}` field, as used by restriction pairs.
pub(crate) struct Indexed<T> {
    pub prefix: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: ScriptValue> Required<T> {
    const fn new(key: &'static str) -> Self {
        Required {
            key,
            _value: PhantomData,
        }
    }

    pub fn read(&self, sections: &ScriptSections, section: SectionKey) -> Result<T, ScriptError> {
        sections.lookup(self.key, section).required()
    }
}

impl<T: ScriptValue> Optional<T> {
    const fn new(key: &'static str) -> Self {
        Optional {
            key,
            _value: PhantomData,
        }
    }

    pub fn read(&self, sections: &ScriptSections, section: SectionKey) -> Option<T> {
        let lookup = sections.lookup(self.key, section);
        if let crate::sections::Lookup::Malformed(err) = &lookup {
            tracing::debug!(%err, "ignoring malformed optional value");
        }
        lookup.optional()
    }
}

impl<T: ScriptValue> Indexed<T> {
    const fn new(prefix: &'static str) -> Self {
        Indexed {
            prefix,
            _value: PhantomData,
        }
    }

    pub fn read(
        &self,
        sections: &ScriptSections,
        section: SectionKey,
        index: usize,
    ) -> Result<T, ScriptError> {
        sections
            .lookup(&format!("{}{}", self.prefix, index), section)
            .required()
    }
}

// ── GAME ─────────────────────────────────────────────────────────────

pub(crate) const MAP_NAME: Required<String> = Required::new("mapname");
pub(crate) const GAME_TYPE: Required<String> = Required::new("gametype");
/// Required only when the host is not an autohost.
pub(crate) const MY_PLAYER_NAME: Required<String> = Required::new("myplayername");
pub(crate) const MAP_HASH: Optional<Checksum> = Optional::new("maphash");
pub(crate) const MOD_HASH: Optional<Checksum> = Optional::new("modhash");
pub(crate) const GAME_START_DELAY: Optional<u32> = Optional::new("gamestartdelay");
pub(crate) const START_POS_TYPE: Optional<i64> = Optional::new("startpostype");
pub(crate) const DEMO_FILE: Optional<String> = Optional::new("demofile");
pub(crate) const HOST_IP: Optional<String> = Optional::new("hostip");
pub(crate) const HOST_PORT: Optional<u16> = Optional::new("hostport");
pub(crate) const HOST_TYPE: Optional<String> = Optional::new("hosttype");
pub(crate) const AUTOHOST_NAME: Optional<String> = Optional::new("autohostname");
pub(crate) const AUTOHOST_PORT: Optional<u16> = Optional::new("autohostport");
pub(crate) const AUTOHOST_RANK: Optional<u32> = Optional::new("autohostrank");
pub(crate) const AUTOHOST_ACCOUNT_ID: Optional<u32> = Optional::new("autohostaccountid");
pub(crate) const AUTOHOST_COUNTRY_CODE: Optional<String> = Optional::new("autohostcountrycode");
pub(crate) const NUM_PLAYERS: Optional<i64> = Optional::new("numplayers");
pub(crate) const NUM_TEAMS: Optional<i64> = Optional::new("numteams");
pub(crate) const NUM_ALLY_TEAMS: Optional<i64> = Optional::new("numallyteams");
pub(crate) const NUM_RESTRICTIONS: Optional<usize> = Optional::new("numrestrictions");

// ── PLAYERn ──────────────────────────────────────────────────────────

pub(crate) const PLAYER_NAME: Required<String> = Required::new("name");
/// Required only for non-spectators.
pub(crate) const PLAYER_TEAM: Required<usize> = Required::new("team");
pub(crate) const PLAYER_ACCOUNT_ID: Optional<u32> = Optional::new("accountid");
pub(crate) const PLAYER_PASSWORD: Optional<String> = Optional::new("password");
pub(crate) const PLAYER_SKILL: Optional<String> = Optional::new("skill");
pub(crate) const PLAYER_RANK: Optional<u32> = Optional::new("rank");
pub(crate) const PLAYER_COUNTRY_CODE: Optional<String> = Optional::new("countrycode");
/// Absent or malformed reads as 0 (playing).
pub(crate) const PLAYER_SPECTATOR: Optional<i64> = Optional::new("spectator");
pub(crate) const PLAYER_IS_FROM_DEMO: Optional<bool> = Optional::new("isfromdemo");

// ── TEAMn ────────────────────────────────────────────────────────────

pub(crate) const TEAM_LEADER: Required<usize> = Required::new("teamleader");
pub(crate) const TEAM_ALLY_TEAM: Required<usize> = Required::new("allyteam");
pub(crate) const TEAM_COLOR: Optional<Rgb> = Optional::new("rgbcolor");
pub(crate) const TEAM_SIDE: Optional<String> = Optional::new("side");
/// Absent or malformed reads as 0.
pub(crate) const TEAM_HANDICAP: Optional<i32> = Optional::new("handicap");
pub(crate) const TEAM_ADVANTAGE: Optional<f32> = Optional::new("advantage");
pub(crate) const TEAM_INCOME_MULTIPLIER: Optional<f32> = Optional::new("incomemultiplier");
pub(crate) const TEAM_START_POS_X: Optional<i32> = Optional::new("startposx");
pub(crate) const TEAM_START_POS_Z: Optional<i32> = Optional::new("startposz");
pub(crate) const TEAM_LUA_AI: Optional<String> = Optional::new("luaai");
/// `startposx`/`startposz` once `startpostype=3` has been selected.
pub(crate) const CHOSEN_START_POS_X: Required<i32> = Required::new("startposx");
pub(crate) const CHOSEN_START_POS_Z: Required<i32> = Required::new("startposz");

// ── AIn ──────────────────────────────────────────────────────────────

pub(crate) const AI_NAME: Required<String> = Required::new("name");
pub(crate) const AI_SHORT_NAME: Required<String> = Required::new("shortname");
pub(crate) const AI_HOST: Required<usize> = Required::new("host");
pub(crate) const AI_TEAM: Required<usize> = Required::new("team");
/// Absent reads as an empty version.
pub(crate) const AI_VERSION: Optional<String> = Optional::new("version");
pub(crate) const AI_IS_FROM_DEMO: Optional<bool> = Optional::new("isfromdemo");

// ── ALLYTEAMn ────────────────────────────────────────────────────────

pub(crate) const START_RECT_LEFT: Optional<f32> = Optional::new("startrectleft");
pub(crate) const START_RECT_TOP: Optional<f32> = Optional::new("startrecttop");
pub(crate) const START_RECT_RIGHT: Optional<f32> = Optional::new("startrectright");
pub(crate) const START_RECT_BOTTOM: Optional<f32> = Optional::new("startrectbottom");

// ── RESTRICT ─────────────────────────────────────────────────────────

pub(crate) const RESTRICTION_LIMIT: Indexed<u32> = Indexed::new("limit");
pub(crate) const RESTRICTION_UNIT: Indexed<String> = Indexed::new("unit");
