//! Decoding: script text → [`GameSpecification`].
//!
//! The pipeline is extract → check hierarchy → flat store → build. The
//! builder reads participants bottom-up (players and AIs first, then teams,
//! then allyteams) and finishes with host and start-position inference.

mod fields;
mod host;
mod players;
mod start;
mod teams;

use crate::error::{DecodeWarning, ScriptError};
use crate::extract;
use crate::sections::{ScriptSections, SectionKey};
use serde::{Deserialize, Serialize};
use springscript_model::{GameSetup, GameSpecification};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Settings for a decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Set when the script was taken from a replay. Becomes the
    /// specification's demo file and the default `is_from_demo` flag.
    #[serde(default)]
    pub demo_file: Option<PathBuf>,
}

impl DecodeOptions {
    pub fn from_demo(path: impl Into<PathBuf>) -> Self {
        DecodeOptions {
            demo_file: Some(path.into()),
        }
    }
}

/// A decoded specification with the warnings noticed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub specification: GameSpecification,
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a start script with default options.
pub fn decode(script: &str) -> Result<GameSpecification, ScriptError> {
    decode_with(script, &DecodeOptions::default()).map(|d| d.specification)
}

/// Decode a start script, returning the warnings alongside the result.
pub fn decode_with(script: &str, options: &DecodeOptions) -> Result<Decoded, ScriptError> {
    let pairs = extract::find_bracket_pairs(script)?;
    extract::check_hierarchy(&pairs)?;
    let sections = ScriptSections::from_pairs(script, &pairs);
    tracing::debug!(sections = pairs.len(), "extracted script sections");
    Builder::new(&sections, options).build()
}

// ──────────────────────────────────────────────
// Builder
// ──────────────────────────────────────────────

struct Builder<'a> {
    sections: &'a ScriptSections,
    options: &'a DecodeOptions,
    warnings: Vec<DecodeWarning>,
}

impl<'a> Builder<'a> {
    fn new(sections: &'a ScriptSections, options: &'a DecodeOptions) -> Self {
        Builder {
            sections,
            options,
            warnings: Vec::new(),
        }
    }

    fn build(mut self) -> Result<Decoded, ScriptError> {
        let (spectators, players_by_team) = self.players()?;
        let ais_by_team = self.ais()?;
        let ally_teams = self.ally_teams(players_by_team, ais_by_team)?;

        let host = self.host(&ally_teams, &spectators)?;
        let start = self.start_config(&ally_teams)?;

        let game = SectionKey::Game;
        let sections = self.sections;
        let setup = GameSetup {
            ally_teams,
            spectators,
            demo_file: self.demo_file(),
            host,
            start,
            map_name: fields::MAP_NAME.read(sections, game)?,
            map_hash: fields::MAP_HASH.read(sections, game).map(|c| c.0),
            game_type: fields::GAME_TYPE.read(sections, game)?,
            mod_hash: fields::MOD_HASH.read(sections, game).map(|c| c.0),
            game_start_delay: fields::GAME_START_DELAY.read(sections, game),
            mod_options: self.options_section(SectionKey::ModOptions),
            map_options: self.options_section(SectionKey::MapOptions),
            restrictions: self.restrictions()?,
        };

        let specification = GameSpecification::new(setup)?;
        tracing::debug!(
            ally_teams = specification.ally_teams().len(),
            players = specification.players().count(),
            warnings = self.warnings.len(),
            "decoded start script"
        );
        Ok(Decoded {
            specification,
            warnings: self.warnings,
        })
    }

    fn from_demo(&self) -> bool {
        self.options.demo_file.is_some()
    }

    fn demo_file(&self) -> Option<PathBuf> {
        self.options.demo_file.clone().or_else(|| {
            fields::DEMO_FILE
                .read(self.sections, SectionKey::Game)
                .map(PathBuf::from)
        })
    }

    /// Count the `like` sections present, warning if `GAME` declares a
    /// different number. The observed count always wins.
    fn section_count(&mut self, like: SectionKey, declared_key: &fields::Optional<i64>) -> usize {
        let found = self.sections.count_like(like);
        if let Some(declared) = declared_key.read(self.sections, SectionKey::Game) {
            if usize::try_from(declared).map_or(true, |d| d != found) {
                let warning = DecodeWarning::CountMismatch {
                    key: declared_key.key,
                    declared,
                    found,
                };
                tracing::warn!(%warning, "section count mismatch");
                self.warnings.push(warning);
            }
        }
        found
    }

    fn options_section(&self, section: SectionKey) -> BTreeMap<String, String> {
        self.sections
            .section(section)
            .map(|values| {
                values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `numrestrictions` pairs of `limit{i}`/`unit{i}`. A missing count means
    /// no restrictions; a pair missing within the count is an error.
    fn restrictions(&self) -> Result<BTreeMap<String, u32>, ScriptError> {
        let count = fields::NUM_RESTRICTIONS
            .read(self.sections, SectionKey::Game)
            .unwrap_or(0);
        let mut restrictions = BTreeMap::new();
        for i in 0..count {
            let limit = fields::RESTRICTION_LIMIT.read(self.sections, SectionKey::Restrict, i)?;
            let unit = fields::RESTRICTION_UNIT.read(self.sections, SectionKey::Restrict, i)?;
            restrictions.insert(unit, limit);
        }
        Ok(restrictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "[GAME]\n{\nmapname=Map;\ngametype=Game;\nmyplayername=Host;\n";

    fn script(body: &str) -> String {
        format!("{}{}\n}}", MINIMAL, body)
    }

    #[test]
    fn minimal_script_decodes() {
        let spec = decode(&script("")).unwrap();
        assert_eq!(spec.map_name(), "Map");
        assert_eq!(spec.game_type(), "Game");
        assert!(spec.ally_teams().is_empty());
        assert!(spec.restrictions().is_empty());
        assert!(spec.mod_options().is_empty());
        assert_eq!(spec.map_hash(), None);
    }

    #[test]
    fn missing_map_name_aborts() {
        let err = decode("[GAME]{gametype=g;myplayername=h;}").unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingArgument {
                section: SectionKey::Game,
                key: "mapname".to_owned()
            }
        );
    }

    #[test]
    fn missing_game_section() {
        let err = decode("[PLAYER0]{name=a;}").unwrap_err();
        assert!(err.is_absence());
    }

    #[test]
    fn optional_game_fields_tolerate_garbage() {
        let spec = decode(&script("maphash=abc;modhash=-5;gamestartdelay=-1;")).unwrap();
        assert_eq!(spec.map_hash(), None);
        assert_eq!(spec.mod_hash(), Some(-5));
        assert_eq!(spec.game_start_delay(), None);
    }

    #[test]
    fn restrictions_pair_up() {
        let spec = decode(&script(
            "numrestrictions=2;\n[RESTRICT]\n{\nlimit0=5;\nunit0=armcom;\nlimit1=10;\nunit1=coreaak;\n}",
        ))
        .unwrap();
        let expected: BTreeMap<String, u32> =
            [("armcom".to_owned(), 5), ("coreaak".to_owned(), 10)].into();
        assert_eq!(spec.restrictions(), &expected);
    }

    #[test]
    fn restriction_count_beyond_pairs_is_an_error() {
        let err = decode(&script(
            "numrestrictions=3;\n[RESTRICT]\n{\nlimit0=5;\nunit0=armcom;\nlimit1=10;\nunit1=coreaak;\n}",
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingArgument {
                section: SectionKey::Restrict,
                key: "limit2".to_owned()
            }
        );
    }

    #[test]
    fn options_sections_are_copied() {
        let spec = decode(&script(
            "[MODOPTIONS]\n{\nstartmetal=1000;\n}\n[MAPOPTIONS]\n{\nwaterlevel=low;\n}",
        ))
        .unwrap();
        assert_eq!(spec.mod_options()["startmetal"], "1000");
        assert_eq!(spec.map_options()["waterlevel"], "low");
    }

    #[test]
    fn demo_file_from_options_or_script() {
        let decoded = decode_with(&script(""), &DecodeOptions::from_demo("/tmp/a.sdfz")).unwrap();
        assert_eq!(
            decoded.specification.demo_file(),
            Some(std::path::Path::new("/tmp/a.sdfz"))
        );

        let spec = decode(&script("demofile=/tmp/b.sdfz;")).unwrap();
        assert_eq!(spec.demo_file(), Some(std::path::Path::new("/tmp/b.sdfz")));
    }
}
