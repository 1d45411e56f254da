use super::{fields, Builder};
use crate::error::ScriptError;
use crate::sections::SectionKey;
use springscript_model::{CountryCode, Player};
use std::collections::HashMap;

/// Players grouped by the team they play on.
pub(super) type PlayersByTeam = HashMap<usize, Vec<Player>>;

impl Builder<'_> {
    /// Read `player0..playerN-1`, splitting spectators from team players.
    pub(super) fn players(&mut self) -> Result<(Vec<Player>, PlayersByTeam), ScriptError> {
        let count = self.section_count(SectionKey::Player(0), &fields::NUM_PLAYERS);
        let mut spectators = Vec::new();
        let mut by_team = PlayersByTeam::new();

        for n in 0..count {
            let section = SectionKey::Player(n);
            let player = self.player(n)?;
            let spectator = fields::PLAYER_SPECTATOR
                .read(self.sections, section)
                .unwrap_or(0);
            match spectator {
                0 => {
                    let team = fields::PLAYER_TEAM.read(self.sections, section)?;
                    by_team.entry(team).or_default().push(player);
                }
                1 => spectators.push(player),
                other => {
                    return Err(ScriptError::InvalidValue {
                        section,
                        key: fields::PLAYER_SPECTATOR.key.to_owned(),
                        value: other.to_string(),
                    })
                }
            }
        }
        Ok((spectators, by_team))
    }

    fn player(&self, n: usize) -> Result<Player, ScriptError> {
        let section = SectionKey::Player(n);
        let s = self.sections;
        Ok(Player {
            script_id: n,
            user_id: fields::PLAYER_ACCOUNT_ID.read(s, section),
            username: fields::PLAYER_NAME.read(s, section)?,
            script_password: fields::PLAYER_PASSWORD.read(s, section),
            skill: fields::PLAYER_SKILL.read(s, section),
            rank: fields::PLAYER_RANK.read(s, section),
            country_code: fields::PLAYER_COUNTRY_CODE
                .read(s, section)
                .and_then(|raw| country_code(&raw)),
            is_from_demo: fields::PLAYER_IS_FROM_DEMO
                .read(s, section)
                .unwrap_or_else(|| self.from_demo()),
        })
    }
}

/// Lobby country codes arrive in any case; unknown codes (e.g. `??`) are
/// treated as absent.
pub(super) fn country_code(raw: &str) -> Option<CountryCode> {
    raw.to_ascii_uppercase().parse().ok()
}

#[cfg(test)]
mod tests {
    use crate::decode::{decode, decode_with, DecodeOptions};
    use crate::error::{DecodeWarning, ScriptError};
    use crate::sections::SectionKey;
    use springscript_model::CountryCode;

    fn script(players: &str, extra_game: &str) -> String {
        format!(
            "[GAME]\n{{\nmapname=m;\ngametype=g;\nmyplayername=alice;\n{}\n\
             [TEAM0]\n{{\nteamleader=0;\nallyteam=0;\n}}\n\
             [ALLYTEAM0]\n{{\n}}\n{}\n}}",
            extra_game, players
        )
    }

    const ALICE: &str = "[PLAYER0]\n{\nname=alice;\nteam=0;\naccountid=42;\nrank=3;\ncountrycode=nz;\nskill=(25);\npassword=pw;\n}";
    const BOB_SPEC: &str = "[PLAYER1]\n{\nname=bob;\nspectator=1;\n}";

    #[test]
    fn splits_spectators_from_team_players() {
        let spec = decode(&script(&format!("{}\n{}", ALICE, BOB_SPEC), "")).unwrap();
        let team = &spec.ally_teams()[0].teams[0];
        assert_eq!(team.players.len(), 1);
        let alice = &team.players[0];
        assert_eq!(alice.username, "alice");
        assert_eq!(alice.user_id, Some(42));
        assert_eq!(alice.rank, Some(3));
        assert_eq!(alice.country_code, Some(CountryCode::NZ));
        assert_eq!(alice.skill.as_deref(), Some("(25)"));
        assert_eq!(alice.script_password.as_deref(), Some("pw"));
        assert!(!alice.is_from_demo);

        assert_eq!(spec.spectators().len(), 1);
        assert_eq!(spec.spectators()[0].username, "bob");
        assert_eq!(spec.spectators()[0].script_id, 1);
    }

    #[test]
    fn unknown_country_code_and_bad_rank_are_absent() {
        let p = "[PLAYER0]\n{\nname=alice;\nteam=0;\ncountrycode=??;\nrank=high;\n}";
        let spec = decode(&script(p, "")).unwrap();
        let alice = &spec.ally_teams()[0].teams[0].players[0];
        assert_eq!(alice.country_code, None);
        assert_eq!(alice.rank, None);
    }

    #[test]
    fn player_without_name_aborts() {
        let p = "[PLAYER0]\n{\nteam=0;\n}";
        let err = decode(&script(p, "")).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingArgument {
                section: SectionKey::Player(0),
                key: "name".to_owned()
            }
        );
    }

    #[test]
    fn non_spectator_without_team_aborts() {
        let p = "[PLAYER0]\n{\nname=alice;\n}";
        let err = decode(&script(p, "")).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingArgument {
                section: SectionKey::Player(0),
                key: "team".to_owned()
            }
        );
    }

    #[test]
    fn spectator_flag_outside_zero_one_is_invalid() {
        let p = "[PLAYER0]\n{\nname=alice;\nspectator=2;\n}";
        let err = decode(&script(p, "")).unwrap_err();
        assert_eq!(
            err,
            ScriptError::InvalidValue {
                section: SectionKey::Player(0),
                key: "spectator".to_owned(),
                value: "2".to_owned()
            }
        );
    }

    #[test]
    fn declared_player_count_mismatch_is_a_warning() {
        let decoded = decode_with(
            &script(&format!("{}\n{}", ALICE, BOB_SPEC), "numplayers=3;"),
            &DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(decoded.specification.players().count(), 2);
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::CountMismatch {
                key: "numplayers",
                declared: 3,
                found: 2
            }]
        );
    }

    #[test]
    fn replay_decode_marks_players_from_demo() {
        let decoded = decode_with(
            &script(&format!("{}\n{}", ALICE, BOB_SPEC), ""),
            &DecodeOptions::from_demo("match.sdfz"),
        )
        .unwrap();
        assert!(decoded.specification.players().all(|p| p.is_from_demo));
    }

    #[test]
    fn explicit_is_from_demo_key_wins() {
        let p = "[PLAYER0]\n{\nname=alice;\nteam=0;\nisfromdemo=1;\n}";
        let spec = decode(&script(p, "")).unwrap();
        assert!(spec.ally_teams()[0].teams[0].players[0].is_from_demo);
    }
}
