//! Encoding: [`GameSpecification`] → start-script text.
//!
//! Output is canonical: a single `GAME` section holding `RESTRICT`,
//! `MODOPTIONS`, `MAPOPTIONS`, then `PLAYERn`, `TEAMn`, `ALLYTEAMn` and `AIn`
//! in positional order, keys sorted within each section. Encoding the same
//! specification twice gives identical text.

mod layout;
mod section;

use crate::sections::SectionKey;
use crate::units::{box_axis_to_fraction, Rgb};
use layout::Layout;
use section::WritableSection;
use serde::{Deserialize, Serialize};
use springscript_model::{GameSpecification, HostType, StartConfig};

/// Settings for an encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Ask the engine to record a replay (`recorddemo`).
    #[serde(default)]
    pub record_demo: bool,
}

/// Anything the engine can be launched with.
pub trait LaunchScript {
    fn launch_script(&self, options: &EncodeOptions) -> String;
}

impl LaunchScript for GameSpecification {
    fn launch_script(&self, options: &EncodeOptions) -> String {
        encode_with(self, options)
    }
}

/// Encode with default options.
pub fn encode(spec: &GameSpecification) -> String {
    encode_with(spec, &EncodeOptions::default())
}

pub fn encode_with(spec: &GameSpecification, options: &EncodeOptions) -> String {
    let layout = Layout::new(spec);
    let mut game = game_section(spec, &layout, options);

    game.push_child(restrict_section(spec));
    let mut mod_options = WritableSection::new(SectionKey::ModOptions);
    mod_options.extend(spec.mod_options());
    game.push_child(mod_options);
    let mut map_options = WritableSection::new(SectionKey::MapOptions);
    map_options.extend(spec.map_options());
    game.push_child(map_options);

    for (n, slot) in layout.players.iter().enumerate() {
        let p = slot.player;
        let mut section = WritableSection::new(SectionKey::Player(n));
        section
            .set("name", &p.username)
            .set_flag("isfromdemo", p.is_from_demo)
            .set_flag("spectator", slot.team.is_none())
            .set_opt("team", slot.team)
            .set_opt("accountid", p.user_id)
            .set_opt("password", p.script_password.as_ref())
            .set_opt("rank", p.rank)
            .set_opt("skill", p.skill.as_ref())
            .set_opt("countrycode", p.country_code);
        game.push_child(section);
    }

    // Chosen-before-game positions are already copied onto their teams.
    for (n, slot) in layout.teams.iter().enumerate() {
        let t = slot.team;
        let position = t.start_position.as_ref();
        let mut section = WritableSection::new(SectionKey::Team(n));
        section
            .set("teamleader", layout.player(t.leader))
            .set("allyteam", slot.ally_team)
            .set("handicap", t.handicap)
            .set_opt("rgbcolor", t.color.map(|c| Rgb(c).to_script()))
            .set_opt("side", t.side.as_ref())
            .set_opt("advantage", t.advantage)
            .set_opt("incomemultiplier", t.income_multiplier)
            .set_opt("startposx", position.map(|c| c.x))
            .set_opt("startposz", position.map(|c| c.z))
            .set_opt("luaai", t.lua_ai.as_ref());
        game.push_child(section);
    }

    let boxes = match spec.start() {
        StartConfig::ChooseInGame { start_boxes } => Some(start_boxes),
        _ => None,
    };
    for (n, ally) in layout.ally_teams.iter().enumerate() {
        let mut section = WritableSection::new(SectionKey::AllyTeam(n));
        section.set("numallies", 0);
        if let Some(b) = boxes.and_then(|boxes| boxes.get(&ally.script_id)) {
            section
                .set("startrectleft", box_axis_to_fraction(b.x))
                .set("startrecttop", box_axis_to_fraction(b.y))
                .set("startrectright", box_axis_to_fraction(b.right()))
                .set("startrectbottom", box_axis_to_fraction(b.bottom()));
        }
        game.push_child(section);
    }

    for (n, slot) in layout.ais.iter().enumerate() {
        let ai = slot.ai;
        let mut section = WritableSection::new(SectionKey::Ai(n));
        section
            .set("name", &ai.name)
            .set("host", layout.player(ai.host_id))
            .set_flag("isfromdemo", ai.is_from_demo)
            .set("team", slot.team)
            .set("shortname", &ai.short_name)
            .set("version", &ai.version);
        game.push_child(section);
    }

    let mut out = String::new();
    game.render(&mut out, 0);
    tracing::debug!(
        players = layout.players.len(),
        teams = layout.teams.len(),
        ally_teams = layout.ally_teams.len(),
        ais = layout.ais.len(),
        "encoded start script"
    );
    out
}

fn game_section(spec: &GameSpecification, layout: &Layout<'_>, options: &EncodeOptions) -> WritableSection {
    let host = spec.host();
    let mut game = WritableSection::new(SectionKey::Game);
    game.set("mapname", spec.map_name())
        .set("gametype", spec.game_type())
        .set("myplayername", &host.username)
        .set("ishost", 1)
        .set_flag("recorddemo", options.record_demo)
        .set_opt("maphash", spec.map_hash())
        .set_opt("modhash", spec.mod_hash())
        .set_opt("gamestartdelay", spec.game_start_delay())
        .set_opt("startpostype", spec.start().start_pos_type())
        .set_opt("demofile", spec.demo_file().map(|path| path.display()))
        .set("numplayers", layout.players.len())
        .set("numteams", layout.teams.len())
        .set("numallyteams", layout.ally_teams.len())
        .set("numrestrictions", spec.restrictions().len());

    if let Some(address) = &host.address {
        game.set("hostip", &address.location)
            .set("hostport", address.port);
    }
    match &host.host_type {
        HostType::User { lobby_name } => {
            game.set("hosttype", lobby_name);
        }
        HostType::Autohost { program_name, port } => {
            game.set("hosttype", program_name)
                .set("autohostname", &host.username)
                .set("autohostport", port)
                .set_opt("autohostaccountid", host.user_id)
                .set_opt("autohostrank", host.rank)
                .set_opt("autohostcountrycode", host.country_code);
        }
    }
    game
}

fn restrict_section(spec: &GameSpecification) -> WritableSection {
    let mut section = WritableSection::new(SectionKey::Restrict);
    for (i, (unit, limit)) in spec.restrictions().iter().enumerate() {
        section
            .set(&format!("unit{}", i), unit)
            .set(&format!("limit{}", i), limit);
    }
    section
}

// ──────────────────────────────────────────────
// Client scripts
// ──────────────────────────────────────────────

/// What a client needs to join a game hosted elsewhere. The engine fetches
/// the full specification from the host once connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSpecification {
    pub ip: String,
    pub port: u16,
    pub username: String,
    pub script_password: String,
}

impl LaunchScript for ClientSpecification {
    fn launch_script(&self, options: &EncodeOptions) -> String {
        let mut game = WritableSection::new(SectionKey::Game);
        game.set("hostip", &self.ip)
            .set("hostport", self.port)
            .set("myplayername", &self.username)
            .set("mypasswd", &self.script_password)
            .set_flag("recorddemo", options.record_demo);
        let mut out = String::new();
        game.render(&mut out, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use springscript_model::{
        AllyTeam, CountryCode, Coordinate, GameSetup, HostConfig, Player, ServerAddress,
        StartBox, Team,
    };
    use std::collections::BTreeMap;

    fn setup() -> GameSetup {
        let mut team = Team::new(0, 0);
        team.players = vec![Player::new(0, "alice")];
        team.color = Some(0xFF0080);
        GameSetup {
            ally_teams: vec![AllyTeam::new(0, vec![team])],
            spectators: vec![],
            demo_file: None,
            host: HostConfig {
                user_id: None,
                username: "alice".into(),
                host_type: HostType::User {
                    lobby_name: "Lobby".into(),
                },
                address: Some(ServerAddress::new("127.0.0.1", 8452)),
                rank: None,
                country_code: None,
            },
            start: StartConfig::Unspecified,
            map_name: "Comet Catcher".into(),
            map_hash: Some(-12),
            game_type: "BA".into(),
            mod_hash: None,
            game_start_delay: Some(4),
            mod_options: BTreeMap::new(),
            map_options: BTreeMap::new(),
            restrictions: BTreeMap::new(),
        }
    }

    fn encoded(setup: GameSetup) -> String {
        encode(&GameSpecification::new(setup).unwrap())
    }

    #[test]
    fn game_header_keys() {
        let text = encoded(setup());
        assert!(text.starts_with("[GAME]\n{\n"));
        assert!(text.ends_with("}\n"));
        for line in [
            "\tmapname=Comet Catcher;",
            "\tgametype=BA;",
            "\tmyplayername=alice;",
            "\thosttype=Lobby;",
            "\tishost=1;",
            "\trecorddemo=0;",
            "\thostip=127.0.0.1;",
            "\thostport=8452;",
            "\tmaphash=-12;",
            "\tgamestartdelay=4;",
            "\tnumplayers=1;",
            "\tnumteams=1;",
            "\tnumallyteams=1;",
            "\tnumrestrictions=0;",
        ] {
            assert!(text.lines().any(|l| l == line), "missing {:?} in\n{}", line, text);
        }
        assert!(!text.contains("modhash"));
        assert!(!text.contains("startpostype"));
        assert!(!text.contains("autohost"));
    }

    #[test]
    fn sections_come_in_canonical_order() {
        let text = encoded(setup());
        let titles: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with('['))
            .collect();
        assert_eq!(
            titles,
            vec![
                "[GAME]",
                "[RESTRICT]",
                "[MODOPTIONS]",
                "[MAPOPTIONS]",
                "[PLAYER0]",
                "[TEAM0]",
                "[ALLYTEAM0]"
            ]
        );
    }

    #[test]
    fn team_colour_and_handicap() {
        let text = encoded(setup());
        assert!(text.contains("\t\trgbcolor=1 0 0.5019608;\n"), "{}", text);
        assert!(text.contains("\t\thandicap=0;\n"));
        assert!(text.contains("\t\tteamleader=0;\n"));
    }

    #[test]
    fn restrictions_are_numbered_in_key_order() {
        let mut setup = setup();
        setup.restrictions = [("corcom".to_owned(), 0), ("armcom".to_owned(), 1)].into();
        let text = encoded(setup);
        assert!(text.contains("\tnumrestrictions=2;\n"));
        assert!(text.contains("\t\tunit0=armcom;\n\t\tunit1=corcom;\n"), "{}", text);
        assert!(text.contains("\t\tlimit0=1;\n\t\tlimit1=0;\n"));
    }

    #[test]
    fn autohost_keys() {
        let mut setup = setup();
        setup.host = HostConfig {
            user_id: Some(99),
            username: "HostBot".into(),
            host_type: HostType::Autohost {
                program_name: "SPADS".into(),
                port: 8454,
            },
            address: None,
            rank: Some(3),
            country_code: Some(CountryCode::FR),
        };
        let text = encoded(setup);
        for line in [
            "\thosttype=SPADS;",
            "\tautohostname=HostBot;",
            "\tautohostport=8454;",
            "\tautohostaccountid=99;",
            "\tautohostrank=3;",
            "\tautohostcountrycode=FR;",
            "\tmyplayername=HostBot;",
        ] {
            assert!(text.lines().any(|l| l == line), "missing {:?} in\n{}", line, text);
        }
    }

    #[test]
    fn start_boxes_and_positions() {
        let mut boxed = setup();
        boxed.start = StartConfig::ChooseInGame {
            start_boxes: [(0, StartBox::new(50, 0, 50, 200))].into(),
        };
        let text = encoded(boxed);
        assert!(text.contains("\tstartpostype=2;\n"));
        assert!(text.contains("\t\tstartrectleft=0.25;\n"));
        assert!(text.contains("\t\tstartrectright=0.5;\n"));
        assert!(text.contains("\t\tstartrectbottom=1;\n"));
        assert!(text.contains("\t\tstartrecttop=0;\n"));

        let mut chosen = setup();
        chosen.ally_teams[0].teams[0].start_position = Some(Coordinate::new(1, 2));
        chosen.start = StartConfig::ChooseBeforeGame {
            start_positions: [(0, Coordinate::new(300, 400))].into(),
        };
        let text = encoded(chosen);
        assert!(text.contains("\t\tstartposx=300;\n"));
        assert!(text.contains("\t\tstartposz=400;\n"));
    }

    #[test]
    fn start_data_follows_renumbered_owners() {
        let mut red = Team::new(9, 0);
        red.players = vec![Player::new(0, "alice")];
        let mut blue = Team::new(4, 1);
        blue.players = vec![Player::new(1, "bob")];
        let mut sparse = setup();
        sparse.ally_teams = vec![AllyTeam::new(7, vec![red]), AllyTeam::new(3, vec![blue])];
        sparse.start = StartConfig::ChooseInGame {
            start_boxes: [(7, StartBox::new(0, 150, 200, 50))].into(),
        };
        let decoded = crate::decode::decode(&encoded(sparse.clone())).unwrap();
        assert_eq!(
            decoded.start(),
            &StartConfig::ChooseInGame {
                start_boxes: [(1, StartBox::new(0, 150, 200, 50))].into()
            }
        );

        sparse.start = StartConfig::ChooseBeforeGame {
            start_positions: [(9, Coordinate::new(100, 200)), (4, Coordinate::new(300, 400))]
                .into(),
        };
        let decoded = crate::decode::decode(&encoded(sparse)).unwrap();
        assert_eq!(
            decoded.start(),
            &StartConfig::ChooseBeforeGame {
                start_positions: [(0, Coordinate::new(300, 400)), (1, Coordinate::new(100, 200))]
                    .into()
            }
        );
    }

    #[test]
    fn record_demo_option() {
        let spec = GameSpecification::new(setup()).unwrap();
        let text = spec.launch_script(&EncodeOptions { record_demo: true });
        assert!(text.contains("\trecorddemo=1;\n"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let spec = GameSpecification::new(setup()).unwrap();
        assert_eq!(encode(&spec), encode(&spec));
    }

    #[test]
    fn client_script_has_only_a_game_section() {
        let client = ClientSpecification {
            ip: "10.0.0.2".into(),
            port: 8452,
            username: "bob".into(),
            script_password: "secret".into(),
        };
        let text = client.launch_script(&EncodeOptions::default());
        assert_eq!(
            text,
            "[GAME]\n{\n\thostip=10.0.0.2;\n\thostport=8452;\n\tmypasswd=secret;\n\
             \tmyplayername=bob;\n\trecorddemo=0;\n}\n"
        );
    }
}
