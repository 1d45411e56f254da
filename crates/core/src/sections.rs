//! The flat section store: every section body reduced to key/value strings,
//! addressed through the closed [`SectionKey`] enumeration.

use crate::error::ScriptError;
use crate::extract::BracketPair;
use std::collections::HashMap;
use std::fmt;
use std::mem;

// ──────────────────────────────────────────────
// Section keys
// ──────────────────────────────────────────────

/// Every kind of section a start script may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    Game,
    ModOptions,
    MapOptions,
    Restrict,
    Player(usize),
    Team(usize),
    AllyTeam(usize),
    Ai(usize),
}

const GAME_KEYS: &[&str] = &[
    "mapname",
    "maphash",
    "modhash",
    "gametype",
    "gamestartdelay",
    "startpostype",
    "myplayername",
    "mypasswd",
    "hosttype",
    "ishost",
    "hostip",
    "hostport",
    "autohostname",
    "autohostport",
    "autohostrank",
    "autohostaccountid",
    "autohostcountrycode",
    "demofile",
    "recorddemo",
    "numplayers",
    "numteams",
    "numallyteams",
    "numrestrictions",
];

const PLAYER_KEYS: &[&str] = &[
    "name",
    "team",
    "accountid",
    "password",
    "skill",
    "rank",
    "countrycode",
    "spectator",
    "isfromdemo",
];

const TEAM_KEYS: &[&str] = &[
    "teamleader",
    "allyteam",
    "rgbcolor",
    "side",
    "handicap",
    "advantage",
    "incomemultiplier",
    "startposx",
    "startposz",
    "luaai",
];

const ALLY_TEAM_KEYS: &[&str] = &[
    "numallies",
    "startrectleft",
    "startrectright",
    "startrecttop",
    "startrectbottom",
];

const AI_KEYS: &[&str] = &["name", "shortname", "host", "team", "version", "isfromdemo"];

impl SectionKey {
    /// Parse a section title, ignoring case. Numbered titles must use plain
    /// decimal without leading zeros (`player10`, not `player010`).
    pub fn parse(title: &str) -> Option<SectionKey> {
        let lower = title.to_ascii_lowercase();
        match lower.as_str() {
            "game" => return Some(SectionKey::Game),
            "modoptions" => return Some(SectionKey::ModOptions),
            "mapoptions" => return Some(SectionKey::MapOptions),
            "restrict" => return Some(SectionKey::Restrict),
            _ => {}
        }
        let numbered: [(&str, fn(usize) -> SectionKey); 4] = [
            ("allyteam", SectionKey::AllyTeam),
            ("player", SectionKey::Player),
            ("team", SectionKey::Team),
            ("ai", SectionKey::Ai),
        ];
        numbered.iter().find_map(|(prefix, make)| {
            let digits = lower.strip_prefix(*prefix)?;
            let n: usize = digits.parse().ok()?;
            (n.to_string() == digits).then(|| make(n))
        })
    }

    /// The keys the engine understands in this section, or `None` for
    /// free-form sections (options and restrictions).
    pub fn known_keys(&self) -> Option<&'static [&'static str]> {
        match self {
            SectionKey::Game => Some(GAME_KEYS),
            SectionKey::Player(_) => Some(PLAYER_KEYS),
            SectionKey::Team(_) => Some(TEAM_KEYS),
            SectionKey::AllyTeam(_) => Some(ALLY_TEAM_KEYS),
            SectionKey::Ai(_) => Some(AI_KEYS),
            SectionKey::ModOptions | SectionKey::MapOptions | SectionKey::Restrict => None,
        }
    }

    /// Same variant, ignoring the section number.
    pub fn same_kind(&self, other: &SectionKey) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl fmt::Display for SectionKey {
    /// The lower-case title the store is keyed by.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKey::Game => f.write_str("game"),
            SectionKey::ModOptions => f.write_str("modoptions"),
            SectionKey::MapOptions => f.write_str("mapoptions"),
            SectionKey::Restrict => f.write_str("restrict"),
            SectionKey::Player(n) => write!(f, "player{}", n),
            SectionKey::Team(n) => write!(f, "team{}", n),
            SectionKey::AllyTeam(n) => write!(f, "allyteam{}", n),
            SectionKey::Ai(n) => write!(f, "ai{}", n),
        }
    }
}

// ──────────────────────────────────────────────
// Typed values
// ──────────────────────────────────────────────

/// A type a raw script value can be read as.
pub trait ScriptValue: Sized {
    /// Reported in [`ScriptError::IncorrectValueType`].
    const TYPE_NAME: &'static str;

    fn parse_value(raw: &str) -> Option<Self>;
}

impl ScriptValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

macro_rules! numeric_script_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl ScriptValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse_value(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

numeric_script_value! {
    i64 => "integer",
    i32 => "integer",
    u32 => "unsigned integer",
    u16 => "port",
    usize => "index",
    f32 => "float",
}

impl ScriptValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse_value(raw: &str) -> Option<Self> {
        match raw {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        }
    }
}

/// The outcome of reading one field: there and well-formed, not there, or
/// there but unparseable. Decoders pick their tolerance per field.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Present(T),
    Absent(ScriptError),
    Malformed(ScriptError),
}

impl<T> Lookup<T> {
    /// Fail on both absence and malformation.
    pub fn required(self) -> Result<T, ScriptError> {
        match self {
            Lookup::Present(value) => Ok(value),
            Lookup::Absent(err) | Lookup::Malformed(err) => Err(err),
        }
    }

    /// Treat both absence and malformation as "not given".
    pub fn optional(self) -> Option<T> {
        match self {
            Lookup::Present(value) => Some(value),
            Lookup::Absent(_) | Lookup::Malformed(_) => None,
        }
    }
}

// ──────────────────────────────────────────────
// Store
// ──────────────────────────────────────────────

/// Lower-cased section title → lower-cased key → trimmed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSections {
    sections: HashMap<String, HashMap<String, String>>,
}

impl ScriptSections {
    /// Build the store from extracted pairs. Pairs nested inside a section
    /// are skipped while reading that section's own arguments.
    pub fn from_pairs(text: &str, pairs: &[BracketPair]) -> Self {
        let mut sections = HashMap::new();
        for pair in pairs {
            let nested: Vec<&BracketPair> = pairs.iter().filter(|o| pair.contains(o)).collect();
            let arguments = read_arguments(text, pair, &nested);
            let title = pair.title.to_ascii_lowercase();

            match SectionKey::parse(&title).map(|key| key.known_keys()) {
                Some(Some(known)) => {
                    for unknown in arguments.keys().filter(|k| !known.contains(&k.as_str())) {
                        tracing::debug!(section = %title, key = %unknown, "ignoring unknown key");
                    }
                }
                Some(None) => {}
                None => tracing::debug!(section = %title, "ignoring unknown section"),
            }

            if sections.insert(title.clone(), arguments).is_some() {
                tracing::debug!(section = %title, "duplicate section replaces earlier one");
            }
        }
        ScriptSections { sections }
    }

    /// Number of sections of the same kind as `like`, e.g.
    /// `count_like(SectionKey::Player(0))` counts every `playerN`.
    pub fn count_like(&self, like: SectionKey) -> usize {
        self.sections
            .keys()
            .filter_map(|title| SectionKey::parse(title))
            .filter(|key| key.same_kind(&like))
            .count()
    }

    pub fn section(&self, section: SectionKey) -> Result<&HashMap<String, String>, ScriptError> {
        self.sections
            .get(&section.to_string())
            .ok_or(ScriptError::MissingSection { section })
    }

    pub fn value(&self, key: &str, section: SectionKey) -> Result<&str, ScriptError> {
        self.section(section)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ScriptError::MissingArgument {
                section,
                key: key.to_owned(),
            })
    }

    pub fn integer(&self, key: &str, section: SectionKey) -> Result<i64, ScriptError> {
        self.lookup(key, section).required()
    }

    pub fn float(&self, key: &str, section: SectionKey) -> Result<f32, ScriptError> {
        self.lookup(key, section).required()
    }

    pub fn game(&self, key: &str) -> Result<&str, ScriptError> {
        self.value(key, SectionKey::Game)
    }

    /// Read `key` from `section` as a `T`, keeping absence and malformation
    /// apart.
    pub fn lookup<T: ScriptValue>(&self, key: &str, section: SectionKey) -> Lookup<T> {
        match self.value(key, section) {
            Err(err) => Lookup::Absent(err),
            Ok(raw) => match T::parse_value(raw) {
                Some(value) => Lookup::Present(value),
                None => Lookup::Malformed(ScriptError::IncorrectValueType {
                    section,
                    key: key.to_owned(),
                    expected: T::TYPE_NAME,
                }),
            },
        }
    }
}

fn find_from(text: &str, from: usize, needle: char) -> Option<usize> {
    text.get(from..)?.find(needle).map(|i| i + from)
}

/// Read `key=value;` arguments between the braces of `pair`.
///
/// A missing `=` or `;` before the closing brace ends the scan. A value
/// running into a nested section is discarded.
fn read_arguments(text: &str, pair: &BracketPair, nested: &[&BracketPair]) -> HashMap<String, String> {
    let mut arguments = HashMap::new();
    let mut cursor = pair.opening + 1;

    loop {
        let Some(eq) = find_from(text, cursor, '=').filter(|&i| i < pair.closing) else {
            break;
        };
        // The key text may not span a nested section: skip past it.
        if let Some(inner) = nested.iter().find(|n| n.opening >= cursor && n.opening < eq) {
            cursor = inner.closing + 1;
            continue;
        }
        let Some(semi) = find_from(text, eq + 1, ';').filter(|&i| i < pair.closing) else {
            break;
        };
        if let Some(inner) = nested.iter().find(|n| n.opening > eq && n.opening < semi) {
            cursor = inner.closing + 1;
            continue;
        }

        let key = text[cursor..eq].trim();
        if !key.is_empty() {
            arguments.insert(
                key.to_ascii_lowercase(),
                text[eq + 1..semi].trim().to_owned(),
            );
        }
        cursor = semi + 1;
    }
    arguments
}
