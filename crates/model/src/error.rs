use std::fmt;

/// The four kinds of entity that carry a script ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Team,
    AllyTeam,
    Ai,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "player",
            EntityKind::Team => "team",
            EntityKind::AllyTeam => "allyteam",
            EntityKind::Ai => "AI",
        };
        f.write_str(name)
    }
}

/// Errors raised while constructing model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two entities of the same kind share a script ID.
    #[error("duplicate {kind} script ID {script_id}")]
    DuplicateScriptId { kind: EntityKind, script_id: usize },

    /// A start box or chosen start position names an entity the
    /// specification does not contain.
    #[error("start configuration refers to unknown {kind} script ID {script_id}")]
    UnknownStartReference { kind: EntityKind, script_id: usize },

    /// Chosen-before-game starts need a position for every team.
    #[error("team {team} has no chosen start position")]
    MissingStartPosition { team: usize },

    /// A start box outside the 0-200 square or with negative extent.
    #[error("start box for allyteam {ally_team} lies outside the 0-200 axis")]
    StartBoxOutOfRange { ally_team: usize },

    /// A country code string outside the ISO 3166-1 alpha-2 domain.
    #[error("unknown country code \"{0}\"")]
    UnknownCountryCode(String),
}
