use crate::sections::SectionKey;
use springscript_model::ModelError;
use std::fmt;

/// A start-script decoding error. All variants abort the current decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// A structural delimiter was required but not found. `position` is the
    /// byte offset the search started from or failed at.
    #[error("expected character '{character}' (byte {position})")]
    ExpectedCharacter { character: char, position: usize },

    /// A character appeared where only a section body may follow.
    #[error("unexpected character '{character}' (byte {position})")]
    UnexpectedCharacter { character: char, position: usize },

    /// The section tree does not have the `GAME` → flat children shape.
    #[error("incorrect format: {reason}")]
    IncorrectFormat { reason: String },

    #[error("missing script section \"{section}\"")]
    MissingSection { section: SectionKey },

    #[error("missing value for script argument \"{key}\" in section \"{section}\"")]
    MissingArgument { section: SectionKey, key: String },

    #[error(
        "invalid value type for script argument \"{key}\" in section \"{section}\"; expected type \"{expected}\""
    )]
    IncorrectValueType {
        section: SectionKey,
        key: String,
        expected: &'static str,
    },

    /// The value parsed but lies outside the accepted set.
    #[error("invalid value \"{value}\" for script argument \"{key}\" in section \"{section}\"")]
    InvalidValue {
        section: SectionKey,
        key: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ScriptError {
    pub fn expected(character: char, position: usize) -> Self {
        ScriptError::ExpectedCharacter {
            character,
            position,
        }
    }

    pub fn format(reason: impl Into<String>) -> Self {
        ScriptError::IncorrectFormat {
            reason: reason.into(),
        }
    }

    /// True for errors that mean "the value is not there", as opposed to
    /// "the value is there but wrong".
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            ScriptError::MissingSection { .. } | ScriptError::MissingArgument { .. }
        )
    }
}

/// A non-fatal inconsistency noticed while decoding. The decode result is
/// still produced; the observed data wins over declared counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A `num*` key in `GAME` disagrees with the sections actually present.
    CountMismatch {
        key: &'static str,
        declared: i64,
        found: usize,
    },
    /// A team names an allyteam with no section of its own and was dropped.
    OrphanedTeam { team: usize, ally_team: usize },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::CountMismatch {
                key,
                declared,
                found,
            } => write!(
                f,
                "value {} for key \"{}\" does not match the {} sections present",
                declared, key, found
            ),
            DecodeWarning::OrphanedTeam { team, ally_team } => write!(
                f,
                "team {} belongs to undeclared allyteam {} and was dropped",
                team, ally_team
            ),
        }
    }
}
