//! springscript-core: Spring RTS start-script codec.
//!
//! Converts between the engine's bracketed start-script text and the typed
//! [`GameSpecification`] from `springscript-model`.
//!
//! # Public API
//!
//! - [`decode()`] / [`decode_with()`] -- script text to specification
//! - [`encode()`] / [`encode_with()`] -- specification to canonical text
//! - [`LaunchScript`] -- anything the engine can be launched with, including
//!   [`ClientSpecification`] for joining a hosted game
//! - [`ScriptError`] -- decoding error type, [`DecodeWarning`] for non-fatal
//!   inconsistencies
//!
//! The lower layers are public for callers that want the raw sections:
//! [`extract`] finds and checks bracketed sections, [`sections`] holds them as
//! flat key/value maps.

pub mod decode;
pub mod encode;
pub mod error;
pub mod extract;
pub mod sections;
pub mod units;

// ── Convenience re-exports: key types ────────────────────────────────

pub use decode::{DecodeOptions, Decoded};
pub use encode::{ClientSpecification, EncodeOptions, LaunchScript};
pub use error::{DecodeWarning, ScriptError};
pub use sections::{ScriptSections, SectionKey};
pub use springscript_model::{
    Ai, AllyTeam, Coordinate, CountryCode, GameSetup, GameSpecification, HostConfig, HostType,
    ModelError, Player, ServerAddress, StartBox, StartConfig, Team,
};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use decode::{decode, decode_with};
pub use encode::{encode, encode_with};
