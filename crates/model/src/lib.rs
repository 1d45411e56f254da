//! springscript-model: the typed description of a Spring RTS match.
//!
//! These are the values the start-script codec produces when decoding and
//! consumes when encoding. Everything here is immutable, owned data:
//!
//! - [`GameSpecification`] -- validated root aggregate (built from a [`GameSetup`])
//! - [`AllyTeam`], [`Team`], [`Player`], [`Ai`] -- the participant hierarchy
//! - [`HostConfig`] / [`HostType`] -- who hosts the game
//! - [`StartConfig`] / [`StartBox`] / [`Coordinate`] -- start-position policy
//! - [`CountryCode`], [`ServerAddress`] -- small value types consumed as-is

pub mod country;
pub mod error;
pub mod host;
pub mod spec;
pub mod start;

pub use country::CountryCode;
pub use error::{EntityKind, ModelError};
pub use host::{HostConfig, HostType, ServerAddress};
pub use spec::{AllyTeam, Ai, GameSetup, GameSpecification, Player, Team};
pub use start::{Coordinate, StartBox, StartConfig};
