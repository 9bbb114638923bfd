//! Core engine types: identities, RNG, configuration.
//!
//! This module contains the building blocks that know nothing about boards
//! or rules. Games configure the engine via `EngineConfig` and `BoardKind`
//! rather than modifying the core.

pub mod entity;
pub mod rng;
pub mod config;

pub use entity::{ActionId, BehaviourId, DesignId, NationId, PieceId, PlayerId, UserId, NIL_ID};
pub use rng::{GameRng, GameRngState};
pub use config::{BoardKind, EngineConfig};
