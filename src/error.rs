//! Engine errors and non-fatal load issues.
//!
//! Fallible public operations return [`EngineError`]. Authoring problems that
//! do not stop a snapshot from loading (an unknown action type, a condition
//! that fails to compile) are collected as [`LoadIssue`]s so the editor can
//! surface them as warnings.

use thiserror::Error;

use crate::core::{ActionId, BehaviourId, NationId, PieceId, PlayerId};

/// Errors raised by the engine's public API.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The snapshot text is not valid JSON or does not match the format.
    #[error("invalid board snapshot: {0}")]
    Snapshot(String),

    /// The snapshot loaded but violates a model invariant.
    #[error("board snapshot failed {} integrity check(s)", .0.len())]
    Integrity(Vec<LoadIssue>),

    /// A condition expression failed to parse or compile.
    #[error("condition `{code}` rejected at byte {offset}: {reason}")]
    Compile {
        code: String,
        offset: usize,
        reason: String,
    },

    /// An action record carries a field the factory cannot use.
    #[error("action `{kind}` has invalid field `{field}`: {reason}")]
    InvalidField {
        kind: String,
        field: String,
        reason: String,
    },

    /// No implementation is registered under this action type name.
    #[error("unknown action type `{0}`")]
    UnknownActionType(String),

    /// The process-wide registries were already installed.
    #[error("registries are already installed")]
    RegistryInstalled,

    /// A commit named a candidate the analyzer did not produce.
    #[error("no legal continuation for piece {piece} via behaviour {behaviour} at {indices:?}")]
    IllegalSelection {
        piece: PieceId,
        behaviour: BehaviourId,
        indices: Vec<u16>,
    },

    /// The piece being moved is not controlled by the active player.
    #[error("piece {piece} is not controlled by {player}")]
    NotYourPiece { piece: PieceId, player: PlayerId },

    /// The board has no players to take turns.
    #[error("board has no players")]
    NoPlayers,
}

/// A non-fatal problem found while loading a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadIssue {
    #[error("behaviour {behaviour}: step {action} has unknown type `{kind}` and was left out of the pipeline")]
    UnknownActionType {
        behaviour: BehaviourId,
        action: ActionId,
        kind: String,
    },

    #[error("behaviour {behaviour}: step {action} could not be built: {reason}")]
    InvalidAction {
        behaviour: BehaviourId,
        action: ActionId,
        reason: String,
    },

    #[error("behaviour {behaviour}: condition {action} does not compile and will always block: {reason}")]
    UncompiledCondition {
        behaviour: BehaviourId,
        action: ActionId,
        reason: String,
    },

    #[error("state references missing piece {0}")]
    DanglingState(PieceId),

    #[error("piece {piece} is placed outside the board at ({x}, {y})")]
    OutOfBounds { piece: PieceId, x: i32, y: i32 },

    #[error("pieces {first} and {second} share square ({x}, {y})")]
    SharedSquare {
        first: PieceId,
        second: PieceId,
        x: i32,
        y: i32,
    },

    #[error("piece {0} belongs to more than one nation subtree")]
    MultipleNations(PieceId),

    #[error("nation {nation} references missing piece {piece}")]
    DanglingNationMember { nation: NationId, piece: PieceId },

    #[error("unknown board kind `{0}`")]
    UnknownBoardKind(String),
}
