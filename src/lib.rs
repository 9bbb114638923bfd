//! # rust-piecework
//!
//! A composable rule engine for turn-based, chess-like board games.
//!
//! ## Design Principles
//!
//! 1. **Rules as Data**: Pieces carry behaviours, and behaviours are
//!    pipelines of registered step types. Nothing about chess is hardcoded;
//!    the vanilla pack is just the set of steps the engine ships with.
//!
//! 2. **Seat-Relative Authoring**: Moves and conditions are written in the
//!    owner's frame. The engine rotates them into the global frame for up to
//!    four seats.
//!
//! 3. **Hypothetical Boards**: Analysis never mutates the live board. Every
//!    candidate carries its own board, which is cheap to clone via `im-rs`.
//!
//! ## Architecture
//!
//! - Actions return branches of [`rules::Delta`]s; the analyzer applies them.
//! - Passive reactions of other pieces are chained behind each candidate, so
//!   a capture can end in an elimination.
//! - [`analyzer::Session`] runs rounds, eliminates stuck players and
//!   reports wins and checks.
//!
//! ## Modules
//!
//! - `core`: identities, RNG, configuration
//! - `board`: coordinates, seats, nations, pieces and the [`Board`]
//! - `conditions`: the condition expression language
//! - `rules`: actions, conditions and behaviours
//! - `analyzer`: search, reactions, commit and turn control
//! - `registry`: the process-wide action, primitive and board-kind tables
//!
//! ```
//! use rust_piecework::{Analyzer, Board, Behaviour, BehaviourType, Coord, MoveAction, Nation, Phase, Piece, Player};
//! use rust_piecework::rules::ActionHeader;
//! use rust_piecework::core::PieceId;
//!
//! let mut board = Board::new("demo", 8, 8);
//! board.add_player(Player::new("white", 1));
//! board.add_piece(
//!     Piece::new("rook", "rook").with_behaviour(
//!         Behaviour::new("slide", "slide", BehaviourType::Initiative)
//!             .with_action(MoveAction::new(ActionHeader::default()).sliding().with_steps([(0, 1)])),
//!     ),
//!     Some(Coord::new(0, 0)),
//! );
//! let root = board.nations_mut().add_root(Nation::new("w", "white").with_monarch("white"));
//! board.nations_mut().add_piece(root, PieceId::new("rook"));
//!
//! let analysis = Analyzer::default().analyze(&board, Phase::Initiative);
//! assert_eq!(analysis.candidate_count(), 7);
//! ```

pub mod analyzer;
pub mod board;
pub mod conditions;
pub mod core;
pub mod error;
pub mod registry;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    ActionId, BehaviourId, DesignId, NationId, PieceId, PlayerId, UserId,
    GameRng, GameRngState,
    BoardKind, EngineConfig,
};

pub use crate::board::{
    Board, BoardData, BoardSize, Coord, Seat,
    Nation, NationForest, Piece, PieceData, Player, Monitor,
    global_to_local, local_to_global,
};

pub use crate::conditions::{compile, EvalContext, Predicate, PrimitiveRegistry, Value};

pub use crate::rules::{
    Action, ActionRecord, ActionRegistry, Behaviour, BehaviourType, Branch,
    ConditionStep, Delta, DeltaSet, LoseAction, MoveAction, MoveMask, merge_state,
};

pub use crate::analyzer::{
    commit, Analysis, Analyzer, CommitResult, Phase, Selection, Session, StepDesc, TurnReport,
};

pub use crate::error::{EngineError, LoadIssue};
pub use crate::registry::Registries;
