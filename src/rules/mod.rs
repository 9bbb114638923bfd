//! Rule steps and how they compose.
//!
//! A piece's rules are [`Behaviour`]s: ordered pipelines of branching
//! [`Action`]s and non-branching [`ConditionStep`] guards. Actions never
//! touch the board; they return [`Branch`]es carrying [`Delta`]s that the
//! analyzer later applies to a hypothetical board.
//!
//! Step types are looked up by name in an [`ActionRegistry`]. The engine
//! ships three: `condition`, `vanilla.move` and `vanilla.lose`.

pub mod action;
pub mod behaviour;
pub mod condition;
pub mod delta;
pub mod lose;
pub mod movement;
pub mod registry;

pub use action::{Action, ActionHeader, ActionRecord, Branch, DescKind, DescTag};
pub use behaviour::{Behaviour, BehaviourData, BehaviourType, Step};
pub use condition::{ConditionStep, CONDITION_KIND};
pub use delta::{merge_state, Delta, DeltaSet, DeltaSymbol};
pub use lose::{LoseAction, LOSE_KIND};
pub use movement::{MoveAction, MoveMask, MOVE_KIND};
pub use registry::{ActionInfo, ActionRegistry, FormItem, FormItemKind, StepFactory};
