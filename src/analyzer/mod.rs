//! Turn analysis.
//!
//! - [`search`]: behaviour search per piece and reaction chaining
//! - [`step_desc`]: search nodes, selections and attack records
//! - [`commit`]: applying a chosen candidate
//! - [`turn`]: rounds, eliminations and the win check

pub mod commit;
pub mod search;
pub mod step_desc;
pub mod turn;

pub use commit::{commit, CommitResult};
pub use search::{Analysis, Analyzer, Phase};
pub use step_desc::{AttackRecord, Selection, StepDesc, StepMeta};
pub use turn::{Session, TurnReport};
