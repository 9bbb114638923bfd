//! The board model.
//!
//! - [`position`]: squares, board size, seats and frame rotation
//! - [`nation`]: the ownership forest
//! - [`piece`]: pieces, their snapshot form and packages
//! - [`player`], [`monitor`]: seats and per-piece counters
//! - [`state`]: the [`Board`] itself

pub mod monitor;
pub mod nation;
pub mod piece;
pub mod player;
pub mod position;
pub mod state;

pub use monitor::{Monitor, STEP_MONITOR};
pub use nation::{Nation, NationChild, NationChildData, NationData, NationForest, NationKey};
pub use piece::{Package, PackageData, Piece, PieceData};
pub use player::Player;
pub use position::{global_to_local, local_to_global, BoardSize, Coord, Seat};
pub use state::{Board, BoardData, VANILLA_BASIC};
