//! State deltas accumulated while a piece's behaviour is searched.
//!
//! A delta set is an ordered list holding at most one delta per symbol.
//! Symbols are enum tags rather than string keys, so nothing an author
//! types into a design can collide with them.
//!
//! ## Merge rules
//!
//! [`merge_state`] folds a newer list into an older set:
//! - a symbol already present is overwritten in place
//! - `Attack` is the exception: captured ids are appended
//! - new symbols are appended in the order they arrive
//!
//! ```
//! use rust_piecework::board::Coord;
//! use rust_piecework::core::PieceId;
//! use rust_piecework::rules::{merge_state, Delta, DeltaSet};
//!
//! let older = DeltaSet::from(vec![
//!     Delta::Position(Coord::new(0, 0)),
//!     Delta::Attack(vec![PieceId::new("a")]),
//! ]);
//! let merged = merge_state(&older, &[
//!     Delta::Attack(vec![PieceId::new("b")]),
//!     Delta::Position(Coord::new(1, 1)),
//! ]);
//!
//! assert_eq!(merged.position(), Some(Coord::new(1, 1)));
//! assert_eq!(merged.attacked(), &[PieceId::new("a"), PieceId::new("b")]);
//! ```

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::core::{PieceId, PlayerId};

/// The slot a delta occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeltaSymbol {
    /// The piece's tentative square.
    Position,
    /// The square highlighted for the player; may differ from Position.
    Cell,
    /// Pieces captured by this branch.
    Attack,
    /// A player eliminated by this branch.
    Lose,
}

/// One symbolic state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    Position(Coord),
    Cell(Coord),
    Attack(Vec<PieceId>),
    Lose(PlayerId),
}

impl Delta {
    #[must_use]
    pub fn symbol(&self) -> DeltaSymbol {
        match self {
            Delta::Position(_) => DeltaSymbol::Position,
            Delta::Cell(_) => DeltaSymbol::Cell,
            Delta::Attack(_) => DeltaSymbol::Attack,
            Delta::Lose(_) => DeltaSymbol::Lose,
        }
    }
}

/// Ordered deltas with one slot per symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSet(Vec<Delta>);

impl DeltaSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a single newer delta into this set.
    pub fn merge(&mut self, delta: Delta) {
        let symbol = delta.symbol();
        match self.0.iter_mut().find(|d| d.symbol() == symbol) {
            Some(Delta::Attack(existing)) => {
                if let Delta::Attack(more) = delta {
                    existing.extend(more);
                }
            }
            Some(slot) => *slot = delta,
            None => self.0.push(delta),
        }
    }

    #[must_use]
    pub fn get(&self, symbol: DeltaSymbol) -> Option<&Delta> {
        self.0.iter().find(|d| d.symbol() == symbol)
    }

    #[must_use]
    pub fn position(&self) -> Option<Coord> {
        match self.get(DeltaSymbol::Position) {
            Some(Delta::Position(c)) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn cell(&self) -> Option<Coord> {
        match self.get(DeltaSymbol::Cell) {
            Some(Delta::Cell(c)) => Some(*c),
            _ => None,
        }
    }

    /// Captured piece ids, oldest first.
    #[must_use]
    pub fn attacked(&self) -> &[PieceId] {
        match self.get(DeltaSymbol::Attack) {
            Some(Delta::Attack(ids)) => ids,
            _ => &[],
        }
    }

    #[must_use]
    pub fn lose(&self) -> Option<&PlayerId> {
        match self.get(DeltaSymbol::Lose) {
            Some(Delta::Lose(p)) => Some(p),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Delta> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Delta>> for DeltaSet {
    fn from(deltas: Vec<Delta>) -> Self {
        let mut set = Self::new();
        for delta in deltas {
            set.merge(delta);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DeltaSet {
    type Item = &'a Delta;
    type IntoIter = std::slice::Iter<'a, Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merge `newer` into a copy of `older`.
#[must_use]
pub fn merge_state(older: &DeltaSet, newer: &[Delta]) -> DeltaSet {
    let mut merged = older.clone();
    for delta in newer {
        merged.merge(delta.clone());
    }
    merged
}
