//! The action contract.
//!
//! An [`Action`] is one branching step of a behaviour. Given the board under
//! consideration, the deltas accumulated so far and the acting piece, it
//! returns zero or more [`Branch`]es; each branch is a full new delta set
//! plus the description tags the UI uses to highlight squares.
//!
//! Actions are stored in snapshots as [`ActionRecord`]s: a small header
//! (`name`, `type`, `uuid`) plus whatever fields the action type defines.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Piece};
use crate::core::ActionId;
use crate::error::EngineError;

use super::delta::DeltaSet;

/// What a branch does at its highlighted square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescKind {
    Move,
    Attack,
    MoveAttack,
}

/// A highlight tag attached to a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescTag {
    pub kind: DescKind,
    pub square: Coord,
}

impl DescTag {
    #[must_use]
    pub const fn new(kind: DescKind, square: Coord) -> Self {
        Self { kind, square }
    }
}

/// One alternative produced by an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    /// The complete delta set for this alternative.
    pub deltas: DeltaSet,
    /// Description tags added by this step.
    pub descs: Vec<DescTag>,
}

impl Branch {
    #[must_use]
    pub fn new(deltas: DeltaSet, descs: Vec<DescTag>) -> Self {
        Self { deltas, descs }
    }
}

/// A branching rule step.
///
/// Implementations must be pure: the same inputs always give the same
/// branches in the same order.
pub trait Action: Send + Sync + std::fmt::Debug {
    /// Registered type name (e.g. `vanilla.move`).
    fn kind(&self) -> &str;

    /// Display name and identity.
    fn header(&self) -> &ActionHeader;

    /// Expand the current branch.
    fn step(&self, board: &Board, deltas: &DeltaSet, piece: &Piece) -> Vec<Branch>;

    /// Snapshot form of this action.
    fn to_record(&self) -> ActionRecord;
}

/// Name and identity shared by every step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionHeader {
    pub name: String,
    pub id: ActionId,
}

impl ActionHeader {
    pub fn new(name: impl Into<String>, id: impl Into<ActionId>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Snapshot form of a step: header plus type-specific fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "uuid", default)]
    pub id: ActionId,

    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ActionRecord {
    pub fn new(kind: impl Into<String>, header: &ActionHeader) -> Self {
        Self {
            name: header.name.clone(),
            kind: kind.into(),
            id: header.id.clone(),
            fields: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn header(&self) -> ActionHeader {
        ActionHeader::new(self.name.clone(), self.id.clone())
    }

    /// Set a field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.fields.insert(key.to_string(), value);
        }
        self
    }

    /// Read an optional typed field.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, EngineError> {
        match self.fields.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| EngineError::InvalidField {
                    kind: self.kind.clone(),
                    field: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Read a typed field, falling back to `default` when absent.
    pub fn field_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, EngineError> {
        Ok(self.field(key)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_form() {
        let json = r#"{"name":"slide","type":"vanilla.move","uuid":"a1","loop":true,"stepPosition":[[1,1]]}"#;
        let record: ActionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "vanilla.move");
        assert_eq!(record.id, ActionId::new("a1"));
        assert_eq!(record.field::<bool>("loop").unwrap(), Some(true));
        assert_eq!(record.field::<Vec<Coord>>("stepPosition").unwrap(), Some(vec![Coord::new(1, 1)]));
        assert_eq!(record.field_or("loopLimit", 0u32).unwrap(), 0);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["loop"], true);
        assert_eq!(back["type"], "vanilla.move");
    }

    #[test]
    fn test_bad_field_type_is_reported() {
        let record = ActionRecord::new("vanilla.move", &ActionHeader::default())
            .with_field("loop", "yes");
        let err = record.field::<bool>("loop").unwrap_err();
        assert!(matches!(err, EngineError::InvalidField { ref field, .. } if field == "loop"));
    }
}
