//! Action-type registry.
//!
//! Maps a step's `type` name to the factory that builds it and to the form
//! fields the authoring UI renders for it. The engine applies whatever
//! values the UI stores in those fields.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::conditions::PrimitiveRegistry;
use crate::error::EngineError;

use super::action::ActionRecord;
use super::behaviour::Step;
use super::condition::{ConditionStep, CONDITION_KIND};
use super::lose::{LoseAction, LOSE_KIND};
use super::movement::{MoveAction, MOVE_KIND};

/// Builds a step from its record.
pub type StepFactory = fn(&ActionRecord, &PrimitiveRegistry) -> Result<Step, EngineError>;

/// Editor widget for one configurable field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormItemKind {
    Number { min: i64, max: Option<i64> },
    /// Exactly one of the named values.
    Enum { items: Vec<(String, i64)> },
    /// Any combination of the named bits.
    Mask { items: Vec<(String, i64)> },
    Switch,
    /// A custom editor, identified by name.
    Other { editor: String },
}

/// One configurable field of an action type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormItem {
    pub name: String,
    #[serde(rename = "propName")]
    pub prop_name: String,
    pub kind: FormItemKind,
}

impl FormItem {
    pub fn new(name: impl Into<String>, prop_name: impl Into<String>, kind: FormItemKind) -> Self {
        Self {
            name: name.into(),
            prop_name: prop_name.into(),
            kind,
        }
    }
}

/// A registered action type.
#[derive(Clone, Debug)]
pub struct ActionInfo {
    pub kind: String,
    pub factory: StepFactory,
    pub fields: Vec<FormItem>,
}

/// Registry of action types.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    types: FxHashMap<String, ActionInfo>,
    order: Vec<String>,
}

impl ActionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `condition`, `vanilla.move` and `vanilla.lose`.
    #[must_use]
    pub fn with_vanilla() -> Self {
        let mut registry = Self::new();
        registry.register(CONDITION_KIND, build_condition, vec![FormItem::new(
            "condition code",
            "code",
            FormItemKind::Other {
                editor: "condition-code".into(),
            },
        )]);
        registry.register(MOVE_KIND, build_move, MoveAction::form_items());
        registry.register(LOSE_KIND, build_lose, Vec::new());
        registry
    }

    /// Register an action type.
    ///
    /// # Panics
    ///
    /// Panics if the type name is already registered.
    pub fn register(&mut self, kind: impl Into<String>, factory: StepFactory, fields: Vec<FormItem>) {
        let kind = kind.into();
        assert!(!self.types.contains_key(&kind), "action type `{kind}` already registered");
        self.order.push(kind.clone());
        self.types.insert(kind.clone(), ActionInfo { kind, factory, fields });
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&ActionInfo> {
        self.types.get(kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.types.contains_key(kind)
    }

    /// Build the step a record describes.
    pub fn build(&self, record: &ActionRecord, primitives: &PrimitiveRegistry) -> Result<Step, EngineError> {
        let info = self
            .get(&record.kind)
            .ok_or_else(|| EngineError::UnknownActionType(record.kind.clone()))?;
        (info.factory)(record, primitives)
    }

    /// Action types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionInfo> {
        self.order.iter().filter_map(|kind| self.types.get(kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn build_condition(record: &ActionRecord, primitives: &PrimitiveRegistry) -> Result<Step, EngineError> {
    Ok(Step::Condition(Arc::new(ConditionStep::from_record(record, primitives)?)))
}

fn build_move(record: &ActionRecord, _: &PrimitiveRegistry) -> Result<Step, EngineError> {
    Ok(Step::Action(Arc::new(MoveAction::from_record(record)?)))
}

fn build_lose(record: &ActionRecord, _: &PrimitiveRegistry) -> Result<Step, EngineError> {
    Ok(Step::Action(Arc::new(LoseAction::from_record(record))))
}
