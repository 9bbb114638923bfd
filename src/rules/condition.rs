//! Condition guards inside a behaviour pipeline.

use crate::conditions::{compile, EvalContext, Predicate, PrimitiveRegistry};
use crate::error::EngineError;

use super::action::{ActionHeader, ActionRecord};

/// Registered type name of condition steps.
pub const CONDITION_KIND: &str = "condition";

/// A guard step. It never branches: it keeps or prunes the current branch.
#[derive(Clone, Debug)]
pub struct ConditionStep {
    pub header: ActionHeader,
    /// Source text, kept verbatim for the snapshot.
    pub code: String,
    predicate: Option<Predicate>,
    error: Option<EngineError>,
}

impl ConditionStep {
    /// Compile `code`. Failure is recorded, not returned.
    pub fn compile(header: ActionHeader, code: impl Into<String>, primitives: &PrimitiveRegistry) -> Self {
        let code = code.into();
        let (predicate, error) = match compile(&code, primitives) {
            Ok(predicate) => (Some(predicate), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            header,
            code,
            predicate,
            error,
        }
    }

    /// Build from a snapshot record (`code` field).
    pub fn from_record(record: &ActionRecord, primitives: &PrimitiveRegistry) -> Result<Self, EngineError> {
        let code: String = record.field_or("code", String::new())?;
        Ok(Self::compile(record.header(), code, primitives))
    }

    #[must_use]
    pub fn to_record(&self) -> ActionRecord {
        ActionRecord::new(CONDITION_KIND, &self.header).with_field("code", &self.code)
    }

    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.predicate.is_some()
    }

    /// Why compilation failed, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&EngineError> {
        self.error.as_ref()
    }

    /// Whether the branch may continue. Uncompiled guards always block.
    #[must_use]
    pub fn allows(&self, ctx: &EvalContext<'_>) -> bool {
        self.predicate.as_ref().is_some_and(|p| p.test(ctx))
    }
}
