//! Behaviours: ordered pipelines of actions and condition guards.
//!
//! A behaviour is loaded from its snapshot record with a best-effort
//! policy. Steps whose type is not registered, or whose fields cannot be
//! used, are kept as [`Step::Unresolved`] so the snapshot round-trips, but
//! they are left out of the executable pipeline and reported as
//! [`LoadIssue`]s.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::conditions::PrimitiveRegistry;
use crate::core::{ActionId, BehaviourId, GameRng};
use crate::error::{EngineError, LoadIssue};

use super::action::{Action, ActionRecord};
use super::condition::ConditionStep;
use super::registry::ActionRegistry;

/// When a behaviour fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviourType {
    /// Only as a reaction to another piece's move.
    Passive,
    /// As the mover's own forced follow-up sub-step.
    Immediately,
    /// The player's chosen primary move.
    #[default]
    Initiative,
}

impl std::fmt::Display for BehaviourType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BehaviourType::Passive => "Passive",
            BehaviourType::Immediately => "Immediately",
            BehaviourType::Initiative => "Initiative",
        };
        f.write_str(name)
    }
}

/// One pipeline step.
#[derive(Clone, Debug)]
pub enum Step {
    Action(Arc<dyn Action>),
    Condition(Arc<ConditionStep>),
    /// A record no registered factory could build.
    Unresolved(ActionRecord),
}

impl Step {
    #[must_use]
    pub fn to_record(&self) -> ActionRecord {
        match self {
            Step::Action(action) => action.to_record(),
            Step::Condition(condition) => condition.to_record(),
            Step::Unresolved(record) => record.clone(),
        }
    }

    #[must_use]
    pub fn is_executable(&self) -> bool {
        !matches!(self, Step::Unresolved(_))
    }
}

/// A named, ordered pipeline with a firing class.
#[derive(Clone, Debug)]
pub struct Behaviour {
    pub id: BehaviourId,
    pub name: String,
    pub kind: BehaviourType,
    steps: Vec<Step>,
}

impl Behaviour {
    pub fn new(id: impl Into<BehaviourId>, name: impl Into<String>, kind: BehaviourType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            steps: Vec::new(),
        }
    }

    /// Append an action step (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: impl Action + 'static) -> Self {
        self.steps.push(Step::Action(Arc::new(action)));
        self
    }

    /// Append a condition guard (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: ConditionStep) -> Self {
        self.steps.push(Step::Condition(Arc::new(condition)));
        self
    }

    /// Every step, unresolved ones included.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The steps the analyzer runs.
    #[must_use]
    pub fn pipeline(&self) -> Vec<&Step> {
        self.steps.iter().filter(|s| s.is_executable()).collect()
    }

    /// Build from a snapshot record, collecting problems into `issues`.
    pub fn from_data(
        data: &BehaviourData,
        actions: &ActionRegistry,
        primitives: &PrimitiveRegistry,
        issues: &mut Vec<LoadIssue>,
    ) -> Self {
        let mut steps = Vec::with_capacity(data.actions.len());
        for record in &data.actions {
            let issue = match actions.build(record, primitives) {
                Ok(Step::Condition(condition)) => {
                    let issue = condition.error().map(|err| LoadIssue::UncompiledCondition {
                        behaviour: data.id.clone(),
                        action: record.id.clone(),
                        reason: err.to_string(),
                    });
                    steps.push(Step::Condition(condition));
                    issue
                }
                Ok(step) => {
                    steps.push(step);
                    None
                }
                Err(EngineError::UnknownActionType(kind)) => {
                    steps.push(Step::Unresolved(record.clone()));
                    Some(LoadIssue::UnknownActionType {
                        behaviour: data.id.clone(),
                        action: record.id.clone(),
                        kind,
                    })
                }
                Err(err) => {
                    steps.push(Step::Unresolved(record.clone()));
                    Some(LoadIssue::InvalidAction {
                        behaviour: data.id.clone(),
                        action: record.id.clone(),
                        reason: err.to_string(),
                    })
                }
            };
            if let Some(issue) = issue {
                log::warn!("{issue}");
                issues.push(issue);
            }
        }

        Self {
            id: data.id.clone(),
            name: data.name.clone(),
            kind: data.kind,
            steps,
        }
    }

    #[must_use]
    pub fn to_data(&self) -> BehaviourData {
        BehaviourData {
            name: self.name.clone(),
            kind: self.kind,
            id: self.id.clone(),
            actions: self.steps.iter().map(Step::to_record).collect(),
        }
    }
}

/// Snapshot form of a behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviourData {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: BehaviourType,

    #[serde(rename = "uuid", default)]
    pub id: BehaviourId,

    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

impl BehaviourData {
    /// Give the behaviour and each of its steps a fresh identity.
    pub fn re_id(&mut self, rng: &mut GameRng) {
        self.id = BehaviourId::generate(rng);
        for record in &mut self.actions {
            record.id = ActionId::generate(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> (Behaviour, Vec<LoadIssue>) {
        let data: BehaviourData = serde_json::from_str(json).unwrap();
        let mut issues = Vec::new();
        let behaviour = Behaviour::from_data(
            &data,
            &ActionRegistry::with_vanilla(),
            &PrimitiveRegistry::with_vanilla(),
            &mut issues,
        );
        (behaviour, issues)
    }

    #[test]
    fn test_unknown_type_kept_but_not_run() {
        let json = r#"{
            "name": "odd", "type": "Initiative", "uuid": "b1",
            "actions": [
                {"name": "m", "type": "vanilla.move", "uuid": "a1", "moveType": 5, "loop": false, "loopLimit": 0, "stepPosition": [[0,1]]},
                {"name": "x", "type": "mod.teleport", "uuid": "a2", "range": 3}
            ]
        }"#;
        let (behaviour, issues) = load(json);
        assert_eq!(behaviour.steps().len(), 2);
        assert_eq!(behaviour.pipeline().len(), 1);
        assert_eq!(
            issues,
            vec![LoadIssue::UnknownActionType {
                behaviour: BehaviourId::new("b1"),
                action: ActionId::new("a2"),
                kind: "mod.teleport".into(),
            }]
        );

        let back = behaviour.to_data();
        assert_eq!(back.actions[1].fields["range"], 3);
        assert_eq!(back, serde_json::from_str::<BehaviourData>(json).unwrap());
    }

    #[test]
    fn test_bad_condition_reported_and_blocks() {
        let json = r#"{"name":"g","type":"Passive","uuid":"b2",
            "actions":[{"name":"c","type":"condition","uuid":"c1","code":"(eq 1"}]}"#;
        let (behaviour, issues) = load(json);
        assert_eq!(behaviour.kind, BehaviourType::Passive);
        assert_eq!(behaviour.pipeline().len(), 1);
        assert!(matches!(issues.as_slice(), [LoadIssue::UncompiledCondition { .. }]));
    }

    #[test]
    fn test_invalid_field_is_unresolved() {
        let json = r#"{"name":"m","type":"Initiative","uuid":"b3",
            "actions":[{"name":"m","type":"vanilla.move","uuid":"a1","stepPosition":"up"}]}"#;
        let (behaviour, issues) = load(json);
        assert!(behaviour.pipeline().is_empty());
        assert!(matches!(issues.as_slice(), [LoadIssue::InvalidAction { .. }]));
    }

    #[test]
    fn test_re_id_changes_every_identity() {
        let json = r#"{"name":"n","type":"Initiative","uuid":"b4",
            "actions":[{"name":"l","type":"vanilla.lose","uuid":"a1"}]}"#;
        let mut data: BehaviourData = serde_json::from_str(json).unwrap();
        data.re_id(&mut GameRng::new(7));
        assert_ne!(data.id, BehaviourId::new("b4"));
        assert_ne!(data.actions[0].id, ActionId::new("a1"));
    }
}
