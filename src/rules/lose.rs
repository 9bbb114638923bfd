//! `vanilla.lose`: the acting piece's owner is eliminated.
//!
//! Typically the last step of a king's passive behaviour guarded by
//! `(not (is-null (vanilla.attacker)))`.

use crate::board::{Board, Piece};

use super::action::{Action, ActionHeader, ActionRecord, Branch};
use super::delta::{merge_state, Delta, DeltaSet};

/// Registered type name of the lose action.
pub const LOSE_KIND: &str = "vanilla.lose";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoseAction {
    pub header: ActionHeader,
}

impl LoseAction {
    pub fn new(header: ActionHeader) -> Self {
        Self { header }
    }

    #[must_use]
    pub fn from_record(record: &ActionRecord) -> Self {
        Self::new(record.header())
    }
}

impl Action for LoseAction {
    fn kind(&self) -> &str {
        LOSE_KIND
    }

    fn header(&self) -> &ActionHeader {
        &self.header
    }

    fn step(&self, board: &Board, deltas: &DeltaSet, piece: &Piece) -> Vec<Branch> {
        match board.owner_of(&piece.id) {
            Some(owner) => vec![Branch::new(
                merge_state(deltas, &[Delta::Lose(owner.id.clone())]),
                Vec::new(),
            )],
            None => Vec::new(),
        }
    }

    fn to_record(&self) -> ActionRecord {
        ActionRecord::new(LOSE_KIND, &self.header)
    }
}
