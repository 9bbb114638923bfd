//! Search nodes and candidate chains.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, Coord};
use crate::core::{BehaviourId, PieceId, PlayerId};
use crate::rules::{DeltaSet, DescTag};

/// Which behaviour of which piece, and which branch at every step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub piece: PieceId,
    pub behaviour: BehaviourId,
    pub indices: SmallVec<[u16; 4]>,
}

impl Selection {
    pub fn new(piece: impl Into<PieceId>, behaviour: impl Into<BehaviourId>) -> Self {
        Self {
            piece: piece.into(),
            behaviour: behaviour.into(),
            indices: SmallVec::new(),
        }
    }

    /// Extend the branch path (builder pattern).
    #[must_use]
    pub fn then(mut self, index: u16) -> Self {
        self.indices.push(index);
        self
    }
}

/// `attacker` captured `victim`, which stood on `square`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attacker: PieceId,
    pub victim: PieceId,
    pub square: Coord,
}

/// Facts gathered along a chain that later reactions can query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMeta {
    pub attacks: Vec<AttackRecord>,
}

impl StepMeta {
    /// The first recorded attacker of `victim`.
    #[must_use]
    pub fn attacker_of(&self, victim: &PieceId) -> Option<&PieceId> {
        self.attacks
            .iter()
            .find(|record| &record.victim == victim)
            .map(|record| &record.attacker)
    }
}

/// One search node; a completed one is a candidate.
#[derive(Clone, Debug)]
pub struct StepDesc {
    /// Accumulated deltas of the acting piece.
    pub deltas: DeltaSet,
    /// Highlight tags gathered so far.
    pub descs: Vec<DescTag>,
    pub select: Selection,
    /// The board after applying `deltas`.
    pub board: Board,
    pub meta: StepMeta,
    /// The reaction this candidate triggers, if any.
    pub next: Option<Box<StepDesc>>,
}

impl StepDesc {
    /// This node followed by its reactions.
    pub fn chain(&self) -> impl Iterator<Item = &StepDesc> {
        std::iter::successors(Some(self), |step| step.next.as_deref())
    }

    /// The board at the end of the chain.
    #[must_use]
    pub fn terminal_board(&self) -> &Board {
        // `chain` always yields at least `self`.
        self.chain().last().map_or(&self.board, |step| &step.board)
    }

    /// Players eliminated anywhere along the chain, first occurrence order.
    #[must_use]
    pub fn lose_targets(&self) -> Vec<&PlayerId> {
        let mut out: Vec<&PlayerId> = Vec::new();
        for player in self.chain().filter_map(|step| step.deltas.lose()) {
            if !out.contains(&player) {
                out.push(player);
            }
        }
        out
    }

    /// Whether the chain eliminates someone other than `player`.
    #[must_use]
    pub fn eliminates_other_than(&self, player: &PlayerId) -> bool {
        self.lose_targets().into_iter().any(|target| target != player)
    }
}
