//! Per-piece behaviour search and reaction chaining.
//!
//! ## Search
//!
//! Each eligible behaviour of a piece is searched breadth-first with a
//! work-list of partial [`StepDesc`]s, so completed candidates come out in
//! lexicographic branch-index order. A node starts with
//! `Position(p), Cell(p)` when the piece is placed and with no deltas
//! otherwise.
//!
//! - a condition step keeps the node (index 0) or drops it
//! - an action step replaces the node with one child per branch
//! - a node past the last step is a candidate
//!
//! Every child's board is rebuilt from the behaviour's starting board by
//! applying the child's full delta set, so applying is idempotent and
//! siblings never share state.
//!
//! ## Reactions
//!
//! After a candidate is found, every other piece gets one chance, in board
//! order, to react: its passive behaviours are searched against the board
//! and attack records at the current end of the chain, and the first
//! candidate found is linked as `next`. There is no cycle detection and
//! later passive candidates are ignored.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::board::{Board, Coord, Piece};
use crate::conditions::EvalContext;
use crate::core::{EngineConfig, PieceId, PlayerId};
use crate::rules::{BehaviourType, Delta, DeltaSet, Step};

use super::step_desc::{AttackRecord, Selection, StepDesc, StepMeta};

/// Which firing class a turn phase searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The player's chosen primary move.
    Initiative,
    /// Forced follow-up sub-steps of the piece that just moved.
    Immediately,
}

impl Phase {
    #[must_use]
    pub const fn behaviour_type(self) -> BehaviourType {
        match self {
            Phase::Initiative => BehaviourType::Initiative,
            Phase::Immediately => BehaviourType::Immediately,
        }
    }
}

/// Candidates per piece, in board order.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub phase: Phase,
    entries: Vec<(PieceId, Vec<StepDesc>)>,
}

impl Analysis {
    #[must_use]
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            entries: Vec::new(),
        }
    }

    /// Candidates of one piece.
    #[must_use]
    pub fn get(&self, piece: &PieceId) -> Option<&[StepDesc]> {
        self.entries
            .iter()
            .find(|(id, _)| id == piece)
            .map(|(_, steps)| steps.as_slice())
    }

    /// The candidate a selection names.
    #[must_use]
    pub fn find(&self, select: &Selection) -> Option<&StepDesc> {
        self.get(&select.piece)?.iter().find(|step| &step.select == select)
    }

    /// Candidates of `piece` whose highlighted square is `cell`.
    #[must_use]
    pub fn candidates_at(&self, piece: &PieceId, cell: Coord) -> Vec<&StepDesc> {
        self.get(piece)
            .unwrap_or_default()
            .iter()
            .filter(|step| step.deltas.cell() == Some(cell))
            .collect()
    }

    /// Pieces with at least one candidate.
    pub fn pieces(&self) -> impl Iterator<Item = &PieceId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PieceId, &[StepDesc])> {
        self.entries.iter().map(|(id, steps)| (id, steps.as_slice()))
    }

    /// Every candidate, piece by piece.
    pub fn candidates(&self) -> impl Iterator<Item = &StepDesc> {
        self.entries.iter().flat_map(|(_, steps)| steps.iter())
    }

    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.entries.iter().map(|(_, steps)| steps.len()).sum()
    }

    /// Number of pieces with candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, piece: PieceId, steps: Vec<StepDesc>) {
        if !steps.is_empty() {
            self.entries.push((piece, steps));
        }
    }
}

/// Drives behaviour search over a board.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Candidates for every piece on the board.
    #[must_use]
    pub fn analyze(&self, board: &Board, phase: Phase) -> Analysis {
        self.analyze_where(board, phase, |_| true)
    }

    /// Candidates for the pieces `player` controls.
    #[must_use]
    pub fn analyze_player(&self, board: &Board, phase: Phase, player: &PlayerId) -> Analysis {
        self.analyze_where(board, phase, |piece| {
            board.owner_of(&piece.id).is_some_and(|owner| &owner.id == player)
        })
    }

    /// Candidates for a single piece.
    #[must_use]
    pub fn analyze_piece(&self, board: &Board, phase: Phase, piece: &PieceId) -> Analysis {
        self.analyze_where(board, phase, |p| &p.id == piece)
    }

    fn analyze_where(&self, board: &Board, phase: Phase, include: impl Fn(&Piece) -> bool) -> Analysis {
        let mut analysis = Analysis::new(phase);
        for piece in board.pieces().filter(|p| include(p)) {
            let mut steps = self.search(board, piece, phase.behaviour_type(), &StepMeta::default());
            for step in &mut steps {
                self.chain_reactions(step);
            }
            analysis.push(piece.id.clone(), steps);
        }
        log::debug!(
            "{:?} analysis: {} candidates over {} pieces",
            phase,
            analysis.candidate_count(),
            analysis.len()
        );
        analysis
    }

    /// Completed candidates of `piece`'s behaviours of one firing class.
    #[must_use]
    pub fn search(&self, board: &Board, piece: &Piece, kind: BehaviourType, meta: &StepMeta) -> Vec<StepDesc> {
        if board.owner_of(&piece.id).is_none() {
            return Vec::new();
        }
        let start = board
            .position_of(&piece.id)
            .map_or_else(DeltaSet::new, |at| DeltaSet::from(vec![Delta::Position(at), Delta::Cell(at)]));

        let mut done = Vec::new();
        for behaviour in piece.behaviours_of(kind) {
            let pipeline = behaviour.pipeline();
            let mut queue = VecDeque::new();
            queue.push_back(StepDesc {
                deltas: start.clone(),
                descs: Vec::new(),
                select: Selection::new(piece.id.clone(), behaviour.id.clone()),
                board: board.clone(),
                meta: meta.clone(),
                next: None,
            });

            while let Some(mut node) = queue.pop_front() {
                let Some(step) = pipeline.get(node.select.indices.len()) else {
                    done.push(node);
                    continue;
                };
                match step {
                    Step::Condition(condition) => {
                        let allowed = {
                            let ctx = EvalContext::new(&node.board, &piece.id)
                                .with_attacker(node.meta.attacker_of(&piece.id));
                            condition.allows(&ctx)
                        };
                        if allowed {
                            node.select.indices.push(0);
                            queue.push_back(node);
                        }
                    }
                    Step::Action(action) => {
                        let branches = action.step(&node.board, &node.deltas, piece);
                        if kind == BehaviourType::Passive && branches.len() > self.config.passive_branch_limit {
                            log::debug!(
                                "passive {} of {} is ambiguous ({} branches), dropped",
                                behaviour.id,
                                piece.id,
                                branches.len()
                            );
                            continue;
                        }
                        for (index, branch) in branches.into_iter().enumerate() {
                            let Ok(index) = u16::try_from(index) else {
                                break;
                            };
                            let (next_board, next_meta) = materialize(board, meta, &piece.id, &branch.deltas);
                            let mut select = node.select.clone();
                            select.indices.push(index);
                            let mut descs = node.descs.clone();
                            descs.extend(branch.descs);
                            queue.push_back(StepDesc {
                                deltas: branch.deltas,
                                descs,
                                select,
                                board: next_board,
                                meta: next_meta,
                                next: None,
                            });
                        }
                    }
                    Step::Unresolved(_) => {}
                }
            }
        }
        done
    }

    /// Link passive reactions of the other pieces behind `step`.
    fn chain_reactions(&self, step: &mut StepDesc) {
        let initiator = step.select.piece.clone();
        let pieces: Vec<Arc<Piece>> = step.board.pieces().cloned().collect();
        let mut tail: &mut StepDesc = step;
        for piece in pieces {
            if piece.id == initiator && !self.config.reactions_include_initiator {
                continue;
            }
            let reaction = self
                .search(&tail.board, &piece, BehaviourType::Passive, &tail.meta)
                .into_iter()
                .next();
            if let Some(reaction) = reaction {
                log::debug!("{} reacts to {}", piece.id, initiator);
                tail = &mut **tail.next.insert(Box::new(reaction));
            }
        }
    }
}

/// Apply `deltas` of `piece` to a copy of `start`.
fn materialize(start: &Board, meta: &StepMeta, piece: &PieceId, deltas: &DeltaSet) -> (Board, StepMeta) {
    let mut board = start.clone();
    let mut meta = meta.clone();
    for delta in deltas {
        match delta {
            Delta::Position(at) => {
                if board.position_of(piece) != Some(*at) {
                    board.set_position(piece, *at);
                    board.record_move(piece);
                }
            }
            Delta::Cell(_) => {}
            Delta::Attack(victims) => {
                for victim in victims {
                    if let Some(square) = board.position_of(victim) {
                        board.remove_piece(victim);
                        meta.attacks.push(AttackRecord {
                            attacker: piece.clone(),
                            victim: victim.clone(),
                            square,
                        });
                    }
                }
            }
            Delta::Lose(player) => {
                board.push_loser(player.clone());
            }
        }
    }
    (board, meta)
}
