//! `vanilla.move`: geometry-aware move generation.
//!
//! Step vectors are authored in the mover's local frame and rotated into
//! the global frame by the owner's seat. Each vector is either taken once
//! or, in sliding mode, repeated until the board edge or the first occupied
//! square. A vector that would leave the `i32` range counts as off the
//! board.
//!
//! | destination       | `move` | `attack`        | `move_attack`              |
//! |-------------------|--------|-----------------|----------------------------|
//! | empty             | Move   | -               | Move                       |
//! | enemy-occupied    | -      | Attack in place | Move and capture           |
//! | friendly-occupied | -      | -               | -                          |
//!
//! Any piece whose owner differs from the mover's, unowned pieces
//! included, counts as an enemy.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::board::{local_to_global, Board, Coord, Piece};
use crate::error::EngineError;

use super::action::{Action, ActionHeader, ActionRecord, Branch, DescKind, DescTag};
use super::delta::{merge_state, Delta, DeltaSet};
use super::registry::{FormItem, FormItemKind};

/// Registered type name of the move action.
pub const MOVE_KIND: &str = "vanilla.move";

/// Enabled outcome kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveMask(pub u32);

impl MoveMask {
    /// Move onto empty squares.
    pub const MOVE: MoveMask = MoveMask(1);
    /// Capture without moving.
    pub const ATTACK: MoveMask = MoveMask(1 << 1);
    /// Capture by moving onto the square; also moves onto empty squares.
    pub const MOVE_ATTACK: MoveMask = MoveMask(1 << 2);

    #[must_use]
    pub const fn contains(self, other: MoveMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for MoveMask {
    fn default() -> Self {
        MoveMask::MOVE | MoveMask::MOVE_ATTACK
    }
}

impl BitOr for MoveMask {
    type Output = MoveMask;

    fn bitor(self, rhs: MoveMask) -> MoveMask {
        MoveMask(self.0 | rhs.0)
    }
}

/// The `vanilla.move` action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveAction {
    pub header: ActionHeader,
    pub mask: MoveMask,
    /// Sliding mode.
    pub looping: bool,
    /// Authored `loopLimit`. Stored for round trips; a slide always runs
    /// to the edge or the first occupied square.
    pub loop_limit: u32,
    /// Step vectors in the mover's local frame.
    pub steps: Vec<Coord>,
}

impl MoveAction {
    pub fn new(header: ActionHeader) -> Self {
        Self {
            header,
            mask: MoveMask::default(),
            looping: false,
            loop_limit: 1,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mask(mut self, mask: MoveMask) -> Self {
        self.mask = mask;
        self
    }

    /// Slide along each vector.
    #[must_use]
    pub fn sliding(mut self) -> Self {
        self.looping = true;
        self
    }

    #[must_use]
    pub fn with_loop_limit(mut self, limit: u32) -> Self {
        self.loop_limit = limit;
        self
    }

    #[must_use]
    pub fn with_steps<I, C>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_record(record: &ActionRecord) -> Result<Self, EngineError> {
        Ok(Self {
            header: record.header(),
            mask: record.field_or("moveType", MoveMask::default())?,
            looping: record.field_or("loop", false)?,
            loop_limit: record.field_or("loopLimit", 1)?,
            steps: record.field_or("stepPosition", Vec::new())?,
        })
    }

    /// Authoring form for this action type.
    #[must_use]
    pub fn form_items() -> Vec<FormItem> {
        vec![
            FormItem::new(
                "move type",
                "moveType",
                FormItemKind::Mask {
                    items: vec![
                        ("move".into(), i64::from(MoveMask::MOVE.0)),
                        ("attack".into(), i64::from(MoveMask::ATTACK.0)),
                        ("move_attack".into(), i64::from(MoveMask::MOVE_ATTACK.0)),
                    ],
                },
            ),
            FormItem::new("loop", "loop", FormItemKind::Switch),
            FormItem::new("loop times limit", "loopLimit", FormItemKind::Number { min: 1, max: None }),
            FormItem::new(
                "step position",
                "stepPosition",
                FormItemKind::Other {
                    editor: "move-position".into(),
                },
            ),
        ]
    }

    /// Branches for one destination. Returns false if the square stops a walk.
    fn visit(&self, board: &Board, deltas: &DeltaSet, piece: &Piece, aim: Coord, out: &mut Vec<Branch>) -> bool {
        let Some(target) = board.piece_at(aim) else {
            if self.mask.contains(MoveMask::MOVE | MoveMask::MOVE_ATTACK) {
                out.push(Branch::new(
                    merge_state(deltas, &[Delta::Cell(aim), Delta::Position(aim)]),
                    vec![DescTag::new(DescKind::Move, aim)],
                ));
            }
            return true;
        };

        let mover_owner = board.owner_of(&piece.id).map(|p| &p.id);
        let target_owner = board.owner_of(target).map(|p| &p.id);
        if mover_owner != target_owner {
            if self.mask.contains(MoveMask::MOVE_ATTACK) {
                out.push(Branch::new(
                    merge_state(
                        deltas,
                        &[Delta::Cell(aim), Delta::Position(aim), Delta::Attack(vec![target.clone()])],
                    ),
                    vec![DescTag::new(DescKind::MoveAttack, aim)],
                ));
            }
            if self.mask.contains(MoveMask::ATTACK) {
                out.push(Branch::new(
                    merge_state(deltas, &[Delta::Cell(aim), Delta::Attack(vec![target.clone()])]),
                    vec![DescTag::new(DescKind::Attack, aim)],
                ));
            }
        }
        false
    }
}

impl Action for MoveAction {
    fn kind(&self) -> &str {
        MOVE_KIND
    }

    fn header(&self) -> &ActionHeader {
        &self.header
    }

    fn step(&self, board: &Board, deltas: &DeltaSet, piece: &Piece) -> Vec<Branch> {
        let Some(owner) = board.owner_of(&piece.id) else {
            return Vec::new();
        };
        let Some(origin) = deltas.position() else {
            return Vec::new();
        };

        let mut branches = Vec::new();
        for &vector in &self.steps {
            let delta = local_to_global(board.size, vector, owner.seat, true);
            if !self.looping {
                if let Some(aim) = origin.checked_offset(delta).filter(|&aim| board.in_bounds(aim)) {
                    self.visit(board, deltas, piece, aim, &mut branches);
                }
                continue;
            }

            if delta.is_zero() {
                continue;
            }
            let mut aim = origin;
            while let Some(next) = aim.checked_offset(delta).filter(|&next| board.in_bounds(next)) {
                aim = next;
                if !self.visit(board, deltas, piece, aim, &mut branches) {
                    break;
                }
            }
        }
        branches
    }

    fn to_record(&self) -> ActionRecord {
        ActionRecord::new(MOVE_KIND, &self.header)
            .with_field("moveType", self.mask)
            .with_field("loop", self.looping)
            .with_field("loopLimit", self.loop_limit)
            .with_field("stepPosition", &self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Nation, Player};
    use crate::core::PieceId;

    fn board(pieces: &[(&str, &str, (i32, i32))]) -> Board {
        let mut board = Board::new("test", 8, 8);
        board.add_player(Player::new("white", 1));
        board.add_player(Player::new("black", 3));
        let nations = board.nations_mut();
        let white = nations.add_root(Nation::new("nw", "White").with_monarch("white"));
        let black = nations.add_root(Nation::new("nb", "Black").with_monarch("black"));
        for &(id, side, _) in pieces {
            let key = if side == "white" { white } else { black };
            nations.add_piece(key, PieceId::new(id));
        }
        for &(id, _, (x, y)) in pieces {
            board.add_piece(Piece::new(id, id), Some(Coord::new(x, y)));
        }
        board
    }

    fn run(action: &MoveAction, board: &Board, id: &str) -> Vec<Branch> {
        let piece = board.piece(&PieceId::new(id)).unwrap().clone();
        let pos = board.position_of(&piece.id).unwrap();
        let start = DeltaSet::from(vec![Delta::Position(pos), Delta::Cell(pos)]);
        action.step(board, &start, &piece)
    }

    fn tags(branches: &[Branch]) -> Vec<(DescKind, (i32, i32))> {
        branches
            .iter()
            .flat_map(|b| b.descs.iter().map(|d| (d.kind, (d.square.x, d.square.y))))
            .collect()
    }

    #[test]
    fn test_single_step_onto_empty() {
        let board = board(&[("wk", "white", (4, 0))]);
        let king = MoveAction::new(ActionHeader::default()).with_steps([(0, 1), (1, 1), (-1, -1)]);
        let branches = run(&king, &board, "wk");
        assert_eq!(tags(&branches), vec![(DescKind::Move, (4, 1)), (DescKind::Move, (5, 1))]);
        assert_eq!(branches[0].deltas.position(), Some(Coord::new(4, 1)));
        assert_eq!(branches[0].deltas.cell(), Some(Coord::new(4, 1)));
    }

    #[test]
    fn test_step_vector_rotates_with_seat() {
        let board = board(&[("bp", "black", (3, 6))]);
        let pawn = MoveAction::new(ActionHeader::default()).with_steps([(0, 1)]);
        assert_eq!(tags(&run(&pawn, &board, "bp")), vec![(DescKind::Move, (3, 5))]);
    }

    #[test]
    fn test_capture_kinds() {
        let board = board(&[("w", "white", (0, 0)), ("b", "black", (0, 1))]);
        let both = MoveAction::new(ActionHeader::default())
            .with_mask(MoveMask::MOVE_ATTACK | MoveMask::ATTACK)
            .with_steps([(0, 1)]);
        let branches = run(&both, &board, "w");
        assert_eq!(tags(&branches), vec![(DescKind::MoveAttack, (0, 1)), (DescKind::Attack, (0, 1))]);
        assert_eq!(branches[0].deltas.position(), Some(Coord::new(0, 1)));
        assert_eq!(branches[0].deltas.attacked(), &[PieceId::new("b")]);
        assert_eq!(branches[1].deltas.position(), Some(Coord::new(0, 0)));
        assert_eq!(branches[1].deltas.attacked(), &[PieceId::new("b")]);

        let quiet = MoveAction::new(ActionHeader::default())
            .with_mask(MoveMask::MOVE)
            .with_steps([(0, 1)]);
        assert!(run(&quiet, &board, "w").is_empty());
    }

    #[test]
    fn test_friendly_square_blocks() {
        let board = board(&[("a", "white", (0, 0)), ("b", "white", (0, 1))]);
        let rook = MoveAction::new(ActionHeader::default()).sliding().with_steps([(0, 1)]);
        assert!(run(&rook, &board, "a").is_empty());
    }

    #[test]
    fn test_slide_until_edge() {
        let board = board(&[("q", "white", (3, 3))]);
        let bishop = MoveAction::new(ActionHeader::default()).sliding().with_steps([(1, 1), (0, 0)]);
        assert_eq!(
            tags(&run(&bishop, &board, "q")),
            vec![
                (DescKind::Move, (4, 4)),
                (DescKind::Move, (5, 5)),
                (DescKind::Move, (6, 6)),
                (DescKind::Move, (7, 7)),
            ]
        );
    }

    #[test]
    fn test_slide_stops_at_first_enemy() {
        let board = board(&[("q", "white", (3, 3)), ("x", "black", (5, 5))]);
        let bishop = MoveAction::new(ActionHeader::default()).sliding().with_steps([(1, 1)]);
        assert_eq!(
            tags(&run(&bishop, &board, "q")),
            vec![(DescKind::Move, (4, 4)), (DescKind::MoveAttack, (5, 5))]
        );
    }

    #[test]
    fn test_authored_loop_limit_does_not_shorten_slide() {
        let board = board(&[("q", "white", (3, 3))]);
        let record: ActionRecord = serde_json::from_str(
            r#"{"type":"vanilla.move","moveType":5,"loop":true,"loopLimit":1,"stepPosition":[[1,1]]}"#,
        )
        .unwrap();
        let bishop = MoveAction::from_record(&record).unwrap();
        assert_eq!(bishop.loop_limit, 1);
        assert_eq!(
            tags(&run(&bishop, &board, "q")),
            vec![
                (DescKind::Move, (4, 4)),
                (DescKind::Move, (5, 5)),
                (DescKind::Move, (6, 6)),
                (DescKind::Move, (7, 7)),
            ]
        );
        assert_eq!(bishop.to_record().fields["loopLimit"], 1);
    }

    #[test]
    fn test_huge_vectors_are_off_board() {
        let board = board(&[("q", "white", (3, 3))]);
        let record: ActionRecord = serde_json::from_str(
            r#"{"type":"vanilla.move","stepPosition":[[2147483647,0],[-2147483648,-2147483648],[0,1]]}"#,
        )
        .unwrap();
        let step = MoveAction::from_record(&record).unwrap();
        assert_eq!(tags(&run(&step, &board, "q")), vec![(DescKind::Move, (3, 4))]);

        let slide = step.clone().sliding();
        assert_eq!(tags(&run(&slide, &board, "q")).len(), 4);
    }

    #[test]
    fn test_unowned_or_unplaced_mover() {
        let mut board = board(&[("w", "white", (0, 0))]);
        board.add_piece(Piece::new("stray", "stray"), Some(Coord::new(4, 4)));
        let step = MoveAction::new(ActionHeader::default()).with_steps([(0, 1)]);
        assert!(run(&step, &board, "stray").is_empty());

        let piece = board.piece(&PieceId::new("w")).unwrap().clone();
        assert!(step.step(&board, &DeltaSet::new(), &piece).is_empty());
    }

    #[test]
    fn test_unowned_target_is_capturable() {
        let mut board = board(&[("w", "white", (0, 0))]);
        board.add_piece(Piece::new("stray", "stray"), Some(Coord::new(0, 1)));
        let step = MoveAction::new(ActionHeader::default()).with_steps([(0, 1)]);
        assert_eq!(tags(&run(&step, &board, "w")), vec![(DescKind::MoveAttack, (0, 1))]);
    }

    #[test]
    fn test_record_round_trip() {
        let action = MoveAction::new(ActionHeader::new("slide", "m1"))
            .with_mask(MoveMask::MOVE)
            .sliding()
            .with_loop_limit(3)
            .with_steps([(1, 0), (-1, 0)]);
        let record = action.to_record();
        assert_eq!(record.fields["moveType"], 1);
        assert_eq!(MoveAction::from_record(&record).unwrap(), action);
    }
}
