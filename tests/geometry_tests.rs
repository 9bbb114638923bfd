//! Property tests for seat orientation and delta merging.

use proptest::prelude::*;

use rust_piecework::board::{global_to_local, local_to_global, BoardSize, Coord, Seat};
use rust_piecework::core::{PieceId, PlayerId};
use rust_piecework::rules::{merge_state, Delta, DeltaSet, DeltaSymbol};

fn square_board() -> impl Strategy<Value = (BoardSize, Coord)> {
    (1i32..16).prop_flat_map(|n| (Just(BoardSize::new(n, n)), (0..n, 0..n).prop_map(|(x, y)| Coord::new(x, y))))
}

fn delta() -> impl Strategy<Value = Delta> {
    prop_oneof![
        (-4i32..12, -4i32..12).prop_map(|(x, y)| Delta::Position(Coord::new(x, y))),
        (-4i32..12, -4i32..12).prop_map(|(x, y)| Delta::Cell(Coord::new(x, y))),
        proptest::collection::vec("[a-d]", 1..3)
            .prop_map(|ids| Delta::Attack(ids.into_iter().map(PieceId::new).collect())),
        "[p-r]".prop_map(|id| Delta::Lose(PlayerId::new(id))),
    ]
}

proptest! {
    /// Mapping into a seat's frame and back is the identity.
    #[test]
    fn test_orientation_round_trip((size, p) in square_board(), seat in 0u8..6, no_offset in any::<bool>()) {
        let seat = Seat::new(seat);
        let local = global_to_local(size, p, seat, no_offset);
        prop_assert_eq!(local_to_global(size, local, seat, no_offset), p);
    }

    /// Squares stay on a square board in every seat's frame.
    #[test]
    fn test_orientation_stays_on_board((size, p) in square_board(), seat in 1u8..=4) {
        let local = global_to_local(size, p, Seat::new(seat), false);
        prop_assert!(size.contains(local));
    }

    /// Vector rotation preserves length.
    #[test]
    fn test_vectors_keep_length(x in -8i32..8, y in -8i32..8, seat in 1u8..=4) {
        let v = local_to_global(BoardSize::new(8, 8), Coord::new(x, y), Seat::new(seat), true);
        prop_assert_eq!(v.x * v.x + v.y * v.y, x * x + y * y);
    }

    /// Merging never produces two deltas with the same symbol.
    #[test]
    fn test_merge_one_slot_per_symbol(
        older in proptest::collection::vec(delta(), 0..6),
        newer in proptest::collection::vec(delta(), 0..6),
    ) {
        let merged = merge_state(&DeltaSet::from(older), &newer);
        let mut symbols: Vec<DeltaSymbol> = Vec::new();
        for d in &merged {
            prop_assert!(!symbols.contains(&d.symbol()));
            symbols.push(d.symbol());
        }
    }

    /// The newest value of an overwriting symbol wins; attacks accumulate.
    #[test]
    fn test_merge_newest_wins(
        older in proptest::collection::vec(delta(), 0..6),
        newer in proptest::collection::vec(delta(), 0..6),
    ) {
        let older = DeltaSet::from(older);
        let merged = merge_state(&older, &newer);

        let last_position = newer.iter().rev().find_map(|d| match d {
            Delta::Position(p) => Some(*p),
            _ => None,
        });
        prop_assert_eq!(merged.position(), last_position.or(older.position()));

        let added: usize = newer
            .iter()
            .map(|d| match d {
                Delta::Attack(ids) => ids.len(),
                _ => 0,
            })
            .sum();
        prop_assert_eq!(merged.attacked().len(), older.attacked().len() + added);
    }

    /// Merging leaves the older set untouched.
    #[test]
    fn test_merge_does_not_mutate(
        older in proptest::collection::vec(delta(), 0..6),
        newer in proptest::collection::vec(delta(), 0..6),
    ) {
        let older = DeltaSet::from(older);
        let before = older.clone();
        let _ = merge_state(&older, &newer);
        prop_assert_eq!(older, before);
    }
}

#[test]
fn test_four_seats_see_forward_differently() {
    let size = BoardSize::new(8, 8);
    let forward = Coord::new(0, 1);
    let globals: Vec<Coord> = (1..=4)
        .map(|seat| local_to_global(size, forward, Seat::new(seat), true))
        .collect();
    assert_eq!(
        globals,
        vec![Coord::new(0, 1), Coord::new(-1, 0), Coord::new(0, -1), Coord::new(1, 0)]
    );
}
