//! Applying a chosen candidate.

use crate::board::Board;
use crate::core::PlayerId;
use crate::error::EngineError;

use super::search::Analysis;
use super::step_desc::Selection;

/// Outcome of a commit.
#[derive(Clone, Debug)]
pub struct CommitResult {
    /// The board at the end of the candidate's reaction chain.
    pub board: Board,
    /// Every eliminated player, earlier losers first.
    pub losers: Vec<PlayerId>,
}

/// Apply the candidate `select` names.
///
/// Fails with [`EngineError::IllegalSelection`] if `analysis` holds no such
/// candidate, which is how a server rejects a tampered move.
pub fn commit(analysis: &Analysis, select: &Selection) -> Result<CommitResult, EngineError> {
    let step = analysis.find(select).ok_or_else(|| EngineError::IllegalSelection {
        piece: select.piece.clone(),
        behaviour: select.behaviour.clone(),
        indices: select.indices.to_vec(),
    })?;

    let mut board = step.terminal_board().clone();
    for player in step.lose_targets() {
        board.push_loser(player.clone());
    }
    let losers: Vec<PlayerId> = board.losers().cloned().collect();
    log::debug!(
        "committed {} via {} ({} reactions, {} losers)",
        select.piece,
        select.behaviour,
        step.chain().count() - 1,
        losers.len()
    );
    Ok(CommitResult { board, losers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, Phase};
    use crate::board::{Coord, Nation, Piece, Player};
    use crate::core::PieceId;
    use crate::rules::{ActionHeader, Behaviour, BehaviourType, MoveAction};

    fn board() -> Board {
        let mut board = Board::new("solo", 4, 4);
        board.add_player(Player::new("white", 1));
        board.add_piece(
            Piece::new("w", "w").with_behaviour(
                Behaviour::new("step", "step", BehaviourType::Initiative)
                    .with_action(MoveAction::new(ActionHeader::default()).with_steps([(0, 1)])),
            ),
            Some(Coord::new(0, 0)),
        );
        let nations = board.nations_mut();
        let root = nations.add_root(Nation::new("n", "n").with_monarch("white"));
        nations.add_piece(root, PieceId::new("w"));
        board
    }

    #[test]
    fn test_commit_moves_piece() {
        let board = board();
        let analysis = Analyzer::default().analyze(&board, Phase::Initiative);
        let result = commit(&analysis, &Selection::new("w", "step").then(0)).unwrap();
        assert_eq!(result.board.position_of(&PieceId::new("w")), Some(Coord::new(0, 1)));
        assert!(result.losers.is_empty());
        assert_eq!(board.position_of(&PieceId::new("w")), Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let analysis = Analyzer::default().analyze(&board(), Phase::Initiative);
        let err = commit(&analysis, &Selection::new("w", "step").then(3)).unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalSelection {
                piece: PieceId::new("w"),
                behaviour: "step".into(),
                indices: vec![3],
            }
        );
    }
}
