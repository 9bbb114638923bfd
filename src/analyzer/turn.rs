//! Turn control: whose move it is, eliminations and wins.
//!
//! Rounds rotate through the players in seating order. Sub-round 0 is the
//! active player's initiative; every commit bumps the sub-round, and later
//! sub-rounds offer the moved piece's `Immediately` behaviours until none
//! apply.
//!
//! [`Session::do_analyze`] settles everything that needs no input before
//! returning: eliminated players are skipped, a player without a legal
//! initiative is eliminated, and an empty follow-up phase ends the turn.

use crate::board::{Board, Player};
use crate::core::{EngineConfig, GameRng, PieceId, PlayerId};
use crate::error::EngineError;

use super::commit::{commit, CommitResult};
use super::search::{Analysis, Analyzer, Phase};
use super::step_desc::Selection;

/// What the local player should be shown.
#[derive(Clone, Debug)]
pub struct TurnReport {
    /// The local player is the last one standing.
    pub win: bool,
    /// The local player has been eliminated.
    pub lost: bool,
    /// The local player has a move that eliminates someone.
    pub check: bool,
    /// Whose move it is; `None` once nobody can move.
    pub active: Option<PlayerId>,
    /// Candidates for the active player in the current phase.
    pub analysis: Analysis,
    /// Eliminated players whose turn was skipped on the way here.
    pub skipped: Vec<PlayerId>,
    /// Players eliminated for having no legal move on the way here.
    pub eliminated: Vec<PlayerId>,
}

impl TurnReport {
    /// Whether the local player is to move.
    #[must_use]
    pub fn is_turn_of(&self, player: &PlayerId) -> bool {
        self.active.as_ref() == Some(player)
    }
}

/// A game in progress.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    round: usize,
    sub_round: usize,
    mover: Option<PieceId>,
    analyzer: Analyzer,
}

impl Session {
    pub fn new(board: Board, config: EngineConfig) -> Result<Self, EngineError> {
        if board.player_count() == 0 {
            return Err(EngineError::NoPlayers);
        }
        Ok(Self {
            board,
            round: 0,
            sub_round: 0,
            mover: None,
            analyzer: Analyzer::new(config),
        })
    }

    /// Resume at a given round and sub-round.
    #[must_use]
    pub fn at_round(mut self, round: usize, sub_round: usize) -> Self {
        self.round = round;
        self.sub_round = sub_round;
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn sub_round(&self) -> usize {
        self.sub_round
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.sub_round == 0 {
            Phase::Initiative
        } else {
            Phase::Immediately
        }
    }

    /// The player whose round it is.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        let index = self.round % self.board.player_count();
        // `new` rejects boards without players.
        self.board
            .player_at(index)
            .unwrap_or_else(|| unreachable!("round index {index} out of range"))
    }

    /// Candidates the active player may commit right now.
    #[must_use]
    pub fn candidates(&self) -> Analysis {
        let active = self.active_player().id.clone();
        match (self.phase(), &self.mover) {
            (Phase::Initiative, _) => self.analyzer.analyze_player(&self.board, Phase::Initiative, &active),
            (Phase::Immediately, Some(mover)) => {
                let owned = self
                    .board
                    .owner_of(mover)
                    .is_some_and(|owner| owner.id == active);
                if owned {
                    self.analyzer.analyze_piece(&self.board, Phase::Immediately, mover)
                } else {
                    Analysis::new(Phase::Immediately)
                }
            }
            (Phase::Immediately, None) => self.analyzer.analyze_player(&self.board, Phase::Immediately, &active),
        }
    }

    /// Advance to the next player's initiative.
    pub fn finish_round(&mut self) {
        self.round += 1;
        self.sub_round = 0;
        self.mover = None;
    }

    /// Settle automatic transitions and report the state for `local`.
    pub fn do_analyze(&mut self, local: &PlayerId) -> TurnReport {
        let mut skipped = Vec::new();
        let mut eliminated = Vec::new();
        loop {
            let players = self.board.player_count();
            let losers = self.board.loser_count();
            let lost = self.board.is_loser(local);

            if losers + 1 == players && !lost {
                log::info!("{local} wins");
                return TurnReport {
                    win: true,
                    lost,
                    check: false,
                    active: None,
                    analysis: Analysis::new(self.phase()),
                    skipped,
                    eliminated,
                };
            }
            if losers >= players {
                return TurnReport {
                    win: false,
                    lost,
                    check: false,
                    active: None,
                    analysis: Analysis::new(self.phase()),
                    skipped,
                    eliminated,
                };
            }

            let active = self.active_player().id.clone();
            if self.board.is_loser(&active) {
                skipped.push(active);
                self.finish_round();
                continue;
            }

            let analysis = self.candidates();
            if analysis.is_empty() {
                if self.sub_round == 0 {
                    log::info!("{active} has no legal move and is eliminated");
                    self.board.push_loser(active.clone());
                    eliminated.push(active);
                }
                self.finish_round();
                continue;
            }

            let check = if lost {
                false
            } else if &active == local && analysis.phase == Phase::Initiative {
                analysis.candidates().any(|step| step.eliminates_other_than(local))
            } else {
                self.analyzer
                    .analyze_player(&self.board, Phase::Initiative, local)
                    .candidates()
                    .any(|step| step.eliminates_other_than(local))
            };

            return TurnReport {
                win: false,
                lost,
                check,
                active: Some(active),
                analysis,
                skipped,
                eliminated,
            };
        }
    }

    /// Apply the active player's choice.
    ///
    /// The candidate is recomputed from the current board, so a selection
    /// the engine would not offer is rejected.
    pub fn commit(&mut self, select: &Selection) -> Result<CommitResult, EngineError> {
        let active = self.active_player().id.clone();
        let owned = self
            .board
            .owner_of(&select.piece)
            .is_some_and(|owner| owner.id == active);
        if !owned {
            return Err(EngineError::NotYourPiece {
                piece: select.piece.clone(),
                player: active,
            });
        }

        let result = commit(&self.candidates(), select)?;
        self.board = result.board.clone();
        self.sub_round += 1;
        self.mover = Some(select.piece.clone());
        Ok(result)
    }

    /// Play random legal moves until the game ends or `max_plies` commits.
    ///
    /// Returns the committed selections; replaying them on the same board
    /// reproduces the game.
    pub fn play_random(&mut self, rng: &mut GameRng, max_plies: usize) -> Vec<Selection> {
        let mut played = Vec::new();
        while played.len() < max_plies {
            let local = self.active_player().id.clone();
            let report = self.do_analyze(&local);
            if report.win || report.active.is_none() {
                break;
            }
            let options: Vec<&Selection> = report.analysis.candidates().map(|step| &step.select).collect();
            let Some(select) = rng.choose(&options).map(|s| (*s).clone()) else {
                break;
            };
            if let Err(err) = self.commit(&select) {
                log::warn!("random playout stopped: {err}");
                break;
            }
            played.push(select);
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Nation, Piece};
    use crate::rules::{ActionHeader, Behaviour, BehaviourType, MoveAction};

    fn stepper(id: &str) -> Piece {
        Piece::new(id, id).with_behaviour(
            Behaviour::new(format!("{id}-step"), "step", BehaviourType::Initiative)
                .with_action(MoveAction::new(ActionHeader::default()).with_steps([(0, 1)])),
        )
    }

    fn board(players: &[(&str, u8, Option<Coord>)]) -> Board {
        let mut board = Board::new("table", 8, 8);
        for &(id, seat, at) in players {
            board.add_player(Player::new(id, seat));
            let piece_id = format!("{id}-piece");
            board.add_piece(stepper(&piece_id), at);
            let nations = board.nations_mut();
            let root = nations.add_root(Nation::new(format!("{id}-nation"), id).with_monarch(id));
            nations.add_piece(root, PieceId::new(piece_id));
        }
        board
    }

    #[test]
    fn test_no_players_rejected() {
        let err = Session::new(Board::new("empty", 8, 8), EngineConfig::default()).unwrap_err();
        assert_eq!(err, EngineError::NoPlayers);
    }

    #[test]
    fn test_turn_rotation() {
        let board = board(&[("a", 1, Some(Coord::new(0, 0))), ("b", 3, Some(Coord::new(7, 7)))]);
        let mut session = Session::new(board, EngineConfig::default()).unwrap();
        let a = PlayerId::new("a");
        let report = session.do_analyze(&a);
        assert!(report.is_turn_of(&a));
        assert_eq!(report.analysis.candidate_count(), 1);

        let select = report.analysis.candidates().next().unwrap().select.clone();
        session.commit(&select).unwrap();
        assert_eq!(session.sub_round(), 1);

        // No follow-up behaviours: the turn passes to b.
        let report = session.do_analyze(&a);
        assert!(report.is_turn_of(&PlayerId::new("b")));
        assert_eq!(session.round(), 1);
        assert!(report.eliminated.is_empty());
    }

    #[test]
    fn test_commit_rejects_foreign_piece() {
        let board = board(&[("a", 1, Some(Coord::new(0, 0))), ("b", 3, Some(Coord::new(7, 7)))]);
        let mut session = Session::new(board, EngineConfig::default()).unwrap();
        let select = Selection::new("b-piece", "b-piece-step").then(0);
        assert!(matches!(session.commit(&select), Err(EngineError::NotYourPiece { .. })));
    }

    #[test]
    fn test_stuck_player_is_eliminated_then_skipped() {
        let board = board(&[
            ("a", 1, Some(Coord::new(0, 7))),
            ("b", 1, Some(Coord::new(2, 2))),
            ("c", 1, Some(Coord::new(4, 2))),
        ]);
        let mut session = Session::new(board, EngineConfig::default()).unwrap();
        let b = PlayerId::new("b");
        let report = session.do_analyze(&b);
        assert_eq!(report.eliminated, vec![PlayerId::new("a")]);
        assert!(report.is_turn_of(&b));
        assert!(session.board().is_loser(&PlayerId::new("a")));

        let select = report.analysis.candidates().next().unwrap().select.clone();
        session.commit(&select).unwrap();
        let report = session.do_analyze(&b);
        assert!(report.is_turn_of(&PlayerId::new("c")));

        let select = report.analysis.candidates().next().unwrap().select.clone();
        session.commit(&select).unwrap();
        let report = session.do_analyze(&b);
        assert_eq!(report.skipped, vec![PlayerId::new("a")]);
        assert!(report.is_turn_of(&b));
    }

    #[test]
    fn test_random_playout_is_reproducible() {
        let make = || {
            let board = board(&[("a", 1, Some(Coord::new(0, 0))), ("b", 3, Some(Coord::new(7, 7)))]);
            Session::new(board, EngineConfig::default()).unwrap()
        };
        let mut first = make();
        let mut second = make();
        let a = first.play_random(&mut GameRng::new(9), 40);
        let b = second.play_random(&mut GameRng::new(9), 40);
        assert_eq!(a, b);
        assert_eq!(first.board().to_data(), second.board().to_data());
        // Both pawns walk to the far edge and get stuck.
        assert!(first.board().loser_count() >= 1);
    }
}
