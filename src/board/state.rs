//! The board: pieces, ownership, seats, counters and placement.
//!
//! Boards are persistent values. Collections are `im` vectors and the
//! nation forest sits behind an `Arc`, so cloning a board for a
//! hypothetical branch is cheap and never shares mutable state with the
//! original.
//!
//! ## Snapshot format
//!
//! ```text
//! {type, name, uuid, pieces, nations, players, monitors,
//!  state: [[piece-id, [x, y]], ...], size: [w, h], losers}
//! ```
//!
//! [`BoardData`] mirrors that format field for field; [`Board::from_data`]
//! resolves it against a set of registries. `Board` itself implements
//! serde through `BoardData` using the process-wide registries.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{DesignId, EngineConfig, GameRng, NationId, PieceId, PlayerId};
use crate::error::{EngineError, LoadIssue};
use crate::registry::{self, BoardKindRegistry, Registries};

use super::monitor::{Monitor, STEP_MONITOR};
use super::nation::{NationData, NationForest};
use super::piece::{Piece, PieceData};
use super::player::Player;
use super::position::{BoardSize, Coord};

/// Type name of the engine's own board kind.
pub const VANILLA_BASIC: &str = "vanilla.basic";

/// A board snapshot resolved against the registries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "BoardData", into = "BoardData")]
pub struct Board {
    /// Board kind name.
    pub kind: String,
    pub name: String,
    pub id: DesignId,
    pub size: BoardSize,
    pieces: Vector<Arc<Piece>>,
    nations: Arc<NationForest>,
    players: Vector<Player>,
    monitors: Vector<Monitor>,
    state: Vector<(PieceId, Coord)>,
    losers: Vector<PlayerId>,
}

impl Board {
    /// An empty `vanilla.basic` board with a step monitor.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            kind: VANILLA_BASIC.to_string(),
            name: name.into(),
            id: DesignId::nil(),
            size: BoardSize::new(width, height),
            pieces: Vector::new(),
            nations: Arc::new(NationForest::new()),
            players: Vector::new(),
            monitors: Vector::unit(Monitor::step()),
            state: Vector::new(),
            losers: Vector::new(),
        }
    }

    // === Construction ===

    /// Register a piece, optionally placing it.
    pub fn add_piece(&mut self, piece: Piece, at: Option<Coord>) {
        if let Some(at) = at {
            self.set_position(&piece.id, at);
        }
        self.pieces.push_back(Arc::new(piece));
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.push_back(player);
    }

    pub fn add_monitor(&mut self, monitor: Monitor) {
        self.monitors.push_back(monitor);
    }

    /// Mutable access to the nation forest; copies it if shared.
    pub fn nations_mut(&mut self) -> &mut NationForest {
        Arc::make_mut(&mut self.nations)
    }

    // === Queries ===

    /// Pieces in registry order.
    pub fn pieces(&self) -> impl Iterator<Item = &Arc<Piece>> {
        self.pieces.iter()
    }

    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<&Arc<Piece>> {
        self.pieces.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn nations(&self) -> &NationForest {
        &self.nations
    }

    /// Players in seating order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Player at a seating index.
    #[must_use]
    pub fn player_at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    /// First monitor of a kind.
    #[must_use]
    pub fn monitor(&self, kind: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.kind == kind)
    }

    /// Placed pieces in placement order.
    pub fn placements(&self) -> impl Iterator<Item = (&PieceId, Coord)> {
        self.state.iter().map(|(id, at)| (id, *at))
    }

    /// Eliminated players in elimination order.
    pub fn losers(&self) -> impl Iterator<Item = &PlayerId> {
        self.losers.iter()
    }

    #[must_use]
    pub fn loser_count(&self) -> usize {
        self.losers.len()
    }

    #[must_use]
    pub fn is_loser(&self, player: &PlayerId) -> bool {
        self.losers.contains(player)
    }

    #[must_use]
    pub fn position_of(&self, piece: &PieceId) -> Option<Coord> {
        self.state.iter().find(|(id, _)| id == piece).map(|(_, at)| *at)
    }

    #[must_use]
    pub fn piece_at(&self, square: Coord) -> Option<&PieceId> {
        self.state.iter().find(|(_, at)| *at == square).map(|(id, _)| id)
    }

    /// The player controlling `piece`: the monarch of its root nation.
    ///
    /// Pieces outside every nation, pieces of unclaimed nations and
    /// monarchs that are not seated players all resolve to `None`.
    #[must_use]
    pub fn owner_of(&self, piece: &PieceId) -> Option<&Player> {
        let monarch = self.nations.monarch_of(piece)?;
        self.player(monarch)
    }

    /// Pieces controlled by `player`, in registry order.
    pub fn pieces_of<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = &'a Arc<Piece>> + 'a {
        self.pieces
            .iter()
            .filter(move |p| self.owner_of(&p.id).is_some_and(|o| &o.id == player))
    }

    #[must_use]
    pub fn in_bounds(&self, square: Coord) -> bool {
        self.size.contains(square)
    }

    /// How many times `piece` has changed square.
    #[must_use]
    pub fn step_count(&self, piece: &PieceId) -> u32 {
        self.monitor(STEP_MONITOR).map_or(0, |m| m.count(piece))
    }

    // === Updates ===

    /// Place or move a piece.
    pub fn set_position(&mut self, piece: &PieceId, at: Coord) {
        match self.state.iter().position(|(id, _)| id == piece) {
            Some(index) => {
                self.state.set(index, (piece.clone(), at));
            }
            None => self.state.push_back((piece.clone(), at)),
        }
    }

    /// Take a piece off the board. Returns false if it was not placed.
    pub fn remove_piece(&mut self, piece: &PieceId) -> bool {
        match self.state.iter().position(|(id, _)| id == piece) {
            Some(index) => {
                self.state.remove(index);
                true
            }
            None => false,
        }
    }

    /// Record an elimination. Already eliminated players are not repeated.
    pub fn push_loser(&mut self, player: PlayerId) -> bool {
        if self.losers.contains(&player) {
            return false;
        }
        self.losers.push_back(player);
        true
    }

    /// Count one move of `piece` on every step monitor.
    pub fn record_move(&mut self, piece: &PieceId) {
        for monitor in self.monitors.iter_mut() {
            if monitor.kind == STEP_MONITOR {
                monitor.bump(piece);
            }
        }
    }

    // === Integrity ===

    /// Check the model invariants.
    #[must_use]
    pub fn validate(&self, kinds: &BoardKindRegistry) -> Vec<LoadIssue> {
        let mut issues = Vec::new();
        if !kinds.contains(&self.kind) {
            issues.push(LoadIssue::UnknownBoardKind(self.kind.clone()));
        }

        let mut occupied: FxHashMap<Coord, &PieceId> = FxHashMap::default();
        for (id, at) in &self.state {
            if self.piece(id).is_none() {
                issues.push(LoadIssue::DanglingState(id.clone()));
            }
            if !self.in_bounds(*at) {
                issues.push(LoadIssue::OutOfBounds {
                    piece: id.clone(),
                    x: at.x,
                    y: at.y,
                });
            }
            if let Some(first) = occupied.insert(*at, id) {
                issues.push(LoadIssue::SharedSquare {
                    first: first.clone(),
                    second: id.clone(),
                    x: at.x,
                    y: at.y,
                });
            }
        }

        for piece in self.nations.duplicated_pieces() {
            issues.push(LoadIssue::MultipleNations(piece));
        }
        for (nation, piece) in self.nations.members() {
            if self.piece(piece).is_none() {
                issues.push(LoadIssue::DanglingNationMember {
                    nation: nation.id.clone(),
                    piece: piece.clone(),
                });
            }
        }
        issues
    }

    // === Snapshots ===

    /// Resolve a snapshot.
    ///
    /// Authoring problems are returned alongside the board. With
    /// `strict_load` set, any problem fails the load instead.
    pub fn from_data(
        data: &BoardData,
        registries: &Registries,
        config: &EngineConfig,
    ) -> Result<(Self, Vec<LoadIssue>), EngineError> {
        let mut issues = Vec::new();
        let pieces = data
            .pieces
            .iter()
            .map(|p| Arc::new(Piece::from_data(p, &registries.actions, &registries.primitives, &mut issues)))
            .collect();

        let mut monitors: Vector<Monitor> = data.monitors.iter().cloned().collect();
        if monitors.is_empty() {
            monitors.push_back(Monitor::step());
        }

        let board = Self {
            kind: data.kind.clone(),
            name: data.name.clone(),
            id: data.id.clone(),
            size: data.size,
            pieces,
            nations: Arc::new(NationForest::from_data(&data.nations)),
            players: data.players.iter().cloned().collect(),
            monitors,
            state: data.state.iter().cloned().collect(),
            losers: data.losers.iter().cloned().collect(),
        };

        let integrity = board.validate(&registries.boards);
        for issue in &integrity {
            log::warn!("{issue}");
        }
        issues.extend(integrity);

        if config.strict_load && !issues.is_empty() {
            return Err(EngineError::Integrity(issues));
        }
        log::debug!(
            "loaded board {} ({} pieces, {} issues)",
            board.id,
            board.pieces.len(),
            issues.len()
        );
        Ok((board, issues))
    }

    #[must_use]
    pub fn to_data(&self) -> BoardData {
        BoardData {
            kind: self.kind.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            pieces: self.pieces.iter().map(|p| p.to_data()).collect(),
            nations: self.nations.to_data(),
            players: self.players.iter().cloned().collect(),
            monitors: self.monitors.iter().cloned().collect(),
            state: self.state.iter().cloned().collect(),
            size: self.size,
            losers: self.losers.iter().cloned().collect(),
        }
    }

    /// Parse snapshot JSON.
    pub fn from_json(
        text: &str,
        registries: &Registries,
        config: &EngineConfig,
    ) -> Result<(Self, Vec<LoadIssue>), EngineError> {
        let data: BoardData = serde_json::from_str(text).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        Self::from_data(&data, registries, config)
    }

    /// Serialize to snapshot JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.to_data()).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

impl TryFrom<BoardData> for Board {
    type Error = EngineError;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        Board::from_data(&data, registry::global(), &EngineConfig::default()).map(|(board, _)| board)
    }
}

impl From<Board> for BoardData {
    fn from(board: Board) -> Self {
        board.to_data()
    }
}

/// Snapshot form of a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "uuid", default)]
    pub id: DesignId,

    #[serde(default)]
    pub pieces: Vec<PieceData>,

    #[serde(default)]
    pub nations: Vec<NationData>,

    #[serde(default)]
    pub players: Vec<Player>,

    #[serde(default)]
    pub monitors: Vec<Monitor>,

    #[serde(default)]
    pub state: Vec<(PieceId, Coord)>,

    #[serde(default)]
    pub size: BoardSize,

    #[serde(default)]
    pub losers: Vec<PlayerId>,
}

impl BoardData {
    /// Fresh identities for the board, its pieces and its nations.
    ///
    /// Placements, nation membership and monitor counters follow the
    /// renamed pieces.
    pub fn re_id(&mut self, rng: &mut GameRng) {
        self.id = DesignId::generate(rng);

        let mut renamed: FxHashMap<PieceId, PieceId> = FxHashMap::default();
        for piece in &mut self.pieces {
            let old = piece.id.clone();
            piece.re_id(rng);
            renamed.insert(old, piece.id.clone());
        }
        let rename = |id: &PieceId| renamed.get(id).cloned();

        for (id, _) in &mut self.state {
            if let Some(new_id) = rename(id) {
                *id = new_id;
            }
        }
        for monitor in &mut self.monitors {
            monitor.rename_pieces(rename);
        }

        let mut forest = NationForest::from_data(&self.nations);
        forest.rename_pieces(rename);
        forest.re_id(|| NationId::generate(rng));
        self.nations = forest.to_data();
    }
}
