//! Ownership groups.
//!
//! Nations form a forest: each root nation may contain nested nations and
//! direct piece references. A player claims a root nation by becoming its
//! `monarch` and thereby controls every piece anywhere in that subtree.
//!
//! ## Storage
//!
//! Nations live in an arena ([`NationForest`]) and refer to nested groups by
//! arena key, so re-parenting a piece never has to rebuild the tree. The
//! snapshot format nests them instead; [`NationData`] is that wire form.
//!
//! ```
//! use rust_piecework::board::{Nation, NationForest};
//! use rust_piecework::core::{PieceId, PlayerId};
//!
//! let mut forest = NationForest::new();
//! let white = forest.add_root(Nation::new("n-white", "White").with_monarch("p1"));
//! let guard = forest.add_group(white, Nation::new("n-guard", "Guard"));
//! forest.add_piece(guard, PieceId::new("rook"));
//!
//! assert_eq!(forest.monarch_of(&PieceId::new("rook")), Some(&PlayerId::new("p1")));
//! assert_eq!(forest.monarch_of(&PieceId::new("pawn")), None);
//! ```

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{NationId, PieceId, PlayerId};

/// Arena key of a nation inside a [`NationForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NationKey(pub u32);

impl NationKey {
    #[must_use]
    pub fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

/// A child of a nation: either a nested group or a direct piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NationChild {
    Group(NationKey),
    Leaf(PieceId),
}

/// An ownership group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    /// Index into the board kind's color map; negative means uncolored.
    pub color: i32,
    /// The claiming player, if any.
    pub monarch: Option<PlayerId>,
    pub children: Vec<NationChild>,
}

impl Nation {
    pub fn new(id: impl Into<NationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: -1,
            monarch: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_monarch(mut self, monarch: impl Into<PlayerId>) -> Self {
        self.monarch = Some(monarch.into());
        self
    }
}

/// Arena of nations with an ordered list of roots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NationForest {
    nodes: Vec<Nation>,
    roots: Vec<NationKey>,
}

impl NationForest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` nations.
    fn push(&mut self, nation: Nation) -> NationKey {
        let Ok(index) = u32::try_from(self.nodes.len()) else {
            panic!("nation forest is full ({} nations)", self.nodes.len());
        };
        self.nodes.push(nation);
        NationKey(index)
    }

    /// Add a top-level nation.
    pub fn add_root(&mut self, nation: Nation) -> NationKey {
        let key = self.push(nation);
        self.roots.push(key);
        key
    }

    /// Add a nation nested under `parent`.
    pub fn add_group(&mut self, parent: NationKey, nation: Nation) -> NationKey {
        let key = self.push(nation);
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.push(NationChild::Group(key));
        }
        key
    }

    /// Put a piece directly under `parent`.
    pub fn add_piece(&mut self, parent: NationKey, piece: PieceId) {
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.push(NationChild::Leaf(piece));
        }
    }

    /// Remove every direct reference to `piece`. Returns true if one existed.
    pub fn detach_piece(&mut self, piece: &PieceId) -> bool {
        let mut found = false;
        for node in &mut self.nodes {
            let before = node.children.len();
            node.children
                .retain(|child| !matches!(child, NationChild::Leaf(p) if p == piece));
            found |= node.children.len() != before;
        }
        found
    }

    /// Re-parent a piece under `parent`, keeping the one-subtree invariant.
    pub fn move_piece(&mut self, piece: PieceId, parent: NationKey) {
        self.detach_piece(&piece);
        self.add_piece(parent, piece);
    }

    #[must_use]
    pub fn get(&self, key: NationKey) -> Option<&Nation> {
        self.nodes.get(key.index())
    }

    pub fn get_mut(&mut self, key: NationKey) -> Option<&mut Nation> {
        self.nodes.get_mut(key.index())
    }

    /// Find a nation by identity (first match in arena order).
    #[must_use]
    pub fn find(&self, id: &NationId) -> Option<NationKey> {
        self.nodes
            .iter()
            .position(|n| &n.id == id)
            .and_then(|i| u32::try_from(i).ok())
            .map(NationKey)
    }

    /// Top-level nations in snapshot order.
    #[must_use]
    pub fn roots(&self) -> &[NationKey] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every piece in the subtree rooted at `root`, breadth-first.
    #[must_use]
    pub fn pieces_under(&self, root: NationKey) -> Vec<&PieceId> {
        let mut out = Vec::new();
        self.walk(root, |child| {
            if let NationChild::Leaf(piece) = child {
                out.push(piece);
            }
            false
        });
        out
    }

    /// Breadth-first walk below `root`; stops early when `visit` returns true.
    fn walk<'a>(&'a self, root: NationKey, mut visit: impl FnMut(&'a NationChild) -> bool) -> bool {
        let Some(start) = self.get(root) else {
            return false;
        };
        let mut seen = FxHashSet::default();
        seen.insert(root);
        let mut queue: VecDeque<&NationChild> = start.children.iter().collect();
        while let Some(child) = queue.pop_front() {
            if visit(child) {
                return true;
            }
            if let NationChild::Group(key) = child {
                if seen.insert(*key) {
                    if let Some(node) = self.get(*key) {
                        queue.extend(node.children.iter());
                    }
                }
            }
        }
        false
    }

    /// The root nation whose subtree holds `piece`.
    #[must_use]
    pub fn root_of(&self, piece: &PieceId) -> Option<NationKey> {
        self.roots.iter().copied().find(|&root| {
            self.walk(root, |child| matches!(child, NationChild::Leaf(p) if p == piece))
        })
    }

    /// The monarch of the root nation holding `piece`, if claimed.
    #[must_use]
    pub fn monarch_of(&self, piece: &PieceId) -> Option<&PlayerId> {
        self.root_of(piece)
            .and_then(|root| self.get(root))
            .and_then(|nation| nation.monarch.as_ref())
    }

    /// Root nations claimed by `player`.
    pub fn claimed_by<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = NationKey> + 'a {
        self.roots
            .iter()
            .copied()
            .filter(move |&root| {
                self.get(root)
                    .is_some_and(|n| n.monarch.as_ref() == Some(player))
            })
    }

    /// Pieces referenced from more than one place in the forest.
    #[must_use]
    pub fn duplicated_pieces(&self) -> Vec<PieceId> {
        let mut seen = FxHashSet::default();
        let mut dupes = Vec::new();
        for root in &self.roots {
            for piece in self.pieces_under(*root) {
                if !seen.insert(piece) && !dupes.contains(piece) {
                    dupes.push(piece.clone());
                }
            }
        }
        dupes
    }

    /// Every direct piece reference with the nation holding it.
    pub fn members(&self) -> impl Iterator<Item = (&Nation, &PieceId)> {
        self.nodes.iter().flat_map(|n| {
            n.children.iter().filter_map(move |c| match c {
                NationChild::Leaf(p) => Some((n, p)),
                NationChild::Group(_) => None,
            })
        })
    }

    /// Rename piece references, e.g. after re-keying identities.
    pub fn rename_pieces(&mut self, rename: impl Fn(&PieceId) -> Option<PieceId>) {
        for node in &mut self.nodes {
            for child in &mut node.children {
                if let NationChild::Leaf(piece) = child {
                    if let Some(new_id) = rename(piece) {
                        *piece = new_id;
                    }
                }
            }
        }
    }

    /// Give every nation a fresh identity.
    pub fn re_id(&mut self, mut fresh: impl FnMut() -> NationId) {
        for node in &mut self.nodes {
            node.id = fresh();
        }
    }

    /// Convert to the nested wire form.
    #[must_use]
    pub fn to_data(&self) -> Vec<NationData> {
        self.roots
            .iter()
            .filter_map(|&root| self.node_data(root, &mut FxHashSet::default()))
            .collect()
    }

    fn node_data(&self, key: NationKey, seen: &mut FxHashSet<NationKey>) -> Option<NationData> {
        if !seen.insert(key) {
            return None;
        }
        let node = self.get(key)?;
        let sub = node
            .children
            .iter()
            .filter_map(|child| match child {
                NationChild::Leaf(piece) => Some(NationChildData::Piece(piece.clone())),
                NationChild::Group(k) => self.node_data(*k, seen).map(NationChildData::Group),
            })
            .collect();
        Some(NationData {
            name: node.name.clone(),
            uuid: node.id.clone(),
            color: node.color,
            monarch: node.monarch.as_ref().map(|p| p.0.clone()).unwrap_or_default(),
            sub,
        })
    }

    /// Build from the nested wire form.
    #[must_use]
    pub fn from_data(data: &[NationData]) -> Self {
        let mut forest = Self::new();
        for nation in data {
            let key = forest.add_root(nation.to_nation());
            forest.fill(key, &nation.sub);
        }
        forest
    }

    fn fill(&mut self, parent: NationKey, sub: &[NationChildData]) {
        for child in sub {
            match child {
                NationChildData::Piece(piece) => self.add_piece(parent, piece.clone()),
                NationChildData::Group(nested) => {
                    let key = self.add_group(parent, nested.to_nation());
                    self.fill(key, &nested.sub);
                }
            }
        }
    }
}

/// Wire form of a nation: children are piece ids or nested nations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: NationId,
    #[serde(default = "uncolored")]
    pub color: i32,
    /// Claiming player id, empty when unclaimed.
    #[serde(default)]
    pub monarch: String,
    #[serde(default)]
    pub sub: Vec<NationChildData>,
}

fn uncolored() -> i32 {
    -1
}

impl NationData {
    fn to_nation(&self) -> Nation {
        Nation {
            id: self.uuid.clone(),
            name: self.name.clone(),
            color: self.color,
            monarch: (!self.monarch.is_empty()).then(|| PlayerId::new(self.monarch.clone())),
            children: Vec::new(),
        }
    }
}

/// A wire-form nation child.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NationChildData {
    Piece(PieceId),
    Group(NationData),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NationForest {
        let mut forest = NationForest::new();
        let white = forest.add_root(Nation::new("w", "White").with_monarch("p1").with_color(0));
        forest.add_piece(white, PieceId::new("wk"));
        let guard = forest.add_group(white, Nation::new("wg", "Guard").with_monarch("p9"));
        forest.add_piece(guard, PieceId::new("wr"));

        let black = forest.add_root(Nation::new("b", "Black").with_color(1));
        forest.add_piece(black, PieceId::new("bk"));
        forest
    }

    #[test]
    fn test_nested_piece_uses_root_monarch() {
        let forest = sample();
        assert_eq!(forest.monarch_of(&PieceId::new("wk")), Some(&PlayerId::new("p1")));
        assert_eq!(forest.monarch_of(&PieceId::new("wr")), Some(&PlayerId::new("p1")));
    }

    #[test]
    fn test_unclaimed_and_orphan_have_no_monarch() {
        let forest = sample();
        assert_eq!(forest.monarch_of(&PieceId::new("bk")), None);
        assert_eq!(forest.monarch_of(&PieceId::new("nowhere")), None);
    }

    #[test]
    fn test_pieces_under_is_breadth_first() {
        let forest = sample();
        let root = forest.roots()[0];
        let pieces: Vec<_> = forest.pieces_under(root).into_iter().cloned().collect();
        assert_eq!(pieces, vec![PieceId::new("wk"), PieceId::new("wr")]);
    }

    #[test]
    fn test_move_piece_keeps_single_membership() {
        let mut forest = sample();
        let black = forest.find(&NationId::new("b")).unwrap();
        forest.move_piece(PieceId::new("wr"), black);
        assert_eq!(forest.root_of(&PieceId::new("wr")), Some(black));
        assert!(forest.duplicated_pieces().is_empty());
    }

    #[test]
    fn test_keys_follow_arena_order() {
        let forest = sample();
        let keys: Vec<_> = ["w", "wg", "b", "missing"]
            .iter()
            .map(|id| forest.find(&NationId::new(*id)))
            .collect();
        assert_eq!(keys, vec![Some(NationKey(0)), Some(NationKey(1)), Some(NationKey(2)), None]);
        assert_eq!(forest.get(NationKey(1)).map(|n| n.name.as_str()), Some("Guard"));
        assert_eq!(NationKey(2).index(), 2);
    }

    #[test]
    fn test_duplicates_detected() {
        let mut forest = sample();
        let black = forest.find(&NationId::new("b")).unwrap();
        forest.add_piece(black, PieceId::new("wk"));
        assert_eq!(forest.duplicated_pieces(), vec![PieceId::new("wk")]);
    }

    #[test]
    fn test_wire_roundtrip() {
        let forest = sample();
        let data = forest.to_data();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].monarch, "");

        let json = serde_json::to_string(&data).unwrap();
        let parsed: Vec<NationData> = serde_json::from_str(&json).unwrap();
        let rebuilt = NationForest::from_data(&parsed);
        assert_eq!(rebuilt.to_data(), data);
        assert_eq!(rebuilt.monarch_of(&PieceId::new("wr")), Some(&PlayerId::new("p1")));
    }

    #[test]
    fn test_wire_children_mix_ids_and_groups() {
        let json = r#"[{"name":"A","uuid":"a","color":0,"monarch":"p",
            "sub":["x",{"name":"B","uuid":"b","color":-1,"monarch":"","sub":["y"]}]}]"#;
        let parsed: Vec<NationData> = serde_json::from_str(json).unwrap();
        let forest = NationForest::from_data(&parsed);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.monarch_of(&PieceId::new("y")), Some(&PlayerId::new("p")));
    }
}
