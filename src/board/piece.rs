//! Pieces and piece packages.

use serde::{Deserialize, Serialize};

use crate::conditions::PrimitiveRegistry;
use crate::core::{DesignId, GameRng, PieceId};
use crate::error::LoadIssue;
use crate::rules::{ActionRegistry, Behaviour, BehaviourData, BehaviourType};

/// A piece: identity, display metadata and its behaviours.
///
/// Pieces are immutable during play. Captured pieces stay in the board's
/// registry; only their entry in `state` goes away.
#[derive(Clone, Debug)]
pub struct Piece {
    pub id: PieceId,
    /// The design this piece was instantiated from.
    pub template: DesignId,
    pub name: String,
    pub img: String,
    pub behaviours: Vec<Behaviour>,
}

impl Piece {
    pub fn new(id: impl Into<PieceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: DesignId::nil(),
            name: name.into(),
            img: String::new(),
            behaviours: Vec::new(),
        }
    }

    /// Add a behaviour (builder pattern).
    #[must_use]
    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviours.push(behaviour);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<DesignId>) -> Self {
        self.template = template.into();
        self
    }

    /// Behaviours of one firing class, in authored order.
    pub fn behaviours_of(&self, kind: BehaviourType) -> impl Iterator<Item = &Behaviour> {
        self.behaviours.iter().filter(move |b| b.kind == kind)
    }

    #[must_use]
    pub fn behaviour(&self, id: &crate::core::BehaviourId) -> Option<&Behaviour> {
        self.behaviours.iter().find(|b| &b.id == id)
    }

    pub fn from_data(
        data: &PieceData,
        actions: &ActionRegistry,
        primitives: &PrimitiveRegistry,
        issues: &mut Vec<LoadIssue>,
    ) -> Self {
        Self {
            id: data.id.clone(),
            template: data.template.clone(),
            name: data.name.clone(),
            img: data.img.clone(),
            behaviours: data
                .behaviours
                .iter()
                .map(|b| Behaviour::from_data(b, actions, primitives, issues))
                .collect(),
        }
    }

    #[must_use]
    pub fn to_data(&self) -> PieceData {
        PieceData {
            name: self.name.clone(),
            template: self.template.clone(),
            id: self.id.clone(),
            img: self.img.clone(),
            behaviours: self.behaviours.iter().map(Behaviour::to_data).collect(),
        }
    }
}

/// Snapshot form of a piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceData {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub template: DesignId,

    #[serde(rename = "uuid")]
    pub id: PieceId,

    #[serde(default)]
    pub img: String,

    #[serde(default)]
    pub behaviours: Vec<BehaviourData>,
}

impl PieceData {
    /// Fresh identities for the piece and everything it contains.
    pub fn re_id(&mut self, rng: &mut GameRng) {
        self.id = PieceId::generate(rng);
        for behaviour in &mut self.behaviours {
            behaviour.re_id(rng);
        }
    }
}

/// A named collection of piece designs.
#[derive(Clone, Debug)]
pub struct Package {
    pub id: DesignId,
    pub name: String,
    pub entities: Vec<Piece>,
}

impl Package {
    pub fn from_data(
        data: &PackageData,
        actions: &ActionRegistry,
        primitives: &PrimitiveRegistry,
        issues: &mut Vec<LoadIssue>,
    ) -> Self {
        Self {
            id: data.id.clone(),
            name: data.name.clone(),
            entities: data
                .entities
                .iter()
                .map(|p| Piece::from_data(p, actions, primitives, issues))
                .collect(),
        }
    }

    #[must_use]
    pub fn to_data(&self) -> PackageData {
        PackageData {
            name: self.name.clone(),
            id: self.id.clone(),
            entities: self.entities.iter().map(Piece::to_data).collect(),
        }
    }
}

/// Snapshot form of a package.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "uuid", default)]
    pub id: DesignId,

    #[serde(default)]
    pub entities: Vec<PieceData>,
}

impl PackageData {
    /// Fresh identities throughout, for copying designs into a new package.
    pub fn re_id(&mut self, rng: &mut GameRng) {
        self.id = DesignId::generate(rng);
        for entity in &mut self.entities {
            entity.re_id(rng);
        }
    }
}
