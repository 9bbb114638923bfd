//! Per-board auxiliary counters.
//!
//! A monitor keeps a counter per piece that moves update and conditions
//! read. The engine ships one kind, [`STEP_MONITOR`], which counts how many
//! times each piece has changed square (pawns use it for their double step).
//! Fields of unknown monitor kinds are carried through untouched.

use serde::{Deserialize, Serialize};

use crate::core::PieceId;

/// Type name of the move-count monitor.
pub const STEP_MONITOR: &str = "vanilla.step";

/// Counters keyed by piece identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub counters: Vec<(PieceId, u32)>,

    /// Fields this engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Monitor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            counters: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// The move-count monitor with no moves recorded.
    #[must_use]
    pub fn step() -> Self {
        Self::new(STEP_MONITOR)
    }

    /// Current count for `piece` (0 if never counted).
    #[must_use]
    pub fn count(&self, piece: &PieceId) -> u32 {
        self.counters
            .iter()
            .find(|(id, _)| id == piece)
            .map_or(0, |(_, n)| *n)
    }

    /// Add one to `piece`'s counter.
    pub fn bump(&mut self, piece: &PieceId) {
        match self.counters.iter_mut().find(|(id, _)| id == piece) {
            Some((_, n)) => *n += 1,
            None => self.counters.push((piece.clone(), 1)),
        }
    }

    /// Rename counter keys after identities were re-keyed.
    pub fn rename_pieces(&mut self, rename: impl Fn(&PieceId) -> Option<PieceId>) {
        for (id, _) in &mut self.counters {
            if let Some(new_id) = rename(id) {
                *id = new_id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_and_count() {
        let mut monitor = Monitor::step();
        let pawn = PieceId::new("pawn");
        assert_eq!(monitor.count(&pawn), 0);
        monitor.bump(&pawn);
        monitor.bump(&pawn);
        assert_eq!(monitor.count(&pawn), 2);
        assert_eq!(monitor.counters.len(), 1);
    }

    #[test]
    fn test_unknown_fields_survive() {
        let json = r#"{"type":"mod.clock","counters":[["a",3]],"limit":40}"#;
        let monitor: Monitor = serde_json::from_str(json).unwrap();
        assert_eq!(monitor.kind, "mod.clock");
        assert_eq!(monitor.count(&PieceId::new("a")), 3);

        let back = serde_json::to_value(&monitor).unwrap();
        assert_eq!(back["limit"], 40);
        assert_eq!(back["counters"][0][1], 3);
    }
}
