//! Player seats.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, UserId};

use super::position::Seat;

/// A seat at the table.
///
/// The `user` link is filled in by the session layer; the engine only
/// compares player identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Seat orientation: 0 unseated, 1..=4 rotational seats.
    #[serde(rename = "direct")]
    pub seat: Seat,

    #[serde(rename = "uuid")]
    pub id: PlayerId,

    #[serde(default)]
    pub user: UserId,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, seat: u8) -> Self {
        Self {
            seat: Seat::new(seat),
            id: id.into(),
            user: UserId::nil(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<UserId>) -> Self {
        self.user = user.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let player = Player::new("white", 1).with_user("alice");
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["direct"], 1);
        assert_eq!(json["uuid"], "white");
        assert_eq!(json["user"], "alice");

        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back, player);
    }
}
