//! Identity types for everything stored in a board snapshot.
//!
//! Snapshots identify pieces, players, nations, behaviours and action steps
//! by opaque strings (UUIDs in practice). Each kind of identity gets its own
//! newtype so a piece id can never be passed where a player id is expected.
//!
//! ```
//! use rust_piecework::core::{PieceId, PlayerId};
//!
//! let rook = PieceId::new("rook-a");
//! let white = PlayerId::new("white");
//!
//! assert_eq!(rook.as_str(), "rook-a");
//! assert!(!white.is_nil());
//! assert!(PlayerId::nil().is_nil());
//! ```

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// The all-zero UUID used for "no identity yet".
pub const NIL_ID: &str = "00000000-0000-0000-0000-000000000000";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identity string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The nil identity.
            #[must_use]
            pub fn nil() -> Self {
                Self(NIL_ID.to_string())
            }

            /// Draw a fresh random identity (UUID v4 layout) from `rng`.
            pub fn generate(rng: &mut GameRng) -> Self {
                Self(rng.uuid_v4())
            }

            /// Borrow the raw identity string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the nil identity or an empty string.
            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_empty() || self.0 == NIL_ID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

string_id!(
    /// Identity of a piece placed on (or removed from) a board.
    PieceId,
    "Piece"
);

string_id!(
    /// Identity of a seat at the table.
    PlayerId,
    "Player"
);

string_id!(
    /// Identity of an ownership group.
    NationId,
    "Nation"
);

string_id!(
    /// Identity of a behaviour inside a piece template.
    BehaviourId,
    "Behaviour"
);

string_id!(
    /// Identity of one step (action or condition) inside a behaviour.
    ActionId,
    "Action"
);

string_id!(
    /// Identity of a board, package or other top-level design.
    DesignId,
    "Design"
);

string_id!(
    /// Identity of an external user account linked to a player seat.
    UserId,
    "User"
);
