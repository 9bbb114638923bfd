//! Board coordinates and seat orientation.
//!
//! Every player sees the board from their own seat. Seat 1 looks at the
//! global frame as-is; seats 2, 3 and 4 see it rotated by a quarter, half
//! and three-quarter turn. Pieces author their moves in the local frame
//! ("forward" is always +y for the owner), and the engine rotates them into
//! the global frame before touching the board.
//!
//! ```
//! use rust_piecework::board::{global_to_local, local_to_global, BoardSize, Coord, Seat};
//!
//! let size = BoardSize::new(8, 8);
//! let p = Coord::new(1, 2);
//!
//! let local = global_to_local(size, p, Seat::new(3), false);
//! assert_eq!(local, Coord::new(6, 5));
//! assert_eq!(local_to_global(size, local, Seat::new(3), false), p);
//!
//! // Relative vectors ignore the board extent.
//! let forward = local_to_global(size, Coord::new(0, 1), Seat::new(3), true);
//! assert_eq!(forward, Coord::new(0, -1));
//! ```

use serde::{Deserialize, Serialize};

/// A square (or a relative vector) on the board.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True for the zero vector.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Component-wise addition, `None` on overflow.
    #[must_use]
    pub const fn checked_offset(self, by: Coord) -> Option<Self> {
        match (self.x.checked_add(by.x), self.y.checked_add(by.y)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Declared rectangular board size, serialized as `[width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct BoardSize {
    pub width: i32,
    pub height: i32,
}

impl BoardSize {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True if the square lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

impl From<[i32; 2]> for BoardSize {
    fn from([width, height]: [i32; 2]) -> Self {
        Self::new(width, height)
    }
}

impl From<BoardSize> for [i32; 2] {
    fn from(s: BoardSize) -> Self {
        [s.width, s.height]
    }
}

/// A player's seat (`direct` in snapshots).
///
/// `0` means unseated; `1..=4` are the four rotational seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Seat {
    pub const UNSEATED: Seat = Seat(0);

    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// True for seats 1 through 4.
    #[must_use]
    pub const fn is_seated(self) -> bool {
        matches!(self.0, 1..=4)
    }
}

fn extent(size: BoardSize, no_offset: bool) -> (i32, i32) {
    if no_offset {
        (0, 0)
    } else {
        (size.width.wrapping_sub(1), size.height.wrapping_sub(1))
    }
}

/// Map a global square into `seat`'s local frame.
///
/// With `no_offset` only the rotation is applied, which is what relative
/// step vectors need. Unseated or unknown seats return `pos` unchanged.
/// Arithmetic wraps, so extreme snapshot values stay invertible instead of
/// overflowing.
#[must_use]
pub fn global_to_local(size: BoardSize, pos: Coord, seat: Seat, no_offset: bool) -> Coord {
    let (rx, ry) = extent(size, no_offset);
    let Coord { x, y } = pos;
    match seat.0 {
        1 => Coord::new(x, y),
        2 => Coord::new(y, rx.wrapping_sub(x)),
        3 => Coord::new(rx.wrapping_sub(x), ry.wrapping_sub(y)),
        4 => Coord::new(ry.wrapping_sub(y), x),
        _ => pos,
    }
}

/// Map a square in `seat`'s local frame back into the global frame.
///
/// Inverse of [`global_to_local`] for the same `size`, `seat` and
/// `no_offset`.
#[must_use]
pub fn local_to_global(size: BoardSize, pos: Coord, seat: Seat, no_offset: bool) -> Coord {
    let (rx, ry) = extent(size, no_offset);
    let Coord { x, y } = pos;
    match seat.0 {
        1 => Coord::new(x, y),
        2 => Coord::new(rx.wrapping_sub(y), x),
        3 => Coord::new(rx.wrapping_sub(x), ry.wrapping_sub(y)),
        4 => Coord::new(y, ry.wrapping_sub(x)),
        _ => pos,
    }
}
