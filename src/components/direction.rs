//! Compass facing of a mobile.
//!
//! A [`Direction`] is the wire byte the server sends: a compass code in the
//! low three bits plus an optional running modifier in the high bit. The
//! engine compares facings by compass component only; use
//! [`Direction::same_compass`] for that.
//!
//! [`resolve_direction`] maps a tile delta to the compass direction of travel.

use serde::{Deserialize, Serialize};

/// Running modifier bit carried by the wire byte.
pub const RUNNING_BIT: u8 = 0x80;
/// Mask of the compass component.
pub const COMPASS_MASK: u8 = 0x07;
/// Wire value used for "no direction".
pub const NONE_BITS: u8 = 0xED;

/// The eight compass values in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Compass {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Compass value from the low three bits of `bits`.
    pub fn from_code(bits: u8) -> Self {
        Self::ALL[(bits & COMPASS_MASK) as usize]
    }

    /// True for North, East, South and West.
    pub fn is_cardinal(self) -> bool {
        (self as u8) % 2 == 0
    }
}

/// Facing of a mobile or a queued step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// No facing; produced by [`resolve_direction`] for a zero delta.
    #[default]
    None,
    Facing { compass: Compass, running: bool },
}

impl Direction {
    pub const fn new(compass: Compass) -> Self {
        Direction::Facing {
            compass,
            running: false,
        }
    }

    /// Decode a wire byte. Anything with bits outside the compass and running
    /// masks decodes to [`Direction::None`].
    pub fn from_bits(bits: u8) -> Self {
        if bits & !(COMPASS_MASK | RUNNING_BIT) != 0 {
            return Direction::None;
        }
        Direction::Facing {
            compass: Compass::from_code(bits),
            running: bits & RUNNING_BIT != 0,
        }
    }

    /// Encode to the wire byte.
    pub fn bits(self) -> u8 {
        match self {
            Direction::None => NONE_BITS,
            Direction::Facing { compass, running } => {
                compass as u8 | if running { RUNNING_BIT } else { 0 }
            }
        }
    }

    pub fn compass(self) -> Option<Compass> {
        match self {
            Direction::None => None,
            Direction::Facing { compass, .. } => Some(compass),
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Direction::Facing { running: true, .. })
    }

    /// Same facing with the running modifier set or cleared.
    pub fn with_running(self, running: bool) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Facing { compass, .. } => Direction::Facing { compass, running },
        }
    }

    /// Compass-only equality; the running modifier is ignored.
    pub fn same_compass(self, other: Direction) -> bool {
        self.compass() == other.compass()
    }
}

impl From<Compass> for Direction {
    fn from(compass: Compass) -> Self {
        Direction::new(compass)
    }
}

/// Direction of travel from `(cur_x, cur_y)` to `(new_x, new_y)`.
///
/// Classification uses the sign of each delta independently, not the angle,
/// so any positive-x/positive-y delta is South-East regardless of magnitude.
pub fn resolve_direction(cur_x: i32, cur_y: i32, new_x: i32, new_y: i32) -> Direction {
    use std::cmp::Ordering::{Equal, Greater, Less};

    let compass = match (new_x.cmp(&cur_x), new_y.cmp(&cur_y)) {
        (Greater, Greater) => Compass::SouthEast,
        (Greater, Equal) => Compass::East,
        (Greater, Less) => Compass::NorthEast,
        (Equal, Greater) => Compass::South,
        (Equal, Equal) => return Direction::None,
        (Equal, Less) => Compass::North,
        (Less, Greater) => Compass::SouthWest,
        (Less, Equal) => Compass::West,
        (Less, Less) => Compass::NorthWest,
    };
    Direction::new(compass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_unit_deltas() {
        let cases = [
            ((1, 1), Compass::SouthEast),
            ((1, 0), Compass::East),
            ((1, -1), Compass::NorthEast),
            ((0, 1), Compass::South),
            ((0, -1), Compass::North),
            ((-1, 1), Compass::SouthWest),
            ((-1, 0), Compass::West),
            ((-1, -1), Compass::NorthWest),
        ];
        for ((dx, dy), expected) in cases {
            let dir = resolve_direction(10, 10, 10 + dx, 10 + dy);
            assert_eq!(dir, Direction::new(expected), "delta ({dx}, {dy})");
            // stable under repeated calls
            assert_eq!(dir, resolve_direction(10, 10, 10 + dx, 10 + dy));
        }
    }

    #[test]
    fn test_resolve_zero_delta_is_none() {
        assert_eq!(resolve_direction(5, 7, 5, 7), Direction::None);
    }

    #[test]
    fn test_resolve_uses_sign_not_angle() {
        assert_eq!(
            resolve_direction(0, 0, 9, 1),
            Direction::new(Compass::SouthEast)
        );
        assert_eq!(
            resolve_direction(0, 0, -3, -40),
            Direction::new(Compass::NorthWest)
        );
    }

    #[test]
    fn test_bits_round_trip_with_running() {
        let dir = Direction::from_bits(0x82);
        assert_eq!(dir.compass(), Some(Compass::East));
        assert!(dir.is_running());
        assert_eq!(dir.bits(), 0x82);
    }

    #[test]
    fn test_invalid_bits_decode_to_none() {
        assert_eq!(Direction::from_bits(NONE_BITS), Direction::None);
        assert_eq!(Direction::None.bits(), NONE_BITS);
    }

    #[test]
    fn test_same_compass_ignores_running() {
        let walk = Direction::new(Compass::West);
        let run = walk.with_running(true);
        assert!(walk.same_compass(run));
        assert_ne!(walk, run);
        assert!(!walk.same_compass(Direction::new(Compass::East)));
    }

    #[test]
    fn test_cardinals() {
        let cardinals: Vec<_> = Compass::ALL.iter().filter(|c| c.is_cardinal()).collect();
        assert_eq!(
            cardinals,
            vec![&Compass::North, &Compass::East, &Compass::South, &Compass::West]
        );
    }

    #[test]
    fn test_resolve_extreme_coordinates() {
        assert_eq!(
            resolve_direction(i32::MAX, 0, i32::MIN, 0),
            Direction::new(Compass::West)
        );
        assert_eq!(
            resolve_direction(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
            Direction::new(Compass::SouthEast)
        );
        assert_eq!(
            resolve_direction(0, i32::MIN, 0, i32::MAX),
            Direction::new(Compass::South)
        );
        assert_eq!(
            resolve_direction(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            Direction::None
        );
    }
}
