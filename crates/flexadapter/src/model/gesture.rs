//! Gesture directions and outcomes.

use std::fmt;

/// A single direction reported by the host's touch recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward lower rows.
    Up,
    /// Toward higher rows.
    Down,
    /// Toward lower columns.
    Left,
    /// Toward higher columns.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    fn bit(self) -> u8 {
        match self {
            Self::Up => 1 << 0,
            Self::Down => 1 << 1,
            Self::Left => 1 << 2,
            Self::Right => 1 << 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// A set of permitted directions.
///
/// Items declare one set for dragging and one for swiping. The empty set
/// (the default) disables the gesture for that item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Directions(u8);

impl Directions {
    /// No direction.
    pub const NONE: Self = Self(0);
    /// Up only.
    pub const UP: Self = Self(1 << 0);
    /// Down only.
    pub const DOWN: Self = Self(1 << 1);
    /// Left only.
    pub const LEFT: Self = Self(1 << 2);
    /// Right only.
    pub const RIGHT: Self = Self(1 << 3);
    /// Up and down.
    pub const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);
    /// Left and right.
    pub const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    /// Every direction.
    pub const ALL: Self = Self(Self::VERTICAL.0 | Self::HORIZONTAL.0);

    /// Whether `direction` is in the set.
    pub fn allows(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Whether every direction of `other` is in the set.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the directions in the set.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.allows(*d))
    }
}

impl From<Direction> for Directions {
    fn from(direction: Direction) -> Self {
        Self(direction.bit())
    }
}

impl std::ops::BitOr for Directions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOr<Direction> for Directions {
    type Output = Self;

    fn bitor(self, rhs: Direction) -> Self::Output {
        self | Self::from(rhs)
    }
}

impl std::ops::BitAnd for Directions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::BitOrAssign for Directions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The result of a gesture report.
///
/// A rejection is not an error: the host is expected to animate the row
/// back into place and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The gesture was applied.
    Accepted,
    /// The gesture was ignored because an item's policy forbids it, or
    /// because there is no drag in progress.
    Rejected,
}

impl GestureOutcome {
    /// Whether the gesture was applied.
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}
