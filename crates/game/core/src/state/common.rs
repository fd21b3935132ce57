use std::fmt;

/// Unique identifier for any unit tracked in the encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl UnitId {
    /// Reserved identifier for the controllable leader of the party.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this unit is the party leader.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in 1-indexed tile coordinates.
///
/// `x` is the column and `y` the row; the top-left cell is `(1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|`, used for movement cost and most
    /// skill-range shapes.
    pub const fn manhattan(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Chebyshev distance `max(|dx|, |dy|)`, used for attack adjacency.
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        if dx > dy { dx } else { dy }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours in a fixed order (up, down, left, right).
    ///
    /// Bounds are not checked here; the grid filters them.
    pub const fn neighbors4(self) -> [Self; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }

    /// True when the two cells share an edge.
    pub const fn is_adjacent4(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Monotonically increasing turn counter. The first turn is `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TurnIndex(pub u32);

impl TurnIndex {
    pub const FIRST: Self = Self(1);

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for TurnIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for TurnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction a unit is facing; only carried for the presentation layer and
/// session snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing from `from` toward `to` along the dominant axis.
    ///
    /// Returns `None` when both cells are the same.
    pub fn toward(from: Position, to: Position) -> Option<Self> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(if dx.abs() >= dy.abs() {
            if dx > 0 { Self::Right } else { Self::Left }
        } else if dy > 0 {
            Self::Down
        } else {
            Self::Up
        })
    }
}

/// Which side of the encounter a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum Allegiance {
    Player,
    Ally,
    Summon,
    Enemy,
}

impl Allegiance {
    /// Player, allies and summons all belong to the party roster.
    pub const fn is_party(self) -> bool {
        !matches!(self, Self::Enemy)
    }

    pub const fn is_hostile_to(self, other: Self) -> bool {
        self.is_party() != other.is_party()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 1);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(a.chebyshev(b), 3);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn facing_prefers_dominant_axis() {
        let origin = Position::new(5, 5);
        assert_eq!(Facing::toward(origin, Position::new(8, 6)), Some(Facing::Right));
        assert_eq!(Facing::toward(origin, Position::new(5, 2)), Some(Facing::Up));
        assert_eq!(Facing::toward(origin, Position::new(3, 5)), Some(Facing::Left));
        assert_eq!(Facing::toward(origin, origin), None);
    }

    #[test]
    fn party_sides() {
        assert!(Allegiance::Summon.is_party());
        assert!(Allegiance::Enemy.is_hostile_to(Allegiance::Ally));
        assert!(!Allegiance::Player.is_hostile_to(Allegiance::Summon));
    }
}
