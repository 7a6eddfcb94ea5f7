//! Exploration and encounters on the wilderness grid.
//!
//! Submodules cover monsters and their saved form, the grid itself,
//! wandering, the per-move exploration machine, the hand-off to combat,
//! and the player record with the town-level [`GameState`] that owns it.

pub mod encounter;
pub mod exploration;
pub mod monster;
pub mod player;
pub mod state;
pub mod wander;
pub mod world;

pub use encounter::*;
pub use exploration::*;
pub use monster::*;
pub use player::*;
pub use state::*;
pub use wander::*;
pub use world::*;

use serde::{Deserialize, Serialize};

/// A tile coordinate. `y` grows southward.
///
/// Saved as a bare `[x, y]` pair so map records stay compact.
///
/// ```
/// use wayfarer::Position;
///
/// let tile = Position::new(3, 4);
/// assert_eq!(tile.manhattan_distance(Position::origin()), 7);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The north-west corner of every grid.
    pub const fn origin() -> Self {
        Position::new(0, 0)
    }

    /// Number of cardinal steps between two tiles.
    pub fn manhattan_distance(self, to: Position) -> u32 {
        self.x.abs_diff(to.x) + self.y.abs_diff(to.y)
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for [i32; 2] {
    fn from(tile: Position) -> Self {
        [tile.x, tile.y]
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, offset: Position) -> Position {
        Position::new(self.x + offset.x, self.y + offset.y)
    }
}

/// One orthogonal step on the map. There is no diagonal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Offset applied to a tile when stepping this way.
    ///
    /// ```
    /// use wayfarer::{Direction, Position};
    ///
    /// assert_eq!(Direction::West.to_delta(), Position::new(-1, 0));
    /// ```
    pub fn to_delta(self) -> Position {
        let (dx, dy) = match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        };
        Position::new(dx, dy)
    }

    /// Wander candidates are built from this list, so its order matters
    /// for seeded runs.
    pub fn all() -> Vec<Direction> {
        use Direction::*;
        vec![North, South, West, East]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_counts_orthogonal_steps() {
        let a = Position::new(-2, 3);
        assert_eq!(a.manhattan_distance(a), 0);
        assert_eq!(a.manhattan_distance(Position::new(1, -1)), 7);
        assert_eq!(Position::new(1, -1).manhattan_distance(a), 7);
    }

    #[test]
    fn test_stepping_each_way_moves_one_tile() {
        let centre = Position::new(4, 4);
        let mut seen = Vec::new();
        for direction in Direction::all() {
            let next = centre + direction.to_delta();
            assert_eq!(centre.manhattan_distance(next), 1);
            assert!(!seen.contains(&next));
            seen.push(next);
        }
        assert_eq!(centre + Direction::North.to_delta(), Position::new(4, 3));
        assert_eq!(centre + Direction::East.to_delta(), Position::new(5, 4));
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(2, 7)).unwrap();
        assert_eq!(json, "[2,7]");

        let tile: Position = serde_json::from_str("[4,1]").unwrap();
        assert_eq!(tile, Position::new(4, 1));
        assert!(serde_json::from_str::<Position>("{\"x\": 4, \"y\": 1}").is_err());
    }
}
