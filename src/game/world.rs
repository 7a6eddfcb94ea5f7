//! # World Representation
//!
//! The exploration grid: bounds, the player and town tiles, the ordered
//! monster list, and the record it is persisted as.
//!
//! The grid is a fixed square with no terrain. A tile is "occupied" when a
//! living monster or the player stands on it; the town tile is a safe tile
//! monsters are never placed on and never step onto.

use crate::config;
use crate::game::{MonsterInstance, MonsterRecord, Position, Rgb};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters for building a fresh exploration map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// The safe town tile
    pub town_pos: Position,
    /// Number of monsters spawned on a fresh map
    pub initial_monsters: usize,
}

impl WorldConfig {
    /// Creates a configuration for a grid of the given size with the town in the corner.
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size: grid_size.max(1),
            town_pos: Position::origin(),
            initial_monsters: config::INITIAL_MONSTERS,
        }
    }

    /// Creates an empty map configuration so tests can place monsters by hand.
    pub fn for_testing() -> Self {
        Self {
            initial_monsters: 0,
            ..Self::new(config::GRID_SIZE)
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(config::GRID_SIZE)
    }
}

/// Clamps both axes of `pos` into `[0, grid_size - 1]`.
pub fn clamp_to_grid(pos: Position, grid_size: i32) -> Position {
    let max = (grid_size - 1).max(0);
    Position::new(pos.x.clamp(0, max), pos.y.clamp(0, max))
}

/// Returns true if `pos` lies on a grid of the given size.
pub fn in_bounds(pos: Position, grid_size: i32) -> bool {
    (0..grid_size).contains(&pos.x) && (0..grid_size).contains(&pos.y)
}

/// Picks a random tile that is neither the town nor in `avoid`.
///
/// Makes at most [`config::PLACEMENT_ATTEMPTS`] uniform draws (x first,
/// then y). If every draw is rejected the bottom-right corner is returned,
/// so a crowded grid resolves instead of looping forever.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use wayfarer::{place_monster_avoiding, Position};
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let town = Position::new(0, 0);
/// let pos = place_monster_avoiding(10, town, &[Position::new(1, 1)], &mut rng);
/// assert_ne!(pos, town);
/// assert_ne!(pos, Position::new(1, 1));
/// ```
pub fn place_monster_avoiding<R: Rng + ?Sized>(
    grid_size: i32,
    town_pos: Position,
    avoid: &[Position],
    rng: &mut R,
) -> Position {
    let grid_size = grid_size.max(1);
    for _ in 0..config::PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(0..grid_size);
        let y = rng.gen_range(0..grid_size);
        let candidate = Position::new(x, y);
        if candidate == town_pos || avoid.contains(&candidate) {
            continue;
        }
        return candidate;
    }

    debug!(
        "No free tile after {} draws, falling back to the corner",
        config::PLACEMENT_ATTEMPTS
    );
    Position::new(grid_size - 1, grid_size - 1)
}

/// The exploration map a session runs on.
///
/// Monsters are never removed from the list once added; defeated monsters
/// are flagged dead so indices stay valid across save and load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorldState {
    grid_size: i32,
    player_pos: Position,
    town_pos: Position,
    monsters: Vec<MonsterInstance>,
    player_move_count: u64,
    encounter_idx: Option<usize>,
}

impl GridWorldState {
    /// Creates an empty map with the player at `player_pos`.
    ///
    /// Both positions are clamped into the grid.
    pub fn new(grid_size: i32, town_pos: Position, player_pos: Position) -> Self {
        let grid_size = grid_size.max(1);
        Self {
            grid_size,
            player_pos: clamp_to_grid(player_pos, grid_size),
            town_pos: clamp_to_grid(town_pos, grid_size),
            monsters: Vec::new(),
            player_move_count: 0,
            encounter_idx: None,
        }
    }

    /// Builds a fresh map: the player starts on the town tile and
    /// `config.initial_monsters` monsters are placed away from both.
    pub fn fresh<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Self {
        let mut world = Self::new(config.grid_size, config.town_pos, config.town_pos);
        world.populate_monsters(config.initial_monsters, rng);
        world
    }

    /// Adds `count` random monsters, each avoiding the player, the town and
    /// every monster already on the map.
    pub fn populate_monsters<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        let mut avoid = vec![self.player_pos, self.town_pos];
        avoid.extend(self.monsters.iter().map(|m| m.position));

        for _ in 0..count {
            let position = place_monster_avoiding(self.grid_size, self.town_pos, &avoid, rng);
            let monster = MonsterInstance::instantiate(None, position, rng);
            debug!("Spawned {} at {:?}", monster.name, position);
            avoid.push(position);
            self.monsters.push(monster);
        }
    }

    /// Appends a monster and returns its index.
    pub fn add_monster(&mut self, monster: MonsterInstance) -> usize {
        self.monsters.push(monster);
        self.monsters.len() - 1
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn player_pos(&self) -> Position {
        self.player_pos
    }

    pub fn town_pos(&self) -> Position {
        self.town_pos
    }

    pub fn player_move_count(&self) -> u64 {
        self.player_move_count
    }

    /// Index of the monster currently being handed to combat, if any.
    pub fn encounter_idx(&self) -> Option<usize> {
        self.encounter_idx
    }

    pub fn monsters(&self) -> &[MonsterInstance] {
        &self.monsters
    }

    pub fn monster(&self, index: usize) -> Option<&MonsterInstance> {
        self.monsters.get(index)
    }

    pub(crate) fn monster_mut(&mut self, index: usize) -> Option<&mut MonsterInstance> {
        self.monsters.get_mut(index)
    }

    #[cfg(test)]
    pub(crate) fn monsters_mut(&mut self) -> &mut [MonsterInstance] {
        &mut self.monsters
    }

    /// Number of monsters still alive.
    pub fn living_monster_count(&self) -> usize {
        self.monsters.iter().filter(|m| m.alive).count()
    }

    /// Clamps a position into this grid.
    pub fn clamp_to_grid(&self, pos: Position) -> Position {
        clamp_to_grid(pos, self.grid_size)
    }

    /// Moves the player, clamping into the grid. Returns the applied position.
    pub(crate) fn set_player_pos(&mut self, pos: Position) -> Position {
        self.player_pos = self.clamp_to_grid(pos);
        self.player_pos
    }

    pub(crate) fn increment_move_count(&mut self) -> u64 {
        self.player_move_count += 1;
        self.player_move_count
    }

    pub(crate) fn set_encounter_idx(&mut self, index: Option<usize>) {
        self.encounter_idx = index;
    }

    /// Returns true if the player or a living monster other than `excluding` is on `pos`.
    pub fn is_occupied(&self, pos: Position, excluding: Option<usize>) -> bool {
        pos == self.player_pos
            || self
                .monsters
                .iter()
                .enumerate()
                .any(|(i, m)| m.alive && m.position == pos && Some(i) != excluding)
    }

    /// Current tiles of every living monster except the one at `index`.
    pub fn occupied_by_others(&self, index: usize) -> Vec<Position> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|&(i, m)| i != index && m.alive)
            .map(|(_, m)| m.position)
            .collect()
    }

    /// Index of the first living monster standing on `pos`.
    pub fn living_monster_at(&self, pos: Position) -> Option<usize> {
        self.monsters
            .iter()
            .position(|m| m.alive && m.position == pos)
    }

    /// Read-only view for the renderer.
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            grid_size: self.grid_size,
            player_pos: self.player_pos,
            town_pos: self.town_pos,
            living_monsters: self
                .monsters
                .iter()
                .filter(|m| m.alive)
                .map(|m| MonsterSprite {
                    position: m.position,
                    color: m.color,
                    name: m.name.clone(),
                })
                .collect(),
        }
    }

    /// Copies the world out into its persisted record.
    pub fn to_record(&self) -> WorldRecord {
        WorldRecord {
            grid_size: self.grid_size,
            player_pos: self.player_pos,
            town_pos: self.town_pos,
            monsters: self.monsters.iter().map(MonsterInstance::to_record).collect(),
            player_move_count: self.player_move_count,
            encounter_idx: self.encounter_idx,
        }
    }

    /// Rebuilds a world from its persisted record.
    ///
    /// Player, town and monster positions outside the grid are clamped back
    /// in, and a living monster found on the town tile is moved to the
    /// nearest free tile.
    pub fn from_record(record: WorldRecord) -> Self {
        let grid_size = record.grid_size.max(1);
        let player_pos = clamp_to_grid(record.player_pos, grid_size);
        let town_pos = clamp_to_grid(record.town_pos, grid_size);
        if player_pos != record.player_pos || town_pos != record.town_pos {
            warn!(
                "Saved map had positions outside the {}x{} grid; clamped player {:?} and town {:?}",
                grid_size, grid_size, record.player_pos, record.town_pos
            );
        }

        let encounter_idx = record
            .encounter_idx
            .filter(|&index| index < record.monsters.len());

        let mut world = Self {
            grid_size,
            player_pos,
            town_pos,
            monsters: record
                .monsters
                .into_iter()
                .map(MonsterInstance::from_record)
                .collect(),
            player_move_count: record.player_move_count,
            encounter_idx,
        };
        world.settle_loaded_monsters();
        world
    }

    /// Pulls loaded monsters back onto the grid and off the town tile.
    fn settle_loaded_monsters(&mut self) {
        for index in 0..self.monsters.len() {
            let saved = self.monsters[index].position;
            let clamped = self.clamp_to_grid(saved);
            if clamped != saved {
                warn!(
                    "{} (#{}) was saved off the grid at {:?}; clamped to {:?}",
                    self.monsters[index].name, index, saved, clamped
                );
                self.monsters[index].position = clamped;
            }

            if !self.monsters[index].alive || clamped != self.town_pos {
                continue;
            }
            match self.nearest_free_tile(index) {
                Some(tile) => {
                    warn!(
                        "{} (#{}) was saved on the town tile; moved to {:?}",
                        self.monsters[index].name, index, tile
                    );
                    self.monsters[index].position = tile;
                }
                None => warn!(
                    "{} (#{}) is on the town tile and there is nowhere to move it",
                    self.monsters[index].name, index
                ),
            }
        }
    }

    /// The free tile closest to town, scanning rows top to bottom on ties.
    ///
    /// Free means not the town, not the player and not held by another
    /// living monster.
    fn nearest_free_tile(&self, index: usize) -> Option<Position> {
        let taken = self.occupied_by_others(index);
        let mut tiles: Vec<Position> = (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| Position::new(x, y)))
            .filter(|&tile| {
                tile != self.town_pos && tile != self.player_pos && !taken.contains(&tile)
            })
            .collect();
        tiles.sort_by_key(|tile| tile.manhattan_distance(self.town_pos));
        tiles.into_iter().next()
    }
}

fn default_grid_size() -> i32 {
    config::GRID_SIZE
}

/// Persisted form of [`GridWorldState`], stored under the player's `map_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRecord {
    #[serde(default = "default_grid_size")]
    pub grid_size: i32,
    #[serde(default = "Position::origin")]
    pub player_pos: Position,
    #[serde(default = "Position::origin")]
    pub town_pos: Position,
    #[serde(default)]
    pub monsters: Vec<MonsterRecord>,
    #[serde(default)]
    pub player_move_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_idx: Option<usize>,
}

/// A living monster as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterSprite {
    pub position: Position,
    pub color: Rgb,
    pub name: String,
}

/// Read-only snapshot of the map for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSnapshot {
    pub grid_size: i32,
    pub player_pos: Position,
    pub town_pos: Position,
    pub living_monsters: Vec<MonsterSprite>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn monster_at(x: i32, y: i32) -> MonsterInstance {
        let mut rng = StdRng::seed_from_u64(1);
        MonsterInstance::instantiate(None, Position::new(x, y), &mut rng)
    }

    #[test]
    fn test_clamp_to_grid() {
        assert_eq!(clamp_to_grid(Position::new(-1, 4), 10), Position::new(0, 4));
        assert_eq!(clamp_to_grid(Position::new(10, 12), 10), Position::new(9, 9));
        assert_eq!(clamp_to_grid(Position::new(3, 3), 10), Position::new(3, 3));
    }

    #[test]
    fn test_in_bounds() {
        assert!(in_bounds(Position::new(0, 9), 10));
        assert!(!in_bounds(Position::new(-1, 0), 10));
        assert!(!in_bounds(Position::new(0, 10), 10));
    }

    #[test]
    fn test_fresh_world_layout() {
        let mut rng = StdRng::seed_from_u64(12345);
        let world = GridWorldState::fresh(&WorldConfig::default(), &mut rng);

        assert_eq!(world.grid_size(), 10);
        assert_eq!(world.player_pos(), world.town_pos());
        assert_eq!(world.player_move_count(), 0);
        assert_eq!(world.encounter_idx(), None);
        assert_eq!(world.monsters().len(), 2);

        let first = world.monsters()[0].position;
        let second = world.monsters()[1].position;
        assert_ne!(first, world.town_pos());
        assert_ne!(second, world.town_pos());
        assert_ne!(first, second);
    }

    #[test]
    fn test_placement_falls_back_to_corner() {
        let mut rng = StdRng::seed_from_u64(77);
        let every_tile: Vec<Position> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Position::new(x, y)))
            .collect();
        let pos = place_monster_avoiding(4, Position::origin(), &every_tile, &mut rng);
        assert_eq!(pos, Position::new(3, 3));
    }

    #[test]
    fn test_is_occupied() {
        let mut world = GridWorldState::new(10, Position::origin(), Position::new(2, 2));
        let first = world.add_monster(monster_at(5, 5));
        let second = world.add_monster(monster_at(6, 6));
        world.monsters_mut()[second].alive = false;

        assert!(world.is_occupied(Position::new(2, 2), None));
        assert!(world.is_occupied(Position::new(5, 5), None));
        assert!(!world.is_occupied(Position::new(5, 5), Some(first)));
        assert!(!world.is_occupied(Position::new(6, 6), None)); // dead monsters don't count
        assert!(!world.is_occupied(Position::new(7, 7), None));
    }

    #[test]
    fn test_occupied_by_others_skips_self_and_dead() {
        let mut world = GridWorldState::new(10, Position::origin(), Position::origin());
        world.add_monster(monster_at(1, 1));
        world.add_monster(monster_at(2, 2));
        world.add_monster(monster_at(3, 3));
        world.monsters_mut()[2].alive = false;

        assert_eq!(world.occupied_by_others(0), vec![Position::new(2, 2)]);
        assert_eq!(world.occupied_by_others(1), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_snapshot_lists_living_monsters_only() {
        let mut world = GridWorldState::new(10, Position::origin(), Position::new(1, 0));
        world.add_monster(monster_at(4, 4));
        world.add_monster(monster_at(8, 1));
        world.monsters_mut()[0].alive = false;

        let snapshot = world.snapshot();
        assert_eq!(snapshot.grid_size, 10);
        assert_eq!(snapshot.player_pos, Position::new(1, 0));
        assert_eq!(snapshot.living_monsters.len(), 1);
        assert_eq!(snapshot.living_monsters[0].position, Position::new(8, 1));
    }

    #[test]
    fn test_record_roundtrip() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut world = GridWorldState::fresh(&WorldConfig::default(), &mut rng);
        world.set_player_pos(Position::new(3, 4));
        world.increment_move_count();
        world.set_encounter_idx(Some(1));

        let json = serde_json::to_string(&world.to_record()).unwrap();
        let record: WorldRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(GridWorldState::from_record(record), world);
    }

    #[test]
    fn test_record_keys() {
        let world = GridWorldState::new(10, Position::origin(), Position::new(2, 5));
        let value = serde_json::to_value(world.to_record()).unwrap();
        assert_eq!(value["player_pos"], serde_json::json!([2, 5]));
        assert_eq!(value["town_pos"], serde_json::json!([0, 0]));
        assert_eq!(value["player_move_count"], 0);
        assert!(value["monsters"].as_array().unwrap().is_empty());
        assert!(value.get("encounter_idx").is_none());
    }

    #[test]
    fn test_from_record_clamps_positions() {
        let record: WorldRecord =
            serde_json::from_str(r#"{"player_pos": [14, -2], "town_pos": [0, 0]}"#).unwrap();
        let world = GridWorldState::from_record(record);
        assert_eq!(world.grid_size(), 10);
        assert_eq!(world.player_pos(), Position::new(9, 0));
    }

    #[test]
    fn test_from_record_pulls_monsters_back_onto_grid() {
        let record: WorldRecord = serde_json::from_str(
            r#"{"player_pos": [4, 4], "town_pos": [0, 0],
                "monsters": [{"name": "Zombie", "x": 50, "y": 50, "health": 12, "power": 4}]}"#,
        )
        .unwrap();
        let mut world = GridWorldState::from_record(record);
        assert_eq!(world.monsters()[0].position, Position::new(9, 9));

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..10 {
            crate::game::tick_monsters(&mut world, &mut rng);
            assert!(in_bounds(world.monsters()[0].position, 10));
        }
        assert_eq!(world.snapshot().living_monsters.len(), 1);
    }

    #[test]
    fn test_from_record_moves_living_monster_off_town() {
        let record: WorldRecord = serde_json::from_str(
            r#"{"player_pos": [1, 0], "town_pos": [0, 0], "monsters": [
                {"name": "Slime", "x": 0, "y": 0, "health": 5},
                {"name": "Zombie", "x": 0, "y": 0, "health": 0, "alive": false}
            ]}"#,
        )
        .unwrap();
        let world = GridWorldState::from_record(record);

        // (1, 0) is the player's tile, so the next closest free tile wins
        assert_eq!(world.monsters()[0].position, Position::new(0, 1));
        assert_ne!(world.monsters()[0].position, world.town_pos());
        assert_eq!(world.monsters()[1].position, Position::origin());
    }

    #[test]
    fn test_from_record_keeps_monster_when_grid_is_full() {
        let record: WorldRecord = serde_json::from_str(
            r#"{"grid_size": 1, "monsters": [{"name": "Slime", "x": 3, "y": 0}]}"#,
        )
        .unwrap();
        let world = GridWorldState::from_record(record);
        assert_eq!(world.monsters()[0].position, Position::origin());
    }

    #[test]
    fn test_from_record_drops_stale_encounter_index() {
        let record: WorldRecord =
            serde_json::from_str(r#"{"monsters": [], "encounter_idx": 3}"#).unwrap();
        let world = GridWorldState::from_record(record);
        assert_eq!(world.encounter_idx(), None);
    }
}
