//! # Monster Wandering
//!
//! Per-tick stochastic movement for monsters on the exploration grid.
//!
//! Monsters don't chase. Each tick a monster tries the four cardinal steps
//! and "stay" in a freshly shuffled order and takes the first one that is
//! legal. Encounters happen only by chance or because the player walked in.

use crate::game::{in_bounds, Direction, GridWorldState, MonsterInstance, Position};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Moves one monster a single tile in a random legal direction.
///
/// A candidate tile is legal when it is on the grid, is not the town, and
/// is not in `occupied` unless it is the player's tile (stepping onto the
/// player starts an encounter). Dead monsters never move.
///
/// Returns true if the monster changed tiles.
pub fn step<R: Rng + ?Sized>(
    monster: &mut MonsterInstance,
    grid_size: i32,
    town_pos: Position,
    player_pos: Position,
    occupied: &[Position],
    rng: &mut R,
) -> bool {
    if !monster.alive {
        return false;
    }

    let mut candidates: Vec<Position> = Direction::all()
        .into_iter()
        .map(Direction::to_delta)
        .collect();
    candidates.push(Position::origin());
    candidates.shuffle(rng);

    let from = monster.position;
    let target = candidates.into_iter().map(|delta| from + delta).find(|&tile| {
        in_bounds(tile, grid_size)
            && tile != town_pos
            && (tile == player_pos || !occupied.contains(&tile))
    });

    match target {
        Some(tile) => {
            monster.position = tile;
            tile != from
        }
        None => false,
    }
}

/// Ticks every living monster once, in list order.
///
/// Each monster avoids the current tiles of all other living monsters,
/// including moves made earlier in the same tick.
pub fn tick_monsters<R: Rng + ?Sized>(world: &mut GridWorldState, rng: &mut R) {
    let grid_size = world.grid_size();
    let town_pos = world.town_pos();
    let player_pos = world.player_pos();

    for index in 0..world.monsters().len() {
        let occupied = world.occupied_by_others(index);
        if let Some(monster) = world.monster_mut(index) {
            let from = monster.position;
            if step(monster, grid_size, town_pos, player_pos, &occupied, rng) {
                debug!("{} wandered {:?} -> {:?}", monster.name, from, monster.position);
            }
        }
    }
}
