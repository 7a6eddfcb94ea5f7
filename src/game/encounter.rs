//! # Encounter Bridge
//!
//! Hands a detected encounter to the combat collaborator and writes the
//! result back into the world and the player record.
//!
//! Monster health flows one way: the instance produces a read-only
//! [`EncounterDescriptor`], combat returns an explicit [`CombatOutcome`],
//! and the outcome is written back into the instance. Combat never mutates
//! the world directly.

use crate::game::{EncounterDescriptor, GridWorldState, PlayerRecord};
use log::info;
use serde::{Deserialize, Serialize};

/// What a finished fight reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Player health after the fight
    pub health: i32,
    /// Player gold after the fight
    pub gold: i32,
    /// Monster health left when the fight ended
    pub monster_health: i32,
    /// Whether the monster was defeated
    pub monster_defeated: bool,
}

/// The combat collaborator.
///
/// Implementations may run an interactive fight; the bridge only cares about
/// the outcome. The player record is mutable because fighting wears weapons
/// and uses up items.
pub trait CombatInvoker {
    fn fight(&mut self, player: &mut PlayerRecord, monster: &EncounterDescriptor) -> CombatOutcome;
}

impl<F> CombatInvoker for F
where
    F: FnMut(&mut PlayerRecord, &EncounterDescriptor) -> CombatOutcome,
{
    fn fight(&mut self, player: &mut PlayerRecord, monster: &EncounterDescriptor) -> CombatOutcome {
        self(player, monster)
    }
}

/// Builds the descriptor for the monster at `index`.
///
/// # Panics
///
/// Panics if `index` is outside the monster list; encounter indices come
/// from the exploration loop and are always valid for the session.
pub fn begin_encounter(world: &GridWorldState, index: usize) -> EncounterDescriptor {
    match world.monster(index) {
        Some(monster) => monster.to_encounter_descriptor(),
        None => panic!(
            "encounter index {} out of range for {} monsters",
            index,
            world.monsters().len()
        ),
    }
}

/// Writes a combat outcome back into the world and the player.
///
/// The monster keeps its list slot and tile either way; a defeated monster
/// is only flagged dead. The pending encounter index is cleared.
///
/// # Panics
///
/// Panics if `index` is outside the monster list.
pub fn reconcile_encounter(
    world: &mut GridWorldState,
    index: usize,
    player: &mut PlayerRecord,
    outcome: &CombatOutcome,
) {
    let monster_count = world.monsters().len();
    let Some(monster) = world.monster_mut(index) else {
        panic!("encounter index {index} out of range for {monster_count} monsters");
    };

    player.health = outcome.health.max(0);
    player.gold = outcome.gold.max(0);

    monster.health = outcome.monster_health.max(0);
    if outcome.monster_defeated || monster.health <= 0 {
        monster.health = 0;
        monster.alive = false;
        info!("{} (#{}) was defeated at {:?}", monster.name, index, monster.position);
    } else {
        info!(
            "{} (#{}) survives with {} health",
            monster.name, index, monster.health
        );
    }

    world.set_encounter_idx(None);
}

/// Runs the full hand-off: describe the monster, fight, reconcile.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use wayfarer::{
///     resolve_encounter, CombatOutcome, EncounterDescriptor, GridWorldState, MonsterInstance,
///     PlayerRecord, Position,
/// };
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut world = GridWorldState::new(10, Position::origin(), Position::new(2, 2));
/// let index = world.add_monster(MonsterInstance::instantiate(None, Position::new(2, 2), &mut rng));
/// let mut player = PlayerRecord::new("Lancelot");
///
/// let mut win = |p: &mut PlayerRecord, m: &EncounterDescriptor| CombatOutcome {
///     health: p.health,
///     gold: p.gold + m.money_reward,
///     monster_health: 0,
///     monster_defeated: true,
/// };
/// resolve_encounter(&mut world, index, &mut player, &mut win);
/// assert!(!world.monsters()[index].alive);
/// ```
pub fn resolve_encounter<C: CombatInvoker + ?Sized>(
    world: &mut GridWorldState,
    index: usize,
    player: &mut PlayerRecord,
    combat: &mut C,
) -> CombatOutcome {
    let descriptor = begin_encounter(world, index);
    let outcome = combat.fight(player, &descriptor);
    reconcile_encounter(world, index, player, &outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MonsterInstance, Position};
    use rand::{rngs::StdRng, SeedableRng};

    fn world_with_monster() -> GridWorldState {
        let mut rng = StdRng::seed_from_u64(31);
        let mut world = GridWorldState::new(10, Position::origin(), Position::new(3, 3));
        world.add_monster(MonsterInstance::instantiate(None, Position::new(7, 7), &mut rng));
        world.add_monster(MonsterInstance::instantiate(None, Position::new(3, 3), &mut rng));
        world.set_encounter_idx(Some(1));
        world
    }

    #[test]
    fn test_defeat_flags_monster_in_place() {
        let mut world = world_with_monster();
        let mut player = PlayerRecord::new("Test");
        let gold_before = player.gold;

        let outcome = resolve_encounter(
            &mut world,
            1,
            &mut player,
            &mut |p: &mut PlayerRecord, m: &EncounterDescriptor| CombatOutcome {
                health: p.health - 10,
                gold: p.gold + m.money_reward,
                monster_health: 0,
                monster_defeated: true,
            },
        );

        let monster = &world.monsters()[1];
        assert!(!monster.alive);
        assert_eq!(monster.health, 0);
        assert_eq!(monster.position, Position::new(3, 3));
        assert_eq!(world.monsters().len(), 2);
        assert_eq!(world.encounter_idx(), None);
        assert_eq!(player.health, 90);
        assert_eq!(player.gold, gold_before + monster.money_reward);
        assert!(outcome.monster_defeated);
    }

    #[test]
    fn test_flee_writes_back_reduced_health() {
        let mut world = world_with_monster();
        let mut player = PlayerRecord::new("Test");
        let start = world.monsters()[1].health;

        resolve_encounter(
            &mut world,
            1,
            &mut player,
            &mut |p: &mut PlayerRecord, m: &EncounterDescriptor| CombatOutcome {
                health: p.health,
                gold: p.gold,
                monster_health: m.health - 5,
                monster_defeated: false,
            },
        );

        let monster = &world.monsters()[1];
        assert!(monster.alive);
        assert_eq!(monster.health, start - 5);
        assert_eq!(world.encounter_idx(), None);
    }

    #[test]
    fn test_zero_health_means_dead_even_without_flag() {
        let mut world = world_with_monster();
        let mut player = PlayerRecord::new("Test");
        let outcome = CombatOutcome {
            health: 40,
            gold: 60,
            monster_health: -12,
            monster_defeated: false,
        };
        reconcile_encounter(&mut world, 1, &mut player, &outcome);
        assert!(!world.monsters()[1].alive);
        assert_eq!(world.monsters()[1].health, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let world = world_with_monster();
        begin_encounter(&world, 9);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_reconcile_out_of_range_panics() {
        let mut world = world_with_monster();
        let mut player = PlayerRecord::new("Test");
        let outcome = CombatOutcome {
            health: 1,
            gold: 1,
            monster_health: 0,
            monster_defeated: true,
        };
        reconcile_encounter(&mut world, 5, &mut player, &outcome);
    }
}
