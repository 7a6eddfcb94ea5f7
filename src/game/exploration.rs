//! # Exploration Loop
//!
//! The input-driven state machine for one visit to the map.
//!
//! A session owns its [`GridWorldState`] and performs exactly one transition
//! per input event. It ends when the player walks back into town, collides
//! with a living monster, or quits. Rendering and timing live elsewhere;
//! the session only exposes read-only snapshots.

use crate::game::{tick_monsters, Direction, EncounterDescriptor, GridWorldState, MapSnapshot};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Input the exploration loop understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Step one tile in a direction
    Move(Direction),
    /// Leave the game entirely
    Quit,
    /// Any unrecognized input; ignored
    Other,
}

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorationState {
    /// Waiting for the next input
    Exploring,
    /// A living monster shares the player's tile
    Encounter { index: usize },
    /// The player walked back into town
    Returned,
    /// The player quit
    Quit,
}

impl ExplorationState {
    /// Returns true once the session no longer accepts input.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExplorationState::Exploring)
    }
}

/// How an encounter came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterCause {
    /// A monster wandered onto the player during a monster tick
    MonsterMoved,
    /// The player stepped onto a monster's tile
    PlayerStepped,
}

/// The signal a finished session hands back to the town loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// The player is back in town
    Town,
    /// Combat must be resolved against the monster at `index`
    Monster {
        index: usize,
        descriptor: EncounterDescriptor,
        cause: EncounterCause,
    },
    /// The player quit the game
    Quit,
}

impl SessionExit {
    /// The short signal name: `"town"`, `"monster"` or `"quit"`.
    pub fn signal(&self) -> &'static str {
        match self {
            SessionExit::Town => "town",
            SessionExit::Monster { .. } => "monster",
            SessionExit::Quit => "quit",
        }
    }
}

/// One continuous run of the exploration loop.
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    world: GridWorldState,
    state: ExplorationState,
    left_town: bool,
    monster_ticks: u64,
}

impl ExplorationSession {
    /// Starts exploring `world`.
    ///
    /// Only a move made in this session counts as leaving town, so a player
    /// resumed next to town can step onto it without ending the session.
    pub fn enter(world: GridWorldState) -> Self {
        info!(
            "Entering map at {:?} with {} living monsters",
            world.player_pos(),
            world.living_monster_count()
        );
        Self {
            world,
            state: ExplorationState::Exploring,
            left_town: false,
            monster_ticks: 0,
        }
    }

    pub fn state(&self) -> ExplorationState {
        self.state
    }

    pub fn world(&self) -> &GridWorldState {
        &self.world
    }

    /// Ends the session and hands the world back.
    pub fn into_world(self) -> GridWorldState {
        self.world
    }

    /// Whether the player has stepped off the town tile this session.
    pub fn left_town(&self) -> bool {
        self.left_town
    }

    /// Number of monster ticks run this session.
    pub fn monster_ticks(&self) -> u64 {
        self.monster_ticks
    }

    pub fn snapshot(&self) -> MapSnapshot {
        self.world.snapshot()
    }

    /// Applies one input event.
    ///
    /// Returns `Some` exactly once, on the transition into a terminal state.
    /// Events arriving after that are ignored.
    pub fn handle<R: Rng + ?Sized>(&mut self, event: MapEvent, rng: &mut R) -> Option<SessionExit> {
        if self.state.is_terminal() {
            return None;
        }

        match event {
            MapEvent::Quit => {
                info!("Quit requested on the map at {:?}", self.world.player_pos());
                self.state = ExplorationState::Quit;
                Some(SessionExit::Quit)
            }
            MapEvent::Move(direction) => self.move_player(direction, rng),
            MapEvent::Other => None,
        }
    }

    fn move_player<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Option<SessionExit> {
        let from = self.world.player_pos();
        let to = self.world.clamp_to_grid(from + direction.to_delta());
        if to == from {
            return None;
        }

        self.world.set_player_pos(to);
        let move_count = self.world.increment_move_count();
        debug!("Player moved {:?} -> {:?} (move {})", from, to, move_count);

        if to == self.world.town_pos() {
            if self.left_town {
                info!("Player returned to town after {} moves", move_count);
                self.state = ExplorationState::Returned;
                return Some(SessionExit::Town);
            }
        } else {
            self.left_town = true;
        }

        if move_count % 2 == 0 {
            tick_monsters(&mut self.world, rng);
            self.monster_ticks += 1;
            if let Some(index) = self.world.living_monster_at(to) {
                return Some(self.begin_encounter(index, EncounterCause::MonsterMoved));
            }
        }

        self.world
            .living_monster_at(to)
            .map(|index| self.begin_encounter(index, EncounterCause::PlayerStepped))
    }

    fn begin_encounter(&mut self, index: usize, cause: EncounterCause) -> SessionExit {
        self.world.set_encounter_idx(Some(index));
        self.state = ExplorationState::Encounter { index };

        let descriptor = self.world.monsters()[index].to_encounter_descriptor();
        info!(
            "Encounter with {} (#{}) at {:?} ({:?})",
            descriptor.name,
            index,
            self.world.player_pos(),
            cause
        );

        SessionExit::Monster {
            index,
            descriptor,
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MonsterInstance, Position, MONSTER_TEMPLATES};
    use rand::{rngs::StdRng, SeedableRng};

    fn empty_world(player: Position) -> GridWorldState {
        GridWorldState::new(10, Position::origin(), player)
    }

    fn monster_at(x: i32, y: i32) -> MonsterInstance {
        let mut rng = StdRng::seed_from_u64(11);
        MonsterInstance::instantiate(Some(&MONSTER_TEMPLATES[1]), Position::new(x, y), &mut rng)
    }

    #[test]
    fn test_blocked_move_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = ExplorationSession::enter(empty_world(Position::origin()));

        assert_eq!(session.handle(MapEvent::Move(Direction::North), &mut rng), None);
        assert_eq!(session.handle(MapEvent::Move(Direction::West), &mut rng), None);
        assert_eq!(session.world().player_move_count(), 0);
        assert_eq!(session.monster_ticks(), 0);
        assert!(!session.left_town());
    }

    #[test]
    fn test_other_input_is_ignored() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = ExplorationSession::enter(empty_world(Position::new(3, 3)));
        assert_eq!(session.handle(MapEvent::Other, &mut rng), None);
        assert_eq!(session.state(), ExplorationState::Exploring);
        assert_eq!(session.world().player_pos(), Position::new(3, 3));
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = ExplorationSession::enter(empty_world(Position::new(3, 3)));

        let exit = session.handle(MapEvent::Quit, &mut rng);
        assert_eq!(exit, Some(SessionExit::Quit));
        assert_eq!(session.state(), ExplorationState::Quit);

        // nothing happens after the session has ended
        assert_eq!(session.handle(MapEvent::Move(Direction::East), &mut rng), None);
        assert_eq!(session.world().player_pos(), Position::new(3, 3));
    }

    #[test]
    fn test_round_trip_to_town_returns() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = ExplorationSession::enter(empty_world(Position::origin()));

        assert_eq!(session.handle(MapEvent::Move(Direction::East), &mut rng), None);
        assert!(session.left_town());
        assert_eq!(session.handle(MapEvent::Move(Direction::West), &mut rng), Some(SessionExit::Town));
        assert_eq!(session.state(), ExplorationState::Returned);
        assert_eq!(session.world().player_move_count(), 2);
    }

    #[test]
    fn test_resumed_next_to_town_must_leave_again() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = ExplorationSession::enter(empty_world(Position::new(1, 0)));
        assert!(!session.left_town());

        // Stepping onto town first only counts as having been there.
        assert_eq!(session.handle(MapEvent::Move(Direction::West), &mut rng), None);
        assert_eq!(session.state(), ExplorationState::Exploring);
        assert_eq!(session.world().player_pos(), Position::origin());
        assert!(!session.left_town());

        assert_eq!(session.handle(MapEvent::Move(Direction::South), &mut rng), None);
        assert!(session.left_town());
        assert_eq!(
            session.handle(MapEvent::Move(Direction::North), &mut rng),
            Some(SessionExit::Town)
        );
        assert_eq!(session.state(), ExplorationState::Returned);
    }

    #[test]
    fn test_stepping_onto_monster_on_odd_move() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = empty_world(Position::new(4, 5));
        let index = world.add_monster(monster_at(5, 5));
        let mut session = ExplorationSession::enter(world);

        let exit = session.handle(MapEvent::Move(Direction::East), &mut rng);
        match exit {
            Some(SessionExit::Monster {
                index: hit,
                cause,
                descriptor,
            }) => {
                assert_eq!(hit, index);
                assert_eq!(cause, EncounterCause::PlayerStepped);
                assert_eq!(descriptor.name, "Insulting Frenchman");
            }
            other => panic!("expected an encounter, got {:?}", other),
        }
        assert_eq!(session.world().encounter_idx(), Some(index));
        assert_eq!(session.state(), ExplorationState::Encounter { index });
        assert_eq!(session.monster_ticks(), 0);
    }

    #[test]
    fn test_dead_monster_does_not_trigger_encounter() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = empty_world(Position::new(4, 5));
        let mut corpse = monster_at(5, 5);
        corpse.alive = false;
        world.add_monster(corpse);
        let mut session = ExplorationSession::enter(world);

        assert_eq!(session.handle(MapEvent::Move(Direction::East), &mut rng), None);
        assert_eq!(session.state(), ExplorationState::Exploring);
    }

    #[test]
    fn test_monsters_tick_on_even_moves_only() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut session = ExplorationSession::enter(empty_world(Position::new(0, 5)));

        for expected_ticks in [0, 1, 1, 2, 2, 3] {
            session.handle(MapEvent::Move(Direction::East), &mut rng);
            assert_eq!(session.monster_ticks(), expected_ticks);
        }
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(SessionExit::Town.signal(), "town");
        assert_eq!(SessionExit::Quit.signal(), "quit");
    }
}
