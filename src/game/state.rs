//! # Game State Module
//!
//! The town loop: owns the player record, the active world, the random
//! source and the save store, and moves the game between town, the map and
//! combat.
//!
//! The exploration session and the encounter bridge never touch the save
//! store themselves. Every boundary they report (returning to town, an
//! encounter, quitting, a finished fight) is persisted here.

use crate::combat::{CombatCommand, Fight, FightPhase};
use crate::game::{
    begin_encounter, reconcile_encounter, CombatInvoker, CombatOutcome, EncounterDescriptor,
    ExplorationSession, GridWorldState, MapEvent, MapSnapshot, PlayerRecord, SessionExit,
    WorldConfig,
};
use crate::persistence::SaveStore;
use crate::town::{self, Purchase};
use crate::{WayfarerError, WayfarerResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Messages kept for the UI before the oldest are dropped.
const MAX_MESSAGES: usize = 50;

/// Which part of the game currently has control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// In town, choosing what to do next
    Town,
    /// Walking the map
    Exploring,
    /// Waiting for combat against the monster at `index`
    Encounter { index: usize },
    /// The game is over for this run
    Quit,
}

/// Central game state.
pub struct GameState {
    player: PlayerRecord,
    config: WorldConfig,
    rng: StdRng,
    store: Box<dyn SaveStore>,
    phase: GamePhase,
    session: Option<ExplorationSession>,
    /// The world while an encounter is pending; the session owns it otherwise
    encounter_world: Option<GridWorldState>,
    messages: Vec<String>,
}

impl GameState {
    /// Starts a game with a new player, ignoring anything in the store.
    pub fn new(
        name: impl Into<String>,
        store: Box<dyn SaveStore>,
        config: WorldConfig,
        rng: StdRng,
    ) -> Self {
        let player = PlayerRecord::new(name);
        let banner = town::welcome_banner(&player.name, 40);
        let mut state = Self {
            player,
            config,
            rng,
            store,
            phase: GamePhase::Town,
            session: None,
            encounter_world: None,
            messages: Vec::new(),
        };
        state.add_message(banner);
        state
    }

    /// Loads the saved game, or starts a new one if there is none.
    ///
    /// A missing save is normal on first launch. A save that cannot be read
    /// or parsed is logged and replaced by a new game rather than aborting.
    /// A save taken mid-encounter resumes straight into that encounter.
    pub fn load_or_new(
        name: impl Into<String>,
        store: Box<dyn SaveStore>,
        config: WorldConfig,
        rng: StdRng,
    ) -> Self {
        let name = name.into();
        let record = match store.load() {
            Ok(record) => Some(record),
            Err(WayfarerError::SaveNotFound(path)) => {
                info!("No save at {}, starting a new game", path.display());
                None
            }
            Err(e) => {
                warn!("Could not load save ({}), starting a new game", e);
                None
            }
        };

        let mut state = Self::new(name, store, config, rng);
        if let Some(record) = record {
            state.messages.clear();
            state.add_message(town::welcome_banner(&record.name, 40));
            state.player = record;
            state.resume_pending_encounter();
        }
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &PlayerRecord {
        &self.player
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The active exploration session, if the player is on the map.
    pub fn session(&self) -> Option<&ExplorationSession> {
        self.session.as_ref()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    /// The world currently in play, if any.
    pub fn world(&self) -> Option<&GridWorldState> {
        self.session
            .as_ref()
            .map(ExplorationSession::world)
            .or(self.encounter_world.as_ref())
    }

    /// What the renderer should draw for the map.
    pub fn snapshot(&self) -> Option<MapSnapshot> {
        self.world().map(GridWorldState::snapshot)
    }

    fn require_phase(&self, expected: GamePhase, action: &str) -> WayfarerResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(WayfarerError::InvalidState(format!(
                "cannot {} while in {:?}",
                action, self.phase
            )))
        }
    }

    fn resume_pending_encounter(&mut self) {
        let Some(record) = self.player.map_state.clone() else {
            return;
        };
        let Some(index) = record.encounter_idx else {
            return;
        };

        let mut world = GridWorldState::from_record(record);
        match world.monster(index) {
            Some(monster) if monster.alive => {
                info!("Resuming encounter with {} (#{})", monster.name, index);
                self.encounter_world = Some(world);
                self.phase = GamePhase::Encounter { index };
            }
            _ => {
                warn!("Dropping stale encounter index {} from save", index);
                world.set_encounter_idx(None);
                self.player.map_state = Some(world.to_record());
            }
        }
    }

    /// Leaves town and starts an exploration session.
    ///
    /// The saved map is resumed if there is one; otherwise a fresh map is
    /// generated. A saved map without any monsters is repopulated.
    pub fn enter_map(&mut self) -> WayfarerResult<()> {
        self.require_phase(GamePhase::Town, "explore")?;

        let world = match self.player.map_state.take() {
            Some(record) => {
                let mut world = GridWorldState::from_record(record);
                if world.monsters().is_empty() {
                    debug!("Saved map has no monsters, repopulating");
                    world.populate_monsters(self.config.initial_monsters, &mut self.rng);
                }
                world
            }
            None => GridWorldState::fresh(&self.config, &mut self.rng),
        };

        self.session = Some(ExplorationSession::enter(world));
        self.phase = GamePhase::Exploring;
        self.add_message("You set out from town. Arrow keys move, Esc saves and quits.");
        Ok(())
    }

    /// Feeds one input event to the exploration session.
    ///
    /// When the session ends, its world is written into the player record
    /// and the record is saved.
    pub fn map_input(&mut self, event: MapEvent) -> WayfarerResult<Option<SessionExit>> {
        let session = self.session.as_mut().ok_or_else(|| {
            WayfarerError::InvalidState(format!("no map session while in {:?}", self.phase))
        })?;

        let Some(exit) = session.handle(event, &mut self.rng) else {
            return Ok(None);
        };

        let world = match self.session.take() {
            Some(session) => session.into_world(),
            None => return Ok(Some(exit)),
        };
        self.player.map_state = Some(world.to_record());

        match &exit {
            SessionExit::Town => {
                self.phase = GamePhase::Town;
                self.add_message("You made it back to town.");
            }
            SessionExit::Monster {
                index, descriptor, ..
            } => {
                self.phase = GamePhase::Encounter { index: *index };
                self.add_message(format!("You run into a {}!", descriptor.name));
                self.encounter_world = Some(world);
            }
            SessionExit::Quit => {
                self.phase = GamePhase::Quit;
            }
        }

        self.save()?;
        Ok(Some(exit))
    }

    /// The pending encounter's monster.
    pub fn encounter_descriptor(&self) -> Option<EncounterDescriptor> {
        match (self.phase, &self.encounter_world) {
            (GamePhase::Encounter { index }, Some(world)) => Some(begin_encounter(world, index)),
            _ => None,
        }
    }

    /// Opens an interactive fight against the pending encounter.
    pub fn start_fight(&self) -> Option<Fight> {
        self.encounter_descriptor()
            .map(|descriptor| Fight::start(&self.player, descriptor))
    }

    /// Applies one command to an interactive fight using this game's
    /// player and random source.
    pub fn apply_combat(&mut self, fight: &mut Fight, command: CombatCommand) -> FightPhase {
        fight.apply(command, &mut self.player, &mut self.rng)
    }

    /// Writes a combat outcome back and returns to the map at the same tile.
    pub fn finish_encounter(&mut self, outcome: &CombatOutcome) -> WayfarerResult<()> {
        let GamePhase::Encounter { index } = self.phase else {
            return Err(WayfarerError::InvalidState(format!(
                "no pending encounter while in {:?}",
                self.phase
            )));
        };
        let mut world = self.encounter_world.take().ok_or_else(|| {
            WayfarerError::InvalidState("encounter pending without a world".to_string())
        })?;

        reconcile_encounter(&mut world, index, &mut self.player, outcome);
        if outcome.monster_defeated {
            self.add_message(format!("Victory! You now have {} gold.", self.player.gold));
        } else {
            self.add_message(format!("You escape with {} health.", self.player.health));
        }

        self.player.map_state = Some(world.to_record());
        self.session = Some(ExplorationSession::enter(world));
        self.phase = GamePhase::Exploring;
        self.save()
    }

    /// Runs the whole pending encounter through `combat` and returns to the map.
    pub fn resolve_encounter<C: CombatInvoker + ?Sized>(
        &mut self,
        combat: &mut C,
    ) -> WayfarerResult<CombatOutcome> {
        let descriptor = self.encounter_descriptor().ok_or_else(|| {
            WayfarerError::InvalidState(format!("no pending encounter while in {:?}", self.phase))
        })?;
        let outcome = combat.fight(&mut self.player, &descriptor);
        self.finish_encounter(&outcome)?;
        Ok(outcome)
    }

    /// Buys a shop item while in town.
    pub fn buy(&mut self, index: usize) -> WayfarerResult<Purchase> {
        self.require_phase(GamePhase::Town, "shop")?;
        let purchase = town::buy(&mut self.player, index)?;
        match &purchase {
            Purchase::Bought { item, gold_left } => {
                self.add_message(format!("You bought {}! Remaining gold: {}", item, gold_left))
            }
            Purchase::NotEnoughGold { .. } => {
                self.add_message("You don't have enough gold. Sorry!")
            }
        }
        Ok(purchase)
    }

    /// Equips a weapon while in town.
    pub fn equip(&mut self, choice: usize) -> WayfarerResult<String> {
        self.require_phase(GamePhase::Town, "equip")?;
        match town::equip_weapon(&mut self.player, choice) {
            Ok(name) => {
                self.add_message(format!("You equipped {}!", name));
                Ok(name)
            }
            Err(e) => {
                self.add_message(e.to_string());
                Err(e)
            }
        }
    }

    /// Writes the current world into the player record and saves it.
    pub fn save(&mut self) -> WayfarerResult<()> {
        if let Some(record) = self.world().map(GridWorldState::to_record) {
            self.player.map_state = Some(record);
        }
        self.store.save(&self.player)
    }

    /// Saves and ends the run. Safe to call from any phase.
    pub fn save_and_quit(&mut self) -> WayfarerResult<()> {
        self.save()?;
        self.phase = GamePhase::Quit;
        info!("Saved and quit");
        Ok(())
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("player", &self.player)
            .field("phase", &self.phase)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
