//! # Scene Management System
//!
//! Picks the screen to show from the game phase and routes input to it.
//!
//! [`SceneManager::update`] holds all of the per-frame logic and never
//! touches the window, so scene flow can be driven from tests with
//! synthetic input.

use crate::combat::Fight;
use crate::game::{GamePhase, GameState};
use crate::input::{InputHandler, PlayerInput};
use crate::rendering::MacroquadDisplay;
use crate::town::{TownAction, TownMenu};
use crate::{WayfarerError, WayfarerResult};
use log::{debug, info};
use macroquad::prelude::*;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    /// The town hub and its menus
    Town,
    /// The exploration map
    Map,
    /// A fight against the pending encounter
    Combat,
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    town_menu: TownMenu,
    fight: Option<Fight>,
    game_state: GameState,
    display: MacroquadDisplay,
    input_handler: InputHandler,
}

impl SceneManager {
    /// Creates a scene manager showing whatever the game phase calls for.
    pub fn new(game_state: GameState, input_handler: InputHandler) -> Self {
        let mut manager = Self {
            current_scene: SceneType::Town,
            town_menu: TownMenu::Main,
            fight: None,
            game_state,
            display: MacroquadDisplay::new(),
            input_handler,
        };
        manager.sync_scene();
        manager
    }

    pub fn current_scene(&self) -> SceneType {
        self.current_scene
    }

    pub fn town_menu(&self) -> TownMenu {
        self.town_menu
    }

    pub fn fight(&self) -> Option<&Fight> {
        self.fight.as_ref()
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// Whether the game has ended and the loop should stop.
    pub fn is_finished(&self) -> bool {
        self.game_state.phase() == GamePhase::Quit
    }

    /// Runs the main scene loop until the game exits.
    ///
    /// Closing the window saves the game the same way Esc does.
    pub async fn run(&mut self) -> WayfarerResult<()> {
        prevent_quit();
        loop {
            if is_quit_requested() {
                info!("Window closed");
                self.game_state.save_and_quit()?;
            }

            let input = self.input_handler.get_input();
            self.update(input)?;
            if self.is_finished() {
                break;
            }

            self.render();
            next_frame().await;
        }
        Ok(())
    }

    /// Applies one frame's input to the current scene.
    pub fn update(&mut self, input: Option<PlayerInput>) -> WayfarerResult<()> {
        if let Some(input) = input {
            match self.current_scene {
                SceneType::Town => self.update_town(input)?,
                SceneType::Map => {
                    self.game_state.map_input(input.to_map_event())?;
                }
                SceneType::Combat => self.update_combat(input)?,
            }
        }
        self.sync_scene();
        Ok(())
    }

    /// Switches scenes to follow the game phase.
    fn sync_scene(&mut self) {
        let scene = match self.game_state.phase() {
            GamePhase::Town => SceneType::Town,
            GamePhase::Exploring => SceneType::Map,
            GamePhase::Encounter { .. } => SceneType::Combat,
            GamePhase::Quit => return,
        };
        if scene == self.current_scene && (scene != SceneType::Combat || self.fight.is_some()) {
            return;
        }

        debug!("Scene {:?} -> {:?}", self.current_scene, scene);
        match scene {
            SceneType::Town => self.town_menu = TownMenu::Main,
            SceneType::Combat => self.fight = self.game_state.start_fight(),
            SceneType::Map => {}
        }
        self.current_scene = scene;
    }

    fn update_town(&mut self, input: PlayerInput) -> WayfarerResult<()> {
        match self.town_menu {
            TownMenu::Main => match input.to_town_action() {
                Some(TownAction::Shop) => self.town_menu = TownMenu::Shop,
                Some(TownAction::Equip) => self.town_menu = TownMenu::Equip,
                Some(TownAction::Explore) => self.game_state.enter_map()?,
                Some(TownAction::SaveAndQuit) => self.game_state.save_and_quit()?,
                None => {}
            },
            TownMenu::Shop => match input {
                PlayerInput::Choice(n) if n > 0 => match self.game_state.buy(n - 1) {
                    Ok(_) => {}
                    Err(WayfarerError::InvalidAction(_)) => {
                        self.game_state.add_message("That's not a choice")
                    }
                    Err(e) => return Err(e),
                },
                PlayerInput::Cancel | PlayerInput::Quit => {
                    self.game_state
                        .add_message("You are leaving the shop. Bye-Bye!");
                    self.town_menu = TownMenu::Main;
                }
                _ => {}
            },
            TownMenu::Equip => match input {
                PlayerInput::Choice(n) if n > 0 => {
                    match self.game_state.equip(n - 1) {
                        Ok(_) | Err(WayfarerError::InvalidAction(_)) => {}
                        Err(e) => return Err(e),
                    }
                    self.town_menu = TownMenu::Main;
                }
                PlayerInput::Cancel | PlayerInput::Quit => {
                    self.game_state.add_message("No weapon equipped.");
                    self.town_menu = TownMenu::Main;
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn update_combat(&mut self, input: PlayerInput) -> WayfarerResult<()> {
        if input == PlayerInput::Quit {
            return self.game_state.save_and_quit();
        }
        let Some(fight) = self.fight.as_mut() else {
            return Ok(());
        };

        if fight.is_over() {
            if input == PlayerInput::Confirm {
                let outcome = fight.outcome();
                self.fight = None;
                self.game_state.finish_encounter(&outcome)?;
            }
            return Ok(());
        }

        let command = input.to_combat_command(fight.phase());
        self.game_state.apply_combat(fight, command);
        Ok(())
    }

    /// Renders the current scene.
    pub fn render(&self) {
        match self.current_scene {
            SceneType::Town => self.display.render_town(&self.game_state, self.town_menu),
            SceneType::Map => {
                if let Some(snapshot) = self.game_state.snapshot() {
                    self.display.render_map(&snapshot, &self.game_state);
                }
            }
            SceneType::Combat => {
                if let Some(fight) = &self.fight {
                    self.display.render_combat(fight, &self.game_state);
                }
            }
        }
    }
}
