//! # Input Module
//!
//! Keyboard polling and the mapping from keys to what each scene understands.

use crate::combat::{CombatCommand, FightPhase};
use crate::game::{Direction, MapEvent};
use crate::town::TownAction;
use macroquad::prelude::*;

/// Keys the handler polls each frame, in priority order.
const POLLED_KEYS: [KeyCode; 23] = [
    KeyCode::Escape,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::S,
    KeyCode::A,
    KeyCode::D,
    KeyCode::H,
    KeyCode::J,
    KeyCode::K,
    KeyCode::L,
    KeyCode::Y,
    KeyCode::N,
    KeyCode::Enter,
    KeyCode::Backspace,
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
];

/// Input handler for processing player commands.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::InputHandler;
    ///
    /// let input_handler = InputHandler::new();
    /// assert!(input_handler.vi_keys_enabled);
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Gets the input for the key pressed this frame, if any.
    pub fn get_input(&self) -> Option<PlayerInput> {
        POLLED_KEYS
            .iter()
            .filter(|&&key| is_key_pressed(key))
            .find_map(|&key| self.key_to_input(key))
    }

    /// Translates a single key.
    pub fn key_to_input(&self, key: KeyCode) -> Option<PlayerInput> {
        let input = match key {
            KeyCode::Escape => PlayerInput::Quit,
            KeyCode::Up | KeyCode::W => PlayerInput::Move(Direction::North),
            KeyCode::Down | KeyCode::S => PlayerInput::Move(Direction::South),
            KeyCode::Left | KeyCode::A => PlayerInput::Move(Direction::West),
            KeyCode::Right | KeyCode::D => PlayerInput::Move(Direction::East),
            KeyCode::K if self.vi_keys_enabled => PlayerInput::Move(Direction::North),
            KeyCode::J if self.vi_keys_enabled => PlayerInput::Move(Direction::South),
            KeyCode::H if self.vi_keys_enabled => PlayerInput::Move(Direction::West),
            KeyCode::L if self.vi_keys_enabled => PlayerInput::Move(Direction::East),
            KeyCode::Y => PlayerInput::Yes,
            KeyCode::N => PlayerInput::No,
            KeyCode::Enter => PlayerInput::Confirm,
            KeyCode::Backspace => PlayerInput::Cancel,
            KeyCode::Key1 => PlayerInput::Choice(1),
            KeyCode::Key2 => PlayerInput::Choice(2),
            KeyCode::Key3 => PlayerInput::Choice(3),
            KeyCode::Key4 => PlayerInput::Choice(4),
            KeyCode::Key5 => PlayerInput::Choice(5),
            KeyCode::Key6 => PlayerInput::Choice(6),
            _ => return None,
        };
        Some(input)
    }
}

/// Player input types that can be processed by the scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move one tile
    Move(Direction),
    /// Save and quit
    Quit,
    /// A numbered menu entry, starting at 1
    Choice(usize),
    Yes,
    No,
    /// Confirm or continue
    Confirm,
    /// Back out of a menu
    Cancel,
}

impl PlayerInput {
    /// What the exploration loop makes of this input.
    pub fn to_map_event(self) -> MapEvent {
        match self {
            PlayerInput::Move(direction) => MapEvent::Move(direction),
            PlayerInput::Quit => MapEvent::Quit,
            _ => MapEvent::Other,
        }
    }

    /// The town menu entry this input selects.
    pub fn to_town_action(self) -> Option<TownAction> {
        match self {
            PlayerInput::Choice(1) => Some(TownAction::Shop),
            PlayerInput::Choice(2) => Some(TownAction::Equip),
            PlayerInput::Choice(3) => Some(TownAction::Explore),
            PlayerInput::Choice(4) | PlayerInput::Quit => Some(TownAction::SaveAndQuit),
            _ => None,
        }
    }

    /// The combat command for this input, given where the fight stands.
    pub fn to_combat_command(self, phase: FightPhase) -> CombatCommand {
        match (phase, self) {
            (FightPhase::OfferSpecial, PlayerInput::Yes) => CombatCommand::UseSpecial,
            (FightPhase::OfferSpecial, PlayerInput::No) => CombatCommand::DeclineSpecial,
            (FightPhase::Fighting, PlayerInput::Choice(1)) => CombatCommand::Attack,
            (FightPhase::Fighting, PlayerInput::Choice(2)) => CombatCommand::Flee,
            _ => CombatCommand::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.key_to_input(KeyCode::Up),
            Some(PlayerInput::Move(Direction::North))
        );
        assert_eq!(
            handler.key_to_input(KeyCode::D),
            Some(PlayerInput::Move(Direction::East))
        );
        assert_eq!(
            handler.key_to_input(KeyCode::H),
            Some(PlayerInput::Move(Direction::West))
        );
        assert_eq!(handler.key_to_input(KeyCode::F12), None);
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let handler = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(handler.key_to_input(KeyCode::J), None);
        assert_eq!(
            handler.key_to_input(KeyCode::S),
            Some(PlayerInput::Move(Direction::South))
        );
    }

    #[test]
    fn test_map_events() {
        assert_eq!(
            PlayerInput::Move(Direction::South).to_map_event(),
            MapEvent::Move(Direction::South)
        );
        assert_eq!(PlayerInput::Quit.to_map_event(), MapEvent::Quit);
        assert_eq!(PlayerInput::Choice(2).to_map_event(), MapEvent::Other);
    }

    #[test]
    fn test_town_menu() {
        assert_eq!(PlayerInput::Choice(3).to_town_action(), Some(TownAction::Explore));
        assert_eq!(PlayerInput::Quit.to_town_action(), Some(TownAction::SaveAndQuit));
        assert_eq!(PlayerInput::Choice(6).to_town_action(), None);
    }

    #[test]
    fn test_combat_commands_depend_on_phase() {
        assert_eq!(
            PlayerInput::Yes.to_combat_command(FightPhase::OfferSpecial),
            CombatCommand::UseSpecial
        );
        assert_eq!(
            PlayerInput::Yes.to_combat_command(FightPhase::Fighting),
            CombatCommand::Other
        );
        assert_eq!(
            PlayerInput::Choice(2).to_combat_command(FightPhase::Fighting),
            CombatCommand::Flee
        );
    }
}
