//! # Player Record
//!
//! The player's persistent record: health, gold, inventory, the equipped
//! weapon and the embedded exploration map.

use crate::game::WorldRecord;
use crate::{config, WayfarerError, WayfarerResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Something the player can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    /// Adds to attack damage and wears down with every swing
    Weapon {
        name: String,
        price: i32,
        damage_boost: i32,
        max_durability: i32,
        current_durability: i32,
    },
    /// Single-use item that defeats a monster outright
    Special {
        name: String,
        price: i32,
        note: String,
    },
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Weapon { name, .. } | Item::Special { name, .. } => name,
        }
    }

    pub fn price(&self) -> i32 {
        match self {
            Item::Weapon { price, .. } | Item::Special { price, .. } => *price,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, Item::Weapon { .. })
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Item::Special { .. })
    }
}

fn default_health() -> i32 {
    config::DEFAULT_PLAYER_HEALTH
}

fn default_gold() -> i32 {
    config::DEFAULT_PLAYER_GOLD
}

/// The whole saved game.
///
/// The exploration engine only touches `map_state`; health and gold change
/// through combat outcomes and the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default = "default_gold")]
    pub gold: i32,
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// Index into `inventory` of the equipped weapon
    #[serde(default)]
    pub equipped_weapon: Option<usize>,
    #[serde(default)]
    pub map_state: Option<WorldRecord>,
}

impl PlayerRecord {
    /// Creates a new player with default health and gold and no map yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::PlayerRecord;
    ///
    /// let player = PlayerRecord::new("Arthur");
    /// assert_eq!(player.health, 100);
    /// assert!(player.inventory.is_empty());
    /// assert!(player.map_state.is_none());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: config::DEFAULT_PLAYER_HEALTH,
            gold: config::DEFAULT_PLAYER_GOLD,
            inventory: Vec::new(),
            equipped_weapon: None,
            map_state: None,
        }
    }

    /// The equipped weapon, if the stored index still points at one.
    pub fn equipped_weapon(&self) -> Option<&Item> {
        self.equipped_weapon
            .and_then(|index| self.inventory.get(index))
            .filter(|item| item.is_weapon())
    }

    /// Extra damage from the equipped weapon.
    pub fn damage_boost(&self) -> i32 {
        match self.equipped_weapon() {
            Some(Item::Weapon { damage_boost, .. }) => *damage_boost,
            _ => 0,
        }
    }

    /// Inventory indices of every weapon, in inventory order.
    pub fn weapon_indices(&self) -> Vec<usize> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_weapon())
            .map(|(index, _)| index)
            .collect()
    }

    /// Inventory index of the first special item.
    pub fn special_item_index(&self) -> Option<usize> {
        self.inventory.iter().position(Item::is_special)
    }

    /// Removes an inventory item, keeping the equipped index pointing at the same weapon.
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        if index >= self.inventory.len() {
            return None;
        }
        let item = self.inventory.remove(index);
        self.equipped_weapon = match self.equipped_weapon {
            Some(equipped) if equipped == index => None,
            Some(equipped) if equipped > index => Some(equipped - 1),
            other => other,
        };
        Some(item)
    }

    /// Wears the equipped weapon down by one use.
    ///
    /// Returns the remaining durability, or `None` if nothing is equipped.
    /// A weapon that reaches zero breaks and is removed from the inventory.
    pub fn wear_equipped_weapon(&mut self) -> Option<i32> {
        let index = self.equipped_weapon?;
        let remaining = match self.inventory.get_mut(index) {
            Some(Item::Weapon {
                current_durability, ..
            }) => {
                *current_durability -= 1;
                *current_durability
            }
            _ => return None,
        };

        if remaining <= 0 {
            if let Some(broken) = self.remove_item(index) {
                info!("{} broke", broken.name());
            }
        }
        Some(remaining)
    }

    /// Saves the player record to JSON.
    pub fn save_to_json(&self) -> WayfarerResult<String> {
        serde_json::to_string_pretty(self).map_err(WayfarerError::from)
    }

    /// Loads a player record from JSON.
    pub fn load_from_json(json: &str) -> WayfarerResult<Self> {
        serde_json::from_str(json).map_err(WayfarerError::from)
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new("Wayfarer")
    }
}
