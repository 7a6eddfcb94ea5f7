//! # Town Module
//!
//! The town hub: the shop catalogue, purchases and weapon equipping.

use crate::game::{Item, PlayerRecord};
use crate::{WayfarerError, WayfarerResult};
use log::info;
use serde::{Deserialize, Serialize};

/// What the player can do while in town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TownAction {
    /// Browse the shop
    Shop,
    /// Pick a weapon to equip
    Equip,
    /// Head out onto the map
    Explore,
    /// Save and leave the game
    SaveAndQuit,
}

/// Which town screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TownMenu {
    #[default]
    Main,
    Shop,
    Equip,
}

/// Everything the shop sells, in menu order.
pub fn shop_catalogue() -> Vec<Item> {
    vec![
        Item::Weapon {
            name: "Excalibur".to_string(),
            price: 100,
            damage_boost: 20,
            max_durability: 10,
            current_durability: 10,
        },
        Item::Special {
            name: "Holy Hand Grenade of Antioch".to_string(),
            price: 500,
            note: "Blows one of thine enemies to tiny bits, in thy mercy.".to_string(),
        },
    ]
}

/// The greeting shown on arrival, centred within `width` columns.
pub fn welcome_banner(name: &str, width: usize) -> String {
    format!("{:^width$}", format!("Hello, {name}!"))
}

/// The boxed price list for `items`, numbered from 1.
pub fn shop_menu_lines(items: &[Item]) -> Vec<String> {
    let name_width = items
        .iter()
        .map(|item| item.name().chars().count())
        .max()
        .unwrap_or(0);
    let rows: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "| {}) {:<name_width$} {:>5} gold |",
                i + 1,
                item.name(),
                item.price()
            )
        })
        .collect();

    let inner = rows.first().map_or(name_width + 4, |row| row.chars().count() - 2);
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("/{}\\", "-".repeat(inner)));
    lines.extend(rows);
    lines.push(format!("\\{}/", "-".repeat(inner)));
    lines
}

/// Buys up to `quantity` items at `price` with `money`.
///
/// Returns how many were bought and the money left over.
///
/// # Examples
///
/// ```
/// use wayfarer::purchase_quantity;
///
/// assert_eq!(purchase_quantity(123, 1000, 3), (3, 631));
/// assert_eq!(purchase_quantity(123, 201, 3), (1, 78));
/// ```
pub fn purchase_quantity(price: i32, money: i32, quantity: i32) -> (i32, i32) {
    if price <= 0 {
        return (quantity.max(0), money);
    }
    let affordable = (money / price).max(0);
    let purchased = quantity.clamp(0, affordable);
    (purchased, money - purchased * price)
}

/// Result of a shop visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purchase {
    Bought { item: String, gold_left: i32 },
    NotEnoughGold { price: i32, gold: i32 },
}

/// Buys the catalogue entry at `index` (0-based).
pub fn buy(player: &mut PlayerRecord, index: usize) -> WayfarerResult<Purchase> {
    let item = shop_catalogue()
        .into_iter()
        .nth(index)
        .ok_or_else(|| WayfarerError::InvalidAction(format!("No shop item {}", index + 1)))?;

    let (bought, gold_left) = purchase_quantity(item.price(), player.gold, 1);
    if bought == 0 {
        return Ok(Purchase::NotEnoughGold {
            price: item.price(),
            gold: player.gold,
        });
    }

    player.gold = gold_left;
    info!("{} bought {} ({} gold left)", player.name, item.name(), gold_left);
    let name = item.name().to_string();
    player.inventory.push(item);
    Ok(Purchase::Bought {
        item: name,
        gold_left,
    })
}

/// Equips the `choice`-th weapon (0-based, counting weapons only).
///
/// Returns the weapon's name. An unknown choice leaves equipment unchanged.
pub fn equip_weapon(player: &mut PlayerRecord, choice: usize) -> WayfarerResult<String> {
    let weapons = player.weapon_indices();
    if weapons.is_empty() {
        return Err(WayfarerError::InvalidAction(
            "You do not have any weapons.".to_string(),
        ));
    }
    let index = *weapons
        .get(choice)
        .ok_or_else(|| WayfarerError::InvalidAction("No weapon equipped.".to_string()))?;

    player.equipped_weapon = Some(index);
    let name = player.inventory[index].name().to_string();
    info!("{} equipped {}", player.name, name);
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_quantity() {
        assert_eq!(purchase_quantity(341, 2112, 1), (1, 1771));
        assert_eq!(purchase_quantity(123, 1000, 3), (3, 631));
        assert_eq!(purchase_quantity(123, 201, 3), (1, 78));
        assert_eq!(purchase_quantity(50, 10, 2), (0, 10));
    }

    #[test]
    fn test_welcome_banner_is_centred() {
        assert_eq!(welcome_banner("Jeff", 20), "    Hello, Jeff!    ");
        assert_eq!(welcome_banner("Logan", 25).len(), 25);
        assert_eq!(welcome_banner("A very long name indeed", 5), "Hello, A very long name indeed!");
    }

    #[test]
    fn test_shop_menu_lines_line_up() {
        let lines = shop_menu_lines(&shop_catalogue());
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('/'));
        assert!(lines[3].ends_with('/'));
        assert!(lines[1].contains("1) Excalibur"));
        assert!(lines[2].contains("500 gold"));

        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
    }

    #[test]
    fn test_buy_deducts_gold() {
        let mut player = PlayerRecord::new("Test");
        player.gold = 150;

        let purchase = buy(&mut player, 0).unwrap();
        assert_eq!(
            purchase,
            Purchase::Bought {
                item: "Excalibur".to_string(),
                gold_left: 50
            }
        );
        assert_eq!(player.gold, 50);
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_buy_without_gold() {
        let mut player = PlayerRecord::new("Test");
        let purchase = buy(&mut player, 1).unwrap();
        assert_eq!(
            purchase,
            Purchase::NotEnoughGold {
                price: 500,
                gold: 50
            }
        );
        assert!(player.inventory.is_empty());
        assert_eq!(player.gold, 50);
    }

    #[test]
    fn test_buy_unknown_item() {
        let mut player = PlayerRecord::new("Test");
        assert!(matches!(
            buy(&mut player, 7),
            Err(WayfarerError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_equip_weapon() {
        let mut player = PlayerRecord::new("Test");
        assert!(equip_weapon(&mut player, 0).is_err());

        player.inventory = shop_catalogue();
        assert!(equip_weapon(&mut player, 1).is_err());
        assert_eq!(player.equipped_weapon, None);

        assert_eq!(equip_weapon(&mut player, 0).unwrap(), "Excalibur");
        assert_eq!(player.equipped_weapon, Some(0));
        assert_eq!(player.damage_boost(), 20);
    }
}
