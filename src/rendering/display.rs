//! # Display Management
//!
//! Draws the town, the map and combat screens with macroquad.
//!
//! Every screen is a pure function of read-only state: the map is drawn from
//! a [`MapSnapshot`], never from the live world.

use crate::combat::{Fight, FightPhase};
use crate::game::{GameState, Item, MapSnapshot, PlayerRecord, Rgb};
use crate::rendering::ui::{draw_bar, wrap_text};
use crate::town::{shop_catalogue, shop_menu_lines, TownMenu};
use crate::config;
use macroquad::prelude::*;

const TITLE_SIZE: f32 = 28.0;
const TEXT_SIZE: f32 = 20.0;
const LINE_HEIGHT: f32 = 22.0;

/// Converts a stored monster colour to a macroquad colour.
pub fn rgb_to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb[0], rgb[1], rgb[2], 255)
}

/// Side length in pixels of one map tile so the whole grid fits the map area.
pub fn tile_size_for(area_width: f32, area_height: f32, grid_size: i32) -> f32 {
    let cells = grid_size.max(1) as f32;
    (area_width.min(area_height) / cells).floor().max(4.0)
}

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// UI panel width in pixels
    pub ui_panel_width: f32,
    /// Height of the message area at the bottom of the screen
    pub message_area_height: f32,
    /// How many recent messages to show
    pub visible_messages: usize,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    pub fn new() -> Self {
        Self {
            ui_panel_width: 300.0,
            message_area_height: 110.0,
            visible_messages: 4,
        }
    }

    /// Renders the town hub.
    pub fn render_town(&self, game: &GameState, menu: TownMenu) {
        clear_background(Color::from_rgba(30, 24, 18, 255));
        let player = game.player();
        let mut y = 40.0;

        draw_text(&format!("{} - Town", config::GAME_TITLE), 20.0, y, TITLE_SIZE, GOLD);
        y += LINE_HEIGHT * 2.0;

        let lines: Vec<String> = match menu {
            TownMenu::Main => vec![
                "What would you like to do?".to_string(),
                "1) Visit the shop".to_string(),
                "2) Equip a weapon".to_string(),
                "3) Explore the map".to_string(),
                "4) Save and quit".to_string(),
            ],
            TownMenu::Shop => {
                let mut lines = vec![
                    "Welcome to the shop!".to_string(),
                    format!("You have {} gold.", player.gold),
                ];
                lines.extend(shop_menu_lines(&shop_catalogue()));
                lines.push("Press a number to buy, Backspace to leave.".to_string());
                lines
            }
            TownMenu::Equip => {
                let mut lines = vec!["Choose a weapon to equip:".to_string()];
                lines.extend(weapon_lines(player));
                lines.push("Press a number to equip, Backspace to cancel.".to_string());
                lines
            }
        };

        for line in &lines {
            draw_text(line, 20.0, y, TEXT_SIZE, WHITE);
            y += LINE_HEIGHT;
        }

        self.render_panel(player);
        self.render_messages(game.messages());
    }

    /// Renders the exploration map from a snapshot.
    pub fn render_map(&self, snapshot: &MapSnapshot, game: &GameState) {
        clear_background(BLACK);

        let area_width = screen_width() - self.ui_panel_width - 20.0;
        let area_height = screen_height() - self.message_area_height - 20.0;
        let tile = tile_size_for(area_width, area_height, snapshot.grid_size);
        let origin = vec2(10.0, 10.0);

        for y in 0..snapshot.grid_size {
            for x in 0..snapshot.grid_size {
                let px = origin.x + x as f32 * tile;
                let py = origin.y + y as f32 * tile;
                draw_rectangle(px, py, tile - 1.0, tile - 1.0, Color::from_rgba(40, 60, 40, 255));
            }
        }

        let cell = |x: i32, y: i32| vec2(origin.x + x as f32 * tile, origin.y + y as f32 * tile);

        let town = cell(snapshot.town_pos.x, snapshot.town_pos.y);
        draw_rectangle(town.x, town.y, tile - 1.0, tile - 1.0, BROWN);
        draw_text("T", town.x + tile * 0.3, town.y + tile * 0.7, tile * 0.6, WHITE);

        for monster in &snapshot.living_monsters {
            let at = cell(monster.position.x, monster.position.y);
            draw_circle(
                at.x + tile / 2.0,
                at.y + tile / 2.0,
                tile * 0.35,
                rgb_to_color(monster.color),
            );
        }

        let player = cell(snapshot.player_pos.x, snapshot.player_pos.y);
        draw_rectangle(
            player.x + tile * 0.2,
            player.y + tile * 0.2,
            tile * 0.6,
            tile * 0.6,
            SKYBLUE,
        );

        self.render_panel(game.player());
        self.render_map_info(snapshot, game);
        self.render_messages(game.messages());
    }

    /// Renders a fight in progress.
    pub fn render_combat(&self, fight: &Fight, game: &GameState) {
        clear_background(Color::from_rgba(40, 10, 10, 255));
        let monster = fight.monster();
        let mut y = 40.0;

        draw_text(&format!("Fighting the {}", monster.name), 20.0, y, TITLE_SIZE, RED);
        y += LINE_HEIGHT * 1.5;
        for line in wrap_text(&monster.description, 60) {
            draw_text(&line, 20.0, y, TEXT_SIZE, LIGHTGRAY);
            y += LINE_HEIGHT;
        }
        y += LINE_HEIGHT / 2.0;

        draw_text(
            &format!("Monster health: {}", fight.monster_health()),
            20.0,
            y,
            TEXT_SIZE,
            WHITE,
        );
        draw_bar(240.0, y - 12.0, 200.0, fight.monster_health(), monster.health, RED);
        y += LINE_HEIGHT;
        draw_text(
            &format!("Your health: {}", fight.player_health()),
            20.0,
            y,
            TEXT_SIZE,
            WHITE,
        );
        draw_bar(
            240.0,
            y - 12.0,
            200.0,
            fight.player_health(),
            config::DEFAULT_PLAYER_HEALTH,
            GREEN,
        );
        y += LINE_HEIGHT * 2.0;

        let prompt = match fight.phase() {
            FightPhase::OfferSpecial => "Use your special item? Y/N",
            FightPhase::Fighting => "1) Attack   2) Run away",
            _ => "Press Enter to continue.",
        };
        draw_text(prompt, 20.0, y, TEXT_SIZE, YELLOW);
        y += LINE_HEIGHT * 2.0;

        let recent = fight.messages().len().saturating_sub(8);
        for message in &fight.messages()[recent..] {
            for line in wrap_text(message, 70) {
                draw_text(&line, 20.0, y, TEXT_SIZE * 0.9, WHITE);
                y += LINE_HEIGHT;
            }
        }

        self.render_panel(game.player());
    }

    /// Renders the player panel on the right.
    fn render_panel(&self, player: &PlayerRecord) {
        let panel_x = screen_width() - self.ui_panel_width + 10.0;
        let mut y = 30.0;

        draw_text(&player.name, panel_x, y, TEXT_SIZE + 4.0, YELLOW);
        y += LINE_HEIGHT * 1.5;

        draw_text(&format!("Health: {}", player.health), panel_x, y, TEXT_SIZE, WHITE);
        y += 6.0;
        draw_bar(
            panel_x,
            y,
            self.ui_panel_width - 40.0,
            player.health,
            config::DEFAULT_PLAYER_HEALTH,
            GREEN,
        );
        y += LINE_HEIGHT + 6.0;

        draw_text(&format!("Gold: {}", player.gold), panel_x, y, TEXT_SIZE, GOLD);
        y += LINE_HEIGHT;

        let weapon = match player.equipped_weapon() {
            Some(Item::Weapon {
                name,
                current_durability,
                max_durability,
                ..
            }) => format!("{} ({}/{})", name, current_durability, max_durability),
            _ => "bare hands".to_string(),
        };
        draw_text(&format!("Weapon: {}", weapon), panel_x, y, TEXT_SIZE * 0.9, WHITE);
        y += LINE_HEIGHT * 1.5;

        draw_text("Inventory:", panel_x, y, TEXT_SIZE, SKYBLUE);
        y += LINE_HEIGHT;
        if player.inventory.is_empty() {
            draw_text("(empty)", panel_x, y, TEXT_SIZE * 0.9, GRAY);
        }
        for item in &player.inventory {
            for line in wrap_text(item.name(), 24) {
                draw_text(&line, panel_x, y, TEXT_SIZE * 0.9, WHITE);
                y += LINE_HEIGHT * 0.9;
            }
        }
    }

    fn render_map_info(&self, snapshot: &MapSnapshot, game: &GameState) {
        let panel_x = screen_width() - self.ui_panel_width + 10.0;
        let mut y = screen_height() - self.message_area_height - 110.0;

        let moves = game.world().map_or(0, |world| world.player_move_count());
        let info = [
            format!("Position: ({}, {})", snapshot.player_pos.x, snapshot.player_pos.y),
            format!("Moves: {}", moves),
            format!("Monsters about: {}", snapshot.living_monsters.len()),
            "Arrows/WASD: move  Esc: quit".to_string(),
        ];
        for line in &info {
            draw_text(line, panel_x, y, TEXT_SIZE * 0.85, LIGHTGRAY);
            y += LINE_HEIGHT;
        }
    }

    /// Renders the message area.
    fn render_messages(&self, messages: &[String]) {
        let top = screen_height() - self.message_area_height;
        draw_rectangle(
            0.0,
            top,
            screen_width(),
            self.message_area_height,
            Color::new(0.0, 0.0, 0.0, 0.8),
        );

        let start = messages.len().saturating_sub(self.visible_messages);
        for (i, message) in messages[start..].iter().enumerate() {
            let y = top + 24.0 + i as f32 * LINE_HEIGHT;
            draw_text(message, 10.0, y, TEXT_SIZE * 0.85, WHITE);
        }
    }
}

/// Numbered weapon list with durability, as shown on the equip screen.
pub fn weapon_lines(player: &PlayerRecord) -> Vec<String> {
    let weapons: Vec<String> = player
        .inventory
        .iter()
        .filter_map(|item| match item {
            Item::Weapon {
                name,
                current_durability,
                max_durability,
                ..
            } => Some(format!(
                "{} (Durability: {}/{})",
                name, current_durability, max_durability
            )),
            Item::Special { .. } => None,
        })
        .enumerate()
        .map(|(i, line)| format!("{}) {}", i + 1, line))
        .collect();

    if weapons.is_empty() {
        vec!["You do not have any weapons.".to_string()]
    } else {
        weapons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_fits_grid() {
        assert_eq!(tile_size_for(500.0, 400.0, 10), 40.0);
        assert_eq!(tile_size_for(500.0, 400.0, 0), 400.0);
        assert_eq!(tile_size_for(10.0, 10.0, 100), 4.0);
    }

    #[test]
    fn test_rgb_to_color() {
        let color = rgb_to_color([255, 0, 0]);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_weapon_lines() {
        let mut player = PlayerRecord::new("Test");
        assert_eq!(weapon_lines(&player), vec!["You do not have any weapons."]);

        player.inventory = shop_catalogue();
        assert_eq!(
            weapon_lines(&player),
            vec!["1) Excalibur (Durability: 10/10)"]
        );
    }
}
