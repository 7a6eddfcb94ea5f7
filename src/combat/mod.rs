//! # Combat Module
//!
//! The combat collaborator: a turn-based duel between the player and one
//! monster.
//!
//! [`Fight`] is a small state machine driven one command at a time so a
//! frame-based front end can run it interactively. [`AutoBattle`] drives the
//! same state machine to completion and plugs into the encounter bridge as a
//! [`CombatInvoker`].

use crate::game::{CombatInvoker, CombatOutcome, EncounterDescriptor, PlayerRecord};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Base damage the player deals per attack, before the weapon boost.
pub const PLAYER_DAMAGE: RangeInclusive<i32> = 25..=75;

/// A player decision during a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatCommand {
    /// Spend a special item to win instantly
    UseSpecial,
    /// Keep the special item and fight normally
    DeclineSpecial,
    Attack,
    Flee,
    /// Unrecognized input
    Other,
}

/// Where a fight stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightPhase {
    /// The player carries a special item and is asked whether to use it
    OfferSpecial,
    /// Trading blows
    Fighting,
    Won,
    Lost,
    Fled,
}

impl FightPhase {
    pub fn is_over(self) -> bool {
        matches!(self, FightPhase::Won | FightPhase::Lost | FightPhase::Fled)
    }
}

/// One fight against one monster.
#[derive(Debug, Clone)]
pub struct Fight {
    monster: EncounterDescriptor,
    monster_health: i32,
    player_health: i32,
    gold: i32,
    phase: FightPhase,
    messages: Vec<String>,
}

impl Fight {
    /// Opens a fight. Health and gold are taken from the player record.
    pub fn start(player: &PlayerRecord, monster: EncounterDescriptor) -> Self {
        let phase = if player.special_item_index().is_some() {
            FightPhase::OfferSpecial
        } else {
            FightPhase::Fighting
        };
        let mut fight = Self {
            monster_health: monster.health,
            player_health: player.health,
            gold: player.gold,
            phase,
            messages: Vec::new(),
            monster,
        };
        fight.say(format!(
            "A {} appears! {}",
            fight.monster.name, fight.monster.description
        ));
        if let Some(index) = player.special_item_index() {
            fight.say(format!(
                "You have {} that can instantly defeat the monster. Use it? (Y/N)",
                player.inventory[index].name()
            ));
        }
        fight
    }

    pub fn phase(&self) -> FightPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn monster(&self) -> &EncounterDescriptor {
        &self.monster
    }

    pub fn monster_health(&self) -> i32 {
        self.monster_health
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    /// Every message produced so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Applies one command and returns the new phase.
    ///
    /// Commands after the fight is over are ignored. While a special item is
    /// on offer, any command other than using it declines the offer first.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: CombatCommand,
        player: &mut PlayerRecord,
        rng: &mut R,
    ) -> FightPhase {
        if self.is_over() {
            return self.phase;
        }

        if self.phase == FightPhase::OfferSpecial {
            if command == CombatCommand::UseSpecial {
                self.use_special(player);
                return self.phase;
            }
            self.phase = FightPhase::Fighting;
        }

        match command {
            CombatCommand::Attack => self.attack(player, rng),
            CombatCommand::Flee => {
                self.say(
                    "You get too scared. An onlooker to the battle, Sir Robin, joins you \
                     momentarily as you bravely run away."
                        .to_string(),
                );
                self.phase = FightPhase::Fled;
            }
            CombatCommand::DeclineSpecial => {}
            CombatCommand::UseSpecial | CombatCommand::Other => {
                self.say("That's not a command, silly.".to_string());
            }
        }
        self.phase
    }

    /// The result to hand back to the encounter bridge.
    pub fn outcome(&self) -> CombatOutcome {
        CombatOutcome {
            health: self.player_health,
            gold: self.gold,
            monster_health: self.monster_health,
            monster_defeated: self.phase == FightPhase::Won,
        }
    }

    fn use_special(&mut self, player: &mut PlayerRecord) {
        let Some(index) = player.special_item_index() else {
            self.phase = FightPhase::Fighting;
            return;
        };
        if let Some(item) = player.remove_item(index) {
            self.say(format!(
                "You used {}! The monster is defeated instantly.",
                item.name()
            ));
        }
        self.monster_health = 0;
        self.win();
    }

    fn attack<R: Rng + ?Sized>(&mut self, player: &mut PlayerRecord, rng: &mut R) {
        let weapon_name = player.equipped_weapon().map(|w| w.name().to_string());
        let damage = rng.gen_range(PLAYER_DAMAGE) + player.damage_boost();

        if let Some(name) = weapon_name {
            match player.wear_equipped_weapon() {
                Some(left) if left > 0 => {
                    self.say(format!("You attack with {name}! Durability left: {left}"))
                }
                Some(_) => self.say(format!("You attack with {name}! Your {name} broke!")),
                None => {}
            }
        }

        self.monster_health = (self.monster_health - damage).max(0);
        self.player_health = (self.player_health - self.monster.power).max(0);
        self.say(format!("You hit the {} for {} damage.", self.monster.name, damage));
        self.say(format!(
            "The {} hit you for {} damage.",
            self.monster.name, self.monster.power
        ));

        if self.monster_health <= 0 {
            // A mutual knockout counts as a win, and the winner is kept on
            // 1 health rather than 0, the same floor a loss leaves.
            if self.player_health <= 0 {
                self.player_health = 1;
            }
            self.win();
        } else if self.player_health <= 0 {
            self.say("You lost. Never underestimate an opponent!".to_string());
            self.player_health = 1;
            self.phase = FightPhase::Lost;
            info!("Player lost to {}", self.monster.name);
        }
    }

    fn win(&mut self) {
        self.gold += self.monster.money_reward;
        self.say(format!("You defeated the {}!", self.monster.name));
        self.say(format!("You found {} gold!", self.monster.money_reward));
        self.phase = FightPhase::Won;
        info!(
            "Player defeated {} and now has {} gold",
            self.monster.name, self.gold
        );
    }

    fn say(&mut self, message: String) {
        self.messages.push(message);
    }
}

/// Fights automatically: attacks every round and never flees.
#[derive(Debug, Clone)]
pub struct AutoBattle<R> {
    rng: R,
    /// Whether to spend a special item when one is on offer
    pub use_special: bool,
}

impl<R: Rng> AutoBattle<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            use_special: false,
        }
    }
}

impl<R: Rng> CombatInvoker for AutoBattle<R> {
    fn fight(&mut self, player: &mut PlayerRecord, monster: &EncounterDescriptor) -> CombatOutcome {
        let mut fight = Fight::start(player, monster.clone());
        while !fight.is_over() {
            let command = match fight.phase() {
                FightPhase::OfferSpecial if self.use_special => CombatCommand::UseSpecial,
                FightPhase::OfferSpecial => CombatCommand::DeclineSpecial,
                _ => CombatCommand::Attack,
            };
            fight.apply(command, player, &mut self.rng);
        }
        fight.outcome()
    }
}
