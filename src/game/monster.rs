//! # Monster Entities
//!
//! Monster templates, rolled monster instances, their persisted records and
//! the descriptor handed to combat.
//!
//! Stats are rolled exactly once, when an instance is created from a
//! template. Everything downstream (saving, loading, combat) carries the
//! rolled numbers forward and never rolls again.

use crate::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An RGB display colour.
pub type Rgb = [u8; 3];

/// Colour used for monsters without an entry in the colour table.
pub const FALLBACK_MONSTER_COLOR: Rgb = [200, 0, 0];

/// Immutable archetype a monster is rolled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub description: &'static str,
    /// Inclusive health range
    pub health_range: (i32, i32),
    /// Inclusive power range
    pub power_range: (i32, i32),
    /// Inclusive money reward range
    pub money_range: (i32, i32),
}

/// The fixed table every random monster is drawn from.
pub const MONSTER_TEMPLATES: [MonsterTemplate; 3] = [
    MonsterTemplate {
        name: "Killer Rabbit of Caerbannog",
        description: "A deceptively cute but deadly rabbit with razor sharp teeth.",
        health_range: (500, 1000),
        power_range: (50, 80),
        money_range: (200, 500),
    },
    MonsterTemplate {
        name: "Insulting Frenchman",
        description: "A castle guard who doesn't take kindly to you. Stay upwind of him!",
        health_range: (50, 100),
        power_range: (10, 20),
        money_range: (100, 150),
    },
    MonsterTemplate {
        name: "Three-Headed Giant",
        description: "A giant with three heads that can't seem to agree with each other.",
        health_range: (200, 300),
        power_range: (30, 40),
        money_range: (50, 100),
    },
];

/// Looks up the display colour for a monster name.
pub fn monster_color(name: &str) -> Rgb {
    match name {
        "Killer Rabbit of Caerbannog" => [200, 0, 0],
        "Insulting Frenchman" => [150, 0, 200],
        "Three-Headed Giant" => [0, 200, 0],
        "Slime" => [0, 150, 50],
        "Zombie" => [80, 200, 80],
        _ => FALLBACK_MONSTER_COLOR,
    }
}

impl MonsterTemplate {
    /// Picks a template uniformly at random from [`MONSTER_TEMPLATES`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> &'static MonsterTemplate {
        &MONSTER_TEMPLATES[rng.gen_range(0..MONSTER_TEMPLATES.len())]
    }

    fn roll<R: Rng + ?Sized>(range: (i32, i32), rng: &mut R) -> i32 {
        let (lo, hi) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };
        rng.gen_range(lo..=hi)
    }
}

/// A concrete, stat-rolled monster placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterInstance {
    pub position: Position,
    pub name: String,
    pub description: String,
    pub health: i32,
    pub power: i32,
    pub money_reward: i32,
    pub alive: bool,
    pub color: Rgb,
}

impl MonsterInstance {
    /// Rolls a new living monster at `position`.
    ///
    /// With no template one is chosen uniformly from [`MONSTER_TEMPLATES`].
    /// Health, power and money reward are drawn uniformly from the
    /// template's inclusive ranges, in that order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use wayfarer::{MonsterInstance, Position, MONSTER_TEMPLATES};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let frenchman = &MONSTER_TEMPLATES[1];
    /// let monster = MonsterInstance::instantiate(Some(frenchman), Position::new(2, 3), &mut rng);
    /// assert!(monster.alive);
    /// assert!((50..=100).contains(&monster.health));
    /// ```
    pub fn instantiate<R: Rng + ?Sized>(
        template: Option<&MonsterTemplate>,
        position: Position,
        rng: &mut R,
    ) -> Self {
        let template = match template {
            Some(template) => template,
            None => MonsterTemplate::random(rng),
        };

        let health = MonsterTemplate::roll(template.health_range, rng);
        let power = MonsterTemplate::roll(template.power_range, rng);
        let money_reward = MonsterTemplate::roll(template.money_range, rng);

        Self {
            position,
            name: template.name.to_string(),
            description: template.description.to_string(),
            health,
            power,
            money_reward,
            alive: true,
            color: monster_color(template.name),
        }
    }

    /// Serializes the instance into its persisted record.
    pub fn to_record(&self) -> MonsterRecord {
        MonsterRecord {
            x: self.position.x,
            y: self.position.y,
            name: self.name.clone(),
            description: self.description.clone(),
            health: self.health,
            power: self.power,
            money: self.money_reward,
            alive: self.alive,
            color: Some(self.color),
        }
    }

    /// Rebuilds an instance from a persisted record without re-rolling anything.
    pub fn from_record(record: MonsterRecord) -> Self {
        let color = record
            .color
            .unwrap_or_else(|| monster_color(&record.name));
        Self {
            position: Position::new(record.x, record.y),
            name: record.name,
            description: record.description,
            health: record.health,
            power: record.power,
            money_reward: record.money,
            alive: record.alive,
            color,
        }
    }

    /// Builds the read-only descriptor the combat collaborator accepts.
    pub fn to_encounter_descriptor(&self) -> EncounterDescriptor {
        EncounterDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            health: self.health,
            power: self.power,
            money_reward: self.money_reward,
        }
    }
}

impl From<MonsterRecord> for MonsterInstance {
    fn from(record: MonsterRecord) -> Self {
        Self::from_record(record)
    }
}

fn default_alive() -> bool {
    true
}

/// Persisted form of a [`MonsterInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub money: i32,
    #[serde(default = "default_alive")]
    pub alive: bool,
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// The monster shape handed to combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDescriptor {
    pub name: String,
    pub description: String,
    pub health: i32,
    pub power: i32,
    pub money_reward: i32,
}
