//! Gods, their base stats and per-stat caps.

use serde::{Deserialize, Serialize};

use crate::item::{Item, Stats};

/// Hard per-stat caps the game applies regardless of items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub hp: f64,
    pub basic_attack_damage: f64,
    pub basic_attack_speed: f64,
    pub power_physical: f64,
    pub power_magical: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            hp: 5500.0,
            basic_attack_damage: 10_000.0,
            basic_attack_speed: 2.5,
            power_physical: 400.0,
            power_magical: 900.0,
        }
    }
}

fn full_scaling() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct God {
    pub name: String,
    pub stats: Stats,
    /// Basic-attack power scaling, as a percentage (100 = full scaling).
    #[serde(default = "full_scaling")]
    pub basic_attack_scaling: f64,
    #[serde(default)]
    pub limits: Limits,
}

impl God {
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            name: name.into(),
            stats,
            basic_attack_scaling: 100.0,
            limits: Limits::default(),
        }
    }

    /// Damage of one basic attack with the given bonus power, capped.
    pub fn basic_attack_damage(&self, bonus_power: f64) -> f64 {
        let power = self.stats.power_physical + bonus_power;
        let damage = self.stats.basic_attack_damage + self.basic_attack_scaling / 100.0 * power;
        damage.min(self.limits.basic_attack_damage)
    }

    /// Sustained basic-attack DPS with the given items equipped. This is the
    /// exact (bilinear) value, recomputed after the linearized optimization.
    pub fn dps_with(&self, items: &[&Item]) -> f64 {
        let bonus_power: f64 = items.iter().map(|i| i.stats.power_physical).sum();
        let bonus_speed: f64 = items.iter().map(|i| i.stats.basic_attack_speed).sum();
        let speed = (self.stats.basic_attack_speed + bonus_speed / 100.0)
            .min(self.limits.basic_attack_speed);
        self.basic_attack_damage(bonus_power) * speed
    }

    /// DPS with no items at all.
    pub fn base_dps(&self) -> f64 {
        self.dps_with(&[])
    }
}
