//! Items and their stat blocks.

use serde::{Deserialize, Serialize};

/// Flat stat block shared by gods and items.
///
/// `basic_attack_speed` is an absolute value on gods and a percentage bonus
/// on items, matching how the game sheets record it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub power_physical: f64,
    pub power_magical: f64,
    pub basic_attack_damage: f64,
    pub basic_attack_speed: f64,
    pub hp: f64,
    pub prot_physical: f64,
    pub prot_magical: f64,
}

/// Build-slot category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    /// At most one per build.
    Starter,
    /// Ratatoskr's signature item: at most one, and only for Ratatoskr.
    RatatoskrAcorn,
    Regular,
}

impl Default for ItemCategory {
    fn default() -> Self {
        ItemCategory::Regular
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub category: ItemCategory,
}

impl Item {
    pub fn new(name: impl Into<String>, cost: f64, stats: Stats, category: ItemCategory) -> Self {
        Self {
            name: name.into(),
            cost,
            stats,
            category,
        }
    }
}
