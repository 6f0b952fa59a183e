//! The effect-aggregation algebra.
//!
//! A building owns one effect bag: four maps from effect name to amount, one
//! per scope. The four queries below collapse a bag into the scalars the
//! constraint generators need. Effect names are opaque strings from the game
//! tables; which of them count as GDP is a per-game question and is delegated
//! to the classifier.

use std::collections::BTreeMap;

use crate::classifier::BuildingClassifier;
use twopt_data::Scope;

fn scope_index(scope: Scope) -> usize {
    match scope {
        Scope::Faction => 0,
        Scope::Province => 1,
        Scope::Region => 2,
        Scope::Building => 3,
    }
}

/// Per-scope effect amounts, keyed by effect name.
///
/// `BTreeMap` keeps iteration deterministic, which keeps generated models
/// reproducible run to run.
#[derive(Debug, Clone, Default)]
pub struct EffectBag {
    by_scope: [BTreeMap<String, f64>; 4],
}

impl EffectBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an effect amount at a scope. Keys are unique per
    /// scope, matching the junction table.
    pub fn insert(&mut self, scope: Scope, effect: &str, amount: f64) {
        self.by_scope[scope_index(scope)].insert(effect.to_string(), amount);
    }

    pub fn at(&self, scope: Scope) -> &BTreeMap<String, f64> {
        &self.by_scope[scope_index(scope)]
    }

    fn sum_all<F: Fn(&str) -> bool>(&self, pred: F) -> f64 {
        self.by_scope
            .iter()
            .flat_map(|m| m.iter())
            .filter(|(name, _)| pred(name))
            .map(|(_, amount)| amount)
            .sum()
    }

    fn sum_at<F: Fn(&str) -> bool>(&self, scope: Scope, pred: F) -> f64 {
        self.at(scope)
            .iter()
            .filter(|(name, _)| pred(name))
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Total GDP: plain GDP effects plus fertility-scaled GDP effects
    /// multiplied by the province fertility.
    pub fn gdp(&self, rules: &dyn BuildingClassifier, fertility: f64) -> f64 {
        let base = self.sum_all(|name| rules.effect_is_gdp(name, false));
        let scaled = self.sum_all(|name| rules.effect_is_gdp(name, true));
        base + fertility * scaled
    }

    /// Sum of public-order effects over all scopes.
    pub fn public_order(&self) -> f64 {
        self.sum_all(|name| name.contains("public_order"))
    }

    /// Local sanitation: sanitation minus squalor, at region and building
    /// scope only. Province-scope contributions are pulled in separately by
    /// the province-wide constraint.
    pub fn sanitation(&self) -> f64 {
        let local = |scope| {
            self.sum_at(scope, |n| n.contains("sanitation_buildings"))
                - self.sum_at(scope, |n| n.contains("squalor"))
        };
        local(Scope::Region) + local(Scope::Building)
    }

    /// Sanitation minus squalor restricted to one scope. Region and building
    /// scope are fused, mirroring [`sanitation`](Self::sanitation).
    pub fn sanitation_in(&self, scope: Scope) -> f64 {
        match scope {
            Scope::Faction | Scope::Province => {
                self.sum_at(scope, |n| n.contains("sanitation_buildings"))
                    - self.sum_at(scope, |n| n.contains("squalor"))
            }
            Scope::Region | Scope::Building => self.sanitation(),
        }
    }

    /// Net food: production (with fertility-scaled terms multiplied by the
    /// fertility) minus consumption.
    pub fn food(&self, fertility: f64) -> f64 {
        let production = |fertile: bool| {
            self.sum_all(|n| {
                n.contains("food") && n.contains("production") && n.contains("fertility") == fertile
            })
        };
        let consumption = self.sum_all(|n| n.contains("food") && n.contains("consumption"));
        production(false) + fertility * production(true) - consumption
    }
}
