//! Catalog buildings and their region-scoped copies.

use serde::{Deserialize, Serialize};

use crate::bundle::GameContext;
use crate::entity::{next_hash_name, HashFamily, Named};
use crate::effects::EffectBag;
use twopt_data::Scope;
use twopt_solver::VarId;

/// Identity of a catalog building, keyed on the canonical name (the only
/// name form guaranteed unique across the whole catalog). Containers use
/// this, never the building struct itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(String);

impl BuildingId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A constructible building: names, effect bag, and (while a province is
/// being compiled) the bound solver variable.
#[derive(Debug, Clone)]
pub struct Building {
    name: String,
    print_name: String,
    hash_name: String,
    pub effects: EffectBag,
    /// Bound by the problem builder; `None` for catalog buildings and for
    /// copies whose solver has been reset.
    pub variable: Option<VarId>,
}

impl Building {
    pub fn new(name: impl Into<String>, print_name: Option<&str>) -> Self {
        let name = name.into();
        let print_name = print_name.unwrap_or(&name).to_string();
        Self {
            name,
            print_name,
            hash_name: next_hash_name(HashFamily::Building),
            effects: EffectBag::new(),
            variable: None,
        }
    }

    pub fn id(&self) -> BuildingId {
        BuildingId::new(self.name.clone())
    }

    /// Produces the region-scoped copy used as a decision variable: all
    /// three name forms become `<region>_<building>`, the effect bag is
    /// owned, and no variable is bound. Mutating the copy never touches the
    /// catalog building.
    pub fn clone_for_region(&self, region: &dyn Named) -> Building {
        Building {
            name: format!("{}_{}", region.name(), self.name),
            print_name: format!("{}_{}", region.print_name(), self.print_name),
            hash_name: format!("{}_{}", region.hash_name(), self.hash_name),
            effects: self.effects.clone(),
            variable: None,
        }
    }

    pub fn add_effect(&mut self, scope: Scope, effect: &str, amount: f64) {
        self.effects.insert(scope, effect, amount);
    }

    pub fn gdp(&self, ctx: &GameContext) -> f64 {
        self.effects.gdp(ctx.classifier(), ctx.fertility)
    }

    pub fn public_order(&self) -> f64 {
        self.effects.public_order()
    }

    pub fn sanitation(&self) -> f64 {
        self.effects.sanitation()
    }

    pub fn sanitation_in(&self, scope: Scope) -> f64 {
        self.effects.sanitation_in(scope)
    }

    pub fn food(&self, ctx: &GameContext) -> f64 {
        self.effects.food(ctx.fertility)
    }
}

impl Named for Building {
    fn name(&self) -> &str {
        &self.name
    }

    fn print_name(&self) -> &str {
        &self.print_name
    }

    fn hash_name(&self) -> &str {
        &self.hash_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{AttilaCampaign, AttilaFaction, GameBundle, GameContext, Religion};
    use crate::entity::NameMode;
    use crate::region::{Region, RegionKind, RegionPort, Resource};

    fn ctx() -> GameContext {
        GameContext::new(GameBundle::attila(
            AttilaCampaign::Attila,
            AttilaFaction::RomanEast,
            Religion::Orthodox,
        ))
    }

    fn named_region(name: &str, print_name: &str) -> Region {
        Region::new(
            name,
            Some(print_name),
            RegionKind::Major,
            RegionPort::NoPort,
            Resource::None,
            5,
        )
    }

    #[test]
    fn test_print_name_defaults_to_canonical() {
        let b = Building::new("att_bld_roman_east_city_major_1", None);
        assert_eq!(b.print_name(), "att_bld_roman_east_city_major_1");
        let b = Building::new("att_bld_roman_east_city_major_1", Some("Imperial City"));
        assert_eq!(b.print_name(), "Imperial City");
    }

    #[test]
    fn test_clone_for_region_renames_all_forms() {
        let mut b = Building::new("att_bld_roman_east_city_major_1", Some("City"));
        b.add_effect(Scope::Building, "att_effect_economy_gdp_trade_local", 100.0);

        let region = named_region("reg_thracia_constantinopolis", "Constantinople");
        let copy = b.clone_for_region(&region);
        assert_eq!(
            copy.name(),
            "reg_thracia_constantinopolis_att_bld_roman_east_city_major_1"
        );
        assert_eq!(copy.print_name(), "Constantinople_City");
        assert!(copy.hash_name().contains('_'));
        assert!(copy.variable.is_none());
        assert_eq!(copy.gdp(&ctx()), 100.0);
    }

    #[test]
    fn test_copy_is_isolated_from_catalog() {
        let mut b = Building::new("att_bld_all_farm_1", None);
        b.add_effect(Scope::Building, "att_effect_economy_gdp_agriculture", 50.0);

        let region = named_region("reg_x", "X");
        let mut copy = b.clone_for_region(&region);
        copy.add_effect(Scope::Building, "att_effect_economy_gdp_agriculture", 999.0);

        assert_eq!(b.gdp(&ctx()), 50.0);
        assert_eq!(copy.gdp(&ctx()), 999.0);
    }

    #[test]
    fn test_display_name_modes() {
        let b = Building::new("att_bld_x", Some("X"));
        assert_eq!(b.display_name(NameMode::Name), "att_bld_x");
        assert_eq!(b.display_name(NameMode::PrintName), "X");
        assert!(b.display_name(NameMode::HashName).starts_with('B'));
    }
}
