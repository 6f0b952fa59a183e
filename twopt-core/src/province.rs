//! Provinces and the constraints that couple their regions.

use crate::bundle::GameContext;
use crate::building::Building;
use crate::entity::{next_hash_name, HashFamily, Named};
use crate::error::CoreError;
use crate::region::Region;
use twopt_data::Scope;
use twopt_solver::{LinExpr, LpBackend, Relation, VarId};

/// A cluster of 2–4 regions sharing food, public order and province-wide
/// sanitation effects.
#[derive(Debug, Clone)]
pub struct Province {
    name: String,
    print_name: String,
    hash_name: String,
    pub regions: Vec<Region>,
}

impl Province {
    pub fn new(name: impl Into<String>, print_name: Option<&str>) -> Self {
        let name = name.into();
        let print_name = print_name.unwrap_or(&name).to_string();
        Self {
            name,
            print_name,
            hash_name: next_hash_name(HashFamily::Province),
            regions: Vec::new(),
        }
    }

    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// Every candidate building across the province's regions. This is the
    /// full variable set of the province model.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.regions.iter().flat_map(|r| r.buildings.iter())
    }

    fn var_of(building: &Building) -> Result<VarId, CoreError> {
        building
            .variable
            .ok_or_else(|| CoreError::UnboundVariable(building.name().to_string()))
    }

    fn weighted_sum<F: Fn(&Building) -> f64>(&self, weight: F) -> Result<LinExpr, CoreError> {
        let mut expr = LinExpr::new();
        for b in self.buildings() {
            let w = weight(b);
            if w != 0.0 {
                expr.add_term(Self::var_of(b)?, w);
            }
        }
        Ok(expr)
    }

    /// Net food across the province must not go negative.
    pub fn add_food_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let expr = self.weighted_sum(|b| b.food(ctx))?;
        let label = format!("{}_Food", self.display_name(ctx.name_mode));
        solver.add_constraint(&label, expr, Relation::Ge, 0.0)?;
        Ok(())
    }

    /// Public order across the province must not go negative.
    pub fn add_public_order_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let expr = self.weighted_sum(|b| b.public_order())?;
        let label = format!("{}_Public_Order", self.display_name(ctx.name_mode));
        solver.add_constraint(&label, expr, Relation::Ge, 0.0)?;
        Ok(())
    }

    /// Every region must reach sanitation ≥ 1 once province-scope
    /// contributions from the whole province are counted. This is the only
    /// constraint that couples regions.
    pub fn add_sanitation_constraints(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        for region in &self.regions {
            let mut expr = LinExpr::new();
            for b in &region.buildings {
                let w = b.sanitation();
                if w != 0.0 {
                    expr.add_term(Self::var_of(b)?, w);
                }
            }
            for b in self.buildings() {
                let w = b.sanitation_in(Scope::Province);
                if w != 0.0 {
                    expr.add_term(Self::var_of(b)?, w);
                }
            }
            let label = format!(
                "{}_Sanitation_{}",
                self.display_name(ctx.name_mode),
                region.display_name(ctx.name_mode)
            );
            solver.add_constraint(&label, expr, Relation::Ge, 1.0)?;
        }
        Ok(())
    }

    /// Releases the per-province candidate copies. Every bound variable is
    /// stale afterwards.
    pub fn clean(&mut self) {
        for region in &mut self.regions {
            region.buildings.clear();
        }
    }
}

impl Named for Province {
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
    use crate::region::{RegionKind, RegionPort, Resource};

    #[test]
    fn test_buildings_flattens_regions() {
        let mut province = Province::new("prov_test", None);
        let mut a = Region::new(
            "reg_a",
            None,
            RegionKind::Major,
            RegionPort::NoPort,
            Resource::None,
            5,
        );
        a.buildings.push(Building::new("att_bld_one", None));
        let mut b = Region::new(
            "reg_b",
            None,
            RegionKind::Minor,
            RegionPort::NoPort,
            Resource::None,
            3,
        );
        b.buildings.push(Building::new("att_bld_two", None));
        b.buildings.push(Building::new("att_bld_three", None));
        province.add_region(a);
        province.add_region(b);

        assert_eq!(province.buildings().count(), 3);

        province.clean();
        assert_eq!(province.buildings().count(), 0);
        assert_eq!(province.regions.len(), 2);
    }

    #[test]
    fn test_province_hash_names_monotonic() {
        let a = Province::new("prov_a", None);
        let b = Province::new("prov_b", None);
        let a_n: u64 = a.hash_name()[1..].parse().unwrap();
        let b_n: u64 = b.hash_name()[1..].parse().unwrap();
        assert!(b_n > a_n);
    }
}
