//! Six-item build optimization.
//!
//! `DPS = damage × attack_speed` is bilinear, so the objective is the
//! linearized proxy `w_p · Σpower + w_as · Σattack_speed` with
//! `w_p = scaling · base_attack_speed` and `w_as = base_attack_damage`. The
//! exact DPS of the chosen build is recomputed afterwards and reported next
//! to it.

use thiserror::Error;

use crate::god::God;
use crate::item::{Item, ItemCategory};
use twopt_solver::{
    backend, Direction, LinExpr, Relation, SolveOptions, SolverError, SolverKind, VarKind,
};

pub const BUILD_SIZE: usize = 6;

#[derive(Debug, Error)]
pub enum SmiteError {
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A solved build: the six items, the exact DPS, and the proxy objective the
/// solver actually maximized.
#[derive(Debug, Clone)]
pub struct Build {
    pub items: Vec<Item>,
    pub dps: f64,
    pub proxy_objective: f64,
}

/// Optimizes a six-item build for sustained basic-attack DPS.
///
/// Returns `Ok(None)` when no feasible build exists (for example a pool with
/// fewer than six admissible items).
pub fn optimize_build(
    god: &God,
    pool: &[Item],
    kind: SolverKind,
) -> Result<Option<Build>, SmiteError> {
    let is_ratatoskr = god.name == "Ratatoskr";
    // Acorns are not even candidates for anyone else.
    let pool: Vec<&Item> = pool
        .iter()
        .filter(|i| is_ratatoskr || i.category != ItemCategory::RatatoskrAcorn)
        .collect();

    let mut solver = backend(kind);
    let item_vars: Vec<_> = pool
        .iter()
        .enumerate()
        .map(|(i, _)| solver.add_variable(&format!("item_{i}"), VarKind::Binary))
        .collect::<Result<_, _>>()?;
    let power = solver.add_variable("power_physical", VarKind::Continuous)?;
    let attack_speed = solver.add_variable("basic_attack_speed", VarKind::Continuous)?;
    solver.commit_variables()?;

    let mut size = LinExpr::new();
    for &var in &item_vars {
        size.add_term(var, 1.0);
    }
    solver.add_constraint("build_size", size, Relation::Eq, BUILD_SIZE as f64)?;

    let mut starters = LinExpr::new();
    for (i, item) in pool.iter().enumerate() {
        if item.category == ItemCategory::Starter {
            starters.add_term(item_vars[i], 1.0);
        }
    }
    if !starters.is_empty() {
        solver.add_constraint("starter_limit", starters, Relation::Le, 1.0)?;
    }

    if is_ratatoskr {
        let mut acorns = LinExpr::new();
        for (i, item) in pool.iter().enumerate() {
            if item.category == ItemCategory::RatatoskrAcorn {
                acorns.add_term(item_vars[i], 1.0);
            }
        }
        if !acorns.is_empty() {
            solver.add_constraint("acorn_limit", acorns, Relation::Le, 1.0)?;
        }
    }

    // The accumulators are upper-bounded by the selected items' stat sums
    // and by the per-stat caps; maximization pushes each one up to the
    // smaller bound, which linearizes the clamp.
    let mut power_total = LinExpr::new().with_term(power, 1.0);
    let mut speed_total = LinExpr::new().with_term(attack_speed, 1.0);
    for (i, item) in pool.iter().enumerate() {
        power_total.add_term(item_vars[i], -item.stats.power_physical);
        speed_total.add_term(item_vars[i], -item.stats.basic_attack_speed);
    }
    solver.add_constraint("power_total", power_total, Relation::Le, 0.0)?;
    solver.add_constraint("attack_speed_total", speed_total, Relation::Le, 0.0)?;

    // Caps are net of the god's base stats.
    let power_cap = (god.limits.power_physical - god.stats.power_physical).max(0.0);
    solver.add_constraint(
        "power_cap",
        LinExpr::new().with_term(power, 1.0),
        Relation::Le,
        power_cap,
    )?;
    let speed_cap =
        ((god.limits.basic_attack_speed - god.stats.basic_attack_speed) * 100.0).max(0.0);
    solver.add_constraint(
        "attack_speed_cap",
        LinExpr::new().with_term(attack_speed, 1.0),
        Relation::Le,
        speed_cap,
    )?;

    let w_power = god.basic_attack_scaling / 100.0 * god.stats.basic_attack_speed;
    let w_speed = god.stats.basic_attack_damage;
    solver.set_objective(&[(power, w_power), (attack_speed, w_speed)], Direction::Maximize)?;

    let status = solver.solve(&SolveOptions::default())?;
    if !status.has_solution() {
        log::debug!("no feasible build for {}: {status}", god.name);
        return Ok(None);
    }

    let mut items = Vec::new();
    for (i, item) in pool.iter().enumerate() {
        if solver.variable_value(item_vars[i])? > 0.5 {
            items.push((*item).clone());
        }
    }
    if items.len() != BUILD_SIZE {
        return Ok(None);
    }

    let refs: Vec<&Item> = items.iter().collect();
    let dps = god.dps_with(&refs);
    Ok(Some(Build {
        items,
        dps,
        proxy_objective: solver.objective_value()?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Stats;

    fn power_item(name: &str, power: f64) -> Item {
        Item::new(
            name,
            2000.0,
            Stats {
                power_physical: power,
                ..Stats::default()
            },
            ItemCategory::Regular,
        )
    }

    fn speed_item(name: &str, speed: f64) -> Item {
        Item::new(
            name,
            2000.0,
            Stats {
                basic_attack_speed: speed,
                ..Stats::default()
            },
            ItemCategory::Regular,
        )
    }

    fn hunter() -> God {
        God::new(
            "Ah Muzen Cab",
            Stats {
                basic_attack_damage: 38.0,
                basic_attack_speed: 1.0,
                ..Stats::default()
            },
        )
    }

    fn pool() -> Vec<Item> {
        let mut pool = vec![
            power_item("Deathbringer", 50.0),
            power_item("Heartseeker", 45.0),
            power_item("The Crusher", 40.0),
            speed_item("Odysseus' Bow", 30.0),
            speed_item("Qin's Sais", 25.0),
            speed_item("Hastened Katana", 20.0),
            power_item("Rage", 35.0),
            speed_item("Silverbranch Bow", 15.0),
        ];
        pool.push(Item::new(
            "Hunter's Blessing",
            600.0,
            Stats {
                basic_attack_speed: 10.0,
                ..Stats::default()
            },
            ItemCategory::Starter,
        ));
        pool.push(Item::new(
            "Gilded Arrow",
            600.0,
            Stats {
                power_physical: 5.0,
                ..Stats::default()
            },
            ItemCategory::Starter,
        ));
        pool.push(Item::new(
            "Bristlebush Acorn",
            500.0,
            Stats {
                power_physical: 60.0,
                basic_attack_speed: 20.0,
                ..Stats::default()
            },
            ItemCategory::RatatoskrAcorn,
        ));
        pool
    }

    #[test]
    fn test_hunter_build_has_six_items_and_no_acorn() {
        let god = hunter();
        let build = optimize_build(&god, &pool(), SolverKind::Micro)
            .unwrap()
            .expect("feasible build");
        assert_eq!(build.items.len(), BUILD_SIZE);
        let starters = build
            .items
            .iter()
            .filter(|i| i.category == ItemCategory::Starter)
            .count();
        assert!(starters <= 1);
        assert!(!build
            .items
            .iter()
            .any(|i| i.category == ItemCategory::RatatoskrAcorn));
        assert!(build.dps > god.base_dps());
    }

    #[test]
    fn test_ratatoskr_takes_exactly_one_acorn() {
        let mut god = hunter();
        god.name = "Ratatoskr".to_string();
        let build = optimize_build(&god, &pool(), SolverKind::Micro)
            .unwrap()
            .expect("feasible build");
        assert_eq!(build.items.len(), BUILD_SIZE);
        let acorns = build
            .items
            .iter()
            .filter(|i| i.category == ItemCategory::RatatoskrAcorn)
            .count();
        assert_eq!(acorns, 1);
        let starters = build
            .items
            .iter()
            .filter(|i| i.category == ItemCategory::Starter)
            .count();
        assert!(starters <= 1);
    }

    #[test]
    fn test_small_pool_is_infeasible() {
        let god = hunter();
        let pool = vec![power_item("Deathbringer", 50.0)];
        assert!(optimize_build(&god, &pool, SolverKind::Micro)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_attack_speed_cap_limits_accumulator() {
        // Six huge attack-speed items would blow past the 2.5 cap; the
        // recomputed DPS must respect it.
        let god = hunter();
        let pool: Vec<Item> = (0..6)
            .map(|i| speed_item(&format!("AS {i}"), 100.0))
            .collect();
        let build = optimize_build(&god, &pool, SolverKind::Micro)
            .unwrap()
            .expect("feasible build");
        assert!((build.dps - 38.0 * 2.5).abs() < 1e-6);
    }
}
