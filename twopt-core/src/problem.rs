//! The per-province compile-and-solve pipeline, gated by a state machine.
//!
//! Order per province: reset → add buildings → apply filters → add
//! constraints → add objective → solve → read answers → clean. Invoking a
//! step out of order is a [`CoreError::StateOutOfOrder`], not a silent
//! no-op: once the objective has been materialized the variable set must
//! never change.

use std::time::{Duration, Instant};

use crate::bundle::GameContext;
use crate::catalog::Catalog;
use crate::classifier::{extract_entry, EntryKind};
use crate::entity::Named;
use crate::error::CoreError;
use crate::province::Province;
use twopt_solver::{backend, Direction, LpBackend, SolveOptions, SolveStatus, SolverKind};

/// Pipeline position of the problem. Transitions are strictly forward
/// within one province; `reset` starts the next province over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemState {
    Init,
    ProvincesAdded,
    BuildingsAdded,
    FiltersAdded,
    ConstraintsAdded,
    ObjectiveAdded,
    Solved,
}

/// Optional policy filters applied between materialization and constraint
/// generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterPolicy {
    /// Drop city chains below this tier.
    pub city_level: Option<u32>,
    /// Drop every building below this tier.
    pub building_level: Option<u32>,
    /// Drop military buildings.
    pub drop_military: bool,
}

/// Outcome of one province: status, objective, and the selected
/// `(region, building)` pairs in print-name form.
#[derive(Debug, Clone)]
pub struct ProvinceReport {
    pub province: String,
    pub status: SolveStatus,
    pub objective: f64,
    pub answers: Vec<(String, String)>,
}

pub struct Problem {
    provinces: Vec<Province>,
    kind: SolverKind,
    solver: Box<dyn LpBackend>,
    state: ProblemState,
    last_status: Option<SolveStatus>,
    global_time: Duration,
}

impl Problem {
    pub fn new(kind: SolverKind) -> Self {
        Self {
            provinces: Vec::new(),
            kind,
            solver: backend(kind),
            state: ProblemState::Init,
            last_status: None,
            global_time: Duration::ZERO,
        }
    }

    pub fn state(&self) -> ProblemState {
        self.state
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    /// Accumulated wall time spent inside backend solves.
    pub fn global_time(&self) -> Duration {
        self.global_time
    }

    fn require(&self, expected: ProblemState, op: &'static str) -> Result<(), CoreError> {
        if self.state != expected {
            return Err(CoreError::StateOutOfOrder {
                op,
                state: self.state,
            });
        }
        Ok(())
    }

    fn province_mut(&mut self, idx: usize) -> Result<&mut Province, CoreError> {
        self.provinces
            .get_mut(idx)
            .ok_or(CoreError::UnknownProvince(idx))
    }

    fn province(&self, idx: usize) -> Result<&Province, CoreError> {
        self.provinces
            .get(idx)
            .ok_or(CoreError::UnknownProvince(idx))
    }

    /// Registers the campaign's provinces. Only valid once, from `Init`.
    pub fn add_provinces(&mut self, provinces: Vec<Province>) -> Result<(), CoreError> {
        self.require(ProblemState::Init, "add_provinces")?;
        self.provinces = provinces;
        self.state = ProblemState::ProvincesAdded;
        Ok(())
    }

    /// Discards the current model and starts the next province with a fresh
    /// backend. Registered provinces persist, but any still-materialized
    /// candidates are released: their variable handles belong to the old
    /// backend and must be rebuilt by `add_buildings`.
    pub fn reset(&mut self) {
        self.solver = backend(self.kind);
        self.last_status = None;
        for province in &mut self.provinces {
            province.clean();
        }
        self.state = if self.provinces.is_empty() {
            ProblemState::Init
        } else {
            ProblemState::ProvincesAdded
        };
    }

    /// Materializes region-scoped candidates for one province and binds
    /// their binary variables.
    pub fn add_buildings(
        &mut self,
        ctx: &GameContext,
        catalog: &Catalog,
        idx: usize,
    ) -> Result<(), CoreError> {
        self.require(ProblemState::ProvincesAdded, "add_buildings")?;
        let solver = self.solver.as_mut();
        let province = self
            .provinces
            .get_mut(idx)
            .ok_or(CoreError::UnknownProvince(idx))?;
        for region in &mut province.regions {
            region.add_buildings(ctx, &catalog.buildings, solver)?;
        }
        self.state = ProblemState::BuildingsAdded;
        Ok(())
    }

    /// Runs the policy filters, then commits the surviving variable set to
    /// the backend. After this the variable set is final.
    pub fn apply_filters(&mut self, idx: usize, policy: &FilterPolicy) -> Result<(), CoreError> {
        self.require(ProblemState::BuildingsAdded, "apply_filters")?;
        let province = self.province_mut(idx)?;
        for region in &mut province.regions {
            if let Some(level) = policy.city_level {
                region.filter_city_level(level);
            }
            if let Some(level) = policy.building_level {
                region.filter_building_level(level);
            }
            if policy.drop_military {
                region.filter_military();
            }
        }
        self.solver.commit_variables()?;
        self.state = ProblemState::FiltersAdded;
        Ok(())
    }

    /// Generates the regional constraints and the province-wide food,
    /// public-order and (optionally) sanitation constraints.
    ///
    /// Sanitation is a flag because the Rome II driver does not model it.
    pub fn add_constraints(
        &mut self,
        ctx: &GameContext,
        idx: usize,
        with_sanitation: bool,
    ) -> Result<(), CoreError> {
        self.require(ProblemState::FiltersAdded, "add_constraints")?;
        let solver = self.solver.as_mut();
        let province = self
            .provinces
            .get(idx)
            .ok_or(CoreError::UnknownProvince(idx))?;
        for region in &province.regions {
            region.add_constraints(ctx, solver)?;
        }
        if with_sanitation {
            province.add_sanitation_constraints(ctx, solver)?;
        }
        province.add_food_constraint(ctx, solver)?;
        province.add_public_order_constraint(ctx, solver)?;
        self.state = ProblemState::ConstraintsAdded;
        Ok(())
    }

    /// Maximize Σ gdp(b) · var(b) over the province's candidates. After
    /// this, the candidate set must not change.
    pub fn add_objective(&mut self, ctx: &GameContext, idx: usize) -> Result<(), CoreError> {
        self.require(ProblemState::ConstraintsAdded, "add_objective")?;
        let province = self
            .provinces
            .get(idx)
            .ok_or(CoreError::UnknownProvince(idx))?;
        let mut terms = Vec::new();
        for building in province.buildings() {
            let var = building
                .variable
                .ok_or_else(|| CoreError::UnboundVariable(building.name().to_string()))?;
            terms.push((var, building.gdp(ctx)));
        }
        self.solver.set_objective(&terms, Direction::Maximize)?;
        self.state = ProblemState::ObjectiveAdded;
        Ok(())
    }

    /// Invokes the backend. Any terminal status is returned, including
    /// infeasible and not-solved; the caller decides whether that aborts
    /// the campaign.
    pub fn solve(&mut self, opts: &SolveOptions) -> Result<SolveStatus, CoreError> {
        self.require(ProblemState::ObjectiveAdded, "solve")?;
        let start = Instant::now();
        let status = self.solver.solve(opts)?;
        self.global_time += start.elapsed();
        self.last_status = Some(status);
        self.state = ProblemState::Solved;
        if !status.has_solution() {
            log::warn!("solve finished without a usable solution: {status}");
        }
        Ok(status)
    }

    /// Objective value of the solved province. Fails with the backend's
    /// status when the solve did not produce a solution.
    pub fn objective_value(&self) -> Result<f64, CoreError> {
        self.require(ProblemState::Solved, "objective_value")?;
        let status = self.last_status.unwrap_or(SolveStatus::NotSolved);
        if !status.has_solution() {
            return Err(CoreError::SolverFailure { status });
        }
        Ok(self.solver.objective_value()?)
    }

    /// Selected `(region_print_name, building_print_name)` pairs of one
    /// solved province.
    pub fn answers(
        &self,
        catalog: &Catalog,
        idx: usize,
    ) -> Result<Vec<(String, String)>, CoreError> {
        self.require(ProblemState::Solved, "answers")?;
        let province = self.province(idx)?;
        let mut selected = Vec::new();
        for region in &province.regions {
            for building in &region.buildings {
                let var = building
                    .variable
                    .ok_or_else(|| CoreError::UnboundVariable(building.name().to_string()))?;
                if self.solver.variable_value(var)? < 0.5 {
                    continue;
                }
                let entry = extract_entry(building.name(), EntryKind::Building)?;
                let building_print = catalog
                    .building_print_names
                    .get(&entry)
                    .cloned()
                    .unwrap_or(entry);
                let region_print = catalog
                    .region_print_names
                    .get(region.name())
                    .cloned()
                    .unwrap_or_else(|| region.print_name().to_string());
                selected.push((region_print, building_print));
            }
        }
        Ok(selected)
    }

    /// The `(status, objective, answers)` triple of the solved province.
    /// Provinces without a usable solution report objective 0 and no
    /// answers rather than an error.
    pub fn report(&self, catalog: &Catalog, idx: usize) -> Result<ProvinceReport, CoreError> {
        self.require(ProblemState::Solved, "report")?;
        let province = self.province(idx)?;
        let status = self.last_status.unwrap_or(SolveStatus::NotSolved);
        let (objective, answers) = if status.has_solution() {
            (self.solver.objective_value()?, self.answers(catalog, idx)?)
        } else {
            (0.0, Vec::new())
        };
        Ok(ProvinceReport {
            province: province.print_name().to_string(),
            status,
            objective,
            answers,
        })
    }

    /// Releases the province's candidate buildings.
    pub fn clean(&mut self, idx: usize) -> Result<(), CoreError> {
        self.province_mut(idx)?.clean();
        Ok(())
    }
}
