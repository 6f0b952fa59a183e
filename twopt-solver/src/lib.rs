//! Backend-neutral MILP adapter for the build optimizers.
//!
//! Callers describe a model in three phases: declare variables, commit them,
//! then add named constraints and an objective. The commit step exists
//! because one backend cannot reference a variable in an expression before
//! the underlying model object holds it; the CBC backend commits eagerly and
//! treats the hook as a no-op.
//!
//! | Backend | Crate | Materialization |
//! |---------|-------|-----------------|
//! | [`CbcBackend`] | `coin_cbc` | eager, column per `add_variable` |
//! | [`MicroBackend`] | `microlp` | declarative, model built at `solve` |
//!
//! Both backends reject duplicate variable names and duplicate constraint
//! labels, and both produce the same objective value (within rounding) for
//! the same model.

pub mod cbc;
pub mod error;
pub mod expr;
pub mod micro;

pub use cbc::CbcBackend;
pub use error::SolverError;
pub use expr::{
    Direction, LinExpr, Relation, SolveOptions, SolveStatus, VarId, VarKind, VariableInfo,
};
pub use micro::MicroBackend;

/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// COIN-OR CBC branch-and-cut.
    #[default]
    Cbc,
    /// Pure-Rust simplex + branch-and-bound.
    Micro,
}

impl std::str::FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cbc" => Ok(SolverKind::Cbc),
            "micro" | "microlp" => Ok(SolverKind::Micro),
            other => Err(format!("unknown solver backend {other:?}")),
        }
    }
}

/// A linear model under construction, then its solution.
pub trait LpBackend {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Declares a decision variable. Names must be unique per model.
    fn add_variable(&mut self, name: &str, kind: VarKind) -> Result<VarId, SolverError>;

    /// Makes every declared variable usable in expressions. Backends that
    /// materialize eagerly implement this as a no-op.
    fn commit_variables(&mut self) -> Result<(), SolverError>;

    /// Adds the named constraint `lhs rel rhs`. Labels must be unique per
    /// model.
    fn add_constraint(
        &mut self,
        label: &str,
        lhs: LinExpr,
        rel: Relation,
        rhs: f64,
    ) -> Result<(), SolverError>;

    /// Replaces the objective with `Σ coeff · var`, optimized in `direction`.
    fn set_objective(
        &mut self,
        terms: &[(VarId, f64)],
        direction: Direction,
    ) -> Result<(), SolverError>;

    /// Runs the backend. Returns the status; reading values is only valid
    /// when [`SolveStatus::has_solution`] holds.
    fn solve(&mut self, opts: &SolveOptions) -> Result<SolveStatus, SolverError>;

    fn objective_value(&self) -> Result<f64, SolverError>;

    fn variable_value(&self, var: VarId) -> Result<f64, SolverError>;

    /// Every declared variable, in declaration order (`VarId` order).
    fn variables(&self) -> &[VariableInfo];
}

/// Constructs a fresh backend of the requested kind.
pub fn backend(kind: SolverKind) -> Box<dyn LpBackend> {
    match kind {
        SolverKind::Cbc => Box::new(CbcBackend::new()),
        SolverKind::Micro => Box::new(MicroBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small knapsack-shaped model both backends must agree on:
    /// maximize 5a + 4b + 3c subject to a + b + c <= 2, binaries.
    fn build_and_solve(kind: SolverKind) -> (SolveStatus, f64, Vec<f64>) {
        let mut solver = backend(kind);
        let a = solver.add_variable("a", VarKind::Binary).unwrap();
        let b = solver.add_variable("b", VarKind::Binary).unwrap();
        let c = solver.add_variable("c", VarKind::Binary).unwrap();
        solver.commit_variables().unwrap();

        let count = LinExpr::new()
            .with_term(a, 1.0)
            .with_term(b, 1.0)
            .with_term(c, 1.0);
        solver
            .add_constraint("pick_two", count, Relation::Le, 2.0)
            .unwrap();
        solver
            .set_objective(&[(a, 5.0), (b, 4.0), (c, 3.0)], Direction::Maximize)
            .unwrap();

        let status = solver.solve(&SolveOptions::default()).unwrap();
        let values = [a, b, c]
            .iter()
            .map(|&v| solver.variable_value(v).unwrap())
            .collect();
        (status, solver.objective_value().unwrap(), values)
    }

    #[test]
    fn test_backends_agree_on_objective() {
        let (cbc_status, cbc_obj, cbc_values) = build_and_solve(SolverKind::Cbc);
        let (micro_status, micro_obj, micro_values) = build_and_solve(SolverKind::Micro);

        assert_eq!(cbc_status, SolveStatus::Optimal);
        assert_eq!(micro_status, SolveStatus::Optimal);
        assert!((cbc_obj - 9.0).abs() < 1e-6);
        assert!((micro_obj - 9.0).abs() < 1e-6);
        for (x, y) in cbc_values.iter().zip(&micro_values) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_infeasible_model_reports_status() {
        for kind in [SolverKind::Cbc, SolverKind::Micro] {
            let mut solver = backend(kind);
            let x = solver.add_variable("x", VarKind::Binary).unwrap();
            solver.commit_variables().unwrap();
            solver
                .add_constraint(
                    "impossible",
                    LinExpr::new().with_term(x, 1.0),
                    Relation::Ge,
                    2.0,
                )
                .unwrap();
            solver.set_objective(&[(x, 1.0)], Direction::Maximize).unwrap();
            let status = solver.solve(&SolveOptions::default()).unwrap();
            assert_eq!(status, SolveStatus::Infeasible, "backend {kind:?}");
        }
    }

    #[test]
    fn test_solver_kind_parses() {
        assert_eq!("cbc".parse::<SolverKind>().unwrap(), SolverKind::Cbc);
        assert_eq!("microlp".parse::<SolverKind>().unwrap(), SolverKind::Micro);
        assert!("glpk".parse::<SolverKind>().is_err());
    }
}
