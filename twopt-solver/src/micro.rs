//! Pure-Rust backend over `microlp`.
//!
//! `microlp` wants every variable's objective coefficient at creation time,
//! so this backend records the whole model symbolically and only builds the
//! `microlp::Problem` inside `solve`. That makes it the reference
//! implementation of the two-phase contract: constraints may only reference
//! variables that went through `commit_variables`.

use microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::error::SolverError;
use crate::expr::{
    Direction, LinExpr, NameIndex, Relation, SolveOptions, SolveStatus, VarId, VarKind,
    VariableInfo,
};
use crate::LpBackend;

struct StoredConstraint {
    terms: Vec<(VarId, f64)>,
    rel: Relation,
    rhs: f64,
}

pub struct MicroBackend {
    index: NameIndex,
    /// Variables with index below this are committed and usable.
    committed: usize,
    constraints: Vec<StoredConstraint>,
    objective: Vec<(VarId, f64)>,
    direction: Direction,
    solution: Option<(f64, Vec<f64>)>,
}

impl MicroBackend {
    pub fn new() -> Self {
        Self {
            index: NameIndex::default(),
            committed: 0,
            constraints: Vec::new(),
            objective: Vec::new(),
            direction: Direction::Maximize,
            solution: None,
        }
    }

    fn check_committed(&self, var: VarId) -> Result<(), SolverError> {
        let info = self.index.get(var)?;
        if var.index() >= self.committed {
            return Err(SolverError::UnboundVariable(info.name.clone()));
        }
        Ok(())
    }
}

impl Default for MicroBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LpBackend for MicroBackend {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn add_variable(&mut self, name: &str, kind: VarKind) -> Result<VarId, SolverError> {
        self.index.add_var(name, kind)
    }

    fn commit_variables(&mut self) -> Result<(), SolverError> {
        self.committed = self.index.len();
        Ok(())
    }

    fn add_constraint(
        &mut self,
        label: &str,
        lhs: LinExpr,
        rel: Relation,
        rhs: f64,
    ) -> Result<(), SolverError> {
        self.index.add_label(label)?;
        let terms = lhs.merged_terms();
        for &(var, _) in &terms {
            self.check_committed(var)?;
        }
        self.constraints.push(StoredConstraint {
            terms,
            rel,
            rhs: rhs - lhs.constant(),
        });
        Ok(())
    }

    fn set_objective(
        &mut self,
        terms: &[(VarId, f64)],
        direction: Direction,
    ) -> Result<(), SolverError> {
        for &(var, _) in terms {
            self.check_committed(var)?;
        }
        self.objective = terms.to_vec();
        self.direction = direction;
        Ok(())
    }

    fn solve(&mut self, opts: &SolveOptions) -> Result<SolveStatus, SolverError> {
        if opts.verbose || opts.time_limit.is_some() {
            log::debug!("microlp backend ignores verbose/time-limit options");
        }
        self.solution = None;

        let direction = match self.direction {
            Direction::Maximize => OptimizationDirection::Maximize,
            Direction::Minimize => OptimizationDirection::Minimize,
        };
        let mut problem = Problem::new(direction);

        let mut obj_coeffs = vec![0.0; self.committed];
        for &(var, coeff) in &self.objective {
            obj_coeffs[var.index()] += coeff;
        }
        let vars: Vec<microlp::Variable> = self
            .index
            .vars()
            .iter()
            .take(self.committed)
            .enumerate()
            .map(|(i, info)| match info.kind {
                VarKind::Binary => problem.add_integer_var(obj_coeffs[i], (0, 1)),
                VarKind::Continuous => problem.add_var(obj_coeffs[i], (0.0, f64::INFINITY)),
            })
            .collect();

        for constraint in &self.constraints {
            // A constraint over zero variables is `0 rel rhs`: either
            // trivially true (skip it) or proof of infeasibility.
            if constraint.terms.is_empty() {
                let satisfied = match constraint.rel {
                    Relation::Le => 0.0 <= constraint.rhs + 1e-9,
                    Relation::Ge => 0.0 >= constraint.rhs - 1e-9,
                    Relation::Eq => constraint.rhs.abs() <= 1e-9,
                };
                if !satisfied {
                    log::debug!("empty constraint is violated, model is infeasible");
                    return Ok(SolveStatus::Infeasible);
                }
                continue;
            }
            let expr: Vec<(microlp::Variable, f64)> = constraint
                .terms
                .iter()
                .map(|&(var, coeff)| (vars[var.index()], coeff))
                .collect();
            let op = match constraint.rel {
                Relation::Le => ComparisonOp::Le,
                Relation::Ge => ComparisonOp::Ge,
                Relation::Eq => ComparisonOp::Eq,
            };
            problem.add_constraint(expr.as_slice(), op, constraint.rhs);
        }

        let status = match problem.solve() {
            Ok(solution) => {
                let values = vars.iter().map(|&v| solution[v]).collect();
                self.solution = Some((solution.objective(), values));
                SolveStatus::Optimal
            }
            Err(microlp::Error::Infeasible) => SolveStatus::Infeasible,
            Err(microlp::Error::Unbounded) => SolveStatus::Unbounded,
            Err(e) => {
                log::warn!("microlp solve failed: {e}");
                SolveStatus::Abnormal
            }
        };
        log::debug!("microlp solve: {} vars, status {status}", self.committed);
        Ok(status)
    }

    fn objective_value(&self) -> Result<f64, SolverError> {
        self.solution
            .as_ref()
            .map(|(objective, _)| *objective)
            .ok_or(SolverError::NotSolved)
    }

    fn variable_value(&self, var: VarId) -> Result<f64, SolverError> {
        self.index.get(var)?;
        let (_, values) = self.solution.as_ref().ok_or(SolverError::NotSolved)?;
        values
            .get(var.index())
            .copied()
            .ok_or(SolverError::UnknownVariable(var))
    }

    fn variables(&self) -> &[VariableInfo] {
        self.index.vars()
    }
}
