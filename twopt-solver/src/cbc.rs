//! COIN-OR CBC backend. Columns are created eagerly, so the commit hook is
//! a no-op.

use coin_cbc::{Col, Model, Sense, Solution};

use crate::error::SolverError;
use crate::expr::{
    Direction, LinExpr, NameIndex, Relation, SolveOptions, SolveStatus, VarId, VarKind,
    VariableInfo,
};
use crate::LpBackend;

pub struct CbcBackend {
    model: Model,
    cols: Vec<Col>,
    index: NameIndex,
    /// Variables with a nonzero coefficient in the current objective, so a
    /// second `set_objective` can clear them first.
    objective_vars: Vec<VarId>,
    solution: Option<(SolveStatus, Solution)>,
}

impl CbcBackend {
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            cols: Vec::new(),
            index: NameIndex::default(),
            objective_vars: Vec::new(),
            solution: None,
        }
    }

    fn col(&self, var: VarId) -> Result<Col, SolverError> {
        self.index.get(var)?;
        Ok(self.cols[var.index()])
    }
}

impl Default for CbcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LpBackend for CbcBackend {
    fn name(&self) -> &'static str {
        "cbc"
    }

    fn add_variable(&mut self, name: &str, kind: VarKind) -> Result<VarId, SolverError> {
        let id = self.index.add_var(name, kind)?;
        let col = match kind {
            VarKind::Binary => self.model.add_binary(),
            VarKind::Continuous => {
                let col = self.model.add_col();
                self.model.set_col_lower(col, 0.0);
                col
            }
        };
        self.cols.push(col);
        Ok(id)
    }

    fn commit_variables(&mut self) -> Result<(), SolverError> {
        // Columns already exist.
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
        let bound = rhs - lhs.constant();
        let row = self.model.add_row();
        match rel {
            Relation::Le => self.model.set_row_upper(row, bound),
            Relation::Ge => self.model.set_row_lower(row, bound),
            Relation::Eq => {
                self.model.set_row_lower(row, bound);
                self.model.set_row_upper(row, bound);
            }
        }
        for (var, coeff) in lhs.merged_terms() {
            let col = self.col(var)?;
            self.model.set_weight(row, col, coeff);
        }
        Ok(())
    }

    fn set_objective(
        &mut self,
        terms: &[(VarId, f64)],
        direction: Direction,
    ) -> Result<(), SolverError> {
        for var in self.objective_vars.drain(..) {
            let col = self.cols[var.index()];
            self.model.set_obj_coeff(col, 0.0);
        }
        for &(var, coeff) in terms {
            let col = self.col(var)?;
            self.model.set_obj_coeff(col, coeff);
            self.objective_vars.push(var);
        }
        self.model.set_obj_sense(match direction {
            Direction::Maximize => Sense::Maximize,
            Direction::Minimize => Sense::Minimize,
        });
        Ok(())
    }

    fn solve(&mut self, opts: &SolveOptions) -> Result<SolveStatus, SolverError> {
        self.model
            .set_parameter("logLevel", if opts.verbose { "1" } else { "0" });
        if let Some(limit) = opts.time_limit {
            self.model
                .set_parameter("seconds", &limit.as_secs_f64().to_string());
        }

        let solution = self.model.solve();
        let status = {
            let raw = solution.raw();
            if raw.is_proven_optimal() {
                SolveStatus::Optimal
            } else if raw.is_proven_infeasible() {
                SolveStatus::Infeasible
            } else if raw.is_continuous_unbounded() {
                SolveStatus::Unbounded
            } else if raw.is_abandoned() {
                SolveStatus::Abnormal
            } else {
                SolveStatus::NotSolved
            }
        };
        log::debug!(
            "cbc solve: {} vars, status {status}",
            self.index.len()
        );
        self.solution = Some((status, solution));
        Ok(status)
    }

    fn objective_value(&self) -> Result<f64, SolverError> {
        let (status, solution) = self.solution.as_ref().ok_or(SolverError::NotSolved)?;
        if !status.has_solution() {
            return Err(SolverError::NotSolved);
        }
        Ok(solution.raw().obj_value())
    }

    fn variable_value(&self, var: VarId) -> Result<f64, SolverError> {
        let col = self.col(var)?;
        let (status, solution) = self.solution.as_ref().ok_or(SolverError::NotSolved)?;
        if !status.has_solution() {
            return Err(SolverError::NotSolved);
        }
        Ok(solution.col(col))
    }

    fn variables(&self) -> &[VariableInfo] {
        self.index.vars()
    }
}
