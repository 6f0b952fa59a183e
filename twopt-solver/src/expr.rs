//! Model-building vocabulary shared by every backend.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::SolverError;

/// Opaque handle to a decision variable.
///
/// Handles are only meaningful for the model that created them; after a
/// model is discarded they are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Kind of decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// x ∈ {0, 1}
    Binary,
    /// x ∈ [0, ∞)
    Continuous,
}

/// Name and kind of a declared variable, queryable after the solve.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub name: String,
    pub kind: VarKind,
}

/// Constraint comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Outcome of a solve, in the COIN vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    NotSolved,
    Abnormal,
}

impl SolveStatus {
    /// Whether a variable assignment can be read back.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not solved",
            SolveStatus::Abnormal => "abnormal",
        };
        f.write_str(s)
    }
}

/// Options forwarded to the backend solve call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    pub verbose: bool,
    pub time_limit: Option<std::time::Duration>,
}

/// A linear expression `Σ coeff · var + constant`.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coeff · var` to the expression.
    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        self.terms.push((var, coeff));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coeff: f64) -> Self {
        self.add_term(var, coeff);
        self
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Folds repeated variables into a single coefficient each. Backends
    /// consume this form so that repeated `add_term` calls accumulate
    /// instead of overwriting.
    pub fn merged_terms(&self) -> Vec<(VarId, f64)> {
        use std::collections::hash_map::Entry;

        let mut out: Vec<(VarId, f64)> = Vec::new();
        let mut index: FxHashMap<VarId, usize> = FxHashMap::default();
        for &(var, coeff) in &self.terms {
            match index.entry(var) {
                Entry::Vacant(e) => {
                    e.insert(out.len());
                    out.push((var, coeff));
                }
                Entry::Occupied(e) => {
                    out[*e.get()].1 += coeff;
                }
            }
        }
        out
    }

    /// Sums `coeff · var` pairs into an expression.
    pub fn weighted_sum(pairs: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        let mut expr = Self::new();
        for (var, coeff) in pairs {
            expr.add_term(var, coeff);
        }
        expr
    }
}

/// Variable/constraint name bookkeeping shared by the backends: duplicate
/// names are rejected here so both backends fail identically.
#[derive(Debug, Default)]
pub(crate) struct NameIndex {
    vars: Vec<VariableInfo>,
    labels: FxHashSet<String>,
}

impl NameIndex {
    pub(crate) fn add_var(&mut self, name: &str, kind: VarKind) -> Result<VarId, SolverError> {
        if self.vars.iter().any(|v| v.name == name) {
            return Err(SolverError::DuplicateVariable(name.to_string()));
        }
        self.vars.push(VariableInfo {
            name: name.to_string(),
            kind,
        });
        Ok(VarId(self.vars.len() - 1))
    }

    pub(crate) fn add_label(&mut self, label: &str) -> Result<(), SolverError> {
        if !self.labels.insert(label.to_string()) {
            return Err(SolverError::DuplicateConstraintName(label.to_string()));
        }
        Ok(())
    }

    pub(crate) fn get(&self, var: VarId) -> Result<&VariableInfo, SolverError> {
        self.vars
            .get(var.index())
            .ok_or(SolverError::UnknownVariable(var))
    }

    pub(crate) fn vars(&self) -> &[VariableInfo] {
        &self.vars
    }

    pub(crate) fn len(&self) -> usize {
        self.vars.len()
    }
}
