//! The one file allowed to know about the concrete constraint solver. Every
//! other module talks to `SolverBackend`, never to `selen` directly — per
//! spec §4.6, the contract is a trait, and only the adapter below implements
//! it against a real library.

use std::collections::HashMap;

use selen::prelude::*;

#[cfg(test)]
use mockall::automock;

/// Opaque handle to a decision variable inside a backend model. Carries no
/// meaning outside the backend that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

/// A linear term, `coefficient * variable`.
pub type Term = (i64, VarId);

/// The constraint-solver contract of spec §4.6: variable creation, linear
/// (in)equalities, cardinality/implication helpers, min/max, objective
/// minimization, and a bounded-time solve.
#[cfg_attr(test, automock)]
pub trait SolverBackend {
    fn new_bool_var(&mut self) -> VarId;
    fn new_int_var(&mut self, min: i64, max: i64) -> VarId;

    /// `not_a` such that exactly one of `a`, `not_a` is true.
    fn negate(&mut self, a: VarId) -> VarId;

    fn add_linear_eq(&mut self, terms: &[Term], constant: i64);
    fn add_linear_le(&mut self, terms: &[Term], constant: i64);
    fn add_linear_ge(&mut self, terms: &[Term], constant: i64);

    fn add_exactly_one(&mut self, vars: &[VarId]);
    fn add_at_most_one(&mut self, vars: &[VarId]);

    /// `(a1 ∧ a2 ∧ ... ) ⇒ consequent`. H7's three-clause encoding posts this
    /// twice with a two-element antecedent list, per the Design Note against
    /// library-specific reification shortcuts — the conjunction is expressed
    /// directly as a clause, not materialized through a separate `and` var.
    fn add_implication(&mut self, antecedents: &[VarId], consequent: VarId);

    /// A fresh variable equal to the max/min of `vars` (non-empty).
    fn max_of(&mut self, vars: &[VarId]) -> VarId;
    fn min_of(&mut self, vars: &[VarId]) -> VarId;

    fn set_objective_minimize(&mut self, terms: &[Term]);

    /// Solves with a wall-clock budget and worker-count hint, returning the
    /// collapsed status. `value()` is only meaningful after `Optimal` or
    /// `Feasible`.
    fn solve(&mut self, time_limit_secs: u64, num_search_workers: u32) -> SolveStatus;

    fn value(&self, var: VarId) -> i64;
}

/// Adapter over the `selen` constraint solver.
///
/// `Model::solve`/`minimize` consume the model by value, so the native
/// model lives behind an `Option` that `solve()` takes exactly once; every
/// variable- and constraint-posting call up to that point borrows it
/// mutably. The wall-clock budget is applied at `solve()` time via
/// `Model::with_config` (a builder method selen allows to run any time
/// before the model is consumed) — `selen` has no worker-pool concept, so
/// `num_search_workers` is accepted for contract fidelity with spec §4.5 but
/// has nothing to bind to on this single-threaded backend (see DESIGN.md).
/// Because `minimize`/`solve` only return once the search is exhausted or
/// erroring out — there is no partial/"feasible but unproven" return in this
/// API — every `Ok` here is reported as `Optimal`.
pub struct SelenBackend {
    model: Option<Model>,
    vars: Vec<(selen::variables::VarId, i64)>,
    objective: Vec<Term>,
    solution: Option<Solution>,
}

impl Default for SelenBackend {
    fn default() -> Self {
        Self {
            model: Some(Model::default()),
            vars: Vec::new(),
            objective: Vec::new(),
            solution: None,
        }
    }
}

impl SelenBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn model_mut(&mut self) -> &mut Model {
        self.model.as_mut().expect("backend used after solve()")
    }

    fn native(&self, var: VarId) -> selen::variables::VarId {
        self.vars[var.0].0
    }

    fn natives(&self, vars: &[VarId]) -> Vec<selen::variables::VarId> {
        vars.iter().map(|v| self.native(*v)).collect()
    }

    fn push_var(&mut self, native: selen::variables::VarId, upper_bound: i64) -> VarId {
        self.vars.push((native, upper_bound));
        VarId(self.vars.len() - 1)
    }

    fn term_natives(&self, terms: &[Term]) -> (Vec<i32>, Vec<selen::variables::VarId>) {
        let coeffs = terms.iter().map(|(c, _)| *c as i32).collect();
        let vars = terms.iter().map(|(_, v)| self.native(*v)).collect();
        (coeffs, vars)
    }
}

impl SolverBackend for SelenBackend {
    fn new_bool_var(&mut self) -> VarId {
        let native = self.model_mut().bool();
        self.push_var(native, 1)
    }

    fn new_int_var(&mut self, min: i64, max: i64) -> VarId {
        let native = self.model_mut().int(min as i32, max as i32);
        self.push_var(native, max)
    }

    fn negate(&mut self, a: VarId) -> VarId {
        let native_a = self.native(a);
        let native = self.model_mut().bool_not(native_a);
        self.push_var(native, 1)
    }

    fn add_linear_eq(&mut self, terms: &[Term], constant: i64) {
        let (coeffs, vars) = self.term_natives(terms);
        self.model_mut().int_lin_eq(&coeffs, &vars, constant as i32);
    }

    fn add_linear_le(&mut self, terms: &[Term], constant: i64) {
        let (coeffs, vars) = self.term_natives(terms);
        self.model_mut().int_lin_le(&coeffs, &vars, constant as i32);
    }

    fn add_linear_ge(&mut self, terms: &[Term], constant: i64) {
        let negated: Vec<Term> = terms.iter().map(|(c, v)| (-c, *v)).collect();
        self.add_linear_le(&negated, -constant);
    }

    fn add_exactly_one(&mut self, vars: &[VarId]) {
        let terms: Vec<Term> = vars.iter().map(|v| (1, *v)).collect();
        self.add_linear_eq(&terms, 1);
    }

    fn add_at_most_one(&mut self, vars: &[VarId]) {
        let terms: Vec<Term> = vars.iter().map(|v| (1, *v)).collect();
        self.add_linear_le(&terms, 1);
    }

    fn add_implication(&mut self, antecedents: &[VarId], consequent: VarId) {
        let neg = self.natives(antecedents);
        let pos = [self.native(consequent)];
        self.model_mut().bool_clause(&pos, &neg);
    }

    fn max_of(&mut self, vars: &[VarId]) -> VarId {
        let bound = vars.iter().map(|v| self.vars[v.0].1).max().unwrap_or(0);
        let native = self.natives(vars);
        let result = self
            .model_mut()
            .max(&native)
            .expect("max_of requires a non-empty variable list");
        self.push_var(result, bound)
    }

    fn min_of(&mut self, vars: &[VarId]) -> VarId {
        let bound = vars.iter().map(|v| self.vars[v.0].1).max().unwrap_or(0);
        let native = self.natives(vars);
        let result = self
            .model_mut()
            .min(&native)
            .expect("min_of requires a non-empty variable list");
        self.push_var(result, bound)
    }

    fn set_objective_minimize(&mut self, terms: &[Term]) {
        self.objective = terms.to_vec();
    }

    fn solve(&mut self, time_limit_secs: u64, _num_search_workers: u32) -> SolveStatus {
        let config = SolverConfig::default()
            .with_timeout_ms(time_limit_secs.saturating_mul(1000));
        let model = self
            .model
            .take()
            .expect("solve() called twice")
            .with_config(config);

        let result = if self.objective.is_empty() {
            model.solve()
        } else {
            let mut model = model;
            let upper: i64 = self
                .objective
                .iter()
                .map(|(c, v)| c.unsigned_abs() as i64 * self.vars[v.0].1)
                .sum();
            let obj_var = model.int(0, upper.max(1) as i32);
            let mut coeffs: Vec<i32> = self.objective.iter().map(|(c, _)| *c as i32).collect();
            let mut native_vars: Vec<selen::variables::VarId> = self
                .objective
                .iter()
                .map(|(_, v)| self.vars[v.0].0)
                .collect();
            coeffs.push(-1);
            native_vars.push(obj_var);
            model.int_lin_eq(&coeffs, &native_vars, 0);
            model.minimize(obj_var)
        };

        match result {
            Ok(solution) => {
                self.solution = Some(solution);
                SolveStatus::Optimal
            }
            Err(SolverError::NoSolution { .. }) => SolveStatus::Infeasible,
            Err(SolverError::Timeout { .. }) => SolveStatus::Unknown,
            Err(_) => SolveStatus::Unknown,
        }
    }

    fn value(&self, var: VarId) -> i64 {
        let native = self.native(var);
        self.solution
            .as_ref()
            .expect("value() called before a successful solve()")
            .get_int(native) as i64
    }
}

/// In-process stand-in used before a real backend is wired in, and by tests
/// that only care about variable bookkeeping rather than solving.
#[derive(Default)]
pub struct NullBackend {
    next: usize,
    values: HashMap<usize, i64>,
}

impl SolverBackend for NullBackend {
    fn new_bool_var(&mut self) -> VarId {
        let id = self.next;
        self.next += 1;
        VarId(id)
    }

    fn new_int_var(&mut self, _min: i64, _max: i64) -> VarId {
        self.new_bool_var()
    }

    fn negate(&mut self, _a: VarId) -> VarId {
        self.new_bool_var()
    }

    fn add_linear_eq(&mut self, _terms: &[Term], _constant: i64) {}
    fn add_linear_le(&mut self, _terms: &[Term], _constant: i64) {}
    fn add_linear_ge(&mut self, _terms: &[Term], _constant: i64) {}
    fn add_exactly_one(&mut self, _vars: &[VarId]) {}
    fn add_at_most_one(&mut self, _vars: &[VarId]) {}
    fn add_implication(&mut self, _antecedents: &[VarId], _consequent: VarId) {}

    fn max_of(&mut self, _vars: &[VarId]) -> VarId {
        self.new_bool_var()
    }

    fn min_of(&mut self, _vars: &[VarId]) -> VarId {
        self.new_bool_var()
    }

    fn set_objective_minimize(&mut self, _terms: &[Term]) {}

    fn solve(&mut self, _time_limit_secs: u64, _num_search_workers: u32) -> SolveStatus {
        SolveStatus::Unknown
    }

    fn value(&self, var: VarId) -> i64 {
        *self.values.get(&var.0).unwrap_or(&0)
    }
}
