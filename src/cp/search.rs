//! Propagation and depth-first search behind [`BacktrackingSolver`](super::BacktrackingSolver).

use super::config::SolverConfig;
use super::model::{Constraint, CpModel, Objective, Relation, ValueSelection, VariableSelection};
use super::solver::{Assignment, SearchStats, SolutionVisitor, SolverStatus};
use super::variables::{IntVar, Literal};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Marker for a dead end.
struct Conflict;

type Propagation = Result<(), Conflict>;

/// A literal resolved to "variable `var` equals `value`".
#[derive(Clone, Copy)]
struct Lit {
    var: usize,
    value: i64,
}

impl From<&Literal> for Lit {
    fn from(l: &Literal) -> Self {
        Lit {
            var: l.var.index(),
            value: l.true_value(),
        }
    }
}

/// Normalised constraint body.
enum Prop {
    Linear {
        terms: Vec<(i64, usize)>,
        relation: Relation,
        rhs: i128,
    },
    Or(Vec<Lit>),
    ExactlyOne(Vec<Lit>),
    AtMostOne(Vec<Lit>),
    Modulo {
        target: usize,
        var: usize,
        modulus: i64,
    },
}

struct Entry {
    prop: Prop,
    enforcement: Vec<Lit>,
}

impl Entry {
    fn watched_vars(&self) -> Vec<usize> {
        let mut vars: Vec<usize> = self.enforcement.iter().map(|l| l.var).collect();
        match &self.prop {
            Prop::Linear { terms, .. } => vars.extend(terms.iter().map(|&(_, v)| v)),
            Prop::Or(lits) | Prop::ExactlyOne(lits) | Prop::AtMostOne(lits) => {
                vars.extend(lits.iter().map(|l| l.var))
            }
            Prop::Modulo { target, var, .. } => vars.extend([*target, *var]),
        }
        vars.sort_unstable();
        vars.dedup();
        vars
    }
}

/// Merges repeated variables and drops zero coefficients.
fn normalize_terms(terms: &[(i64, IntVar)]) -> Vec<(i64, usize)> {
    let mut merged: Vec<(i64, usize)> = terms.iter().map(|&(c, v)| (c, v.index())).collect();
    merged.sort_unstable_by_key(|&(_, v)| v);
    let mut out: Vec<(i64, usize)> = Vec::with_capacity(merged.len());
    for (c, v) in merged {
        match out.last_mut() {
            Some(last) if last.1 == v => last.0 += c,
            _ => out.push((c, v)),
        }
    }
    out.retain(|&(c, _)| c != 0);
    out
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    -floor_div(-a, b)
}

fn clamp_i64(x: i128) -> i64 {
    x.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Interval domains with an undo trail.
struct Domains {
    lo: Vec<i64>,
    hi: Vec<i64>,
    trail: Vec<(usize, i64, i64)>,
    touched: Vec<usize>,
}

impl Domains {
    fn is_fixed(&self, v: usize) -> bool {
        self.lo[v] == self.hi[v]
    }

    fn size(&self, v: usize) -> i64 {
        self.hi[v] - self.lo[v]
    }

    fn set_lo(&mut self, v: usize, x: i64) -> Propagation {
        if x <= self.lo[v] {
            return Ok(());
        }
        if x > self.hi[v] {
            return Err(Conflict);
        }
        self.trail.push((v, self.lo[v], self.hi[v]));
        self.lo[v] = x;
        self.touched.push(v);
        Ok(())
    }

    fn set_hi(&mut self, v: usize, x: i64) -> Propagation {
        if x >= self.hi[v] {
            return Ok(());
        }
        if x < self.lo[v] {
            return Err(Conflict);
        }
        self.trail.push((v, self.lo[v], self.hi[v]));
        self.hi[v] = x;
        self.touched.push(v);
        Ok(())
    }

    fn fix(&mut self, v: usize, x: i64) -> Propagation {
        self.set_lo(v, x)?;
        self.set_hi(v, x)
    }

    fn lit_value(&self, l: Lit) -> Option<bool> {
        if self.is_fixed(l.var) {
            Some(self.lo[l.var] == l.value)
        } else {
            None
        }
    }

    fn set_lit(&mut self, l: Lit, value: bool) -> Propagation {
        let target = if value { l.value } else { 1 - l.value };
        self.fix(l.var, target)
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((v, lo, hi)) = self.trail.pop() {
                self.lo[v] = lo;
                self.hi[v] = hi;
            }
        }
    }

    fn linear_bounds(&self, terms: &[(i64, usize)]) -> (i128, i128) {
        terms.iter().fold((0i128, 0i128), |(mn, mx), &(c, v)| {
            let a = c as i128 * self.lo[v] as i128;
            let b = c as i128 * self.hi[v] as i128;
            (mn + a.min(b), mx + a.max(b))
        })
    }

    /// `Σ sign·c·x <= rhs`
    fn propagate_le(&mut self, terms: &[(i64, usize)], sign: i64, rhs: i128) -> Propagation {
        let min: i128 = terms
            .iter()
            .map(|&(c, v)| {
                let c = (sign * c) as i128;
                if c > 0 {
                    c * self.lo[v] as i128
                } else {
                    c * self.hi[v] as i128
                }
            })
            .sum();
        if min > rhs {
            return Err(Conflict);
        }
        // Tightening a term never changes `min`: positive terms move their upper
        // bound, negative terms their lower bound.
        for &(c, v) in terms {
            let c = (sign * c) as i128;
            if c > 0 {
                let slack = rhs - (min - c * self.lo[v] as i128);
                self.set_hi(v, clamp_i64(floor_div(slack, c)))?;
            } else {
                let slack = rhs - (min - c * self.hi[v] as i128);
                self.set_lo(v, clamp_i64(ceil_div(-slack, -c)))?;
            }
        }
        Ok(())
    }

    fn propagate_ne(&mut self, terms: &[(i64, usize)], rhs: i128) -> Propagation {
        let mut fixed_sum = 0i128;
        let mut free = None;
        for &(c, v) in terms {
            if self.is_fixed(v) {
                fixed_sum += c as i128 * self.lo[v] as i128;
            } else if free.is_some() {
                return Ok(());
            } else {
                free = Some((c as i128, v));
            }
        }
        match free {
            None if fixed_sum == rhs => Err(Conflict),
            None => Ok(()),
            Some((c, v)) => {
                let rest = rhs - fixed_sum;
                if rest % c != 0 {
                    return Ok(());
                }
                let x = rest / c;
                if x == self.lo[v] as i128 {
                    self.set_lo(v, clamp_i64(x + 1))
                } else if x == self.hi[v] as i128 {
                    self.set_hi(v, clamp_i64(x - 1))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn count(&self, lits: &[Lit]) -> (usize, usize) {
        lits.iter().fold((0, 0), |(t, u), &l| match self.lit_value(l) {
            Some(true) => (t + 1, u),
            Some(false) => (t, u),
            None => (t, u + 1),
        })
    }

    fn propagate(&mut self, prop: &Prop) -> Propagation {
        match prop {
            Prop::Linear {
                terms,
                relation,
                rhs,
            } => match relation {
                Relation::Le => self.propagate_le(terms, 1, *rhs),
                Relation::Ge => self.propagate_le(terms, -1, -*rhs),
                Relation::Eq => {
                    self.propagate_le(terms, 1, *rhs)?;
                    self.propagate_le(terms, -1, -*rhs)
                }
                Relation::Ne => self.propagate_ne(terms, *rhs),
            },
            Prop::Or(lits) => {
                let (trues, unknown) = self.count(lits);
                if trues > 0 {
                    return Ok(());
                }
                match unknown {
                    0 => Err(Conflict),
                    1 => self.set_only_unknown(lits, true),
                    _ => Ok(()),
                }
            }
            Prop::ExactlyOne(lits) | Prop::AtMostOne(lits) => {
                let (trues, unknown) = self.count(lits);
                if trues > 1 {
                    return Err(Conflict);
                }
                if trues == 1 {
                    for &l in lits {
                        if self.lit_value(l).is_none() {
                            self.set_lit(l, false)?;
                        }
                    }
                    return Ok(());
                }
                if matches!(prop, Prop::ExactlyOne(_)) {
                    match unknown {
                        0 => return Err(Conflict),
                        1 => return self.set_only_unknown(lits, true),
                        _ => {}
                    }
                }
                Ok(())
            }
            Prop::Modulo {
                target,
                var,
                modulus,
            } => {
                let (t, x, m) = (*target, *var, *modulus);
                self.set_lo(t, 0)?;
                self.set_hi(t, m - 1)?;
                if self.is_fixed(x) {
                    self.fix(t, self.lo[x].rem_euclid(m))
                } else if self.is_fixed(t) {
                    let r = self.lo[t];
                    let lo = self.lo[x] + (r - self.lo[x]).rem_euclid(m);
                    let hi = self.hi[x] - (self.hi[x] - r).rem_euclid(m);
                    self.set_lo(x, lo)?;
                    self.set_hi(x, hi)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn set_only_unknown(&mut self, lits: &[Lit], value: bool) -> Propagation {
        match lits.iter().find(|&&l| self.lit_value(l).is_none()) {
            Some(&l) => self.set_lit(l, value),
            None => Ok(()),
        }
    }

    /// Whether the body is already false under the current domains.
    fn is_violated(&self, prop: &Prop) -> bool {
        match prop {
            Prop::Linear {
                terms,
                relation,
                rhs,
            } => {
                let (min, max) = self.linear_bounds(terms);
                match relation {
                    Relation::Le => min > *rhs,
                    Relation::Ge => max < *rhs,
                    Relation::Eq => min > *rhs || max < *rhs,
                    Relation::Ne => min == max && min == *rhs,
                }
            }
            Prop::Or(lits) => lits.iter().all(|&l| self.lit_value(l) == Some(false)),
            Prop::ExactlyOne(lits) => {
                let (trues, unknown) = self.count(lits);
                trues > 1 || (trues == 0 && unknown == 0)
            }
            Prop::AtMostOne(lits) => self.count(lits).0 > 1,
            Prop::Modulo {
                target,
                var,
                modulus,
            } => {
                let (t, x) = (*target, *var);
                self.lo[t] > modulus - 1
                    || self.hi[t] < 0
                    || (self.is_fixed(t)
                        && self.is_fixed(x)
                        && self.lo[t] != self.lo[x].rem_euclid(*modulus))
            }
        }
    }

    fn run(&mut self, entry: &Entry) -> Propagation {
        let mut pending = None;
        for &l in &entry.enforcement {
            match self.lit_value(l) {
                Some(false) => return Ok(()),
                Some(true) => {}
                None if pending.is_some() => return Ok(()),
                None => pending = Some(l),
            }
        }
        match pending {
            Some(l) if self.is_violated(&entry.prop) => self.set_lit(l, false),
            Some(_) => Ok(()),
            None => self.propagate(&entry.prop),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Choice {
    Fix(i64),
    AtLeast(i64),
    AtMost(i64),
}

struct Frame {
    var: usize,
    choices: Vec<Choice>,
    next: usize,
    mark: usize,
}

struct Strategy {
    vars: Vec<usize>,
    variable_selection: VariableSelection,
    value_selection: ValueSelection,
}

/// What a finished search hands back to the solver front end.
pub(crate) struct Outcome {
    pub status: SolverStatus,
    pub assignment: Option<Assignment>,
    pub objective_value: Option<i64>,
    pub solutions: usize,
    pub stats: SearchStats,
}

/// One search over one model.
pub(crate) struct Search<'a> {
    config: &'a SolverConfig,
    entries: Vec<Entry>,
    watches: Vec<Vec<usize>>,
    domains: Domains,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    strategies: Vec<Strategy>,
    fallback: Vec<usize>,
    hints: Vec<Option<i64>>,
    objective: Option<(Vec<(i64, usize)>, i64)>,
    maximizing: bool,
    cut: Option<usize>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub(crate) fn new(model: &CpModel, config: &'a SolverConfig) -> Self {
        let n = model.variables.len();
        let entries: Vec<Entry> = model
            .constraints
            .iter()
            .map(|posted| Entry {
                prop: match &posted.constraint {
                    Constraint::Linear {
                        expr,
                        relation,
                        rhs,
                    } => Prop::Linear {
                        terms: normalize_terms(&expr.terms),
                        relation: *relation,
                        rhs: *rhs as i128 - expr.constant as i128,
                    },
                    Constraint::BoolOr { literals } => {
                        Prop::Or(literals.iter().map(Lit::from).collect())
                    }
                    Constraint::ExactlyOne { literals } => {
                        Prop::ExactlyOne(literals.iter().map(Lit::from).collect())
                    }
                    Constraint::AtMostOne { literals } => {
                        Prop::AtMostOne(literals.iter().map(Lit::from).collect())
                    }
                    Constraint::Modulo {
                        target,
                        var,
                        modulus,
                    } => Prop::Modulo {
                        target: target.index(),
                        var: var.index(),
                        modulus: *modulus,
                    },
                },
                enforcement: posted.enforcement.iter().map(Lit::from).collect(),
            })
            .collect();

        let mut watches = vec![Vec::new(); n];
        for (ci, entry) in entries.iter().enumerate() {
            for v in entry.watched_vars() {
                watches[v].push(ci);
            }
        }

        let mut hints = vec![None; n];
        for &(var, value) in &model.hints {
            hints[var.index()] = Some(value);
        }

        let mut fallback: Vec<usize> = (0..n).collect();
        if let Some(seed) = config.seed {
            let mut rng = StdRng::seed_from_u64(seed);
            fallback.shuffle(&mut rng);
        }

        let objective = model.objective.as_ref().map(|o| {
            let e = o.as_minimization();
            (normalize_terms(&e.terms), e.constant)
        });

        let count = entries.len();
        Self {
            config,
            entries,
            watches,
            domains: Domains {
                lo: model.variables.iter().map(|v| v.min).collect(),
                hi: model.variables.iter().map(|v| v.max).collect(),
                trail: Vec::new(),
                touched: Vec::new(),
            },
            queue: (0..count).collect(),
            queued: vec![true; count],
            strategies: model
                .strategies
                .iter()
                .map(|s| Strategy {
                    vars: s.vars.iter().map(|v| v.index()).collect(),
                    variable_selection: s.variable_selection,
                    value_selection: s.value_selection,
                })
                .collect(),
            fallback,
            hints,
            objective,
            maximizing: matches!(model.objective, Some(Objective::Maximize(_))),
            cut: None,
            stats: SearchStats::default(),
        }
    }

    fn enqueue(&mut self, ci: usize) {
        if !self.queued[ci] {
            self.queued[ci] = true;
            self.queue.push_back(ci);
        }
    }

    fn flush_touched(&mut self) {
        for v in self.domains.touched.drain(..) {
            for &ci in &self.watches[v] {
                if !self.queued[ci] {
                    self.queued[ci] = true;
                    self.queue.push_back(ci);
                }
            }
        }
    }

    fn abandon(&mut self) {
        for ci in self.queue.drain(..) {
            self.queued[ci] = false;
        }
        self.domains.touched.clear();
        self.stats.conflicts += 1;
    }

    fn propagate(&mut self) -> Propagation {
        self.flush_touched();
        while let Some(ci) = self.queue.pop_front() {
            self.queued[ci] = false;
            self.stats.propagations += 1;
            if self.domains.run(&self.entries[ci]).is_err() {
                self.abandon();
                return Err(Conflict);
            }
            self.flush_touched();
        }
        Ok(())
    }

    fn try_choice(&mut self, var: usize, choice: Choice) -> bool {
        let applied = match choice {
            Choice::Fix(x) => self.domains.fix(var, x),
            Choice::AtLeast(x) => self.domains.set_lo(var, x),
            Choice::AtMost(x) => self.domains.set_hi(var, x),
        };
        if applied.is_err() {
            self.abandon();
            return false;
        }
        self.propagate().is_ok()
    }

    fn choices(&self, v: usize, selection: ValueSelection) -> Vec<Choice> {
        let (lo, hi) = (self.domains.lo[v], self.domains.hi[v]);
        if let Some(h) = self.hints[v].filter(|h| (lo..=hi).contains(h)) {
            let mut choices = vec![Choice::Fix(h)];
            if h > lo {
                choices.push(Choice::AtMost(h - 1));
            }
            if h < hi {
                choices.push(Choice::AtLeast(h + 1));
            }
            return choices;
        }
        match selection {
            ValueSelection::Min => vec![Choice::Fix(lo), Choice::AtLeast(lo + 1)],
            ValueSelection::Max => vec![Choice::Fix(hi), Choice::AtMost(hi - 1)],
        }
    }

    fn select_branch(&self) -> Option<(usize, Vec<Choice>)> {
        let d = &self.domains;
        for strategy in &self.strategies {
            let mut unfixed = strategy.vars.iter().copied().filter(|&v| !d.is_fixed(v));
            let pick = match strategy.variable_selection {
                VariableSelection::First => unfixed.next(),
                VariableSelection::MinDomain => unfixed.min_by_key(|&v| d.size(v)),
            };
            if let Some(v) = pick {
                return Some((v, self.choices(v, strategy.value_selection)));
            }
        }
        self.fallback
            .iter()
            .copied()
            .filter(|&v| !d.is_fixed(v))
            .min_by_key(|&v| d.size(v))
            .map(|v| (v, self.choices(v, ValueSelection::Min)))
    }

    /// Requires every further solution to improve on `best`.
    fn tighten_objective(&mut self, best: i64) {
        let Some((terms, constant)) = &self.objective else {
            return;
        };
        let rhs = best as i128 - 1 - *constant as i128;
        match self.cut {
            Some(ci) => {
                if let Prop::Linear { rhs: r, .. } = &mut self.entries[ci].prop {
                    *r = rhs;
                }
            }
            None => {
                let entry = Entry {
                    prop: Prop::Linear {
                        terms: terms.clone(),
                        relation: Relation::Le,
                        rhs,
                    },
                    enforcement: Vec::new(),
                };
                let ci = self.entries.len();
                for v in entry.watched_vars() {
                    self.watches[v].push(ci);
                }
                self.entries.push(entry);
                self.queued.push(false);
                self.cut = Some(ci);
            }
        }
    }

    fn objective_value(&self) -> Option<i64> {
        self.objective.as_ref().map(|(terms, constant)| {
            let d = &self.domains;
            terms
                .iter()
                .fold(*constant, |acc, &(c, v)| acc + c * d.lo[v])
        })
    }

    pub(crate) fn run(mut self, visitor: &mut dyn SolutionVisitor) -> Outcome {
        let start = Instant::now();
        let deadline = self
            .config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));
        let has_objective = self.objective.is_some();

        let mut stack: Vec<Frame> = Vec::new();
        let mut best: Option<(Assignment, Option<i64>)> = None;
        let mut found = 0usize;
        let mut capped = false;
        let mut timed_out = false;
        let mut ok = self.propagate().is_ok();

        loop {
            if ok {
                match self.select_branch() {
                    None => {
                        let assignment = Assignment::new(self.domains.lo.clone());
                        let value = self.objective_value();
                        found += 1;
                        visitor.on_solution(&assignment);
                        best = Some((assignment, value));
                        if self.config.solution_cap_reached(found, has_objective) {
                            capped = true;
                            break;
                        }
                        if let Some(v) = value {
                            self.tighten_objective(v);
                        }
                        ok = false;
                    }
                    Some((var, choices)) => {
                        self.stats.nodes += 1;
                        if deadline.is_some_and(|t| Instant::now() >= t) {
                            timed_out = true;
                            break;
                        }
                        if self.config.log_search_progress
                            && self.stats.nodes % self.config.progress_interval == 0
                        {
                            debug!(
                                nodes = self.stats.nodes,
                                conflicts = self.stats.conflicts,
                                solutions = found,
                                depth = stack.len(),
                                elapsed_ms = start.elapsed().as_millis() as u64,
                                "search progress"
                            );
                        }
                        let first = choices[0];
                        stack.push(Frame {
                            var,
                            choices,
                            next: 1,
                            mark: self.domains.trail.len(),
                        });
                        ok = self.try_choice(var, first);
                    }
                }
            } else {
                let mut resumed = false;
                while let Some(frame) = stack.last_mut() {
                    self.domains.undo(frame.mark);
                    if frame.next < frame.choices.len() {
                        let (var, choice) = (frame.var, frame.choices[frame.next]);
                        frame.next += 1;
                        if let Some(ci) = self.cut {
                            self.enqueue(ci);
                        }
                        ok = self.try_choice(var, choice);
                        resumed = true;
                        break;
                    }
                    stack.pop();
                }
                if !resumed {
                    break;
                }
            }
        }

        let status = if timed_out {
            if found > 0 {
                SolverStatus::Feasible
            } else {
                SolverStatus::Unknown
            }
        } else if capped && has_objective {
            SolverStatus::Feasible
        } else if found > 0 {
            SolverStatus::Optimal
        } else {
            SolverStatus::Infeasible
        };

        let (assignment, objective_value) = match best {
            Some((a, v)) => (Some(a), v.map(|v| if self.maximizing { -v } else { v })),
            None => (None, None),
        };

        Outcome {
            status,
            assignment,
            objective_value,
            solutions: found,
            stats: self.stats,
        }
    }
}
