//! Contains the [`Constraint`] trait through which variant rules interact
//! with the board.

use crate::board::Board;
use crate::candidate_index::CandidateIndex;
use crate::cell_index::CellIndex;
use crate::logic_result::LogicResult;
use std::sync::Arc;

/// The result of a constraint's `init` or `finalize` pass.
///
/// Besides reporting whether the board changed, an init pass may ask the
/// board to attach additional constraints (which are initialized in the
/// same fixpoint) and/or to remove this constraint from the active list.
pub struct InitResult {
    pub result: LogicResult,
    pub add_constraints: Vec<Arc<dyn Constraint>>,
    pub delete_self: bool,
}

impl InitResult {
    pub fn unchanged() -> Self {
        LogicResult::None.into()
    }

    pub fn changed() -> Self {
        LogicResult::Changed.into()
    }

    pub fn invalid() -> Self {
        LogicResult::Invalid.into()
    }

    /// Marks this constraint for removal after the pass.
    #[must_use]
    pub fn and_delete_self(mut self) -> Self {
        self.delete_self = true;
        self
    }

    /// Schedules replacement constraints to be attached and initialized.
    #[must_use]
    pub fn with_constraints(mut self, add: Vec<Arc<dyn Constraint>>) -> Self {
        self.add_constraints = add;
        self
    }
}

impl From<LogicResult> for InitResult {
    fn from(result: LogicResult) -> Self {
        Self { result, add_constraints: Vec::new(), delete_self: false }
    }
}

/// One deduction produced by [`Constraint::logical_step`].
///
/// The caller applies deductions in order and stops at the first one that
/// changes the board or proves it invalid.
pub enum Deduction {
    /// These candidates are impossible.
    Eliminations(Vec<CandidateIndex>),
    /// These candidates must be set as givens.
    Singles(Vec<CandidateIndex>),
    /// Attach these constraints (initialized immediately).
    AddConstraints(Vec<Arc<dyn Constraint>>),
    /// The constraint can no longer be satisfied.
    Invalid(String),
}

/// The protocol every variant rule implements. All methods except `name`
/// default to no-ops so that simple rules stay short.
///
/// # Lifecycle
///
/// 1. Construction: parameters are captured and validated; rules with
///    per-solve progress register a state slot with the board.
/// 2. [`Board::add_constraint`] attaches the rule.
/// 3. [`Board::finalize_constraints`] runs every `init` repeatedly until no
///    rule reports a change, then runs a single `finalize` pass.
/// 4. During solving, the board dispatches `enforce` /
///    `enforce_candidate_elim` on every mutation touching the rule's cells,
///    and the driver invokes `logical_step` / `brute_force_step`.
pub trait Constraint {
    /// A generic name for the constraint kind, independent of how it was
    /// initialized.
    fn name(&self) -> &str;

    /// A name for this specific instance, such as "Killer Cage at r1c1".
    fn specific_name(&self) -> String {
        self.name().to_owned()
    }

    /// The cells this constraint watches. Mutations of other cells are not
    /// dispatched to it.
    fn cells(&self) -> &[CellIndex] {
        &[]
    }

    /// Called repeatedly during [`Board::finalize_constraints`] until every
    /// constraint reports no change. May mutate cell masks (via
    /// `keep_cell_mask`, never `set_as_given` directly), add weak links and
    /// regions, attach child constraints, or delete itself.
    ///
    /// The weak-link graph is still under construction while inits run;
    /// implementations must not treat it as final until `finalize`.
    fn init(&self, _board: &mut Board) -> InitResult {
        InitResult::unchanged()
    }

    /// Called once after the init fixpoint. May inspect the finished graph
    /// and write constraint state; must not change cell masks. Reporting a
    /// change from here is a contract violation.
    fn finalize(&self, _board: &mut Board) -> InitResult {
        InitResult::unchanged()
    }

    /// Called when `value` has just been set in `cell`. Returns false iff
    /// the constraint is now violated. Must not mutate cell masks; rules
    /// with counters update their state slot here.
    fn enforce(&self, _board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        true
    }

    /// Called when `value` has just been eliminated from `cell`. Same
    /// contract as [`Constraint::enforce`].
    fn enforce_candidate_elim(&self, _board: &mut Board, _cell: CellIndex, _value: usize) -> bool {
        true
    }

    /// Produces the constraint's next deductions without applying them.
    fn logical_step(&self, _board: &mut Board) -> Vec<Deduction> {
        Vec::new()
    }

    /// Cheap elimination-only propagation applied directly to the board,
    /// used while searching.
    fn brute_force_step(&self, _board: &mut Board) -> LogicResult {
        LogicResult::None
    }
}
