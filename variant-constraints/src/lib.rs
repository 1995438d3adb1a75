//! This library contains the variant Sudoku constraint catalogue along with
//! the [`crate::builder::ConstraintBuilder`] that turns a structured puzzle
//! description into a finalized board.
//!
//! Every rule implements [`variant_solver_lib::constraint::Constraint`].
//! Most reduce to the board's primitives during initialization: weak links,
//! regions, cardinality clauses, fixed/equal sums, or disjunctions of
//! subboards. The few that cannot (skyscrapers, lockout lines) keep their
//! reasoning in `logical_step`.

pub mod arrow_constraint;
pub mod between_line_constraint;
pub mod builder;
pub mod cardinality_constraint;
pub mod chess_constraint;
pub mod clone_constraint;
pub mod double_arrow_constraint;
pub mod equal_sum_constraint;
pub mod fixed_sum_constraint;
pub mod killer_cage_constraint;
pub mod line_constraint;
pub mod lockout_constraint;
pub mod or_constraint;
pub mod orthogonal_pairs_constraint;
pub mod prelude;
pub mod puzzle_desc;
pub mod quadruple_constraint;
pub mod region_constraint;
pub mod region_sum_lines_constraint;
pub mod sandwich_sum_constraint;
pub mod single_cell_constraint;
pub mod skyscraper_constraint;
pub mod weak_links_constraint;
pub mod x_sum_constraint;
pub mod zipper_line_constraint;
