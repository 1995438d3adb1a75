//! Re-exports the constraint catalogue and builder types.

pub use crate::arrow_constraint::ArrowConstraint;
pub use crate::between_line_constraint::BetweenLineConstraint;
pub use crate::builder::ConstraintBuilder;
pub use crate::cardinality_constraint::CardinalityConstraint;
pub use crate::chess_constraint::ChessConstraint;
pub use crate::clone_constraint::CloneConstraint;
pub use crate::double_arrow_constraint::DoubleArrowConstraint;
pub use crate::equal_sum_constraint::EqualSumConstraint;
pub use crate::fixed_sum_constraint::FixedSumConstraint;
pub use crate::killer_cage_constraint::KillerCageConstraint;
pub use crate::line_constraint::{LineConstraint, LineKind};
pub use crate::lockout_constraint::LockoutConstraint;
pub use crate::or_constraint::OrConstraint;
pub use crate::orthogonal_pairs_constraint::{OrthogonalPairsConstraint, PairMarker, PairType};
pub use crate::puzzle_desc::PuzzleDescription;
pub use crate::quadruple_constraint::QuadrupleConstraint;
pub use crate::region_constraint::RegionConstraint;
pub use crate::region_sum_lines_constraint::RegionSumLinesConstraint;
pub use crate::sandwich_sum_constraint::SandwichSumConstraint;
pub use crate::single_cell_constraint::{SingleCellConstraint, SingleCellKind};
pub use crate::skyscraper_constraint::SkyscraperConstraint;
pub use crate::weak_links_constraint::WeakLinksConstraint;
pub use crate::x_sum_constraint::XSumConstraint;
pub use crate::zipper_line_constraint::ZipperLineConstraint;
