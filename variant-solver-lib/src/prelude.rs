//! Re-exports the most commonly used types of this library.

pub use crate::board::Board;
pub use crate::candidate_index::CandidateIndex;
pub use crate::candidate_links::CandidateLinks;
pub use crate::cell_index::CellIndex;
pub use crate::cell_utility::CellUtility;
pub use crate::constraint::{Constraint, Deduction, InitResult};
pub use crate::elimination_list::EliminationList;
pub use crate::logic_result::LogicResult;
pub use crate::math::*;
pub use crate::memo::{MemoStore, MemoValue};
pub use crate::region::{Region, RegionKind};
pub use crate::state::StateKey;
pub use crate::sum_cells_helper::SumCellsHelper;
pub use crate::sum_group::SumGroup;
pub use crate::value_mask::ValueMask;
