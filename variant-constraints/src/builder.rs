//! Contains the [`ConstraintBuilder`]: a name-keyed factory registry that
//! turns a [`PuzzleDescription`] into a finalized [`Board`].

use crate::prelude::*;
use crate::puzzle_desc::*;
use regex::Regex;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A factory consumes its slice of the description and yields constraint
/// instances ready to attach.
pub type ConstraintFactory =
    Box<dyn Fn(&ConstraintBuilder, &mut Board, &PuzzleDescription) -> Result<Vec<Arc<dyn Constraint>>, String>>;

/// Maps a structured puzzle description to constraint instances and
/// finalizes the board.
///
/// Factories are registered under constraint-name keys and run in
/// registration order; [`ConstraintBuilder::register`] accepts additional
/// ones. Malformed input surfaces as an `Err` before any cell of the board
/// has been touched.
pub struct ConstraintBuilder {
    cell_regex: Regex,
    factories: Vec<(String, ConstraintFactory)>,
}

impl ConstraintBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            cell_regex: Regex::new(r"^[rR](\d+)[cC](\d+)$").unwrap(),
            factories: Vec::new(),
        };
        builder.register_standard_factories();
        builder
    }

    /// Registers a factory under a constraint-name key.
    pub fn register(&mut self, name: &str, factory: ConstraintFactory) {
        self.factories.push((name.to_owned(), factory));
    }

    /// Builds and finalizes a board from the description.
    pub fn build(&self, desc: &PuzzleDescription) -> Result<Board, String> {
        if desc.size < 2 || desc.size > 31 {
            return Err(format!("unsupported board size {}", desc.size));
        }
        if !desc.grid.is_empty()
            && (desc.grid.len() != desc.size || desc.grid.iter().any(|row| row.len() != desc.size))
        {
            return Err(format!("the grid is not {0}x{0}", desc.size));
        }

        let mut board = Board::with_boxes(desc.size, &region_map(desc));
        let mut pending = Vec::new();
        for (name, factory) in &self.factories {
            let constraints =
                factory(self, &mut board, desc).map_err(|error| format!("{}: {}", name, error))?;
            pending.extend(constraints);
        }
        for constraint in pending {
            board.add_constraint(constraint);
        }
        board.finalize_constraints()?;
        Ok(board)
    }

    // ------------------------------------------------------------------
    // Parsing helpers
    // ------------------------------------------------------------------

    /// Parses `R{row}C{col}` into raw 1-based coordinates. Rows/columns 0
    /// and size+1 are legal here; they denote clue positions outside the
    /// grid.
    fn parse_rc(&self, name: &str, size: usize) -> Result<(usize, usize), String> {
        let captures =
            self.cell_regex.captures(name).ok_or_else(|| format!("malformed cell name '{}'", name))?;
        let row: usize = captures[1].parse().map_err(|_| format!("malformed cell name '{}'", name))?;
        let col: usize = captures[2].parse().map_err(|_| format!("malformed cell name '{}'", name))?;
        if row > size + 1 || col > size + 1 {
            return Err(format!("cell '{}' is outside the board", name));
        }
        Ok((row, col))
    }

    fn parse_cell(&self, name: &str, size: usize) -> Result<CellIndex, String> {
        let (row, col) = self.parse_rc(name, size)?;
        if row < 1 || row > size || col < 1 || col > size {
            return Err(format!("cell '{}' is outside the board", name));
        }
        Ok(CellIndex::from_rc(row - 1, col - 1, size))
    }

    fn parse_cells(&self, names: &[String], size: usize) -> Result<Vec<CellIndex>, String> {
        names.iter().map(|name| self.parse_cell(name, size)).collect()
    }

    fn parse_sum(&self, value: &str) -> Result<Option<usize>, String> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        value.trim().parse().map(Some).map_err(|_| format!("malformed sum '{}'", value))
    }

    /// Decodes an outside clue position into the full line of cells read
    /// from that edge.
    fn outer_clue_line(&self, name: &str, size: usize) -> Result<Vec<CellIndex>, String> {
        let (row, col) = self.parse_rc(name, size)?;
        let line: Vec<CellIndex> = if row == 0 && (1..=size).contains(&col) {
            (0..size).map(|r| CellIndex::from_rc(r, col - 1, size)).collect()
        } else if row == size + 1 && (1..=size).contains(&col) {
            (0..size).rev().map(|r| CellIndex::from_rc(r, col - 1, size)).collect()
        } else if col == 0 && (1..=size).contains(&row) {
            (0..size).map(|c| CellIndex::from_rc(row - 1, c, size)).collect()
        } else if col == size + 1 && (1..=size).contains(&row) {
            (0..size).rev().map(|c| CellIndex::from_rc(row - 1, c, size)).collect()
        } else {
            return Err(format!("'{}' is not an edge clue position", name));
        };
        Ok(line)
    }

    /// Decodes a little-killer clue (outside cell plus diagonal direction)
    /// into the diagonal's cells.
    fn little_killer_cells(
        &self,
        name: &str,
        direction: &str,
        size: usize,
    ) -> Result<Vec<CellIndex>, String> {
        let (row, col) = self.parse_rc(name, size)?;
        let (dr, dc): (isize, isize) = match direction {
            "UR" => (-1, 1),
            "UL" => (-1, -1),
            "DR" => (1, 1),
            "DL" => (1, -1),
            _ => return Err(format!("unknown little killer direction '{}'", direction)),
        };
        let mut cells = Vec::new();
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);
        while (1..=size as isize).contains(&r) && (1..=size as isize).contains(&c) {
            cells.push(CellIndex::from_rc(r as usize - 1, c as usize - 1, size));
            r += dr;
            c += dc;
        }
        if cells.is_empty() {
            return Err(format!("little killer at '{}' {} covers no cells", name, direction));
        }
        Ok(cells)
    }

    fn parse_lines<F>(
        &self,
        entries: &[LinesEntry],
        size: usize,
        mut make: F,
    ) -> Result<Vec<Arc<dyn Constraint>>, String>
    where
        F: FnMut(Vec<CellIndex>) -> Result<Arc<dyn Constraint>, String>,
    {
        let mut result = Vec::new();
        for entry in entries {
            for line in &entry.lines {
                result.push(make(self.parse_cells(line, size)?)?);
            }
        }
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Standard factories
    // ------------------------------------------------------------------

    fn register_standard_factories(&mut self) {
        self.register("givens", Box::new(givens_factory));
        self.register("diagonal+", Box::new(|_, _, desc| {
            Ok(if desc.diagonal_p {
                vec![Arc::new(RegionConstraint::diagonal_positive(desc.size)) as Arc<dyn Constraint>]
            } else {
                vec![]
            })
        }));
        self.register("diagonal-", Box::new(|_, _, desc| {
            Ok(if desc.diagonal_n {
                vec![Arc::new(RegionConstraint::diagonal_negative(desc.size)) as Arc<dyn Constraint>]
            } else {
                vec![]
            })
        }));
        self.register("antiknight", Box::new(|_, _, desc| {
            Ok(if desc.antiknight {
                vec![Arc::new(ChessConstraint::anti_knight()) as Arc<dyn Constraint>]
            } else {
                vec![]
            })
        }));
        self.register("antiking", Box::new(|_, _, desc| {
            Ok(if desc.antiking {
                vec![Arc::new(ChessConstraint::anti_king()) as Arc<dyn Constraint>]
            } else {
                vec![]
            })
        }));
        self.register("disjointgroups", Box::new(|_, _, desc| {
            Ok(if desc.disjointgroups {
                RegionConstraint::disjoint_groups(desc.size, &region_map(desc))
                    .into_iter()
                    .map(|c| Arc::new(c) as Arc<dyn Constraint>)
                    .collect()
            } else {
                vec![]
            })
        }));
        self.register("extraregion", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.extraregion {
                let cells = builder.parse_cells(&entry.cells, desc.size)?;
                if cells.len() != desc.size {
                    return Err(format!("extra region has {} cells, needs {}", cells.len(), desc.size));
                }
                result.push(Arc::new(RegionConstraint::extra_region(&cells)));
            }
            Ok(result)
        }));
        self.register("orthogonalpairs", Box::new(pairs_factory));
        self.register("odd", Box::new(|builder, _, desc| {
            desc.odd
                .iter()
                .map(|entry| {
                    let cell = builder.parse_cell(&entry.cell, desc.size)?;
                    Ok(Arc::new(SingleCellConstraint::odd(cell)) as Arc<dyn Constraint>)
                })
                .collect()
        }));
        self.register("even", Box::new(|builder, _, desc| {
            desc.even
                .iter()
                .map(|entry| {
                    let cell = builder.parse_cell(&entry.cell, desc.size)?;
                    Ok(Arc::new(SingleCellConstraint::even(cell)) as Arc<dyn Constraint>)
                })
                .collect()
        }));
        self.register("minimum", Box::new(|builder, _, desc| {
            let group: Vec<CellIndex> = desc
                .minimum
                .iter()
                .map(|entry| builder.parse_cell(&entry.cell, desc.size))
                .collect::<Result<_, _>>()?;
            Ok(group
                .iter()
                .map(|&cell| {
                    Arc::new(SingleCellConstraint::minimum(cell, group.clone())) as Arc<dyn Constraint>
                })
                .collect())
        }));
        self.register("maximum", Box::new(|builder, _, desc| {
            let group: Vec<CellIndex> = desc
                .maximum
                .iter()
                .map(|entry| builder.parse_cell(&entry.cell, desc.size))
                .collect::<Result<_, _>>()?;
            Ok(group
                .iter()
                .map(|&cell| {
                    Arc::new(SingleCellConstraint::maximum(cell, group.clone())) as Arc<dyn Constraint>
                })
                .collect())
        }));
        self.register("killercage", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.killercage {
                let cells = builder.parse_cells(&entry.cells, desc.size)?;
                let sum = builder.parse_sum(&entry.value)?;
                result.push(Arc::new(KillerCageConstraint::new(desc.size, cells, sum)?));
            }
            Ok(result)
        }));
        self.register("littlekillersum", Box::new(|builder, board, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.littlekillersum {
                let cells = builder.little_killer_cells(&entry.cell, &entry.direction, desc.size)?;
                let sum = builder
                    .parse_sum(&entry.value)?
                    .ok_or_else(|| "a little killer needs a sum".to_owned())?;
                let name = format!("Little Killer {} at {}", sum, entry.cell);
                result.push(Arc::new(FixedSumConstraint::with_name(board, &name, &cells, sum)));
            }
            Ok(result)
        }));
        self.register("arrow", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.arrow {
                let circle = builder.parse_cells(&entry.cells, desc.size)?;
                for line in &entry.lines {
                    let line_cells = builder.parse_cells(line, desc.size)?;
                    let shaft: Vec<CellIndex> =
                        line_cells.into_iter().filter(|cell| !circle.contains(cell)).collect();
                    result.push(Arc::new(ArrowConstraint::new(circle.clone(), shaft)?));
                }
            }
            Ok(result)
        }));
        self.register("thermometer", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.thermometer, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::thermometer(cells)?))
            })
        }));
        self.register("palindrome", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.palindrome, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::palindrome(cells)?))
            })
        }));
        self.register("renban", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.renban, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::renban(cells)?))
            })
        }));
        self.register("whispers", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.whispers, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::whispers(cells, desc.size)?))
            })
        }));
        self.register("entropicline", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.entropicline, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::entropic(cells)?))
            })
        }));
        self.register("modularline", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.modularline, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::modular(cells)?))
            })
        }));
        self.register("nabner", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.nabner, desc.size, |cells| {
                Ok(Arc::new(LineConstraint::nabner(cells)?))
            })
        }));
        self.register("regionsumline", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.regionsumline, desc.size, |cells| {
                Ok(Arc::new(RegionSumLinesConstraint::new(cells)?))
            })
        }));
        self.register("betweenline", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.betweenline, desc.size, |cells| {
                Ok(Arc::new(BetweenLineConstraint::new(cells)?))
            })
        }));
        self.register("lockout", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.lockout, desc.size, |cells| {
                Ok(Arc::new(LockoutConstraint::new(desc.size, cells)?))
            })
        }));
        self.register("doublearrow", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.doublearrow, desc.size, |cells| {
                Ok(Arc::new(DoubleArrowConstraint::new(cells)?))
            })
        }));
        self.register("zipperline", Box::new(|builder, _, desc| {
            builder.parse_lines(&desc.zipperline, desc.size, |cells| {
                Ok(Arc::new(ZipperLineConstraint::new(cells)?))
            })
        }));
        self.register("clone", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.clones {
                let cells = builder.parse_cells(&entry.cells, desc.size)?;
                let clone_cells = builder.parse_cells(&entry.clone_cells, desc.size)?;
                result.push(Arc::new(CloneConstraint::new(cells, clone_cells)?));
            }
            Ok(result)
        }));
        self.register("quadruple", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.quadruple {
                let cells = builder.parse_cells(&entry.cells, desc.size)?;
                result.push(Arc::new(QuadrupleConstraint::new(desc.size, cells, entry.values.clone())?));
            }
            Ok(result)
        }));
        self.register("sandwichsum", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.sandwichsum {
                let cells = builder.outer_clue_line(&entry.cell, desc.size)?;
                let sum = builder
                    .parse_sum(&entry.value)?
                    .ok_or_else(|| "a sandwich clue needs a sum".to_owned())?;
                result.push(Arc::new(SandwichSumConstraint::new(desc.size, cells, sum)?));
            }
            Ok(result)
        }));
        self.register("xsum", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.xsum {
                let cells = builder.outer_clue_line(&entry.cell, desc.size)?;
                let sum = builder
                    .parse_sum(&entry.value)?
                    .ok_or_else(|| "an x-sum clue needs a sum".to_owned())?;
                result.push(Arc::new(XSumConstraint::new(cells, sum)?));
            }
            Ok(result)
        }));
        self.register("skyscraper", Box::new(|builder, _, desc| {
            let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
            for entry in &desc.skyscraper {
                let cells = builder.outer_clue_line(&entry.cell, desc.size)?;
                let clue = builder
                    .parse_sum(&entry.value)?
                    .ok_or_else(|| "a skyscraper clue needs a count".to_owned())?;
                result.push(Arc::new(SkyscraperConstraint::new(desc.size, cells, clue)?));
            }
            Ok(result)
        }));
    }
}

impl Default for ConstraintBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The flat cell-to-box assignment: defaults overridden by per-cell region
/// indices in the grid.
fn region_map(desc: &PuzzleDescription) -> Vec<usize> {
    let mut regions = default_boxes(desc.size);
    for (r, row) in desc.grid.iter().enumerate() {
        for (c, entry) in row.iter().enumerate() {
            if entry.region >= 0 {
                regions[r * desc.size + c] = entry.region as usize;
            }
        }
    }
    regions
}

fn givens_factory(
    _builder: &ConstraintBuilder,
    _board: &mut Board,
    desc: &PuzzleDescription,
) -> Result<Vec<Arc<dyn Constraint>>, String> {
    let mut result: Vec<Arc<dyn Constraint>> = Vec::new();
    for (r, row) in desc.grid.iter().enumerate() {
        for (c, entry) in row.iter().enumerate() {
            let cell = CellIndex::from_rc(r, c, desc.size);
            if entry.given && entry.value > 0 {
                if entry.value as usize > desc.size {
                    return Err(format!("given {} at {} is out of range", entry.value, cell));
                }
                result.push(Arc::new(SingleCellConstraint::pencilmarks(
                    cell,
                    ValueMask::from_value(entry.value as usize),
                )));
            } else if !entry.given_pencil_marks.is_empty() {
                let values: Vec<usize> = entry
                    .given_pencil_marks
                    .iter()
                    .filter(|&&v| v > 0 && v as usize <= desc.size)
                    .map(|&v| v as usize)
                    .collect();
                if values.is_empty() {
                    return Err(format!("pencilmarks at {} leave no values", cell));
                }
                result.push(Arc::new(SingleCellConstraint::pencilmarks(
                    cell,
                    ValueMask::from_values(&values),
                )));
            }
        }
    }
    Ok(result)
}

fn pairs_factory(
    builder: &ConstraintBuilder,
    _board: &mut Board,
    desc: &PuzzleDescription,
) -> Result<Vec<Arc<dyn Constraint>>, String> {
    let mut markers = Vec::new();

    let mut add_markers = |entries: &[CellsEntry], default: PairType| -> Result<(), String> {
        for entry in entries {
            let cells = builder.parse_cells(&entry.cells, desc.size)?;
            if cells.len() != 2 {
                return Err("a pair marker needs exactly two cells".to_owned());
            }
            let pair_type = match (default, entry.value.trim()) {
                (_, "") => default,
                (PairType::Diff(_), v) => {
                    PairType::Diff(v.parse().map_err(|_| format!("malformed marker value '{}'", v))?)
                }
                (PairType::Ratio(_), v) => {
                    PairType::Ratio(v.parse().map_err(|_| format!("malformed marker value '{}'", v))?)
                }
                (PairType::Sum(_), "X") | (PairType::Sum(_), "x") => PairType::Sum(10),
                (PairType::Sum(_), "V") | (PairType::Sum(_), "v") => PairType::Sum(5),
                (PairType::Sum(_), v) => {
                    PairType::Sum(v.parse().map_err(|_| format!("malformed marker value '{}'", v))?)
                }
            };
            markers.push(PairMarker::new(pair_type, cells[0], cells[1]));
        }
        Ok(())
    };

    add_markers(&desc.difference, PairType::Diff(1))?;
    add_markers(&desc.ratio, PairType::Ratio(2))?;
    add_markers(&desc.xv, PairType::Sum(5))?;

    let mut negatives = Vec::new();
    for name in &desc.negative {
        match name.as_str() {
            "ratio" => negatives.push(PairType::Ratio(2)),
            "difference" => negatives.push(PairType::Diff(1)),
            "xv" => {
                negatives.push(PairType::Sum(5));
                negatives.push(PairType::Sum(10));
            }
            other => return Err(format!("unknown negative constraint '{}'", other)),
        }
    }
    if desc.nonconsecutive {
        negatives.push(PairType::Diff(1));
    }

    if markers.is_empty() && negatives.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Arc::new(OrthogonalPairsConstraint::new("Orthogonal Pairs", markers, negatives))])
}
