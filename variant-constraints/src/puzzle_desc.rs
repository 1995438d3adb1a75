//! Contains [`PuzzleDescription`], the structured puzzle document the
//! builder consumes.
//!
//! The shape follows the common variant-sudoku interchange format: a grid
//! of cell entries plus one array per constraint name, everything
//! defaulted so partial documents parse.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleDescription {
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub ruleset: String,
    #[serde(default)]
    pub grid: Vec<Vec<GridEntry>>,
    #[serde(rename = "diagonal+", default)]
    pub diagonal_p: bool,
    #[serde(rename = "diagonal-", default)]
    pub diagonal_n: bool,
    #[serde(default)]
    pub antiknight: bool,
    #[serde(default)]
    pub antiking: bool,
    #[serde(default)]
    pub disjointgroups: bool,
    #[serde(default)]
    pub nonconsecutive: bool,
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub arrow: Vec<ArrowEntry>,
    #[serde(default)]
    pub killercage: Vec<CellsEntry>,
    #[serde(default)]
    pub littlekillersum: Vec<LittleKillerEntry>,
    #[serde(default)]
    pub odd: Vec<CellEntry>,
    #[serde(default)]
    pub even: Vec<CellEntry>,
    #[serde(default)]
    pub minimum: Vec<CellEntry>,
    #[serde(default)]
    pub maximum: Vec<CellEntry>,
    #[serde(default)]
    pub extraregion: Vec<CellsEntry>,
    #[serde(default)]
    pub thermometer: Vec<LinesEntry>,
    #[serde(default)]
    pub palindrome: Vec<LinesEntry>,
    #[serde(default)]
    pub renban: Vec<LinesEntry>,
    #[serde(default)]
    pub whispers: Vec<LinesEntry>,
    #[serde(default)]
    pub regionsumline: Vec<LinesEntry>,
    #[serde(default)]
    pub betweenline: Vec<LinesEntry>,
    #[serde(default)]
    pub lockout: Vec<LinesEntry>,
    #[serde(default)]
    pub entropicline: Vec<LinesEntry>,
    #[serde(default)]
    pub modularline: Vec<LinesEntry>,
    #[serde(default)]
    pub nabner: Vec<LinesEntry>,
    #[serde(default)]
    pub doublearrow: Vec<LinesEntry>,
    #[serde(default)]
    pub zipperline: Vec<LinesEntry>,
    #[serde(default)]
    pub difference: Vec<CellsEntry>,
    #[serde(default)]
    pub xv: Vec<CellsEntry>,
    #[serde(default)]
    pub ratio: Vec<CellsEntry>,
    #[serde(rename = "clone", default)]
    pub clones: Vec<CloneEntry>,
    #[serde(default)]
    pub quadruple: Vec<QuadrupleEntry>,
    #[serde(default)]
    pub sandwichsum: Vec<CellEntry>,
    #[serde(default)]
    pub xsum: Vec<CellEntry>,
    #[serde(default)]
    pub skyscraper: Vec<CellEntry>,
}

impl PuzzleDescription {
    /// An empty description of the given size.
    pub fn empty(size: usize) -> Self {
        serde_json::from_str(&format!("{{\"size\":{}}}", size)).unwrap()
    }

    pub fn from_json(json: &str) -> Result<PuzzleDescription, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GridEntry {
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub given: bool,
    #[serde(rename = "centerPencilMarks", default, deserialize_with = "null_to_default")]
    pub center_pencil_marks: Vec<i32>,
    #[serde(rename = "givenPencilMarks", default, deserialize_with = "null_to_default")]
    pub given_pencil_marks: Vec<i32>,
    #[serde(default = "default_region", deserialize_with = "null_to_neg1")]
    pub region: i32,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ArrowEntry {
    #[serde(default)]
    pub lines: Vec<Vec<String>>,
    #[serde(default)]
    pub cells: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CellsEntry {
    #[serde(default)]
    pub cells: Vec<String>,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CellEntry {
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LinesEntry {
    #[serde(default)]
    pub lines: Vec<Vec<String>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LittleKillerEntry {
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CloneEntry {
    #[serde(default)]
    pub cells: Vec<String>,
    #[serde(rename = "cloneCells", default)]
    pub clone_cells: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QuadrupleEntry {
    #[serde(default)]
    pub cells: Vec<String>,
    #[serde(default)]
    pub values: Vec<usize>,
}

fn default_size() -> usize {
    9
}

fn default_region() -> i32 {
    -1
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn null_to_neg1<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or(-1))
}
