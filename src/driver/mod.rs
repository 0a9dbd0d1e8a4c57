//! Driver table: the tabular dataset that steers the fractal
//!
//! Each row governs one step index `s`: how far and how sharply the walk
//! advances, whether it forks or loops back, and how the emitted ribbon
//! looks. The table is immutable once loaded; the engine layers per-branch
//! repeat counters on top of it.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which driver column a branch reads its heading increments from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other column.
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Directions a branch step spawns children in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSides {
    pub left: bool,
    pub right: bool,
}

impl BranchSides {
    pub fn contains(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// One row of the driver table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStep {
    /// Step index; matches the row's position in the table.
    pub index: usize,
    /// Radius increment, scaled by the branch's accumulated radius.
    pub d_r: f32,
    /// Heading increment read by left-column branches.
    pub d_phi_left: f32,
    /// Heading increment read by right-column branches.
    pub d_phi_right: f32,
    /// Angular spacing between fanned-out children.
    pub branch_angle: f32,
    /// Number of fan positions; nonzero marks a branch step.
    pub branch_count: i32,
    /// Directions children are spawned in.
    pub branch_sides: BranchSides,
    /// How many times the walk loops back on reaching this step.
    pub repeat_count: i32,
    /// Step index the walk jumps back to.
    pub repeat_from: usize,
    /// Ribbon width.
    pub width: f32,
    pub color_r: f32,
    pub color_g: f32,
    pub color_b: f32,
    pub luminosity: f32,
}

impl DriverStep {
    /// Heading increment for the given column.
    pub fn d_phi(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.d_phi_left,
            Side::Right => self.d_phi_right,
        }
    }
}

/// Errors raised while loading a driver table.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("failed to read driver file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing column {column}")]
    MissingColumn { line: usize, column: &'static str },
    #[error("line {line}, column {column}: cannot parse {value:?}")]
    BadCell {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: index {found} does not match row position {expected}")]
    IndexMismatch {
        line: usize,
        found: usize,
        expected: usize,
    },
}

/// Immutable ordered driver table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverTable {
    steps: Vec<DriverStep>,
}

impl DriverTable {
    pub fn new(steps: Vec<DriverStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, s: usize) -> Option<&DriverStep> {
        self.steps.get(s)
    }

    pub fn steps(&self) -> &[DriverStep] {
        &self.steps
    }

    /// Load a tab-separated driver file. The first line is a header and is
    /// discarded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataFormatError> {
        let text = fs::read_to_string(path)?;
        Self::from_tsv(&text)
    }

    /// Parse tab-separated driver rows. A malformed cell is an error, never
    /// a silent zero.
    pub fn from_tsv(text: &str) -> Result<Self, DataFormatError> {
        let mut steps = Vec::new();
        for (line_no, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let row = parse_row(line, line_no + 1)?;
            let expected = steps.len();
            if row.index != expected {
                return Err(DataFormatError::IndexMismatch {
                    line: line_no + 1,
                    found: row.index,
                    expected,
                });
            }
            steps.push(row);
        }
        log::debug!("Parsed {} driver steps", steps.len());
        Ok(Self { steps })
    }
}

/// Cursor over one row's tab-separated cells.
struct Fields<'a> {
    iter: std::str::Split<'a, char>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn raw(&mut self, column: &'static str) -> Result<&'a str, DataFormatError> {
        self.iter
            .next()
            .map(str::trim)
            .ok_or(DataFormatError::MissingColumn {
                line: self.line,
                column,
            })
    }

    fn parse<T: FromStr>(&mut self, column: &'static str) -> Result<T, DataFormatError> {
        let value = self.raw(column)?;
        value.parse().map_err(|_| DataFormatError::BadCell {
            line: self.line,
            column,
            value: value.to_string(),
        })
    }

    /// Parse the branch-direction cell: any mix of "L"/"R"; "-" or empty
    /// means no directions.
    fn sides(&mut self, column: &'static str) -> Result<BranchSides, DataFormatError> {
        let value = self.raw(column)?;
        let mut sides = BranchSides::default();
        for ch in value.chars() {
            match ch {
                'L' | 'l' => sides.left = true,
                'R' | 'r' => sides.right = true,
                '-' => {}
                _ => {
                    return Err(DataFormatError::BadCell {
                        line: self.line,
                        column,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(sides)
    }
}

fn parse_row(line: &str, line_no: usize) -> Result<DriverStep, DataFormatError> {
    let mut f = Fields {
        iter: line.split('\t'),
        line: line_no,
    };
    // Columns are positional; anything after the last one is ignored.
    Ok(DriverStep {
        index: f.parse("index")?,
        d_r: f.parse("dR")?,
        d_phi_left: f.parse("dPhiLeft")?,
        d_phi_right: f.parse("dPhiRight")?,
        branch_angle: f.parse("branchAngle")?,
        branch_count: f.parse("branchCount")?,
        branch_sides: f.sides("branchDirections")?,
        repeat_count: f.parse("repeatCount")?,
        repeat_from: f.parse("repeatFromIndex")?,
        width: f.parse("width")?,
        color_r: f.parse("colorR")?,
        color_g: f.parse("colorG")?,
        color_b: f.parse("colorB")?,
        luminosity: f.parse("luminosity")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "s\tdR\tdPhiL\tdPhiR\tangle\tbranches\tdirs\trepeat\tfrom\twidth\tR\tG\tB\tlum";

    fn table(rows: &[&str]) -> Result<DriverTable, DataFormatError> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        DriverTable::from_tsv(&text)
    }

    #[test]
    fn test_parse_full_row() {
        let t = table(&["0\t1.5\t0.1\t-0.1\t0.7\t2\tLR\t3\t0\t0.5\t200\t150\t100\t0.8"]).unwrap();
        assert_eq!(t.len(), 1);
        let step = t.get(0).unwrap();
        assert_eq!(step.index, 0);
        assert!((step.d_r - 1.5).abs() < 1e-6);
        assert!((step.d_phi_left - 0.1).abs() < 1e-6);
        assert!((step.d_phi_right + 0.1).abs() < 1e-6);
        assert_eq!(step.branch_count, 2);
        assert!(step.branch_sides.left && step.branch_sides.right);
        assert_eq!(step.repeat_count, 3);
        assert_eq!(step.repeat_from, 0);
        assert!((step.luminosity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_header_row_is_discarded() {
        let t = table(&[
            "0\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1",
            "1\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1",
        ])
        .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_bad_cell_is_an_error() {
        let err = table(&["0\tabc\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1"]).unwrap_err();
        match err {
            DataFormatError::BadCell { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "dR");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = table(&["0\t1\t0\t0"]).unwrap_err();
        assert!(matches!(err, DataFormatError::MissingColumn { .. }));
    }

    #[test]
    fn test_index_must_match_row_position() {
        let err = table(&[
            "0\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1",
            "5\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1",
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            DataFormatError::IndexMismatch {
                found: 5,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_side_parsing() {
        let t = table(&[
            "0\t1\t0\t0\t0\t1\tL\t0\t0\t1\t0\t0\t0\t1",
            "1\t1\t0\t0\t0\t1\tR\t0\t0\t1\t0\t0\t0\t1",
            "2\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1",
        ])
        .unwrap();
        assert_eq!(
            *t.get(0).map(|s| &s.branch_sides).unwrap(),
            BranchSides {
                left: true,
                right: false
            }
        );
        assert_eq!(
            *t.get(1).map(|s| &s.branch_sides).unwrap(),
            BranchSides {
                left: false,
                right: true
            }
        );
        assert_eq!(*t.get(2).map(|s| &s.branch_sides).unwrap(), BranchSides::default());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let t = table(&["0\t1\t0\t0\t0\t0\t-\t0\t0\t1\t0\t0\t0\t1\textra\tcells"]).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_opposite_side() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }
}
