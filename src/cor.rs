//! Reading of `.cor` files, the deterministic core of an SMPS triple.
//!
//! The core file is an [MPS](https://en.wikipedia.org/wiki/MPS_(format)) model, tokenised by the
//! `mps` crate. This module keeps the row and column names (indexed in declaration order), the
//! constraint coefficients as sparse triplets, the objective, and lower/upper bounds for both rows
//! and columns:
//! - `E` rows become `[rhs, rhs]`, `L` rows `[-inf, rhs]` and `G` rows `[rhs, +inf]`.
//! - `RANGES` turn any of them into a finite range.
//! - Columns default to `[0, +inf]` and are adjusted by `BOUNDS`.
//!
//! Integer and semi-continuous bound types are rejected.

use std::collections::HashSet;
use std::path::Path;

use faer::Col;
use indexmap::IndexSet;
use log::debug;
use mps::types::{BoundType, RowType};

use crate::error::SmpsError;
use crate::{E, I};

/// Name of the right-hand side vector when the core file does not name one.
const DEFAULT_RHS_NAME: &str = "RHS";

/// A row name resolved against the core file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowRef {
    Objective,
    Constraint(I),
}

/// A column name resolved against the core file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColRef {
    Rhs,
    Variable(I),
}

/// The deterministic linear program of an SMPS triple.
#[derive(Debug, Clone)]
pub struct MatrixData {
    name: String,
    obj_name: String,
    rhs_name: String,
    row_names: IndexSet<String>,
    col_names: IndexSet<String>,
    /// `(row, col, value)` constraint coefficients.
    entries: Vec<(I, I, E)>,
    objective: Col<E>,
    objective_constant: E,
    row_lower: Col<E>,
    row_upper: Col<E>,
    col_lower: Col<E>,
    col_upper: Col<E>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Sense {
    E,
    L,
    G,
}

fn invalid(message: String) -> SmpsError {
    SmpsError::InvalidCore { message }
}

/// Extracts the value of a bound type that requires one.
fn bound_value(value: impl Into<Option<E>>, column: &str) -> Result<E, SmpsError> {
    value
        .into()
        .ok_or_else(|| invalid(format!("missing bound value for column `{column}`")))
}

/// Builds the core data from the sections of a parsed MPS file.
///
/// Only the first vector of the `RHS`, `RANGES` and `BOUNDS` sections is used.
impl TryFrom<mps::Parser<'_, E>> for MatrixData {
    type Error = SmpsError;

    fn try_from(parser: mps::Parser<'_, E>) -> Result<Self, Self::Error> {
        let mut obj_name: Option<String> = None;
        let mut free_rows = HashSet::new();
        let mut row_names = IndexSet::new();
        let mut senses = Vec::new();

        for line in &parser.rows {
            let sense = match line.row_type {
                RowType::Nr => None,
                RowType::Eq => Some(Sense::E),
                RowType::Leq => Some(Sense::L),
                RowType::Geq => Some(Sense::G),
            };
            let name = line.row_name.to_string();
            match sense {
                None if obj_name.is_none() => obj_name = Some(name),
                // Further N rows are free rows and carry no constraint
                None => {
                    free_rows.insert(name);
                }
                Some(sense) => {
                    if !row_names.insert(name) {
                        return Err(invalid(format!("row `{}` is declared twice", line.row_name)));
                    }
                    senses.push(sense);
                }
            }
        }

        let lookup = |name: &str| {
            if Some(name) == obj_name.as_deref() {
                Ok(Some(RowRef::Objective))
            } else if free_rows.contains(name) {
                Ok(None)
            } else {
                row_names
                    .get_index_of(name)
                    .map(|i| Some(RowRef::Constraint(i)))
                    .ok_or_else(|| SmpsError::UnknownRow {
                        name: name.to_string(),
                    })
            }
        };

        let mut col_names = IndexSet::new();
        let mut objective = Vec::new();
        let mut entries = Vec::new();
        for line in &parser.columns {
            let (j, inserted) = col_names.insert_full(line.name.to_string());
            if inserted {
                objective.push(0.);
            }
            for pair in std::iter::once(&line.first_pair).chain(line.second_pair.as_ref()) {
                match lookup(pair.row_name)? {
                    Some(RowRef::Objective) => objective[j] += pair.value,
                    Some(RowRef::Constraint(i)) => entries.push((i, j, pair.value)),
                    None => {}
                }
            }
        }

        let (n_rows, n_cols) = (row_names.len(), col_names.len());

        let mut rhs = vec![0.; n_rows];
        let mut objective_constant = 0.;
        let rhs_lines = parser.rhs.as_deref().unwrap_or_default();
        let rhs_name = rhs_lines.first().map(|line| line.name);
        for line in rhs_lines.iter().filter(|line| Some(line.name) == rhs_name) {
            for pair in std::iter::once(&line.first_pair).chain(line.second_pair.as_ref()) {
                match lookup(pair.row_name)? {
                    Some(RowRef::Objective) => objective_constant = -pair.value,
                    Some(RowRef::Constraint(i)) => rhs[i] = pair.value,
                    None => {}
                }
            }
        }

        let mut ranges = vec![None; n_rows];
        let range_lines = parser.ranges.as_deref().unwrap_or_default();
        let range_name = range_lines.first().map(|line| line.name);
        for line in range_lines.iter().filter(|line| Some(line.name) == range_name) {
            for pair in std::iter::once(&line.first_pair).chain(line.second_pair.as_ref()) {
                if let Some(RowRef::Constraint(i)) = lookup(pair.row_name)? {
                    ranges[i] = Some(pair.value);
                }
            }
        }

        let (row_lower, row_upper): (Vec<E>, Vec<E>) = senses
            .iter()
            .zip(rhs.iter().zip(ranges.iter()))
            .map(|(sense, (&rhs, range))| match (sense, range) {
                (Sense::E, None) => (rhs, rhs),
                (Sense::L, None) => (-E::INFINITY, rhs),
                (Sense::G, None) => (rhs, E::INFINITY),
                (Sense::E, Some(r)) if *r < 0. => (rhs - r.abs(), rhs),
                (Sense::E | Sense::G, Some(r)) => (rhs, rhs + r.abs()),
                (Sense::L, Some(r)) => (rhs - r.abs(), rhs),
            })
            .unzip();

        let mut col_lower = vec![0.; n_cols];
        let mut col_upper = vec![E::INFINITY; n_cols];
        let bound_lines = parser.bounds.as_deref().unwrap_or_default();
        let bound_name = bound_lines.first().map(|line| line.bound_name);
        for line in bound_lines
            .iter()
            .filter(|line| Some(line.bound_name) == bound_name)
        {
            let column = line.column_name;
            let j = col_names
                .get_index_of(column)
                .ok_or_else(|| SmpsError::UnknownColumn {
                    name: column.to_string(),
                })?;
            match line.bound_type {
                BoundType::Up => {
                    let value = bound_value(line.value, column)?;
                    if value < 0. && col_lower[j] == 0. {
                        col_lower[j] = -E::INFINITY;
                    }
                    col_upper[j] = value;
                }
                BoundType::Lo => col_lower[j] = bound_value(line.value, column)?,
                BoundType::Fx => {
                    let value = bound_value(line.value, column)?;
                    col_lower[j] = value;
                    col_upper[j] = value;
                }
                BoundType::Fr => {
                    col_lower[j] = -E::INFINITY;
                    col_upper[j] = E::INFINITY;
                }
                BoundType::Mi => col_lower[j] = -E::INFINITY,
                BoundType::Pl => col_upper[j] = E::INFINITY,
                _ => {
                    return Err(invalid(format!(
                        "integer or semi-continuous bound on column `{column}`"
                    )));
                }
            }
        }

        Ok(Self {
            name: parser.name.to_string(),
            obj_name: obj_name.unwrap_or_default(),
            rhs_name: rhs_name.unwrap_or(DEFAULT_RHS_NAME).to_string(),
            row_names,
            col_names,
            entries,
            objective: Col::from_fn(n_cols, |j| objective[j]),
            objective_constant,
            row_lower: Col::from_fn(n_rows, |i| row_lower[i]),
            row_upper: Col::from_fn(n_rows, |i| row_upper[i]),
            col_lower: Col::from_fn(n_cols, |j| col_lower[j]),
            col_upper: Col::from_fn(n_cols, |j| col_upper[j]),
        })
    }
}

impl MatrixData {
    /// Parses the contents of an MPS file.
    pub fn parse(program: &str) -> Result<Self, SmpsError> {
        let parser = mps::Parser::<E>::parse(program)
            .map_err(|e| invalid(format!("unable to parse MPS data: {}", e)))?;
        let cor = Self::try_from(parser)?;
        debug!(
            "Read core `{}` with {} rows, {} columns and {} coefficients",
            cor.name,
            cor.get_n_rows(),
            cor.get_n_cols(),
            cor.entries.len()
        );
        Ok(cor)
    }

    /// Reads and parses a `.cor` (or `.mps`) file.
    pub fn read(path: &Path) -> Result<Self, SmpsError> {
        let program = std::fs::read_to_string(path).map_err(|source| SmpsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&program)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Name of the objective row.
    pub fn get_obj_name(&self) -> &str {
        &self.obj_name
    }

    /// Name of the right-hand side vector.
    pub fn get_rhs_name(&self) -> &str {
        &self.rhs_name
    }

    /// Returns the number of constraint rows.
    pub fn get_n_rows(&self) -> usize {
        self.row_names.len()
    }

    /// Returns the number of variables.
    pub fn get_n_cols(&self) -> usize {
        self.col_names.len()
    }

    pub fn get_row_name(&self, i: I) -> Option<&str> {
        self.row_names.get_index(i).map(String::as_str)
    }

    pub fn get_col_name(&self, j: I) -> Option<&str> {
        self.col_names.get_index(j).map(String::as_str)
    }

    pub fn get_row_index(&self, name: &str) -> Option<I> {
        self.row_names.get_index_of(name)
    }

    pub fn get_col_index(&self, name: &str) -> Option<I> {
        self.col_names.get_index_of(name)
    }

    /// Resolves a row name, mapping the objective row to [`RowRef::Objective`].
    pub fn resolve_row(&self, name: &str) -> Option<RowRef> {
        if name == self.obj_name {
            Some(RowRef::Objective)
        } else {
            self.get_row_index(name).map(RowRef::Constraint)
        }
    }

    /// Resolves a column name, mapping the right-hand side name to [`ColRef::Rhs`].
    pub fn resolve_col(&self, name: &str) -> Option<ColRef> {
        if name == self.rhs_name {
            Some(ColRef::Rhs)
        } else {
            self.get_col_index(name).map(ColRef::Variable)
        }
    }

    /// Constraint coefficients as `(row, col, value)` triplets.
    pub fn get_entries(&self) -> &[(I, I, E)] {
        &self.entries
    }

    pub fn get_objective(&self) -> &Col<E> {
        &self.objective
    }

    /// Constant term of the objective, from an RHS entry on the objective row.
    pub fn get_objective_constant(&self) -> E {
        self.objective_constant
    }

    pub fn get_row_lower(&self) -> &Col<E> {
        &self.row_lower
    }

    pub fn get_row_upper(&self) -> &Col<E> {
        &self.row_upper
    }

    pub fn get_col_lower(&self) -> &Col<E> {
        &self.col_lower
    }

    pub fn get_col_upper(&self) -> &Col<E> {
        &self.col_upper
    }
}
