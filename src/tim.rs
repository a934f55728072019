//! Reading of `.tim` files, the time section of an SMPS triple.
//!
//! Each body line of the `PERIODS` section names the first column and the first row of a period.
//! Only the `LP` (explicit ordering) flavour is supported, and the file may end without `ENDATA`.

use std::path::Path;

use log::debug;

use crate::error::SmpsError;
use crate::lines::{Line, expect_tokens, lines};

/// Period boundaries of a stochastic program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSectionData {
    name: String,
    /// First column of every period.
    cols: Vec<String>,
    /// First row of every period.
    rows: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Section {
    None,
    Time,
    Periods,
}

impl TimeSectionData {
    pub fn new(name: String, cols: Vec<String>, rows: Vec<String>) -> Self {
        assert_eq!(cols.len(), rows.len(), "Every period needs a first row and column");
        Self { name, cols, rows }
    }

    /// Parses the contents of a `.tim` file.
    pub fn parse(program: &str) -> Result<Self, SmpsError> {
        let mut name = String::new();
        let mut cols = Vec::new();
        let mut rows = Vec::new();
        let mut section = Section::None;

        for (line, content) in lines(program) {
            match content {
                Line::Header(tokens) => match tokens[0] {
                    "TIME" => {
                        name = tokens.get(1).map(|s| s.to_string()).unwrap_or_default();
                        section = Section::Time;
                    }
                    "PERIODS" => {
                        if let Some(&format) = tokens.get(1) {
                            if format != "LP" {
                                return Err(SmpsError::UnsupportedFormat {
                                    line,
                                    format: format.to_string(),
                                });
                            }
                        }
                        section = Section::Periods;
                    }
                    "ENDATA" => break,
                    other => {
                        return Err(SmpsError::UnknownSection {
                            line,
                            section: other.to_string(),
                        });
                    }
                },
                Line::Data(tokens) => {
                    if section != Section::Periods {
                        return Err(SmpsError::SyntaxError {
                            line,
                            message: "period data outside of the PERIODS section".to_string(),
                        });
                    }
                    expect_tokens(&tokens, 2, 3, line)?;
                    cols.push(tokens[0].to_string());
                    rows.push(tokens[1].to_string());
                }
            }
        }

        debug!("Read time section `{}` with {} periods", name, rows.len());
        Ok(Self::new(name, cols, rows))
    }

    /// Reads and parses a `.tim` file.
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

    pub fn get_cols(&self) -> &[String] {
        &self.cols
    }

    pub fn get_rows(&self) -> &[String] {
        &self.rows
    }

    /// Returns the number of periods.
    pub fn get_n_periods(&self) -> usize {
        self.rows.len()
    }
}
