//! Reading of `.sto` files, the stochastic section of an SMPS triple.
//!
//! Supported sections:
//! - `INDEP DISCRETE | UNIFORM | NORMAL`: independent scalar random entries keyed by
//!   (row, column).
//! - `BLOCKS DISCRETE`: joint discrete realizations of a group of entries. A `BL` line opens a
//!   new realization of the named block and the lines that follow list its coefficients.
//!
//! `SCENARIOS` is rejected, and the file must be terminated by `ENDATA`.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

use log::debug;

use crate::E;
use crate::error::SmpsError;
use crate::lines::{Line, expect_tokens, lines, parse_number};

/// A realized value of the entry at (`row`, `col`).
///
/// `row` may be the objective row and `col` may be the right-hand side name of the core file.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    pub row: String,
    pub col: String,
    pub value: E,
}

impl Perturbation {
    pub fn new(row: &str, col: &str, value: E) -> Self {
        Self {
            row: row.to_string(),
            col: col.to_string(),
            value,
        }
    }
}

/// An independent random entry of the problem data.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomVariable {
    /// Finite distribution; `support[k]` is taken with probability `probability[k]`.
    ScalarDiscrete {
        row: String,
        col: String,
        support: Vec<E>,
        probability: Vec<E>,
    },
    ScalarUniform {
        row: String,
        col: String,
        lower: E,
        upper: E,
    },
    ScalarNormal {
        row: String,
        col: String,
        mean: E,
        variance: E,
    },
}

impl RandomVariable {
    /// Returns the (row, column) pair this variable perturbs.
    pub fn key(&self) -> (&str, &str) {
        match self {
            Self::ScalarDiscrete { row, col, .. }
            | Self::ScalarUniform { row, col, .. }
            | Self::ScalarNormal { row, col, .. } => (row, col),
        }
    }
}

/// A jointly distributed group of entries.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomVector {
    /// `support[k]` lists every entry realized together, with probability `probability[k]`.
    BlockDiscrete {
        name: String,
        support: Vec<Vec<Perturbation>>,
        probability: Vec<E>,
    },
}

impl RandomVector {
    pub fn name(&self) -> &str {
        match self {
            Self::BlockDiscrete { name, .. } => name,
        }
    }
}

/// The random elements declared by a `.sto` file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochData {
    name: String,
    indeps: Vec<RandomVariable>,
    blocks: Vec<RandomVector>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Distribution {
    Discrete,
    Uniform,
    Normal,
}

impl Display for Distribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Distribution::Discrete => "DISCRETE",
            Distribution::Uniform => "UNIFORM",
            Distribution::Normal => "NORMAL",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Section {
    None,
    Indep(Distribution),
    Blocks(Distribution),
}

/// Scratch state of a single parse; the index maps are dropped once the file is read.
struct StochParser {
    name: String,
    indeps: Vec<RandomVariable>,
    blocks: Vec<RandomVector>,
    indep_index: HashMap<(String, String), usize>,
    block_index: HashMap<String, usize>,
    section: Section,
    current_block: Option<usize>,
}

impl StochParser {
    fn new() -> Self {
        Self {
            name: String::new(),
            indeps: Vec::new(),
            blocks: Vec::new(),
            indep_index: HashMap::new(),
            block_index: HashMap::new(),
            section: Section::None,
            current_block: None,
        }
    }

    /// Handles a section header. Returns `false` once `ENDATA` is reached.
    fn header(&mut self, tokens: &[&str], line: usize) -> Result<bool, SmpsError> {
        match tokens[0] {
            "STOCH" => {
                self.name = tokens.get(1).map(|s| s.to_string()).unwrap_or_default();
            }
            "INDEP" => {
                let distribution = match tokens.get(1).copied() {
                    Some("DISCRETE") => Distribution::Discrete,
                    Some("UNIFORM") => Distribution::Uniform,
                    Some("NORMAL") => Distribution::Normal,
                    other => return Err(unsupported_distribution("INDEP", other, line)),
                };
                debug!("Reading INDEP {distribution} from line {line}");
                self.section = Section::Indep(distribution);
            }
            "BLOCKS" => {
                let distribution = match tokens.get(1).copied() {
                    Some("DISCRETE") => Distribution::Discrete,
                    other => return Err(unsupported_distribution("BLOCKS", other, line)),
                };
                debug!("Reading BLOCKS {distribution} from line {line}");
                self.section = Section::Blocks(distribution);
                self.current_block = None;
            }
            "SCENARIOS" => {
                return Err(SmpsError::UnsupportedSection {
                    line,
                    section: "SCENARIOS".to_string(),
                });
            }
            "ENDATA" => return Ok(false),
            other => {
                return Err(SmpsError::UnknownSection {
                    line,
                    section: other.to_string(),
                });
            }
        }
        Ok(true)
    }

    fn data(&mut self, tokens: &[&str], line: usize) -> Result<(), SmpsError> {
        match self.section {
            Section::Indep(distribution) => self.indep(distribution, tokens, line),
            Section::Blocks(_) => self.block(tokens, line),
            Section::None => Err(SmpsError::SyntaxError {
                line,
                message: "data line outside of a section".to_string(),
            }),
        }
    }

    /// `col row value period parameter`
    fn indep(
        &mut self,
        distribution: Distribution,
        tokens: &[&str],
        line: usize,
    ) -> Result<(), SmpsError> {
        expect_tokens(tokens, 5, 5, line)?;
        let (col, row) = (tokens[0].to_string(), tokens[1].to_string());
        let v1 = parse_number(tokens[2], line)?;
        let v2 = parse_number(tokens[4], line)?;

        let key = (row, col);
        if let Some(&k) = self.indep_index.get(&key) {
            return match (&mut self.indeps[k], distribution) {
                (
                    RandomVariable::ScalarDiscrete {
                        support,
                        probability,
                        ..
                    },
                    Distribution::Discrete,
                ) => {
                    support.push(v1);
                    probability.push(v2);
                    Ok(())
                }
                _ => Err(SmpsError::DuplicateEntry {
                    line,
                    row: key.0,
                    col: key.1,
                }),
            };
        }

        let (row, col) = key.clone();
        let variable = match distribution {
            Distribution::Discrete => RandomVariable::ScalarDiscrete {
                row,
                col,
                support: vec![v1],
                probability: vec![v2],
            },
            Distribution::Uniform => RandomVariable::ScalarUniform {
                row,
                col,
                lower: v1,
                upper: v2,
            },
            Distribution::Normal => RandomVariable::ScalarNormal {
                row,
                col,
                mean: v1,
                variance: v2,
            },
        };
        self.indep_index.insert(key, self.indeps.len());
        self.indeps.push(variable);
        Ok(())
    }

    /// `BL name period probability` or `col row value [row value]`
    fn block(&mut self, tokens: &[&str], line: usize) -> Result<(), SmpsError> {
        if tokens[0] == "BL" {
            expect_tokens(tokens, 4, 4, line)?;
            let name = tokens[1];
            let p = parse_number(tokens[3], line)?;

            let k = match self.block_index.get(name) {
                Some(&k) => {
                    let RandomVector::BlockDiscrete {
                        support,
                        probability,
                        ..
                    } = &mut self.blocks[k];
                    support.push(Vec::new());
                    probability.push(p);
                    k
                }
                None => {
                    let k = self.blocks.len();
                    self.blocks.push(RandomVector::BlockDiscrete {
                        name: name.to_string(),
                        support: vec![Vec::new()],
                        probability: vec![p],
                    });
                    self.block_index.insert(name.to_string(), k);
                    k
                }
            };
            self.current_block = Some(k);
            return Ok(());
        }

        let k = self
            .current_block
            .ok_or(SmpsError::MissingBlockHeader { line })?;
        expect_tokens(tokens, 3, 5, line)?;
        if tokens.len() == 4 {
            return Err(SmpsError::SyntaxError {
                line,
                message: "second entry is missing its value".to_string(),
            });
        }

        let col = tokens[0];
        let mut entries = vec![Perturbation::new(tokens[1], col, parse_number(tokens[2], line)?)];
        if tokens.len() == 5 {
            entries.push(Perturbation::new(tokens[3], col, parse_number(tokens[4], line)?));
        }

        let RandomVector::BlockDiscrete { support, .. } = &mut self.blocks[k];
        match support.last_mut() {
            Some(realization) => realization.extend(entries),
            None => return Err(SmpsError::MissingBlockHeader { line }),
        }
        Ok(())
    }

    fn finish(self) -> StochData {
        StochData {
            name: self.name,
            indeps: self.indeps,
            blocks: self.blocks,
        }
    }
}

fn unsupported_distribution(section: &str, distribution: Option<&str>, line: usize) -> SmpsError {
    SmpsError::UnsupportedDistribution {
        line,
        section: section.to_string(),
        distribution: distribution.unwrap_or_default().to_string(),
    }
}

impl StochData {
    pub fn new(name: String, indeps: Vec<RandomVariable>, blocks: Vec<RandomVector>) -> Self {
        Self {
            name,
            indeps,
            blocks,
        }
    }

    /// Parses the contents of a `.sto` file.
    pub fn parse(program: &str) -> Result<Self, SmpsError> {
        let mut parser = StochParser::new();

        for (line, content) in lines(program) {
            match content {
                Line::Header(tokens) => {
                    if !parser.header(&tokens, line)? {
                        let sto = parser.finish();
                        debug!(
                            "Read stochastic section `{}` with {} independent entries and {} blocks",
                            sto.name,
                            sto.indeps.len(),
                            sto.blocks.len()
                        );
                        return Ok(sto);
                    }
                }
                Line::Data(tokens) => parser.data(&tokens, line)?,
            }
        }

        Err(SmpsError::UnexpectedEndOfInput {
            expected: "ENDATA".to_string(),
        })
    }

    /// Reads and parses a `.sto` file.
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

    pub fn get_indeps(&self) -> &[RandomVariable] {
        &self.indeps
    }

    pub fn get_blocks(&self) -> &[RandomVector] {
        &self.blocks
    }
}
