use std::path::PathBuf;

use derive_more::{Display, Error};

/// Errors raised while reading an SMPS triple or assembling it into a two-stage program.
///
/// Every error is terminal for the call that produced it; no partial structures are returned.
#[derive(Debug, Display, Error)]
pub enum SmpsError {
    #[display("Syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[display("Unknown section `{section}` on line {line}")]
    UnknownSection { line: usize, section: String },

    #[display("Unsupported section `{section}` on line {line}")]
    UnsupportedSection { line: usize, section: String },

    #[display("Unsupported distribution `{distribution}` in section {section} on line {line}")]
    UnsupportedDistribution {
        line: usize,
        section: String,
        distribution: String,
    },

    #[display("Unsupported format `{format}` on line {line}")]
    UnsupportedFormat { line: usize, format: String },

    #[display("Duplicate entry for row `{row}` and column `{col}` on line {line}")]
    DuplicateEntry { line: usize, row: String, col: String },

    #[display("Block data on line {line} before any BL header")]
    MissingBlockHeader { line: usize },

    #[display("Invalid core file: {message}")]
    InvalidCore { message: String },

    #[display("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[display("Expected a two-stage time section, found {periods} periods")]
    NotTwoStage { periods: usize },

    #[display("First period must start at the first row and column, found row `{row}` and column `{col}`")]
    InvalidPartition { row: String, col: String },

    #[display("First stage row `{row}` references second stage column `{col}`")]
    StageCoupling { row: String, col: String },

    #[display("Unknown row `{name}`")]
    UnknownRow { name: String },

    #[display("Unknown column `{name}`")]
    UnknownColumn { name: String },

    #[display("Unsupported bounds [{lower}, {upper}] on variable `{name}`")]
    UnsupportedBounds { name: String, lower: f64, upper: f64 },

    #[display("Unsupported bounds [{lower}, {upper}] on row `{name}`")]
    UnsupportedRowBounds { name: String, lower: f64, upper: f64 },

    #[display("Malformed scenario entry for row `{row}` and column `{col}`")]
    MalformedScenarioEntry { row: String, col: String },

    #[display("Random entry for row `{row}` and column `{col}` perturbs the first stage")]
    FirstStagePerturbation { row: String, col: String },

    #[display("Unable to build sparse matrix: {message}")]
    SparseMatrix { message: String },

    #[display("Unable to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
