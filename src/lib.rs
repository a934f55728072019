//! Reader for two-stage stochastic linear programs in the SMPS format.
//!
//! An SMPS problem is spread over three files: a core `.cor` file holding a deterministic
//! template LP in MPS format, a `.tim` file splitting its rows and columns into periods, and a
//! `.sto` file describing the random entries. [`smps::Smps`] reads the triple and
//! [`tssp::TwoStageStochasticProgram`] holds the assembled program in canonical form, with one
//! [`tssp::ScenarioDelta`] per scenario.

pub type E = f64;
pub type I = usize;

mod lines;

pub mod cor;
pub mod error;
pub mod export;
pub mod log;
pub mod scenario;
pub mod smps;
pub mod sto;
pub mod tim;
pub mod tssp;

pub use error::SmpsError;
pub use smps::Smps;
pub use tssp::{ScenarioDelta, TryFromSmps, TwoStageStochasticProgram};

#[cfg(test)]
fn get_data_dir() -> String {
    format!("{}/data", env!("CARGO_MANIFEST_DIR"))
}
