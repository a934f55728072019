//! Reading a complete SMPS triple from disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::info;

use crate::cor::MatrixData;
use crate::error::SmpsError;
use crate::sto::StochData;
use crate::tim::TimeSectionData;
use crate::tssp::{TryFromSmps, TwoStageStochasticProgram};

/// The three parsed files of an SMPS problem.
#[derive(Debug, Clone)]
pub struct Smps {
    cor: MatrixData,
    tim: TimeSectionData,
    sto: StochData,
}

/// Appends `.extension` to `stem`, keeping any dots already in the file name.
fn with_suffix(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

impl Smps {
    pub fn new(cor: MatrixData, tim: TimeSectionData, sto: StochData) -> Self {
        Self { cor, tim, sto }
    }

    /// Reads the core, time and stochastic files from explicit paths.
    pub fn from_paths(cor: &Path, tim: &Path, sto: &Path) -> Result<Self, SmpsError> {
        info!("Reading SMPS files {}, {} and {}", cor.display(), tim.display(), sto.display());
        Ok(Self::new(
            MatrixData::read(cor)?,
            TimeSectionData::read(tim)?,
            StochData::read(sto)?,
        ))
    }

    /// Reads `<stem>.cor`, `<stem>.tim` and `<stem>.sto`.
    ///
    /// The core file is looked up as `<stem>.mps` when no `<stem>.cor` exists.
    pub fn from_stem(stem: &Path) -> Result<Self, SmpsError> {
        let cor = with_suffix(stem, "cor");
        let cor = if cor.exists() {
            cor
        } else {
            with_suffix(stem, "mps")
        };
        Self::from_paths(&cor, &with_suffix(stem, "tim"), &with_suffix(stem, "sto"))
    }

    /// Builds the two-stage program described by the three files.
    pub fn assemble(&self) -> Result<TwoStageStochasticProgram, SmpsError> {
        TwoStageStochasticProgram::try_from_smps(&self.cor, &self.tim, &self.sto)
    }

    pub fn get_cor(&self) -> &MatrixData {
        &self.cor
    }

    pub fn get_tim(&self) -> &TimeSectionData {
        &self.tim
    }

    pub fn get_sto(&self) -> &StochData {
        &self.sto
    }
}
