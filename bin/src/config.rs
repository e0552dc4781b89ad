//! Settings for the `extract` command, merged from a YAML file and the command line.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pipeline::{batch::BatchConfig, tabula_wrapper::ExtractionMode};
use serde::Deserialize;

/// Directory searched for templates when none is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "./templates/new_format";
/// Report written when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "./output.xlsx";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max index must be at least 1, got {0}")]
    InvalidMaxIndex(u32),
    #[error("PDF file not found at {0:?}")]
    PdfNotFound(PathBuf),
    #[error("no Tabula library path given, set --tabula-libpath or tabula_libpath in the config")]
    MissingTabulaLibpath,
}

/// Settings that may be given in a configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub template_dir: Option<PathBuf>,
    pub template_extension: Option<String>,
    pub max_index: Option<u32>,
    pub output: Option<PathBuf>,
    pub mode: Option<ExtractionMode>,
    pub tabula_libpath: Option<String>,
}

impl FileConfig {
    /// Loads the configuration from the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening configuration file {path:?}"))?;
        serde_yaml_ng::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("parsing configuration file {path:?}"))
    }

    /// Returns a copy of `self` with every value set in `overrides` replacing the value in `self`.
    pub fn overridden_by(self, overrides: FileConfig) -> Self {
        Self {
            template_dir: overrides.template_dir.or(self.template_dir),
            template_extension: overrides.template_extension.or(self.template_extension),
            max_index: overrides.max_index.or(self.max_index),
            output: overrides.output.or(self.output),
            mode: overrides.mode.or(self.mode),
            tabula_libpath: overrides.tabula_libpath.or(self.tabula_libpath),
        }
    }

    /// Fills in defaults and validates the settings for extracting tables from `pdf_path`.
    pub fn resolve(self, pdf_path: PathBuf) -> Result<ExtractSettings, ConfigError> {
        if !pdf_path.exists() {
            return Err(ConfigError::PdfNotFound(pdf_path));
        }
        let tabula_libpath = self
            .tabula_libpath
            .ok_or(ConfigError::MissingTabulaLibpath)?;

        let template_dir = self
            .template_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));
        let mut batch = BatchConfig::new(pdf_path, template_dir);
        if let Some(max_index) = self.max_index {
            if max_index == 0 {
                return Err(ConfigError::InvalidMaxIndex(max_index));
            }
            batch.max_index = max_index;
        }
        if let Some(template_extension) = self.template_extension {
            batch.template_extension = template_extension;
        }
        if let Some(mode) = self.mode {
            batch.extraction_mode = mode;
        }

        Ok(ExtractSettings {
            batch,
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            tabula_libpath,
        })
    }
}

/// Complete settings for a single run of the `extract` command.
#[derive(Debug, PartialEq)]
pub struct ExtractSettings {
    pub batch: BatchConfig,
    pub output: PathBuf,
    pub tabula_libpath: String,
}
