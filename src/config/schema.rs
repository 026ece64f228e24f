use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Decimals used for the file flow when neither config nor CLI sets one.
pub const DEFAULT_PRECISION: u32 = 2;

/// Directory upload results land in when no output path is given.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// output:
///   precision: 2
///   results_dir: results
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output defaults for the file flow.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Decimal places the downloadable result is rounded to (default: 2)
    #[serde(default)]
    pub precision: Option<u32>,

    /// Where `upload` writes `result.json` when no output path is given
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
}

impl OutputConfig {
    pub fn effective_precision(&self) -> u32 {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }

    pub fn effective_results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR))
    }
}
