//! Error types shared by the configure, run and analysis tools.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, running or analyzing simulations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Filesystem error with the path that caused it.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dependency's version marker could not be read.
    #[error("could not determine INET version (from {path}): {source}")]
    VersionUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dependency's version marker did not match (strict mode only).
    #[error("unsupported INET version: expecting {expected}, found \"{found}\"")]
    VersionMismatch { expected: String, found: String },

    /// A line of the generated configuration file could not be parsed.
    #[error("malformed configuration line {line}: {message}")]
    MalformedConfig { line: usize, message: String },

    /// A mandatory key is absent from the generated configuration file.
    #[error("configuration key `{0}` is missing")]
    MissingConfigKey(&'static str),

    /// No `iterationvars2` attribute line in a scalar file.
    #[error("could not parse header information in file {0}")]
    HeaderNotFound(String),

    /// The `iterationvars2` line lacks a variable the experiment needs.
    #[error("could not parse iterationvars2 line of file {file}: missing ${variable}")]
    MissingIterationVariable { file: String, variable: String },

    /// End of file reached before both bit counters were seen.
    #[error("reached end of file {0} without finding the requested information")]
    BitCountsNotFound(String),

    /// A vector file line that is neither a declaration nor a sample.
    #[error("{file}:{line}: {message}")]
    MalformedVector {
        file: String,
        line: usize,
        message: String,
    },

    /// An external program could not be started or exited unsuccessfully.
    #[error("command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid results pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Generator parameters that cannot describe a valid placement.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown experiment `{0}`")]
    UnknownExperiment(String),

    /// No result files were found, or none held any received bits.
    #[error("no results to analyze in {0}")]
    NoResults(String),
}

impl Error {
    /// Wrap an I/O error together with the path being accessed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
