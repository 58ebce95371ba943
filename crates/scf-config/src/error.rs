use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to parse, or a value had the wrong type.
    #[error("failed to load settings: {0}")]
    Figment(Box<figment::Error>),

    /// A config file named on the command line does not exist.
    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A setting parsed but is unusable.
    #[error("invalid setting '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}
