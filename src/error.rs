use std::{fmt, io, path::PathBuf};

use machine_learning::MlErr;

/// Everything that can stop a classification run.
#[derive(Debug)]
pub enum ClassifyErr {
    /// The model, its weights or the image failed.
    Ml(MlErr),
    /// A configuration value is out of range or malformed.
    InvalidConfig(String),
    ConfigFile {
        path: PathBuf,
        source: io::Error,
    },
    ConfigJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The report couldn't be written.
    Report(io::Error),
}

impl fmt::Display for ClassifyErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ml(e) => write!(f, "{e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::ConfigFile { path, source } => {
                write!(f, "cannot read config '{}': {source}", path.display())
            }
            Self::ConfigJson { path, source } => {
                write!(f, "invalid config '{}': {source}", path.display())
            }
            Self::Report(e) => write!(f, "cannot write the report: {e}"),
        }
    }
}

impl std::error::Error for ClassifyErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ml(e) => Some(e),
            Self::ConfigFile { source, .. } => Some(source),
            Self::ConfigJson { source, .. } => Some(source),
            Self::Report(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<MlErr> for ClassifyErr {
    fn from(e: MlErr) -> Self {
        Self::Ml(e)
    }
}

impl From<ClassifyErr> for io::Error {
    fn from(e: ClassifyErr) -> Self {
        match e {
            ClassifyErr::Report(e) => e,
            ClassifyErr::InvalidConfig(_) | ClassifyErr::ConfigJson { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
            e => io::Error::other(e),
        }
    }
}
