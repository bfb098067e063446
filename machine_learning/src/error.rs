use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use ndarray::ShapeError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    ShapeMismatch {
        layer: String,
        got: Vec<usize>,
        expected: String,
    },
    Layout(ShapeError),
    WeightShapeMismatch {
        layer: String,
        entry: String,
        got: Vec<usize>,
        expected: Vec<usize>,
    },
    UnsupportedArchive {
        path: PathBuf,
    },
    InvalidArchive {
        path: PathBuf,
        reason: String,
    },
    MalformedEntry {
        entry: String,
        reason: String,
    },
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    InvalidLabels {
        got: usize,
        expected: usize,
    },
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::Io { path, source } => {
                write!(f, "io error on '{}': {source}", path.display())
            }
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::ShapeMismatch {
                layer,
                got,
                expected,
            } => write!(
                f,
                "layer '{layer}' received an input of shape {got:?}, expected {expected}"
            ),
            MlErr::Layout(e) => write!(f, "array layout error: {e}"),
            MlErr::WeightShapeMismatch {
                layer,
                entry,
                got,
                expected,
            } => write!(
                f,
                "weight entry '{entry}' bound to layer '{layer}' has shape {got:?}, expected {expected:?}"
            ),
            MlErr::UnsupportedArchive { path } => write!(
                f,
                "unsupported weight archive '{}', expected a .npz or .safetensors file",
                path.display()
            ),
            MlErr::InvalidArchive { path, reason } => {
                write!(f, "invalid weight archive '{}': {reason}", path.display())
            }
            MlErr::MalformedEntry { entry, reason } => {
                write!(f, "malformed weight entry '{entry}': {reason}")
            }
            MlErr::Image { path, source } => {
                write!(f, "failed to read image '{}': {source}", path.display())
            }
            MlErr::InvalidLabels { got, expected } => write!(
                f,
                "the label table has {got} entries but the model predicts {expected} classes"
            ),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io { source, .. } => Some(source),
            MlErr::Image { source, .. } => Some(source),
            MlErr::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Layout(value)
    }
}
