pub mod arch;
mod classifier;
pub mod error;
pub mod labels;
pub mod prediction;
pub mod vision;
pub mod weights;

pub use classifier::Classifier;
pub use error::{MlErr, Result};
