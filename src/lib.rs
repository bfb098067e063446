pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use error::ClassifyErr;
