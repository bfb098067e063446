use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::Deserialize;

use crate::error::ClassifyErr;

pub const DEFAULT_WEIGHTS: &str = "vgg16_weights.npz";
pub const DEFAULT_IMAGE: &str = "data/laska.png";
pub const DEFAULT_TOP_K: usize = 5;

pub const CONFIG_VAR: &str = "VGG16_CONFIG";
pub const WEIGHTS_VAR: &str = "VGG16_WEIGHTS";
pub const IMAGE_VAR: &str = "VGG16_IMAGE";
pub const LABELS_VAR: &str = "VGG16_LABELS";
pub const TOP_K_VAR: &str = "VGG16_TOP_K";

/// What to classify and with which weights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub weights: PathBuf,
    pub image: PathBuf,
    /// A label file replacing the embedded ImageNet classes.
    pub labels: Option<PathBuf>,
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.into(),
            image: DEFAULT_IMAGE.into(),
            labels: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// The JSON config file, every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    weights: Option<PathBuf>,
    image: Option<PathBuf>,
    labels: Option<PathBuf>,
    top_k: Option<usize>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ClassifyErr> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Builds the configuration out of the defaults, then the JSON file named by
    /// [`CONFIG_VAR`] if any, then the remaining variables.
    ///
    /// # Arguments
    /// * `var` - Looks a variable up by name.
    ///
    /// # Returns
    /// The configuration or the first invalid value found.
    pub fn resolve<F>(var: F) -> Result<Self, ClassifyErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = var(CONFIG_VAR) {
            config = config.merge_file(path)?;
        }

        if let Some(weights) = var(WEIGHTS_VAR) {
            config.weights = weights.into();
        }
        if let Some(image) = var(IMAGE_VAR) {
            config.image = image.into();
        }
        if let Some(labels) = var(LABELS_VAR) {
            config.labels = Some(labels.into());
        }
        if let Some(top_k) = var(TOP_K_VAR) {
            config.top_k = top_k.trim().parse().map_err(|_| {
                ClassifyErr::InvalidConfig(format!(
                    "{TOP_K_VAR} must be a positive integer, got '{top_k}'"
                ))
            })?;
        }

        config.validate()
    }

    /// Overrides the fields present in a JSON config file.
    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self, ClassifyErr> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ClassifyErr::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        info!("reading config from '{}'", path.display());
        self.merge_json(&content)
            .map_err(|source| ClassifyErr::ConfigJson {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Overrides the fields present in a JSON document, unknown fields are rejected.
    pub fn merge_json(self, json: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(json)?;

        Ok(Self {
            weights: file.weights.unwrap_or(self.weights),
            image: file.image.unwrap_or(self.image),
            labels: file.labels.or(self.labels),
            top_k: file.top_k.unwrap_or(self.top_k),
        })
    }

    pub fn validate(self) -> Result<Self, ClassifyErr> {
        if self.top_k == 0 {
            return Err(ClassifyErr::InvalidConfig(
                "top_k must be greater than 0".into(),
            ));
        }

        Ok(self)
    }
}
