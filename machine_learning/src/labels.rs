use std::{fs, path::Path};

use crate::{MlErr, Result};

const IMAGENET_CLASSES: &str = include_str!("../data/imagenet_classes.txt");

/// Human readable class names, indexed by class id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The 1000 ImageNet classes of the ILSVRC 2012 challenge.
    pub fn imagenet() -> Self {
        Self::parse(IMAGENET_CLASSES)
    }

    /// One label per line, the class id being the line number.
    ///
    /// Blank lines inside the text still take a class id so that a stray one shows up as a
    /// label count mismatch instead of shifting every label after it. Trailing blank lines are
    /// ignored.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let len = lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);

        Self::new(lines.into_iter().take(len))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MlErr::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&text))
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
