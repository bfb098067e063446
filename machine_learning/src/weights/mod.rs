mod npz;
mod safetensor;

use std::{ffi::OsStr, path::Path};

use log::{debug, info};

use crate::{MlErr, Result};

/// A named array as read from an archive: name, shape and row-major data.
pub type NamedArray = (String, Vec<usize>, Vec<f32>);

/// The metadata of one array of a [`WeightSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightEntry {
    name: String,
    shape: Vec<usize>,
    offset: usize,
}

impl WeightEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The amount of values of the entry.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where the entry starts inside [`WeightSet::params`].
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Every pretrained array of a model, sorted by name and concatenated into one flat buffer.
///
/// Read only once loaded, the model takes its parameters positionally from [`WeightSet::params`].
#[derive(Clone, Debug, Default)]
pub struct WeightSet {
    entries: Vec<WeightEntry>,
    data: Vec<f32>,
}

impl WeightSet {
    /// Loads the arrays of a `.npz` or `.safetensors` archive.
    ///
    /// # Arguments
    /// * `path` - The archive's path, its extension picks the format.
    ///
    /// # Returns
    /// The sorted weight set or an error if the archive can't be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let arrays = match path.extension().and_then(OsStr::to_str) {
            Some("npz") => npz::read(path)?,
            Some("safetensors") => safetensor::read(path)?,
            _ => {
                return Err(MlErr::UnsupportedArchive {
                    path: path.to_path_buf(),
                });
            }
        };

        info!("read {} arrays from '{}'", arrays.len(), path.display());
        Self::from_arrays(arrays)
    }

    /// Builds a weight set out of named arrays, sorting them lexicographically by name.
    ///
    /// # Arguments
    /// * `arrays` - Tuples of name, shape and row-major data.
    ///
    /// # Returns
    /// A new `WeightSet`, or an error if an array's data doesn't fill its shape or a name repeats.
    pub fn from_arrays<I, S>(arrays: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<usize>, Vec<f32>)>,
        S: Into<String>,
    {
        let mut arrays: Vec<NamedArray> = arrays
            .into_iter()
            .map(|(name, shape, data)| (name.into(), shape, data))
            .collect();
        arrays.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(pair) = arrays.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(MlErr::MalformedEntry {
                entry: pair[0].0.clone(),
                reason: "the name appears more than once".into(),
            });
        }

        let total = arrays.iter().map(|(_, _, data)| data.len()).sum();
        let mut entries = Vec::with_capacity(arrays.len());
        let mut data = Vec::with_capacity(total);

        for (name, shape, values) in arrays {
            let expected: usize = shape.iter().product();
            if values.len() != expected {
                return Err(MlErr::MalformedEntry {
                    entry: name,
                    reason: format!(
                        "{} values can't fill the shape {shape:?} ({expected} values)",
                        values.len()
                    ),
                });
            }

            debug!("Loading {name} {shape:?}");
            entries.push(WeightEntry {
                name,
                shape,
                offset: data.len(),
            });
            data.extend(values);
        }

        Ok(Self { entries, data })
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    /// Every value of every entry, in entry order.
    pub fn params(&self) -> &[f32] {
        &self.data
    }

    /// The amount of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
