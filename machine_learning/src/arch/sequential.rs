use log::{debug, warn};
use ndarray::ArrayD;

use super::{ParamIter, layers::Layer, spec::LayerSpec};
use crate::{MlErr, Result, weights::WeightSet};

/// A sequential model: information flows forward through its layers, each one taking its
/// parameters positionally from a flat buffer.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Builds the model declared by a list of layer specifications.
    pub fn from_specs<'a, I>(specs: I) -> Self
    where
        I: IntoIterator<Item = &'a LayerSpec>,
    {
        Self::new(specs.into_iter().map(Layer::from))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the amount of parameters in the model.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Layer::size).sum()
    }

    /// Walks the layers inferring every output shape without computing anything.
    ///
    /// # Arguments
    /// * `input` - The shape of a single sample, without the batch axis.
    ///
    /// # Returns
    /// One shape per layer, or the first shape mismatch found.
    pub fn output_shapes(&self, input: &[usize]) -> Result<Vec<Vec<usize>>> {
        let mut shape = input.to_vec();

        self.layers
            .iter()
            .map(|layer| {
                shape = layer.output_shape(&shape)?;
                Ok(shape.clone())
            })
            .collect()
    }

    /// Checks that the sorted archive entries line up with the parameter slots of the layers.
    ///
    /// Entries are bound positionally, so the amount of entries and every shape must match the
    /// slot they land on. A weight and bias pair whose names don't share a stem is accepted but
    /// reported, since it usually means the archive sorts in an unexpected order.
    ///
    /// # Returns
    /// The amount of layers whose entries don't share a name stem, or the first binding error.
    pub fn check_weights(&self, weights: &WeightSet) -> Result<usize> {
        let nslots: usize = self.layers.iter().map(|l| l.param_shapes().len()).sum();
        if nslots != weights.len() {
            return Err(MlErr::SizeMismatch {
                what: "weight entries",
                got: weights.len(),
                expected: nslots,
            });
        }

        let mut entries = weights.entries().iter();
        let mut misnamed = 0;

        for layer in &self.layers {
            let shapes = layer.param_shapes();
            let bound: Vec<_> = entries.by_ref().take(shapes.len()).collect();

            for (entry, expected) in bound.iter().zip(&shapes) {
                if entry.shape() != expected.as_slice() {
                    return Err(MlErr::WeightShapeMismatch {
                        layer: layer.name().to_string(),
                        entry: entry.name().to_string(),
                        got: entry.shape().to_vec(),
                        expected: expected.clone(),
                    });
                }

                debug!(
                    "binding {} {:?} to {}",
                    entry.name(),
                    entry.shape(),
                    layer.name()
                );
            }

            if let [first, rest @ ..] = bound.as_slice() {
                let name_stem = stem(first.name());
                if let Some(other) = rest.iter().find(|e| stem(e.name()) != name_stem) {
                    misnamed += 1;
                    warn!(
                        "layer {} is bound to '{}' and '{}', which look like different layers",
                        layer.name(),
                        first.name(),
                        other.name()
                    );
                }
            }
        }

        Ok(misnamed)
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `params` - Every parameter of the model, in layer order.
    /// * `x` - The input batch.
    ///
    /// # Returns
    /// The output of the last layer or an error if occurred.
    pub fn forward(&self, params: &[f32], mut x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let mut front = ParamIter::new(params);
        let nlayers = self.layers.len();

        for (i, layer) in self.layers.iter().enumerate() {
            let params = front.next(layer.size()).ok_or(MlErr::SizeMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            x = layer.forward(params, x)?;
        }

        if front.remaining() != 0 {
            return Err(MlErr::SizeMismatch {
                what: "parameters",
                got: params.len(),
                expected: self.size(),
            });
        }

        Ok(x)
    }
}

/// `conv1_1_W` -> `conv1_1`, `fc6.bias` -> `fc6`.
fn stem(name: &str) -> &str {
    name.rsplit_once(['_', '.']).map_or(name, |(stem, _)| stem)
}
