use ndarray::prelude::*;

use crate::{MlErr, Result};

/// Collapses every non batch axis into one, keeping the row-major `(h, w, c)` order.
#[derive(Clone, Debug)]
pub struct Flatten {
    name: String,
}

impl Flatten {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        if input.is_empty() || input.contains(&0) {
            return Err(MlErr::ShapeMismatch {
                layer: self.name.clone(),
                got: input.to_vec(),
                expected: "a non empty shape".into(),
            });
        }

        Ok(vec![input.iter().product()])
    }

    pub fn forward(&self, x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let features = self.output_shape(x.shape().get(1..).unwrap_or_default())?[0];
        let n = x.len_of(Axis(0));

        let x = if x.is_standard_layout() {
            x
        } else {
            x.as_standard_layout().into_owned()
        };

        Ok(x.into_shape_with_order(IxDyn(&[n, features]))?)
    }
}
