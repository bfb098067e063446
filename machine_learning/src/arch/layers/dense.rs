use ndarray::{linalg, prelude::*};

use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer, `act(x · w + b)`.
///
/// The parameters are laid out as the weights `[in, out]` followed by the biases `[out]`.
#[derive(Clone, Debug)]
pub struct Dense {
    name: String,
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,
}

impl Dense {
    /// Creates a new `Dense`.
    ///
    /// # Arguments
    /// * `name` - The layer's name.
    /// * `dim` - The amount of input features and output units.
    /// * `act_fn` - The activation function, `None` leaves the logits untouched.
    ///
    /// # Returns
    /// A new `Dense` instance.
    pub fn new(name: impl Into<String>, dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            name: name.into(),
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn param_shapes(&self) -> Vec<Vec<usize>> {
        vec![vec![self.dim.0, self.dim.1], vec![self.dim.1]]
    }

    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match input {
            &[features] if features == self.dim.0 => Ok(vec![self.dim.1]),
            _ => Err(self.shape_err(input)),
        }
    }

    pub fn forward(&self, params: &[f32], x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.output_shape(x.shape().get(1..).unwrap_or_default())?;
        let x = x.into_dimensionality::<Ix2>()?;
        let (w, b) = self.view_params(params)?;

        let mut z = Array2::zeros((x.nrows(), self.dim.1));
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut z);
        z += &b;

        if let Some(act_fn) = &self.act_fn {
            z.mapv_inplace(|z| act_fn.f(z));
        }

        Ok(z.into_dyn())
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// A tuple containing the weights and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        if params.len() != self.size {
            return Err(MlErr::SizeMismatch {
                what: "dense parameters",
                got: params.len(),
                expected: self.size,
            });
        }

        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size])?;
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..])?;
        Ok((weights, biases))
    }

    fn shape_err(&self, got: &[usize]) -> MlErr {
        MlErr::ShapeMismatch {
            layer: self.name.clone(),
            got: got.to_vec(),
            expected: format!("[{}]", self.dim.0),
        }
    }
}
