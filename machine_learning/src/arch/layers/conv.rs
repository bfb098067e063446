use ndarray::{linalg, prelude::*};
use rayon::prelude::*;

use super::padding::{Padding, taps};
use crate::{MlErr, Result, arch::activations::ActFn};

/// The spatial bookkeeping of one convolution call.
#[derive(Clone, Copy, Debug)]
struct Geometry {
    h: usize,
    w: usize,
    c: usize,
    oh: usize,
    ow: usize,
    pad_top: usize,
    pad_left: usize,
}

/// A square 2D convolution over NHWC inputs, computed as im2col followed by a single matrix
/// multiplication per image.
///
/// The parameters are laid out as the weights `[k, k, in, out]` followed by the biases `[out]`.
#[derive(Clone, Debug)]
pub struct Conv2d {
    name: String,
    dim: (usize, usize),
    kernel: usize,
    stride: usize,
    padding: Padding,
    act_fn: Option<ActFn>,
    size: usize,
}

impl Conv2d {
    /// Creates a new `Conv2d`.
    ///
    /// # Arguments
    /// * `name` - The layer's name.
    /// * `dim` - The input and output channels.
    /// * `kernel` - The side of the square kernel.
    /// * `stride` - The step between two consecutive windows.
    /// * `padding` - How the borders are handled.
    /// * `act_fn` - The activation applied after the bias, if any.
    ///
    /// # Returns
    /// A new `Conv2d` instance.
    pub fn new(
        name: impl Into<String>,
        dim: (usize, usize),
        kernel: usize,
        stride: usize,
        padding: Padding,
        act_fn: Option<ActFn>,
    ) -> Self {
        Self {
            name: name.into(),
            dim,
            kernel,
            stride,
            padding,
            act_fn,
            size: kernel * kernel * dim.0 * dim.1 + dim.1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn param_shapes(&self) -> Vec<Vec<usize>> {
        let k = self.kernel;
        vec![vec![k, k, self.dim.0, self.dim.1], vec![self.dim.1]]
    }

    /// Infers the `[h, w, c]` output shape of this layer for a `[h, w, c]` input.
    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let geo = self.geometry(input)?;
        Ok(vec![geo.oh, geo.ow, self.dim.1])
    }

    /// Makes a forward pass through the layer.
    ///
    /// # Arguments
    /// * `params` - This layer's parameters.
    /// * `x` - A `[n, h, w, in]` batch.
    ///
    /// # Returns
    /// The `[n, oh, ow, out]` feature maps.
    pub fn forward(&self, params: &[f32], x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let geo = self.geometry(x.shape().get(1..).unwrap_or_default())?;
        let x = x.into_dimensionality::<Ix4>()?;
        let x = x.as_standard_layout();
        let src = x.as_slice().ok_or_else(|| self.shape_err(x.shape()))?;
        let (weights, biases) = self.view_params(params)?;

        let n = x.len_of(Axis(0));
        let cout = self.dim.1;
        let rows = geo.oh * geo.ow;
        let cols = self.kernel * self.kernel * geo.c;

        let mut out = vec![0.0; n * rows * cout];
        let mut patches = vec![0.0; rows * cols];

        for (img, dst) in src
            .chunks_exact(geo.h * geo.w * geo.c)
            .zip(out.chunks_exact_mut(rows * cout))
        {
            self.im2col(img, geo, &mut patches);

            let a = ArrayView2::from_shape((rows, cols), &patches[..])?;
            let mut z = ArrayViewMut2::from_shape((rows, cout), dst)?;
            linalg::general_mat_mul(1.0, &a, &weights, 0.0, &mut z);
        }

        out.par_chunks_mut(cout).for_each(|z| {
            z.iter_mut().zip(biases).for_each(|(z, b)| *z += b);

            if let Some(act_fn) = &self.act_fn {
                act_fn.apply(z);
            }
        });

        Ok(ArrayD::from_shape_vec(IxDyn(&[n, geo.oh, geo.ow, cout]), out)?)
    }

    /// Writes one row per output pixel holding its receptive field in `(ky, kx, c)` order, which
    /// matches the row-major layout of the `[k, k, in, out]` weights. Out of bounds taps are zero.
    fn im2col(&self, img: &[f32], geo: Geometry, patches: &mut [f32]) {
        let (k, s, c) = (self.kernel, self.stride, geo.c);

        patches
            .par_chunks_mut(k * k * c)
            .enumerate()
            .for_each(|(i, patch)| {
                patch.fill(0.0);
                let (oy, ox) = (i / geo.ow, i % geo.ow);

                for (ky, iy) in taps(oy, s, geo.pad_top, k, geo.h) {
                    for (kx, ix) in taps(ox, s, geo.pad_left, k, geo.w) {
                        let from = (iy * geo.w + ix) * c;
                        let to = (ky * k + kx) * c;
                        patch[to..to + c].copy_from_slice(&img[from..from + c]);
                    }
                }
            });
    }

    fn geometry(&self, input: &[usize]) -> Result<Geometry> {
        let &[h, w, c] = input else {
            return Err(self.shape_err(input));
        };

        if c != self.dim.0 || c == 0 || self.dim.1 == 0 {
            return Err(self.shape_err(input));
        }

        let (k, s) = (self.kernel, self.stride);
        let (oh, pad_top) = self
            .padding
            .window(h, k, s)
            .ok_or_else(|| self.shape_err(input))?;
        let (ow, pad_left) = self
            .padding
            .window(w, k, s)
            .ok_or_else(|| self.shape_err(input))?;

        Ok(Geometry {
            h,
            w,
            c,
            oh,
            ow,
            pad_top,
            pad_left,
        })
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer, the
    /// weights flattened to `[k * k * in, out]`.
    fn view_params<'a>(&self, params: &'a [f32]) -> Result<(ArrayView2<'a, f32>, &'a [f32])> {
        if params.len() != self.size {
            return Err(MlErr::SizeMismatch {
                what: "convolution parameters",
                got: params.len(),
                expected: self.size,
            });
        }

        let w_size = self.size - self.dim.1;
        let rows = self.kernel * self.kernel * self.dim.0;
        let weights = ArrayView2::from_shape((rows, self.dim.1), &params[..w_size])?;
        Ok((weights, &params[w_size..]))
    }

    fn shape_err(&self, got: &[usize]) -> MlErr {
        MlErr::ShapeMismatch {
            layer: self.name.clone(),
            got: got.to_vec(),
            expected: format!("[h >= 1, w >= 1, {}]", self.dim.0),
        }
    }
}
