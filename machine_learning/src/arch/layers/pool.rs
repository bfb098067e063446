use ndarray::prelude::*;
use rayon::prelude::*;

use super::padding::{Padding, taps};
use crate::{MlErr, Result};

/// Max pooling over square windows of NHWC inputs. Padded positions never win the max.
#[derive(Clone, Debug)]
pub struct MaxPool2d {
    name: String,
    kernel: usize,
    stride: usize,
    padding: Padding,
}

impl MaxPool2d {
    pub fn new(name: impl Into<String>, kernel: usize, stride: usize, padding: Padding) -> Self {
        Self {
            name: name.into(),
            kernel,
            stride,
            padding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let ((oh, _), (ow, _), c) = self.geometry(input)?;
        Ok(vec![oh, ow, c])
    }

    pub fn forward(&self, x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let ((oh, pad_top), (ow, pad_left), c) =
            self.geometry(x.shape().get(1..).unwrap_or_default())?;
        let x = x.into_dimensionality::<Ix4>()?;
        let x = x.as_standard_layout();
        let src = x.as_slice().ok_or_else(|| self.shape_err(x.shape()))?;
        let (n, h, w, _) = x.dim();
        let (k, s) = (self.kernel, self.stride);

        let mut out = vec![f32::NEG_INFINITY; n * oh * ow * c];
        out.par_chunks_mut(c).enumerate().for_each(|(i, px)| {
            let (b, pos) = (i / (oh * ow), i % (oh * ow));
            let (oy, ox) = (pos / ow, pos % ow);

            for (_, iy) in taps(oy, s, pad_top, k, h) {
                for (_, ix) in taps(ox, s, pad_left, k, w) {
                    let from = ((b * h + iy) * w + ix) * c;
                    px.iter_mut()
                        .zip(&src[from..from + c])
                        .for_each(|(m, &v)| *m = m.max(v));
                }
            }
        });

        Ok(ArrayD::from_shape_vec(IxDyn(&[n, oh, ow, c]), out)?)
    }

    #[allow(clippy::type_complexity)]
    fn geometry(&self, input: &[usize]) -> Result<((usize, usize), (usize, usize), usize)> {
        let &[h, w, c] = input else {
            return Err(self.shape_err(input));
        };

        if c == 0 {
            return Err(self.shape_err(input));
        }

        let (k, s) = (self.kernel, self.stride);
        let rows = self
            .padding
            .window(h, k, s)
            .ok_or_else(|| self.shape_err(input))?;
        let cols = self
            .padding
            .window(w, k, s)
            .ok_or_else(|| self.shape_err(input))?;

        Ok((rows, cols, c))
    }

    fn shape_err(&self, got: &[usize]) -> MlErr {
        MlErr::ShapeMismatch {
            layer: self.name.clone(),
            got: got.to_vec(),
            expected: "[h >= 1, w >= 1, c >= 1]".into(),
        }
    }
}
