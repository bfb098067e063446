use std::fmt;

use ndarray::ArrayD;

use super::{Conv2d, Dense, Flatten, MaxPool2d};
use crate::{
    Result,
    arch::{
        activations::ActFn,
        spec::{LayerKind, LayerSpec},
    },
};

#[derive(Clone, Debug)]
pub enum Layer {
    Conv2d(Conv2d),
    MaxPool2d(MaxPool2d),
    Flatten(Flatten),
    Dense(Dense),
}
use Layer::*;

impl Layer {
    pub fn conv(
        name: impl Into<String>,
        dim: (usize, usize),
        kernel: usize,
        act_fn: Option<ActFn>,
    ) -> Self {
        Self::Conv2d(Conv2d::new(name, dim, kernel, 1, Default::default(), act_fn))
    }

    pub fn max_pool(name: impl Into<String>, kernel: usize, stride: usize) -> Self {
        Self::MaxPool2d(MaxPool2d::new(name, kernel, stride, Default::default()))
    }

    pub fn flatten(name: impl Into<String>) -> Self {
        Self::Flatten(Flatten::new(name))
    }

    pub fn dense(name: impl Into<String>, dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(name, dim, act_fn))
    }

    pub fn name(&self) -> &str {
        match self {
            Conv2d(l) => l.name(),
            MaxPool2d(l) => l.name(),
            Flatten(l) => l.name(),
            Dense(l) => l.name(),
        }
    }

    /// Returns the amount of parameters of the layer.
    pub fn size(&self) -> usize {
        match self {
            Conv2d(l) => l.size(),
            Dense(l) => l.size(),
            MaxPool2d(_) | Flatten(_) => 0,
        }
    }

    /// Returns the shape of every parameter slot of the layer, weights first.
    pub fn param_shapes(&self) -> Vec<Vec<usize>> {
        match self {
            Conv2d(l) => l.param_shapes(),
            Dense(l) => l.param_shapes(),
            MaxPool2d(_) | Flatten(_) => Vec::new(),
        }
    }

    /// Infers the output shape for a given input shape, both without the batch axis.
    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match self {
            Conv2d(l) => l.output_shape(input),
            MaxPool2d(l) => l.output_shape(input),
            Flatten(l) => l.output_shape(input),
            Dense(l) => l.output_shape(input),
        }
    }

    pub fn forward(&self, params: &[f32], x: ArrayD<f32>) -> Result<ArrayD<f32>> {
        match self {
            Conv2d(l) => l.forward(params, x),
            MaxPool2d(l) => l.forward(x),
            Flatten(l) => l.forward(x),
            Dense(l) => l.forward(params, x),
        }
    }
}

impl From<&LayerSpec> for Layer {
    fn from(spec: &LayerSpec) -> Self {
        let name = spec.name.clone();
        let dim = (spec.input_channels, spec.output_channels);

        match spec.kind {
            LayerKind::Conv => Self::Conv2d(Conv2d::new(
                name,
                dim,
                spec.kernel_size,
                spec.stride,
                spec.padding,
                spec.act_fn,
            )),
            LayerKind::Pool => Self::MaxPool2d(MaxPool2d::new(
                name,
                spec.kernel_size,
                spec.stride,
                spec.padding,
            )),
            LayerKind::Flatten => Self::Flatten(Flatten::new(name)),
            LayerKind::Dense => Self::Dense(Dense::new(name, dim, spec.act_fn)),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Conv2d(_) => LayerKind::Conv,
            MaxPool2d(_) => LayerKind::Pool,
            Flatten(_) => LayerKind::Flatten,
            Dense(_) => LayerKind::Dense,
        };

        write!(f, "{} ({kind})", self.name())
    }
}
