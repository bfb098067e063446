use std::fmt;

use super::{activations::ActFn, layers::Padding};

/// The kind of operation a [`LayerSpec`] declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Conv,
    Pool,
    Flatten,
    Dense,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayerKind::Conv => "conv",
            LayerKind::Pool => "pool",
            LayerKind::Flatten => "flatten",
            LayerKind::Dense => "dense",
        };

        write!(f, "{s}")
    }
}

/// The declarative description of a single layer of a network.
///
/// Pooling and flattening layers do not change (or do not care about) the channel count, their
/// `input_channels` and `output_channels` are zero and their shapes are inferred from whatever
/// flows into them.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    pub input_channels: usize,
    pub output_channels: usize,
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: Padding,
    pub act_fn: Option<ActFn>,
}

impl LayerSpec {
    /// A square 2D convolution over NHWC inputs.
    ///
    /// # Arguments
    /// * `name` - The layer's name.
    /// * `dim` - The input and output channels.
    /// * `kernel_size` - The side of the square kernel.
    /// * `stride` - The step between two consecutive windows.
    /// * `padding` - How the borders are handled.
    /// * `act_fn` - The activation applied after adding the bias, if any.
    pub fn conv(
        name: impl Into<String>,
        dim: (usize, usize),
        kernel_size: usize,
        stride: usize,
        padding: Padding,
        act_fn: Option<ActFn>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Conv,
            input_channels: dim.0,
            output_channels: dim.1,
            kernel_size,
            stride,
            padding,
            act_fn,
        }
    }

    /// A square max pooling window.
    pub fn pool(name: impl Into<String>, kernel_size: usize, stride: usize, padding: Padding) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Pool,
            input_channels: 0,
            output_channels: 0,
            kernel_size,
            stride,
            padding,
            act_fn: None,
        }
    }

    pub fn flatten(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Flatten,
            input_channels: 0,
            output_channels: 0,
            kernel_size: 0,
            stride: 0,
            padding: Padding::Valid,
            act_fn: None,
        }
    }

    /// A fully connected layer from `dim.0` input features to `dim.1` units.
    pub fn dense(name: impl Into<String>, dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Dense,
            input_channels: dim.0,
            output_channels: dim.1,
            kernel_size: 0,
            stride: 0,
            padding: Padding::Valid,
            act_fn,
        }
    }
}
