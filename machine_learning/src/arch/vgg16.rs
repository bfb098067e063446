//! The VGG-16 topology from "Very Deep Convolutional Networks for Large-Scale Image Recognition"
//! (Simonyan & Zisserman): 13 convolutions in 5 blocks, each block closed by a 2x2 max pooling,
//! followed by 3 fully connected layers.

use super::{LayerSpec, Sequential, activations::ActFn, layers::Padding};

/// The `[h, w, c]` shape of a single input image.
pub const INPUT_SHAPE: [usize; 3] = [224, 224, 3];

/// The amount of ImageNet classes the network predicts.
pub const NUM_CLASSES: usize = 1000;

/// Output channels of every convolution of each block.
const BLOCKS: [&[usize]; 5] = [
    &[64, 64],
    &[128, 128],
    &[256, 256, 256],
    &[512, 512, 512],
    &[512, 512, 512],
];

const HIDDEN_UNITS: usize = 4096;

/// Declares every layer of the network, in order.
pub fn topology() -> Vec<LayerSpec> {
    let mut specs = Vec::new();
    let mut channels = INPUT_SHAPE[2];
    let mut side = INPUT_SHAPE[0];

    for (b, block) in BLOCKS.iter().enumerate() {
        for (c, &out) in block.iter().enumerate() {
            specs.push(LayerSpec::conv(
                format!("conv{}_{}", b + 1, c + 1),
                (channels, out),
                3,
                1,
                Padding::Same,
                Some(ActFn::relu()),
            ));
            channels = out;
        }

        specs.push(LayerSpec::pool(
            format!("pool{}", b + 1),
            2,
            2,
            Padding::Same,
        ));
        side = side.div_ceil(2);
    }

    let features = side * side * channels;
    specs.extend([
        LayerSpec::flatten("flatten"),
        LayerSpec::dense("fc1_relu", (features, HIDDEN_UNITS), Some(ActFn::relu())),
        LayerSpec::dense("fc2_relu", (HIDDEN_UNITS, HIDDEN_UNITS), Some(ActFn::relu())),
        LayerSpec::dense("fc3_relu", (HIDDEN_UNITS, NUM_CLASSES), None),
    ]);

    specs
}

pub fn model() -> Sequential {
    Sequential::from_specs(&topology())
}
