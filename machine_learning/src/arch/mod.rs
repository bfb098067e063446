pub mod activations;
pub mod layers;
mod params;
mod sequential;
mod spec;
pub mod vgg16;

pub use params::ParamIter;
pub use sequential::Sequential;
pub use spec::{LayerKind, LayerSpec};
