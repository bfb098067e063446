mod conv;
mod dense;
mod flatten;
mod layer;
mod padding;
mod pool;
mod test;

pub use conv::Conv2d;
pub use dense::Dense;
pub use flatten::Flatten;
pub use layer::Layer;
pub use padding::Padding;
pub use pool::MaxPool2d;
