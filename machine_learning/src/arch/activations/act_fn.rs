use std::fmt;

use super::Relu;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    Relu(Relu),
}

impl ActFn {
    pub fn relu() -> Self {
        ActFn::Relu(Relu::new())
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            ActFn::Relu(a) => a.f(x),
        }
    }

    /// Applies the activation in place over a raw buffer.
    pub fn apply(&self, xs: &mut [f32]) {
        xs.iter_mut().for_each(|x| *x = self.f(*x));
    }
}

impl fmt::Display for ActFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActFn::Relu(_) => write!(f, "relu"),
        }
    }
}
