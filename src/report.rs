//! The human readable run report.

use std::{
    io::{self, Write},
    time::Duration,
};

use machine_learning::{Classifier, arch::Sequential, prediction::Prediction};

/// One line per archive entry, the layer it is bound to and where its values start.
pub fn params(out: &mut impl Write, classifier: &Classifier) -> io::Result<()> {
    let mut entries = classifier.weights().entries().iter();

    for layer in classifier.model().layers() {
        for (_, entry) in layer.param_shapes().iter().zip(entries.by_ref()) {
            writeln!(
                out,
                "Loading {} {:?} into {} at {}",
                entry.name(),
                entry.shape(),
                layer.name(),
                entry.offset()
            )?;
        }
    }

    Ok(())
}

/// One line per layer with the shape of a single sample after it.
pub fn shapes(out: &mut impl Write, model: &Sequential, shapes: &[Vec<usize>]) -> io::Result<()> {
    for (layer, shape) in model.layers().iter().zip(shapes) {
        writeln!(out, "{layer} {shape:?}")?;
    }

    Ok(())
}

pub fn elapsed(out: &mut impl Write, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "inference took {elapsed:.3?}")
}

pub fn predictions(out: &mut impl Write, predictions: &[Prediction]) -> io::Result<()> {
    for prediction in predictions {
        writeln!(out, "{prediction}")?;
    }

    Ok(())
}
