use std::{io::Write, path::Path, time::Instant};

use log::{debug, info};
use machine_learning::{
    Classifier, labels::Labels, prediction::Prediction, vision, weights::WeightSet,
};

use crate::{config::Config, error::ClassifyErr, report};

/// Loads the weights and labels named by the config and classifies its image with VGG-16.
///
/// # Arguments
/// * `config` - What to load and how many classes to keep.
/// * `out` - Where the report goes.
///
/// # Returns
/// The `config.top_k` most probable classes, most probable first.
pub fn run(config: &Config, out: &mut impl Write) -> Result<Vec<Prediction>, ClassifyErr> {
    let labels = match &config.labels {
        Some(path) => Labels::from_file(path)?,
        None => Labels::imagenet(),
    };

    info!("loading weights from '{}'", config.weights.display());
    let weights = WeightSet::load(&config.weights)?;
    let classifier = Classifier::vgg16(weights, labels)?;

    classify(&classifier, &config.image, config.top_k, out)
}

/// Classifies a single image file, reporting every stage to `out`.
pub fn classify(
    classifier: &Classifier,
    image: &Path,
    top_k: usize,
    out: &mut impl Write,
) -> Result<Vec<Prediction>, ClassifyErr> {
    report::params(out, classifier).map_err(ClassifyErr::Report)?;

    info!("loading image '{}'", image.display());
    let img = vision::load_image(image)?;
    debug!("image is {}x{}", img.width(), img.height());
    let x = classifier.prepare(&img)?;

    let shapes = classifier
        .model()
        .output_shapes(&classifier.input_shape())?;
    report::shapes(out, classifier.model(), &shapes).map_err(ClassifyErr::Report)?;

    let start = Instant::now();
    let probs = classifier.probabilities(&x)?;
    let elapsed = start.elapsed();
    info!("inference took {elapsed:?}");
    debug!("probabilities sum to {}", probs.sum());

    let top = classifier.top(probs.view(), top_k);
    report::elapsed(out, elapsed).map_err(ClassifyErr::Report)?;
    report::predictions(out, &top).map_err(ClassifyErr::Report)?;

    Ok(top)
}
