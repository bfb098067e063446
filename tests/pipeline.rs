use std::{fs, path::PathBuf};

use image::{Rgb, RgbImage};
use machine_learning::{
    Classifier, MlErr,
    arch::{Sequential, activations::ActFn, layers::Layer},
    labels::Labels,
    weights::WeightSet,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use vgg16::{ClassifyErr, Config, pipeline};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("vgg16-pipeline-{}-{name}", std::process::id()))
}

fn tiny_classifier() -> Classifier {
    let model = Sequential::new([
        Layer::conv("conv1", (3, 4), 3, Some(ActFn::relu())),
        Layer::max_pool("pool1", 2, 2),
        Layer::flatten("flatten"),
        Layer::dense("fc", (64, 6), None),
    ]);

    let mut rng = StdRng::seed_from_u64(7);
    let mut random = |len: usize| -> Vec<f32> {
        (0..len).map(|_| rng.random_range(-0.1..0.1)).collect()
    };

    let weights = WeightSet::from_arrays([
        ("conv1_W", vec![3, 3, 3, 4], random(108)),
        ("conv1_b", vec![4], random(4)),
        ("fc_W", vec![64, 6], random(384)),
        ("fc_b", vec![6], random(6)),
    ])
    .unwrap();

    let labels = Labels::new(["tench", "goldfish", "shark", "hen", "ostrich", "weasel"]);

    Classifier::new(model, weights, labels, [8, 8, 3]).unwrap()
}

fn write_image(name: &str) -> PathBuf {
    let path = temp_path(name);
    RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 128]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn test_classify_reports_every_stage() {
    let classifier = tiny_classifier();
    let image = write_image("report.png");
    let mut out = Vec::new();

    let top = pipeline::classify(&classifier, &image, 5, &mut out).unwrap();
    fs::remove_file(&image).unwrap();

    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].probability >= w[1].probability));

    let report = String::from_utf8(out).unwrap();
    let lines: Vec<_> = report.lines().collect();

    assert_eq!(lines[0], "Loading conv1_W [3, 3, 3, 4] into conv1 at 0");
    assert_eq!(lines[3], "Loading fc_b [6] into fc at 496");
    assert_eq!(lines[4], "conv1 (conv) [8, 8, 4]");
    assert_eq!(lines[7], "fc (dense) [6]");
    assert!(lines[8].starts_with("inference took"));
    assert_eq!(lines.len(), 9 + 5);
    assert_eq!(lines[9], top[0].to_string());
}

#[test]
fn test_classify_is_deterministic() {
    let classifier = tiny_classifier();
    let image = write_image("twice.png");

    let a = pipeline::classify(&classifier, &image, 6, &mut Vec::new()).unwrap();
    let b = pipeline::classify(&classifier, &image, 6, &mut Vec::new()).unwrap();
    fs::remove_file(&image).unwrap();

    assert_eq!(a, b);
    let total: f32 = a.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-5);
}

#[test]
fn test_classify_missing_image() {
    let classifier = tiny_classifier();

    let err = pipeline::classify(&classifier, &temp_path("missing.png"), 5, &mut Vec::new())
        .unwrap_err();

    assert!(matches!(err, ClassifyErr::Ml(MlErr::Image { .. })));
}

#[test]
fn test_run_missing_weights() {
    let config = Config {
        weights: temp_path("missing.npz"),
        ..Config::default()
    };

    let err = pipeline::run(&config, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, ClassifyErr::Ml(MlErr::Io { .. })));
}

#[test]
#[ignore = "needs vgg16_weights.npz and data/laska.png in the working directory"]
fn test_laska_is_a_weasel() {
    let top = pipeline::run(&Config::default(), &mut std::io::sink()).unwrap();

    assert_eq!(top.len(), 5);
    assert_eq!(top[0].label, "weasel");
}
