use std::{collections::HashMap, fs, path::PathBuf};

use vgg16::{ClassifyErr, Config, config};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = Config::resolve(vars(&[])).unwrap();

    assert_eq!(config.weights, PathBuf::from("vgg16_weights.npz"));
    assert_eq!(config.image, PathBuf::from("data/laska.png"));
    assert_eq!(config.labels, None);
    assert_eq!(config.top_k, 5);
}

#[test]
fn test_env_overrides() {
    let config = Config::resolve(vars(&[
        (config::WEIGHTS_VAR, "/models/vgg16.safetensors"),
        (config::IMAGE_VAR, "cat.png"),
        (config::LABELS_VAR, "labels.txt"),
        (config::TOP_K_VAR, " 3 "),
    ]))
    .unwrap();

    assert_eq!(config.weights, PathBuf::from("/models/vgg16.safetensors"));
    assert_eq!(config.image, PathBuf::from("cat.png"));
    assert_eq!(config.labels, Some(PathBuf::from("labels.txt")));
    assert_eq!(config.top_k, 3);
}

#[test]
fn test_invalid_top_k() {
    for top_k in ["0", "five", "-1"] {
        let err = Config::resolve(vars(&[(config::TOP_K_VAR, top_k)])).unwrap_err();
        assert!(matches!(err, ClassifyErr::InvalidConfig(_)), "{top_k}");
    }
}

#[test]
fn test_merge_json_keeps_missing_fields() {
    let config = Config::default()
        .merge_json(r#"{ "image": "dog.png", "top_k": 10 }"#)
        .unwrap();

    assert_eq!(config.weights, PathBuf::from(config::DEFAULT_WEIGHTS));
    assert_eq!(config.image, PathBuf::from("dog.png"));
    assert_eq!(config.top_k, 10);
}

#[test]
fn test_merge_json_rejects_unknown_fields() {
    let result = Config::default().merge_json(r#"{ "topk": 10 }"#);

    assert!(result.is_err());
}

#[test]
fn test_env_overrides_config_file() {
    let path = std::env::temp_dir().join(format!("vgg16-config-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{ "weights": "from_file.npz", "image": "from_file.png" }"#,
    )
    .unwrap();

    let config = Config::resolve(vars(&[
        (config::CONFIG_VAR, path.to_str().unwrap()),
        (config::IMAGE_VAR, "from_env.png"),
    ]))
    .unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.weights, PathBuf::from("from_file.npz"));
    assert_eq!(config.image, PathBuf::from("from_env.png"));
}

#[test]
fn test_missing_config_file() {
    let err = Config::resolve(vars(&[(config::CONFIG_VAR, "/nonexistent/vgg16.json")]))
        .unwrap_err();

    assert!(matches!(err, ClassifyErr::ConfigFile { .. }));

    let err: std::io::Error = err.into();
    assert!(err.to_string().contains("vgg16.json"));
}
