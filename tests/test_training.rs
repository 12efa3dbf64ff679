//! Integration test: training pipeline end-to-end

use rand::prelude::*;
use veloz::dataset::{Dataset, FeatureMap};
use veloz::error::VelozError;
use veloz::inference::MultiLabelModel;
use veloz::training::{Regularization, TrainEngine, TrainingConfig};

fn features(pairs: &[(&str, f64)]) -> FeatureMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// 100 examples of one feature "x": uniform in [-1, 1] labelled "false",
/// uniform in [5, 7] labelled "true".
fn separable_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::new();
    for _ in 0..50 {
        data.add_example("false", features(&[("x", rng.gen_range(-1.0..1.0))]));
        data.add_example("true", features(&[("x", rng.gen_range(5.0..7.0))]));
    }
    data
}

/// Three clusters: "x" around [-5, -3] labelled "blue", "x" around [5, 7]
/// labelled "green", and "y" around [3, 5] labelled "red".
fn three_cluster_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::new();
    for _ in 0..33 {
        data.add_example("blue", features(&[("x", rng.gen_range(-5.0..-3.0))]));
        data.add_example("green", features(&[("x", rng.gen_range(5.0..7.0))]));
        data.add_example("red", features(&[("y", rng.gen_range(3.0..5.0))]));
    }
    data
}

fn assert_two_class_behavior(model: &MultiLabelModel) {
    let probs = model.label_probabilities(&features(&[("x", 0.0)]));
    assert_eq!(probs.len(), 2, "two labels must yield exactly two entries");
    assert!(probs.contains_key("true") && probs.contains_key("false"));
    assert!(
        (probs["true"] + probs["false"] - 1.0).abs() < 1e-9,
        "two-label probabilities must sum to 1: {:?}",
        probs
    );
    assert!(
        probs["false"] > 0.5 && probs["false"] > probs["true"],
        "x = 0 should classify as false: {:?}",
        probs
    );
    assert_eq!(model.classify(&features(&[("x", 0.0)])), "false");

    let probs = model.label_probabilities(&features(&[("x", 6.0)]));
    assert!(
        probs["true"] > 0.5 && probs["true"] > probs["false"],
        "x = 6 should classify as true: {:?}",
        probs
    );
    assert_eq!(model.classify(&features(&[("x", 6.0)])), "true");
}

fn assert_three_cluster_behavior(model: &MultiLabelModel) {
    let probs = model.label_probabilities(&features(&[("x", -6.0)]));
    assert_eq!(probs.len(), 3, "three labels must yield exactly three entries");
    for (label, p) in &probs {
        assert!(*p > 0.0 && *p < 1.0, "probability for {} out of (0,1): {}", label, p);
    }
    assert!(
        probs["blue"] > 0.5 && probs["blue"] > probs["green"] && probs["blue"] > probs["red"],
        "x = -6 should rank blue highest: {:?}",
        probs
    );

    let probs = model.label_probabilities(&features(&[("x", 6.0)]));
    assert!(
        probs["green"] > 0.5 && probs["green"] > probs["blue"] && probs["green"] > probs["red"],
        "x = 6 should rank green highest: {:?}",
        probs
    );

    let probs = model.label_probabilities(&features(&[("y", 4.0)]));
    assert!(
        probs["red"] > 0.5 && probs["red"] > probs["blue"] && probs["red"] > probs["green"],
        "y = 4 should rank red highest: {:?}",
        probs
    );
}

#[test]
fn test_two_class_separable() {
    let data = separable_dataset(7);
    let result = TrainEngine::new(TrainingConfig::new()).fit(&data);
    assert!(result.is_ok(), "training should succeed: {:?}", result.err());
    let model = result.unwrap();

    assert_eq!(model.labels(), ["false", "true"]);
    assert_eq!(model.binary_models().len(), 1);
    assert_two_class_behavior(&model);
    assert!(
        model.accuracy() > 0.9,
        "cleanly separable data should cross-validate well, got {}",
        model.accuracy()
    );
}

#[test]
fn test_three_cluster_multiclass() {
    let data = three_cluster_dataset(11);
    let result = TrainEngine::new(TrainingConfig::new()).fit(&data);
    assert!(result.is_ok(), "training should succeed: {:?}", result.err());
    let model = result.unwrap();

    assert_eq!(model.labels(), ["blue", "green", "red"]);
    assert_eq!(model.binary_models().len(), 3);
    assert_three_cluster_behavior(&model);
}

#[test]
fn test_classify_returns_declared_label() {
    let data = three_cluster_dataset(3);
    let model = TrainEngine::new(TrainingConfig::new()).fit(&data).unwrap();

    let queries = [
        features(&[("x", 0.0)]),
        features(&[("y", -100.0)]),
        features(&[("x", 2.0), ("y", 2.0)]),
        features(&[("unseen", 1.0)]),
        FeatureMap::new(),
    ];
    for query in &queries {
        let label = model.classify(query);
        assert!(
            model.labels().iter().any(|l| l == label),
            "classify returned undeclared label '{}'",
            label
        );
    }
}

#[test]
fn test_accuracy_within_unit_interval() {
    let data = separable_dataset(19);
    let config = TrainingConfig::new().with_cv_folds(5);
    let model = TrainEngine::new(config).fit(&data).unwrap();
    assert!(
        (0.0..=1.0).contains(&model.accuracy()),
        "accuracy out of range: {}",
        model.accuracy()
    );
}

#[test]
fn test_training_is_deterministic() {
    let data = separable_dataset(23);
    let engine = TrainEngine::new(TrainingConfig::new());
    let first = engine.fit(&data).unwrap();
    let second = engine.fit(&data).unwrap();
    assert_eq!(
        first, second,
        "two fits of the same ordered examples must be bit-identical"
    );
}

#[test]
fn test_fixed_regularization_flow() {
    let data = separable_dataset(31);
    let config = TrainingConfig::new().with_regularization(Regularization::Fixed(0.25));
    let result = TrainEngine::new(config).fit(&data);
    assert!(result.is_ok(), "fixed-strength training should succeed: {:?}", result.err());
    assert_two_class_behavior(&result.unwrap());
}

#[test]
fn test_indicator_examples_train() {
    let mut data = Dataset::new();
    for _ in 0..10 {
        data.add_indicator_example("spam", ["lottery", "winner"]);
        data.add_indicator_example("ham", ["meeting", "agenda"]);
    }
    let model = TrainEngine::new(TrainingConfig::new()).fit(&data).unwrap();

    assert_eq!(model.classify(&features(&[("lottery", 1.0), ("winner", 1.0)])), "spam");
    assert_eq!(model.classify(&features(&[("meeting", 1.0), ("agenda", 1.0)])), "ham");
}

#[test]
fn test_constant_feature_is_harmless() {
    let mut rng = StdRng::seed_from_u64(41);
    let mut data = Dataset::new();
    for _ in 0..20 {
        data.add_example(
            "low",
            features(&[("x", rng.gen_range(-1.0..1.0)), ("flat", 3.0)]),
        );
        data.add_example(
            "high",
            features(&[("x", rng.gen_range(5.0..7.0)), ("flat", 3.0)]),
        );
    }
    let model = TrainEngine::new(TrainingConfig::new()).fit(&data).unwrap();

    assert_eq!(model.binary_models()[0].weights()["flat"], 0.0);
    let probs = model.label_probabilities(&features(&[("x", 6.0), ("flat", 3.0)]));
    for (label, p) in &probs {
        assert!(p.is_finite(), "probability for {} is not finite: {}", label, p);
    }
    assert_eq!(model.classify(&features(&[("x", 6.0), ("flat", 3.0)])), "high");
}

#[test]
fn test_empty_dataset_rejected() {
    let result = TrainEngine::new(TrainingConfig::new()).fit(&Dataset::new());
    assert!(matches!(result, Err(VelozError::DataError(_))), "got {:?}", result.err());
}

#[test]
fn test_single_label_rejected() {
    let mut data = Dataset::new();
    for i in 0..10 {
        data.add_example("only", features(&[("x", i as f64)]));
    }
    let result = TrainEngine::new(TrainingConfig::new()).fit(&data);
    assert!(matches!(result, Err(VelozError::ConfigError(_))), "got {:?}", result.err());
}

#[test]
fn test_invalid_parameters_rejected() {
    let data = separable_dataset(5);

    let bad_rate = TrainingConfig::new().with_learning_rate(0.0);
    let result = TrainEngine::new(bad_rate).fit(&data);
    assert!(matches!(result, Err(VelozError::InvalidParameter { .. })), "got {:?}", result.err());

    let bad_folds = TrainingConfig::new().with_cv_folds(1);
    let result = TrainEngine::new(bad_folds).fit(&data);
    assert!(matches!(result, Err(VelozError::InvalidParameter { .. })), "got {:?}", result.err());
}
