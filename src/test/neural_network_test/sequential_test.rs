use super::*;

fn cluster_model(n_features: usize) -> Sequential {
    let mut model = Sequential::new();
    model
        .add(Dense::new(n_features, 8, ELU::new(1.0), KernelInitializer::HeUniform).unwrap())
        .add(Dense::new(8, 2, Softmax::new(), KernelInitializer::GlorotUniform).unwrap())
        .compile(Nadam::with_learning_rate(0.01).unwrap(), CategoricalCrossEntropy::new());
    model
}

#[test]
fn test_fit_learns_separable_clusters() {
    let (x, y) = two_cluster_data(64, 4);
    let mut model = cluster_model(4);

    let history = model.fit(&x, &y, 15, 8).unwrap();

    assert_eq!(history.len(), 15);
    assert_eq!(history.stop_reason, StopReason::Budget);
    assert!(history.losses()[14] < history.losses()[0]);
    assert!(history.val_losses().iter().all(Option::is_none));
    // Without validation data the best epoch is the one with the lowest training loss
    assert_eq!(history.best_epoch, history.lowest_monitored_epoch());

    let (loss, accuracy) = model.evaluate(&x, &y, 16).unwrap();
    assert!(loss < 0.2, "loss {}", loss);
    assert_relative_eq!(accuracy, 1.0);
}

#[test]
fn test_fit_records_validation_metrics() {
    let (x, y) = two_cluster_data(40, 3);
    let (x_val, y_val) = two_cluster_data(10, 3);
    let mut model = cluster_model(3);

    let history = model
        .fit_with_validation(&x, &y, Some((&x_val, &y_val)), 4, 7, None)
        .unwrap();

    assert_eq!(history.len(), 4);
    for (i, m) in history.epochs.iter().enumerate() {
        assert_eq!(m.epoch, i);
        assert!(m.val_loss.is_some() && m.val_accuracy.is_some());
        assert!((0.0..=1.0).contains(&m.accuracy));
    }

    // The last epoch's validation metrics match a fresh evaluation
    let (val_loss, val_accuracy) = model.evaluate(&x_val, &y_val, 7).unwrap();
    let last = history.last().unwrap();
    assert_relative_eq!(last.val_loss.unwrap(), val_loss, epsilon = 1e-6);
    assert_relative_eq!(last.val_accuracy.unwrap(), val_accuracy);
}

#[test]
fn test_early_stopping_restores_best_weights() {
    let (x, y) = two_cluster_data(48, 4);
    // Validation labels are flipped, so validation loss rises while training improves
    let (x_val, y_flipped) = {
        let (x_val, y_val) = two_cluster_data(16, 4);
        let flipped = y_val.mapv(|v| 1.0 - v);
        (x_val, flipped)
    };
    let patience = 2;
    let mut model = cluster_model(4);

    let history = model
        .fit_with_validation(
            &x,
            &y,
            Some((&x_val, &y_flipped)),
            30,
            8,
            Some(EarlyStopping::new(patience, 0.0, true)),
        )
        .unwrap();

    assert_eq!(history.stop_reason, StopReason::Patience);
    let best = history.best_epoch.unwrap();
    assert_eq!(history.len(), best + patience + 1);

    let best_val_loss = history.epochs[best].val_loss.unwrap();
    assert!(history.epochs.iter().all(|m| m.val_loss.unwrap() >= best_val_loss));

    // The model holds the weights of the best epoch, not the last one
    let (val_loss, _) = model.evaluate(&x_val, &y_flipped, 8).unwrap();
    assert_relative_eq!(val_loss, best_val_loss, epsilon = 1e-5);
}

#[test]
fn test_early_stopping_without_restore_keeps_last_weights() {
    let (x, y) = two_cluster_data(48, 4);
    let (x_val, y_val) = two_cluster_data(16, 4);
    let y_flipped = y_val.mapv(|v| 1.0 - v);
    let mut model = cluster_model(4);

    let history = model
        .fit_with_validation(
            &x,
            &y,
            Some((&x_val, &y_flipped)),
            30,
            8,
            Some(EarlyStopping::new(1, 0.0, false)),
        )
        .unwrap();

    assert_eq!(history.stop_reason, StopReason::Patience);
    let (val_loss, _) = model.evaluate(&x_val, &y_flipped, 8).unwrap();
    assert_relative_eq!(val_loss, history.last().unwrap().val_loss.unwrap(), epsilon = 1e-5);
}

#[test]
fn test_uncompiled_model_is_not_fitted() {
    let (x, y) = two_cluster_data(8, 2);
    let mut model = Sequential::new();
    model.add(Dense::new(2, 2, Softmax::new(), KernelInitializer::GlorotUniform).unwrap());

    assert!(!model.is_compiled());
    assert!(matches!(model.fit(&x, &y, 1, 4), Err(ModelError::NotFitted)));
    assert!(matches!(model.evaluate(&x, &y, 4), Err(ModelError::NotFitted)));
    // Prediction needs no optimizer
    assert_eq!(model.predict(&x).unwrap().shape(), &[8, 2]);
}

#[test]
fn test_fit_rejects_invalid_data() {
    let (x, y) = two_cluster_data(8, 3);
    let mut model = cluster_model(3);

    assert!(model.fit(&x, &y, 1, 0).is_err());
    assert!(model.fit(&x, &cyclic_one_hot(7, 2), 1, 4).is_err());
    assert!(model.fit(&x, &cyclic_one_hot(8, 3), 1, 4).is_err());
    assert!(model.fit(&Array2::<f32>::zeros((8, 5)).into_dyn(), &y, 1, 4).is_err());
    assert!(model.predict(&Array2::<f32>::zeros((0, 3)).into_dyn()).is_err());
    assert!(Sequential::new().predict(&x).is_err());
}

#[test]
fn test_zero_epochs_returns_empty_history() {
    let (x, y) = two_cluster_data(8, 2);
    let mut model = cluster_model(2);
    let history = model.fit(&x, &y, 0, 4).unwrap();

    assert!(history.is_empty());
    assert_eq!(history.best_epoch, None);
}

#[test]
fn test_predict_outputs_probabilities() {
    let (x, _) = two_cluster_data(5, 3);
    let mut model = cluster_model(3);
    let predictions = model.predict(&x).unwrap();

    assert_eq!(predictions.shape(), &[5, 2]);
    for row in predictions.rows() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_summary_lists_layers_and_parameters() {
    let mut model = Sequential::new();
    model
        .add(Flatten::new(vec![4, 4, 3]).unwrap())
        .add(BatchNormalization::with_defaults(vec![48]).unwrap())
        .add(Dense::new(48, 10, SELU::new(), KernelInitializer::LecunNormal).unwrap())
        .add(AlphaDropout::new(0.1, vec![10]).unwrap())
        .add(Dense::new(10, 10, Softmax::new(), KernelInitializer::GlorotUniform).unwrap());

    let summary = model.summary_string();
    assert!(summary.starts_with("Model: \"sequential\""));
    assert!(summary.contains("flatten (Flatten)"));
    assert!(summary.contains("batchnormalization_1 (BatchNormalization)"));
    assert!(summary.contains("dense_2 (Dense)"));
    assert!(summary.contains("alphadropout_3 (AlphaDropout)"));
    assert!(summary.contains("(None, 48)"));

    let trainable = 96 + 48 * 10 + 10 + 10 * 10 + 10;
    assert!(summary.contains(&format!(" Total params: {} ", trainable + 96)));
    assert!(summary.contains(&format!(" Trainable params: {} ", trainable)));
    assert!(summary.ends_with(" Non-trainable params: 96 (384 B)"));

    assert_eq!(
        model.param_count(),
        TrainingParameters::Mixed {
            trainable,
            non_trainable: 96
        }
    );
    assert_eq!(
        model.layer_types(),
        vec!["Flatten", "BatchNormalization", "Dense", "AlphaDropout", "Dense"]
    );
}

#[test]
fn test_save_and_load_round_trip() {
    let (x, y) = two_cluster_data(16, 3);
    let mut model = cluster_model(3);
    model.fit(&x, &y, 2, 4).unwrap();
    let expected = model.predict(&x).unwrap();

    let path = std::env::temp_dir().join(format!("cifar_dnn_model_{}.json", std::process::id()));
    let path = path.to_string_lossy().to_string();
    model.save_to_path(&path).unwrap();

    let mut restored = cluster_model(3);
    restored.load_from_path(&path).unwrap();
    assert_eq!(restored.predict(&x).unwrap(), expected);

    // Same layer count, different layer kinds
    let mut mismatched = Sequential::new();
    mismatched
        .add(Flatten::new(vec![3]).unwrap())
        .add(Dense::new(3, 2, Softmax::new(), KernelInitializer::GlorotUniform).unwrap());
    assert!(mismatched.load_from_path(&path).is_err());

    std::fs::remove_file(&path).unwrap();
}
