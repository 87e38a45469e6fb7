use super::*;

fn sample_input() -> Tensor {
    Array::from_shape_vec(
        (4, 3),
        vec![1.0, 2.0, 3.0, 5.0, 6.0, 9.0, 9.0, 10.0, 0.0, 13.0, 14.0, 4.0],
    )
    .unwrap()
    .into_dyn()
}

#[test]
fn test_batch_normalization_training_mode_normalizes_each_feature() {
    let mut bn = BatchNormalization::new(vec![3], 0.99, 1e-5).unwrap();
    let output = bn.forward(&sample_input()).unwrap();
    let output_2d = output.into_dimensionality::<Ix2>().unwrap();

    for feature in output_2d.columns() {
        let mean = feature.mean().unwrap();
        let variance = feature.mapv(|x| (x - mean).powi(2)).mean().unwrap();
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(variance, 1.0, epsilon = 1e-3);
    }
}

#[test]
fn test_batch_normalization_running_statistics_update() {
    let momentum = 0.9;
    let mut bn = BatchNormalization::new(vec![3], momentum, 1e-3).unwrap();
    let input = sample_input();
    bn.forward(&input).unwrap();

    let batch_mean = input.mean_axis(Axis(0)).unwrap();
    let batch_var = input
        .map_axis(Axis(0), |col| {
            let m = col.mean().unwrap();
            col.mapv(|x| (x - m).powi(2)).mean().unwrap()
        });

    for j in 0..3 {
        assert_relative_eq!(
            bn.running_mean()[[j]],
            (1.0 - momentum) * batch_mean[[j]],
            epsilon = 1e-5
        );
        assert_relative_eq!(
            bn.running_var()[[j]],
            momentum + (1.0 - momentum) * batch_var[[j]],
            epsilon = 1e-4
        );
    }
}

#[test]
fn test_batch_normalization_inference_uses_running_statistics() {
    let mut bn = BatchNormalization::with_defaults(vec![2]).unwrap();
    bn.set_weights(
        array![2.0f32, 0.5].into_dyn(),
        array![1.0f32, -1.0].into_dyn(),
        array![3.0f32, -2.0].into_dyn(),
        array![4.0f32, 0.25].into_dyn(),
    )
    .unwrap();
    bn.set_training(false);

    let input = array![[5.0f32, -1.0], [3.0, -2.0]].into_dyn();
    let output = bn.forward(&input).unwrap();

    let eps = DEFAULT_BATCH_NORM_EPSILON;
    assert_relative_eq!(output[[0, 0]], 2.0 * (5.0 - 3.0) / (4.0 + eps).sqrt() + 1.0, epsilon = 1e-5);
    assert_relative_eq!(output[[0, 1]], 0.5 * (-1.0 + 2.0) / (0.25 + eps).sqrt() - 1.0, epsilon = 1e-5);
    assert_relative_eq!(output[[1, 0]], 1.0, epsilon = 1e-5);
    assert_relative_eq!(output[[1, 1]], -1.0, epsilon = 1e-5);

    // Running statistics are frozen in inference mode
    assert_eq!(bn.running_mean(), &array![3.0f32, -2.0].into_dyn());
}

#[test]
fn test_batch_normalization_backward_matches_numerical_gradient() {
    let mut bn = BatchNormalization::new(vec![3], 0.99, 1e-3).unwrap();
    bn.set_weights(
        array![1.5f32, 0.7, -1.2].into_dyn(),
        array![0.1f32, 0.0, 0.3].into_dyn(),
        Tensor::zeros(IxDyn(&[3])),
        Tensor::ones(IxDyn(&[3])),
    )
    .unwrap();

    let input = array![[0.5f32, -1.0, 2.0], [1.5, 0.3, -0.7], [-0.8, 1.1, 0.4], [0.2, -0.4, 1.6]].into_dyn();
    let upstream = array![[1.0f32, -0.5, 0.2], [0.3, 0.9, -1.1], [-0.6, 0.4, 0.8], [0.7, -0.2, 0.5]].into_dyn();

    bn.forward(&input).unwrap();
    let analytic = bn.backward(&upstream).unwrap();

    let numeric = numerical_input_gradient(&mut bn, &input, &upstream, 1e-2);
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(a, n, epsilon = 2e-2);
    }
}

#[test]
fn test_batch_normalization_parameter_count_is_mixed() {
    let bn = BatchNormalization::with_defaults(vec![100]).unwrap();
    assert_eq!(
        bn.param_count(),
        TrainingParameters::Mixed {
            trainable: 200,
            non_trainable: 200
        }
    );
    assert_eq!(bn.layer_type(), "BatchNormalization");
    assert_eq!(bn.output_shape(), "(None, 100)");
}

#[test]
fn test_batch_normalization_sgd_moves_gamma_and_beta() {
    let mut bn = BatchNormalization::new(vec![3], 0.99, 1e-3).unwrap();
    let input = sample_input();
    bn.forward(&input).unwrap();
    bn.backward(&Tensor::ones(input.raw_dim())).unwrap();
    bn.update_parameters_sgd(0.1);

    match bn.get_weights() {
        LayerWeight::BatchNormalization(w) => {
            // d(sum)/d(beta) = batch size
            for &b in w.beta.iter() {
                assert_relative_eq!(b, -0.4, epsilon = 1e-6);
            }
            // sum of normalized values is zero
            for &g in w.gamma.iter() {
                assert_abs_diff_eq!(g, 1.0, epsilon = 1e-5);
            }
        }
        _ => panic!("Expected batch normalization weights"),
    }
}

#[test]
fn test_batch_normalization_rejects_invalid_input() {
    assert!(BatchNormalization::new(vec![3], 1.5, 1e-3).is_err());
    assert!(BatchNormalization::new(vec![3], 0.9, 0.0).is_err());
    assert!(BatchNormalization::new(vec![], 0.9, 1e-3).is_err());

    let mut bn = BatchNormalization::with_defaults(vec![3]).unwrap();
    assert!(bn.forward(&Tensor::zeros(IxDyn(&[4, 5]))).is_err());
    assert!(bn.forward(&Tensor::zeros(IxDyn(&[0, 3]))).is_err());
    assert!(
        bn.set_weights(
            Tensor::ones(IxDyn(&[2])),
            Tensor::zeros(IxDyn(&[3])),
            Tensor::zeros(IxDyn(&[3])),
            Tensor::ones(IxDyn(&[3])),
        )
        .is_err()
    );
}

#[test]
fn test_batch_normalization_accepts_any_batch_size() {
    let mut bn = BatchNormalization::with_defaults(vec![4]).unwrap();
    for batch in [2, 5, 33] {
        let input = Array2::from_shape_fn((batch, 4), |(i, j)| (i * 4 + j) as f32).into_dyn();
        assert_eq!(bn.forward(&input).unwrap().shape(), &[batch, 4]);
    }
}
