use super::*;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};

#[test]
fn test_alpha_dropout_affine_correction_constants() {
    let dropout = AlphaDropout::new(0.1, vec![4]).unwrap();
    let (a, b) = dropout.affine_correction();

    assert_relative_eq!(a, 0.921_284_5, epsilon = 1e-5);
    assert_relative_eq!(b, 0.161_970_97, epsilon = 1e-5);
}

#[test]
fn test_alpha_dropout_is_identity_in_inference_mode() {
    let mut dropout = AlphaDropout::new(0.3, vec![5]).unwrap();
    dropout.set_training(false);
    assert!(!dropout.is_training());

    let input = Array2::<f32>::random((8, 5), Uniform::new(-2.0, 2.0)).into_dyn();
    assert_eq!(dropout.forward(&input).unwrap(), input);

    let grad = Array2::<f32>::ones((8, 5)).into_dyn();
    assert_eq!(dropout.backward(&grad).unwrap(), grad);
}

#[test]
fn test_alpha_dropout_training_output_values() {
    let mut dropout = AlphaDropout::new(0.2, vec![50]).unwrap();
    let (a, b) = dropout.affine_correction();
    let dropped_value = a * (-SELU_SCALE * SELU_ALPHA) + b;

    // Non-negative inputs can never map to the dropped value
    let input = Array2::<f32>::random((40, 50), Uniform::new(0.0, 1.0)).into_dyn();
    let output = dropout.forward(&input).unwrap();

    let mut dropped = 0;
    for (&x, &y) in input.iter().zip(output.iter()) {
        if (y - dropped_value).abs() < 1e-5 {
            dropped += 1;
        } else {
            assert_relative_eq!(y, a * x + b, epsilon = 1e-5);
        }
    }

    // About 20% of 2000 units are dropped
    assert!(dropped > 250 && dropped < 550, "dropped {} units", dropped);
}

#[test]
fn test_alpha_dropout_preserves_zero_mean_unit_variance() {
    let mut dropout = AlphaDropout::new(0.1, vec![1000]).unwrap();
    let input = Array2::<f32>::random((50, 1000), StandardNormal).into_dyn();

    let output = dropout.forward(&input).unwrap();
    let mean = output.mean().unwrap();
    let var = output.mapv(|v| (v - mean).powi(2)).mean().unwrap();

    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(var, 1.0, epsilon = 0.05);
}

#[test]
fn test_alpha_dropout_backward_scales_kept_units() {
    let mut dropout = AlphaDropout::new(0.25, vec![30]).unwrap();
    let (a, b) = dropout.affine_correction();
    let dropped_value = a * (-SELU_SCALE * SELU_ALPHA) + b;

    let input = Array2::<f32>::random((20, 30), Uniform::new(0.0, 1.0)).into_dyn();
    let output = dropout.forward(&input).unwrap();

    let upstream = Array2::<f32>::random((20, 30), Uniform::new(-1.0, 1.0)).into_dyn();
    let grad = dropout.backward(&upstream).unwrap();

    for ((&y, &g), &u) in output.iter().zip(grad.iter()).zip(upstream.iter()) {
        if (y - dropped_value).abs() < 1e-5 {
            assert_eq!(g, 0.0);
        } else {
            assert_relative_eq!(g, u * a, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_alpha_dropout_rejects_invalid_configuration() {
    assert!(AlphaDropout::new(1.0, vec![10]).is_err());
    assert!(AlphaDropout::new(-0.1, vec![10]).is_err());
    assert!(AlphaDropout::new(0.1, vec![]).is_err());

    let mut dropout = AlphaDropout::new(0.1, vec![10]).unwrap();
    let wrong = Array2::<f32>::zeros((4, 9)).into_dyn();
    assert!(dropout.forward(&wrong).is_err());
}

#[test]
fn test_alpha_dropout_accepts_any_batch_size() {
    let mut dropout = AlphaDropout::new(0.1, vec![6]).unwrap();
    for batch in [1, 7, 32] {
        let input = Array2::<f32>::zeros((batch, 6)).into_dyn();
        assert_eq!(dropout.forward(&input).unwrap().shape(), &[batch, 6]);
    }
}
