use super::*;

#[test]
fn test_elu_forward_values() {
    let x = array![[-2.0f32, -0.5, 0.0, 0.5, 3.0]].into_dyn();
    let mut elu = ELU::new(1.0);
    let output = elu.forward(&x).unwrap();

    assert_relative_eq!(output[[0, 0]], (-2.0f32).exp() - 1.0, epsilon = 1e-6);
    assert_relative_eq!(output[[0, 1]], (-0.5f32).exp() - 1.0, epsilon = 1e-6);
    assert_eq!(output[[0, 2]], 0.0);
    assert_eq!(output[[0, 3]], 0.5);
    assert_eq!(output[[0, 4]], 3.0);
}

#[test]
fn test_elu_custom_alpha_saturates_at_minus_alpha() {
    let x = array![[-50.0f32]].into_dyn();
    let mut elu = ELU::new(0.5);
    let output = elu.forward(&x).unwrap();
    assert_relative_eq!(output[[0, 0]], -0.5, epsilon = 1e-6);
}

#[test]
fn test_elu_backward_matches_numerical_gradient() {
    let x = array![[-1.5f32, -0.2, 0.3, 2.0], [0.7, -0.9, 1.1, -3.0]].into_dyn();
    let upstream = array![[1.0f32, -2.0, 0.5, 1.5], [0.3, 0.8, -1.0, 2.0]].into_dyn();

    let mut elu = ELU::new(1.0);
    elu.forward(&x).unwrap();
    let analytic = elu.backward(&upstream).unwrap();

    let numeric = numerical_input_gradient(&mut elu, &x, &upstream, 1e-3);
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(a, n, epsilon = 1e-2);
    }
}

#[test]
fn test_selu_forward_uses_fixed_constants() {
    let x = array![[1.0f32, 0.0, -1.0, -40.0]].into_dyn();
    let mut selu = SELU::new();
    let output = selu.forward(&x).unwrap();

    assert_relative_eq!(output[[0, 0]], SELU_SCALE, epsilon = 1e-6);
    assert_eq!(output[[0, 1]], 0.0);
    assert_relative_eq!(
        output[[0, 2]],
        SELU_SCALE * SELU_ALPHA * ((-1.0f32).exp() - 1.0),
        epsilon = 1e-6
    );
    // Saturates at -scale * alpha
    assert_relative_eq!(output[[0, 3]], -SELU_SCALE * SELU_ALPHA, epsilon = 1e-5);
}

#[test]
fn test_selu_keeps_standard_normal_moments_roughly() {
    // Symmetric grid approximating a standard normal sample
    let n = 2001;
    let values: Vec<f32> = (0..n)
        .map(|i| {
            let p = (i as f32 + 0.5) / n as f32;
            // Logistic approximation of the normal quantile
            (p / (1.0 - p)).ln() / 1.702
        })
        .collect();
    let x = Array2::from_shape_vec((1, n), values).unwrap().into_dyn();

    let mut selu = SELU::new();
    let output = selu.forward(&x).unwrap();
    let mean = output.mean().unwrap();
    let var = output.mapv(|v| (v - mean).powi(2)).mean().unwrap();

    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.1);
    assert_abs_diff_eq!(var, 1.0, epsilon = 0.2);
}

#[test]
fn test_selu_backward_matches_numerical_gradient() {
    let x = array![[-1.0f32, -0.1, 0.4, 1.7]].into_dyn();
    let upstream = array![[0.5f32, 1.0, -1.0, 2.0]].into_dyn();

    let mut selu = SELU::new();
    selu.forward(&x).unwrap();
    let analytic = selu.backward(&upstream).unwrap();

    let numeric = numerical_input_gradient(&mut selu, &x, &upstream, 1e-3);
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(a, n, epsilon = 1e-2);
    }
}

#[test]
fn test_softmax_rows_are_distributions() {
    let x = array![[1.0f32, 2.0, 3.0], [1000.0, 1000.0, 1000.0], [-5.0, 0.0, 5.0]].into_dyn();
    let mut softmax = Softmax::new();
    let output = softmax.forward(&x).unwrap();

    for row in output.rows() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-5);
        assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
    // Large equal logits don't overflow
    assert_relative_eq!(output[[1, 0]], 1.0 / 3.0, epsilon = 1e-5);
    // Ordering preserved
    assert!(output[[0, 2]] > output[[0, 1]] && output[[0, 1]] > output[[0, 0]]);
}

#[test]
fn test_softmax_backward_matches_numerical_gradient() {
    let x = array![[0.2f32, -0.4, 1.0], [1.5, 0.1, -0.3]].into_dyn();
    let upstream = array![[1.0f32, 0.0, -1.0], [0.5, 2.0, 0.0]].into_dyn();

    let mut softmax = Softmax::new();
    softmax.forward(&x).unwrap();
    let analytic = softmax.backward(&upstream).unwrap();

    let numeric = numerical_input_gradient(&mut softmax, &x, &upstream, 1e-3);
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(a, n, epsilon = 1e-2);
    }
}

#[test]
fn test_linear_is_identity() {
    let x = array![[1.0f32, -2.0], [3.5, 0.0]].into_dyn();
    let mut linear = Linear::new();
    assert_eq!(linear.forward(&x).unwrap(), x);

    let grad = array![[0.1f32, 0.2], [0.3, 0.4]].into_dyn();
    assert_eq!(linear.backward(&grad).unwrap(), grad);
}

#[test]
fn test_activation_backward_before_forward_fails() {
    let grad = array![[1.0f32, 1.0]].into_dyn();
    assert!(ELU::new(1.0).backward(&grad).is_err());
    assert!(SELU::new().backward(&grad).is_err());
    assert!(Softmax::new().backward(&grad).is_err());
}

#[test]
fn test_activation_layers_have_no_parameters() {
    assert_eq!(ELU::default().param_count(), TrainingParameters::NoTrainable);
    assert_eq!(SELU::default().param_count(), TrainingParameters::NoTrainable);
    assert_eq!(Softmax::default().param_count(), TrainingParameters::NoTrainable);
    assert!(matches!(Linear::default().get_weights(), LayerWeight::Empty));
}
