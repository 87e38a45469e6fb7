use super::*;

fn dense_with_gradient() -> Dense<Linear> {
    let mut dense = Dense::new(2, 2, Linear::new(), KernelInitializer::GlorotUniform).unwrap();
    dense
        .set_weights(array![[0.5f32, -0.5], [1.0, 0.0]], array![[0.0f32, 0.0]])
        .unwrap();
    let x = array![[1.0f32, 2.0]].into_dyn();
    dense.forward(&x).unwrap();
    dense.backward(&array![[1.0f32, -1.0]].into_dyn()).unwrap();
    dense
}

#[test]
fn test_nadam_first_step_size() {
    let lr = 0.01;
    let mut nadam = Nadam::with_learning_rate(lr).unwrap();
    let mut dense = dense_with_gradient();

    nadam.step();
    nadam.update(&mut dense);
    assert_eq!(nadam.iterations(), 1);

    // With zero moments, the first Nadam step is lr * (b1 * 0.1 / (1 - b1^2) + 1) * sign(g)
    let factor = DEFAULT_BETA1 * (1.0 - DEFAULT_BETA1) / (1.0 - DEFAULT_BETA1.powi(2)) + 1.0;
    let step = lr * factor;
    // grad_w = x^T . g = [[1, -1], [2, -2]], grad_b = [1, -1]
    let expected_w = array![[0.5 - step, -0.5 + step], [1.0 - step, 0.0 + step]];
    for (a, e) in dense.weights().iter().zip(expected_w.iter()) {
        assert_relative_eq!(a, e, epsilon = 1e-5);
    }
    assert_relative_eq!(dense.bias()[[0, 0]], -step, epsilon = 1e-5);
    assert_relative_eq!(dense.bias()[[0, 1]], step, epsilon = 1e-5);
}

#[test]
fn test_adam_first_step_is_learning_rate() {
    let mut adam = Adam::new(0.1, 0.9, 0.999, 1e-7).unwrap();
    let mut dense = dense_with_gradient();

    adam.step();
    adam.update(&mut dense);

    assert_relative_eq!(dense.weights()[[0, 0]], 0.4, epsilon = 1e-5);
    assert_relative_eq!(dense.weights()[[1, 1]], 0.1, epsilon = 1e-5);
    assert_eq!(adam.name(), "Adam");
}

#[test]
fn test_sgd_update() {
    let mut sgd = SGD::new(0.5).unwrap();
    let mut dense = dense_with_gradient();
    sgd.update(&mut dense);

    assert_relative_eq!(dense.weights()[[1, 0]], 1.0 - 0.5 * 2.0, epsilon = 1e-6);
    assert_relative_eq!(dense.bias()[[0, 1]], 0.5, epsilon = 1e-6);
    assert_eq!(sgd.learning_rate(), 0.5);
}

#[test]
fn test_optimizer_skips_layers_without_gradients() {
    let mut nadam = Nadam::default();
    let mut dense = Dense::new(2, 2, Linear::new(), KernelInitializer::GlorotUniform).unwrap();
    let before = dense.weights().clone();

    nadam.step();
    nadam.update(&mut dense);
    assert_eq!(dense.weights(), &before);
}

#[test]
fn test_nadam_moments_persist_across_steps() {
    let mut nadam = Nadam::with_learning_rate(0.01).unwrap();
    let mut dense = dense_with_gradient();
    nadam.step();
    nadam.update(&mut dense);
    let after_first = dense.weights()[[0, 0]];

    // Same gradient again: the update keeps the same direction
    let x = array![[1.0f32, 2.0]].into_dyn();
    dense.forward(&x).unwrap();
    dense.backward(&array![[1.0f32, -1.0]].into_dyn()).unwrap();
    nadam.step();
    nadam.update(&mut dense);

    assert!(dense.weights()[[0, 0]] < after_first);
    assert_eq!(nadam.iterations(), 2);
}

#[test]
fn test_optimizer_validation_and_defaults() {
    assert!(Nadam::with_learning_rate(0.0).is_err());
    assert!(Nadam::with_learning_rate(f32::NAN).is_err());
    assert!(Nadam::new(1e-3, 1.0, 0.999, 1e-7).is_err());
    assert!(Nadam::new(1e-3, 0.9, 0.999, 0.0).is_err());
    assert!(Adam::new(-1.0, 0.9, 0.999, 1e-7).is_err());
    assert!(SGD::new(f32::INFINITY).is_err());

    let nadam = Nadam::default();
    assert_eq!(nadam.learning_rate(), DEFAULT_LEARNING_RATE);
    assert_eq!(nadam.iterations(), 0);
    assert_eq!(nadam.name(), "Nadam");
}
