use super::*;

#[test]
fn test_dropout_scales_kept_units() {
    let rate = 0.4;
    let mut dropout = Dropout::new(rate, vec![100]).unwrap();
    let input = Array2::<f32>::ones((50, 100)).into_dyn();
    let output = dropout.forward(&input).unwrap();

    let scale = 1.0 / (1.0 - rate);
    let mut zeros = 0;
    for &v in output.iter() {
        if v == 0.0 {
            zeros += 1;
        } else {
            assert_relative_eq!(v, scale, epsilon = 1e-6);
        }
    }
    // About 40% of 5000 units dropped
    assert!(zeros > 1700 && zeros < 2300, "dropped {} units", zeros);
}

#[test]
fn test_dropout_backward_uses_same_mask() {
    let mut dropout = Dropout::new(0.5, vec![20]).unwrap();
    let input = Array2::<f32>::ones((10, 20)).into_dyn();
    let output = dropout.forward(&input).unwrap();

    let grad = dropout.backward(&Array2::<f32>::ones((10, 20)).into_dyn()).unwrap();
    assert_eq!(grad, output);
}

#[test]
fn test_dropout_is_identity_in_inference_mode() {
    let mut dropout = Dropout::new(0.5, vec![4]).unwrap();
    dropout.set_training(false);

    let input = array![[1.0f32, 2.0, 3.0, 4.0]].into_dyn();
    assert_eq!(dropout.forward(&input).unwrap(), input);
    assert_eq!(dropout.backward(&input).unwrap(), input);
}

#[test]
fn test_dropout_zero_rate_passes_through() {
    let mut dropout = Dropout::new(0.0, vec![3]).unwrap();
    let input = array![[1.0f32, -2.0, 3.0]].into_dyn();
    assert_eq!(dropout.forward(&input).unwrap(), input);
    assert_eq!(dropout.backward(&input).unwrap(), input);
}

#[test]
fn test_dropout_validation() {
    assert!(Dropout::new(1.0, vec![3]).is_err());
    assert!(Dropout::new(-0.2, vec![3]).is_err());
    assert!(Dropout::new(0.2, vec![0]).is_err());

    let mut dropout = Dropout::new(0.2, vec![3]).unwrap();
    assert!(dropout.forward(&Array2::<f32>::zeros((2, 4)).into_dyn()).is_err());

    dropout.forward(&Array2::<f32>::zeros((2, 3)).into_dyn()).unwrap();
    assert!(dropout.backward(&Array2::<f32>::zeros((5, 3)).into_dyn()).is_err());

    assert_eq!(dropout.rate(), 0.2);
    assert_eq!(dropout.param_count(), TrainingParameters::NoTrainable);
}
