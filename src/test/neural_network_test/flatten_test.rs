use super::*;

#[test]
fn test_flatten_image_batch() {
    let mut flatten = Flatten::new(vec![32, 32, 3]).unwrap();
    let input = Array4::<f32>::from_shape_fn((2, 32, 32, 3), |(n, h, w, c)| {
        (n * 3072 + h * 96 + w * 3 + c) as f32
    })
    .into_dyn();

    let output = flatten.forward(&input).unwrap();
    assert_eq!(output.shape(), &[2, 3072]);
    // Row-major order is preserved
    assert_eq!(output[[0, 0]], 0.0);
    assert_eq!(output[[0, 3071]], 3071.0);
    assert_eq!(output[[1, 5]], 3077.0);

    let grad = flatten.backward(&output).unwrap();
    assert_eq!(grad, input);
}

#[test]
fn test_flatten_metadata() {
    let flatten = Flatten::new(vec![32, 32, 3]).unwrap();
    assert_eq!(flatten.output_dim(), 3072);
    assert_eq!(flatten.output_shape(), "(None, 3072)");
    assert_eq!(flatten.layer_type(), "Flatten");
    assert_eq!(flatten.param_count(), TrainingParameters::NoTrainable);
}

#[test]
fn test_flatten_rejects_wrong_shapes() {
    assert!(Flatten::new(vec![]).is_err());
    assert!(Flatten::new(vec![32, 0, 3]).is_err());

    let mut flatten = Flatten::new(vec![4, 4]).unwrap();
    assert!(flatten.forward(&Array3::<f32>::zeros((2, 4, 5)).into_dyn()).is_err());
    assert!(flatten.backward(&Array2::<f32>::zeros((2, 16)).into_dyn()).is_err());
}

#[test]
fn test_flatten_accepts_already_flat_input() {
    let mut flatten = Flatten::new(vec![6]).unwrap();
    let input = Array2::<f32>::ones((3, 6)).into_dyn();
    assert_eq!(flatten.forward(&input).unwrap(), input);
}
