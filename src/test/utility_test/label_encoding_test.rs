use super::*;

#[test]
fn test_to_categorical_with_explicit_classes() {
    let labels = array![6usize, 9, 9, 4, 1];
    let one_hot = to_categorical(&labels, Some(10)).unwrap();

    assert_eq!(one_hot.shape(), &[5, 10]);
    for (row, &label) in one_hot.rows().into_iter().zip(labels.iter()) {
        assert_eq!(row.sum(), 1.0);
        assert_eq!(row[label], 1.0);
    }
}

#[test]
fn test_to_categorical_infers_class_count() {
    let one_hot = to_categorical(&array![0usize, 2, 1], None).unwrap();
    assert_eq!(one_hot, array![[1.0f32, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);
}

#[test]
fn test_to_categorical_rejects_label_beyond_class_count() {
    assert!(to_categorical(&array![0usize, 10], Some(10)).is_err());
}

#[test]
fn test_to_categorical_empty_labels() {
    let empty = Array1::<usize>::zeros(0);
    assert_eq!(to_categorical(&empty, Some(10)).unwrap().shape(), &[0, 10]);
    assert_eq!(to_categorical(&empty, None).unwrap().shape(), &[0, 0]);
}

#[test]
fn test_sparse_categorical_inverts_one_hot() {
    let labels = Array1::from_shape_fn(50_000, |i| (i * 7) % 10);
    let one_hot = to_categorical(&labels, Some(10)).unwrap();

    assert_eq!(one_hot.shape(), &[50_000, 10]);
    assert_eq!(to_sparse_categorical(&one_hot), labels);
}

#[test]
fn test_sparse_categorical_of_probabilities() {
    let probs = array![[0.1f32, 0.7, 0.2], [0.4, 0.4, 0.2], [0.0, 0.1, 0.9]];
    assert_eq!(to_sparse_categorical(&probs.view()), array![1usize, 0, 2]);
}
