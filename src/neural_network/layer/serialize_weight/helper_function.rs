use crate::error::IoError;
use ndarray::{Array2, ArrayD};

pub(super) fn vec2_to_array2(vec: &[Vec<f32>]) -> Result<Array2<f32>, IoError> {
    let rows = vec.len();
    let cols = if rows > 0 { vec[0].len() } else { 0 };
    if vec.iter().any(|row| row.len() != cols) {
        return Err(IoError::invalid_data("Ragged rows in stored matrix"));
    }
    let flat: Vec<f32> = vec.iter().flat_map(|row| row.iter().cloned()).collect();
    Array2::from_shape_vec((rows, cols), flat).map_err(|e| IoError::invalid_data(e.to_string()))
}

pub(super) fn vec_to_tensor(shape: &[usize], values: &[f32]) -> Result<ArrayD<f32>, IoError> {
    ArrayD::from_shape_vec(shape, values.to_vec()).map_err(|e| IoError::invalid_data(e.to_string()))
}
