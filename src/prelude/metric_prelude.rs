pub use crate::metric::{categorical_accuracy, correct_predictions};
