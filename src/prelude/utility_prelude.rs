pub use crate::utility::label_encoding::{to_categorical, to_sparse_categorical};
pub use crate::utility::standardize::Standardizer;
