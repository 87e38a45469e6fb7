/// One-hot encoding of integer class labels and its arg-max inverse
pub mod label_encoding;
/// Per-feature z-score scaling fitted on a training split
pub mod standardize;
