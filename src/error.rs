use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Error types that can occur during model operations
///
/// # Variants
///
/// - `NotFitted` - Indicates that the model has not been compiled or trained yet
/// - `InputValidationError` - Indicates the input data provided does not meet the expected format, type, or validation rules
/// - `ProcessingError` - Indicates that something went wrong while processing
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    InputValidationError(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotFitted => {
                write!(
                    f,
                    "Model has not been compiled. Training and evaluation require an optimizer and a loss function."
                )
            }
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while reading datasets and
/// reading or writing weights, histories and configuration files
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, writing, file access)
/// - `JsonError` - Wraps JSON serialization/deserialization errors
/// - `DatasetFormatError` - The bytes on disk are not a well-formed dataset
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    DatasetFormatError(String),
}

impl IoError {
    /// Opens `path` for buffered reading
    pub fn load_in_buf_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(IoError::StdIoError)?;
        Ok(BufReader::new(file))
    }

    /// Builds an `InvalidData` I/O error, used when stored weights do not fit the model
    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        IoError::StdIoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            msg.into(),
        ))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            IoError::DatasetFormatError(msg) => write!(f, "Dataset format error: {}", msg),
        }
    }
}

impl std::error::Error for IoError {}

impl From<IoError> for ModelError {
    fn from(e: IoError) -> Self {
        ModelError::ProcessingError(e.to_string())
    }
}
