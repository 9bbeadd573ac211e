use std::fmt;
use std::path::PathBuf;

/// A single field-level constraint violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint violation found while validating one record.
///
/// Validation never stops at the first problem, so a caller sees all of them at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }

    /// Returns `value` if no violation was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Patient not found: {0}")]
    NotFound(String),
    #[error("Patient with this ID already exists: {0}")]
    Duplicate(String),
    #[error("{0}")]
    InvalidArgument(String),

    #[error("patient data file does not exist: {}", .0.display())]
    MissingDataFile(PathBuf),
    #[error("patient data file already exists: {}", .0.display())]
    DataFileExists(PathBuf),
    #[error("failed to read patient data file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient data file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patients: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patients: {0}")]
    Deserialization(serde_json::Error),
    #[error("stored patient {id} violates record constraints: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: ValidationErrors,
    },
}

impl RecordError {
    /// True for failures of the underlying persistence rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            RecordError::MissingDataFile(_)
                | RecordError::DataFileExists(_)
                | RecordError::FileRead(_)
                | RecordError::FileWrite(_)
                | RecordError::Serialization(_)
                | RecordError::Deserialization(_)
                | RecordError::CorruptRecord { .. }
        )
    }
}

impl From<ValidationErrors> for RecordError {
    fn from(errors: ValidationErrors) -> Self {
        RecordError::Validation(errors)
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
