/// Maximum number of characters accepted in a patient identifier.
pub const MAX_PATIENT_ID_LEN: usize = 64;

/// Errors that can occur when creating a validated patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace
    #[error("patient id cannot be empty")]
    Empty,
    /// The input exceeded [`MAX_PATIENT_ID_LEN`] characters
    #[error("patient id exceeds maximum length of {MAX_PATIENT_ID_LEN} characters")]
    TooLong,
    /// The input contained a character that cannot appear in a URL path segment
    #[error("patient id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a patient record.
///
/// The identifier is the key of the stored collection and appears verbatim in request paths
/// (`/patients/{id}`), so construction trims surrounding whitespace and rejects empty input,
/// overlong input and characters that cannot sit in a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new `PatientId` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the trimmed input is empty, too long, or contains `/`, `?`, `#`
    /// or a control character.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.chars().count() > MAX_PATIENT_ID_LEN {
            return Err(IdError::TooLong);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#') || c.is_control())
        {
            return Err(IdError::InvalidCharacter(c));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets id-keyed maps be queried with a plain `&str`.
impl std::borrow::Borrow<str> for PatientId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::new(&s).map_err(serde::de::Error::custom)
    }
}
