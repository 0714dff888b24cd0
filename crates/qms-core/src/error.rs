//! Error types for QMS Core
//!
//! Provides the error taxonomy surfaced to users:
//! - Validation failures (missing or invalid fields)
//! - Admin access denial
//! - Identifier collisions and unissued identifiers detected at submit time
//! - Backing store failures
//! - Configuration problems

use qms_records::{RecordError, RecordId, RecordType};
use qms_store::StoreError;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Main QMS error type
#[derive(Debug, thiserror::Error)]
pub enum QmsError {
    /// Submitted form is incomplete or malformed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Admin password mismatch
    #[error("incorrect password, access denied")]
    AccessDenied,

    /// Identifier already present in the table
    #[error("identifier {0} is already taken, please resubmit")]
    DuplicateId(RecordId),

    /// Identifier ahead of the table or outside the open periods
    #[error("identifier {0} was not issued by this form, please resubmit")]
    UnissuedId(RecordId),

    /// No further identifier can be generated
    #[error("identifier error: {0}")]
    Identifier(#[from] RecordError),

    /// Backing store failure
    #[error("backing store error: {0}")]
    BackingStore(#[from] StoreError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl QmsError {
    /// Check if the error is recovered locally by asking the user to correct input
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::AccessDenied | Self::DuplicateId(_) | Self::UnissuedId(_)
        )
    }

    /// HTTP status code reported for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::AccessDenied => 403,
            Self::DuplicateId(_) | Self::UnissuedId(_) => 409,
            Self::BackingStore(_) => 502,
            Self::Identifier(_) | Self::Config(_) => 500,
        }
    }
}

/// Form validation failure
///
/// Lists every missing required field and every unparseable value at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Record type of the rejected form
    pub record_type: RecordType,
    /// Labels of required fields left empty
    pub missing: Vec<&'static str>,
    /// Other problems, one sentence each
    pub invalid: Vec<String>,
}

impl ValidationError {
    /// Create empty error for a record type
    #[inline]
    #[must_use]
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Record a missing field
    #[inline]
    pub fn missing(&mut self, label: &'static str) {
        self.missing.push(label);
    }

    /// Record an invalid value
    #[inline]
    pub fn invalid(&mut self, problem: impl Into<String>) {
        self.invalid.push(problem.into());
    }

    /// Record a record-level parse error
    pub fn record_error(&mut self, err: &RecordError) {
        self.invalid.push(err.to_string());
    }

    /// Check whether nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// `Ok(())` when nothing was recorded
    ///
    /// # Errors
    /// Returns `self` if any problem was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.missing.is_empty() {
            write!(
                f,
                "please fill in all required fields: {}",
                self.missing.join(", ")
            )?;
        }
        if !self.invalid.is_empty() {
            if !self.missing.is_empty() {
                f.write_str("; ")?;
            }
            f.write_str(&self.invalid.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Required setting absent
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// Setting present but unusable
    #[error("invalid setting {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for QMS operations
pub type QmsResult<T> = Result<T, QmsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use qms_store::TableId;

    #[test]
    fn validation_lists_missing_fields() {
        let mut err = ValidationError::new(RecordType::Complaint);
        err.missing("Product Name");
        err.missing("Contact Number");
        assert_eq!(
            err.to_string(),
            "please fill in all required fields: Product Name, Contact Number"
        );
    }

    #[test]
    fn validation_combines_problems() {
        let mut err = ValidationError::new(RecordType::Deviation);
        err.missing("Reported By");
        err.invalid("'Urgent' is not a valid Deviation Type");
        assert_eq!(
            err.to_string(),
            "please fill in all required fields: Reported By; 'Urgent' is not a valid Deviation Type"
        );
    }

    #[test]
    fn empty_validation_is_ok() {
        assert!(ValidationError::new(RecordType::ChangeControl)
            .into_result()
            .is_ok());
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(QmsError::AccessDenied.is_user_error());
        assert!(QmsError::from(ValidationError::new(RecordType::Complaint)).is_user_error());

        let store = QmsError::from(StoreError::TableNotFound(TableId::new("x")));
        assert!(!store.is_user_error());
        assert_eq!(store.http_status(), 502);
        assert_eq!(QmsError::AccessDenied.http_status(), 403);
    }

    #[test]
    fn unissued_identifier_is_conflict() {
        let id: RecordId = "D-0326-500".parse().unwrap();
        let err = QmsError::UnissuedId(id);
        assert!(err.is_user_error());
        assert_eq!(err.http_status(), 409);

        let exhausted = QmsError::from(RecordError::SerialExhausted("C-0326-4294967295".into()));
        assert!(!exhausted.is_user_error());
        assert_eq!(exhausted.http_status(), 500);
    }
}
