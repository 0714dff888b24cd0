//! Error types for record parsing

/// Errors raised while parsing record values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Identifier does not follow `PREFIX-MMYY-NNN`
    #[error("malformed identifier '{id}': {reason}")]
    MalformedId { id: String, reason: &'static str },

    /// Identifier prefix does not name a record type
    #[error("unknown identifier prefix: '{0}'")]
    UnknownPrefix(String),

    /// Serial cannot advance past the largest representable value
    #[error("no identifier follows {0}")]
    SerialExhausted(String),

    /// Month/year pair out of range
    #[error("invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: u32 },

    /// Value is not one of the fixed options of a choice field
    #[error("'{value}' is not a valid {field} (expected one of: {options})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        options: String,
    },

    /// Record type name not recognised
    #[error("unknown record type: '{0}'")]
    UnknownRecordType(String),

    /// Stored row is missing a column or holds an unreadable cell
    #[error("invalid row for {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },
}

impl RecordError {
    /// Create malformed identifier error
    pub fn malformed(id: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedId {
            id: id.into(),
            reason,
        }
    }
}
