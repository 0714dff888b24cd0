//! Typed records and their row encoding
//!
//! A [`Record`] is written once as a row whose cells follow the header order of
//! its [`RecordType`]. [`Record::from_row_map`] reads a stored row back by
//! header name.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::choice::{ChangeType, DeviationType, Severity};
use crate::error::RecordError;
use crate::id::RecordId;
use crate::record_type::{RecordType, COL_DATE_SUBMITTED, COL_ID};

/// Format of the `Date Submitted` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stored row keyed by header name, in column order
pub type RowMap = IndexMap<String, String>;

/// Complaint-specific columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintFields {
    pub product_name: String,
    pub severity: Severity,
    pub contact_number: String,
    pub details: String,
    /// Empty when not given
    pub submitted_by: String,
}

/// Deviation-specific columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationFields {
    pub department: String,
    pub deviation_type: DeviationType,
    pub details: String,
    pub reported_by: String,
}

/// Change-control-specific columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeControlFields {
    pub change_type: ChangeType,
    pub justification: String,
    pub impact_analysis: String,
    pub requested_by: String,
}

/// Type-specific payload of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordFields {
    Complaint(ComplaintFields),
    Deviation(DeviationFields),
    ChangeControl(ChangeControlFields),
}

impl RecordFields {
    /// Record type of this payload
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordFields::Complaint(_) => RecordType::Complaint,
            RecordFields::Deviation(_) => RecordType::Deviation,
            RecordFields::ChangeControl(_) => RecordType::ChangeControl,
        }
    }

    /// Cells after `Date Submitted` and `ID`, in header order
    fn cells(&self) -> Vec<String> {
        match self {
            RecordFields::Complaint(c) => vec![
                c.product_name.clone(),
                c.severity.to_string(),
                c.contact_number.clone(),
                c.details.clone(),
                c.submitted_by.clone(),
            ],
            RecordFields::Deviation(d) => vec![
                d.department.clone(),
                d.deviation_type.to_string(),
                d.details.clone(),
                d.reported_by.clone(),
            ],
            RecordFields::ChangeControl(c) => vec![
                c.change_type.to_string(),
                c.justification.clone(),
                c.impact_analysis.clone(),
                c.requested_by.clone(),
            ],
        }
    }
}

/// One quality record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Local wall-clock time of submission, second precision
    pub submitted_at: NaiveDateTime,
    pub id: RecordId,
    pub fields: RecordFields,
}

impl Record {
    /// Create record
    ///
    /// # Errors
    /// Returns `RecordError::InvalidRow` if the identifier prefix does not
    /// match the payload type
    pub fn new(
        submitted_at: NaiveDateTime,
        id: RecordId,
        fields: RecordFields,
    ) -> Result<Self, RecordError> {
        let record_type = fields.record_type();
        if id.record_type() != record_type {
            return Err(RecordError::InvalidRow {
                table: record_type.table_name(),
                reason: format!("identifier {id} does not carry prefix {}", record_type.prefix()),
            });
        }
        Ok(Self {
            submitted_at,
            id,
            fields,
        })
    }

    /// Record type
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.fields.record_type()
    }

    /// Timestamp cell
    #[must_use]
    pub fn timestamp_cell(&self) -> String {
        self.submitted_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Encode as a row in header order
    ///
    /// The result always has exactly `record_type().column_count()` cells.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.record_type().column_count());
        row.push(self.timestamp_cell());
        row.push(self.id.to_string());
        row.extend(self.fields.cells());
        row
    }

    /// Decode a stored row keyed by header name
    ///
    /// # Errors
    /// Returns `RecordError` when a column is missing or a cell cannot be
    /// parsed
    pub fn from_row_map(record_type: RecordType, row: &RowMap) -> Result<Self, RecordError> {
        let table = record_type.table_name();
        let cell = |name: &str| -> Result<String, RecordError> {
            row.get(name).cloned().ok_or_else(|| RecordError::InvalidRow {
                table,
                reason: format!("missing column '{name}'"),
            })
        };

        let submitted_at = NaiveDateTime::parse_from_str(&cell(COL_DATE_SUBMITTED)?, TIMESTAMP_FORMAT)
            .map_err(|e| RecordError::InvalidRow {
                table,
                reason: format!("bad timestamp: {e}"),
            })?;
        let id: RecordId = cell(COL_ID)?.parse()?;

        let fields = match record_type {
            RecordType::Complaint => RecordFields::Complaint(ComplaintFields {
                product_name: cell("Product Name")?,
                severity: cell("Severity")?.parse()?,
                contact_number: cell("Contact Number")?,
                details: cell("Details")?,
                submitted_by: cell("Submitted By")?,
            }),
            RecordType::Deviation => RecordFields::Deviation(DeviationFields {
                department: cell("Department")?,
                deviation_type: cell("Deviation Type")?.parse()?,
                details: cell("Details")?,
                reported_by: cell("Reported By")?,
            }),
            RecordType::ChangeControl => RecordFields::ChangeControl(ChangeControlFields {
                change_type: cell("Change Type")?.parse()?,
                justification: cell("Justification")?,
                impact_analysis: cell("Impact Analysis")?,
                requested_by: cell("Requested By")?,
            }),
        };

        Self::new(submitted_at, id, fields)
    }
}

/// Zip a header row with a stored row
///
/// Short rows are padded with empty cells, extra cells are dropped.
#[must_use]
pub fn row_to_map(headers: &[String], row: &[String]) -> RowMap {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
        .collect()
}
