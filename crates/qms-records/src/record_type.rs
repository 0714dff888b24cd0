//! Record types and their table schemas
//!
//! Each [`RecordType`] owns one backing table. The header row declared here is
//! the column contract for every row written to that table.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::RecordError;

/// Column holding the submission timestamp (first column of every table)
pub const COL_DATE_SUBMITTED: &str = "Date Submitted";

/// Column holding the record identifier (second column of every table)
pub const COL_ID: &str = "ID";

const COMPLAINT_HEADERS: &[&str] = &[
    COL_DATE_SUBMITTED,
    COL_ID,
    "Product Name",
    "Severity",
    "Contact Number",
    "Details",
    "Submitted By",
];

const DEVIATION_HEADERS: &[&str] = &[
    COL_DATE_SUBMITTED,
    COL_ID,
    "Department",
    "Deviation Type",
    "Details",
    "Reported By",
];

const CHANGE_CONTROL_HEADERS: &[&str] = &[
    COL_DATE_SUBMITTED,
    COL_ID,
    "Change Type",
    "Justification",
    "Impact Analysis",
    "Requested By",
];

/// Kind of quality record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Customer or market complaint
    Complaint,
    /// Deviation from an approved procedure
    Deviation,
    /// Change control request
    ChangeControl,
}

impl RecordType {
    /// Every record type, in display order
    pub const ALL: [RecordType; 3] = [
        RecordType::Complaint,
        RecordType::Deviation,
        RecordType::ChangeControl,
    ];

    /// Identifier prefix
    #[inline]
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            RecordType::Complaint => "C",
            RecordType::Deviation => "D",
            RecordType::ChangeControl => "CC",
        }
    }

    /// Resolve a record type from its identifier prefix
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.prefix() == prefix)
    }

    /// Name of the backing table
    #[inline]
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            RecordType::Complaint => "Complaints",
            RecordType::Deviation => "Deviation",
            RecordType::ChangeControl => "Change Control",
        }
    }

    /// Ordered header row of the backing table
    #[inline]
    #[must_use]
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            RecordType::Complaint => COMPLAINT_HEADERS,
            RecordType::Deviation => DEVIATION_HEADERS,
            RecordType::ChangeControl => CHANGE_CONTROL_HEADERS,
        }
    }

    /// Header row as owned cells, ready to be written
    #[must_use]
    pub fn header_row(self) -> Vec<String> {
        self.headers().iter().map(|h| (*h).to_string()).collect()
    }

    /// Number of columns in the backing table
    #[inline]
    #[must_use]
    pub fn column_count(self) -> usize {
        self.headers().len()
    }

    /// Noun used in confirmation messages
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RecordType::Complaint => "Complaint",
            RecordType::Deviation => "Deviation",
            RecordType::ChangeControl => "Change request",
        }
    }

    /// URL-safe slug
    #[inline]
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            RecordType::Complaint => "complaints",
            RecordType::Deviation => "deviations",
            RecordType::ChangeControl => "change-controls",
        }
    }

    /// Notice shown when the table has no data rows
    #[inline]
    #[must_use]
    pub fn empty_notice(self) -> &'static str {
        match self {
            RecordType::Complaint => "No complaints registered yet.",
            RecordType::Deviation => "No deviations registered yet.",
            RecordType::ChangeControl => "No change control requests registered yet.",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for RecordType {
    type Err = RecordError;

    /// Accepts the slug or the table name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == s || t.table_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RecordError::UnknownRecordType(s.to_string()))
    }
}
