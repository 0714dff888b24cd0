//! QMS Records
//!
//! Record model shared by every QMS crate.
//!
//! # Core Concepts
//!
//! - [`RecordType`]: Complaint, Deviation or Change Control, each bound to a
//!   table, a header row and an identifier prefix
//! - [`RecordId`]: `PREFIX-MMYY-NNN` identifier, serial scoped to a [`Period`]
//! - [`Record`]: one row, encoded in header order
//! - [`Choice`]: fixed-option fields ([`Severity`], [`DeviationType`],
//!   [`ChangeType`])
//!
//! # Example
//!
//! ```rust
//! use qms_records::{Period, RecordId, RecordType};
//!
//! let period = Period::new(3, 26).unwrap();
//! let id = RecordId::first(RecordType::ChangeControl, period);
//! assert_eq!(id.to_string(), "CC-0326-001");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod choice;
mod error;
mod id;
mod record;
mod record_type;

pub use choice::{ChangeType, Choice, DeviationType, Severity};
pub use error::RecordError;
pub use id::{Period, RecordId, SERIAL_WIDTH};
pub use record::{
    row_to_map, ChangeControlFields, ComplaintFields, DeviationFields, Record, RecordFields,
    RowMap, TIMESTAMP_FORMAT,
};
pub use record_type::{RecordType, COL_DATE_SUBMITTED, COL_ID};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
