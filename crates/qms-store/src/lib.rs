//! QMS Record Store
//!
//! The boundary between QMS and the remote tables that hold its records.
//!
//! # Core Operations
//!
//! - **Read**: every row of a table, raw or keyed by header name
//! - **Append**: add a row after the last one
//! - **Header maintenance**: make the schema row the first row, idempotently
//!
//! # Architecture
//!
//! ```text
//! Form Workflow / Admin Panel → RecordStore ─┬─ SheetsStore → Sheets v4 REST
//!                                            └─ MemoryStore (demo, tests)
//! ```
//!
//! There is no cache: every call reaches the backend, so every read observes
//! rows written out of band.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod sheets;
pub mod table;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreCalls};
pub use sheets::{SheetsConfig, SheetsStore, DEFAULT_BASE_URL, DEFAULT_WORKSHEET};
pub use table::{RecordStore, TableId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
