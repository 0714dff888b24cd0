//! QMS Core - intake and review of quality records
//!
//! Holds the rules of the quality management system:
//! - Generates monotonic per-month identifiers from stored rows
//! - Validates and stores complaint, deviation and change-control forms
//! - Rejects submits whose identifier was taken after the form was rendered
//! - Gates the all-records view behind a shared password
//! - Loads configuration from TOML with environment overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use qms_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QmsConfig::load("qms.toml")?;
//! let service = QmsService::from_config(&config)?;
//! service.ensure_headers().await?;
//!
//! let id = service.forms().render(RecordType::Complaint).await?;
//! let draft = Draft::Complaint(ComplaintDraft {
//!     id: id.to_string(),
//!     product_name: "Tablet X".into(),
//!     contact_number: "555-0100".into(),
//!     details: "cracked casing".into(),
//!     ..ComplaintDraft::default()
//! });
//! let submission = service.forms().submit(&draft).await?;
//! println!("{}", submission.message());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod admin;
pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod id_gen;
pub mod service;

pub use admin::{AdminPanel, AdminSecret, AdminView, TableView};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    Backend, QmsConfig, RecordTables, SheetsSettings, ENV_ADMIN_PASSWORD, ENV_BIND,
    ENV_SHEETS_TOKEN,
};
pub use error::{ConfigError, QmsError, QmsResult, ValidationError};
pub use forms::{
    ChangeControlDraft, ComplaintDraft, DeviationDraft, Draft, FormWorkflow, Submission,
};
pub use id_gen::{next_in_period, IdGenerator};
pub use service::QmsService;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with QMS Core
    pub use crate::{
        AdminView, ChangeControlDraft, ComplaintDraft, DeviationDraft, Draft, QmsConfig,
        QmsError, QmsService, Submission,
    };
    pub use qms_records::{RecordId, RecordType};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
