//! QMS Server
//!
//! Serves the three intake forms and the admin view as plain HTML over warp.
//! Every request reaches the record store; nothing is cached between
//! requests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod html;
pub mod routes;
pub mod telemetry;

pub use routes::{routes, MAX_FORM_BYTES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
