//! Registered boxers and their fight records.

pub mod models;

pub use models::{Boxer, BoxerId, LicenseStatus, RecordDelta};
