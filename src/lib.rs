//! Offline project timeline builder.
//!
//! A project is a name, a start date, free-text notes and an ordered list of
//! phases measured in weeks. The [`timeline`] module schedules the phases
//! back to back, [`store`] saves and loads projects as JSON documents, and
//! [`export`] turns a computed timeline into CSV, spreadsheet or JSON bytes.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod shell;
pub mod store;
pub mod timeline;

pub use error::{Result, TimelineError};
