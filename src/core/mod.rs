//! Core module - study loading, configuration and errors

pub mod config;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod session;
pub mod study;

pub use config::Config;
pub use discovery::find_latest_study;
pub use error::{ExportError, StudyError};
pub use loader::load_study;
pub use session::{open_study, resolve_study_path};
pub use study::{Column, StudyTable};
