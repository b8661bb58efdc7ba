//! Marginalia CLI library.
//!
//! Command-line front end for the extractor: reads a clippings file,
//! selects books, renders them in one of the export formats and reports
//! what was skipped along the way.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod logging;
pub mod output;
pub mod select;

pub use cli::{Cli, Command};
pub use config::{Config, ExportFormat};
pub use error::{CliError, Result};
pub use export::Exporter;
pub use output::Formatter;
