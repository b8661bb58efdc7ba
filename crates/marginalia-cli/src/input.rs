//! Reading the clippings file.

use crate::error::{CliError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a clippings export as UTF-8 text.
///
/// A byte-order mark is left in place; the parser strips it.
pub fn read_clippings(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CliError::InputNotFound(path.to_path_buf()),
        _ => CliError::InputUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    String::from_utf8(bytes).map_err(|e| CliError::InputUnreadable {
        path: path.to_path_buf(),
        reason: format!("not valid UTF-8 ({})", e.utf8_error()),
    })
}
