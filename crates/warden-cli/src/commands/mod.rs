pub mod decide;
pub mod validate;

use std::path::Path;

use crate::error::{CliError, CliResult};

/// Read a file into a string with a path-carrying error
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Unreadable {
        path: path.display().to_string(),
        source,
    })
}
