//! Output destination checks.

use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DriverError, DriverResult};

/// Outcome of [`check_output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDecision {
    /// Safe to write.
    Proceed,
    /// An existing file will be overwritten.
    ProceedWithWarning,
}

/// Make sure results can be written to `path` before any work is done.
///
/// A missing file is created empty. An existing file is never refused: it
/// is appended to with `append`, otherwise overwritten with a warning.
pub fn check_output(path: &Path, append: bool) -> DriverResult<OutputDecision> {
    let writable = OpenOptions::new().write(true).open(path).is_ok();

    if !writable {
        File::create(path).map_err(|e| DriverError::io(path, e))?;
        debug!("Created output file {}", path.display());
        return Ok(OutputDecision::Proceed);
    }

    if append {
        Ok(OutputDecision::Proceed)
    } else {
        warn!(
            "{} already exists and will be overwritten (use --append to keep it)",
            path.display()
        );
        Ok(OutputDecision::ProceedWithWarning)
    }
}
