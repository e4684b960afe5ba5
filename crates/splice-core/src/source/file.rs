use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::Pattern;
use crate::format::splice::decode;

use super::SourceError;

/// Open `path` and decode it as a SPLICE document.
///
/// # Errors
/// Returns `SourceError::Io` when the file cannot be opened and
/// `SourceError::Decode` when its contents are not a valid pattern.
pub fn decode_file(path: &Path) -> Result<Pattern, SourceError> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "decoding SPLICE file");
    let pattern = decode(BufReader::new(file))?;
    Ok(pattern)
}
