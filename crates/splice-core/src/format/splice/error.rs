use std::fmt;

use thiserror::Error;

/// Field of a SPLICE document, used to locate decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Header,
    BodySize,
    Version,
    Tempo,
    TrackId,
    TrackNameLength,
    TrackName,
    TrackSteps,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Header => "header",
            Field::BodySize => "body size",
            Field::Version => "version",
            Field::Tempo => "tempo",
            Field::TrackId => "track id",
            Field::TrackNameLength => "track name length",
            Field::TrackName => "track name",
            Field::TrackSteps => "track steps",
        };
        f.write_str(name)
    }
}

/// Errors returned by SPLICE decoding.
///
/// Decoding is all-or-nothing: the first error aborts and no partial
/// pattern is returned.
///
/// # Examples
/// ```
/// use splice_core::{Field, SpliceError};
///
/// let err = SpliceError::Truncated {
///     field: Field::Tempo,
///     needed: 4,
///     available: 2,
/// };
/// assert_eq!(err.to_string(), "truncated tempo: need 4 bytes, 2 available");
/// ```
#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("invalid SPLICE header: got \"{}\", want \"SPLICE\"", .found.escape_ascii())]
    HeaderMismatch { found: [u8; 6] },
    #[error("truncated {field}: need {needed} bytes, {available} available")]
    Truncated {
        field: Field,
        needed: u64,
        available: u64,
    },
    #[error("malformed {field}: {detail}")]
    Malformed { field: Field, detail: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpliceError {
    /// Field the error refers to, when it is tied to one.
    pub fn field(&self) -> Option<Field> {
        match self {
            SpliceError::HeaderMismatch { .. } => Some(Field::Header),
            SpliceError::Truncated { field, .. } | SpliceError::Malformed { field, .. } => {
                Some(*field)
            }
            SpliceError::Io(_) => None,
        }
    }
}
