//! Splice core library for decoding SPLICE drum-machine pattern files.
//!
//! A SPLICE file holds a hardware version string, a tempo, and a list of
//! instrument tracks, each with sixteen on/off steps (one bar of 16th
//! notes). Decoding is byte-oriented and side-effect free; file access is
//! isolated in `source`, wire conventions live in the format `reader`, and
//! the text rendering lives in `render`.
//!
//! Invariants:
//! - Every track has exactly sixteen steps, each silent or triggered.
//! - Decoding never reads past the declared body size.
//! - Decoding is all-or-nothing: errors never yield a partial pattern.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use splice_core::decode_file;
//!
//! let pattern = decode_file(Path::new("pattern_1.splice"))?;
//! print!("{pattern}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod format;
mod render;
mod source;

pub use format::splice::error::{Field, SpliceError};
pub use format::splice::layout::{SPLICE_MAGIC, STEPS_PER_TRACK, VERSION_SLOT_LEN};
pub use format::splice::{decode, decode_bytes};
pub use source::{SourceError, decode_file};

/// Decoded drum pattern.
///
/// # Examples
/// ```
/// use splice_core::Pattern;
///
/// let pattern = Pattern {
///     version: "0.808-alpha".to_string(),
///     tempo: 120.0,
///     tracks: Vec::new(),
/// };
/// assert_eq!(
///     pattern.to_string(),
///     "Saved with HW Version: 0.808-alpha\nTempo: 120\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Hardware version the pattern was saved with.
    pub version: String,
    /// Tempo in beats per minute.
    pub tempo: f32,
    /// Tracks in file order (may be empty).
    pub tracks: Vec<Track>,
}

/// One instrument lane of a pattern.
///
/// # Examples
/// ```
/// use splice_core::{Step, Steps, Track};
///
/// let mut steps = [Step::Silent; 16];
/// steps[0] = Step::Triggered;
/// let track = Track {
///     id: 3,
///     name: "hh-open".to_string(),
///     steps: Steps::new(steps),
/// };
/// assert_eq!(track.to_string(), "(3) hh-open\t|x---|----|----|----|");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Instrument identifier (not necessarily unique).
    pub id: u8,
    /// Instrument label, decoded as UTF-8 with replacement.
    pub name: String,
    /// One bar of sixteenth-note steps.
    pub steps: Steps,
}

/// A single sixteenth-note slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Silent,
    Triggered,
}

impl Step {
    /// Map a wire byte to a step; only `0` and `1` are valid.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            format::splice::layout::STEP_SILENT => Some(Step::Silent),
            format::splice::layout::STEP_TRIGGERED => Some(Step::Triggered),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Step::Silent => format::splice::layout::STEP_SILENT,
            Step::Triggered => format::splice::layout::STEP_TRIGGERED,
        }
    }

    pub fn is_triggered(self) -> bool {
        self == Step::Triggered
    }
}

/// Exactly sixteen steps, one bar of four beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Steps([Step; STEPS_PER_TRACK]);

impl Steps {
    pub fn new(steps: [Step; STEPS_PER_TRACK]) -> Self {
        Self(steps)
    }

    pub fn get(&self, index: usize) -> Option<Step> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.0
    }

    /// Number of triggered steps in the bar.
    pub fn triggered_count(&self) -> usize {
        self.iter().filter(|step| step.is_triggered()).count()
    }
}
