//! Text rendering of decoded patterns.
//!
//! ```text
//! Saved with HW Version: 0.808-alpha
//! Tempo: 120
//! (0) kick	|x---|x---|x---|x---|
//! ```
//!
//! Steps print as `x` (triggered) or `-` (silent) in four beats of four,
//! each beat closed by `|`. The tempo uses the shortest digits that read
//! back to the same `f32`, in exponent form (`1e+06`, `1.5e-05`) when the
//! decimal exponent is below -4 or at least 6. Infinities print as
//! `+Inf`/`-Inf`.

use std::fmt;

use crate::format::splice::layout::STEPS_PER_BEAT;
use crate::{Pattern, Step, Steps, Track};

/// Tempo in the drum machine's own `%g` style.
struct Tempo(f32);

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("NaN");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" });
        }
        let scientific = format!("{value:e}");
        let (mantissa, exponent) = scientific
            .split_once('e')
            .unwrap_or((scientific.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        if (-4..6).contains(&exponent) {
            write!(f, "{value}")
        } else {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Silent => f.write_str("-"),
            Step::Triggered => f.write_str("x"),
        }
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("|")?;
        for beat in self.as_slice().chunks(STEPS_PER_BEAT) {
            for step in beat {
                write!(f, "{step}")?;
            }
            f.write_str("|")?;
        }
        Ok(())
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}\t{}", self.id, self.name, self.steps)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved with HW Version: {}", self.version)?;
        writeln!(f, "Tempo: {}", Tempo(self.tempo))?;
        for track in &self.tracks {
            writeln!(f, "{track}")?;
        }
        Ok(())
    }
}
