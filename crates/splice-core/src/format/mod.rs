//! Pattern file decoding modules.
//!
//! Each format follows a layered structure:
//! - `layout`: magic bytes, field widths and constants (source of truth)
//! - `reader`: length-bounded byte access and encoding conventions
//! - `parser`: field-level decoding (no direct byte arithmetic)
//! - `error`: explicit, actionable errors
//!
//! Parsers consume any `std::io::Read` and contain no file handling; the
//! `source` module opens files and hands them over.

pub mod splice;
