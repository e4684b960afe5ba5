//! SPLICE drum pattern decoding.
//!
//! A SPLICE document is the magic `SPLICE`, a big-endian `u64` body size,
//! then the body: a NUL-terminated version in a 32-byte slot, a
//! little-endian `f32` tempo, and track records until the declared body
//! size is used up. There is no track count; the byte budget is the only
//! loop terminator, so every body read goes through `BoundedReader`.
//!
//! Step bytes are validated while decoding (only `0` and `1` are legal), so
//! a decoded pattern can always be rendered. Trailing bytes after the body
//! are never read.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{decode, decode_bytes};
