use std::io::{ErrorKind, Read};

use super::error::{Field, SpliceError};

/// Read until `buf` is full or the source reports end-of-file.
///
/// Returns the number of bytes read, which is smaller than `buf.len()` only
/// when the source ran out.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Read a fixed-width prefix field straight from the source (no budget).
///
/// # Errors
/// Returns `SpliceError::Truncated` when the source ends early.
pub fn read_prefix<R: Read, const N: usize>(
    reader: &mut R,
    field: Field,
) -> Result<[u8; N], SpliceError> {
    let mut buf = [0u8; N];
    let got = read_full(reader, &mut buf)?;
    if got < N {
        return Err(SpliceError::Truncated {
            field,
            needed: N as u64,
            available: got as u64,
        });
    }
    Ok(buf)
}

/// Reader that permits at most `budget` bytes to be consumed from `inner`.
///
/// Every read names the field it decodes; reads that would exceed the
/// remaining budget fail before the source is touched.
pub struct BoundedReader<R> {
    inner: R,
    budget: u64,
    remaining: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(inner: R, budget: u64) -> Self {
        Self {
            inner,
            budget,
            remaining: budget,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn consumed(&self) -> u64 {
        self.budget - self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn require(&self, field: Field, needed: u64) -> Result<(), SpliceError> {
        if needed > self.remaining {
            return Err(SpliceError::Truncated {
                field,
                needed,
                available: self.remaining,
            });
        }
        Ok(())
    }

    pub fn read_exact_into(&mut self, field: Field, buf: &mut [u8]) -> Result<(), SpliceError> {
        let needed = buf.len() as u64;
        self.require(field, needed)?;
        let got = read_full(&mut self.inner, buf)?;
        self.remaining -= got as u64;
        if (got as u64) < needed {
            return Err(SpliceError::Truncated {
                field,
                needed,
                available: got as u64,
            });
        }
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self, field: Field) -> Result<[u8; N], SpliceError> {
        let mut buf = [0u8; N];
        self.read_exact_into(field, &mut buf)?;
        Ok(buf)
    }

    /// Read `len` bytes. The buffer grows only with bytes the source
    /// actually delivers, so a forged length cannot force a large allocation.
    pub fn read_vec(&mut self, field: Field, len: u64) -> Result<Vec<u8>, SpliceError> {
        self.require(field, len)?;
        let mut buf = Vec::new();
        let got = (&mut self.inner).take(len).read_to_end(&mut buf)? as u64;
        self.remaining -= got;
        if got < len {
            return Err(SpliceError::Truncated {
                field,
                needed: len,
                available: got,
            });
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self, field: Field) -> Result<u8, SpliceError> {
        let [byte] = self.read_array::<1>(field)?;
        Ok(byte)
    }

    pub fn read_u32_be(&mut self, field: Field) -> Result<u32, SpliceError> {
        Ok(u32::from_be_bytes(self.read_array(field)?))
    }

    pub fn read_f32_le(&mut self, field: Field) -> Result<f32, SpliceError> {
        Ok(f32::from_le_bytes(self.read_array(field)?))
    }
}
