//! Sample streams
//!
//! Block-oriented readers and writers of 16-bit little-endian PCM samples over
//! any `Read`/`Write`. A short read count means end of stream; an I/O error is
//! always surfaced as `Err`, so the two can never be confused.

use std::io::{ErrorKind, Read, Write};

use log::warn;

use crate::error::{PcmError, Result};

/// Bytes per 16-bit PCM sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Allocate a zeroed buffer, reporting allocation failure instead of aborting
pub fn alloc_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PcmError::AllocationFailure { samples: len })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

/// Reads fixed-size blocks of samples from a finite byte source
pub struct SampleReader<R> {
    inner: R,
    name: String,
    scratch: Vec<u8>,
    samples_read: u64,
}

impl<R: Read> SampleReader<R> {
    /// Wrap a byte source. `name` identifies the stream in error messages.
    pub fn new(inner: R, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
            scratch: Vec::new(),
            samples_read: 0,
        }
    }

    /// Name used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total samples delivered by `read_block` so far
    pub fn samples_read(&self) -> u64 {
        self.samples_read
    }

    /// Fill `buf` from the source, stopping early only at end of stream.
    ///
    /// Returns the number of bytes actually read.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(PcmError::ReadFailure {
                        stream: self.name.clone(),
                        source,
                    })
                }
            }
        }
        Ok(filled)
    }

    /// Read up to `block.len()` samples.
    ///
    /// Returns the number of whole samples read. Anything less than
    /// `block.len()` means the source is exhausted; a dangling odd byte at the
    /// end of the source is discarded.
    pub fn read_block(&mut self, block: &mut [i16]) -> Result<usize> {
        let want = block.len() * BYTES_PER_SAMPLE;
        if self.scratch.len() < want {
            self.scratch = alloc_zeroed(want)?;
        }

        let mut scratch = std::mem::take(&mut self.scratch);
        let filled = self.read_bytes(&mut scratch[..want]);
        let filled = match filled {
            Ok(n) => n,
            Err(e) => {
                self.scratch = scratch;
                return Err(e);
            }
        };

        if filled % BYTES_PER_SAMPLE != 0 {
            warn!(
                "{}: discarding trailing partial sample ({} stray byte)",
                self.name,
                filled % BYTES_PER_SAMPLE
            );
        }

        let count = filled / BYTES_PER_SAMPLE;
        for (sample, bytes) in block
            .iter_mut()
            .zip(scratch[..count * BYTES_PER_SAMPLE].chunks_exact(BYTES_PER_SAMPLE))
        {
            *sample = i16::from_le_bytes([bytes[0], bytes[1]]);
        }

        self.scratch = scratch;
        self.samples_read += count as u64;
        Ok(count)
    }
}

/// Writes blocks of samples to a byte sink
pub struct SampleWriter<W: Write> {
    inner: W,
    name: String,
    scratch: Vec<u8>,
    samples_written: u64,
}

impl<W: Write> SampleWriter<W> {
    /// Wrap a byte sink. `name` identifies the stream in error messages.
    pub fn new(inner: W, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
            scratch: Vec::new(),
            samples_written: 0,
        }
    }

    /// Total samples written by `write_block` so far
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Write raw bytes in full
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner
            .write_all(bytes)
            .map_err(|source| PcmError::WriteFailure {
                stream: self.name.clone(),
                source,
            })
    }

    /// Write every sample in `block`. An empty block is a no-op.
    pub fn write_block(&mut self, block: &[i16]) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }

        let len = block.len() * BYTES_PER_SAMPLE;
        if self.scratch.len() < len {
            self.scratch = alloc_zeroed(len)?;
        }
        for (bytes, sample) in self.scratch[..len]
            .chunks_exact_mut(BYTES_PER_SAMPLE)
            .zip(block)
        {
            bytes.copy_from_slice(&sample.to_le_bytes());
        }

        let scratch = std::mem::take(&mut self.scratch);
        let result = self.write_bytes(&scratch[..len]);
        self.scratch = scratch;
        result?;

        self.samples_written += block.len() as u64;
        Ok(())
    }

    /// Flush buffered output and return the underlying sink
    pub fn finish(mut self) -> Result<W> {
        self.inner
            .flush()
            .map_err(|source| PcmError::WriteFailure {
                stream: self.name.clone(),
                source,
            })?;
        Ok(self.inner)
    }
}
