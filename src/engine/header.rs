//! Canonical 44-byte PCM container header
//!
//! Only the two 32-bit size fields are ever interpreted; everything else is
//! carried through byte-for-byte.

use std::io::{Read, Write};

use log::debug;

use crate::engine::stream::{SampleReader, SampleWriter, BYTES_PER_SAMPLE};
use crate::error::{PcmError, Result};

/// Header length in bytes (22 16-bit words)
pub const HEADER_LEN: usize = 44;

/// Byte offset of the RIFF chunk size field
pub const RIFF_SIZE_OFFSET: usize = 4;

/// Byte offset of the data chunk size field
pub const DATA_SIZE_OFFSET: usize = 40;

/// Opaque 44-byte header block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioHeader {
    bytes: [u8; HEADER_LEN],
}

impl AudioHeader {
    /// Wrap raw header bytes
    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        Self { bytes }
    }

    /// Read exactly `HEADER_LEN` bytes from the reader.
    ///
    /// # Errors
    /// * `ShortHeader` - if the source ends before 44 bytes
    /// * `ReadFailure` - on an I/O error
    pub fn read_from<R: Read>(reader: &mut SampleReader<R>) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        let got = reader.read_bytes(&mut bytes)?;
        if got != HEADER_LEN {
            return Err(PcmError::ShortHeader {
                stream: reader.name().to_string(),
            });
        }
        Ok(Self { bytes })
    }

    /// Write all 44 bytes
    pub fn write_to<W: Write>(&self, writer: &mut SampleWriter<W>) -> Result<()> {
        writer.write_bytes(&self.bytes)
    }

    /// RIFF chunk size (byte offset 4)
    pub fn riff_size(&self) -> u32 {
        self.field(RIFF_SIZE_OFFSET)
    }

    /// Data chunk size in bytes (byte offset 40)
    pub fn data_size(&self) -> u32 {
        self.field(DATA_SIZE_OFFSET)
    }

    /// Header describing `samples` more trailing samples than this one.
    ///
    /// Both size fields grow by `samples * 2` bytes, wrapping at 32 bits.
    pub fn with_appended_samples(&self, samples: usize) -> Self {
        // usize -> u32 truncation matches the 32-bit wrap of the fields
        let increment = (samples as u32).wrapping_mul(BYTES_PER_SAMPLE as u32);
        let mut header = *self;
        header.set_field(RIFF_SIZE_OFFSET, self.riff_size().wrapping_add(increment));
        header.set_field(DATA_SIZE_OFFSET, self.data_size().wrapping_add(increment));
        header
    }

    fn field(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(word)
    }

    fn set_field(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Copy the header from `source` to `dest`, growing both size fields to
/// account for `delay_samples` appended samples.
///
/// Returns the header as written.
pub fn transcode<R: Read, W: Write>(
    source: &mut SampleReader<R>,
    dest: &mut SampleWriter<W>,
    delay_samples: usize,
) -> Result<AudioHeader> {
    let header = AudioHeader::read_from(source)?;
    let corrected = header.with_appended_samples(delay_samples);

    debug!(
        "header: riff size {} -> {}, data size {} -> {}",
        header.riff_size(),
        corrected.riff_size(),
        header.data_size(),
        corrected.data_size()
    );

    corrected.write_to(dest)?;
    Ok(corrected)
}
