//! Vocal Remover
//!
//! Center-channel cancellation for interleaved stereo: every frame `(L, R)`
//! becomes `(c, c)` with `c = (L - R) / 2`. The header is copied unchanged.

use std::io::{Read, Write};

use log::{info, warn};
use serde::Serialize;

use crate::engine::header::AudioHeader;
use crate::engine::stream::{alloc_zeroed, SampleReader, SampleWriter};
use crate::error::Result;

/// Frames processed per read
const FRAMES_PER_BLOCK: usize = 4096;

/// Summary of a finished vocal-removal run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocalReport {
    pub frames: u64,
    /// Samples dropped because they did not form a whole frame
    pub dropped_samples: usize,
}

/// Cancel one stereo frame.
///
/// The difference is taken in 32 bits and halved with truncation, so the
/// result always fits in 16 bits.
#[inline]
pub fn cancel_center(left: i16, right: i16) -> i16 {
    ((i32::from(left) - i32::from(right)) / 2) as i16
}

/// Stereo center-cancellation transform
pub struct VocalRemover {
    block: Vec<i16>,
}

impl VocalRemover {
    /// Allocate the frame buffer.
    ///
    /// # Errors
    /// * `AllocationFailure` - if the buffer cannot be reserved
    pub fn new() -> Result<Self> {
        Ok(Self {
            block: alloc_zeroed(FRAMES_PER_BLOCK * 2)?,
        })
    }

    /// Copy the header from `source` to `dest`, then write the
    /// center-cancelled audio.
    ///
    /// # Errors
    /// * `ShortHeader` - fewer than 44 bytes in the source
    /// * `ReadFailure` / `WriteFailure` - I/O errors
    pub fn run<R: Read, W: Write>(
        &mut self,
        source: &mut SampleReader<R>,
        dest: &mut SampleWriter<W>,
    ) -> Result<VocalReport> {
        AudioHeader::read_from(source)?.write_to(dest)?;

        let mut frames = 0u64;
        let dropped_samples = loop {
            let n = source.read_block(&mut self.block)?;
            let whole = n - n % 2;

            for frame in self.block[..whole].chunks_exact_mut(2) {
                let center = cancel_center(frame[0], frame[1]);
                frame[0] = center;
                frame[1] = center;
            }
            dest.write_block(&self.block[..whole])?;
            frames += (whole / 2) as u64;

            if n < self.block.len() {
                break n - whole;
            }
        };

        if dropped_samples > 0 {
            warn!(
                "{}: dropping {} sample(s) that do not form a whole stereo frame",
                source.name(),
                dropped_samples
            );
        }
        info!("remvocals: {} frames processed", frames);

        Ok(VocalReport {
            frames,
            dropped_samples,
        })
    }
}
