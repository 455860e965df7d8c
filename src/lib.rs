//! pcmfx - offline transforms for 16-bit PCM WAV files
//!
//! Two batch transforms over a canonical 44-byte header followed by
//! little-endian 16-bit samples:
//! - `addecho`: mixes a delayed, attenuated copy of the signal into itself
//! - `remvocals`: replaces each stereo frame with `(L - R) / 2` on both sides
//!
//! # Architecture
//!
//! - `engine`: sample block streams and the header transcoder
//! - `dsp`: the echo mixer state machine and the vocal remover
//! - `cli`: argument parsing and file handling

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;

pub use error::{PcmError, Result};
