//! Stream Engine Module
//!
//! Byte-level plumbing shared by every transform:
//! - Sample block readers and writers
//! - The 44-byte container header

pub mod header;
pub mod stream;

pub use header::{transcode, AudioHeader, HEADER_LEN};
pub use stream::{alloc_zeroed, SampleReader, SampleWriter, BYTES_PER_SAMPLE};
