//! PCM Transforms
//!
//! Integer-domain effects over 16-bit sample streams.

mod echo;
mod params;
mod vocals;

pub use echo::{EchoMixer, EchoReport, MixPhase, MixState};
pub use params::{
    DelayWindow, EchoConfig, VolumeScale, DEFAULT_DELAY, DEFAULT_VOLUME_SCALE,
};
pub use vocals::{cancel_center, VocalRemover, VocalReport};
