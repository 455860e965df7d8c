//! Transform parameters
//!
//! Validated newtypes for the echo settings. Zero is never a valid value for
//! either: a zero delay is rejected, not treated as "no echo".

use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};

use serde::{Deserialize, Serialize};

use crate::error::{PcmError, Result};

/// Default echo delay in samples
pub const DEFAULT_DELAY: usize = 8000;

/// Default volume divisor for the echo
pub const DEFAULT_VOLUME_SCALE: u32 = 4;

/// Echo lag in samples, which is also the mixer's I/O block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct DelayWindow(NonZeroUsize);

impl DelayWindow {
    /// Create a delay window.
    ///
    /// # Errors
    /// * `InvalidParameter` - if `samples` is zero
    pub fn new(samples: usize) -> Result<Self> {
        NonZeroUsize::new(samples)
            .map(Self)
            .ok_or(PcmError::InvalidParameter {
                name: "-d",
                value: 0,
            })
    }

    /// Window length in samples
    pub fn samples(self) -> usize {
        self.0.get()
    }
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_DELAY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for DelayWindow {
    type Error = PcmError;

    fn try_from(samples: usize) -> Result<Self> {
        Self::new(samples)
    }
}

impl From<DelayWindow> for usize {
    fn from(window: DelayWindow) -> usize {
        window.samples()
    }
}

impl fmt::Display for DelayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} samples", self.0)
    }
}

/// Integer divisor applied to every delayed sample (attenuation = 1/scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct VolumeScale(NonZeroU32);

impl VolumeScale {
    /// Create a volume scale.
    ///
    /// # Errors
    /// * `InvalidParameter` - if `divisor` is zero
    pub fn new(divisor: u32) -> Result<Self> {
        NonZeroU32::new(divisor)
            .map(Self)
            .ok_or(PcmError::InvalidParameter {
                name: "-v",
                value: 0,
            })
    }

    /// The divisor
    pub fn divisor(self) -> u32 {
        self.0.get()
    }

    /// Attenuate one sample.
    ///
    /// Division truncates toward zero, so `-7 / 2 == -3`. The quotient always
    /// fits in an `i16` because the divisor is at least 1.
    #[inline]
    pub fn attenuate(self, sample: i16) -> i16 {
        (i64::from(sample) / i64::from(self.0.get())) as i16
    }
}

impl Default for VolumeScale {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_VOLUME_SCALE).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for VolumeScale {
    type Error = PcmError;

    fn try_from(divisor: u32) -> Result<Self> {
        Self::new(divisor)
    }
}

impl From<VolumeScale> for u32 {
    fn from(scale: VolumeScale) -> u32 {
        scale.divisor()
    }
}

impl fmt::Display for VolumeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.0)
    }
}

/// Settings for one echo run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoConfig {
    pub delay: DelayWindow,
    pub volume_scale: VolumeScale,
}

impl EchoConfig {
    /// Build a config from raw values, rejecting zeros
    pub fn new(delay: usize, volume_scale: u32) -> Result<Self> {
        Ok(Self {
            delay: DelayWindow::new(delay)?,
            volume_scale: VolumeScale::new(volume_scale)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EchoConfig::default();
        assert_eq!(config.delay.samples(), 8000);
        assert_eq!(config.volume_scale.divisor(), 4);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            DelayWindow::new(0),
            Err(PcmError::InvalidParameter { name: "-d", .. })
        ));
        assert!(matches!(
            VolumeScale::new(0),
            Err(PcmError::InvalidParameter { name: "-v", .. })
        ));
        assert!(EchoConfig::new(1, 0).is_err());
    }

    #[test]
    fn test_attenuate_truncates_toward_zero() {
        let half = VolumeScale::new(2).unwrap();
        assert_eq!(half.attenuate(-7), -3);
        assert_eq!(half.attenuate(7), 3);
        assert_eq!(half.attenuate(-1), 0);

        let unity = VolumeScale::new(1).unwrap();
        assert_eq!(unity.attenuate(i16::MIN), i16::MIN);

        let huge = VolumeScale::new(u32::MAX).unwrap();
        assert_eq!(huge.attenuate(i16::MIN), 0);
    }

    #[test]
    fn test_config_json() {
        let config = EchoConfig::new(12, 3).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"delay":12,"volume_scale":3}"#);

        let parsed: EchoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let bad = serde_json::from_str::<EchoConfig>(r#"{"delay":0,"volume_scale":3}"#);
        assert!(bad.is_err());
    }
}
