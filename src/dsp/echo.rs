//! Echo Mixer
//!
//! Delay-and-mix over two cursors into the same audio data. The primary
//! cursor runs one delay window ahead of the lagged cursor, so each primary
//! block is mixed with the block that preceded it:
//!
//! ```text
//! out[k*W + j] = in[k*W + j] + in[(k-1)*W + j] / scale     (k >= 1)
//! out[j]       = in[j]                                      (k == 0)
//! ```
//!
//! Once the primary cursor runs dry, the remaining echo is drained so the
//! output is always exactly one window longer than the input.

use std::io::{Read, Write};

use log::{debug, info};
use serde::Serialize;

use crate::dsp::params::{DelayWindow, EchoConfig, VolumeScale};
use crate::engine::stream::{alloc_zeroed, SampleReader, SampleWriter};
use crate::error::{PcmError, Result};

/// Mixer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MixPhase {
    /// No full window has been read yet
    Priming,
    /// At least one window emitted; the lagged cursor contributes
    Steady,
    /// Input ended after at least one full window
    DrainedWithEcho,
    /// Input was shorter than one window
    DrainedShortInput,
}

/// Per-run mixer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixState {
    /// Whether the lagged cursor has begun contributing
    pub started: bool,
    /// Length of the most recent primary read (never above the window)
    pub last_block_len: usize,
    pub phase: MixPhase,
}

impl MixState {
    fn new() -> Self {
        Self {
            started: false,
            last_block_len: 0,
            phase: MixPhase::Priming,
        }
    }
}

/// Summary of a finished echo run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoReport {
    pub config: EchoConfig,
    /// Terminal phase
    pub phase: MixPhase,
    /// Full windows emitted before draining
    pub steady_blocks: u64,
    /// Samples in the final partial primary block
    pub tail_samples: usize,
    pub input_samples: u64,
    pub output_samples: u64,
}

/// Delay-and-mix engine owning the primary and lagged buffers
pub struct EchoMixer {
    delay: DelayWindow,
    volume_scale: VolumeScale,
    primary: Vec<i16>,
    lagged: Vec<i16>,
}

impl EchoMixer {
    /// Allocate both window buffers.
    ///
    /// # Errors
    /// * `AllocationFailure` - if either buffer cannot be reserved
    pub fn new(config: EchoConfig) -> Result<Self> {
        let window = config.delay.samples();
        Ok(Self {
            delay: config.delay,
            volume_scale: config.volume_scale,
            primary: alloc_zeroed(window)?,
            lagged: alloc_zeroed(window)?,
        })
    }

    /// Current configuration
    pub fn config(&self) -> EchoConfig {
        EchoConfig {
            delay: self.delay,
            volume_scale: self.volume_scale,
        }
    }

    /// Mix the audio data from `primary` with its delayed copy from `lagged`
    /// and write the result, including the echo tail, to `output`.
    ///
    /// Both readers must be positioned at the first audio sample and read the
    /// same data. The output sink is not flushed.
    ///
    /// # Errors
    /// * `ReadFailure` - I/O error on either cursor
    /// * `LagReadShortfall` - the lagged cursor ran out of data it should hold
    /// * `WriteFailure` - the output rejected a block
    pub fn run<P: Read, L: Read, W: Write>(
        &mut self,
        primary: &mut SampleReader<P>,
        lagged: &mut SampleReader<L>,
        output: &mut SampleWriter<W>,
    ) -> Result<EchoReport> {
        let window = self.delay.samples();
        let written_before = output.samples_written();
        let mut state = MixState::new();
        let mut steady_blocks = 0u64;

        loop {
            let n = primary.read_block(&mut self.primary)?;
            state.last_block_len = n;
            if n < window {
                break;
            }

            if state.started {
                read_lagged(lagged, &mut self.lagged)?;
                let scale = self.volume_scale;
                for (out, echo) in self.primary.iter_mut().zip(&self.lagged) {
                    *out = out.wrapping_add(scale.attenuate(*echo));
                }
            } else {
                state.started = true;
                state.phase = MixPhase::Steady;
                debug!("echo primed with {} samples", window);
            }

            output.write_block(&self.primary)?;
            steady_blocks += 1;
        }

        if state.started {
            self.drain_with_echo(&mut state, lagged, output)?;
        } else {
            self.drain_short_input(&mut state, lagged, output)?;
        }

        let report = EchoReport {
            config: self.config(),
            phase: state.phase,
            steady_blocks,
            tail_samples: state.last_block_len,
            input_samples: primary.samples_read(),
            output_samples: output.samples_written() - written_before,
        };

        info!(
            "echo: {} input samples -> {} output samples ({:?})",
            report.input_samples, report.output_samples, report.phase
        );

        Ok(report)
    }

    /// Mix the final partial block with its echo, pad it with pure echo, then
    /// emit the echo of that partial block on its own.
    fn drain_with_echo<L: Read, W: Write>(
        &mut self,
        state: &mut MixState,
        lagged: &mut SampleReader<L>,
        output: &mut SampleWriter<W>,
    ) -> Result<()> {
        let n = state.last_block_len;
        let scale = self.volume_scale;
        state.phase = MixPhase::DrainedWithEcho;
        debug!("draining echo with {} trailing input samples", n);

        read_lagged(lagged, &mut self.lagged)?;
        let (mixed, pure) = self.primary.split_at_mut(n);
        for (out, echo) in mixed.iter_mut().zip(&self.lagged[..n]) {
            *out = out.wrapping_add(scale.attenuate(*echo));
        }
        for (out, echo) in pure.iter_mut().zip(&self.lagged[n..]) {
            *out = scale.attenuate(*echo);
        }
        output.write_block(&self.primary)?;

        self.write_echo_tail(n, lagged, output)
    }

    /// Pad the short input with silence to one full window, then emit its
    /// echo.
    fn drain_short_input<L: Read, W: Write>(
        &mut self,
        state: &mut MixState,
        lagged: &mut SampleReader<L>,
        output: &mut SampleWriter<W>,
    ) -> Result<()> {
        let n = state.last_block_len;
        state.phase = MixPhase::DrainedShortInput;
        debug!("input shorter than one window ({} samples), padding", n);

        self.primary[n..].fill(0);
        output.write_block(&self.primary)?;

        self.write_echo_tail(n, lagged, output)
    }

    /// Read exactly `n` more lagged samples and write them attenuated
    fn write_echo_tail<L: Read, W: Write>(
        &mut self,
        n: usize,
        lagged: &mut SampleReader<L>,
        output: &mut SampleWriter<W>,
    ) -> Result<()> {
        let tail = &mut self.lagged[..n];
        read_lagged(lagged, tail)?;
        let scale = self.volume_scale;
        for sample in tail.iter_mut() {
            *sample = scale.attenuate(*sample);
        }
        output.write_block(tail)
    }
}

/// Fill `block` from the lagged cursor; any shortfall means the cursors have
/// drifted apart.
fn read_lagged<L: Read>(lagged: &mut SampleReader<L>, block: &mut [i16]) -> Result<()> {
    let actual = lagged.read_block(block)?;
    if actual != block.len() {
        return Err(PcmError::LagReadShortfall {
            stream: lagged.name().to_string(),
            expected: block.len(),
            actual,
        });
    }
    Ok(())
}
