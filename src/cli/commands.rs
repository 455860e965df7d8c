//! CLI Command Implementations
//!
//! File handling around the transforms: opening the source (twice for the
//! echo), creating the destination, and reporting.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::dsp::{EchoConfig, EchoMixer, EchoReport, VocalRemover, VocalReport};
use crate::engine::{transcode, SampleReader, SampleWriter, HEADER_LEN};
use crate::error::{PcmError, Result};

/// Apply the echo transform from `source` to `dest`.
///
/// The source is opened twice: once for the primary cursor and once for the
/// lagged cursor, which is positioned just past the header.
pub fn add_echo(source: &Path, dest: &Path, config: EchoConfig) -> Result<EchoReport> {
    info!(
        "Adding echo: {} -> {} (delay {}, volume {})",
        source.display(),
        dest.display(),
        config.delay,
        config.volume_scale
    );

    let mut mixer = EchoMixer::new(config)?;

    ensure_distinct(source, dest)?;
    let primary_file = open_source(source)?;
    let dest_file = create_dest(dest)?;
    let mut lag_file = open_source(source)?;

    let source_name = source.display().to_string();
    let mut primary = SampleReader::new(BufReader::new(primary_file), source_name.clone());
    let mut output = SampleWriter::new(BufWriter::new(dest_file), dest.display().to_string());

    transcode(&mut primary, &mut output, config.delay.samples())?;

    lag_file
        .seek(SeekFrom::Start(HEADER_LEN as u64))
        .map_err(|e| PcmError::ReadFailure {
            stream: source_name.clone(),
            source: e,
        })?;
    let mut lagged = SampleReader::new(BufReader::new(lag_file), source_name);

    let report = mixer.run(&mut primary, &mut lagged, &mut output)?;
    output.finish()?;

    Ok(report)
}

/// Apply the vocal-removal transform from `source` to `dest`.
pub fn remove_vocals(source: &Path, dest: &Path) -> Result<VocalReport> {
    info!("Removing vocals: {} -> {}", source.display(), dest.display());

    let mut remover = VocalRemover::new()?;

    ensure_distinct(source, dest)?;
    let source_file = open_source(source)?;
    let dest_file = create_dest(dest)?;

    let mut reader = SampleReader::new(BufReader::new(source_file), source.display().to_string());
    let mut writer = SampleWriter::new(BufWriter::new(dest_file), dest.display().to_string());

    let report = remover.run(&mut reader, &mut writer)?;
    writer.finish()?;

    Ok(report)
}

/// Print a run report as pretty JSON on stdout
pub fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PcmError::FileOpenFailure {
        path: path.display().to_string(),
        source,
    })
}

fn create_dest(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| PcmError::FileOpenFailure {
        path: path.display().to_string(),
        source,
    })
}

/// Writing over the source would truncate it before it is read
fn ensure_distinct(source: &Path, dest: &Path) -> Result<()> {
    if let (Ok(a), Ok(b)) = (source.canonicalize(), dest.canonicalize()) {
        if a == b {
            return Err(PcmError::Usage {
                message: format!(
                    "Source and destination are the same file: {}",
                    source.display()
                ),
            });
        }
    }
    Ok(())
}
