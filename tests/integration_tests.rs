//! Integration Tests
//!
//! End-to-end tests over real WAV files written and re-read with hound.

use std::path::Path;
use std::process::Command;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::tempdir;

use pcmfx::cli::commands::{add_echo, remove_vocals};
use pcmfx::dsp::{EchoConfig, MixPhase};
use pcmfx::engine::HEADER_LEN;
use pcmfx::PcmError;

/// Helper to write a 16-bit PCM WAV fixture
fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
    let spec = WavSpec {
        channels,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for s in samples {
        writer.write_sample(*s).unwrap();
    }
    writer.finalize().unwrap();
}

fn read_wav(path: &Path) -> (WavSpec, Vec<i16>) {
    let mut reader = WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()
        .unwrap();
    (spec, samples)
}

fn size_field(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn ramp(len: usize) -> Vec<i16> {
    (0..len).map(|i| ((i as i32 * 37) % 4000 - 2000) as i16).collect()
}

// === Echo Tests ===

#[test]
fn test_echo_output_is_one_window_longer() {
    let dir = tempdir().unwrap();
    for len in [0usize, 5, 99, 100, 101, 250, 300] {
        let src = dir.path().join(format!("in_{}.wav", len));
        let dst = dir.path().join(format!("out_{}.wav", len));
        write_wav(&src, 1, &ramp(len));

        let report = add_echo(&src, &dst, EchoConfig::new(100, 4).unwrap()).unwrap();
        assert_eq!(report.input_samples, len as u64);
        assert_eq!(report.output_samples, len as u64 + 100);

        let (_, samples) = read_wav(&dst);
        assert_eq!(samples.len(), len + 100, "input length {}", len);
    }
}

#[test]
fn test_echo_header_fields_and_untouched_bytes() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 2, &ramp(64));

    add_echo(&src, &dst, EchoConfig::new(10, 2).unwrap()).unwrap();

    let input = std::fs::read(&src).unwrap();
    let output = std::fs::read(&dst).unwrap();
    assert_eq!(size_field(&output, 4), size_field(&input, 4) + 20);
    assert_eq!(size_field(&output, 40), size_field(&input, 40) + 20);
    for i in (0..4).chain(8..40) {
        assert_eq!(input[i], output[i], "header byte {} changed", i);
    }

    // Channel layout is carried through untouched
    let (spec, samples) = read_wav(&dst);
    assert_eq!(spec.channels, 2);
    assert_eq!(samples.len(), 74);
}

#[test]
fn test_echo_mixing_follows_window_formula() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    let input: Vec<i16> = vec![-7, 300, -32768, 32767, 15, -15, 1000, -1, 3, 9];
    write_wav(&src, 1, &input);

    let window = 4;
    add_echo(&src, &dst, EchoConfig::new(window, 2).unwrap()).unwrap();
    let (_, out) = read_wav(&dst);

    for j in 0..window {
        assert_eq!(out[j], input[j]);
    }
    for i in window..input.len() {
        let expected = input[i].wrapping_add(input[i - window] / 2);
        assert_eq!(out[i], expected, "sample {}", i);
    }
    for i in input.len()..input.len() + window {
        assert_eq!(out[i], input[i - window] / 2, "echo tail sample {}", i);
    }
}

#[test]
fn test_echo_scenario_two_windows() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 1, &[10, 20, 30, 40, 8, 16, 24, 32]);

    let report = add_echo(&src, &dst, EchoConfig::new(4, 2).unwrap()).unwrap();
    assert_eq!(report.phase, MixPhase::DrainedWithEcho);

    let (_, out) = read_wav(&dst);
    assert_eq!(out, vec![10, 20, 30, 40, 13, 26, 39, 52, 4, 8, 12, 16]);
}

#[test]
fn test_echo_short_input_padded_with_silence() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 1, &[400, -400, 7]);

    let report = add_echo(&src, &dst, EchoConfig::new(6, 4).unwrap()).unwrap();
    assert_eq!(report.phase, MixPhase::DrainedShortInput);

    let (_, out) = read_wav(&dst);
    assert_eq!(out, vec![400, -400, 7, 0, 0, 0, 100, -100, 1]);
}

#[test]
fn test_echo_empty_audio() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 1, &[]);

    add_echo(&src, &dst, EchoConfig::new(5, 4).unwrap()).unwrap();

    let output = std::fs::read(&dst).unwrap();
    assert_eq!(output.len(), HEADER_LEN + 10);
    let (_, out) = read_wav(&dst);
    assert_eq!(out, vec![0; 5]);
}

#[test]
fn test_echo_header_only_file_too_short() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    std::fs::write(&src, b"RIFF").unwrap();

    let result = add_echo(&src, &dst, EchoConfig::default());
    assert!(matches!(result, Err(PcmError::ShortHeader { .. })));
}

// === Vocal Removal Tests ===

#[test]
fn test_remove_vocals_cancels_center() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    // Identical channels are fully cancelled; side content survives halved
    write_wav(&src, 2, &[500, 500, 1000, -1000, -3, 4]);

    let report = remove_vocals(&src, &dst).unwrap();
    assert_eq!(report.frames, 3);

    let (spec, out) = read_wav(&dst);
    assert_eq!(spec.channels, 2);
    assert_eq!(out, vec![0, 0, 1000, 1000, -3, -3]);
    let input = std::fs::read(&src).unwrap();
    let output = std::fs::read(&dst).unwrap();
    assert_eq!(&input[..HEADER_LEN], &output[..HEADER_LEN]);
}

// === Binary Tests ===

fn pcmfx() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pcmfx"))
}

#[test]
fn test_cli_success_exit_code() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 1, &ramp(40));

    let status = pcmfx()
        .args(["addecho", "-d", "16", "-v", "2"])
        .arg(&src)
        .arg(&dst)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(read_wav(&dst).1.len(), 56);
}

#[test]
fn test_cli_json_report() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 2, &ramp(8));

    let output = pcmfx()
        .args(["remvocals", "--json"])
        .arg(&src)
        .arg(&dst)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["frames"], 4);
    assert_eq!(report["dropped_samples"], 0);
}

#[test]
fn test_cli_usage_errors_exit_one() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    let dst = dir.path().join("out.wav");
    write_wav(&src, 1, &ramp(10));

    let cases: Vec<Vec<&str>> = vec![
        vec!["addecho", "-d", "0"],
        vec!["addecho", "-v", "0"],
        vec!["addecho", "-d", "4", "-d", "5"],
        vec!["addecho", "-q", "1"],
    ];
    for args in cases {
        let output = pcmfx().args(&args).arg(&src).arg(&dst).output().unwrap();
        assert_eq!(output.status.code(), Some(1), "args {:?}", args);
        assert!(!output.stderr.is_empty(), "args {:?}", args);
    }

    let output = pcmfx().args(["addecho"]).arg(&src).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_missing_source_exit_one() {
    let dir = tempdir().unwrap();
    let output = pcmfx()
        .arg("addecho")
        .arg(dir.path().join("nope.wav"))
        .arg(dir.path().join("out.wav"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.wav"));
}

#[test]
fn test_cli_same_file_prints_usage() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wav");
    write_wav(&src, 2, &ramp(8));

    let output = pcmfx().arg("remvocals").arg(&src).arg(&src).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("same file"));
    assert!(stderr.contains("Usage:"));
    assert_eq!(read_wav(&src).1.len(), 8);
}
