#[allow(unused_imports)]
use super::*;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pglide-audio-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_quantize_full_scale() {
    assert_eq!(quantize(&[1.0, -1.0, 0.0]), vec![32767, -32767, 0]);
}

#[test]
fn test_quantize_truncates_toward_zero() {
    assert_eq!(quantize(&[0.5, -0.5]), vec![16383, -16383]);
    assert_eq!(quantize(&[1.0 / 32767.0 * 0.99]), vec![0]);
}

#[test]
fn test_quantize_out_of_range_saturates() {
    assert_eq!(quantize(&[2.0, -2.0]), vec![i16::MAX, i16::MIN]);
}

#[test]
fn test_quantize_preserves_length() {
    assert_eq!(quantize(&vec![0.25; 1234]).len(), 1234);
    assert!(quantize(&[]).is_empty());
}

#[test]
fn test_wav_spec_mono_pcm16() {
    let spec = wav_spec(44100);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert!(spec.sample_format == hound::SampleFormat::Int);
}

#[test]
fn test_write_and_verify_wav() {
    let dir = scratch_dir("roundtrip");
    let path = dir.join("block4.wav");
    let samples: Vec<i16> = vec![0, 100, -100, 32767, -32767];

    write_wav(&path, &samples, 44100).unwrap();
    let summary = verify_wav(&path, 44100, samples.len()).unwrap();
    assert_eq!(summary.file_name, "block4.wav");
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.bits_per_sample, 16);
    assert_eq!(summary.total_samples, 5);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read, samples);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_verify_wav_length_mismatch() {
    let dir = scratch_dir("mismatch");
    let path = dir.join("short.wav");
    write_wav(&path, &[1, 2, 3], 44100).unwrap();

    assert!(verify_wav(&path, 44100, 4).is_err());
    assert!(verify_wav(&path, 48000, 3).is_err());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_write_wav_missing_dir_is_error() {
    let path = std::env::temp_dir()
        .join(format!("pglide-missing-{}", std::process::id()))
        .join("nested")
        .join("out.wav");
    assert!(write_wav(&path, &[0, 1], 44100).is_err());
}

#[test]
fn test_verify_wav_nonexistent_file() {
    let path = PathBuf::from("nonexistent_file.wav");
    assert!(verify_wav(&path, 44100, 0).is_err());
}

#[test]
fn test_wav_summary_to_pretty_string() {
    let summary = WavSummary {
        file_name: "block16.wav".to_string(),
        sample_rate: 44100,
        channels: 1,
        bits_per_sample: 16,
        total_samples: 220500,
    };
    assert_eq!(
        summary.to_pretty_string(),
        "'block16.wav', 44100 Hz, mono, i16, 5s (220.5kspl)"
    );
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.5), "500ms");
    assert_eq!(format_duration(-0.25), "-250ms");

    assert_eq!(format_duration(1.0), "1s");
    assert_eq!(format_duration(5.0), "5s");
    assert_eq!(format_duration(5.123), "5.123s");

    assert_eq!(format_duration(65.0), "1:05m");
    assert_eq!(format_duration(125.456), "2:05.456m");
}

#[test]
fn test_format_samples() {
    assert_eq!(format_samples(0), "0spl");
    assert_eq!(format_samples(999), "999spl");
    assert_eq!(format_samples(44100), "44.1kspl");
    assert_eq!(format_samples(220500), "220.5kspl");
    assert_eq!(format_samples(1_500_000), "1.5Mspl");
}
