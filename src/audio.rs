use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::error::Error;
use std::path::Path;

/// Full scale for 16-bit output, symmetric on both sides (-32767..=32767)
pub const I16_SCALE: f32 = ((1 << 15) - 1) as f32;

/// Convert float samples to 16-bit PCM by scaling and truncating toward zero.
///
/// No clamping is applied. Samples outside [-1, 1] saturate at the i16 limits
/// because of how `as` converts floats.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| (s * I16_SCALE) as i16).collect()
}

pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write mono 16-bit PCM samples to `path`
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), Box<dyn Error>> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    log::debug!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// What was actually found in a written file
#[derive(Debug, Clone, PartialEq)]
pub struct WavSummary {
    pub file_name: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub total_samples: u64,
}

impl WavSummary {
    pub fn to_pretty_string(&self) -> String {
        let total_seconds = self.total_samples as f64 / self.sample_rate as f64;
        format!(
            "'{}', {} Hz, {}, i{}, {} ({})",
            self.file_name,
            self.sample_rate,
            match self.channels {
                1 => "mono",
                2 => "stereo",
                _ => "multichannel",
            },
            self.bits_per_sample,
            format_duration(total_seconds),
            format_samples(self.total_samples)
        )
    }
}

/// Reopen a written file and check it is mono 16-bit PCM with the expected rate and length
pub fn verify_wav(
    path: &Path,
    sample_rate: u32,
    expected_samples: usize,
) -> Result<WavSummary, Box<dyn Error>> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1
        || spec.bits_per_sample != 16
        || spec.sample_format != SampleFormat::Int
        || spec.sample_rate != sample_rate
    {
        return Err(format!("Unexpected format in {}: {:?}", path.display(), spec).into());
    }
    let frames = reader.duration() as u64;
    if frames != expected_samples as u64 {
        return Err(format!(
            "Unexpected length of {}: {} frames instead of {}",
            path.display(),
            frames,
            expected_samples
        )
        .into());
    }

    Ok(WavSummary {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        total_samples: frames,
    })
}

pub fn format_duration(duration: f64) -> String {
    if duration < 0.0 {
        return format!("-{}", format_duration(-duration));
    }

    if duration < 1.0 {
        let ms = (duration * 1000.0).round() as u32;
        return format!("{}ms", ms);
    }

    let zero_ms = ((duration * 1000.0).round() as u64) % 1000 == 0;
    if duration < 60.0 {
        return if zero_ms {
            format!("{:.0}s", duration)
        } else {
            format!("{:.3}s", duration)
        };
    }

    let minutes = (duration / 60.0).trunc() as u32;
    let seconds = duration % 60.0;
    if zero_ms {
        format!("{}:{:02.0}m", minutes, seconds)
    } else {
        format!("{}:{:06.3}m", minutes, seconds)
    }
}

pub fn format_samples(count: u64) -> String {
    match count {
        0..=999 => format!("{}spl", count),
        1_000..=999_999 => format!("{:.1}kspl", count as f64 / 1e3),
        _ => format!("{:.1}Mspl", count as f64 / 1e6),
    }
}
