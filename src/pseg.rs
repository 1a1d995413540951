use std::error::Error;
use std::f64::consts::PI;
use std::ops::Range;

/// Quadratic phase function `phase(t) = a*t^2 + b*t` (t in samples, phase in radians)
///
/// Instantaneous angular frequency is `2*a*t + b` rad/sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpParams {
    pub a: f64,
    pub b: f64,
}

impl ChirpParams {
    /// Build a chirp starting at `start_hz`; its frequency rises by `2 * sweep_rate_hz` every second
    pub fn from_hz(start_hz: f64, sweep_rate_hz: f64, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        Self {
            a: sweep_rate_hz * 2.0 * PI / sr / sr,
            b: start_hz * 2.0 * PI / sr,
        }
    }

    pub fn phase(&self, t: usize) -> f64 {
        let t = t as f64;
        self.a * t * t + self.b * t
    }

    pub fn inst_freq(&self, t: usize) -> f64 {
        2.0 * self.a * t as f64 + self.b
    }
}

/// Left/right crossfade weights for sample `t` of segment `[t0, t1)`
pub fn crossfade_weights(t: usize, t0: usize, t1: usize) -> (f64, f64) {
    let len = (t1 - t0) as f64;
    ((t1 - t) as f64 / len, (t - t0) as f64 / len)
}

/// Approximate `sin(phase(t))` on `out[t0..t1]` by crossfading two pure tones.
///
/// The left tone runs at the true instantaneous frequency at `t0`, the right
/// tone at the average phase slope over the segment, so its phase lands on
/// `phase(t1)` exactly at `t1`. Both tones start from `phase(t0)`.
pub fn pitch_segment(
    out: &mut [f32],
    seg: Range<usize>,
    chirp: &ChirpParams,
) -> Result<(), Box<dyn Error>> {
    let (t0, t1) = (seg.start, seg.end);
    if t0 >= t1 {
        return Err(format!("Empty segment [{}, {})", t0, t1).into());
    }
    if t1 > out.len() {
        return Err(format!("Segment [{}, {}) exceeds buffer of {} samples", t0, t1, out.len()).into());
    }

    let w0 = chirp.phase(t0);
    let w1 = chirp.phase(t1);
    let freq_r = (w1 - w0) / (t1 - t0) as f64;
    let freq_l = chirp.inst_freq(t0);

    for t in t0..t1 {
        let (left, right) = crossfade_weights(t, t0, t1);
        let dt = (t - t0) as f64;
        out[t] = (left * (w0 + freq_l * dt).sin() + right * (w0 + freq_r * dt).sin()) as f32;
    }
    Ok(())
}

/// Consecutive `block_size` segments covering `[0, length)`, the last one clipped
pub fn segments(length: usize, block_size: usize) -> impl Iterator<Item = Range<usize>> {
    (0..length)
        .step_by(block_size.max(1))
        .map(move |t0| t0..(t0 + block_size).min(length))
}

/// Fill the whole buffer segment by segment; `block_size == 1` gives the exact chirp
pub fn approx_pitch_glide(
    out: &mut [f32],
    block_size: usize,
    chirp: &ChirpParams,
) -> Result<(), Box<dyn Error>> {
    if block_size == 0 {
        return Err("Block size must be at least 1".into());
    }

    let mut count = 0usize;
    for seg in segments(out.len(), block_size) {
        pitch_segment(out, seg, chirp)?;
        count += 1;
    }
    log::debug!(
        "Synthesized {} samples in {} segments of {} (tail {})",
        out.len(),
        count,
        block_size,
        match out.len() % block_size {
            0 => block_size,
            r => r,
        }
    );
    Ok(())
}

/// Deviation of an approximated buffer from the exact chirp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub rms: f64,
    pub peak: f64,
}

pub fn approximation_error(samples: &[f32], chirp: &ChirpParams) -> ErrorStats {
    if samples.is_empty() {
        return ErrorStats { rms: 0.0, peak: 0.0 };
    }

    let mut sum_sq = 0.0;
    let mut peak: f64 = 0.0;
    for (t, &s) in samples.iter().enumerate() {
        let diff = (s as f64 - chirp.phase(t).sin()).abs();
        sum_sq += diff * diff;
        peak = peak.max(diff);
    }
    ErrorStats {
        rms: (sum_sq / samples.len() as f64).sqrt(),
        peak,
    }
}

#[cfg(test)]
mod tests {
    include!("pseg_tests.rs");
}
