use rustfft::{FftPlanner, num_complex::Complex};
use std::error::Error;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum WindowType {
    Hann,
    Hamming,
}

/// STFT parameters
#[derive(Debug, Clone, Copy)]
pub struct CalcParams {
    pub n_fft: usize,
    pub hop_length: usize,
    pub window_type: WindowType,
}

/// Magnitude spectrogram of a rendered buffer
pub struct SpectrogramData {
    /// One column of dB magnitudes (n_fft / 2 + 1 bins) per hop
    pub data: Vec<Vec<f32>>,
    /// Length of the analysed buffer in samples
    pub total_samples: usize,
}

pub fn calculate_spectrogram(
    samples: &[f32],
    params: CalcParams,
) -> Result<SpectrogramData, Box<dyn Error>> {
    if params.n_fft < 2 || params.hop_length == 0 {
        return Err(format!(
            "Invalid STFT parameters: n_fft = {}, hop_length = {}",
            params.n_fft, params.hop_length
        )
        .into());
    }

    let window = match params.window_type {
        WindowType::Hann => hann_window(params.n_fft),
        WindowType::Hamming => hamming_window(params.n_fft),
    };

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(params.n_fft);

    // Frames that fit entirely inside the buffer
    let total_frames = match samples.len() {
        n if n < params.n_fft => 0,
        n => (n - params.n_fft) / params.hop_length + 1,
    };
    let num_bins = params.n_fft / 2 + 1;
    let mut columns = Vec::with_capacity(total_frames);
    let mut frame = vec![Complex::new(0.0f32, 0.0); params.n_fft];

    for i in 0..total_frames {
        let start = i * params.hop_length;
        for (j, bin) in frame.iter_mut().enumerate() {
            *bin = Complex::new(samples[start + j] * window[j], 0.0);
        }

        fft.process(&mut frame);

        // Clamp magnitude away from zero before log10
        let column: Vec<f32> = frame[..num_bins]
            .iter()
            .map(|c| 20.0 * c.norm().max(1.0e-9).log10())
            .collect();
        columns.push(column);
    }
    log::debug!(
        "STFT: {} frames x {} bins from {} samples",
        total_frames,
        num_bins,
        samples.len()
    );

    Ok(SpectrogramData {
        data: columns,
        total_samples: samples.len(),
    })
}

/// Window function Hann
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

/// Window function Hamming
fn hamming_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        .collect()
}
