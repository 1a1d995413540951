use super::scalc::SpectrogramData;
use hsl::HSL;
use image::{Rgb, RgbImage};

const GRADIENT_SIZE: usize = 256;
const MARKER_HEIGHT: u32 = 6;
const MARKER_COLOR: Rgb<u8> = Rgb([0xff, 0x40, 0x40]);

/// Supported color schemes for spectrogram rendering
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum ColorScheme {
    Oceanic,   // #01041B -> #072e69 -> #4da4d5 -> #dcf3ff
    Grayscale, // #000000 -> #888888 -> #ffffff
    Inferno,   // #000004 -> #3b0f70 -> #ac255e -> #f98e09 -> #fcfd21
    Viridis,   // #440154 -> #3b528b -> #21918c -> #5ec962 -> #fde725
}

impl ColorScheme {
    fn stops(self) -> &'static [u32] {
        match self {
            ColorScheme::Oceanic => &[0x01041B, 0x072e69, 0x4da4d5, 0xdcf3ff],
            ColorScheme::Grayscale => &[0x000000, 0x888888, 0xffffff],
            ColorScheme::Inferno => &[0x000004, 0x3b0f70, 0xac255e, 0xf98e09, 0xfcfd21],
            ColorScheme::Viridis => &[0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725],
        }
    }
}

fn unpack_rgb(rgb: u32) -> [u8; 3] {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
}

/// 256-entry lookup table interpolated in HSL between color stops
struct Gradient {
    colors: Vec<Rgb<u8>>,
}

impl Gradient {
    fn new(stops: &[u32]) -> Self {
        match stops {
            [] => Self { colors: vec![Rgb([0, 0, 0]); GRADIENT_SIZE] },
            [only] => Self { colors: vec![Rgb(unpack_rgb(*only)); GRADIENT_SIZE] },
            _ => {
                let hsl_stops: Vec<HSL> =
                    stops.iter().map(|&c| HSL::from_rgb(&unpack_rgb(c))).collect();
                let segments = hsl_stops.len() - 1;
                let colors = (0..GRADIENT_SIZE)
                    .map(|i| {
                        let pos = i as f64 / (GRADIENT_SIZE - 1) as f64 * segments as f64;
                        let idx = (pos.floor() as usize).min(segments - 1);
                        lerp_hsl(hsl_stops[idx], hsl_stops[idx + 1], pos - idx as f64)
                    })
                    .collect();
                Self { colors }
            }
        }
    }

    fn color_at(&self, value: f32) -> Rgb<u8> {
        let idx = (value.clamp(0.0, 1.0) * (GRADIENT_SIZE - 1) as f32).round() as usize;
        self.colors[idx.min(GRADIENT_SIZE - 1)]
    }
}

/// Interpolate two HSL colors, taking the short way around the hue circle
fn lerp_hsl(from: HSL, to: HSL, k: f64) -> Rgb<u8> {
    let mut h_from = from.h;
    let h_diff = to.h - from.h;
    if h_diff > 180.0 {
        h_from += 360.0;
    } else if h_diff < -180.0 {
        h_from -= 360.0;
    }
    let h = (h_from + (to.h - h_from) * k).rem_euclid(360.0);
    let s = from.s + (to.s - from.s) * k;
    let l = from.l + (to.l - from.l) * k;
    let (r, g, b) = HSL { h, s, l }.to_rgb();
    Rgb([r, g, b])
}

/// Render a spectrogram with low frequencies at the bottom.
///
/// - `dynamic_range`: dB below the global peak mapped to the darkest color
/// - `block_size`: if set, block boundaries are marked along the bottom edge
pub fn create_spectrogram_image(
    spec_data: &SpectrogramData,
    width: u32,
    height: u32,
    color_scheme: ColorScheme,
    dynamic_range: f32,
    block_size: Option<usize>,
) -> RgbImage {
    let gradient = Gradient::new(color_scheme.stops());
    let mut img = RgbImage::new(width, height);

    if spec_data.data.is_empty() || width == 0 || height == 0 {
        return img;
    }

    let master_width = spec_data.data.len();
    let master_height = spec_data.data[0].len();

    let max_db = spec_data
        .data
        .iter()
        .flatten()
        .cloned()
        .fold(f32::MIN, f32::max);
    let min_db = max_db - dynamic_range;

    for x in 0..width {
        // Columns of master data under this pixel column; keep the loudest to preserve short events
        let start_col = (x as usize * master_width) / width as usize;
        let end_col = (((x as usize + 1) * master_width) / width as usize)
            .max(start_col + 1)
            .min(master_width);

        for y in 0..height {
            let bin = ((height - 1 - y) as usize * master_height) / height as usize;
            let max_val = spec_data.data[start_col..end_col]
                .iter()
                .filter_map(|col| col.get(bin))
                .cloned()
                .fold(f32::NEG_INFINITY, f32::max);
            img.put_pixel(x, y, gradient.color_at((max_val - min_db) / dynamic_range));
        }
    }

    if let Some(block) = block_size {
        draw_block_markers(&mut img, spec_data.total_samples, block);
    }

    img
}

/// Tick marks at every block boundary, skipped when they would merge into a solid bar
fn draw_block_markers(img: &mut RgbImage, total_samples: usize, block_size: usize) {
    let (width, height) = img.dimensions();
    if block_size == 0 || total_samples == 0 {
        return;
    }
    let boundaries = total_samples.div_ceil(block_size);
    if boundaries > width as usize / 2 {
        log::debug!(
            "Skipping {} block markers on a {} px wide image",
            boundaries,
            width
        );
        return;
    }

    for t in (block_size..total_samples).step_by(block_size) {
        let x = ((t as u64 * width as u64) / total_samples as u64) as u32;
        for y in height.saturating_sub(MARKER_HEIGHT)..height {
            img.put_pixel(x.min(width - 1), y, MARKER_COLOR);
        }
    }
}
