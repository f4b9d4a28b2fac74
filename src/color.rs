use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential blue scale
// ---------------------------------------------------------------------------

/// Brand navy used for headings and chart text.
pub const NAVY: Color32 = Color32::from_rgb(0x1E, 0x3D, 0x59);

/// A colour on a light-to-dark blue scale; `t` is clamped to `[0, 1]`.
pub fn blues(t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let hue = 205.0 + 15.0 * t;
    let saturation = 0.55 + 0.25 * t;
    let lightness = 0.82 - 0.57 * t;
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour each value by where it sits between the smallest and largest
/// value; equal values (or a single value) get the darkest shade.
pub fn value_colors(values: &[f64]) -> Vec<Color32> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    values
        .iter()
        .map(|&v| {
            if range.abs() < f64::EPSILON {
                blues(1.0)
            } else {
                blues(((v - lo) / range) as f32)
            }
        })
        .collect()
}

/// `n` shades from dark to light, for ranked slices.
pub fn ranked_blues(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![blues(1.0)],
        _ => (0..n)
            .map(|i| blues(1.0 - i as f32 / (n - 1) as f32))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(c: Color32) -> u32 {
        c.r() as u32 + c.g() as u32 + c.b() as u32
    }

    #[test]
    fn scale_darkens_with_value() {
        assert!(luminance(blues(0.0)) > luminance(blues(0.5)));
        assert!(luminance(blues(0.5)) > luminance(blues(1.0)));
        assert_eq!(blues(2.0), blues(1.0));
        assert_eq!(blues(f32::NAN), blues(0.0));
    }

    #[test]
    fn value_colors_handles_flat_input() {
        let colors = value_colors(&[3.0, 3.0]);
        assert_eq!(colors, vec![blues(1.0), blues(1.0)]);
        assert!(value_colors(&[]).is_empty());
    }

    #[test]
    fn ranked_blues_starts_dark() {
        let shades = ranked_blues(3);
        assert_eq!(shades.len(), 3);
        assert_eq!(shades[0], blues(1.0));
        assert_eq!(shades[2], blues(0.0));
    }
}
