use rayon::prelude::*;
use sg_core::charset::{Method, Palette};
use sg_core::error::CoreError;
use sg_core::frame::{AsciiFrame, LumaFrame};

/// Exposant de la correction gamma de la méthode `balanced`.
pub const BALANCED_GAMMA: f64 = 0.85;

/// Index de palette pour une luminance, selon la méthode.
///
/// - `Balanced` : `⌊(p/255)^0.85 · N⌋`
/// - `Simple` : `⌊p · N / 256⌋`
///
/// Le résultat est toujours dans `[0, N-1]`.
///
/// # Example
/// ```
/// use sg_ascii::quantize::palette_index;
/// use sg_core::charset::Method;
/// assert_eq!(palette_index(Method::Simple, 128, 10), 5);
/// assert_eq!(palette_index(Method::Balanced, 255, 11), 10);
/// assert_eq!(palette_index(Method::Balanced, 0, 11), 0);
/// ```
#[must_use]
pub fn palette_index(method: Method, luminance: u8, n: usize) -> usize {
    let last = n.saturating_sub(1);
    let idx = match method {
        Method::Balanced => {
            let normalized = f64::from(luminance) / 255.0;
            (normalized.powf(BALANCED_GAMMA) * n as f64) as usize
        }
        Method::Simple => usize::from(luminance) * n / 256,
    };
    idx.min(last)
}

/// Table luminance [0..255] → caractère, pré-calculée pour une palette et une méthode.
///
/// # Example
/// ```
/// use sg_ascii::quantize::Quantizer;
/// use sg_core::charset::{Method, Palette};
/// let q = Quantizer::new(&Palette::clean(), Method::Simple);
/// assert_eq!(q.map(0), '@');
/// assert_eq!(q.map(255), ' ');
/// ```
pub struct Quantizer {
    lut: [char; 256],
}

impl Quantizer {
    /// Build the LUT.
    #[must_use]
    pub fn new(palette: &Palette, method: Method) -> Self {
        let mut lut = [' '; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = palette.get(palette_index(method, i as u8, palette.len()));
        }
        Self { lut }
    }

    /// Map a luminance value to its character.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }

    /// One string per pixel row.
    fn rows(&self, frame: &LumaFrame) -> Vec<String> {
        let width = frame.width as usize;
        if width == 0 {
            return Vec::new();
        }
        frame
            .data
            .par_chunks(width)
            .map(|row| row.iter().map(|&p| self.map(p)).collect())
            .collect()
    }

    /// Row-major character sequence, one character per pixel.
    #[must_use]
    pub fn quantize(&self, frame: &LumaFrame) -> String {
        self.rows(frame).concat()
    }

    /// Quantize and split into an [`AsciiFrame`] of the frame's width.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDimension` for a zero-sized frame.
    pub fn to_frame(&self, frame: &LumaFrame) -> Result<AsciiFrame, CoreError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(CoreError::InvalidDimension {
                width: frame.width,
                height: frame.height,
            });
        }
        log::debug!("quantification {}×{}", frame.width, frame.height);
        AsciiFrame::from_rows(self.rows(frame))
    }
}

/// Convenience: quantize `frame` with `palette` and `method`.
///
/// # Example
/// ```
/// use sg_ascii::quantize::quantize;
/// use sg_core::charset::{Method, Palette};
/// use sg_core::frame::LumaFrame;
/// let out = quantize(&LumaFrame::filled(3, 2, 128), &Palette::clean(), Method::Simple);
/// assert_eq!(out, "======");
/// ```
#[must_use]
pub fn quantize(frame: &LumaFrame, palette: &Palette, method: Method) -> String {
    Quantizer::new(palette, method).quantize(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> LumaFrame {
        let data = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
        LumaFrame::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn mid_gray_simple_clean_is_uniform_sixth_char() {
        let palette = Palette::clean();
        let out = quantize(&LumaFrame::filled(16, 8, 128), &palette, Method::Simple);
        assert_eq!(out.chars().count(), 128);
        assert!(out.chars().all(|c| c == palette.get(5)));
        assert!(out.chars().all(|c| c == '='));
    }

    #[test]
    fn indices_stay_in_range() {
        for n in [2usize, 10, 11, 70] {
            for p in 0..=255u8 {
                assert!(palette_index(Method::Balanced, p, n) < n);
                assert!(palette_index(Method::Simple, p, n) < n);
            }
        }
    }

    #[test]
    fn indices_are_monotonic_in_luminance() {
        for method in [Method::Balanced, Method::Simple] {
            let idx: Vec<usize> = (0..=255u8).map(|p| palette_index(method, p, 11)).collect();
            assert!(idx.windows(2).all(|w| w[0] <= w[1]), "{method}");
        }
    }

    #[test]
    fn balanced_gamma_lifts_midtones() {
        // (128/255)^0.85 · 11 = 6.0x, contre 5 en linéaire
        assert_eq!(palette_index(Method::Balanced, 128, 11), 6);
        assert_eq!(palette_index(Method::Balanced, 100, 11), 4);
    }

    #[test]
    fn output_chars_belong_to_palette() {
        let frame = gradient(37, 11);
        for method in [Method::Balanced, Method::Simple] {
            let palette = method.palette();
            let out = quantize(&frame, &palette, method);
            assert!(out.chars().all(|c| palette.contains(c)));
        }
    }

    #[test]
    fn quantize_is_deterministic() {
        let frame = gradient(64, 33);
        let palette = Palette::balanced();
        let a = quantize(&frame, &palette, Method::Balanced);
        let b = quantize(&frame, &palette, Method::Balanced);
        assert_eq!(a, b);
    }

    #[test]
    fn to_frame_has_one_row_per_pixel_row() {
        let frame = gradient(120, 27);
        let ascii = Quantizer::new(&Palette::balanced(), Method::Balanced)
            .to_frame(&frame)
            .unwrap();
        assert_eq!(ascii.height(), 27);
        assert!(ascii.rows().iter().all(|r| r.chars().count() == 120));
    }

    #[test]
    fn to_frame_matches_flat_sequence() {
        let frame = gradient(9, 4);
        let q = Quantizer::new(&Palette::clean(), Method::Simple);
        let flat = q.quantize(&frame);
        let split = AsciiFrame::from_chars(&flat, 9).unwrap();
        assert_eq!(q.to_frame(&frame).unwrap(), split);
    }

    #[test]
    fn to_frame_rejects_empty_frame() {
        let q = Quantizer::new(&Palette::clean(), Method::Simple);
        assert!(q.to_frame(&LumaFrame::new(0, 0)).is_err());
    }
}
