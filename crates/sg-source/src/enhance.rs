//! Prétraitement avant quantification : niveaux de gris, contraste,
//! luminosité, égalisation d'histogramme, netteté.
//!
//! Chaque étape produit une nouvelle `LumaFrame` ; l'entrée n'est jamais modifiée.

use rayon::prelude::*;
use sg_core::frame::{LumaFrame, SourceImage};

/// Multiplicateur de contraste autour de la moyenne.
pub const CONTRAST_FACTOR: f32 = 1.4;

/// Multiplicateur de luminosité.
pub const BRIGHTNESS_FACTOR: f32 = 1.05;

/// Run the full preprocessing chain in its fixed order: luminance, contrast,
/// brightness, equalization, sharpening.
///
/// # Example
/// ```
/// use sg_core::frame::{LumaFrame, SourceImage};
/// use sg_source::enhance::preprocess;
/// let out = preprocess(&SourceImage::Luma(LumaFrame::filled(8, 8, 90)));
/// assert_eq!(out.dimensions(), (8, 8));
/// ```
#[must_use]
pub fn preprocess(source: &SourceImage) -> LumaFrame {
    let frame = to_luma(source);
    let frame = adjust_contrast(&frame, CONTRAST_FACTOR);
    let frame = adjust_brightness(&frame, BRIGHTNESS_FACTOR);
    sharpen(&equalize(&frame))
}

/// Convertit en luminance si la source n'est pas déjà mono-canal.
///
/// Pondération ITU-R 601-2 : `L = (299·R + 587·G + 114·B) / 1000`.
#[must_use]
pub fn to_luma(source: &SourceImage) -> LumaFrame {
    match source {
        SourceImage::Luma(frame) => frame.clone(),
        SourceImage::Rgba(fb) => {
            let data = fb
                .data
                .chunks_exact(4)
                .map(|px| {
                    ((u32::from(px[0]) * 299 + u32::from(px[1]) * 587 + u32::from(px[2]) * 114)
                        / 1000) as u8
                })
                .collect();
            LumaFrame {
                data,
                width: fb.width,
                height: fb.height,
            }
        }
    }
}

/// `mean + factor · (p − mean)`, mean rounded to the nearest integer.
///
/// # Example
/// ```
/// use sg_core::frame::LumaFrame;
/// use sg_source::enhance::adjust_contrast;
/// let f = LumaFrame::from_raw(2, 1, vec![100, 200]).unwrap();
/// // mean = 150 → 150 ± 1.4·50
/// assert_eq!(adjust_contrast(&f, 1.4).data, vec![80, 220]);
/// ```
#[must_use]
pub fn adjust_contrast(frame: &LumaFrame, factor: f32) -> LumaFrame {
    if frame.data.is_empty() {
        return frame.clone();
    }
    let sum: u64 = frame.data.iter().map(|&p| u64::from(p)).sum();
    let mean = (sum as f64 / frame.data.len() as f64 + 0.5) as u8;
    let lut = blend_lut(mean, factor);
    apply_lut(frame, &lut)
}

/// `p · factor`, truncated and clamped.
#[must_use]
pub fn adjust_brightness(frame: &LumaFrame, factor: f32) -> LumaFrame {
    let lut = blend_lut(0, factor);
    apply_lut(frame, &lut)
}

/// LUT for `base + alpha · (p − base)`.
fn blend_lut(base: u8, alpha: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let b = f32::from(base);
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = b + alpha * (i as f32 - b);
        *slot = if v <= 0.0 {
            0
        } else if v >= 255.0 {
            255
        } else {
            v as u8
        };
    }
    lut
}

fn apply_lut(frame: &LumaFrame, lut: &[u8; 256]) -> LumaFrame {
    LumaFrame {
        data: frame.data.iter().map(|&p| lut[p as usize]).collect(),
        width: frame.width,
        height: frame.height,
    }
}

/// Égalisation globale d'histogramme.
///
/// Le dernier niveau occupé est exclu du calcul du pas ; une image à un seul
/// niveau (ou dont le pas tombe à zéro) est renvoyée telle quelle.
#[must_use]
pub fn equalize(frame: &LumaFrame) -> LumaFrame {
    let mut histo = [0u64; 256];
    for &p in &frame.data {
        histo[p as usize] += 1;
    }

    let occupied: Vec<u64> = histo.iter().copied().filter(|&c| c > 0).collect();
    let Some(&last) = occupied.last() else {
        return frame.clone();
    };
    if occupied.len() <= 1 {
        return frame.clone();
    }
    let total: u64 = occupied.iter().sum();
    let step = (total - last) / 255;
    if step == 0 {
        return frame.clone();
    }

    let mut lut = [0u8; 256];
    let mut n = step / 2;
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = (n / step).min(255) as u8;
        n += histo[i];
    }
    apply_lut(frame, &lut)
}

/// Netteté 3×3 : `(32·c − 2·Σ voisins) / 16`, arrondi. Les bords sont copiés.
///
/// # Example
/// ```
/// use sg_core::frame::LumaFrame;
/// use sg_source::enhance::sharpen;
/// // Un plat reste un plat : 32v − 16v = 16v.
/// let f = LumaFrame::filled(5, 5, 77);
/// assert_eq!(sharpen(&f), f);
/// ```
#[must_use]
pub fn sharpen(frame: &LumaFrame) -> LumaFrame {
    let (w, h) = (frame.width as usize, frame.height as usize);
    if w < 3 || h < 3 {
        return frame.clone();
    }
    let src = &frame.data;
    let mut out = src.clone();

    out.par_chunks_mut(w)
        .enumerate()
        .skip(1)
        .take(h - 2)
        .for_each(|(y, row)| {
            for x in 1..w - 1 {
                let at = |dx: usize, dy: usize| i32::from(src[(y + dy - 1) * w + (x + dx - 1)]);
                let neighbours = at(0, 0)
                    + at(1, 0)
                    + at(2, 0)
                    + at(0, 1)
                    + at(2, 1)
                    + at(0, 2)
                    + at(1, 2)
                    + at(2, 2);
                let sum = 32 * at(1, 1) - 2 * neighbours;
                row[x] = if sum <= 0 {
                    0
                } else {
                    ((sum + 8) / 16).min(255) as u8
                };
            }
        });

    LumaFrame {
        data: out,
        width: frame.width,
        height: frame.height,
    }
}

/// Seuillage adaptatif : renforce les pixels au-dessus de la moyenne locale.
///
/// Fenêtre `block × block` tronquée aux bords. Au-dessus de `1.05 · moyenne` :
/// `min(255, 1.2 · p)`, sinon `0.8 · p`.
#[must_use]
pub fn adaptive_threshold(frame: &LumaFrame, block: u32) -> LumaFrame {
    let (w, h) = (frame.width as usize, frame.height as usize);
    if w == 0 || h == 0 {
        return frame.clone();
    }
    let half = (block / 2) as usize;

    // Image intégrale (w+1)×(h+1).
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += u64::from(frame.data[y * w + x]);
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let mut data = vec![0u8; w * h];
    data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(h);
        for (x, out) in row.iter_mut().enumerate() {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(w);
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let avg = sum as f64 / count;
            let p = f64::from(frame.data[y * w + x]);
            *out = if p > avg * 1.05 {
                (p * 1.2).min(255.0) as u8
            } else {
                (p * 0.8) as u8
            };
        }
    });

    LumaFrame {
        data,
        width: frame.width,
        height: frame.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::frame::FrameBuffer;

    #[test]
    fn to_luma_keeps_gray_and_converts_rgba() {
        let gray = LumaFrame::filled(2, 2, 42);
        assert_eq!(to_luma(&SourceImage::Luma(gray.clone())), gray);

        let mut fb = FrameBuffer::new(1, 1);
        fb.data.copy_from_slice(&[0, 0, 255, 255]);
        assert_eq!(to_luma(&SourceImage::Rgba(fb)).data, vec![29]);
    }

    #[test]
    fn to_luma_follows_601_weights() {
        let fb = FrameBuffer {
            data: vec![255, 0, 0, 255, 0, 255, 0, 255, 255, 255, 255, 0],
            width: 3,
            height: 1,
        };
        assert_eq!(to_luma(&SourceImage::Rgba(fb)).data, vec![76, 149, 255]);
    }

    #[test]
    fn contrast_clamps_extremes() {
        let f = LumaFrame::from_raw(3, 1, vec![0, 128, 255]).unwrap();
        let out = adjust_contrast(&f, 3.0);
        assert_eq!(out.data[0], 0);
        assert_eq!(out.data[2], 255);
    }

    #[test]
    fn brightness_truncates() {
        let f = LumaFrame::from_raw(3, 1, vec![10, 50, 250]).unwrap();
        // 10.5 → 10, 52.5 → 52, 262.5 → 255
        assert_eq!(adjust_brightness(&f, 1.05).data, vec![10, 52, 255]);
    }

    #[test]
    fn equalize_uniform_image_is_identity() {
        let f = LumaFrame::filled(4, 4, 128);
        assert_eq!(equalize(&f), f);
    }

    #[test]
    fn equalize_spreads_two_levels() {
        let mut data = vec![10u8; 512];
        data.extend(vec![20u8; 512]);
        let f = LumaFrame::from_raw(32, 32, data).unwrap();
        let out = equalize(&f);
        // step = 512 / 255 = 2 → niveau 10 : 1/2 = 0 ; niveau 20 : (1 + 512)/2 = 256 → 255
        assert_eq!(out.data[0], 0);
        assert_eq!(out.data[1023], 255);
    }

    #[test]
    fn equalize_is_monotonic() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let out = equalize(&LumaFrame::from_raw(64, 64, data.clone()).unwrap());
        let mut pairs: Vec<(u8, u8)> = data.into_iter().zip(out.data).collect();
        pairs.sort_unstable();
        assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn sharpen_boosts_isolated_peak() {
        let mut f = LumaFrame::filled(3, 3, 100);
        f.data[4] = 150;
        let out = sharpen(&f);
        // (32·150 − 16·100) / 16 = 200
        assert_eq!(out.data[4], 200);
        assert_eq!(out.data[0], 100);
    }

    #[test]
    fn sharpen_leaves_tiny_frames_alone() {
        let f = LumaFrame::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(sharpen(&f), f);
    }

    #[test]
    fn preprocess_always_returns_single_channel() {
        let fb = FrameBuffer::new(6, 4);
        let out = preprocess(&SourceImage::Rgba(fb));
        assert_eq!(out.data.len(), 24);
    }

    #[test]
    fn adaptive_threshold_splits_around_local_mean() {
        let mut f = LumaFrame::filled(5, 5, 100);
        f.data[12] = 200;
        let out = adaptive_threshold(&f, 3);
        assert_eq!(out.data[12], 240);
        assert_eq!(out.data[0], 80);
    }
}
