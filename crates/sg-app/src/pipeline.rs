//! Orchestration source → prétraitement → géométrie → resample → quantification.

use std::path::{Path, PathBuf};

use anyhow::Result;
use sg_ascii::quantize::Quantizer;
use sg_core::charset::Method;
use sg_core::config::AppConfig;
use sg_core::error::CoreError;
use sg_core::frame::{AsciiFrame, LumaFrame, SourceImage};
use sg_core::geometry::{SizeRequest, target_size};
use sg_render::output::save_frame;
use sg_source::enhance::{adaptive_threshold, preprocess};
use sg_source::resize::Resizer;

/// Résultat d'une conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// L'art produit.
    pub frame: AsciiFrame,
    /// `(largeur, hauteur)` retenues par la géométrie.
    pub size: (u32, u32),
}

/// Convertisseur lié à une image : le prétraitement est fait une fois, le
/// resizer est réutilisé d'une conversion à l'autre.
pub struct Converter<'a> {
    config: &'a AppConfig,
    source_size: (u32, u32),
    enhanced: LumaFrame,
    resizer: Resizer,
}

impl<'a> Converter<'a> {
    /// Preprocess `source` once for every later conversion.
    #[must_use]
    pub fn new(source: &SourceImage, config: &'a AppConfig) -> Self {
        Self {
            config,
            source_size: source.dimensions(),
            enhanced: preprocess(source),
            resizer: Resizer::new(),
        }
    }

    /// Geometry, resample, optional threshold, then quantization.
    ///
    /// # Errors
    /// `InvalidDimension` for degenerate geometry, `Processing` if resampling fails.
    pub fn convert(
        &mut self,
        request: SizeRequest,
        method: Method,
    ) -> Result<Conversion, CoreError> {
        let (src_w, src_h) = self.source_size;
        let size = target_size(src_w, src_h, request, &self.config.geometry)?;

        let mut resized = self.resizer.resize(&self.enhanced, size.0, size.1)?;
        if self.config.pipeline.adaptive_threshold {
            resized = adaptive_threshold(&resized, self.config.pipeline.threshold_block);
        }

        let frame = Quantizer::new(&method.palette(), method).to_frame(&resized)?;
        log::info!(
            "Conversion {src_w}×{src_h} → {}×{} ({method})",
            size.0,
            size.1
        );
        Ok(Conversion { frame, size })
    }

    /// Comme [`Converter::convert`], mais un échec donne une frame vide après
    /// un log d'erreur.
    #[must_use]
    pub fn convert_or_empty(&mut self, request: SizeRequest, method: Method) -> AsciiFrame {
        match self.convert(request, method) {
            Ok(conversion) => conversion.frame,
            Err(e) => {
                log::error!("Conversion impossible : {e}");
                AsciiFrame::empty()
            }
        }
    }
}

/// One-shot conversion of `source`.
///
/// # Errors
/// See [`Converter::convert`].
pub fn convert(
    source: &SourceImage,
    request: SizeRequest,
    method: Method,
    config: &AppConfig,
) -> Result<Conversion, CoreError> {
    Converter::new(source, config).convert(request, method)
}

/// Render every configured profile and save `ascii_<name>.txt` into `dir`.
///
/// Returns the written paths in profile order.
///
/// # Errors
/// Returns the first conversion or write failure.
pub fn write_profiles(
    source: &SourceImage,
    config: &AppConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut converter = Converter::new(source, config);
    let mut written = Vec::with_capacity(config.profiles.len());
    for profile in &config.profiles {
        let request = SizeRequest::width(profile.width);
        let conversion = converter.convert(request, profile.method)?;
        let path = dir.join(profile.file_name());
        save_frame(&path, &conversion.frame)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::frame::FrameBuffer;

    fn landscape() -> SourceImage {
        let mut fb = FrameBuffer::new(200, 100);
        for (i, px) in fb.data.chunks_exact_mut(4).enumerate() {
            let v = (i % 200) as u8;
            px.copy_from_slice(&[v, v / 2, 255 - v, 255]);
        }
        SourceImage::Rgba(fb)
    }

    fn all_in_palette(frame: &AsciiFrame, method: Method) -> bool {
        let palette = method.palette();
        frame.rows().iter().flat_map(|r| r.chars()).all(|c| palette.contains(c))
    }

    #[test]
    fn landscape_at_width_120_gives_120_by_27() {
        let config = AppConfig::default();
        let conversion =
            convert(&landscape(), SizeRequest::width(120), Method::Balanced, &config).unwrap();
        assert_eq!(conversion.size, (120, 27));
        assert_eq!(conversion.frame.height(), 27);
        assert_eq!(conversion.frame.rows()[0].chars().count(), 120);
        assert!(all_in_palette(&conversion.frame, Method::Balanced));
    }

    #[test]
    fn no_request_uses_configured_max_width() {
        let config = AppConfig::default();
        let conversion =
            convert(&landscape(), SizeRequest::default(), Method::Simple, &config).unwrap();
        assert_eq!(conversion.size, (120, 27));
    }

    #[test]
    fn adaptive_threshold_keeps_geometry() {
        let mut config = AppConfig::default();
        config.pipeline.adaptive_threshold = true;
        let conversion =
            convert(&landscape(), SizeRequest::width(60), Method::Simple, &config).unwrap();
        assert_eq!(conversion.size, (60, 13));
        assert!(all_in_palette(&conversion.frame, Method::Simple));
    }

    #[test]
    fn zero_width_is_invalid() {
        let config = AppConfig::default();
        let res = convert(&landscape(), SizeRequest::width(0), Method::Balanced, &config);
        assert!(matches!(res, Err(CoreError::InvalidDimension { .. })));
    }

    #[test]
    fn failure_falls_back_to_empty_frame() {
        let config = AppConfig::default();
        let source = SourceImage::Luma(LumaFrame::new(0, 0));
        let mut converter = Converter::new(&source, &config);
        assert!(converter.convert_or_empty(SizeRequest::width(80), Method::Simple).is_empty());
    }

    #[test]
    fn reused_converter_matches_one_shot() {
        let config = AppConfig::default();
        let source = landscape();
        let mut converter = Converter::new(&source, &config);
        let cases = [(120, Method::Balanced), (80, Method::Simple), (120, Method::Simple)];
        for (width, method) in cases {
            let request = SizeRequest::width(width);
            let reused = converter.convert(request, method).unwrap();
            assert_eq!(reused, convert(&source, request, method, &config).unwrap());
        }
    }

    #[test]
    fn profiles_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_profiles(&landscape(), &AppConfig::default(), dir.path()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("ascii_balanced_quality.txt"),
                dir.path().join("ascii_fast_preview.txt"),
            ]
        );
        let preview = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(preview.lines().count(), 18);
        assert!(preview.lines().all(|l| l.chars().count() == 80));
    }
}
