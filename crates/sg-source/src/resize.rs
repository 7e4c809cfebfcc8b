use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use sg_core::error::CoreError;
use sg_core::frame::LumaFrame;

/// Resizer réutilisable wrappant fast_image_resize, filtre Lanczos3.
///
/// # Example
/// ```
/// use sg_core::frame::LumaFrame;
/// use sg_source::resize::Resizer;
/// let src = LumaFrame::filled(200, 100, 128);
/// let dst = Resizer::new().resize(&src, 120, 27).unwrap();
/// assert_eq!(dst.dimensions(), (120, 27));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (the fir API wants `&mut` on it).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new Lanczos3 resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
            src_buf: Vec::new(),
        }
    }

    /// Resample `src` to exactly `width × height`. `src` is left untouched.
    ///
    /// # Errors
    /// `InvalidDimension` for a zero-sized source or target, `Processing` if
    /// fast_image_resize rejects the buffers.
    pub fn resize(
        &mut self,
        src: &LumaFrame,
        width: u32,
        height: u32,
    ) -> Result<LumaFrame, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimension { width, height });
        }
        if src.width == 0 || src.height == 0 {
            return Err(CoreError::InvalidDimension {
                width: src.width,
                height: src.height,
            });
        }
        if src.width == width && src.height == height {
            return Ok(src.clone());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8)
                .map_err(|e| CoreError::Processing(format!("source invalide : {e}")))?;
        let mut dst_image = Image::new(width, height, PixelType::U8);

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| CoreError::Processing(format!("redimensionnement échoué : {e}")))?;

        log::debug!("resize {}×{} → {width}×{height}", src.width, src.height);
        LumaFrame::from_raw(width, height, dst_image.into_vec())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}
