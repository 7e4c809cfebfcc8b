use std::path::Path;

use ::image::{ColorType, DynamicImage};
use sg_core::error::CoreError;
use sg_core::frame::{FrameBuffer, LumaFrame, SourceImage};

/// Charge une image depuis le disque (PNG, JPEG, BMP, GIF).
///
/// Les images déjà en niveaux de gris restent mono-canal, les autres sont
/// normalisées en RGBA.
///
/// # Errors
/// Returns `CoreError::ImageLoad` if the file is missing or cannot be decoded.
///
/// # Example
/// ```no_run
/// use sg_source::image::load_image;
/// use std::path::Path;
/// let source = load_image(Path::new("singer.jpg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<SourceImage, CoreError> {
    let img = ::image::open(path).map_err(|e| CoreError::ImageLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let source = from_dynamic(img);
    let (w, h) = source.dimensions();
    log::info!(
        "Image chargée : {} ({w}×{h}, {})",
        path.display(),
        source.color_mode()
    );
    Ok(source)
}

/// Convertit une image décodée en `SourceImage`.
///
/// # Example
/// ```
/// use image::{DynamicImage, GrayImage};
/// use sg_source::image::from_dynamic;
/// let src = from_dynamic(DynamicImage::ImageLuma8(GrayImage::new(3, 2)));
/// assert_eq!(src.color_mode(), "L");
/// assert_eq!(src.dimensions(), (3, 2));
/// ```
#[must_use]
pub fn from_dynamic(img: DynamicImage) -> SourceImage {
    match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            let gray = img.into_luma8();
            let (width, height) = gray.dimensions();
            SourceImage::Luma(LumaFrame {
                data: gray.into_raw(),
                width,
                height,
            })
        }
        _ => {
            let rgba = img.into_rgba8();
            let (width, height) = rgba.dimensions();
            SourceImage::Rgba(FrameBuffer {
                data: rgba.into_raw(),
                width,
                height,
            })
        }
    }
}
