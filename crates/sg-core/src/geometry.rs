//! Calcul des dimensions de sortie en caractères.
//!
//! Une cellule de terminal est environ deux fois plus haute que large : la
//! hauteur est donc corrigée par `CELL_ASPECT` pour garder les proportions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Correction d'aspect d'une cellule de terminal (largeur / hauteur).
pub const CELL_ASPECT: f64 = 0.45;

/// Bornes utilisées quand aucune dimension cible n'est demandée.
///
/// # Example
/// ```
/// use sg_core::geometry::GeometryConfig;
/// let g = GeometryConfig::default();
/// assert_eq!((g.max_width, g.max_height), (120, 60));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeometryConfig {
    /// Largeur maximale en caractères.
    pub max_width: u32,
    /// Hauteur maximale en lignes.
    pub max_height: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            max_width: 120,
            max_height: 60,
        }
    }
}

/// Dimensions demandées explicitement (toutes deux optionnelles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeRequest {
    /// Target width in characters.
    pub width: Option<u32>,
    /// Target height in rows.
    pub height: Option<u32>,
}

impl SizeRequest {
    /// Request a width and let the height follow the aspect ratio.
    #[must_use]
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Request a height and let the width follow the aspect ratio.
    #[must_use]
    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

/// Compute the output `(width, height)` for an image of `src_width × src_height`.
///
/// Derived dimensions are rounded toward zero, then raised to at least 1.
///
/// # Errors
/// Returns `CoreError::InvalidDimension` when the source has a zero side or
/// when an explicit target dimension is zero.
///
/// # Example
/// ```
/// use sg_core::geometry::{target_size, GeometryConfig, SizeRequest};
/// let size = target_size(200, 100, SizeRequest::width(120), &GeometryConfig::default()).unwrap();
/// assert_eq!(size, (120, 27));
/// ```
pub fn target_size(
    src_width: u32,
    src_height: u32,
    request: SizeRequest,
    bounds: &GeometryConfig,
) -> Result<(u32, u32), CoreError> {
    if src_width == 0 || src_height == 0 {
        return Err(CoreError::InvalidDimension {
            width: src_width,
            height: src_height,
        });
    }
    if request.width == Some(0) || request.height == Some(0) {
        return Err(CoreError::InvalidDimension {
            width: request.width.unwrap_or(0),
            height: request.height.unwrap_or(0),
        });
    }

    let sw = f64::from(src_width);
    let sh = f64::from(src_height);

    let (width, height) = match (request.width, request.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, derived(f64::from(w) * sh / sw * CELL_ASPECT)),
        (None, Some(h)) => (derived(f64::from(h) * sw / sh / CELL_ASPECT), h),
        (None, None) => {
            let aspect = sh / sw;
            if src_width > src_height {
                let w = bounds.max_width.max(1);
                (w, derived(f64::from(w) * aspect * CELL_ASPECT))
            } else {
                let h = bounds.max_height.max(1);
                (derived(f64::from(h) / (aspect * CELL_ASPECT)), h)
            }
        }
    };

    log::debug!("géométrie {src_width}×{src_height} → {width}×{height}");
    Ok((width, height))
}

/// Truncate toward zero and keep the result positive.
fn derived(value: f64) -> u32 {
    (value as u32).max(1)
}
