use thiserror::Error;

/// Errors originating from the core pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Source image missing or undecodable.
    #[error("Impossible de charger l'image {path} : {reason}")]
    ImageLoad {
        /// Path that was requested.
        path: String,
        /// Underlying decoder or I/O message.
        reason: String,
    },

    /// Degenerate width/height (zero-sized input or target).
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimension {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// User input that could not be interpreted.
    #[error("Entrée invalide : {0}")]
    InvalidInput(String),

    /// Any other failure inside the conversion pipeline.
    #[error("Échec du traitement : {0}")]
    Processing(String),
}
