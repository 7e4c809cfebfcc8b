/// Configuration, types, and shared structures for stagescii.
///
/// This crate contains the types shared by every stage of the
/// image → ASCII pipeline: frames, palettes, geometry, configuration and errors.

pub mod cancel;
pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;

pub use cancel::{ArmGuard, CancelToken};
pub use charset::{Method, Palette};
pub use config::{AppConfig, QualityProfile};
pub use error::CoreError;
pub use frame::{AsciiFrame, FrameBuffer, LumaFrame, SourceImage};
pub use geometry::{CELL_ASPECT, GeometryConfig, SizeRequest, target_size};
