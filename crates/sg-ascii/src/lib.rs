/// ASCII conversion engine for stagescii.
///
/// Maps luminance frames to palette characters.
pub mod quantize;

pub use quantize::{Quantizer, palette_index, quantize};
