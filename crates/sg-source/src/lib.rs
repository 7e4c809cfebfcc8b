/// Image sources for stagescii: decoding, enhancement and resampling.

pub mod enhance;
pub mod image;
pub mod resize;
