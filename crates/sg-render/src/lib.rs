/// Terminal rendering for stagescii.
///
/// Stage overlays, the animation loop, and plain-text output.
pub mod animate;
pub mod output;
pub mod stage;
