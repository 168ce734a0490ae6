//! Mask patterns: a catalogue of named, data-type aware value transforms.

pub mod builtin;
pub mod registry;
pub mod transforms;

pub use builtin::ids;
pub use registry::{MaskPattern, PatternContext, PatternRegistry, Transform};
