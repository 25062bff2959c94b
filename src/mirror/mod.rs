//! Mirror probing and per-segment resolution.

mod probe;
mod resolver;

pub use probe::{segment_url, HttpProbe, SegmentProbe};
pub use resolver::{MirrorResolver, SegmentResolution};
