//! Preview media handling:
//! - `image_loader` - natural image dimensions
//! - `MediaProbe` / `FileProbe` - where dimensions come from
//! - `OrientationResolver` - supersedable background orientation resolution

pub mod image_loader;
pub mod orientation;
pub mod probe;

pub use orientation::{OrientationResolver, Resolution, ResolveTicket, ResolvedMedia};
pub use probe::{FileProbe, MediaProbe};
