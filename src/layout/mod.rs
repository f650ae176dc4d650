pub mod geometry;

pub use geometry::{Band, GeometryCalculator, GeometryConfig, PickerZone, Viewport};
