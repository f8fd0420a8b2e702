//! Vector and point aliases for 2D image-space math.

use nalgebra::{Point2, Vector2};

/// 2D vector type for the baseline and flame-edge vectors.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`. f64 keeps the arccos
/// of near-parallel edge vectors well conditioned for slender flames.
pub type Vec2 = Vector2<f64>;

/// A marked location in image-pixel coordinates.
///
/// Coordinates are in the displayed (scaled) image's pixel space as reported
/// by the click handler; the core never re-scales them.
pub type PixelPoint = Point2<f64>;
