//! Conical flame geometry from three marked image points
//!
//! Reconstructs the semi-apex angle and physical height of a Bunsen-type
//! conical flame from three points marked on a photograph: the two ends of a
//! reference segment across the flame base, then the flame tip. The known
//! real-world length of the base segment calibrates pixel distances to
//! millimetres; the angle itself comes from normalized dot products and is
//! therefore independent of image scale and rotation.
//!
//! # References
//! - Rallis, C.J., Garforth, A.M. (1980). "The determination of laminar burning velocity."
//!   Progress in Energy and Combustion Science, 6(4), 303-329.
//! - Law, C.K. (2006). "Combustion Physics." Cambridge University Press.
//!   (Bunsen flame cone-angle method)

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::BurnerConfig;
use crate::core_types::{PixelPoint, Vec2};

/// Squared pixel distance below which two marks are treated as coincident
const COINCIDENT_EPS_SQ: f64 = 1e-12;

/// The three marked points of one measurement, in marking order.
///
/// Order is significant: the first two marks span the base reference segment
/// while the third is the flame tip. Swapping the apex with a base point
/// changes which vectors are treated as baseline versus flame edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTriple {
    /// First mark: left end of the base reference segment
    pub base_left: PixelPoint,
    /// Second mark: right end of the base reference segment
    pub base_right: PixelPoint,
    /// Third mark: flame tip
    pub apex: PixelPoint,
}

impl PointTriple {
    /// Assemble a triple from the three marks in marking order.
    #[must_use]
    pub fn new(base_left: PixelPoint, base_right: PixelPoint, apex: PixelPoint) -> Self {
        Self {
            base_left,
            base_right,
            apex,
        }
    }

    /// Assemble a triple from raw `(x, y)` pixel pairs in marking order.
    #[must_use]
    pub fn from_coords(coords: [(f64, f64); 3]) -> Self {
        Self::new(
            PixelPoint::new(coords[0].0, coords[0].1),
            PixelPoint::new(coords[1].0, coords[1].1),
            PixelPoint::new(coords[2].0, coords[2].1),
        )
    }
}

/// Resolved flame cone geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    /// Half the angle between the two visible flame edges (degrees)
    pub semi_apex_angle_deg: f64,
    /// Flame height above the base reference segment (mm)
    ///
    /// Reported for display and validation; the flame speed formula consumes
    /// only the semi-apex angle.
    pub flame_height_mm: f64,
}

/// Errors from flame geometry resolution
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Two of the marked points coincide, leaving a zero-length vector
    DegenerateGeometry(String),
    /// Calibration length is not a positive finite distance
    InvalidCalibration(f64),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::DegenerateGeometry(msg) => write!(f, "Degenerate geometry: {msg}"),
            GeometryError::InvalidCalibration(value) => {
                write!(
                    f,
                    "Invalid calibration length: expected a positive finite \
                     distance in mm, got {value}"
                )
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Resolve flame cone geometry from three marked points.
///
/// # Algorithm
/// ```text
/// baseline   = base_right - base_left        (real length = calibration_mm)
/// left_edge  = apex - base_left
/// right_edge = apex - base_right
/// alpha      = 0.5 * arccos(left_edge . right_edge / (|left_edge| |right_edge|))
/// height     = |left_edge - proj_baseline(left_edge)| * calibration_mm / |baseline|
/// ```
///
/// The arccos argument is clamped to `[-1, 1]`: tiny overshoot is expected
/// from floating-point rounding and must not fault the measurement.
///
/// # Errors
/// Returns `GeometryError::DegenerateGeometry` when any coordinate is
/// non-finite or any two of the points coincide, and
/// `GeometryError::InvalidCalibration` when the configured calibration
/// length is not a positive finite number
pub fn resolve(
    points: &PointTriple,
    config: &BurnerConfig,
) -> Result<GeometryResult, GeometryError> {
    let calibration_mm = config.calibration_mm;
    if !calibration_mm.is_finite() || calibration_mm <= 0.0 {
        return Err(GeometryError::InvalidCalibration(calibration_mm));
    }

    let coords = [points.base_left, points.base_right, points.apex];
    if coords.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::DegenerateGeometry(
            "point coordinates must be finite".to_string(),
        ));
    }

    let baseline: Vec2 = points.base_right - points.base_left;
    let left_edge: Vec2 = points.apex - points.base_left;
    let right_edge: Vec2 = points.apex - points.base_right;

    if baseline.norm_squared() < COINCIDENT_EPS_SQ {
        return Err(GeometryError::DegenerateGeometry(
            "base reference points coincide".to_string(),
        ));
    }
    if left_edge.norm_squared() < COINCIDENT_EPS_SQ {
        return Err(GeometryError::DegenerateGeometry(
            "apex coincides with the left base point".to_string(),
        ));
    }
    if right_edge.norm_squared() < COINCIDENT_EPS_SQ {
        return Err(GeometryError::DegenerateGeometry(
            "apex coincides with the right base point".to_string(),
        ));
    }

    // Pixel-to-millimetre conversion from the known base segment length
    let scale_mm_per_px = calibration_mm / baseline.norm();

    // Full cone angle between the two edges, halved
    let cos_cone_angle = left_edge.dot(&right_edge) / (left_edge.norm() * right_edge.norm());
    if cos_cone_angle.abs() > 1.0 {
        warn!(cos_cone_angle, "clamping out-of-range edge-angle cosine");
    }
    let semi_apex_angle_rad = 0.5 * cos_cone_angle.clamp(-1.0, 1.0).acos();

    // Component of the left edge perpendicular to the baseline, so a tilted
    // photograph still yields the height above the burner rim
    let along_baseline = baseline.dot(&left_edge) / baseline.norm_squared();
    let perpendicular = left_edge - baseline * along_baseline;
    let flame_height_mm = perpendicular.norm() * scale_mm_per_px;

    Ok(GeometryResult {
        semi_apex_angle_deg: semi_apex_angle_rad.to_degrees(),
        flame_height_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn isosceles_triple() -> PointTriple {
        // Base points 200 px apart, apex 200 px above the base midpoint.
        // Semi-apex angle is arctan(100/200) = 26.565 degrees.
        PointTriple::from_coords([(-100.0, 0.0), (100.0, 0.0), (0.0, 200.0)])
    }

    fn config_with_calibration(calibration_mm: f64) -> BurnerConfig {
        BurnerConfig {
            calibration_mm,
            ..BurnerConfig::default()
        }
    }

    #[test]
    fn test_isosceles_reference_flame() {
        // 200 px baseline calibrated to 200 mm makes the scale exactly 1
        let config = config_with_calibration(200.0);
        let result = resolve(&isosceles_triple(), &config).unwrap();

        assert_relative_eq!(result.semi_apex_angle_deg, 26.565, epsilon = 1e-3);
        assert_relative_eq!(result.flame_height_mm, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_within_open_interval_and_height_non_negative() {
        let triple = PointTriple::from_coords([(120.0, 410.0), (310.0, 405.0), (218.0, 160.0)]);
        let config = config_with_calibration(19.5);
        let result = resolve(&triple, &config).unwrap();

        assert!(result.semi_apex_angle_deg > 0.0);
        assert!(result.semi_apex_angle_deg < 90.0);
        assert!(result.flame_height_mm >= 0.0);
    }

    #[test]
    fn test_base_swap_leaves_angle_unchanged() {
        let config = config_with_calibration(19.5);
        let triple = PointTriple::from_coords([(120.0, 410.0), (310.0, 405.0), (218.0, 160.0)]);
        let swapped = PointTriple::new(triple.base_right, triple.base_left, triple.apex);

        let original = resolve(&triple, &config).unwrap();
        let mirrored = resolve(&swapped, &config).unwrap();

        assert_relative_eq!(
            original.semi_apex_angle_deg,
            mirrored.semi_apex_angle_deg,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_scale_invariance_once_calibrated() {
        let triple = isosceles_triple();
        let scaled = PointTriple::from_coords([(-250.0, 0.0), (250.0, 0.0), (0.0, 500.0)]);

        let result = resolve(&triple, &config_with_calibration(200.0)).unwrap();
        let rescaled = resolve(&scaled, &config_with_calibration(500.0)).unwrap();

        assert_relative_eq!(
            result.semi_apex_angle_deg,
            rescaled.semi_apex_angle_deg,
            epsilon = 1e-9
        );
        // Height differs because their calibrations describe different rigs;
        // scaling both points and calibration by the same factor keeps the
        // angle, and the pixel scale cancels out of the height as well when
        // the physical scene is unchanged.
        let same_scene = resolve(
            &PointTriple::from_coords([(-300.0, 0.0), (300.0, 0.0), (0.0, 600.0)]),
            &config_with_calibration(200.0),
        )
        .unwrap();
        assert_relative_eq!(
            result.flame_height_mm,
            same_scene.flame_height_mm,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rotation_invariance_of_angle() {
        // Same isosceles cone rotated 30 degrees in image space
        let (sin, cos) = 30.0_f64.to_radians().sin_cos();
        let rotate = |x: f64, y: f64| (x * cos - y * sin, x * sin + y * cos);
        let rotated = PointTriple::from_coords([
            rotate(-100.0, 0.0),
            rotate(100.0, 0.0),
            rotate(0.0, 200.0),
        ]);

        let config = config_with_calibration(200.0);
        let upright = resolve(&isosceles_triple(), &config).unwrap();
        let tilted = resolve(&rotated, &config).unwrap();

        assert_relative_eq!(
            upright.semi_apex_angle_deg,
            tilted.semi_apex_angle_deg,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            upright.flame_height_mm,
            tilted.flame_height_mm,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_coincident_base_points_rejected() {
        let triple = PointTriple::from_coords([(50.0, 50.0), (50.0, 50.0), (75.0, 10.0)]);
        let result = resolve(&triple, &config_with_calibration(19.5));
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_apex_on_base_point_rejected() {
        let triple = PointTriple::from_coords([(50.0, 50.0), (150.0, 50.0), (150.0, 50.0)]);
        let result = resolve(&triple, &config_with_calibration(19.5));
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let config = config_with_calibration(19.5);

        let nan_apex =
            PointTriple::from_coords([(-100.0, 0.0), (100.0, 0.0), (f64::NAN, f64::NAN)]);
        assert!(matches!(
            resolve(&nan_apex, &config),
            Err(GeometryError::DegenerateGeometry(_))
        ));

        let infinite_base =
            PointTriple::from_coords([(f64::INFINITY, 0.0), (100.0, 0.0), (0.0, 200.0)]);
        assert!(matches!(
            resolve(&infinite_base, &config),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_collinear_apex_yields_finite_zero_angle() {
        // Apex exactly on the baseline ray: the edge vectors are parallel and
        // the cosine lands on the clamp boundary at 1.0
        let collinear = PointTriple::from_coords([(0.0, 0.0), (100.0, 0.0), (300.0, 0.0)]);
        let result = resolve(&collinear, &config_with_calibration(100.0)).unwrap();

        assert!(result.semi_apex_angle_deg.is_finite());
        assert_relative_eq!(result.semi_apex_angle_deg, 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.flame_height_mm, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_near_collinear_apex_stays_finite() {
        // A slender flame whose edge vectors are nearly parallel; rounding
        // can push the cosine past 1, which must clamp rather than fault
        let slender =
            PointTriple::from_coords([(-0.5, 0.0), (0.5, 0.0), (1e-9, 1e7)]);
        let result = resolve(&slender, &config_with_calibration(19.5)).unwrap();

        assert!(result.semi_apex_angle_deg.is_finite());
        assert!(result.semi_apex_angle_deg >= 0.0);
        assert!(result.semi_apex_angle_deg < 90.0);
        assert!(result.flame_height_mm.is_finite());
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let triple = isosceles_triple();
        assert!(matches!(
            resolve(&triple, &config_with_calibration(0.0)),
            Err(GeometryError::InvalidCalibration(_))
        ));
        assert!(matches!(
            resolve(&triple, &config_with_calibration(f64::NAN)),
            Err(GeometryError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let triple = PointTriple::from_coords([(120.0, 410.0), (310.0, 405.0), (218.0, 160.0)]);
        let config = config_with_calibration(19.5);

        let first = resolve(&triple, &config).unwrap();
        let second = resolve(&triple, &config).unwrap();
        assert_eq!(first, second);
    }
}
