//! One-shot flame analysis combining geometry and flame speed
//!
//! The estimator consumes the resolved semi-apex angle through an explicit
//! argument; nothing flows between the two steps through hidden session
//! state. Flame height travels alongside the speed metrics in the combined
//! result but does not enter the speed formula.

use serde::{Deserialize, Serialize};

use crate::config::BurnerConfig;
use crate::flame::{self, FlameSpeedResult, FlowRateError, FlowRates};
use crate::geometry::{self, GeometryError, GeometryResult, PointTriple};

/// Combined result of one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlameAnalysis {
    /// Resolved cone geometry
    pub geometry: GeometryResult,
    /// Flame speed metrics derived from the flows and the resolved angle
    pub speed: FlameSpeedResult,
}

/// Errors from the combined analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Geometry resolution failed
    Geometry(GeometryError),
    /// Flow validation or flame speed estimation failed
    Flow(FlowRateError),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Geometry(err) => write!(f, "{err}"),
            AnalysisError::Flow(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Geometry(err) => Some(err),
            AnalysisError::Flow(err) => Some(err),
        }
    }
}

impl From<GeometryError> for AnalysisError {
    fn from(err: GeometryError) -> Self {
        AnalysisError::Geometry(err)
    }
}

impl From<FlowRateError> for AnalysisError {
    fn from(err: FlowRateError) -> Self {
        AnalysisError::Flow(err)
    }
}

/// Run the full analysis chain: resolve the cone geometry, then feed the
/// semi-apex angle and the flows to the speed estimator.
///
/// # Errors
/// Propagates [`GeometryError`] and [`FlowRateError`] from the two steps;
/// on error the caller's points and flow inputs are untouched
pub fn analyze(
    points: &PointTriple,
    flows: &FlowRates,
    config: &BurnerConfig,
) -> Result<FlameAnalysis, AnalysisError> {
    let geometry = geometry::resolve(points, config)?;
    let speed = flame::estimate(flows, geometry.semi_apex_angle_deg, config)?;
    Ok(FlameAnalysis { geometry, speed })
}
