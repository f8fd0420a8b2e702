//! Conical Flame Speed Analysis Library
//!
//! Derives the semi-apex angle and laminar flame speed of a Bunsen-type
//! conical flame from three points marked on a photograph plus the reactant
//! volumetric flow rates (fuel, air, diluent).
//!
//! The two computation steps are pure functions over explicit inputs:
//! [`geometry::resolve`] turns the marked [`PointTriple`] and the rig
//! calibration into a [`GeometryResult`], and [`flame::estimate`] turns the
//! flow rates and the resolved half-angle into a [`FlameSpeedResult`];
//! [`analysis::analyze`] chains the two. The only stateful piece is the
//! [`MarkingSession`] the calling UI owns, which collects the three clicks
//! as an explicit 0 -> 1 -> 2 -> 3 state machine.
//!
//! Rig-specific constants (calibration length, stoichiometric air/fuel
//! ratio, burner inner diameter) live in [`BurnerConfig`], never in the
//! formulas.

// Core types and utilities
pub mod core_types;

// Measurement pipeline
pub mod analysis;
pub mod config;
pub mod flame;
pub mod geometry;
pub mod marking;

// Re-export core types
pub use core_types::{PixelPoint, Vec2};

// Re-export the measurement pipeline surface
pub use analysis::{analyze, AnalysisError, FlameAnalysis};
pub use config::{BurnerConfig, ConfigError};
pub use flame::{estimate, FlameSpeedResult, FlowRateError, FlowRates};
pub use geometry::{resolve, GeometryError, GeometryResult, PointTriple};
pub use marking::{MarkOutcome, MarkingError, MarkingSession, PointRole};
