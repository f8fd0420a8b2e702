//! Laminar flame speed from reactant flows and the flame cone angle
//!
//! Implements the classic Bunsen flame-angle method: the laminar flame speed
//! is the component of the unburned mixture velocity normal to the flame
//! cone surface.
//!
//! # Formula
//! ```text
//! phi = (Q_air / Q_fuel) / (A/F)_stoich      equivalence ratio
//! x_d = Q_dil / (Q_fuel + Q_dil)             diluent mole fraction
//! v_u = Q_total / (pi * (d/2)^2)             mean nozzle exit velocity
//! S_L = v_u * sin(alpha)                     laminar flame speed
//! ```
//!
//! Where Q are volumetric flow rates, d the burner inner diameter, and alpha
//! the semi-apex angle resolved by [`crate::geometry::resolve`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BurnerConfig;

/// Conversion from litres per minute to cubic metres per second
const LPM_TO_M3_PER_S: f64 = 1e-3 / 60.0;

/// Volumetric flow rates of the three reactant streams (L/min).
///
/// Fuel must be strictly positive before estimation (it divides both the
/// equivalence ratio and the diluent fraction); air and diluent may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowRates {
    /// Fuel flow rate (L/min)
    pub fuel_lpm: f64,
    /// Air flow rate (L/min)
    pub air_lpm: f64,
    /// Diluent / secondary reactant flow rate (L/min)
    pub diluent_lpm: f64,
}

impl FlowRates {
    /// Build flow rates from already-parsed values.
    #[must_use]
    pub fn new(fuel_lpm: f64, air_lpm: f64, diluent_lpm: f64) -> Self {
        Self {
            fuel_lpm,
            air_lpm,
            diluent_lpm,
        }
    }

    /// Build flow rates from the free-text entry fields of the UI layer.
    ///
    /// # Errors
    /// Returns `FlowRateError::Unparsable` naming the field whose text did
    /// not parse as a finite number
    pub fn from_text(fuel: &str, air: &str, diluent: &str) -> Result<Self, FlowRateError> {
        Ok(Self {
            fuel_lpm: parse_flow_rate("fuel", fuel)?,
            air_lpm: parse_flow_rate("air", air)?,
            diluent_lpm: parse_flow_rate("diluent", diluent)?,
        })
    }

    /// Total volumetric flow of the mixture (L/min).
    #[must_use]
    pub fn total_lpm(&self) -> f64 {
        self.fuel_lpm + self.air_lpm + self.diluent_lpm
    }

    /// Check the flow preconditions: all flows finite and non-negative,
    /// fuel strictly positive.
    ///
    /// # Errors
    /// Returns `FlowRateError::NegativeFlow` or
    /// `FlowRateError::NonPositiveFuelFlow`
    pub fn validate(&self) -> Result<(), FlowRateError> {
        let fields = [
            ("fuel", self.fuel_lpm),
            ("air", self.air_lpm),
            ("diluent", self.diluent_lpm),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FlowRateError::NegativeFlow { field, value });
            }
        }
        if self.fuel_lpm <= 0.0 {
            return Err(FlowRateError::NonPositiveFuelFlow(self.fuel_lpm));
        }
        Ok(())
    }
}

/// Parse one flow-rate entry from free text (L/min).
///
/// # Errors
/// Returns `FlowRateError::Unparsable` when the text is not a finite number;
/// sign and magnitude checks are left to [`FlowRates::validate`]
pub fn parse_flow_rate(field: &'static str, text: &str) -> Result<f64, FlowRateError> {
    let value: f64 = text.trim().parse().map_err(|_| FlowRateError::Unparsable {
        field,
        text: text.to_string(),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FlowRateError::Unparsable {
            field,
            text: text.to_string(),
        })
    }
}

/// Flame speed metrics derived from the flows and the cone half-angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlameSpeedResult {
    /// (A/F)actual over (A/F)stoichiometric; 1 at stoichiometry
    pub equivalence_ratio: f64,
    /// Diluent share of the fuel + diluent streams (0-1)
    pub diluent_mole_fraction: f64,
    /// Mean unburned mixture velocity through the nozzle (m/s)
    pub unburned_velocity_m_s: f64,
    /// Laminar flame speed S_L = v_u * sin(semi-apex angle) (m/s)
    pub laminar_flame_speed_m_s: f64,
}

/// Errors from flow validation and flame speed estimation
#[derive(Debug, Clone, PartialEq)]
pub enum FlowRateError {
    /// Fuel flow must be strictly positive; it divides both ratio formulas
    NonPositiveFuelFlow(f64),
    /// A flow rate was negative or non-finite
    NegativeFlow {
        /// Which stream failed validation
        field: &'static str,
        /// The offending value (L/min)
        value: f64,
    },
    /// A free-text flow entry did not parse as a finite number
    Unparsable {
        /// Which entry field failed to parse
        field: &'static str,
        /// The text as entered
        text: String,
    },
    /// Burner inner diameter is not a positive finite length
    InvalidBurnerDiameter(f64),
}

impl std::fmt::Display for FlowRateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowRateError::NonPositiveFuelFlow(value) => {
                write!(f, "Fuel flow must be positive, got {value} L/min")
            }
            FlowRateError::NegativeFlow { field, value } => {
                write!(
                    f,
                    "Flow rate '{field}' must be a finite non-negative value, got {value} L/min"
                )
            }
            FlowRateError::Unparsable { field, text } => {
                write!(f, "Flow rate '{field}' is not a valid number: '{text}'")
            }
            FlowRateError::InvalidBurnerDiameter(value) => {
                write!(
                    f,
                    "Burner inner diameter must be a positive finite length in mm, got {value}"
                )
            }
        }
    }
}

impl std::error::Error for FlowRateError {}

/// Estimate flame speed metrics from the flows and the resolved half-angle.
///
/// The semi-apex angle comes from a prior [`crate::geometry::resolve`] call
/// and is passed explicitly; nothing is carried in hidden state between the
/// two steps.
///
/// # Errors
/// Returns `FlowRateError::NegativeFlow` / `NonPositiveFuelFlow` on invalid
/// flows and `InvalidBurnerDiameter` when the configured nozzle diameter is
/// not a positive finite length
pub fn estimate(
    flows: &FlowRates,
    semi_apex_angle_deg: f64,
    config: &BurnerConfig,
) -> Result<FlameSpeedResult, FlowRateError> {
    flows.validate()?;

    let diameter_mm = config.burner_inner_diameter_mm;
    if !diameter_mm.is_finite() || diameter_mm <= 0.0 {
        return Err(FlowRateError::InvalidBurnerDiameter(diameter_mm));
    }

    let air_to_fuel = flows.air_lpm / flows.fuel_lpm;
    let equivalence_ratio = air_to_fuel / config.stoichiometric_air_fuel_ratio;

    let diluent_mole_fraction = flows.diluent_lpm / (flows.fuel_lpm + flows.diluent_lpm);

    // Mean exit velocity through the cylindrical nozzle cross-section
    let total_flow_m3_s = flows.total_lpm() * LPM_TO_M3_PER_S;
    let nozzle_radius_m = diameter_mm / 2.0 * 1e-3;
    let nozzle_area_m2 = std::f64::consts::PI * nozzle_radius_m * nozzle_radius_m;
    let unburned_velocity_m_s = total_flow_m3_s / nozzle_area_m2;

    // Flame speed is the velocity component normal to the cone surface
    let laminar_flame_speed_m_s =
        unburned_velocity_m_s * semi_apex_angle_deg.to_radians().sin();

    debug!(
        equivalence_ratio,
        diluent_mole_fraction,
        unburned_velocity_m_s,
        laminar_flame_speed_m_s,
        "flame speed chain evaluated"
    );

    Ok(FlameSpeedResult {
        equivalence_ratio,
        diluent_mole_fraction,
        unburned_velocity_m_s,
        laminar_flame_speed_m_s,
    })
}
