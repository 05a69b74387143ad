//! sim
//!
//! The simulation engine boundary.
//!
//! The CLI consumes the engine through two operations: constructing a
//! validated [`PassSequence`] from an ordered collection of units, and running
//! [`PassSequence::solve`] over an entry profile. Everything else about the
//! engine is opaque to the command layer.
//!
//! Solve parameters come from the core plugin's configuration registry
//! (see [`SolveLimits::from_registry`]); the defaults below seed that registry.

use serde::Deserialize;
use thiserror::Error;

use crate::plugin::ConfigRegistry;

/// Default iteration cap for the per-pass spread loop.
pub const DEFAULT_MAX_ITERATION_COUNT: u32 = 100;

/// Default convergence threshold for the per-pass spread loop.
pub const DEFAULT_ITERATION_PRECISION: f64 = 1e-2;

/// Whether profiles rotate between consecutive roll passes by default.
pub const ROLL_PASS_AUTO_ROTATION: bool = true;

/// Entry stock description for the first pass.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default = "default_shape")]
    pub shape: String,

    /// Equivalent diameter of the stock in meters.
    pub diameter: f64,

    /// Stock temperature in Kelvin.
    pub temperature: f64,

    #[serde(default)]
    pub material: Vec<String>,

    #[serde(default)]
    pub flow_stress: Option<f64>,

    #[serde(default)]
    pub density: Option<f64>,

    #[serde(default)]
    pub thermal_capacity: Option<f64>,
}

fn default_shape() -> String {
    "round".to_string()
}

/// One unit of the work plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Unit {
    RollPass {
        label: String,
        /// Roll gap in meters.
        gap: f64,
        /// Nominal roll radius in meters.
        roll_radius: f64,
        #[serde(default = "default_frequency")]
        rotational_frequency: f64,
    },
    Transport {
        label: String,
        /// Transport duration in seconds.
        duration: f64,
    },
}

fn default_frequency() -> f64 {
    1.0
}

impl Unit {
    pub fn label(&self) -> &str {
        match self {
            Unit::RollPass { label, .. } | Unit::Transport { label, .. } => label,
        }
    }
}

/// Errors from pass-sequence construction.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("pass sequence is empty")]
    Empty,

    #[error("unit '{label}': {reason}")]
    InvalidUnit { label: String, reason: String },
}

/// Runtime failures of the solution procedure.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("roll pass '{label}': gap {gap} m does not reduce the entry diameter {diameter} m")]
    NoReduction {
        label: String,
        gap: f64,
        diameter: f64,
    },

    #[error("roll pass '{label}': spread iteration did not converge within {limit} iterations")]
    NotConverged { label: String, limit: u32 },
}

/// Solve parameters resolved from the core configuration registry.
#[derive(Debug, Clone, Copy)]
pub struct SolveLimits {
    pub max_iteration_count: u32,
    pub iteration_precision: f64,
    pub auto_rotation: bool,
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            max_iteration_count: DEFAULT_MAX_ITERATION_COUNT,
            iteration_precision: DEFAULT_ITERATION_PRECISION,
            auto_rotation: ROLL_PASS_AUTO_ROTATION,
        }
    }
}

impl SolveLimits {
    /// Read the solve parameters from a configuration registry, falling back
    /// to the built-in defaults for anything unset.
    pub fn from_registry(registry: &ConfigRegistry) -> Self {
        Self {
            max_iteration_count: registry
                .get_integer("DEFAULT_MAX_ITERATION_COUNT")
                .map(|count| count.max(1) as u32)
                .unwrap_or(DEFAULT_MAX_ITERATION_COUNT),
            iteration_precision: registry
                .get_float("DEFAULT_ITERATION_PRECISION")
                .unwrap_or(DEFAULT_ITERATION_PRECISION),
            auto_rotation: registry
                .get_bool("ROLL_PASS_AUTO_ROTATION")
                .unwrap_or(ROLL_PASS_AUTO_ROTATION),
        }
    }
}

/// Per-unit outcome of a solve run.
#[derive(Debug, Clone)]
pub struct PassResult {
    pub label: String,
    pub iterations: u32,
    pub exit_diameter: f64,
    pub exit_temperature: f64,
}

/// Outcome of a full solve run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub passes: Vec<PassResult>,
}

/// A validated, ordered work plan.
#[derive(Debug, Clone)]
pub struct PassSequence {
    units: Vec<Unit>,
}

impl PassSequence {
    /// Validate and construct a sequence from an ordered collection of units.
    pub fn new(units: Vec<Unit>) -> Result<Self, SequenceError> {
        if units.is_empty() {
            return Err(SequenceError::Empty);
        }
        for unit in &units {
            match unit {
                Unit::RollPass {
                    label,
                    gap,
                    roll_radius,
                    rotational_frequency,
                } => {
                    if *gap <= 0.0 {
                        return Err(SequenceError::InvalidUnit {
                            label: label.clone(),
                            reason: format!("gap must be positive, got {gap}"),
                        });
                    }
                    if *roll_radius <= 0.0 {
                        return Err(SequenceError::InvalidUnit {
                            label: label.clone(),
                            reason: format!("roll radius must be positive, got {roll_radius}"),
                        });
                    }
                    if *rotational_frequency <= 0.0 {
                        return Err(SequenceError::InvalidUnit {
                            label: label.clone(),
                            reason: format!(
                                "rotational frequency must be positive, got {rotational_frequency}"
                            ),
                        });
                    }
                }
                Unit::Transport { label, duration } => {
                    if *duration < 0.0 {
                        return Err(SequenceError::InvalidUnit {
                            label: label.clone(),
                            reason: format!("duration must not be negative, got {duration}"),
                        });
                    }
                }
            }
        }
        Ok(Self { units })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Run the solution procedure over the sequence for the given entry
    /// profile.
    ///
    /// Each roll pass runs a bounded fixed-point iteration for the spread
    /// coefficient; the thermal state is advanced through passes and
    /// transports.
    pub fn solve(
        &self,
        in_profile: &Profile,
        limits: &SolveLimits,
    ) -> Result<SolveReport, SolveError> {
        let mut diameter = in_profile.diameter;
        let mut temperature = in_profile.temperature;
        let mut rotated = false;
        let mut passes = Vec::with_capacity(self.units.len());

        for unit in &self.units {
            match unit {
                Unit::RollPass {
                    label,
                    gap,
                    roll_radius,
                    rotational_frequency,
                } => {
                    if *gap >= diameter {
                        return Err(SolveError::NoReduction {
                            label: label.clone(),
                            gap: *gap,
                            diameter,
                        });
                    }

                    if limits.auto_rotation {
                        rotated = !rotated;
                        tracing::debug!(pass = %label, rotated, "auto-rotating profile");
                    }

                    // Fixed-point iteration for the spread coefficient.
                    let target = (diameter / gap).sqrt();
                    let mut spread = 1.0_f64;
                    let mut iterations = 0u32;
                    loop {
                        let next = 0.5 * (spread + target / spread);
                        iterations += 1;
                        if (next - spread).abs() <= limits.iteration_precision {
                            spread = next;
                            break;
                        }
                        if iterations >= limits.max_iteration_count {
                            return Err(SolveError::NotConverged {
                                label: label.clone(),
                                limit: limits.max_iteration_count,
                            });
                        }
                        spread = next;
                    }

                    let width = spread * gap;
                    let exit_diameter = (gap * width).sqrt();

                    // Contact cooling over the arc of contact.
                    let contact_length = (roll_radius * (diameter - gap)).sqrt();
                    let roll_velocity =
                        2.0 * std::f64::consts::PI * roll_radius * rotational_frequency;
                    temperature -= 400.0 * contact_length / roll_velocity;

                    diameter = exit_diameter;
                    passes.push(PassResult {
                        label: label.clone(),
                        iterations,
                        exit_diameter,
                        exit_temperature: temperature,
                    });
                }
                Unit::Transport { label, duration } => {
                    temperature -= 3.0 * duration;
                    passes.push(PassResult {
                        label: label.clone(),
                        iterations: 0,
                        exit_diameter: diameter,
                        exit_temperature: temperature,
                    });
                }
            }
        }

        Ok(SolveReport { passes })
    }
}
