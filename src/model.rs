// src/model.rs
// Wire and view types for the pendulum lab: the request sent to the simulation service,
// the response it returns, the derived chart points, and the closed set of editable form fields.
// Field names match the JSON keys exchanged with the service, so serde derives need no renames.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters posted to the simulation service. All values are passed through unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub theta0_deg: f64, // Initial angle (degrees)
    pub length_m: f64,   // Pendulum length (meters)
    pub g: f64,          // Gravitational acceleration (m/s²)
    pub t: f64,          // Elapsed time (seconds)
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            theta0_deg: 10.0,
            length_m: 1.0,
            g: 9.81,
            t: 1.0,
        }
    }
}

impl SimulationRequest {
    /// Current value of `field`.
    pub fn get(&self, field: FormField) -> f64 {
        match field {
            FormField::Theta0Deg => self.theta0_deg,
            FormField::LengthM => self.length_m,
            FormField::Gravity => self.g,
            FormField::Time => self.t,
        }
    }

    /// Replaces the value of `field`, leaving the others untouched.
    pub fn set(&mut self, field: FormField, value: f64) {
        let slot = match field {
            FormField::Theta0Deg => &mut self.theta0_deg,
            FormField::LengthM => &mut self.length_m,
            FormField::Gravity => &mut self.g,
            FormField::Time => &mut self.t,
        };
        *slot = value;
    }
}

/// Result returned by the simulation service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub theta_rad: f64,
    pub theta_deg: f64,
    pub omega: f64,
}

/// One sample of the derived angle-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String, // Seconds, two decimals.
    pub theta_deg: f64,
}

/// The editable fields of the simulation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Theta0Deg,
    LengthM,
    Gravity,
    Time,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Theta0Deg,
        FormField::LengthM,
        FormField::Gravity,
        FormField::Time,
    ];

    /// Wire name, identical to the JSON key in [`SimulationRequest`].
    pub fn name(self) -> &'static str {
        match self {
            FormField::Theta0Deg => "theta0_deg",
            FormField::LengthM => "length_m",
            FormField::Gravity => "g",
            FormField::Time => "t",
        }
    }

    /// Human-readable input label.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Theta0Deg => "Initial Angle (degrees)",
            FormField::LengthM => "Length (meters)",
            FormField::Gravity => "Gravity (m/s²)",
            FormField::Time => "Time (seconds)",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Parses a raw input value; anything unparseable becomes NaN and is stored as-is.
// Whole-string parse: a numeric prefix such as "3abc" is NaN, not 3.
pub fn parse_field_value(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
