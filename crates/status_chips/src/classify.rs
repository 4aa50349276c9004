//! State classification
//!
//! Maps a raw state string and its attribute bag to a severity [`Tier`] and
//! the derived views a chip exposes (colour, activity, exclusion).
//!
//! Numeric states are judged against the optional
//! `numeric_state_pass_threshold` / `numeric_state_warning_threshold`
//! attributes, or must be exactly zero when neither is set. Everything else
//! goes through the on/off rule, which `on_state` can override.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attributes::{Attributes, parse_finite};

pub const PASS_THRESHOLD: &str = "numeric_state_pass_threshold";
pub const WARNING_THRESHOLD: &str = "numeric_state_warning_threshold";
pub const ON_STATE: &str = "on_state";
pub const ON_COLOR: &str = "on_color";
pub const EXCLUDE_ON_STATUS_PATH: &str = "exclude_on_status_path";

/// States treated as "on" when no `on_state` attribute is configured.
const DEFAULT_ON_STATES: [&str; 2] = ["on", "true"];

/// Severity of a chip. Ordinal, not a numeric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Pass,
    Warning,
    Error,
}

/// Icon colour of a chip, rendered as a host theme variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum IconColor {
    Green,
    Amber,
    Red,
    /// `on_color` attribute override
    Custom(String),
}

impl IconColor {
    pub fn css(&self) -> &str {
        match self {
            IconColor::Green => "var(--green-color)",
            IconColor::Amber => "var(--amber-color)",
            IconColor::Red => "var(--red-color)",
            IconColor::Custom(color) => color,
        }
    }
}

impl std::fmt::Display for IconColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css())
    }
}

impl From<IconColor> for String {
    fn from(color: IconColor) -> Self {
        match color {
            IconColor::Custom(color) => color,
            other => other.css().to_string(),
        }
    }
}

impl From<String> for IconColor {
    fn from(css: String) -> Self {
        match css.as_str() {
            "var(--green-color)" => IconColor::Green,
            "var(--amber-color)" => IconColor::Amber,
            "var(--red-color)" => IconColor::Red,
            _ => IconColor::Custom(css),
        }
    }
}

/// Threshold pair read from the attribute bag.
///
/// A threshold key that is present counts as configured, even when `null`.
/// Values coerce loosely (`null` is 0, booleans 0/1); anything that does not
/// coerce to a number compares false.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    pass: Option<f64>,
    warning: Option<f64>,
}

impl Thresholds {
    fn from_attributes(attributes: &Attributes) -> Option<Self> {
        if !attributes.has(PASS_THRESHOLD) && !attributes.has(WARNING_THRESHOLD) {
            return None;
        }
        Some(Self {
            pass: attributes.number(PASS_THRESHOLD),
            warning: attributes.number(WARNING_THRESHOLD),
        })
    }

    fn evaluate(&self, value: f64) -> Tier {
        if self.pass.is_some_and(|pass| value > pass) {
            Tier::Pass
        } else if self.warning.is_some_and(|warning| value > warning) {
            Tier::Warning
        } else {
            Tier::Error
        }
    }
}

/// Numeric value of a state: a non-blank string parsing to a finite float.
pub fn numeric_value(state: Option<&str>) -> Option<f64> {
    state.and_then(parse_finite)
}

pub fn is_numeric(state: Option<&str>) -> bool {
    numeric_value(state).is_some()
}

/// Classify a state into a [`Tier`]. Total over all inputs.
pub fn classify(state: Option<&str>, attributes: &Attributes) -> Tier {
    match numeric_value(state) {
        Some(value) => classify_numeric(value, attributes),
        None => classify_non_numeric(state, attributes),
    }
}

fn classify_numeric(value: f64, attributes: &Attributes) -> Tier {
    match Thresholds::from_attributes(attributes) {
        Some(thresholds) => thresholds.evaluate(value),
        None if value == 0.0 => Tier::Pass,
        None => Tier::Error,
    }
}

fn classify_non_numeric(state: Option<&str>, attributes: &Attributes) -> Tier {
    if attributes.truthy(ON_STATE) {
        // Only a string `on_state` can ever equal a state.
        let on_state = attributes.string(ON_STATE);
        return if state.is_some() && state == on_state {
            Tier::Error
        } else {
            Tier::Pass
        };
    }

    match state {
        Some(state) if DEFAULT_ON_STATES.contains(&state.to_lowercase().as_str()) => Tier::Error,
        _ => Tier::Pass,
    }
}

/// True exactly when the state classifies as [`Tier::Error`].
///
/// The name is kept from the card's public surface even though it tracks the
/// error tier rather than an "on" state.
pub fn is_active(state: Option<&str>, attributes: &Attributes) -> bool {
    classify(state, attributes) == Tier::Error
}

/// Numeric state strictly above zero.
pub fn is_positive_state(state: Option<&str>) -> bool {
    numeric_value(state).is_some_and(|v| v > 0.0)
}

pub fn icon_color(state: Option<&str>, attributes: &Attributes) -> IconColor {
    tier_color(classify(state, attributes), attributes)
}

/// Colour for an already computed tier.
pub fn tier_color(tier: Tier, attributes: &Attributes) -> IconColor {
    let custom = || attributes.string(ON_COLOR).map(|c| IconColor::Custom(c.to_string()));
    match tier {
        Tier::Pass => IconColor::Green,
        Tier::Warning => custom().unwrap_or(IconColor::Amber),
        Tier::Error => custom().unwrap_or(IconColor::Red),
    }
}

pub fn exclude_on_status_path(attributes: &Attributes) -> bool {
    attributes.truthy(EXCLUDE_ON_STATUS_PATH)
}
