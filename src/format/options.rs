//! Per-type format options (the type configuration table).
//!
//! Option names follow the `Intl` option objects the view engine's stock
//! configuration is written in, so overrides can be passed through as JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GridError, Result};
use crate::types::ScalarType;

/// Largest fraction-digit count a number format accepts.
pub const MAX_FRACTION_DIGITS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    Decimal,
    Percent,
}

/// Width of one date/time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePart {
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "2-digit")]
    TwoDigit,
}

/// Format options for one scalar type.
///
/// Number and date keys share one struct; each formatter reads the keys it
/// understands. Unknown keys (e.g. `week`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    pub style: Option<NumberStyle>,
    pub minimum_fraction_digits: Option<u8>,
    pub maximum_fraction_digits: Option<u8>,
    pub use_grouping: Option<bool>,
    pub year: Option<DatePart>,
    pub month: Option<DatePart>,
    pub day: Option<DatePart>,
    pub hour: Option<DatePart>,
    pub minute: Option<DatePart>,
    pub second: Option<DatePart>,
    pub hour12: Option<bool>,
}

impl FormatOptions {
    fn validate(&self, ty: ScalarType) -> Result<()> {
        for digits in [self.minimum_fraction_digits, self.maximum_fraction_digits]
            .into_iter()
            .flatten()
        {
            if digits > MAX_FRACTION_DIGITS {
                return Err(GridError::Config(format!(
                    "{ty}: fraction digits {digits} exceeds {MAX_FRACTION_DIGITS}"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.minimum_fraction_digits, self.maximum_fraction_digits)
        {
            if max < min {
                return Err(GridError::Config(format!(
                    "{ty}: maximumFractionDigits {max} is below minimumFractionDigits {min}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration of one scalar type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// `None` means values of this type are shown as-is.
    #[serde(default)]
    pub format: Option<FormatOptions>,
}

/// Type configuration table, keyed by scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConfigs {
    types: HashMap<ScalarType, TypeConfig>,
}

impl Default for TypeConfigs {
    fn default() -> Self {
        let numeric_date = FormatOptions {
            year: Some(DatePart::Numeric),
            month: Some(DatePart::Numeric),
            day: Some(DatePart::Numeric),
            ..FormatOptions::default()
        };
        let numeric_datetime = FormatOptions {
            hour: Some(DatePart::Numeric),
            minute: Some(DatePart::Numeric),
            second: Some(DatePart::Numeric),
            ..numeric_date.clone()
        };

        let types = HashMap::from([
            (
                ScalarType::Integer,
                TypeConfig {
                    format: Some(FormatOptions::default()),
                },
            ),
            (
                ScalarType::Float,
                TypeConfig {
                    format: Some(FormatOptions {
                        style: Some(NumberStyle::Decimal),
                        minimum_fraction_digits: Some(2),
                        maximum_fraction_digits: Some(2),
                        ..FormatOptions::default()
                    }),
                },
            ),
            (ScalarType::String, TypeConfig::default()),
            (ScalarType::Boolean, TypeConfig::default()),
            (
                ScalarType::Date,
                TypeConfig {
                    format: Some(numeric_date),
                },
            ),
            (
                ScalarType::Datetime,
                TypeConfig {
                    format: Some(numeric_datetime),
                },
            ),
        ]);

        Self { types }
    }
}

impl TypeConfigs {
    /// Stock configuration with `json` overrides applied per type.
    ///
    /// ```
    /// use pivotgrid::format::TypeConfigs;
    /// use pivotgrid::ScalarType;
    ///
    /// let configs = TypeConfigs::from_json(
    ///     r#"{"float": {"format": {"maximumFractionDigits": 4}}}"#,
    /// ).unwrap();
    /// let float = configs.format_options(ScalarType::Float).unwrap();
    /// assert_eq!(float.maximum_fraction_digits, Some(4));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: HashMap<ScalarType, TypeConfig> = serde_json::from_str(json)?;
        let mut configs = Self::default();
        for (ty, config) in overrides {
            configs.set(ty, config)?;
        }
        Ok(configs)
    }

    pub fn get(&self, ty: ScalarType) -> Option<&TypeConfig> {
        self.types.get(&ty)
    }

    /// Format options for `ty`, if values of that type get formatted at all.
    pub fn format_options(&self, ty: ScalarType) -> Option<&FormatOptions> {
        self.types.get(&ty).and_then(|config| config.format.as_ref())
    }

    /// Replace the configuration of one type.
    pub fn set(&mut self, ty: ScalarType, config: TypeConfig) -> Result<()> {
        if let Some(format) = &config.format {
            format.validate(ty)?;
        }
        self.types.insert(ty, config);
        Ok(())
    }
}
