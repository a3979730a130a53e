//! Value formatting.
//!
//! This module handles:
//! - The per-type format configuration (`TypeConfigs`)
//! - en-us number and date/time formatters
//! - The type-keyed formatter cache shared by every model

mod cache;
mod datetime;
mod number;
mod options;

pub use cache::{CachedFormatter, Formatter, FormatterCache};
pub use datetime::DateTimeFormat;
pub use number::NumberFormat;
pub use options::{
    DatePart, FormatOptions, NumberStyle, TypeConfig, TypeConfigs, MAX_FRACTION_DIGITS,
};
