//! Type-keyed formatter cache.
//!
//! Holds at most one formatter per scalar type. Entries are built on first
//! use from the type configuration and never invalidated; types are assumed
//! stable for the lifetime of the cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::datetime::DateTimeFormat;
use super::number::NumberFormat;
use super::options::{FormatOptions, TypeConfigs};
use crate::types::{Scalar, ScalarType};
use crate::NULL_PLACEHOLDER;

/// A constructed en-us formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Number(NumberFormat),
    DateTime(DateTimeFormat),
}

impl Formatter {
    /// Build the formatter registered for `ty`, if there is one.
    pub fn for_type(ty: ScalarType, options: &FormatOptions) -> Option<Self> {
        match ty {
            ScalarType::Integer | ScalarType::Float => Some(Self::Number(NumberFormat::new(options))),
            ScalarType::Date | ScalarType::Datetime => {
                Some(Self::DateTime(DateTimeFormat::new(options)))
            }
            ScalarType::String | ScalarType::Boolean | ScalarType::Unknown => None,
        }
    }

    /// Format one value. Values without a numeric reading pass through.
    pub fn format(&self, value: &Scalar) -> String {
        match value.as_f64() {
            Some(number) => match self {
                Self::Number(fmt) => fmt.format(number),
                Self::DateTime(fmt) => fmt.format(number),
            },
            None => value.to_string(),
        }
    }
}

/// A cache entry: a formatter, or the decision to show values as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedFormatter {
    PassThrough,
    Format(Formatter),
}

impl CachedFormatter {
    pub fn apply(&self, value: &Scalar) -> String {
        match self {
            Self::PassThrough => value.to_string(),
            Self::Format(formatter) => formatter.format(value),
        }
    }

    /// Like [`apply`](Self::apply), with `null` shown as `"-"`.
    pub fn render(&self, value: &Scalar) -> String {
        if value.is_null() {
            return NULL_PLACEHOLDER.to_string();
        }
        self.apply(value)
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }
}

/// Shared, append-only formatter cache.
///
/// Construction happens outside the lock; if two callers miss on the same
/// type at once, both build an equal formatter and the first insert wins.
#[derive(Debug, Default)]
pub struct FormatterCache {
    types: TypeConfigs,
    entries: RwLock<HashMap<ScalarType, Arc<CachedFormatter>>>,
}

impl FormatterCache {
    pub fn new(types: TypeConfigs) -> Self {
        Self {
            types,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn type_configs(&self) -> &TypeConfigs {
        &self.types
    }

    /// Cached formatter for `ty`, building it on a miss.
    pub fn get(&self, ty: ScalarType) -> Arc<CachedFormatter> {
        if let Some(hit) = self.read().get(&ty) {
            return Arc::clone(hit);
        }

        let built = Arc::new(self.build(ty));
        let mut entries = self.write();
        Arc::clone(entries.entry(ty).or_insert(built))
    }

    /// Format `value` as a value of type `ty`; `null` is always `"-"`.
    pub fn format(&self, ty: ScalarType, value: &Scalar) -> String {
        if value.is_null() {
            return NULL_PLACEHOLDER.to_string();
        }
        self.get(ty).render(value)
    }

    pub fn contains(&self, ty: ScalarType) -> bool {
        self.read().contains_key(&ty)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn build(&self, ty: ScalarType) -> CachedFormatter {
        let formatter = self
            .types
            .format_options(ty)
            .and_then(|options| Formatter::for_type(ty, options));
        log::trace!(
            "formatter for {ty}: {}",
            if formatter.is_some() { "locale" } else { "pass-through" }
        );
        formatter.map_or(CachedFormatter::PassThrough, CachedFormatter::Format)
    }

    // A panic while holding the lock cannot leave a half-built entry, so a
    // poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ScalarType, Arc<CachedFormatter>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ScalarType, Arc<CachedFormatter>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
