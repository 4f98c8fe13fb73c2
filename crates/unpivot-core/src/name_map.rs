//! Reversible mapping between original and sanitized column names.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use crate::error::{Result, UnpivotError};
use crate::sanitize::sanitize;

/// One column's original and sanitized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapping {
    /// Name as it appears in the input DataFrame.
    pub original: String,
    /// Name used while building expressions.
    pub sanitized: String,
}

/// Bijective sanitized → original name map, in schema order.
///
/// Built in a single step from the input column names. Two distinct
/// originals that sanitize to the same name are rejected instead of one
/// silently replacing the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMap {
    entries: Vec<NameMapping>,
    by_sanitized: BTreeMap<String, usize>,
    by_original: BTreeMap<String, usize>,
}

impl NameMap {
    /// Build the map for the given column names.
    ///
    /// # Errors
    ///
    /// Returns [`UnpivotError::NameCollision`] when two columns share a
    /// sanitized name.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<NameMapping> = Vec::new();
        let mut by_sanitized: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_original: BTreeMap<String, usize> = BTreeMap::new();
        for original in columns {
            let original = original.as_ref();
            let sanitized = sanitize(original);
            if let Some(first) = by_sanitized
                .get(&sanitized)
                .and_then(|&idx| entries.get(idx))
            {
                return Err(UnpivotError::NameCollision {
                    sanitized,
                    first: first.original.clone(),
                    second: original.to_string(),
                });
            }
            let idx = entries.len();
            by_sanitized.insert(sanitized.clone(), idx);
            by_original.insert(original.to_string(), idx);
            entries.push(NameMapping {
                original: original.to_string(),
                sanitized,
            });
        }
        Ok(Self {
            entries,
            by_sanitized,
            by_original,
        })
    }

    /// Number of mapped columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate mappings in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &NameMapping> {
        self.entries.iter()
    }

    /// Original name for a sanitized name.
    pub fn original(&self, sanitized: &str) -> Option<&str> {
        self.by_sanitized
            .get(sanitized)
            .and_then(|&idx| self.entries.get(idx))
            .map(|entry| entry.original.as_str())
    }

    /// Sanitized name for an original name.
    pub fn sanitized(&self, original: &str) -> Option<&str> {
        self.by_original
            .get(original)
            .and_then(|&idx| self.entries.get(idx))
            .map(|entry| entry.sanitized.as_str())
    }

    /// Schema position of a sanitized name.
    pub(crate) fn position(&self, sanitized: &str) -> Option<usize> {
        self.by_sanitized.get(sanitized).copied()
    }

    /// Sanitized names in schema order.
    pub fn sanitized_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.sanitized.clone())
            .collect()
    }

    /// Original names in schema order.
    pub fn original_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.original.clone())
            .collect()
    }

    /// Resolve a user-supplied column reference to a sanitized name.
    ///
    /// An exact original name wins, then an existing sanitized name, and
    /// anything else is sanitized. The result may still be unknown to the
    /// map; callers check membership.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(sanitized) = self.sanitized(name) {
            return sanitized.to_string();
        }
        if self.by_sanitized.contains_key(name) {
            return name.to_string();
        }
        sanitize(name)
    }

    /// Materialize the map as a two-column lookup table.
    pub fn to_frame(&self, sanitized_column: &str, original_column: &str) -> PolarsResult<DataFrame> {
        let sanitized: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.sanitized.as_str())
            .collect();
        let original: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.original.as_str())
            .collect();
        DataFrame::new(vec![
            Series::new(sanitized_column.into(), sanitized).into_column(),
            Series::new(original_column.into(), original).into_column(),
        ])
    }
}
