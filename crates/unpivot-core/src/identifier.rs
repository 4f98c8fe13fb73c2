//! Identifier column resolution.

use crate::error::{Result, UnpivotError};
use crate::options::IdColumn;

/// Resolve the identifier choice to an original column name.
///
/// [`IdColumn::First`] picks column 0 of the original (pre-sanitization)
/// schema. A named identifier is returned as given; it is matched against
/// the schema after sanitization.
///
/// # Errors
///
/// Returns [`UnpivotError::NoColumns`] when the first column is requested
/// from an empty schema.
pub fn resolve_identifier<S: AsRef<str>>(columns: &[S], id: &IdColumn) -> Result<String> {
    match id {
        IdColumn::First => columns
            .first()
            .map(|name| name.as_ref().to_string())
            .ok_or(UnpivotError::NoColumns),
        IdColumn::Named(name) => Ok(name.clone()),
    }
}
