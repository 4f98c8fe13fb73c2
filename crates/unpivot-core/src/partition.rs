//! Partitioning of sanitized columns into pivoted and static sets.

use crate::error::{Result, UnpivotError};

/// Pivoted and static columns, all by sanitized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Sanitized identifier column.
    pub identifier: String,
    /// Columns to unpivot, in stack order.
    pub pivot: Vec<String>,
    /// Columns kept as-is, identifier included, in schema order.
    pub remainder: Vec<String>,
}

impl Partition {
    /// True when at least one non-identifier column must be rejoined.
    pub fn has_static_columns(&self) -> bool {
        self.remainder.len() >= 2
    }

    /// Static columns other than the identifier.
    pub fn static_columns(&self) -> impl Iterator<Item = &str> {
        self.remainder
            .iter()
            .map(String::as_str)
            .filter(|name| *name != self.identifier)
    }
}

/// Split `columns` into pivot and remainder sets.
///
/// `requested` holds already-resolved sanitized names; when empty every
/// column except the identifier is pivoted.
///
/// # Errors
///
/// Fails when the identifier is missing or pivoted, when a requested column
/// is missing or repeated, or when nothing is left to pivot.
pub fn partition_columns(
    columns: &[String],
    identifier: &str,
    requested: &[String],
) -> Result<Partition> {
    if !columns.iter().any(|name| name == identifier) {
        return Err(UnpivotError::IdentifierNotFound {
            column: identifier.to_string(),
        });
    }

    let pivot: Vec<String> = if requested.is_empty() {
        columns
            .iter()
            .filter(|name| *name != identifier)
            .cloned()
            .collect()
    } else {
        requested.to_vec()
    };
    if pivot.is_empty() {
        return Err(UnpivotError::NothingToPivot);
    }

    let mut remainder = columns.to_vec();
    for name in &pivot {
        if name == identifier {
            return Err(UnpivotError::IdentifierPivoted {
                column: name.clone(),
            });
        }
        match remainder.iter().position(|candidate| candidate == name) {
            Some(idx) => {
                remainder.remove(idx);
            }
            None if columns.contains(name) => {
                return Err(UnpivotError::DuplicatePivotColumn {
                    column: name.clone(),
                });
            }
            None => {
                return Err(UnpivotError::UnknownPivotColumn {
                    column: name.clone(),
                });
            }
        }
    }

    Ok(Partition {
        identifier: identifier.to_string(),
        pivot,
        remainder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_default_pivots_everything_but_identifier() {
        let columns = names(&["Id", "Sales_Q1", "SalesQ2"]);
        let partition = partition_columns(&columns, "Id", &[]).unwrap();

        assert_eq!(partition.pivot, names(&["Sales_Q1", "SalesQ2"]));
        assert_eq!(partition.remainder, names(&["Id"]));
        assert!(!partition.has_static_columns());
        assert_eq!(partition.static_columns().count(), 0);
    }

    #[test]
    fn test_explicit_list_keeps_static_columns() {
        let columns = names(&["Id", "A", "B", "C"]);
        let partition = partition_columns(&columns, "Id", &names(&["B", "C"])).unwrap();

        assert_eq!(partition.pivot, names(&["B", "C"]));
        assert_eq!(partition.remainder, names(&["Id", "A"]));
        assert!(partition.has_static_columns());
        assert_eq!(partition.static_columns().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_identifier_not_first() {
        let columns = names(&["A", "Id", "B"]);
        let partition = partition_columns(&columns, "Id", &names(&["B"])).unwrap();
        assert_eq!(partition.remainder, names(&["A", "Id"]));
        assert_eq!(partition.static_columns().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_single_pivot_no_static() {
        let columns = names(&["Id", "A"]);
        let partition = partition_columns(&columns, "Id", &names(&["A"])).unwrap();
        assert!(!partition.has_static_columns());
    }

    #[test]
    fn test_missing_identifier() {
        let columns = names(&["Id", "A"]);
        let err = partition_columns(&columns, "Key", &[]).unwrap_err();
        assert!(matches!(err, UnpivotError::IdentifierNotFound { column } if column == "Key"));
    }

    #[test]
    fn test_unknown_pivot_column() {
        let columns = names(&["Id", "A"]);
        let err = partition_columns(&columns, "Id", &names(&["Z"])).unwrap_err();
        assert!(matches!(err, UnpivotError::UnknownPivotColumn { column } if column == "Z"));
    }

    #[test]
    fn test_duplicate_pivot_column() {
        let columns = names(&["Id", "A", "B"]);
        let err = partition_columns(&columns, "Id", &names(&["A", "A"])).unwrap_err();
        assert!(matches!(err, UnpivotError::DuplicatePivotColumn { column } if column == "A"));
    }

    #[test]
    fn test_identifier_cannot_be_pivoted() {
        let columns = names(&["Id", "A"]);
        let err = partition_columns(&columns, "Id", &names(&["Id", "A"])).unwrap_err();
        assert!(matches!(err, UnpivotError::IdentifierPivoted { .. }));
    }

    #[test]
    fn test_nothing_to_pivot() {
        let columns = names(&["Id"]);
        let err = partition_columns(&columns, "Id", &[]).unwrap_err();
        assert!(matches!(err, UnpivotError::NothingToPivot));
    }
}
