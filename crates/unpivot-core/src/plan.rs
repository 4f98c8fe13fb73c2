//! Unpivot plan: everything decided before the DataFrame is reshaped.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, UnpivotError};
use crate::executor;
use crate::identifier::resolve_identifier;
use crate::name_map::NameMap;
use crate::options::{UNSTACKED_ID_NAME, UnpivotOptions};
use crate::partition::{Partition, partition_columns};
use crate::stack::StackExpr;

/// Resolved identifier, name map, partition and stack expression for one
/// input schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpivotPlan {
    identifier: String,
    name_map: NameMap,
    partition: Partition,
    stack: StackExpr,
}

impl UnpivotPlan {
    /// Plan an unpivot of `df`.
    ///
    /// # Errors
    ///
    /// See [`UnpivotPlan::from_columns`].
    pub fn build(df: &DataFrame, options: &UnpivotOptions) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        Self::from_columns(&columns, options)
    }

    /// Plan an unpivot for a schema given by its column names.
    ///
    /// # Errors
    ///
    /// Returns a schema error when the identifier or a pivot column cannot be
    /// found, when sanitized names collide, when nothing is left to pivot, or
    /// when the output column names clash.
    pub fn from_columns(columns: &[String], options: &UnpivotOptions) -> Result<Self> {
        if columns.is_empty() {
            return Err(UnpivotError::NoColumns);
        }

        let identifier = resolve_identifier(columns, &options.id_column)?;
        debug!(identifier = %identifier, "resolved identifier column");

        let name_map = NameMap::from_columns(columns)?;
        debug!(columns = name_map.len(), "sanitized column names");

        let sanitized_identifier = name_map.resolve(&identifier);
        let requested: Vec<String> = options
            .columns_to_pivot
            .iter()
            .map(|name| name_map.resolve(name))
            .collect();
        let partition = partition_columns(
            &name_map.sanitized_names(),
            &sanitized_identifier,
            &requested,
        )
        .map_err(|err| match err {
            UnpivotError::IdentifierNotFound { .. } => UnpivotError::IdentifierNotFound {
                column: identifier.clone(),
            },
            other => other,
        })?;
        debug!(
            pivot = partition.pivot.len(),
            static_columns = partition.static_columns().count(),
            "partitioned columns"
        );

        let stack = StackExpr::new(
            partition.pivot.clone(),
            options.attribute_name.as_str(),
            options.value_name.as_str(),
        );
        debug!(expression = %stack, "built stack expression");

        let plan = Self {
            identifier,
            name_map,
            partition,
            stack,
        };
        plan.check_output_names()?;
        Ok(plan)
    }

    /// Run the plan against the frame it was built for.
    ///
    /// # Errors
    ///
    /// Returns [`UnpivotError::SchemaMismatch`] when `df` has different
    /// columns than the plan expects, or a Polars error from execution.
    pub fn execute(&self, df: &DataFrame) -> Result<DataFrame> {
        let actual: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let expected = self.name_map.original_names();
        if actual != expected {
            return Err(UnpivotError::SchemaMismatch {
                reason: format!("expected columns {expected:?}, found {actual:?}"),
            });
        }
        executor::execute(self, df)
    }

    /// Identifier column as named in the input.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Identifier column after sanitization.
    pub fn sanitized_identifier(&self) -> &str {
        &self.partition.identifier
    }

    /// Sanitized ↔ original names for every input column.
    pub fn name_map(&self) -> &NameMap {
        &self.name_map
    }

    /// Identifier, pivot and remainder split over sanitized names.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Stack expression over the sanitized pivot columns.
    pub fn stack(&self) -> &StackExpr {
        &self.stack
    }

    /// Sanitized names of the columns to unpivot.
    pub fn pivot_columns(&self) -> &[String] {
        &self.partition.pivot
    }

    /// True when static columns are rejoined onto the stacked rows.
    pub fn has_static_columns(&self) -> bool {
        self.partition.has_static_columns()
    }

    /// Name of the identifier column in the output.
    pub fn output_identifier(&self) -> &str {
        if self.has_static_columns() {
            self.original_name(self.sanitized_identifier())
        } else {
            UNSTACKED_ID_NAME
        }
    }

    /// Output columns in order: identifier, static columns, attribute, value.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = vec![self.output_identifier().to_string()];
        if self.has_static_columns() {
            columns.extend(
                self.partition
                    .static_columns()
                    .map(|name| self.original_name(name).to_string()),
            );
        }
        columns.push(self.stack.attribute_name().to_string());
        columns.push(self.stack.value_name().to_string());
        columns
    }

    pub(crate) fn original_name<'a>(&'a self, sanitized: &'a str) -> &'a str {
        self.name_map.original(sanitized).unwrap_or(sanitized)
    }

    fn check_output_names(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for name in self.output_columns() {
            if name.is_empty() || !seen.insert(name.clone()) {
                return Err(UnpivotError::OutputNameConflict { name });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_plan_with_defaults() {
        let plan = UnpivotPlan::from_columns(
            &columns(&["Id", "Sales Q1", "Sales-Q2"]),
            &UnpivotOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.identifier(), "Id");
        assert_eq!(plan.pivot_columns(), ["Sales_Q1", "SalesQ2"]);
        assert!(!plan.has_static_columns());
        assert_eq!(
            plan.output_columns(),
            vec!["IdColumn", "AttributeColumn", "AttributeValue"]
        );
        assert_eq!(
            plan.stack().to_string(),
            "stack(2, 'Sales_Q1', Sales_Q1, 'SalesQ2', SalesQ2) as (AttributeColumn, AttributeValue)"
        );
    }

    #[test]
    fn test_plan_with_static_columns() {
        let options = UnpivotOptions::new().with_columns_to_pivot(["B", "C"]);
        let plan = UnpivotPlan::from_columns(&columns(&["Id", "A", "B", "C"]), &options).unwrap();

        assert!(plan.has_static_columns());
        assert_eq!(
            plan.output_columns(),
            vec!["Id", "A", "AttributeColumn", "AttributeValue"]
        );
    }

    #[test]
    fn test_static_names_restored_in_output_columns() {
        let options = UnpivotOptions::new()
            .with_id_column("Record ID")
            .with_columns_to_pivot(["Score (%)"]);
        let plan = UnpivotPlan::from_columns(
            &columns(&["Record ID", "Site.Name", "Score (%)"]),
            &options,
        )
        .unwrap();

        assert_eq!(plan.sanitized_identifier(), "Record_ID");
        assert_eq!(
            plan.output_columns(),
            vec!["Record ID", "Site.Name", "AttributeColumn", "AttributeValue"]
        );
    }

    #[test]
    fn test_missing_identifier_reports_given_name() {
        let options = UnpivotOptions::new().with_id_column("Key Col");
        let err = UnpivotPlan::from_columns(&columns(&["Id", "A"]), &options).unwrap_err();
        assert!(matches!(err, UnpivotError::IdentifierNotFound { column } if column == "Key Col"));
    }

    #[test]
    fn test_empty_schema() {
        let err = UnpivotPlan::from_columns(&[], &UnpivotOptions::default()).unwrap_err();
        assert!(matches!(err, UnpivotError::NoColumns));
    }

    #[test]
    fn test_output_name_conflicts() {
        let options = UnpivotOptions::new()
            .with_attribute_name("Value")
            .with_value_name("Value");
        let err = UnpivotPlan::from_columns(&columns(&["Id", "A"]), &options).unwrap_err();
        assert!(matches!(err, UnpivotError::OutputNameConflict { name } if name == "Value"));

        let options = UnpivotOptions::new()
            .with_columns_to_pivot(["B"])
            .with_value_name("A");
        let err = UnpivotPlan::from_columns(&columns(&["Id", "A", "B"]), &options).unwrap_err();
        assert!(matches!(err, UnpivotError::OutputNameConflict { name } if name == "A"));

        let options = UnpivotOptions::new().with_attribute_name("");
        let err = UnpivotPlan::from_columns(&columns(&["Id", "A"]), &options).unwrap_err();
        assert!(matches!(err, UnpivotError::OutputNameConflict { .. }));
    }

    #[test]
    fn test_unstacked_identifier_conflicts_with_attribute_name() {
        let options = UnpivotOptions::new().with_attribute_name("IdColumn");
        let err = UnpivotPlan::from_columns(&columns(&["Id", "A"]), &options).unwrap_err();
        assert!(matches!(err, UnpivotError::OutputNameConflict { name } if name == "IdColumn"));
    }
}
