//! The row-multiplying stack expression.

use std::fmt;

use polars::prelude::{Expr, LazyFrame, PolarsError, PolarsResult, UnionArgs, concat, lit};

/// Column tagging each stacked row with the branch that produced it.
pub(crate) const BRANCH_INDEX: &str = "(unpivot.branch)";

/// An n-way unpivot: every input row yields one output row per branch.
///
/// Branch `i` carries the label of pivot column `i` in the attribute column
/// and that column's value in the value column. Rendered with [`fmt::Display`]
/// it reads like the SQL primitive it stands for:
///
/// ```text
/// stack(2, 'Sales_Q1', Sales_Q1, 'SalesQ2', SalesQ2) as (AttributeColumn, AttributeValue)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackExpr {
    labels: Vec<String>,
    attribute_name: String,
    value_name: String,
}

impl StackExpr {
    /// One branch per label, in label order.
    pub fn new(
        labels: Vec<String>,
        attribute_name: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Self {
        Self {
            labels,
            attribute_name: attribute_name.into(),
            value_name: value_name.into(),
        }
    }

    /// Number of branches (rows emitted per input row).
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Attribute labels, one per branch.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column receiving the branch label.
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Column receiving the branch value.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Same branches, different output column names.
    #[must_use]
    pub fn with_output_names(&self, attribute_name: &str, value_name: &str) -> Self {
        Self::new(self.labels.clone(), attribute_name, value_name)
    }

    /// Fan `frame` out into one row per branch.
    ///
    /// Every branch projects `carry`, the branch index, the label literal and
    /// `sources[i]`, the expression holding branch `i`'s value; the branches
    /// are then unioned. Sources are passed separately from labels so a label
    /// is never parsed as a column selector. Sources must already share a
    /// dtype. Output order is branch-major; callers that need row-major order
    /// sort on their own row index and [`BRANCH_INDEX`].
    ///
    /// # Errors
    ///
    /// Fails when `sources` does not hold one expression per branch.
    pub fn apply(
        &self,
        frame: &LazyFrame,
        carry: &[Expr],
        sources: &[Expr],
    ) -> PolarsResult<LazyFrame> {
        if sources.len() != self.labels.len() {
            return Err(PolarsError::ComputeError(
                format!(
                    "stack has {} branches but {} source columns",
                    self.labels.len(),
                    sources.len()
                )
                .into(),
            ));
        }
        let branches: Vec<LazyFrame> = self
            .labels
            .iter()
            .zip(sources)
            .enumerate()
            .map(|(branch, (label, source))| {
                let mut projection = carry.to_vec();
                projection.push(lit(branch as u32).alias(BRANCH_INDEX));
                projection.push(lit(label.as_str()).alias(self.attribute_name.as_str()));
                projection.push(source.clone().alias(self.value_name.as_str()));
                frame.clone().select(projection)
            })
            .collect();
        concat(branches, UnionArgs::default())
    }
}

impl fmt::Display for StackExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack({}", self.labels.len())?;
        for label in &self.labels {
            write!(f, ", '{label}', {label}")?;
        }
        write!(f, ") as ({}, {})", self.attribute_name, self.value_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataFrame, DataType, IntoColumn, IntoLazy, NamedFrom, Series, col};

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_display_matches_stack_syntax() {
        let stack = StackExpr::new(
            labels(&["Sales_Q1", "SalesQ2"]),
            "AttributeColumn",
            "AttributeValue",
        );
        insta::assert_snapshot!(
            stack.to_string(),
            @"stack(2, 'Sales_Q1', Sales_Q1, 'SalesQ2', SalesQ2) as (AttributeColumn, AttributeValue)"
        );
    }

    #[test]
    fn test_display_single_branch() {
        let stack = StackExpr::new(labels(&["A"]), "Name", "Value");
        assert_eq!(stack.to_string(), "stack(1, 'A', A) as (Name, Value)");
        assert_eq!(stack.width(), 1);
    }

    #[test]
    fn test_with_output_names_keeps_branches() {
        let stack = StackExpr::new(labels(&["A", "B"]), "Name", "Value");
        let renamed = stack.with_output_names("attr", "val");
        assert_eq!(renamed.labels(), stack.labels());
        assert_eq!(renamed.attribute_name(), "attr");
        assert_eq!(renamed.value_name(), "val");
    }

    #[test]
    fn test_apply_multiplies_rows() {
        let df = DataFrame::new(vec![
            Series::new("Id".into(), [1i64, 2, 3]).into_column(),
            Series::new("A".into(), ["a1", "a2", "a3"]).into_column(),
            Series::new("B".into(), ["b1", "b2", "b3"]).into_column(),
        ])
        .unwrap();
        let stack = StackExpr::new(labels(&["A", "B"]), "Name", "Value");

        let out = stack
            .apply(&df.lazy(), &[col("Id")], &[col("A"), col("B")])
            .unwrap()
            .collect()
            .unwrap();

        assert_eq!(out.height(), 6);
        assert_eq!(out.column("Name").unwrap().dtype(), &DataType::String);
        let names: Vec<Option<&str>> =
            out.column("Name").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(names.iter().filter(|n| **n == Some("A")).count(), 3);
        assert_eq!(names.iter().filter(|n| **n == Some("B")).count(), 3);
    }

    #[test]
    fn test_apply_takes_labels_literally() {
        let df = DataFrame::new(vec![
            Series::new("Id".into(), [1i64]).into_column(),
            Series::new("v".into(), ["x"]).into_column(),
        ])
        .unwrap();
        let stack = StackExpr::new(labels(&["*"]), "Name", "Value");

        let out = stack
            .apply(&df.lazy(), &[col("Id")], &[col("v")])
            .unwrap()
            .collect()
            .unwrap();

        let names: Vec<Option<&str>> =
            out.column("Name").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(names, vec![Some("*")]);
        assert_eq!(out.width(), 4);
    }

    #[test]
    fn test_apply_rejects_missing_sources() {
        let df = DataFrame::new(vec![Series::new("Id".into(), [1i64]).into_column()]).unwrap();
        let stack = StackExpr::new(labels(&["A", "B"]), "Name", "Value");

        assert!(stack.apply(&df.lazy(), &[col("Id")], &[col("Id")]).is_err());
    }
}
