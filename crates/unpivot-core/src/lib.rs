//! Wide-to-long unpivot for Polars DataFrames.
//!
//! Turns every selected "attribute" column of a wide table into its own row,
//! paired with a single identifier column and any static columns that are
//! kept as-is.
//!
//! # Overview
//!
//! A call runs four stages in order:
//!
//! - **Identifier resolution**: pick the identifier column (explicit or first column)
//! - **Name sanitization**: derive expression-safe names and a reversible [`NameMap`]
//! - **Partitioning**: split the sanitized columns into pivoted and static sets
//! - **Stack execution**: fan each row out with a [`StackExpr`], rejoin static
//!   columns and restore original names
//!
//! The first three stages produce an [`UnpivotPlan`] that can be inspected
//! before it is executed.
//!
//! # Example
//!
//! ```ignore
//! use unpivot_core::{UnpivotOptions, unpivot};
//!
//! let options = UnpivotOptions::new().with_columns_to_pivot(["Sales Q1", "Sales-Q2"]);
//! let long = unpivot(&wide, &options)?;
//! ```

mod error;
mod executor;
mod identifier;
mod name_map;
mod options;
mod partition;
mod plan;
mod sanitize;
mod stack;

pub use error::{Result, UnpivotError};
pub use identifier::resolve_identifier;
pub use name_map::{NameMap, NameMapping};
pub use options::{
    DEFAULT_ATTRIBUTE_NAME, DEFAULT_VALUE_NAME, IdColumn, UNSTACKED_ID_NAME, UnpivotOptions,
};
pub use partition::{Partition, partition_columns};
pub use plan::UnpivotPlan;
pub use sanitize::sanitize;
pub use stack::StackExpr;

use polars::prelude::DataFrame;
use tracing::info_span;

/// Unpivot `df` from wide to long format.
///
/// The caller's frame is left untouched; a new frame is returned with the
/// identifier, any static columns, and the attribute name/value pair.
///
/// # Errors
///
/// Returns an error when the options do not fit the frame's schema (missing
/// identifier, unknown pivot column, colliding sanitized names) or when Polars
/// fails to execute the reshape.
pub fn unpivot(df: &DataFrame, options: &UnpivotOptions) -> Result<DataFrame> {
    let span = info_span!("unpivot", rows = df.height(), columns = df.width());
    let _guard = span.enter();
    let plan = UnpivotPlan::build(df, options)?;
    plan.execute(df)
}
