//! Error types for the unpivot transformation.

use thiserror::Error;

/// Errors that can occur while planning or executing an unpivot.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnpivotError {
    // === Argument Errors ===
    /// An option has the wrong shape (e.g. a number where a column name is expected).
    #[error("parameter '{parameter}' must be {expected}")]
    InvalidArgument {
        /// Option key as it appears in an options document.
        parameter: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
    },

    /// An options document could not be parsed.
    #[error("invalid unpivot options: {0}")]
    InvalidOptions(String),

    // === Schema Errors ===
    /// The DataFrame has no columns, so there is no first column to use.
    #[error("DataFrame has no columns")]
    NoColumns,

    /// The identifier column is not part of the DataFrame.
    #[error("identifier column '{column}' not found in DataFrame")]
    IdentifierNotFound { column: String },

    /// A requested pivot column is not part of the DataFrame.
    #[error("column '{column}' to unpivot not found in DataFrame")]
    UnknownPivotColumn { column: String },

    /// A pivot column was requested more than once.
    #[error("column '{column}' is listed more than once in the columns to unpivot")]
    DuplicatePivotColumn { column: String },

    /// The identifier column was also requested as a pivot column.
    #[error("identifier column '{column}' cannot also be unpivoted")]
    IdentifierPivoted { column: String },

    /// There are no columns left to unpivot.
    #[error("no columns to unpivot besides the identifier")]
    NothingToPivot,

    /// Two distinct column names sanitize to the same name.
    #[error("columns '{first}' and '{second}' both sanitize to '{sanitized}'")]
    NameCollision {
        sanitized: String,
        first: String,
        second: String,
    },

    /// An output column name is empty or appears more than once.
    #[error("output column name '{name}' is empty or used more than once")]
    OutputNameConflict { name: String },

    /// The DataFrame handed to a plan is not the one it was built for.
    #[error("DataFrame columns do not match the unpivot plan: {reason}")]
    SchemaMismatch { reason: String },

    // === Engine Errors ===
    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl UnpivotError {
    /// True for errors raised before the DataFrame is looked at.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::InvalidOptions(_))
    }

    /// True when the options cannot be reconciled with the DataFrame's columns.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::NoColumns
                | Self::IdentifierNotFound { .. }
                | Self::UnknownPivotColumn { .. }
                | Self::DuplicatePivotColumn { .. }
                | Self::IdentifierPivoted { .. }
                | Self::NothingToPivot
                | Self::NameCollision { .. }
                | Self::OutputNameConflict { .. }
                | Self::SchemaMismatch { .. }
        )
    }
}

/// Result type for unpivot operations.
pub type Result<T> = std::result::Result<T, UnpivotError>;
