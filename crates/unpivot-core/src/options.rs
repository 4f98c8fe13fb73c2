//! Options controlling an unpivot call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, UnpivotError};

/// Default name of the output column holding attribute labels.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "AttributeColumn";

/// Default name of the output column holding attribute values.
pub const DEFAULT_VALUE_NAME: &str = "AttributeValue";

/// Identifier column name used when no static columns are rejoined.
pub const UNSTACKED_ID_NAME: &str = "IdColumn";

/// Which column identifies a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum IdColumn {
    /// The first column of the input schema.
    #[default]
    First,
    /// A named column (original or sanitized name).
    Named(String),
}

impl From<Option<String>> for IdColumn {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::First, Self::Named)
    }
}

impl From<IdColumn> for Option<String> {
    fn from(value: IdColumn) -> Self {
        match value {
            IdColumn::First => None,
            IdColumn::Named(name) => Some(name),
        }
    }
}

/// Options for [`crate::unpivot`].
///
/// Keys use camelCase when read from an options document:
///
/// ```json
/// {
///   "idColumnName": "Id",
///   "columnsToPivot": ["Sales Q1", "Sales-Q2"],
///   "attributeName": "Quarter",
///   "valueName": "Amount"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct UnpivotOptions {
    /// Identifier column; defaults to the first column.
    #[serde(rename = "idColumnName")]
    pub id_column: IdColumn,

    /// Columns to unpivot, by original or sanitized name.
    /// Empty means every column except the identifier.
    pub columns_to_pivot: Vec<String>,

    /// Output column name for attribute labels.
    pub attribute_name: String,

    /// Output column name for attribute values.
    pub value_name: String,
}

impl Default for UnpivotOptions {
    fn default() -> Self {
        Self {
            id_column: IdColumn::First,
            columns_to_pivot: Vec::new(),
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            value_name: DEFAULT_VALUE_NAME.to_string(),
        }
    }
}

impl UnpivotOptions {
    /// Options with every default applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named identifier column.
    #[must_use]
    pub fn with_id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = IdColumn::Named(name.into());
        self
    }

    /// Set the columns to unpivot.
    #[must_use]
    pub fn with_columns_to_pivot<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_to_pivot = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the attribute label column name.
    #[must_use]
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    /// Set the attribute value column name.
    #[must_use]
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Read options from an untyped JSON document.
    ///
    /// Shape checks run first so that a wrong type is reported against the
    /// option it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`UnpivotError::InvalidArgument`] when `idColumnName` is not a
    /// string, `columnsToPivot` is not a list of strings, or an output name is
    /// not a string; [`UnpivotError::InvalidOptions`] for anything else serde
    /// rejects.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(UnpivotError::InvalidArgument {
                parameter: "options",
                expected: "a JSON object",
            });
        };

        if let Some(id) = fields.get("idColumnName")
            && !(id.is_string() || id.is_null())
        {
            return Err(UnpivotError::InvalidArgument {
                parameter: "idColumnName",
                expected: "a string",
            });
        }

        match fields.get("columnsToPivot") {
            None => {}
            Some(Value::Array(items)) => {
                if !items.iter().all(Value::is_string) {
                    return Err(UnpivotError::InvalidArgument {
                        parameter: "columnsToPivot",
                        expected: "a list of strings",
                    });
                }
            }
            Some(_) => {
                return Err(UnpivotError::InvalidArgument {
                    parameter: "columnsToPivot",
                    expected: "a list",
                });
            }
        }

        for parameter in ["attributeName", "valueName"] {
            if fields.get(parameter).is_some_and(|v| !v.is_string()) {
                return Err(UnpivotError::InvalidArgument {
                    parameter,
                    expected: "a string",
                });
            }
        }

        Self::deserialize(value).map_err(|e| UnpivotError::InvalidOptions(e.to_string()))
    }

    /// Parse options from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`UnpivotError::InvalidOptions`] for malformed JSON and the
    /// errors of [`UnpivotOptions::from_json`] otherwise.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| UnpivotError::InvalidOptions(e.to_string()))?;
        Self::from_json(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = UnpivotOptions::default();
        assert_eq!(options.id_column, IdColumn::First);
        assert!(options.columns_to_pivot.is_empty());
        assert_eq!(options.attribute_name, "AttributeColumn");
        assert_eq!(options.value_name, "AttributeValue");
    }

    #[test]
    fn test_builder() {
        let options = UnpivotOptions::new()
            .with_id_column("Id")
            .with_columns_to_pivot(["B", "C"])
            .with_attribute_name("Name")
            .with_value_name("Value");
        assert_eq!(options.id_column, IdColumn::Named("Id".to_string()));
        assert_eq!(options.columns_to_pivot, vec!["B", "C"]);
        assert_eq!(options.attribute_name, "Name");
        assert_eq!(options.value_name, "Value");
    }

    #[test]
    fn test_from_json_full_document() {
        let options = UnpivotOptions::from_json(&json!({
            "idColumnName": "Id",
            "columnsToPivot": ["Sales Q1"],
            "attributeName": "Quarter",
            "valueName": "Amount"
        }))
        .unwrap();
        assert_eq!(options.id_column, IdColumn::Named("Id".to_string()));
        assert_eq!(options.columns_to_pivot, vec!["Sales Q1"]);
        assert_eq!(options.attribute_name, "Quarter");
        assert_eq!(options.value_name, "Amount");
    }

    #[test]
    fn test_from_json_defaults_missing_keys() {
        let options = UnpivotOptions::from_json(&json!({})).unwrap();
        assert_eq!(options, UnpivotOptions::default());

        let options = UnpivotOptions::from_json(&json!({ "idColumnName": null })).unwrap();
        assert_eq!(options.id_column, IdColumn::First);
    }

    #[test]
    fn test_from_json_rejects_non_string_identifier() {
        let err = UnpivotOptions::from_json(&json!({ "idColumnName": 3 })).unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(err.to_string(), "parameter 'idColumnName' must be a string");
    }

    #[test]
    fn test_from_json_rejects_non_list_columns() {
        let err = UnpivotOptions::from_json(&json!({ "columnsToPivot": "A" })).unwrap_err();
        assert_eq!(err.to_string(), "parameter 'columnsToPivot' must be a list");

        let err = UnpivotOptions::from_json(&json!({ "columnsToPivot": ["A", 1] })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter 'columnsToPivot' must be a list of strings"
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = UnpivotOptions::from_json(&json!({ "idColumn": "Id" })).unwrap_err();
        assert!(matches!(err, UnpivotError::InvalidOptions(_)));
    }

    #[test]
    fn test_from_json_str() {
        let options =
            UnpivotOptions::from_json_str(r#"{"valueName": "Reading"}"#).unwrap();
        assert_eq!(options.value_name, "Reading");

        let err = UnpivotOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, UnpivotError::InvalidOptions(_)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let options = UnpivotOptions::new().with_id_column("Id");
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["idColumnName"], json!("Id"));
        assert_eq!(UnpivotOptions::from_json(&value).unwrap(), options);
    }
}
