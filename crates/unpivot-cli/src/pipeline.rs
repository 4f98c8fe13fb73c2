//! File-level unpivot pipeline: read CSV, plan, execute, write CSV.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::{debug, info, info_span};

use unpivot_core::{UnpivotOptions, UnpivotPlan};

/// Command-line values that override an options document.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub id_column: Option<String>,
    pub columns_to_pivot: Vec<String>,
    pub attribute_name: Option<String>,
    pub value_name: Option<String>,
}

/// Outcome of a completed unpivot run.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub input_rows: usize,
    pub input_columns: usize,
    pub plan: UnpivotPlan,
    pub frame: DataFrame,
}

/// Load options from an optional JSON document and apply CLI overrides.
pub fn load_options(config: Option<&Path>, overrides: &OptionOverrides) -> Result<UnpivotOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read options {}", path.display()))?;
            UnpivotOptions::from_json_str(&text)
                .with_context(|| format!("parse options {}", path.display()))?
        }
        None => UnpivotOptions::default(),
    };
    if let Some(id) = &overrides.id_column {
        options = options.with_id_column(id.as_str());
    }
    if !overrides.columns_to_pivot.is_empty() {
        options = options.with_columns_to_pivot(overrides.columns_to_pivot.iter().cloned());
    }
    if let Some(name) = &overrides.attribute_name {
        options = options.with_attribute_name(name.as_str());
    }
    if let Some(name) = &overrides.value_name {
        options = options.with_value_name(name.as_str());
    }
    Ok(options)
}

/// Read a CSV file with a single header row.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open CSV {}", path.display()))?
        .finish()
        .with_context(|| format!("parse CSV {}", path.display()))
}

/// Write a frame as CSV, creating parent directories as needed.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("create file {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write CSV {}", path.display()))
}

/// Plan the unpivot of `input` without executing it.
pub fn explain(input: &Path, options: &UnpivotOptions) -> Result<(DataFrame, UnpivotPlan)> {
    let df = read_csv(input)?;
    let plan = UnpivotPlan::build(&df, options).context("plan unpivot")?;
    Ok((df, plan))
}

/// Unpivot `input` and optionally write the result to `output`.
pub fn run_unpivot(
    input: &Path,
    options: &UnpivotOptions,
    output: Option<&Path>,
) -> Result<RunResult> {
    let span = info_span!("run", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (df, plan) = explain(input, options)?;
    debug!(expression = %plan.stack(), "planned unpivot");
    let mut frame = plan.execute(&df).context("execute unpivot")?;

    if let Some(path) = output {
        write_csv(&mut frame, path)?;
        info!(output = %path.display(), rows = frame.height(), "wrote output");
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "run complete");

    Ok(RunResult {
        input: input.to_path_buf(),
        output: output.map(Path::to_path_buf),
        input_rows: df.height(),
        input_columns: df.width(),
        plan,
        frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use unpivot_core::IdColumn;

    #[test]
    fn test_overrides_apply_over_defaults() {
        let overrides = OptionOverrides {
            id_column: Some("Id".to_string()),
            columns_to_pivot: vec!["A".to_string()],
            attribute_name: None,
            value_name: Some("Reading".to_string()),
        };
        let options = load_options(None, &overrides).unwrap();

        assert_eq!(options.id_column, IdColumn::Named("Id".to_string()));
        assert_eq!(options.columns_to_pivot, vec!["A"]);
        assert_eq!(options.attribute_name, "AttributeColumn");
        assert_eq!(options.value_name, "Reading");
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let options = load_options(None, &OptionOverrides::default()).unwrap();
        assert_eq!(options, UnpivotOptions::default());
    }
}
