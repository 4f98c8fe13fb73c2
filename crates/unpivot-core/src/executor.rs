//! Executes an [`UnpivotPlan`] with the Polars lazy engine.

use polars::prelude::{
    DataFrame, DataType, Expr, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col,
};
use tracing::{debug, info};

use crate::error::{Result, UnpivotError};
use crate::plan::UnpivotPlan;
use crate::stack::BRANCH_INDEX;

// Working columns. Parentheses and dots never survive sanitization, so these
// cannot clash with a sanitized input column.
const ROW_INDEX: &str = "(unpivot.row)";
const ATTRIBUTE_SLOT: &str = "(unpivot.attribute)";
const VALUE_SLOT: &str = "(unpivot.value)";
const SANITIZED_NAME: &str = "(unpivot.sanitized)";
const ORIGINAL_NAME: &str = "(unpivot.original)";

/// Working name of the input column at `position`.
///
/// Input names may read as selectors (`*`, `^...$`), so expressions only ever
/// reference columns through these.
fn slot_name(position: usize) -> String {
    format!("(unpivot.column.{position})")
}

fn slot(plan: &UnpivotPlan, sanitized: &str) -> Result<Expr> {
    plan.name_map()
        .position(sanitized)
        .map(|position| col(slot_name(position)))
        .ok_or_else(|| UnpivotError::SchemaMismatch {
            reason: format!("column '{sanitized}' is not part of the plan"),
        })
}

pub(crate) fn execute(plan: &UnpivotPlan, df: &DataFrame) -> Result<DataFrame> {
    let identifier = slot(plan, plan.sanitized_identifier())?;

    let mut input = df.clone();
    input.set_column_names((0..plan.name_map().len()).map(slot_name))?;
    let input = input.lazy();

    let side = if plan.has_static_columns() {
        let remainder = plan
            .partition()
            .remainder
            .iter()
            .map(|name| slot(plan, name))
            .collect::<Result<Vec<_>>>()?;
        Some(input.clone().select(remainder))
    } else {
        None
    };

    // The stack needs one dtype across all branches.
    let sources = plan
        .pivot_columns()
        .iter()
        .map(|name| slot(plan, name))
        .collect::<Result<Vec<_>>>()?;
    let casts: Vec<Expr> = sources
        .iter()
        .map(|source| source.clone().cast(DataType::String))
        .collect();
    let working = input.with_columns(casts).with_row_index(ROW_INDEX, None);

    let stack = plan.stack().with_output_names(ATTRIBUTE_SLOT, VALUE_SLOT);
    let mut stacked = stack.apply(&working, &[col(ROW_INDEX), identifier.clone()], &sources)?;

    if let Some(side) = side {
        debug!(
            identifier = plan.sanitized_identifier(),
            "rejoining static columns"
        );
        stacked = stacked.join(
            side,
            [identifier.clone()],
            [identifier.clone()],
            JoinArgs::new(JoinType::Left),
        );
    }

    // Attribute labels are sanitized names; map them back value-wise.
    let names = plan
        .name_map()
        .to_frame(SANITIZED_NAME, ORIGINAL_NAME)?
        .lazy();
    stacked = stacked.join(
        names,
        [col(ATTRIBUTE_SLOT)],
        [col(SANITIZED_NAME)],
        JoinArgs::new(JoinType::Left),
    );

    let mut output = vec![identifier];
    if plan.has_static_columns() {
        for name in plan.partition().static_columns() {
            output.push(slot(plan, name)?);
        }
    }
    output.push(col(ORIGINAL_NAME));
    output.push(col(VALUE_SLOT));

    let mut result = stacked
        .sort_by_exprs(
            [col(ROW_INDEX), col(BRANCH_INDEX)],
            SortMultipleOptions::default(),
        )
        .select(output)
        .collect()?;
    result.set_column_names(plan.output_columns())?;

    info!(
        input_rows = df.height(),
        pivoted = plan.pivot_columns().len(),
        output_rows = result.height(),
        "unpivot complete"
    );
    Ok(result)
}
