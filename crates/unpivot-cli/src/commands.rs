use anyhow::Result;

use unpivot_cli::pipeline::{self, load_options};

use crate::cli::{RunArgs, UnpivotArgs};
use crate::summary::{print_plan, print_preview, print_run_summary};

pub fn run_unpivot(args: &RunArgs) -> Result<()> {
    let options = load_options(args.unpivot.config.as_deref(), &args.unpivot.overrides())?;
    let result = pipeline::run_unpivot(&args.unpivot.input, &options, args.output.as_deref())?;
    print_run_summary(&result);
    if args.preview > 0 {
        print_preview(&result.frame, args.preview);
    }
    Ok(())
}

pub fn run_explain(args: &UnpivotArgs) -> Result<()> {
    let options = load_options(args.config.as_deref(), &args.overrides())?;
    let (df, plan) = pipeline::explain(&args.input, &options)?;
    println!("Input: {} ({} rows)", args.input.display(), df.height());
    print_plan(&plan);
    Ok(())
}
