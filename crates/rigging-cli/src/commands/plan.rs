//! `rigging plan`: print the derived jobs as JSON on stdout.

use crate::cli::PlanArgs;
use crate::commands::utils;
use crate::error::Result;
use rigging_config::ConfigDeriver;

/// Derive the jobs without touching the output directory and print them.
pub async fn execute(args: PlanArgs) -> Result<()> {
    let (layout, env) = utils::prepare(&args.env, false)?;
    let jobs = ConfigDeriver::new(&layout, &env).plan()?;

    if args.compact {
        for job in &jobs {
            println!("{}", serde_json::to_string(job)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
    }

    Ok(())
}
