//! rigging: derive bundler jobs from the environment and run them.

use clap::Parser;
use miette::Result;
use rigging_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let color = !args.no_color && ui::should_use_color();
    logger::init_logger(args.verbose, args.quiet, !color);
    ui::set_colors(color);

    let result = match args.command {
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args).await,
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Dev(dev_args) => commands::dev_execute(dev_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
