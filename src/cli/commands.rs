//! Command implementation for the esci-training CLI.

use log::debug;

use crate::cli::args::EsciTrainingArgs;
use crate::cli::output::output_report;
use crate::error::Result;
use crate::pipeline::run_pipeline;

/// Execute the CLI command.
pub fn execute_command(args: EsciTrainingArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    debug!("pipeline configuration: {config:?}");

    let report = run_pipeline(&config)?;
    output_report(&report, &args)
}
