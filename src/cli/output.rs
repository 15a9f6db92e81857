//! Output formatting for the run report.

use std::io::{self, Write};

use crate::cli::args::{EsciTrainingArgs, OutputFormat};
use crate::error::Result;
use crate::pipeline::PipelineReport;

/// Print the report on stdout in the requested format.
pub fn output_report(report: &PipelineReport, args: &EsciTrainingArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                write_human(report, &mut out)?;
            }
        }
        OutputFormat::Json => write_json(report, args.pretty, &mut out)?,
    }
    Ok(())
}

/// Write the report as aligned `label: value` lines.
pub fn write_human<W: Write>(report: &PipelineReport, out: &mut W) -> Result<()> {
    writeln!(out, "Training corpus:")?;
    writeln!(out, "════════════════")?;
    writeln!(out, "Universe items:      {}", report.universe_items)?;
    writeln!(out, "Judgments loaded:    {}", report.judgments_loaded)?;
    writeln!(out, "Usable judgments:    {}", report.usable_judgments)?;
    writeln!(
        out,
        "Edges:               {} (C {}, S {}, I {})",
        report.edges, report.complement_edges, report.substitute_edges, report.irrelevant_edges
    )?;
    writeln!(out, "Anchor items:        {}", report.anchor_items)?;
    writeln!(out, "Training items:      {}", report.training_items)?;
    writeln!(
        out,
        "Queries written:     {} -> {}",
        report.query_lines,
        report.queries_path.display()
    )?;
    writeln!(
        out,
        "Qrels written:       {} -> {}",
        report.qrel_lines,
        report.qrels_path.display()
    )?;
    writeln!(out, "Time:                {}ms", report.duration_ms)?;
    Ok(())
}

/// Write the report as a single JSON document.
pub fn write_json<W: Write>(report: &PipelineReport, pretty: bool, out: &mut W) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}
