use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InspectArgs;
use crate::commands::{load_source, pipeline_settings};
use crate::model::{ReportMetadata, SectionKey, TocIndex};
use crate::report::metadata::extract_metadata;
use crate::report::toc::locate_sections;

#[derive(Debug, Serialize)]
struct InspectResponse {
    source_path: String,
    page_count: usize,
    metadata: ReportMetadata,
    toc: TocIndex,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let source = load_source(&args.source)?;
    let settings = pipeline_settings(&args.tuning);

    let metadata = extract_metadata(source.pages.page_text(1), &settings.metadata);
    let toc = locate_sections(&source.pages);
    info!(path = %source.path.display(), "inspected report");

    let response = InspectResponse {
        source_path: source.path.display().to_string(),
        page_count: source.pages.page_count(),
        metadata,
        toc,
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize inspect json output")?;
        writeln!(output)?;
    } else {
        write_text(&mut output, &response)?;
    }
    output.flush()?;
    Ok(())
}

fn write_text(output: &mut impl Write, response: &InspectResponse) -> Result<()> {
    let metadata = &response.metadata;
    writeln!(output, "Source: {}", response.source_path)?;
    writeln!(output, "Pages: {}", response.page_count)?;
    writeln!(
        output,
        "Report date: {}",
        metadata
            .report_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string())
    )?;
    writeln!(
        output,
        "Total options: {}",
        metadata
            .total_options
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string())
    )?;
    writeln!(
        output,
        "Prepared for: {}",
        metadata.prepared_for.as_deref().unwrap_or("-")
    )?;
    writeln!(output, "Prepared by: {}", metadata.prepared_by)?;
    writeln!(output, "Sections:")?;
    for key in SectionKey::ALL {
        match response.toc.get(key) {
            Some(page) => writeln!(output, "\t{}: page {page}", key.as_str())?,
            None => writeln!(output, "\t{}: missing", key.as_str())?,
        }
    }
    Ok(())
}
