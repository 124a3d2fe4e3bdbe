use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::cli::ScreenArgs;
use crate::commands::{load_hints, load_source, parse_fund_type_overrides, pipeline_settings};
use crate::model::{RunCounts, ScreenRunManifest, ScreeningRow, ToolVersions};
use crate::report::ips::{FundTypeLookup, iconified, raw_statuses};
use crate::report::pdf::tool_version;
use crate::report::pipeline::{FundTypeInputs, ReportContext, run_pipeline};
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: ScreenArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    ensure_directory(&args.output_dir)?;
    info!(output_dir = %args.output_dir.display(), run_id = %run_id, "starting screen");

    let source = load_source(&args.source)?;
    let settings = pipeline_settings(&args.tuning);
    let hints = load_hints(args.tuning.fund_type_hints.as_deref())?;
    let fund_types = FundTypeInputs {
        lookup: hints.as_ref().map(|hints| hints as &dyn FundTypeLookup),
        overrides: parse_fund_type_overrides(&args.tuning.fund_types)?,
    };

    let source_path = source.path.display().to_string();
    let source_sha256 = source.sha256.clone();
    let is_pdf = args.source.pdf.is_some();
    let context = run_pipeline(source.pages, &settings, &fund_types)?;

    let rows = screening_rows(&context);
    let screening_path = args.output_dir.join("ips_screening.json");
    write_json_pretty(&screening_path, &rows)?;

    let extraction_path = args.output_dir.join("extraction.json");
    write_json_pretty(&extraction_path, &context)?;

    let manifest = ScreenRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        command: "screen".to_string(),
        source_path,
        source_sha256,
        tool_versions: ToolVersions {
            pdftotext: is_pdf.then(|| tool_version("pdftotext")).flatten(),
            pdftohtml: is_pdf.then(|| tool_version("pdftohtml")).flatten(),
        },
        counts: run_counts(&context),
        warnings: context.warnings.clone(),
    };
    let manifest_path = args.output_dir.join("run_manifest.json");
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        funds = rows.len(),
        warnings = manifest.warnings.len(),
        screening = %screening_path.display(),
        manifest = %manifest_path.display(),
        "screen complete"
    );

    if args.json {
        write_json_response(&rows)
    } else {
        write_text_response(&rows)
    }
}

pub fn screening_rows(context: &ReportContext) -> Vec<ScreeningRow> {
    context
        .lineup_ips()
        .map(|result| ScreeningRow {
            fund_name: result.fund_name.clone(),
            ticker: result.ticker.clone(),
            fund_type: result.fund_type.as_str().to_string(),
            criteria: iconified(result).into_iter().map(ToOwned::to_owned).collect(),
            criteria_raw: raw_statuses(result).into_iter().map(ToOwned::to_owned).collect(),
            watch_status: result.tier.as_str().to_string(),
        })
        .collect()
}

pub fn run_counts(context: &ReportContext) -> RunCounts {
    RunCounts {
        page_count: context.pages.page_count(),
        scorecard_blocks: context.scorecard.len(),
        tickers_resolved: context
            .tickers
            .iter()
            .filter(|assignment| !assignment.ticker.is_empty())
            .count(),
        factsheet_pages: context.factsheets.len(),
        performance_rows: context.performance.len(),
        calendar_year_rows: context.calendar_funds.len() + context.calendar_benchmarks.len(),
        mpt_rows: context.mpt_3yr.len() + context.mpt_5yr.len(),
        proposed_funds: context.proposed.len(),
        funds_parsed: context.funds_parsed(),
        total_options: context.metadata.total_options,
    }
}

fn write_json_response(rows: &[ScreeningRow]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, rows)
        .context("failed to serialize screening json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_response(rows: &[ScreeningRow]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    let name_width = rows
        .iter()
        .map(|row| row.fund_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Fund Name".len());

    let criteria_header = (1..=11)
        .map(|index| format!("{index:>2}"))
        .collect::<Vec<String>>()
        .join(" ");
    writeln!(
        output,
        "{:<name_width$}  {:<6}  {:<7}  {criteria_header}  Status",
        "Fund Name", "Ticker", "Type"
    )?;
    for row in rows {
        let criteria = row
            .criteria
            .iter()
            .map(|icon| format!("{icon:>2}"))
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(
            output,
            "{:<name_width$}  {:<6}  {:<7}  {criteria}  {}",
            row.fund_name, row.ticker, row.fund_type, row.watch_status
        )?;
    }
    writeln!(output, "Funds: {}", rows.len())?;
    output.flush()?;
    Ok(())
}
