use anyhow::{Result, bail};
use tracing::info;

use crate::cli::WriteupArgs;
use crate::commands::{load_hints, load_source, parse_fund_type_overrides, pipeline_settings};
use crate::model::RunWarning;
use crate::report::aggregate::build_fund_view;
use crate::report::diagnostics::Diagnostics;
use crate::report::ips::FundTypeLookup;
use crate::report::pipeline::{FundTypeInputs, ReportContext, run_pipeline};
use crate::report::writeup::{TemplateManifest, WriteupPayload, build_payload, validate_against_template};
use crate::util::write_json_pretty;

pub fn run(args: WriteupArgs) -> Result<()> {
    let source = load_source(&args.source)?;
    let settings = pipeline_settings(&args.tuning);
    let hints = load_hints(args.tuning.fund_type_hints.as_deref())?;
    let fund_types = FundTypeInputs {
        lookup: hints.as_ref().map(|hints| hints as &dyn FundTypeLookup),
        overrides: parse_fund_type_overrides(&args.tuning.fund_types)?,
    };
    let manifest = args
        .template_manifest
        .as_deref()
        .map(TemplateManifest::load)
        .transpose()?;

    let context = run_pipeline(source.pages, &settings, &fund_types)?;
    let (payload, warnings) = build_writeup(
        &context,
        &args.fund,
        settings.factsheet_threshold,
        &args.tuning.performance_template,
        manifest.as_ref(),
    )?;

    write_json_pretty(&args.output, &payload)?;
    info!(
        fund = %payload.fund,
        tables = payload.tables.len(),
        warnings = context.warnings.len() + warnings.len(),
        output = %args.output.display(),
        "writeup complete"
    );
    Ok(())
}

pub fn build_writeup(
    context: &ReportContext,
    fund_name: &str,
    factsheet_threshold: u8,
    template: &str,
    manifest: Option<&TemplateManifest>,
) -> Result<(WriteupPayload, Vec<RunWarning>)> {
    if !context.scorecard.iter().any(|block| block.fund_name == fund_name) {
        bail!("fund {fund_name:?} is not on the report scorecard");
    }

    let view = build_fund_view(context, fund_name, factsheet_threshold);
    let mut payload = build_payload(context, &view, template);

    let mut diagnostics = Diagnostics::default();
    if let Some(manifest) = manifest {
        validate_against_template(&mut payload, manifest, &mut diagnostics);
    }
    Ok((payload, diagnostics.into_warnings()))
}
