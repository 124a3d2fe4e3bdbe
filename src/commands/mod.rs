pub mod inspect;
pub mod screen;
pub mod writeup;


use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::{SourceArgs, TuningArgs};
use crate::model::FundType;
use crate::report::ips::HintFileLookup;
use crate::report::metadata::MetadataSettings;
use crate::report::pdf::{ReportPages, SourceUnreadable};
use crate::report::pipeline::PipelineSettings;
use crate::util::sha256_bytes;

pub struct LoadedSource {
    pub path: PathBuf,
    pub sha256: String,
    pub pages: ReportPages,
}

pub fn load_source(source: &SourceArgs) -> Result<LoadedSource> {
    let (path, is_pdf) = match (&source.pdf, &source.text_dump) {
        (Some(path), _) => (path.clone(), true),
        (None, Some(path)) => (path.clone(), false),
        (None, None) => bail!("either --pdf or --text-dump is required"),
    };

    let bytes = fs::read(&path).map_err(|err| {
        SourceUnreadable::new(format!("failed to read {}: {err}", path.display()))
    })?;
    let sha256 = sha256_bytes(&bytes);

    let pages = if is_pdf {
        ReportPages::from_pdf(&path, &bytes)?
    } else {
        ReportPages::from_text_dump(&path)?
    };

    info!(path = %path.display(), pages = pages.page_count(), "loaded report source");
    Ok(LoadedSource {
        path,
        sha256,
        pages,
    })
}

pub fn pipeline_settings(tuning: &TuningArgs) -> PipelineSettings {
    PipelineSettings {
        ticker_threshold: tuning.ticker_threshold,
        proposed_threshold: tuning.proposed_threshold,
        factsheet_threshold: tuning.factsheet_threshold,
        row_anchor_threshold: tuning.row_anchor_threshold,
        header_band: tuning.header_band,
        metadata: MetadataSettings {
            prepared_by_default: tuning.prepared_by_default.clone(),
            vendor_watermark: tuning.vendor_watermark.clone(),
        },
    }
}

pub fn parse_fund_type_overrides(values: &[String]) -> Result<HashMap<String, FundType>> {
    let mut overrides = HashMap::new();
    for value in values {
        let Some((name, kind)) = value.rsplit_once('=') else {
            bail!("invalid --fund-type {value:?}: expected NAME=Active|Passive");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("invalid --fund-type {value:?}: fund name is empty");
        }
        let Some(fund_type) = FundType::parse(kind) else {
            bail!("invalid --fund-type {value:?}: type must be Active or Passive");
        };
        overrides.insert(name.to_string(), fund_type);
    }
    Ok(overrides)
}

pub fn load_hints(path: Option<&Path>) -> Result<Option<HintFileLookup>> {
    path.map(|path| {
        HintFileLookup::load(path)
            .with_context(|| format!("failed to load fund type hints from {}", path.display()))
    })
    .transpose()
}
