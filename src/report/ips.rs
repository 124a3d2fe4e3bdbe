use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::model::{
    CriterionStatus, FundType, IpsResult, ScorecardBlock, TickerAssignment, WarningKind, WatchTier,
};
use crate::report::diagnostics::Diagnostics;
use crate::report::scorecard::METRIC_LABELS;

const COMPONENT: &str = "ips_rubric";

pub const CRITERIA_COUNT: usize = 11;

/// Scorecard label index feeding each IPS criterion; `None` passes by
/// default (investment style has no machine signal).
pub const ACTIVE_CRITERIA: [Option<usize>; CRITERIA_COUNT] = [
    Some(0),
    Some(1),
    Some(3),
    Some(6),
    Some(10),
    Some(2),
    Some(4),
    Some(7),
    Some(11),
    Some(5),
    None,
];
pub const PASSIVE_CRITERIA: [Option<usize>; CRITERIA_COUNT] = [
    Some(0),
    Some(8),
    Some(3),
    Some(6),
    Some(12),
    Some(9),
    Some(4),
    Some(7),
    Some(13),
    Some(5),
    None,
];

pub const ICON_PASS: &str = "✔";
pub const ICON_FAIL: &str = "✗";

pub trait FundTypeLookup {
    fn classify(&self, ticker: &str) -> Result<Option<FundType>>;
}

#[derive(Debug, Deserialize)]
struct FundTypeHint {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Default)]
pub struct HintFileLookup {
    hints: HashMap<String, FundTypeHint>,
}

impl HintFileLookup {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let hints = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self { hints })
    }
}

impl FundTypeLookup for HintFileLookup {
    fn classify(&self, ticker: &str) -> Result<Option<FundType>> {
        let Some(hint) = self.hints.get(ticker) else {
            return Ok(None);
        };
        Ok(classify_summary(&hint.summary))
    }
}

pub fn classify_summary(summary: &str) -> Option<FundType> {
    let lowered = summary.to_lowercase();
    if ["index", "passive", "tracks"]
        .iter()
        .any(|hint| lowered.contains(hint))
    {
        Some(FundType::Passive)
    } else if lowered.contains("active") {
        Some(FundType::Active)
    } else {
        None
    }
}

pub fn resolve_fund_type(
    fund_name: &str,
    ticker: &str,
    lookup: Option<&dyn FundTypeLookup>,
    overrides: &HashMap<String, FundType>,
    diagnostics: &mut Diagnostics,
) -> FundType {
    let mut fund_type = if fund_name.to_lowercase().contains("index") {
        FundType::Passive
    } else {
        FundType::Active
    };

    if fund_type == FundType::Active && !ticker.is_empty() {
        if let Some(lookup) = lookup {
            match lookup.classify(ticker) {
                Ok(Some(classified)) => fund_type = classified,
                Ok(None) => {}
                Err(error) => diagnostics.warn(
                    WarningKind::ExternalCapabilityUnavailable,
                    COMPONENT,
                    format!("fund type lookup failed for {ticker}: {error:#}"),
                ),
            }
        }
    }

    overrides.get(fund_name).copied().unwrap_or(fund_type)
}

pub fn project_criteria(block: &ScorecardBlock, fund_type: FundType) -> Vec<CriterionStatus> {
    let table = match fund_type {
        FundType::Active => &ACTIVE_CRITERIA,
        FundType::Passive => &PASSIVE_CRITERIA,
    };

    table
        .iter()
        .map(|slot| match slot {
            None => CriterionStatus::PassByDefault,
            Some(index) => block
                .status_of(METRIC_LABELS[*index])
                .map(CriterionStatus::from)
                .unwrap_or(CriterionStatus::Review),
        })
        .collect()
}

pub fn evaluate_block(block: &ScorecardBlock, ticker: &str, fund_type: FundType) -> IpsResult {
    let mut result = IpsResult {
        fund_name: block.fund_name.clone(),
        ticker: ticker.to_string(),
        fund_type,
        criteria: project_criteria(block, fund_type),
        tier: WatchTier::NW,
    };
    result.tier = WatchTier::from_non_pass_count(result.non_pass_count());
    result
}

pub fn screen_funds(
    blocks: &[ScorecardBlock],
    tickers: &[TickerAssignment],
    lookup: Option<&dyn FundTypeLookup>,
    overrides: &HashMap<String, FundType>,
    diagnostics: &mut Diagnostics,
) -> Vec<IpsResult> {
    let results = blocks
        .iter()
        .map(|block| {
            let ticker = tickers
                .iter()
                .find(|assignment| assignment.fund_name == block.fund_name)
                .map(|assignment| assignment.ticker.as_str())
                .unwrap_or_default();
            let fund_type = resolve_fund_type(&block.fund_name, ticker, lookup, overrides, diagnostics);
            evaluate_block(block, ticker, fund_type)
        })
        .collect::<Vec<IpsResult>>();

    info!(
        funds = results.len(),
        formal_watch = results.iter().filter(|r| r.tier == WatchTier::FW).count(),
        informal_watch = results.iter().filter(|r| r.tier == WatchTier::IW).count(),
        "screened funds against IPS criteria"
    );
    results
}

pub fn icon_for(status: Option<CriterionStatus>) -> &'static str {
    match status {
        Some(status) if status.is_pass() => ICON_PASS,
        Some(_) => ICON_FAIL,
        None => "",
    }
}

/// Inverse of [`icon_for`]; a cross is read back as Review, never Pass.
#[cfg(test)]
pub fn status_from_icon(icon: &str) -> Option<CriterionStatus> {
    match icon {
        ICON_PASS => Some(CriterionStatus::Pass),
        ICON_FAIL => Some(CriterionStatus::Review),
        _ => None,
    }
}

pub fn iconified(result: &IpsResult) -> Vec<&'static str> {
    result
        .criteria
        .iter()
        .map(|status| icon_for(Some(*status)))
        .collect()
}

pub fn raw_statuses(result: &IpsResult) -> Vec<&'static str> {
    result.criteria.iter().map(|status| status.raw()).collect()
}
