use std::collections::HashMap;

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use crate::model::{
    CalendarYearRow, FactsheetRow, FundFacts, FundType, IpsResult, MptPeriod, MptStat,
    PeerRankRow, PerformanceRow, ProposedFund, ReportMetadata, RiskAdjustedRow, RunWarning,
    ScorecardBlock, SectionKey, TickerAssignment, TocIndex, WarningKind,
};
use crate::report::diagnostics::Diagnostics;
use crate::report::factsheet::{FactsheetSettings, parse_factsheets};
use crate::report::factsheet_tables::extract_factsheet_tables;
use crate::report::ips::{FundTypeLookup, screen_funds};
use crate::report::metadata::{MetadataSettings, extract_metadata};
use crate::report::mpt::{FIVE_YEAR_HEADING, extract_mpt};
use crate::report::pdf::{PageLine, ReportPages};
use crate::report::performance::{extract_calendar_years, extract_performance};
use crate::report::proposed::{attach_overviews, find_proposed_funds, proposed_section_pages};
use crate::report::scorecard::parse_scorecard;
use crate::report::tickers::resolve_tickers;
use crate::report::toc::{locate_sections, page_has_heading, section_window};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub ticker_threshold: u8,
    pub proposed_threshold: u8,
    pub factsheet_threshold: u8,
    pub row_anchor_threshold: u8,
    pub header_band: f64,
    pub metadata: MetadataSettings,
}

#[derive(Default)]
pub struct FundTypeInputs<'a> {
    pub lookup: Option<&'a dyn FundTypeLookup>,
    pub overrides: HashMap<String, FundType>,
}

#[derive(Debug, Serialize)]
pub struct ReportContext {
    #[serde(skip)]
    pub pages: ReportPages,
    pub metadata: ReportMetadata,
    pub toc: TocIndex,
    pub scorecard: Vec<ScorecardBlock>,
    pub tickers: Vec<TickerAssignment>,
    pub factsheets: Vec<FactsheetRow>,
    pub performance: Vec<PerformanceRow>,
    pub calendar_years: Vec<String>,
    pub calendar_funds: Vec<CalendarYearRow>,
    pub calendar_benchmarks: Vec<CalendarYearRow>,
    pub mpt_3yr: Vec<MptStat>,
    pub mpt_5yr: Vec<MptStat>,
    pub risk_adjusted: Vec<RiskAdjustedRow>,
    pub peer_ranks: Vec<PeerRankRow>,
    pub fund_facts: Vec<FundFacts>,
    pub ips: Vec<IpsResult>,
    pub proposed: Vec<ProposedFund>,
    pub warnings: Vec<RunWarning>,
}

impl ReportContext {
    pub fn funds_parsed(&self) -> usize {
        self.scorecard.iter().filter(|block| !block.proposed).count()
    }

    /// IPS results of the plan lineup. Proposed funds are screened too, for
    /// the write-up, but are not part of the lineup.
    pub fn lineup_ips(&self) -> impl Iterator<Item = &IpsResult> {
        self.ips.iter().filter(|result| {
            self.scorecard
                .iter()
                .any(|block| !block.proposed && block.fund_name == result.fund_name)
        })
    }
}

fn anchored_lines<'a>(
    pages: &'a ReportPages,
    toc: &TocIndex,
    key: SectionKey,
    end: Option<usize>,
    diagnostics: &mut Diagnostics,
) -> Vec<PageLine<'a>> {
    let Some(start) = toc.get(key) else {
        diagnostics.warn(
            WarningKind::MissingAnchor,
            "numeric_series",
            format!("no table of contents entry for {}; section skipped", key.as_str()),
        );
        return Vec::new();
    };
    let end = end
        .filter(|end| *end > start)
        .unwrap_or(pages.page_count() + 1);
    pages.lines_between(start, end)
}

fn first_page_containing(pages: &ReportPages, needle: &str) -> Option<usize> {
    (1..=pages.page_count()).find(|page| page_has_heading(pages.page_text(*page), needle))
}

pub fn run_pipeline(
    pages: ReportPages,
    settings: &PipelineSettings,
    fund_types: &FundTypeInputs<'_>,
) -> Result<ReportContext> {
    let mut diagnostics = Diagnostics::default();
    let page_count = pages.page_count();

    let metadata = extract_metadata(pages.page_text(1), &settings.metadata);
    let toc = locate_sections(&pages);

    let scorecard_window = section_window(&toc, SectionKey::Scorecard, &[], page_count, "scorecard", &mut diagnostics);
    let mut scorecard = parse_scorecard(&pages.lines_between(scorecard_window.start, scorecard_window.end));
    if scorecard.is_empty() {
        bail!("unreadable scorecard: no fund blocks were parsed");
    }
    let section_pages = proposed_section_pages(&pages, &toc);
    for block in &mut scorecard {
        block.proposed = section_pages.contains(&block.page);
    }

    let fund_names = scorecard
        .iter()
        .map(|block| block.fund_name.clone())
        .collect::<Vec<String>>();
    let resolver_window = section_window(
        &toc,
        SectionKey::Performance,
        &[SectionKey::Factsheets],
        page_count,
        "ticker_resolver",
        &mut diagnostics,
    );
    let tickers = resolve_tickers(
        &fund_names,
        &pages.lines_between(resolver_window.start, resolver_window.end),
        settings.ticker_threshold,
        &mut diagnostics,
    );

    let factsheet_window = section_window(&toc, SectionKey::Factsheets, &[], page_count, "factsheets", &mut diagnostics);
    let factsheets = parse_factsheets(
        &pages,
        factsheet_window.start,
        &tickers,
        FactsheetSettings {
            header_band: settings.header_band,
            match_threshold: settings.factsheet_threshold,
        },
    );

    let performance_lines = anchored_lines(&pages, &toc, SectionKey::Performance, toc.calendar_year, &mut diagnostics);
    let performance = extract_performance(&performance_lines, &tickers, settings.row_anchor_threshold, &mut diagnostics);

    let calendar_lines = anchored_lines(&pages, &toc, SectionKey::CalendarYear, toc.r3yr, &mut diagnostics);
    let calendar = extract_calendar_years(
        &calendar_lines,
        &tickers,
        &factsheets,
        settings.row_anchor_threshold,
        &mut diagnostics,
    );

    let five_year_start = first_page_containing(&pages, FIVE_YEAR_HEADING).or(toc.r5yr);
    let mpt_3yr_lines = anchored_lines(&pages, &toc, SectionKey::R3yr, five_year_start, &mut diagnostics);
    let mpt_3yr = extract_mpt(&mpt_3yr_lines, &tickers, MptPeriod::ThreeYear, &mut diagnostics);

    let mpt_5yr = match five_year_start {
        Some(start) => {
            let end = toc.next_anchor_after(start).unwrap_or(page_count + 1);
            extract_mpt(&pages.lines_between(start, end), &tickers, MptPeriod::FiveYear, &mut diagnostics)
        }
        None => {
            diagnostics.warn(
                WarningKind::MissingAnchor,
                "numeric_series",
                "no MPT statistics (5Yr) section; section skipped",
            );
            Vec::new()
        }
    };

    let factsheet_tables = extract_factsheet_tables(&pages, &factsheets, &mut diagnostics);

    let ips = screen_funds(
        &scorecard,
        &tickers,
        fund_types.lookup,
        &fund_types.overrides,
        &mut diagnostics,
    );

    let mut proposed = if section_pages.is_empty() {
        Vec::new()
    } else {
        find_proposed_funds(&pages, &section_pages, &tickers, settings.proposed_threshold)
    };
    attach_overviews(&pages, &factsheets, &mut proposed, settings.factsheet_threshold);

    let current_funds = scorecard.iter().filter(|block| !block.proposed).count();
    if let Some(declared) = metadata.total_options {
        if declared as usize != current_funds {
            diagnostics.warn(
                WarningKind::CountMismatch,
                "pipeline",
                format!("parsed {current_funds} funds but the report declares {declared} options"),
            );
        }
    }

    info!(
        funds = current_funds,
        proposed = proposed.len(),
        alignment_failures = diagnostics.count(WarningKind::AlignmentFailure),
        parse_gaps = diagnostics.count(WarningKind::ParseGap),
        warnings = diagnostics.warnings().len(),
        "pipeline complete"
    );

    Ok(ReportContext {
        pages,
        metadata,
        toc,
        scorecard,
        tickers,
        factsheets,
        performance,
        calendar_years: calendar.years,
        calendar_funds: calendar.funds,
        calendar_benchmarks: calendar.benchmarks,
        mpt_3yr,
        mpt_5yr,
        risk_adjusted: factsheet_tables.risk_adjusted,
        peer_ranks: factsheet_tables.peer_ranks,
        fund_facts: factsheet_tables.fund_facts,
        ips,
        proposed,
        warnings: diagnostics.into_warnings(),
    })
}
