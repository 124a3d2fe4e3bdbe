use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{
    CalendarYearRow, FundFacts, IpsResult, MptStat, PerformanceRow, ProposedFund,
    RiskAdjustedRow, WarningKind,
};
use crate::report::aggregate::{FundView, display_name};
use crate::report::bullets::generate_bullets;
use crate::report::diagnostics::Diagnostics;
use crate::report::ips::iconified;
use crate::report::pipeline::ReportContext;

const COMPONENT: &str = "template_sink";
const BULLET_SLOTS: usize = 4;
const REPLACEMENT_SLOTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideTable {
    pub slide: u32,
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteupPayload {
    pub fund: String,
    pub placeholders: BTreeMap<String, String>,
    pub tables: Vec<SlideTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateTable {
    pub slide: u32,
    pub name: String,
    pub column_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateManifest {
    #[serde(default)]
    pub tables: Vec<TemplateTable>,
}

impl TemplateManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

fn cell(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn performance_cells(name: String, row: Option<&PerformanceRow>) -> Vec<String> {
    vec![
        name,
        cell(row.and_then(|row| row.net_expense_ratio.as_ref())),
        cell(row.and_then(|row| row.qtd.as_ref())),
        cell(row.and_then(|row| row.one_yr.as_ref())),
        cell(row.and_then(|row| row.three_yr.as_ref())),
        cell(row.and_then(|row| row.five_yr.as_ref())),
        cell(row.and_then(|row| row.ten_yr.as_ref())),
    ]
}

fn performance_columns() -> Vec<String> {
    ["Investment Manager", "Net Expense Ratio", "QTD", "1Yr", "3Yr", "5Yr", "10Yr"]
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

fn ips_cells(name: String, ips: Option<&IpsResult>) -> Vec<String> {
    let mut cells = vec![name];
    match ips {
        Some(result) => {
            cells.extend(iconified(result).into_iter().map(ToOwned::to_owned));
            cells.push(result.tier.as_str().to_string());
        }
        None => cells.extend(std::iter::repeat_n(String::new(), 12)),
    }
    cells
}

fn mpt_cells(name: String, three: Option<&MptStat>, five: Option<&MptStat>) -> Vec<String> {
    vec![
        name,
        cell(three.and_then(|stat| stat.alpha.as_ref())),
        cell(five.and_then(|stat| stat.alpha.as_ref())),
        cell(three.and_then(|stat| stat.beta.as_ref())),
        cell(five.and_then(|stat| stat.beta.as_ref())),
        cell(three.and_then(|stat| stat.upside_capture.as_ref())),
        cell(five.and_then(|stat| stat.upside_capture.as_ref())),
        cell(three.and_then(|stat| stat.downside_capture.as_ref())),
        cell(five.and_then(|stat| stat.downside_capture.as_ref())),
    ]
}

struct ProposedRows<'a> {
    display: String,
    ips: Option<&'a IpsResult>,
    performance: Option<&'a PerformanceRow>,
    mpt_3yr: Option<&'a MptStat>,
    mpt_5yr: Option<&'a MptStat>,
    risk_adjusted: Option<&'a RiskAdjustedRow>,
    fund_facts: Option<&'a FundFacts>,
}

fn proposed_rows<'a>(context: &'a ReportContext, fund: &ProposedFund) -> ProposedRows<'a> {
    let matches = |name: &str, ticker: &str| {
        (!fund.ticker.is_empty() && ticker == fund.ticker) || name == fund.fund_name
    };
    ProposedRows {
        display: display_name(&fund.fund_name, &fund.ticker),
        ips: context.ips.iter().find(|row| matches(&row.fund_name, &row.ticker)),
        performance: context
            .performance
            .iter()
            .find(|row| matches(&row.fund_name, &row.ticker)),
        mpt_3yr: context.mpt_3yr.iter().find(|row| matches(&row.fund, &row.ticker)),
        mpt_5yr: context.mpt_5yr.iter().find(|row| matches(&row.fund, &row.ticker)),
        risk_adjusted: context
            .risk_adjusted
            .iter()
            .find(|row| matches(&row.fund, &row.ticker)),
        fund_facts: context
            .fund_facts
            .iter()
            .find(|row| matches(&row.fund, &row.ticker)),
    }
}

fn risk_cells(name: String, row: Option<&RiskAdjustedRow>) -> Vec<String> {
    vec![
        name,
        cell(row.and_then(|row| row.sharpe.three_yr.as_ref())),
        cell(row.and_then(|row| row.sharpe.five_yr.as_ref())),
        cell(row.and_then(|row| row.sortino.three_yr.as_ref())),
        cell(row.and_then(|row| row.sortino.five_yr.as_ref())),
        cell(row.and_then(|row| row.info.three_yr.as_ref())),
        cell(row.and_then(|row| row.info.five_yr.as_ref())),
    ]
}

fn facts_cells(name: String, facts: Option<&FundFacts>) -> Vec<String> {
    vec![
        name,
        cell(facts.and_then(|facts| facts.manager_tenure_yrs.as_ref())),
        cell(facts.and_then(|facts| facts.expense_ratio.as_ref())),
        cell(facts.and_then(|facts| facts.expense_ratio_rank.as_ref())),
        cell(facts.and_then(|facts| facts.total_number_of_holdings.as_ref())),
        cell(facts.and_then(|facts| facts.turnover_ratio.as_ref())),
    ]
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

pub fn build_tables(context: &ReportContext, view: &FundView<'_>) -> Vec<SlideTable> {
    let proposed = view
        .proposed
        .iter()
        .map(|fund| proposed_rows(context, fund))
        .collect::<Vec<ProposedRows<'_>>>();
    let selected = view.display_name.clone();

    let mut ips_columns = vec!["Investment Manager".to_string()];
    ips_columns.extend((1..=11).map(|index| index.to_string()));
    ips_columns.push("IPS Status".to_string());
    let mut ips_rows = vec![ips_cells(selected.clone(), view.ips)];
    ips_rows.extend(proposed.iter().map(|rows| ips_cells(rows.display.clone(), rows.ips)));

    let mut performance_rows = vec![performance_cells(selected.clone(), view.performance)];
    if let Some(benchmark) = &view.benchmark {
        performance_rows.push(vec![
            benchmark.name.clone(),
            String::new(),
            cell(benchmark.qtd.as_ref()),
            cell(benchmark.one_yr.as_ref()),
            cell(benchmark.three_yr.as_ref()),
            cell(benchmark.five_yr.as_ref()),
            cell(benchmark.ten_yr.as_ref()),
        ]);
    }

    let mut calendar_columns = vec!["Investment Manager".to_string()];
    calendar_columns.extend(context.calendar_years.iter().cloned());
    let calendar_row = |name: String, row: Option<&CalendarYearRow>| {
        let mut cells = vec![name];
        cells.extend(context.calendar_years.iter().map(|year| {
            row.and_then(|row| row.values.iter().find(|value| &value.year == year))
                .and_then(|value| value.value.clone())
                .unwrap_or_default()
        }));
        cells
    };
    let mut calendar_rows = vec![calendar_row(selected.clone(), view.calendar_year)];
    if let Some(benchmark) = view.benchmark_calendar_year {
        calendar_rows.push(calendar_row(benchmark.name.clone(), Some(benchmark)));
    }

    let mut mpt_rows = vec![mpt_cells(selected.clone(), view.mpt_3yr, view.mpt_5yr)];
    mpt_rows.extend(
        proposed
            .iter()
            .map(|rows| mpt_cells(rows.display.clone(), rows.mpt_3yr, rows.mpt_5yr)),
    );

    let mut risk_rows = vec![risk_cells(selected.clone(), view.risk_adjusted)];
    risk_rows.extend(
        proposed
            .iter()
            .map(|rows| risk_cells(rows.display.clone(), rows.risk_adjusted)),
    );

    let mut facts_rows = vec![facts_cells(selected.clone(), view.fund_facts)];
    facts_rows.extend(
        proposed
            .iter()
            .map(|rows| facts_cells(rows.display.clone(), rows.fund_facts)),
    );

    let mut proposed_performance = vec![performance_cells(selected, view.performance)];
    proposed_performance.extend(
        proposed
            .iter()
            .map(|rows| performance_cells(rows.display.clone(), rows.performance)),
    );

    vec![
        SlideTable {
            slide: 1,
            name: "ips_screen".to_string(),
            columns: ips_columns,
            rows: ips_rows,
        },
        SlideTable {
            slide: 2,
            name: "annualized_performance".to_string(),
            columns: performance_columns(),
            rows: performance_rows,
        },
        SlideTable {
            slide: 2,
            name: "calendar_year_returns".to_string(),
            columns: calendar_columns,
            rows: calendar_rows,
        },
        SlideTable {
            slide: 3,
            name: "mpt_statistics".to_string(),
            columns: columns(&[
                "Investment Manager",
                "3Yr Alpha",
                "5Yr Alpha",
                "3Yr Beta",
                "5Yr Beta",
                "3Yr Upside Capture",
                "5Yr Upside Capture",
                "3Yr Downside Capture",
                "5Yr Downside Capture",
            ]),
            rows: mpt_rows,
        },
        SlideTable {
            slide: 3,
            name: "risk_adjusted_returns".to_string(),
            columns: columns(&[
                "Investment Manager",
                "3Yr Sharpe Ratio",
                "5Yr Sharpe Ratio",
                "3Yr Sortino Ratio",
                "5Yr Sortino Ratio",
                "3Yr Information Ratio",
                "5Yr Information Ratio",
            ]),
            rows: risk_rows,
        },
        SlideTable {
            slide: 4,
            name: "qualitative_factors".to_string(),
            columns: columns(&[
                "Investment Manager",
                "Manager Tenure",
                "Expense Ratio",
                "Expense Ratio Rank",
                "Total Holdings",
                "Turnover Ratio",
            ]),
            rows: facts_rows,
        },
        SlideTable {
            slide: 5,
            name: "proposed_performance".to_string(),
            columns: performance_columns(),
            rows: proposed_performance,
        },
    ]
}

fn peer_rank_summary(view: &FundView<'_>) -> String {
    let Some(ranks) = view.peer_ranks else {
        return String::new();
    };
    let parts = [
        ("Sharpe", ranks.sharpe.three_yr),
        ("Sortino", ranks.sortino.three_yr),
        ("Information", ranks.info.three_yr),
    ]
    .into_iter()
    .filter_map(|(label, rank)| rank.map(|rank| format!("{label} {rank}")))
    .collect::<Vec<String>>();
    if parts.is_empty() {
        return String::new();
    }
    format!("3Yr peer ranks for {}: {}.", view.display_name, parts.join(", "))
}

fn qualitative_summary(view: &FundView<'_>) -> String {
    let Some(facts) = view.fund_facts else {
        return String::new();
    };
    let parts = [
        ("manager tenure", facts.manager_tenure_yrs.as_ref(), " yrs"),
        ("expense ratio", facts.expense_ratio.as_ref(), "%"),
        ("holdings", facts.total_number_of_holdings.as_ref(), ""),
        ("turnover", facts.turnover_ratio.as_ref(), "%"),
    ]
    .into_iter()
    .filter_map(|(label, value, unit)| value.map(|value| format!("{label} {value}{unit}")))
    .collect::<Vec<String>>();
    if parts.is_empty() {
        return String::new();
    }
    format!("{}: {}.", view.display_name, parts.join(", "))
}

pub fn build_payload(context: &ReportContext, view: &FundView<'_>, template: &str) -> WriteupPayload {
    let mut placeholders = BTreeMap::new();
    placeholders.insert("[Fund Name]".to_string(), view.display_name.clone());
    placeholders.insert(
        "[Category]".to_string(),
        view.factsheet
            .map(|row| row.category.clone())
            .unwrap_or_default(),
    );
    placeholders.insert("[Slide 3 Data]".to_string(), peer_rank_summary(view));
    placeholders.insert("[Qualitative Factors]".to_string(), qualitative_summary(view));

    let mut bullets = generate_bullets(view, context.metadata.report_date.as_ref(), template).into_iter();
    for slot in 1..=BULLET_SLOTS {
        placeholders.insert(format!("[Bullet Point {slot}]"), bullets.next().unwrap_or_default());
    }

    let mut overviews = view
        .proposed
        .iter()
        .map(|fund| fund.overview_paragraph.clone().unwrap_or_default());
    for slot in 1..=REPLACEMENT_SLOTS {
        placeholders.insert(format!("[Replacement {slot}]"), overviews.next().unwrap_or_default());
    }
    placeholders.insert(
        "[Proposed Fund]".to_string(),
        view.proposed
            .iter()
            .map(|fund| display_name(&fund.fund_name, &fund.ticker))
            .collect::<Vec<String>>()
            .join(", "),
    );

    WriteupPayload {
        fund: view.display_name.clone(),
        placeholders,
        tables: build_tables(context, view),
    }
}

/// Drops tables whose column count disagrees with the template. Tables the
/// template does not list are passed through.
pub fn validate_against_template(
    payload: &mut WriteupPayload,
    manifest: &TemplateManifest,
    diagnostics: &mut Diagnostics,
) {
    payload.tables.retain(|table| {
        let Some(expected) = manifest
            .tables
            .iter()
            .find(|entry| entry.slide == table.slide && entry.name == table.name)
        else {
            return true;
        };
        if expected.column_count == table.columns.len() {
            return true;
        }
        diagnostics.warn(
            WarningKind::TemplateMismatch,
            COMPONENT,
            format!(
                "slide {} table {} expects {} columns but has {}; skipped",
                table.slide,
                table.name,
                expected.column_count,
                table.columns.len()
            ),
        );
        false
    });

    info!(tables = payload.tables.len(), "validated writeup tables");
}
