use serde::Serialize;

use crate::model::{
    CalendarYearRow, FactsheetRow, FundFacts, IpsResult, MptStat, PeerRankRow, PerformanceRow,
    ProposedFund, RiskAdjustedRow,
};
use crate::report::factsheet::factsheet_for;
use crate::report::pipeline::ReportContext;
use crate::report::proposed::{locate_factsheet_page, overview_paragraph};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkRow {
    pub name: String,
    pub qtd: Option<String>,
    pub one_yr: Option<String>,
    pub three_yr: Option<String>,
    pub five_yr: Option<String>,
    pub ten_yr: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FundView<'a> {
    pub fund_name: String,
    pub ticker: String,
    pub display_name: String,
    pub ips: Option<&'a IpsResult>,
    pub performance: Option<&'a PerformanceRow>,
    pub benchmark: Option<BenchmarkRow>,
    pub calendar_year: Option<&'a CalendarYearRow>,
    pub benchmark_calendar_year: Option<&'a CalendarYearRow>,
    pub mpt_3yr: Option<&'a MptStat>,
    pub mpt_5yr: Option<&'a MptStat>,
    pub risk_adjusted: Option<&'a RiskAdjustedRow>,
    pub peer_ranks: Option<&'a PeerRankRow>,
    pub factsheet: Option<&'a FactsheetRow>,
    pub fund_facts: Option<&'a FundFacts>,
    pub overview: Option<String>,
    pub proposed: Vec<&'a ProposedFund>,
}

pub fn display_name(fund_name: &str, ticker: &str) -> String {
    if ticker.is_empty() {
        fund_name.to_string()
    } else {
        format!("{fund_name} ({ticker})")
    }
}

fn ticker_for(context: &ReportContext, fund_name: &str) -> String {
    context
        .tickers
        .iter()
        .find(|assignment| assignment.fund_name == fund_name)
        .map(|assignment| assignment.ticker.clone())
        .unwrap_or_default()
}

fn by_fund<'a, T>(
    rows: &'a [T],
    fund_name: &str,
    ticker: &str,
    key: impl Fn(&T) -> (&str, &str),
) -> Option<&'a T> {
    rows.iter()
        .find(|row| !ticker.is_empty() && key(*row).1 == ticker)
        .or_else(|| rows.iter().find(|row| key(*row).0 == fund_name))
}

/// Assembles the view of `fund_name`. Proposed funds keep their confirmation
/// order and never include the selected fund itself.
pub fn build_fund_view<'a>(
    context: &'a ReportContext,
    fund_name: &str,
    factsheet_threshold: u8,
) -> FundView<'a> {
    let ticker = ticker_for(context, fund_name);
    let factsheet = factsheet_for(&context.factsheets, fund_name, &ticker);

    let performance = by_fund(&context.performance, fund_name, &ticker, |row| {
        (row.fund_name.as_str(), row.ticker.as_str())
    });
    let benchmark_name = factsheet
        .map(|row| row.benchmark.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{fund_name} Benchmark"));
    let benchmark = performance.map(|row| BenchmarkRow {
        name: benchmark_name.clone(),
        qtd: row.bench_qtd.clone(),
        one_yr: row.bench_one_yr.clone(),
        three_yr: row.bench_three_yr.clone(),
        five_yr: row.bench_five_yr.clone(),
        ten_yr: row.bench_ten_yr.clone(),
    });

    let overview = locate_factsheet_page(
        &context.pages,
        &context.factsheets,
        fund_name,
        &ticker,
        factsheet_threshold,
    )
    .and_then(|(page, _)| overview_paragraph(context.pages.page_text(page)));

    FundView {
        fund_name: fund_name.to_string(),
        display_name: display_name(fund_name, &ticker),
        ips: by_fund(&context.ips, fund_name, &ticker, |row| {
            (row.fund_name.as_str(), row.ticker.as_str())
        }),
        performance,
        benchmark,
        calendar_year: by_fund(&context.calendar_funds, fund_name, &ticker, |row| {
            (row.name.as_str(), row.ticker.as_str())
        }),
        benchmark_calendar_year: context
            .calendar_benchmarks
            .iter()
            .find(|row| row.name == benchmark_name),
        mpt_3yr: by_fund(&context.mpt_3yr, fund_name, &ticker, |row| {
            (row.fund.as_str(), row.ticker.as_str())
        }),
        mpt_5yr: by_fund(&context.mpt_5yr, fund_name, &ticker, |row| {
            (row.fund.as_str(), row.ticker.as_str())
        }),
        risk_adjusted: by_fund(&context.risk_adjusted, fund_name, &ticker, |row| {
            (row.fund.as_str(), row.ticker.as_str())
        }),
        peer_ranks: by_fund(&context.peer_ranks, fund_name, &ticker, |row| {
            (row.fund.as_str(), row.ticker.as_str())
        }),
        factsheet,
        fund_facts: by_fund(&context.fund_facts, fund_name, &ticker, |row| {
            (row.fund.as_str(), row.ticker.as_str())
        }),
        overview,
        proposed: context
            .proposed
            .iter()
            .filter(|proposed| proposed.fund_name != fund_name)
            .collect(),
        ticker,
    }
}
