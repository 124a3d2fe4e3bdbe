use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::model::{CalendarYearRow, FactsheetRow, PerformanceRow, TickerAssignment, WarningKind, YearValue};
use crate::report::diagnostics::Diagnostics;
use crate::report::factsheet::factsheet_for;
use crate::report::fuzzy::token_sort_ratio;
use crate::report::pdf::PageLine;
use crate::report::text::{contains_token, contains_word, decimal_tokens, normalize_name};

const COMPONENT: &str = "numeric_series";

pub const FUND_SLOT_COUNT: usize = 8;
pub const SLOT_QTD: usize = 0;
pub const SLOT_1YR: usize = 2;
pub const SLOT_3YR: usize = 3;
pub const SLOT_5YR: usize = 4;
pub const SLOT_10YR: usize = 5;
pub const SLOT_NET_EXPENSE_RATIO: usize = 7;

pub const BENCH_SLOT_COUNT: usize = 6;
pub const BENCH_SLOT_QTD: usize = 0;
pub const BENCH_SLOT_1YR: usize = 1;
pub const BENCH_SLOT_3YR: usize = 3;
pub const BENCH_SLOT_5YR: usize = 4;
pub const BENCH_SLOT_10YR: usize = 5;

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b20\d{2}\b").expect("valid year regex"));

pub fn find_anchor(lines: &[PageLine<'_>], fund_name: &str, ticker: &str, threshold: u8) -> Option<usize> {
    if !ticker.is_empty() {
        if let Some(index) = lines.iter().position(|line| contains_word(line.text, ticker)) {
            return Some(index);
        }
    }

    let expected = normalize_name(fund_name);
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| (token_sort_ratio(&expected, &normalize_name(line.text)), index))
        .filter(|(score, _)| *score > threshold)
        .fold(None::<(u8, usize)>, |best, candidate| match best {
            Some(current) if current.0 >= candidate.0 => Some(current),
            _ => Some(candidate),
        })
        .map(|(_, index)| index)
}

/// Maps cleaned fund numerics onto period slots. With more than eight tokens
/// the net expense ratio is the second-to-last one; with fewer, trailing slots
/// stay empty.
pub fn map_fund_slots(tokens: &[String]) -> [Option<String>; 6] {
    let slot = |index: usize| tokens.get(index).cloned();
    let net_expense_ratio = if tokens.len() > FUND_SLOT_COUNT {
        tokens.get(tokens.len() - 2).cloned()
    } else {
        slot(SLOT_NET_EXPENSE_RATIO)
    };

    [
        slot(SLOT_QTD),
        slot(SLOT_1YR),
        slot(SLOT_3YR),
        slot(SLOT_5YR),
        slot(SLOT_10YR),
        net_expense_ratio,
    ]
}

pub fn map_bench_slots(tokens: &[String]) -> [Option<String>; 5] {
    let slot = |index: usize| tokens.get(index).cloned();
    [
        slot(BENCH_SLOT_QTD),
        slot(BENCH_SLOT_1YR),
        slot(BENCH_SLOT_3YR),
        slot(BENCH_SLOT_5YR),
        slot(BENCH_SLOT_10YR),
    ]
}

fn fund_tokens(lines: &[PageLine<'_>], anchor: usize) -> Vec<String> {
    let Some(above) = anchor.checked_sub(1) else {
        return Vec::new();
    };
    let mut tokens = decimal_tokens(lines[above].text);
    if tokens.len() < FUND_SLOT_COUNT {
        if let Some(two_above) = anchor.checked_sub(2) {
            let mut combined = decimal_tokens(lines[two_above].text);
            combined.extend(tokens);
            tokens = combined;
        }
    }
    tokens
}

fn bench_tokens(lines: &[PageLine<'_>], anchor: usize) -> Vec<String> {
    let mut tokens = lines
        .get(anchor + 1)
        .map(|line| decimal_tokens(line.text))
        .unwrap_or_default();
    if tokens.len() < BENCH_SLOT_COUNT {
        if let Some(line) = lines.get(anchor + 2) {
            tokens.extend(decimal_tokens(line.text));
        }
    }
    tokens
}

pub fn extract_performance(
    lines: &[PageLine<'_>],
    funds: &[TickerAssignment],
    anchor_threshold: u8,
    diagnostics: &mut Diagnostics,
) -> Vec<PerformanceRow> {
    let mut rows = Vec::new();
    for fund in funds {
        let Some(anchor) = find_anchor(lines, &fund.fund_name, &fund.ticker, anchor_threshold) else {
            diagnostics.warn(
                WarningKind::ParseGap,
                COMPONENT,
                format!("no performance line for {}", fund.fund_name),
            );
            continue;
        };

        let fund_values = fund_tokens(lines, anchor);
        if fund_values.is_empty() {
            diagnostics.warn(
                WarningKind::ParseGap,
                COMPONENT,
                format!("no performance numerics for {}", fund.fund_name),
            );
        }
        let [qtd, one_yr, three_yr, five_yr, ten_yr, net_expense_ratio] = map_fund_slots(&fund_values);
        let [bench_qtd, bench_one_yr, bench_three_yr, bench_five_yr, bench_ten_yr] =
            map_bench_slots(&bench_tokens(lines, anchor));

        rows.push(PerformanceRow {
            fund_name: fund.fund_name.clone(),
            ticker: fund.ticker.clone(),
            qtd,
            one_yr,
            three_yr,
            five_yr,
            ten_yr,
            net_expense_ratio,
            bench_qtd,
            bench_one_yr,
            bench_three_yr,
            bench_five_yr,
            bench_ten_yr,
        });
    }

    info!(rows = rows.len(), "extracted annualized performance");
    rows
}

pub fn detect_year_header(lines: &[PageLine<'_>]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.text.contains("Ticker"))
        .map(|line| {
            RE_YEAR
                .find_iter(line.text)
                .map(|year| year.as_str().to_string())
                .collect::<Vec<String>>()
        })
        .find(|years| !years.is_empty())
        .unwrap_or_default()
}

fn align_years(years: &[String], tokens: Vec<String>) -> Vec<YearValue> {
    let mut tokens = tokens.into_iter();
    years
        .iter()
        .map(|year| YearValue {
            year: year.clone(),
            value: tokens.next(),
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct CalendarYearTables {
    pub years: Vec<String>,
    pub funds: Vec<CalendarYearRow>,
    pub benchmarks: Vec<CalendarYearRow>,
}

pub fn extract_calendar_years(
    lines: &[PageLine<'_>],
    funds: &[TickerAssignment],
    factsheets: &[FactsheetRow],
    anchor_threshold: u8,
    diagnostics: &mut Diagnostics,
) -> CalendarYearTables {
    let years = detect_year_header(lines);
    if years.is_empty() {
        diagnostics.warn(
            WarningKind::ParseGap,
            COMPONENT,
            "no calendar-year header with years",
        );
        return CalendarYearTables::default();
    }

    let mut tables = CalendarYearTables {
        years: years.clone(),
        ..CalendarYearTables::default()
    };

    for fund in funds.iter().filter(|fund| !fund.ticker.is_empty()) {
        let anchor = lines
            .iter()
            .position(|line| contains_token(line.text, &fund.ticker));
        match anchor.and_then(|index| index.checked_sub(1)) {
            Some(above) => tables.funds.push(CalendarYearRow {
                name: fund.fund_name.clone(),
                ticker: fund.ticker.clone(),
                values: align_years(&years, decimal_tokens(lines[above].text)),
            }),
            None => diagnostics.warn(
                WarningKind::ParseGap,
                COMPONENT,
                format!("no calendar-year line for {}", fund.fund_name),
            ),
        }

        let Some(benchmark) = factsheet_for(factsheets, &fund.fund_name, &fund.ticker)
            .map(|row| row.benchmark.as_str())
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        if tables.benchmarks.iter().any(|row| row.name == benchmark) {
            continue;
        }
        if let Some(index) = find_benchmark_line(lines, benchmark, anchor_threshold) {
            tables.benchmarks.push(CalendarYearRow {
                name: benchmark.to_string(),
                ticker: String::new(),
                values: align_years(&years, decimal_tokens(lines[index].text)),
            });
        }
    }

    info!(
        years = years.len(),
        funds = tables.funds.len(),
        benchmarks = tables.benchmarks.len(),
        "extracted calendar-year returns"
    );
    tables
}

fn find_benchmark_line(lines: &[PageLine<'_>], benchmark: &str, threshold: u8) -> Option<usize> {
    let needle = benchmark.to_lowercase();
    lines
        .iter()
        .position(|line| line.text.to_lowercase().contains(&needle))
        .or_else(|| find_anchor(lines, benchmark, "", threshold))
}
