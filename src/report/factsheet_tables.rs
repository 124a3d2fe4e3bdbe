use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::model::{FactsheetRow, FundFacts, PeerRankRow, PeriodValues, RiskAdjustedRow, WarningKind};
use crate::report::diagnostics::Diagnostics;
use crate::report::pdf::ReportPages;
use crate::report::text::{clean_number, decimal_tokens};

const COMPONENT: &str = "numeric_series";

const RISK_ADJUSTED_HEADING: &str = "RISK-ADJUSTED RETURNS";
const RATIO_LABELS: [&str; 3] = ["Sharpe Ratio", "Information Ratio", "Sortino Ratio"];
const RATIO_WINDOW: usize = 6;
const PERIOD_SLOTS: usize = 4;
const PEER_RANK_PREFIX_WORDS: usize = 2;

const FUND_FACTS_HEADING: &str = "FUND FACTS";
const FUND_FACTS_WINDOW: usize = 8;
/// Longest labels first so that "Expense Ratio Rank" wins over "Expense Ratio".
const FUND_FACT_LABELS: [&str; 5] = [
    "Total Number of Holdings",
    "Manager Tenure Yrs.",
    "Expense Ratio Rank",
    "Turnover Ratio",
    "Expense Ratio",
];

static RE_PERIOD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b1\s*Yr").expect("valid period header regex"));
static RE_LEADING_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?-?\d+(\.\d+)?\)?%?").expect("valid leading decimal regex"));

#[derive(Debug, Default)]
pub struct FactsheetTables {
    pub risk_adjusted: Vec<RiskAdjustedRow>,
    pub peer_ranks: Vec<PeerRankRow>,
    pub fund_facts: Vec<FundFacts>,
}

pub fn extract_factsheet_tables(
    pages: &ReportPages,
    factsheets: &[FactsheetRow],
    diagnostics: &mut Diagnostics,
) -> FactsheetTables {
    let mut tables = FactsheetTables::default();
    for row in factsheets.iter().filter(|row| row.matched) {
        let lines = pages
            .page_text(row.page)
            .lines()
            .map(str::trim)
            .collect::<Vec<&str>>();

        match risk_adjusted_from_lines(&lines) {
            Some((sharpe, info, sortino)) => tables.risk_adjusted.push(RiskAdjustedRow {
                fund: row.matched_name.clone(),
                ticker: row.matched_ticker.clone(),
                sharpe,
                info,
                sortino,
            }),
            None => diagnostics.warn(
                WarningKind::ParseGap,
                COMPONENT,
                format!("no risk-adjusted returns on page {} for {}", row.page, row.matched_name),
            ),
        }

        if let Some((sharpe, info, sortino)) = peer_ranks_from_lines(&lines) {
            tables.peer_ranks.push(PeerRankRow {
                fund: row.matched_name.clone(),
                ticker: row.matched_ticker.clone(),
                sharpe,
                info,
                sortino,
            });
        }

        let mut facts = fund_facts_from_lines(&lines);
        facts.fund = row.matched_name.clone();
        facts.ticker = row.matched_ticker.clone();
        tables.fund_facts.push(facts);
    }

    info!(
        risk_adjusted = tables.risk_adjusted.len(),
        peer_ranks = tables.peer_ranks.len(),
        fund_facts = tables.fund_facts.len(),
        "extracted factsheet tables"
    );
    tables
}

type RatioTriple<T> = (PeriodValues<T>, PeriodValues<T>, PeriodValues<T>);

pub fn risk_adjusted_from_lines(lines: &[&str]) -> Option<RatioTriple<String>> {
    let heading = lines.iter().position(|line| line.contains(RISK_ADJUSTED_HEADING))?;
    let window = &lines[heading + 1..lines.len().min(heading + 1 + RATIO_WINDOW)];

    let mut ratios = RATIO_LABELS.iter().map(|label| {
        window
            .iter()
            .find(|line| line.starts_with(label))
            .map(|line| {
                let values = decimal_tokens(&line[label.len()..])
                    .into_iter()
                    .take(PERIOD_SLOTS)
                    .map(Some)
                    .collect();
                PeriodValues::from_slots(values)
            })
            .unwrap_or_default()
    });

    let sharpe = ratios.next().unwrap_or_default();
    let info = ratios.next().unwrap_or_default();
    let sortino = ratios.next().unwrap_or_default();
    if sharpe.is_empty() && info.is_empty() && sortino.is_empty() {
        return None;
    }
    Some((sharpe, info, sortino))
}

/// The second "1 Yr" header after the risk-adjusted heading introduces the
/// peer-rank block; its three following lines hold integer ranks.
pub fn peer_ranks_from_lines(lines: &[&str]) -> Option<RatioTriple<u8>> {
    let heading = lines.iter().position(|line| line.contains(RISK_ADJUSTED_HEADING))?;
    let header = lines
        .iter()
        .enumerate()
        .skip(heading + 1)
        .filter(|(_, line)| RE_PERIOD_HEADER.is_match(line))
        .nth(1)
        .map(|(index, _)| index)?;

    let mut ranks: [PeriodValues<u8>; 3] = Default::default();
    for (position, line) in lines.iter().skip(header + 1).take(RATIO_LABELS.len()).enumerate() {
        let slot = RATIO_LABELS
            .iter()
            .position(|label| {
                let first_word = label.split_whitespace().next().unwrap_or_default();
                line.starts_with(first_word)
            })
            .unwrap_or(position);
        let values = line
            .split_whitespace()
            .skip(PEER_RANK_PREFIX_WORDS)
            .take(PERIOD_SLOTS)
            .map(|token| {
                clean_number(token)
                    .parse::<u8>()
                    .ok()
                    .filter(|rank| (1..=100).contains(rank))
            })
            .collect::<Vec<Option<u8>>>();
        ranks[slot] = PeriodValues::from_slots(values);
    }

    let [sharpe, info, sortino] = ranks;
    if sharpe.is_empty() && info.is_empty() && sortino.is_empty() {
        return None;
    }
    Some((sharpe, info, sortino))
}

pub fn fund_facts_from_lines(lines: &[&str]) -> FundFacts {
    let mut facts = FundFacts::default();
    let Some(heading) = lines.iter().position(|line| line.contains(FUND_FACTS_HEADING)) else {
        return facts;
    };

    for line in lines.iter().skip(heading + 1).take(FUND_FACTS_WINDOW) {
        let Some(label) = FUND_FACT_LABELS.iter().find(|label| line.starts_with(*label)) else {
            continue;
        };
        let remainder = line[label.len()..].trim();
        let value = RE_LEADING_DECIMAL
            .find(remainder)
            .map(|found| clean_number(found.as_str()))
            .or_else(|| remainder.split_whitespace().next().map(ToOwned::to_owned));

        let slot = match *label {
            "Manager Tenure Yrs." => &mut facts.manager_tenure_yrs,
            "Expense Ratio" => &mut facts.expense_ratio,
            "Expense Ratio Rank" => &mut facts.expense_ratio_rank,
            "Total Number of Holdings" => &mut facts.total_number_of_holdings,
            _ => &mut facts.turnover_ratio,
        };
        if slot.is_none() {
            *slot = value;
        }
    }
    facts
}
