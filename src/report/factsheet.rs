use tracing::{debug, info};

use crate::model::{FactsheetRow, TickerAssignment};
use crate::report::fuzzy::token_sort_ratio;
use crate::report::pdf::ReportPages;
use crate::report::text::{condense_whitespace, is_ticker};

const HEADER_LABELS: [&str; 6] = [
    "Benchmark:",
    "Category:",
    "Net Assets:",
    "Manager Name:",
    "Avg. Market Cap:",
    "Expense Ratio:",
];

#[derive(Debug, Clone, Copy)]
pub struct FactsheetSettings {
    pub header_band: f64,
    pub match_threshold: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactsheetHeader {
    pub name: String,
    pub ticker: String,
    pub fields: [String; 6],
}

pub fn header_band_text(pages: &ReportPages, page: usize, header_band: f64) -> String {
    let words = pages
        .page_words(page)
        .iter()
        .filter(|word| word.top < header_band)
        .map(|word| word.text.as_str())
        .collect::<Vec<&str>>();
    words.join(" ")
}

pub fn is_factsheet_header(header: &str) -> bool {
    header.contains("Benchmark:") && header.contains("Expense Ratio:")
}

pub fn parse_factsheet_header(header: &str) -> FactsheetHeader {
    let header = condense_whitespace(header);
    let prefix_end = header.find(HEADER_LABELS[0]).unwrap_or(header.len());
    let prefix = &header[..prefix_end];

    // Share-class suffixes such as R6 precede the ticker, so take the last
    // ticker-shaped token.
    let tokens = prefix.split_whitespace().collect::<Vec<&str>>();
    let (name, ticker) = match tokens.iter().rposition(|token| is_ticker(token)) {
        Some(index) => (tokens[..index].join(" "), tokens[index].to_string()),
        None => (prefix.trim().to_string(), String::new()),
    };

    let mut positions = Vec::<(usize, usize)>::new();
    let mut cursor = prefix_end;
    for (index, label) in HEADER_LABELS.iter().enumerate() {
        if let Some(offset) = header[cursor..].find(label) {
            let start = cursor + offset;
            positions.push((index, start));
            cursor = start + label.len();
        }
    }

    let mut fields: [String; 6] = Default::default();
    for (slot, (index, start)) in positions.iter().enumerate() {
        let value_start = start + HEADER_LABELS[*index].len();
        let value = match positions.get(slot + 1) {
            Some((_, next_start)) => header[value_start..*next_start].trim().to_string(),
            None if *index == HEADER_LABELS.len() - 1 => header[value_start..]
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
            None => header[value_start..].trim().to_string(),
        };
        fields[*index] = value;
    }

    FactsheetHeader {
        name,
        ticker,
        fields,
    }
}

fn best_known_match<'a>(
    header: &FactsheetHeader,
    known: &'a [TickerAssignment],
) -> Option<(u8, &'a TickerAssignment)> {
    let parsed = format!("{} {}", header.name, header.ticker);
    known
        .iter()
        .map(|fund| {
            let score = if !header.ticker.is_empty() && header.ticker == fund.ticker {
                100
            } else {
                token_sort_ratio(&parsed, &format!("{} {}", fund.fund_name, fund.ticker))
            };
            (score, fund)
        })
        .fold(None, |best, (score, fund)| match best {
            Some((best_score, _)) if best_score >= score => best,
            _ => Some((score, fund)),
        })
}

pub fn parse_factsheets(
    pages: &ReportPages,
    start_page: usize,
    known: &[TickerAssignment],
    settings: FactsheetSettings,
) -> Vec<FactsheetRow> {
    let mut rows = Vec::new();
    for page in start_page.max(1)..=pages.page_count() {
        let header_text = header_band_text(pages, page, settings.header_band);
        if !is_factsheet_header(&header_text) {
            continue;
        }

        let header = parse_factsheet_header(&header_text);
        let [benchmark, category, net_assets, manager, avg_market_cap, expense_ratio] =
            header.fields.clone();
        let (match_score, matched_name, matched_ticker) = match best_known_match(&header, known) {
            Some((score, fund)) => (score, fund.fund_name.clone(), fund.ticker.clone()),
            None => (0, String::new(), String::new()),
        };

        debug!(page, name = %header.name, score = match_score, "parsed factsheet header");
        rows.push(FactsheetRow {
            page,
            parsed_name: header.name,
            parsed_ticker: header.ticker,
            matched_name,
            matched_ticker,
            benchmark,
            category,
            net_assets,
            manager,
            avg_market_cap,
            expense_ratio,
            match_score,
            matched: match_score > settings.match_threshold,
        });
    }

    info!(pages = rows.len(), "parsed factsheet pages");
    rows
}

pub fn factsheet_for<'a>(
    rows: &'a [FactsheetRow],
    fund_name: &str,
    ticker: &str,
) -> Option<&'a FactsheetRow> {
    rows.iter()
        .filter(|row| row.matched)
        .find(|row| !ticker.is_empty() && row.matched_ticker == ticker)
        .or_else(|| {
            rows.iter()
                .filter(|row| row.matched)
                .find(|row| row.matched_name == fund_name)
        })
}
