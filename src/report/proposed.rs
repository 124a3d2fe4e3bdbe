use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::model::{FactsheetRow, ProposedFund, TickerAssignment, TocIndex};
use crate::report::fuzzy::{token_set_ratio, token_sort_ratio};
use crate::report::pdf::ReportPages;
use crate::report::toc::page_has_heading;
use crate::report::text::{condense_whitespace, contains_token, first_sentences, is_heading_like, normalize_name};

pub const PROPOSED_HEADING: &str = "FUND SCORECARD: PROPOSED FUNDS";
const OVERVIEW_HEADING: &str = "INVESTMENT OVERVIEW";
const OVERVIEW_SENTENCES: usize = 3;
const MIN_SHARED_TOKENS: usize = 2;
const MIN_TOKEN_LEN: usize = 3;

fn has_proposed_heading(pages: &ReportPages, page: usize) -> bool {
    page_has_heading(pages.page_text(page), PROPOSED_HEADING)
}

pub fn proposed_section_pages(pages: &ReportPages, toc: &TocIndex) -> Vec<usize> {
    let mut starts = (1..=pages.page_count())
        .filter(|page| has_proposed_heading(pages, *page))
        .collect::<BTreeSet<usize>>();
    if let Some(page) = toc.scorecard_proposed {
        if page <= pages.page_count() {
            starts.insert(page);
        }
    }

    let mut section = BTreeSet::new();
    for start in starts {
        let bound = toc
            .next_anchor_after(start)
            .unwrap_or(pages.page_count() + 1);
        section.insert(start);
        let mut page = start + 1;
        while page < bound && page <= pages.page_count() && has_proposed_heading(pages, page) {
            section.insert(page);
            page += 1;
        }
    }
    section.into_iter().collect()
}

fn significant_tokens(text: &str) -> BTreeSet<String> {
    normalize_name(text)
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(ToOwned::to_owned)
        .collect()
}

pub fn find_proposed_funds(
    pages: &ReportPages,
    section_pages: &[usize],
    known: &[TickerAssignment],
    threshold: u8,
) -> Vec<ProposedFund> {
    let lines = section_pages
        .iter()
        .flat_map(|page| {
            pages
                .page_text(*page)
                .lines()
                .map(move |line| (*page, line))
        })
        .filter(|(_, line)| !line.trim().is_empty())
        .collect::<Vec<(usize, &str)>>();

    let mut confirmed = Vec::new();
    for fund in known {
        let fund_tokens = significant_tokens(&fund.fund_name);
        let best = lines
            .iter()
            .filter(|(_, line)| {
                significant_tokens(line).intersection(&fund_tokens).count() >= MIN_SHARED_TOKENS
            })
            .map(|(page, line)| (token_set_ratio(&fund.fund_name, line), *page))
            .fold(None::<(u8, usize)>, |best, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            });

        if let Some((score, page)) = best.filter(|(score, _)| *score >= threshold) {
            debug!(fund = %fund.fund_name, page, score, "confirmed proposed fund");
            confirmed.push(ProposedFund {
                fund_name: fund.fund_name.clone(),
                ticker: fund.ticker.clone(),
                source_page: page,
                match_score: score,
                overview_paragraph: None,
            });
        }
    }

    info!(proposed = confirmed.len(), "resolved proposed funds");
    confirmed
}

pub fn locate_factsheet_page(
    pages: &ReportPages,
    factsheets: &[FactsheetRow],
    fund_name: &str,
    ticker: &str,
    threshold: u8,
) -> Option<(usize, u8)> {
    if !ticker.is_empty() {
        let hit = factsheets
            .iter()
            .find(|row| pages.page_text(row.page).lines().any(|line| contains_token(line, ticker)));
        if let Some(row) = hit {
            return Some((row.page, 100));
        }
    }

    factsheets
        .iter()
        .filter_map(|row| {
            pages
                .page_text(row.page)
                .lines()
                .map(|line| token_sort_ratio(fund_name, line))
                .max()
                .map(|score| (row.page, score))
        })
        .filter(|(_, score)| *score > threshold)
        .fold(None::<(usize, u8)>, |best, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
}

pub fn overview_paragraph(page_text: &str) -> Option<String> {
    let mut lines = page_text.lines().map(str::trim);
    lines
        .by_ref()
        .find(|line| line.to_uppercase().contains(OVERVIEW_HEADING))?;

    let mut paragraph = Vec::new();
    for line in lines {
        if line.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if is_heading_like(line) {
            break;
        }
        paragraph.push(line);
    }

    let text = condense_whitespace(&paragraph.join(" "));
    if text.is_empty() {
        return None;
    }
    Some(first_sentences(&text, OVERVIEW_SENTENCES))
}

pub fn attach_overviews(
    pages: &ReportPages,
    factsheets: &[FactsheetRow],
    proposed: &mut [ProposedFund],
    threshold: u8,
) {
    for fund in proposed.iter_mut() {
        fund.overview_paragraph =
            locate_factsheet_page(pages, factsheets, &fund.fund_name, &fund.ticker, threshold)
                .and_then(|(page, _)| overview_paragraph(pages.page_text(page)));
    }
}
