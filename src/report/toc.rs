use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::model::{SectionKey, TocIndex, WarningKind};
use crate::report::diagnostics::Diagnostics;
use crate::report::pdf::ReportPages;

const TOC_PAGES: usize = 3;

static TOC_PATTERNS: LazyLock<Vec<(SectionKey, Regex)>> = LazyLock::new(|| {
    [
        (
            SectionKey::Performance,
            r"Fund Performance:\s*Current vs\.?\s*Proposed Comparison",
        ),
        (SectionKey::CalendarYear, r"Fund Performance:\s*Calendar Year"),
        (SectionKey::R3yr, r"Risk Analysis:\s*MPT Statistics\s*\(3Yr\)"),
        (SectionKey::R5yr, r"Risk Analysis:\s*MPT Statistics\s*\(5Yr\)"),
        (SectionKey::Scorecard, r"Fund Scorecard"),
        (SectionKey::ScorecardProposed, r"Fund Scorecard:\s*Proposed Funds"),
        (SectionKey::Factsheets, r"Fund Factsheets"),
        (SectionKey::FactsheetsProposed, r"Fund Factsheets:\s*Proposed Funds"),
    ]
    .into_iter()
    .map(|(key, heading)| {
        let pattern = format!(r"(?mi)^\s*{heading}[\s.]*?(\d{{1,3}})\s*$");
        (key, Regex::new(&pattern).expect("valid toc regex"))
    })
    .collect()
});

pub fn locate_sections(pages: &ReportPages) -> TocIndex {
    let text = (1..=TOC_PAGES.min(pages.page_count()))
        .map(|page| pages.page_text(page))
        .collect::<Vec<&str>>()
        .join("\n");
    locate_sections_in(&text)
}

/// Maps each section heading followed by a trailing page number to that page.
/// The `\s*$` anchor keeps "Fund Scorecard" from matching the longer
/// "Fund Scorecard: Proposed Funds" entry.
pub fn locate_sections_in(text: &str) -> TocIndex {
    let mut toc = TocIndex::default();
    for (key, pattern) in TOC_PATTERNS.iter() {
        let page = pattern
            .captures(text)
            .and_then(|captures| captures[1].parse::<usize>().ok())
            .filter(|page| *page > 0);
        toc.set(*key, page);
    }

    info!(
        located = SectionKey::ALL.iter().filter(|key| toc.get(**key).is_some()).count(),
        "located table of contents entries"
    );
    toc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

/// Resolves the window of `key`, ending at the first present `end_keys`
/// anchor after the start, or at end of document. A missing start anchor
/// falls back to page 1 and is reported.
pub fn section_window(
    toc: &TocIndex,
    key: SectionKey,
    end_keys: &[SectionKey],
    page_count: usize,
    component: &'static str,
    diagnostics: &mut Diagnostics,
) -> PageWindow {
    let start = match toc.get(key) {
        Some(page) => page,
        None => {
            diagnostics.warn(
                WarningKind::MissingAnchor,
                component,
                format!("no table of contents entry for {}; scanning from page 1", key.as_str()),
            );
            1
        }
    };

    let end = end_keys
        .iter()
        .filter_map(|end_key| toc.get(*end_key))
        .find(|page| *page > start)
        .unwrap_or(page_count + 1);

    PageWindow { start, end }
}

pub fn page_has_heading(text: &str, heading: &str) -> bool {
    let heading = heading.to_uppercase();
    text.lines().any(|line| {
        let upper = line.to_uppercase();
        upper.find(&heading).is_some_and(|position| {
            let rest = upper[position + heading.len()..]
                .trim_matches(|character: char| character == '.' || character.is_whitespace());
            rest.is_empty() || !rest.chars().all(|character| character.is_ascii_digit())
        })
    })
}
