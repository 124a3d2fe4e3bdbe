use std::collections::HashSet;

use tracing::info;

use crate::model::{MatchPass, TickerAssignment, WarningKind};
use crate::report::diagnostics::Diagnostics;
use crate::report::fuzzy::token_sort_ratio;
use crate::report::pdf::PageLine;
use crate::report::text::{is_ticker, normalize_name};

const COMPONENT: &str = "ticker_resolver";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    name: String,
    ticker: String,
}

fn build_candidates(lines: &[PageLine<'_>]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for line in lines {
        let tokens = line.text.split_whitespace().collect::<Vec<&str>>();
        for (index, token) in tokens.iter().enumerate() {
            if !is_ticker(token) {
                continue;
            }
            let name = normalize_name(&tokens[..index].join(" "));
            if name.is_empty() {
                continue;
            }
            candidates.push(Candidate {
                name,
                ticker: (*token).to_string(),
            });
        }
    }
    candidates
}

/// Aligns scorecard fund names to tickers printed in the performance
/// section. Funds are visited in order and the primary pass never hands the
/// same ticker to two funds.
pub fn resolve_tickers(
    fund_names: &[String],
    performance_lines: &[PageLine<'_>],
    threshold: u8,
    diagnostics: &mut Diagnostics,
) -> Vec<TickerAssignment> {
    let candidates = build_candidates(performance_lines);
    let mut claimed = HashSet::<String>::new();
    let mut assignments = fund_names
        .iter()
        .map(|fund_name| TickerAssignment {
            fund_name: fund_name.clone(),
            ticker: String::new(),
            score: 0,
            pass: MatchPass::Unmatched,
        })
        .collect::<Vec<TickerAssignment>>();

    for assignment in &mut assignments {
        let expected = normalize_name(&assignment.fund_name);
        let best = candidates
            .iter()
            .filter(|candidate| !claimed.contains(&candidate.ticker))
            .map(|candidate| (token_sort_ratio(&expected, &candidate.name), candidate))
            .fold(None::<(u8, &Candidate)>, |best, (score, candidate)| match best {
                Some((best_score, _)) if best_score >= score => best,
                _ => Some((score, candidate)),
            });

        if let Some((score, candidate)) = best {
            if score >= threshold {
                claimed.insert(candidate.ticker.clone());
                assignment.ticker = candidate.ticker.clone();
                assignment.score = score;
                assignment.pass = MatchPass::Primary;
            }
        }
    }

    for assignment in &mut assignments {
        if assignment.pass != MatchPass::Unmatched {
            continue;
        }
        let expected = normalize_name(&assignment.fund_name);
        let found = candidates.iter().find(|candidate| {
            !claimed.contains(&candidate.ticker) && expected.contains(&candidate.name)
        });
        if let Some(candidate) = found {
            claimed.insert(candidate.ticker.clone());
            assignment.ticker = candidate.ticker.clone();
            assignment.score = token_sort_ratio(&expected, &candidate.name);
            assignment.pass = MatchPass::Secondary;
        }
    }

    for assignment in &mut assignments {
        if assignment.pass != MatchPass::Unmatched {
            continue;
        }
        match substring_fallback(&assignment.fund_name, performance_lines) {
            Some(ticker) => {
                assignment.ticker = ticker;
                assignment.pass = MatchPass::Tertiary;
            }
            None => diagnostics.warn(
                WarningKind::AlignmentFailure,
                COMPONENT,
                format!("no ticker found for {}", assignment.fund_name),
            ),
        }
    }

    info!(
        funds = assignments.len(),
        resolved = assignments.iter().filter(|a| !a.ticker.is_empty()).count(),
        "resolved tickers"
    );
    assignments
}

fn substring_fallback(fund_name: &str, lines: &[PageLine<'_>]) -> Option<String> {
    let needle = fund_name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    lines.iter().find_map(|line| {
        let lowered = line.text.to_lowercase();
        let position = lowered.find(&needle)?;
        line.text
            .get(position + needle.len()..)?
            .split_whitespace()
            .find(|token| is_ticker(token))
            .map(ToOwned::to_owned)
    })
}
