use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::model::{MetricStatus, ScorecardBlock, ScorecardMetric};
use crate::report::pdf::PageLine;
use crate::report::text::{condense_whitespace, is_watch_phrase, strip_watch_phrases};

pub const METRIC_LABELS: [&str; 14] = [
    "Manager Tenure",
    "Excess Performance (3Yr)",
    "Excess Performance (5Yr)",
    "Peer Return Rank (3Yr)",
    "Peer Return Rank (5Yr)",
    "Expense Ratio Rank",
    "Sharpe Ratio Rank (3Yr)",
    "Sharpe Ratio Rank (5Yr)",
    "R-Squared (3Yr)",
    "R-Squared (5Yr)",
    "Sortino Ratio Rank (3Yr)",
    "Sortino Ratio Rank (5Yr)",
    "Tracking Error Rank (3Yr)",
    "Tracking Error Rank (5Yr)",
];

static RE_METRIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let labels = METRIC_LABELS
        .iter()
        .map(|label| regex::escape(label))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"^({labels})\s+(Pass|Review|Fail)\s*(.*)$"))
        .expect("valid scorecard metric regex")
});

pub fn contains_metric_label(line: &str) -> bool {
    METRIC_LABELS.iter().any(|label| line.contains(label))
}

#[derive(Debug, Default)]
struct PendingBlock {
    fund_name: String,
    page: usize,
    metrics: Vec<ScorecardMetric>,
}

impl PendingBlock {
    fn flush_into(&mut self, blocks: &mut Vec<ScorecardBlock>) {
        let block = std::mem::take(self);
        if !block.fund_name.is_empty() && !block.metrics.is_empty() {
            blocks.push(ScorecardBlock {
                fund_name: block.fund_name,
                page: block.page,
                proposed: false,
                metrics: block.metrics,
            });
        }
    }
}

/// A non-empty line without any metric label opens a new block named after
/// it; metric lines append to the open block. Repeated labels keep their
/// first occurrence and a line that is only a watch-status phrase keeps the
/// pending fund name.
pub fn parse_scorecard(lines: &[PageLine<'_>]) -> Vec<ScorecardBlock> {
    let mut blocks = Vec::new();
    let mut pending = PendingBlock::default();

    for line in lines {
        let text = condense_whitespace(line.text);
        if text.is_empty() {
            continue;
        }

        if !contains_metric_label(&text) {
            if is_watch_phrase(&text) {
                continue;
            }
            pending.flush_into(&mut blocks);
            pending.fund_name = strip_watch_phrases(&text);
            pending.page = line.page;
            continue;
        }

        let Some(captures) = RE_METRIC_LINE.captures(&text) else {
            continue;
        };
        let Some(status) = MetricStatus::parse(&captures[2]) else {
            continue;
        };
        let label = captures[1].to_string();
        if pending.metrics.iter().any(|metric| metric.label == label) {
            continue;
        }
        pending.metrics.push(ScorecardMetric {
            label,
            status,
            info: captures[3].trim().to_string(),
        });
    }
    pending.flush_into(&mut blocks);

    info!(blocks = blocks.len(), "parsed scorecard blocks");
    blocks
}
