use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{ReportDate, ReportMetadata};

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid date regex"));
static RE_TOTAL_OPTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total Options:\s*(\d+)").expect("valid total options regex"));
static RE_PREPARED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Prepared By:(.*)").expect("valid prepared-by regex"));

const QUARTER_ENDS: [(u32, u32, u8); 4] = [(3, 31, 1), (6, 30, 2), (9, 30, 3), (12, 31, 4)];

#[derive(Debug, Clone)]
pub struct MetadataSettings {
    pub prepared_by_default: String,
    pub vendor_watermark: String,
}

pub fn extract_metadata(first_page: &str, settings: &MetadataSettings) -> ReportMetadata {
    ReportMetadata {
        report_date: parse_report_date(first_page),
        total_options: RE_TOTAL_OPTIONS
            .captures(first_page)
            .and_then(|captures| captures[1].parse::<u32>().ok()),
        prepared_for: parse_prepared_for(first_page),
        prepared_by: parse_prepared_by(first_page, settings),
    }
}

pub fn parse_report_date(text: &str) -> Option<ReportDate> {
    let captures = RE_DATE.captures(text)?;
    let month = captures[1].parse::<u32>().ok()?;
    let day = captures[2].parse::<u32>().ok()?;
    let year = captures[3].parse::<i32>().ok()?;

    if let Some((_, _, quarter)) = QUARTER_ENDS
        .iter()
        .find(|(end_month, end_day, _)| *end_month == month && *end_day == day)
    {
        return Some(ReportDate::QuarterEnd {
            quarter: *quarter,
            year,
        });
    }

    NaiveDate::from_ymd_opt(year, month, day).map(ReportDate::AsOf)
}

fn parse_prepared_for(text: &str) -> Option<String> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| line.contains("Prepared For:"))?;
    lines
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_prepared_by(text: &str, settings: &MetadataSettings) -> String {
    let value = RE_PREPARED_BY
        .captures(text)
        .map(|captures| captures[1].trim().to_string())
        .unwrap_or_default();

    let watermark = settings.vendor_watermark.to_lowercase();
    let watermarked = !watermark.is_empty() && value.to_lowercase().contains(&watermark);
    if value.is_empty() || watermarked {
        settings.prepared_by_default.clone()
    } else {
        value
    }
}
