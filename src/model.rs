use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDate {
    QuarterEnd { quarter: u8, year: i32 },
    AsOf(NaiveDate),
}

impl ReportDate {
    pub fn quarter(&self) -> u8 {
        match self {
            Self::QuarterEnd { quarter, .. } => *quarter,
            Self::AsOf(date) => (chrono::Datelike::month(date) as u8 - 1) / 3 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::QuarterEnd { year, .. } => *year,
            Self::AsOf(date) => chrono::Datelike::year(date),
        }
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuarterEnd { quarter, year } => {
                let ordinal = match quarter {
                    1 => "1st",
                    2 => "2nd",
                    3 => "3rd",
                    _ => "4th",
                };
                write!(f, "{ordinal} QTR, {year}")
            }
            Self::AsOf(date) => write!(f, "As of {}", date.format("%B %-d, %Y")),
        }
    }
}

impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub report_date: Option<ReportDate>,
    pub total_options: Option<u32>,
    pub prepared_for: Option<String>,
    pub prepared_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Performance,
    CalendarYear,
    R3yr,
    R5yr,
    Scorecard,
    ScorecardProposed,
    Factsheets,
    FactsheetsProposed,
}

impl SectionKey {
    pub const ALL: [SectionKey; 8] = [
        SectionKey::Performance,
        SectionKey::CalendarYear,
        SectionKey::R3yr,
        SectionKey::R5yr,
        SectionKey::Scorecard,
        SectionKey::ScorecardProposed,
        SectionKey::Factsheets,
        SectionKey::FactsheetsProposed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::CalendarYear => "calendar_year",
            Self::R3yr => "r3yr",
            Self::R5yr => "r5yr",
            Self::Scorecard => "scorecard",
            Self::ScorecardProposed => "scorecard_proposed",
            Self::Factsheets => "factsheets",
            Self::FactsheetsProposed => "factsheets_proposed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocIndex {
    pub performance: Option<usize>,
    pub calendar_year: Option<usize>,
    pub r3yr: Option<usize>,
    pub r5yr: Option<usize>,
    pub scorecard: Option<usize>,
    pub scorecard_proposed: Option<usize>,
    pub factsheets: Option<usize>,
    pub factsheets_proposed: Option<usize>,
}

impl TocIndex {
    pub fn get(&self, key: SectionKey) -> Option<usize> {
        match key {
            SectionKey::Performance => self.performance,
            SectionKey::CalendarYear => self.calendar_year,
            SectionKey::R3yr => self.r3yr,
            SectionKey::R5yr => self.r5yr,
            SectionKey::Scorecard => self.scorecard,
            SectionKey::ScorecardProposed => self.scorecard_proposed,
            SectionKey::Factsheets => self.factsheets,
            SectionKey::FactsheetsProposed => self.factsheets_proposed,
        }
    }

    pub fn set(&mut self, key: SectionKey, page: Option<usize>) {
        let slot = match key {
            SectionKey::Performance => &mut self.performance,
            SectionKey::CalendarYear => &mut self.calendar_year,
            SectionKey::R3yr => &mut self.r3yr,
            SectionKey::R5yr => &mut self.r5yr,
            SectionKey::Scorecard => &mut self.scorecard,
            SectionKey::ScorecardProposed => &mut self.scorecard_proposed,
            SectionKey::Factsheets => &mut self.factsheets,
            SectionKey::FactsheetsProposed => &mut self.factsheets_proposed,
        };
        *slot = page;
    }

    pub fn next_anchor_after(&self, page: usize) -> Option<usize> {
        SectionKey::ALL
            .iter()
            .filter_map(|key| self.get(*key))
            .filter(|anchor| *anchor > page)
            .min()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    Pass,
    Review,
    Fail,
}

impl MetricStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pass" => Some(Self::Pass),
            "Review" => Some(Self::Review),
            "Fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorecardMetric {
    pub label: String,
    pub status: MetricStatus,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorecardBlock {
    pub fund_name: String,
    pub page: usize,
    /// Block sits in the proposed-funds scorecard rather than the plan lineup.
    pub proposed: bool,
    pub metrics: Vec<ScorecardMetric>,
}

impl ScorecardBlock {
    pub fn status_of(&self, label: &str) -> Option<MetricStatus> {
        self.metrics
            .iter()
            .find(|metric| metric.label == label)
            .map(|metric| metric.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Primary,
    Secondary,
    Tertiary,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerAssignment {
    pub fund_name: String,
    pub ticker: String,
    pub score: u8,
    pub pass: MatchPass,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FactsheetRow {
    pub page: usize,
    pub parsed_name: String,
    pub parsed_ticker: String,
    pub matched_name: String,
    pub matched_ticker: String,
    pub benchmark: String,
    pub category: String,
    pub net_assets: String,
    pub manager: String,
    pub avg_market_cap: String,
    pub expense_ratio: String,
    pub match_score: u8,
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerformanceRow {
    pub fund_name: String,
    pub ticker: String,
    #[serde(rename = "QTD")]
    pub qtd: Option<String>,
    #[serde(rename = "1Yr")]
    pub one_yr: Option<String>,
    #[serde(rename = "3Yr")]
    pub three_yr: Option<String>,
    #[serde(rename = "5Yr")]
    pub five_yr: Option<String>,
    #[serde(rename = "10Yr")]
    pub ten_yr: Option<String>,
    #[serde(rename = "NetExpenseRatio")]
    pub net_expense_ratio: Option<String>,
    #[serde(rename = "BenchQTD")]
    pub bench_qtd: Option<String>,
    #[serde(rename = "Bench1Yr")]
    pub bench_one_yr: Option<String>,
    #[serde(rename = "Bench3Yr")]
    pub bench_three_yr: Option<String>,
    #[serde(rename = "Bench5Yr")]
    pub bench_five_yr: Option<String>,
    #[serde(rename = "Bench10Yr")]
    pub bench_ten_yr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearValue {
    pub year: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarYearRow {
    pub name: String,
    pub ticker: String,
    pub values: Vec<YearValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MptPeriod {
    #[serde(rename = "3Yr")]
    ThreeYear,
    #[serde(rename = "5Yr")]
    FiveYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MptStat {
    pub fund: String,
    pub ticker: String,
    pub period: MptPeriod,
    pub alpha: Option<String>,
    pub beta: Option<String>,
    pub upside_capture: Option<String>,
    pub downside_capture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodValues<T> {
    #[serde(rename = "1Yr")]
    pub one_yr: Option<T>,
    #[serde(rename = "3Yr")]
    pub three_yr: Option<T>,
    #[serde(rename = "5Yr")]
    pub five_yr: Option<T>,
    #[serde(rename = "10Yr")]
    pub ten_yr: Option<T>,
}

impl<T> Default for PeriodValues<T> {
    fn default() -> Self {
        Self {
            one_yr: None,
            three_yr: None,
            five_yr: None,
            ten_yr: None,
        }
    }
}

impl<T> PeriodValues<T> {
    pub fn from_slots(slots: Vec<Option<T>>) -> Self {
        let mut iter = slots.into_iter();
        Self {
            one_yr: iter.next().flatten(),
            three_yr: iter.next().flatten(),
            five_yr: iter.next().flatten(),
            ten_yr: iter.next().flatten(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.one_yr.is_none()
            && self.three_yr.is_none()
            && self.five_yr.is_none()
            && self.ten_yr.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAdjustedRow {
    pub fund: String,
    pub ticker: String,
    pub sharpe: PeriodValues<String>,
    pub info: PeriodValues<String>,
    pub sortino: PeriodValues<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRankRow {
    pub fund: String,
    pub ticker: String,
    pub sharpe: PeriodValues<u8>,
    pub info: PeriodValues<u8>,
    pub sortino: PeriodValues<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FundFacts {
    pub fund: String,
    pub ticker: String,
    pub manager_tenure_yrs: Option<String>,
    pub expense_ratio: Option<String>,
    pub expense_ratio_rank: Option<String>,
    pub total_number_of_holdings: Option<String>,
    pub turnover_ratio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundType {
    Active,
    Passive,
}

impl FundType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Passive => "Passive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CriterionStatus {
    Pass,
    Review,
    Fail,
    #[serde(rename = "Pass-by-default")]
    PassByDefault,
}

impl CriterionStatus {
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass | Self::PassByDefault)
    }

    pub fn raw(self) -> &'static str {
        match self {
            Self::Pass | Self::PassByDefault => "Pass",
            Self::Review => "Review",
            Self::Fail => "Fail",
        }
    }
}

impl From<MetricStatus> for CriterionStatus {
    fn from(status: MetricStatus) -> Self {
        match status {
            MetricStatus::Pass => Self::Pass,
            MetricStatus::Review => Self::Review,
            MetricStatus::Fail => Self::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WatchTier {
    NW,
    IW,
    FW,
}

impl WatchTier {
    pub fn from_non_pass_count(count: usize) -> Self {
        match count {
            6.. => Self::FW,
            5 => Self::IW,
            _ => Self::NW,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NW => "NW",
            Self::IW => "IW",
            Self::FW => "FW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NW => "No Watch",
            Self::IW => "Informal Watch",
            Self::FW => "Formal Watch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpsResult {
    pub fund_name: String,
    pub ticker: String,
    pub fund_type: FundType,
    pub criteria: Vec<CriterionStatus>,
    pub tier: WatchTier,
}

impl IpsResult {
    pub fn non_pass_count(&self) -> usize {
        self.criteria
            .iter()
            .filter(|status| !status.is_pass())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedFund {
    pub fund_name: String,
    pub ticker: String,
    pub source_page: usize,
    pub match_score: u8,
    pub overview_paragraph: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingAnchor,
    ParseGap,
    AlignmentFailure,
    TemplateMismatch,
    ExternalCapabilityUnavailable,
    CountMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunWarning {
    pub kind: WarningKind,
    pub component: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRow {
    #[serde(rename = "Fund Name")]
    pub fund_name: String,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Fund Type")]
    pub fund_type: String,
    pub criteria: Vec<String>,
    pub criteria_raw: Vec<String>,
    #[serde(rename = "IPS Watch Status")]
    pub watch_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
    pub pdftohtml: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunCounts {
    pub page_count: usize,
    pub scorecard_blocks: usize,
    pub tickers_resolved: usize,
    pub factsheet_pages: usize,
    pub performance_rows: usize,
    pub calendar_year_rows: usize,
    pub mpt_rows: usize,
    pub proposed_funds: usize,
    pub funds_parsed: usize,
    pub total_options: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub command: String,
    pub source_path: String,
    pub source_sha256: String,
    pub tool_versions: ToolVersions,
    pub counts: RunCounts,
    pub warnings: Vec<RunWarning>,
}
