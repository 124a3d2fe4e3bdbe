use crate::report::metadata::MetadataSettings;
use crate::report::pdf::ReportPages;
use crate::report::pipeline::PipelineSettings;

pub const ALPHA: &str = "Alpha Growth Fund";
pub const VANGUARD: &str = "Vanguard 500 Index";
pub const BEACON: &str = "Beacon Large Cap Growth";

fn page(lines: &[&str]) -> String {
    lines.join("\n")
}

fn cover() -> String {
    page(&[
        "Retirement Plan Investment Review",
        "For the period ending 6/30/2024",
        "Total Options: 2",
        "Prepared For:",
        "",
        "Acme Manufacturing 401(k) Plan",
        "Prepared By: MPI Stylus",
    ])
}

fn contents() -> String {
    page(&[
        "Table of Contents",
        "Fund Scorecard 3",
        "Fund Scorecard: Proposed Funds 4",
        "Fund Performance: Current vs. Proposed Comparison 5",
        "Fund Performance: Calendar Year 6",
        "Risk Analysis: MPT Statistics (3Yr) 7",
        "Risk Analysis: MPT Statistics (5Yr) 8",
        "Fund Factsheets 9",
    ])
}

fn scorecard() -> String {
    page(&[
        "Fund Scorecard",
        "Alpha Growth Fund Fund has been placed on watchlist for not meeting 7 out of 14 criteria",
        "Manager Tenure Pass 8.5 years",
        "Excess Performance (3Yr) Fail -1.20",
        "Excess Performance (5Yr) Fail -0.85",
        "Peer Return Rank (3Yr) Review 62",
        "Peer Return Rank (5Yr) Fail 78",
        "Expense Ratio Rank Pass 21",
        "Sharpe Ratio Rank (3Yr) Fail 70",
        "Sharpe Ratio Rank (5Yr) Review 58",
        "R-Squared (3Yr) Pass 91.20",
        "R-Squared (5Yr) Pass 92.40",
        "Sortino Ratio Rank (3Yr) Fail 72",
        "Sortino Ratio Rank (5Yr) Pass 45",
        "Tracking Error Rank (3Yr) Pass 30",
        "Tracking Error Rank (5Yr) Pass 28",
        "Vanguard 500 Index Fund Meets Watchlist Criteria",
        "Manager Tenure Pass 10.2 years",
        "Excess Performance (3Yr) Pass -0.02",
        "Excess Performance (5Yr) Pass -0.03",
        "Peer Return Rank (3Yr) Pass 20",
        "Peer Return Rank (5Yr) Pass 18",
        "Expense Ratio Rank Pass 2",
        "Sharpe Ratio Rank (3Yr) Pass 22",
        "Sharpe Ratio Rank (5Yr) Pass 19",
        "R-Squared (3Yr) Pass 100.00",
        "R-Squared (5Yr) Pass 100.00",
        "Sortino Ratio Rank (3Yr) Pass 25",
        "Sortino Ratio Rank (5Yr) Pass 21",
        "Tracking Error Rank (3Yr) Review 80",
        "Tracking Error Rank (5Yr) Review 82",
    ])
}

fn proposed_scorecard() -> String {
    page(&[
        "Fund Scorecard: Proposed Funds",
        "Beacon Large Cap Growth Fund Meets Watchlist Criteria",
        "Manager Tenure Pass 12.0 years",
        "Excess Performance (3Yr) Pass 1.10",
        "Excess Performance (5Yr) Pass 0.95",
        "Peer Return Rank (3Yr) Pass 15",
        "Peer Return Rank (5Yr) Pass 12",
        "Expense Ratio Rank Pass 30",
        "Sharpe Ratio Rank (3Yr) Pass 18",
        "Sharpe Ratio Rank (5Yr) Pass 16",
        "R-Squared (3Yr) Pass 88.10",
        "R-Squared (5Yr) Pass 89.00",
        "Sortino Ratio Rank (3Yr) Pass 14",
        "Sortino Ratio Rank (5Yr) Pass 13",
        "Tracking Error Rank (3Yr) Pass 40",
        "Tracking Error Rank (5Yr) Pass 42",
    ])
}

fn performance() -> String {
    page(&[
        "Fund Performance: Current vs. Proposed Comparison",
        "QTD YTD 1Yr 3Yr 5Yr 10Yr Inception Net Expense Ratio",
        "2.10 6.00 12.00 8.00 10.00 10.50 9.10 0.04",
        "Alpha Growth Fund AGFIX",
        "1.50 4.00 11.00 9.00 10.00 11.00",
        "Russell 1000 Growth TR USD",
        "3.90 14.10 24.50 10.00 14.90 12.70 13.10 0.04",
        "Vanguard 500 Index Adm VFIAX",
        "3.92 14.15 24.56 10.01 15.05 12.86",
        "S&P 500 TR USD",
        "5.10 16.00 30.20 12.40 16.80 15.10 14.00 0.65",
        "Beacon Large Cap Growth BLCGX",
        "1.50 4.00 11.00 9.00 10.00 11.00",
        "Russell 1000 Growth TR USD",
    ])
}

fn calendar_year() -> String {
    page(&[
        "Fund Performance: Calendar Year",
        "Investment Manager Ticker 2023 2022 2021 2020 2019",
        "26.10 -18.40 22.00 30.10 28.50",
        "Alpha Growth Fund AGFIX",
        "Russell 1000 Growth TR USD 42.70 -29.10 27.60 38.50 36.40",
        "26.11 -18.19 28.66 18.37 31.46",
        "Vanguard 500 Index Adm VFIAX",
        "S&P 500 TR USD 26.29 -18.11 28.71 18.40 31.49",
    ])
}

fn mpt_three_year() -> String {
    page(&[
        "Risk Analysis: MPT Statistics (3Yr)",
        "Investment Manager Ticker Alpha Beta Upside Downside",
        "Alpha Growth Fund AGFIX -1.25 1.08 98.50 110.20",
        "Vanguard 500 Index Adm VFIAX -0.04 1.00 99.90 100.10",
        "Beacon Large Cap Growth BLCGX 1.10",
        "0.95 101.00 92.00",
    ])
}

fn mpt_five_year() -> String {
    page(&[
        "Risk Analysis: MPT Statistics (5Yr)",
        "Investment Manager Ticker Alpha Beta Upside Downside",
        "Alpha Growth Fund AGFIX -0.80 1.05",
        "97.00 108.00",
        "Vanguard 500 Index Adm VFIAX -0.03 1.00 99.95 100.05",
        "Beacon Large Cap Growth BLCGX 1.45 0.97 102.30 90.10",
    ])
}

#[allow(clippy::too_many_arguments)]
fn factsheet(
    title: &str,
    benchmark: &str,
    category: &str,
    expense_ratio: &str,
    overview: &str,
    ratios: [&str; 3],
    ranks: [&str; 3],
    facts: [&str; 5],
) -> String {
    let mut lines = vec![
        title.to_string(),
        format!("Benchmark: {benchmark}"),
        format!("Category: {category}"),
        "Net Assets: $12,345.67M".to_string(),
        "Manager Name: Jane Smith".to_string(),
        "Avg. Market Cap: $410,000.00M".to_string(),
        format!("Expense Ratio: {expense_ratio}%"),
        String::new(),
        String::new(),
        "INVESTMENT OVERVIEW".to_string(),
        overview.to_string(),
        String::new(),
        "RISK-ADJUSTED RETURNS".to_string(),
        "1 Yr 3 Yr 5 Yr 10 Yr".to_string(),
    ];
    lines.push(format!("Sharpe Ratio {}", ratios[0]));
    lines.push(format!("Information Ratio {}", ratios[1]));
    lines.push(format!("Sortino Ratio {}", ratios[2]));
    lines.push("1 Yr 3 Yr 5 Yr 10 Yr".to_string());
    lines.push(format!("Sharpe Ratio {}", ranks[0]));
    lines.push(format!("Information Ratio {}", ranks[1]));
    lines.push(format!("Sortino Ratio {}", ranks[2]));
    lines.push("FUND FACTS".to_string());
    lines.push(format!("Manager Tenure Yrs. {}", facts[0]));
    lines.push(format!("Expense Ratio {}%", facts[1]));
    lines.push(format!("Expense Ratio Rank {}", facts[2]));
    lines.push(format!("Total Number of Holdings {}", facts[3]));
    lines.push(format!("Turnover Ratio {}%", facts[4]));
    lines.join("\n")
}

pub fn report_pages() -> Vec<String> {
    vec![
        cover(),
        contents(),
        scorecard(),
        proposed_scorecard(),
        performance(),
        calendar_year(),
        mpt_three_year(),
        mpt_five_year(),
        factsheet(
            "Alpha Growth Fund AGFIX",
            "Russell 1000 Growth TR USD",
            "Large Growth",
            "0.85",
            "The fund seeks long-term capital appreciation. It invests mainly in U.S. large-cap growth companies. The managers favor durable earnings growth. Turnover is expected to stay moderate.",
            ["1.10 0.45 0.70 0.80", "-0.20 -0.90 -0.30 -0.10", "1.90 0.60 1.00 1.20"],
            ["40 72 55 48", "60 85 70 65", "38 75 52 44"],
            ["8.50", "0.85", "21", "48", "35.00"],
        ),
        factsheet(
            "Vanguard 500 Index Adm VFIAX",
            "S&P 500 TR USD",
            "Large Blend",
            "0.04",
            "The fund tracks the S&P 500 index. It holds every constituent at index weight.",
            ["1.80 0.55 0.90 0.85", "-0.90 -1.10 -1.00 -0.95", "2.90 0.80 1.30 1.25"],
            ["20 22 19 18", "45 50 48 47", "21 25 21 20"],
            ["10.20", "0.04", "2", "504", "2.00"],
        ),
        factsheet(
            "Beacon Large Cap Growth BLCGX",
            "Russell 1000 Growth TR USD",
            "Large Growth",
            "0.65",
            "The fund targets companies with sustainable competitive advantages. It runs a concentrated portfolio of U.S. leaders. Risk is managed through position limits. The team has worked together since 2009.",
            ["1.60 0.75 0.95 0.90", "0.40 0.35 0.30 0.25", "2.40 1.10 1.40 1.30"],
            ["15 18 16 14", "20 24 22 21", "12 14 13 12"],
            ["12.00", "0.65", "30", "35", "18.00"],
        ),
    ]
}

pub fn sample_pages() -> ReportPages {
    ReportPages::from_text_pages(report_pages())
}

pub fn settings() -> PipelineSettings {
    PipelineSettings {
        ticker_threshold: 70,
        proposed_threshold: 78,
        factsheet_threshold: 20,
        row_anchor_threshold: 60,
        header_band: 100.0,
        metadata: MetadataSettings {
            prepared_by_default: "Plan Advisor".to_string(),
            vendor_watermark: "mpi stylus".to_string(),
        },
    }
}
