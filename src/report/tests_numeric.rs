use crate::model::{MatchPass, MptPeriod, PerformanceRow, TickerAssignment, WarningKind};
use crate::report::diagnostics::Diagnostics;
use crate::report::factsheet::{parse_factsheet_header, parse_factsheets, FactsheetSettings};
use crate::report::factsheet_tables::{fund_facts_from_lines, peer_ranks_from_lines, risk_adjusted_from_lines};
use crate::report::fixtures::{ALPHA, BEACON, VANGUARD, sample_pages, settings};
use crate::report::mpt::extract_mpt;
use crate::report::pdf::ReportPages;
use crate::report::performance::{
    detect_year_header, extract_calendar_years, extract_performance, map_fund_slots,
};
use crate::report::pipeline::{FundTypeInputs, run_pipeline};
use crate::report::text::decimal_tokens;

fn assignment(fund_name: &str, ticker: &str) -> TickerAssignment {
    TickerAssignment {
        fund_name: fund_name.to_string(),
        ticker: ticker.to_string(),
        score: 100,
        pass: MatchPass::Primary,
    }
}

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn is_plain_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|character| character.is_ascii_digit())
        && fraction.is_none_or(|fraction| {
            !fraction.is_empty() && fraction.chars().all(|character| character.is_ascii_digit())
        })
}

#[test]
fn decimal_tokens_are_cleaned() {
    assert_eq!(
        decimal_tokens("Fund (1.25) -0.40% 12.00% 2024 7"),
        vec!["1.25", "-0.40", "12.00"]
    );
}

#[test]
fn fund_slots_follow_the_positional_contract() {
    let slots = map_fund_slots(&tokens(&["2.10", "6.00", "12.00", "8.00", "10.00", "10.50", "9.10", "0.04"]));
    assert_eq!(
        slots,
        [
            Some("2.10".to_string()),
            Some("12.00".to_string()),
            Some("8.00".to_string()),
            Some("10.00".to_string()),
            Some("10.50".to_string()),
            Some("0.04".to_string()),
        ]
    );
}

#[test]
fn long_lines_take_the_second_to_last_token_as_expense_ratio() {
    let slots = map_fund_slots(&tokens(&[
        "1.00", "2.00", "3.00", "4.00", "5.00", "6.00", "7.00", "8.00", "0.55", "9.00",
    ]));
    assert_eq!(slots[0].as_deref(), Some("1.00"));
    assert_eq!(slots[5].as_deref(), Some("0.55"));
}

#[test]
fn short_lines_leave_trailing_slots_empty() {
    let slots = map_fund_slots(&tokens(&["1.10", "2.20", "3.30", "4.40"]));
    assert_eq!(slots[0].as_deref(), Some("1.10"));
    assert_eq!(slots[1].as_deref(), Some("3.30"));
    assert_eq!(slots[2].as_deref(), Some("4.40"));
    assert_eq!(slots[3], None);
    assert_eq!(slots[4], None);
    assert_eq!(slots[5], None);
}

#[test]
fn performance_prepends_the_line_two_above_when_short() {
    let pages = ReportPages::from_text_pages([
        "Fund Performance\n2.10 6.00 12.00\n8.00 10.00 10.50 9.10 0.04\nWrapped Fund WRPFX\n1.90 5.00 11.00 7.50 9.00 10.00",
    ]);
    let mut diagnostics = Diagnostics::default();
    let rows = extract_performance(
        &pages.lines_between(1, 2),
        &[assignment("Wrapped Fund", "WRPFX")],
        60,
        &mut diagnostics,
    );

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.qtd.as_deref(), Some("2.10"));
    assert_eq!(row.one_yr.as_deref(), Some("12.00"));
    assert_eq!(row.ten_yr.as_deref(), Some("10.50"));
    assert_eq!(row.net_expense_ratio.as_deref(), Some("0.04"));
    assert_eq!(row.bench_qtd.as_deref(), Some("1.90"));
    assert_eq!(row.bench_one_yr.as_deref(), Some("5.00"));
    assert_eq!(row.bench_three_yr.as_deref(), Some("7.50"));
    assert_eq!(row.bench_ten_yr.as_deref(), Some("10.00"));
    assert_eq!(diagnostics.warnings().len(), 0);
}

#[test]
fn performance_anchor_falls_back_to_fuzzy_name() {
    let pages = ReportPages::from_text_pages([
        "1.00 2.00 3.00 4.00 5.00 6.00 7.00 0.30\nHarbor Capital Appreciation Retirement\n0.90 1.90 2.90 3.90 4.90 5.90",
    ]);
    let mut diagnostics = Diagnostics::default();
    let rows = extract_performance(
        &pages.lines_between(1, 2),
        &[
            assignment("Harbor Capital Appreciation Retirement", ""),
            assignment("Nowhere Fund", ""),
        ],
        60,
        &mut diagnostics,
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].net_expense_ratio.as_deref(), Some("0.30"));
    assert_eq!(diagnostics.count(WarningKind::ParseGap), 1);
}

#[test]
fn sample_performance_rows_are_numeric_or_empty() {
    let context = run_pipeline(sample_pages(), &settings(), &FundTypeInputs::default())
        .expect("pipeline runs");
    assert_eq!(context.performance.len(), 3);

    let alpha = &context.performance[0];
    assert_eq!(
        alpha,
        &PerformanceRow {
            fund_name: ALPHA.to_string(),
            ticker: "AGFIX".to_string(),
            qtd: Some("2.10".to_string()),
            one_yr: Some("12.00".to_string()),
            three_yr: Some("8.00".to_string()),
            five_yr: Some("10.00".to_string()),
            ten_yr: Some("10.50".to_string()),
            net_expense_ratio: Some("0.04".to_string()),
            bench_qtd: Some("1.50".to_string()),
            bench_one_yr: Some("4.00".to_string()),
            bench_three_yr: Some("9.00".to_string()),
            bench_five_yr: Some("10.00".to_string()),
            bench_ten_yr: Some("11.00".to_string()),
        }
    );

    for row in &context.performance {
        let values = [
            &row.qtd,
            &row.one_yr,
            &row.three_yr,
            &row.five_yr,
            &row.ten_yr,
            &row.net_expense_ratio,
            &row.bench_qtd,
            &row.bench_one_yr,
            &row.bench_three_yr,
            &row.bench_five_yr,
            &row.bench_ten_yr,
        ];
        for value in values.into_iter().flatten() {
            assert!(is_plain_number(value), "{value} is not numeric");
        }
    }
}

#[test]
fn calendar_years_align_with_the_header() {
    let context = run_pipeline(sample_pages(), &settings(), &FundTypeInputs::default())
        .expect("pipeline runs");
    assert_eq!(context.calendar_years, vec!["2023", "2022", "2021", "2020", "2019"]);

    for row in context.calendar_funds.iter().chain(&context.calendar_benchmarks) {
        assert_eq!(row.values.len(), context.calendar_years.len());
    }

    let alpha = &context.calendar_funds[0];
    assert_eq!(alpha.ticker, "AGFIX");
    assert_eq!(alpha.values[0].value.as_deref(), Some("26.10"));
    assert_eq!(alpha.values[1].value.as_deref(), Some("-18.40"));

    let benchmarks = context
        .calendar_benchmarks
        .iter()
        .map(|row| row.name.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(benchmarks, vec!["Russell 1000 Growth TR USD", "S&P 500 TR USD"]);
    assert_eq!(context.calendar_benchmarks[1].values[4].value.as_deref(), Some("31.49"));
    assert!(context.calendar_funds.iter().all(|row| row.name != BEACON));
}

#[test]
fn calendar_rows_pad_missing_years() {
    let pages = ReportPages::from_text_pages([
        "Name Ticker 2023 2022 2021\n5.00\nShort Fund SHRTX",
    ]);
    let lines = pages.lines_between(1, 2);
    assert_eq!(detect_year_header(&lines), vec!["2023", "2022", "2021"]);

    let mut diagnostics = Diagnostics::default();
    let tables = extract_calendar_years(&lines, &[assignment("Short Fund", "SHRTX")], &[], 60, &mut diagnostics);
    let values = &tables.funds[0].values;
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].value.as_deref(), Some("5.00"));
    assert_eq!(values[1].value, None);
    assert_eq!(values[2].year, "2021");
}

#[test]
fn mpt_five_year_reads_wrapped_lines_and_three_year_does_not() {
    let pages = ReportPages::from_text_pages(["Wrapped Fund WRPFX 1.10\n0.95 101.00 92.00\nOther Fund OTHRX"]);
    let lines = pages.lines_between(1, 2);
    let funds = [assignment("Wrapped Fund", "WRPFX"), assignment("Missing Fund", "MISSX")];
    let mut diagnostics = Diagnostics::default();

    let three = extract_mpt(&lines, &funds, MptPeriod::ThreeYear, &mut diagnostics);
    assert_eq!(three.len(), 1);
    assert_eq!(three[0].alpha.as_deref(), Some("1.10"));
    assert_eq!(three[0].beta, None);
    assert_eq!(three[0].downside_capture, None);

    let five = extract_mpt(&lines, &funds, MptPeriod::FiveYear, &mut diagnostics);
    assert_eq!(five[0].alpha.as_deref(), Some("1.10"));
    assert_eq!(five[0].beta.as_deref(), Some("0.95"));
    assert_eq!(five[0].upside_capture.as_deref(), Some("101.00"));
    assert_eq!(five[0].downside_capture.as_deref(), Some("92.00"));

    assert_eq!(diagnostics.count(WarningKind::ParseGap), 2);
}

#[test]
fn sample_mpt_sections_stay_within_their_pages() {
    let context = run_pipeline(sample_pages(), &settings(), &FundTypeInputs::default())
        .expect("pipeline runs");

    let beacon_three = context
        .mpt_3yr
        .iter()
        .find(|row| row.fund == BEACON)
        .expect("beacon 3yr row");
    assert_eq!(beacon_three.alpha.as_deref(), Some("1.10"));
    assert_eq!(beacon_three.beta, None);

    let alpha_five = context
        .mpt_5yr
        .iter()
        .find(|row| row.fund == ALPHA)
        .expect("alpha 5yr row");
    assert_eq!(alpha_five.alpha.as_deref(), Some("-0.80"));
    assert_eq!(alpha_five.downside_capture.as_deref(), Some("108.00"));

    let vanguard_three = context
        .mpt_3yr
        .iter()
        .find(|row| row.fund == VANGUARD)
        .expect("vanguard 3yr row");
    assert_eq!(vanguard_three.alpha.as_deref(), Some("-0.04"));
}

#[test]
fn factsheet_header_splits_on_ordered_labels() {
    let header = parse_factsheet_header(
        "Vanguard 500 Index Adm VFIAX Benchmark: S&P 500 TR USD Category: Large Blend Net Assets: $500.00M Manager Name: Index Team Avg. Market Cap: $250.00M Expense Ratio: 0.04% INVESTMENT",
    );
    assert_eq!(header.name, "Vanguard 500 Index Adm");
    assert_eq!(header.ticker, "VFIAX");
    assert_eq!(header.fields[0], "S&P 500 TR USD");
    assert_eq!(header.fields[1], "Large Blend");
    assert_eq!(header.fields[2], "$500.00M");
    assert_eq!(header.fields[3], "Index Team");
    assert_eq!(header.fields[4], "$250.00M");
    assert_eq!(header.fields[5], "0.04%");
}

#[test]
fn share_class_suffix_stays_in_the_factsheet_name() {
    let header = parse_factsheet_header(
        "American Funds Growth Fund of Amer R6 RGAGX Benchmark: Russell 1000 Growth TR USD Category: Large Growth Expense Ratio: 0.30%",
    );
    assert_eq!(header.name, "American Funds Growth Fund of Amer R6");
    assert_eq!(header.ticker, "RGAGX");

    let pages = ReportPages::from_text_pages([
        "American Funds Growth Fund of Amer R6 RGAGX\nBenchmark: Russell 1000 Growth TR USD\nCategory: Large Growth\nExpense Ratio: 0.30%",
    ]);
    let rows = parse_factsheets(
        &pages,
        1,
        &[assignment("American Funds Growth Fund of America", "RGAGX")],
        FactsheetSettings {
            header_band: 100.0,
            match_threshold: 20,
        },
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].parsed_ticker, "RGAGX");
    assert_eq!(rows[0].matched_ticker, "RGAGX");
    assert_eq!(rows[0].match_score, 100);
}

#[test]
fn factsheet_pages_need_both_header_labels() {
    let pages = ReportPages::from_text_pages([
        "Cover page without header labels\nBenchmark: Something",
        "Known Fund KNWFX\nBenchmark: Index\nCategory: Stuff\nExpense Ratio: 0.50%",
    ]);
    let rows = parse_factsheets(
        &pages,
        1,
        &[assignment("Known Fund", "KNWFX")],
        FactsheetSettings {
            header_band: 100.0,
            match_threshold: 20,
        },
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].page, 2);
    assert_eq!(rows[0].match_score, 100);
    assert!(rows[0].matched);
    assert_eq!(rows[0].matched_ticker, "KNWFX");
    assert_eq!(rows[0].expense_ratio, "0.50%");
}

#[test]
fn risk_adjusted_and_peer_ranks_from_factsheet_lines() {
    let lines = [
        "RISK-ADJUSTED RETURNS",
        "1 Yr 3 Yr 5 Yr 10 Yr",
        "Sharpe Ratio 1.10 0.45 0.70 0.80",
        "Information Ratio -0.20 -0.90",
        "Sortino Ratio 1.90 0.60 1.00 1.20",
        "1 Yr 3 Yr 5 Yr 10 Yr",
        "Sharpe Ratio 40 72 55 48",
        "Information Ratio 60 185 70 65",
        "Sortino Ratio 38 75 52 44",
    ];

    let (sharpe, info, sortino) = risk_adjusted_from_lines(&lines).expect("ratios");
    assert_eq!(sharpe.three_yr.as_deref(), Some("0.45"));
    assert_eq!(info.one_yr.as_deref(), Some("-0.20"));
    assert_eq!(info.five_yr, None);
    assert_eq!(sortino.ten_yr.as_deref(), Some("1.20"));

    let (sharpe, info, sortino) = peer_ranks_from_lines(&lines).expect("ranks");
    assert_eq!(sharpe.three_yr, Some(72));
    assert_eq!(info.three_yr, None);
    assert_eq!(info.five_yr, Some(70));
    assert_eq!(sortino.one_yr, Some(38));

    assert!(risk_adjusted_from_lines(&["No heading here"]).is_none());
    assert!(peer_ranks_from_lines(&lines[..5]).is_none());
}

#[test]
fn fund_facts_prefer_longest_labels() {
    let facts = fund_facts_from_lines(&[
        "FUND FACTS",
        "Manager Tenure Yrs. 8.50",
        "Expense Ratio Rank 21",
        "Expense Ratio 0.85%",
        "Total Number of Holdings 48",
        "Turnover Ratio N/A",
    ]);
    assert_eq!(facts.manager_tenure_yrs.as_deref(), Some("8.50"));
    assert_eq!(facts.expense_ratio_rank.as_deref(), Some("21"));
    assert_eq!(facts.expense_ratio.as_deref(), Some("0.85"));
    assert_eq!(facts.total_number_of_holdings.as_deref(), Some("48"));
    assert_eq!(facts.turnover_ratio.as_deref(), Some("N/A"));

    assert_eq!(fund_facts_from_lines(&["nothing"]).expense_ratio, None);
}

#[test]
fn sample_factsheet_tables_cover_every_matched_page() {
    let context = run_pipeline(sample_pages(), &settings(), &FundTypeInputs::default())
        .expect("pipeline runs");
    assert_eq!(context.risk_adjusted.len(), 3);
    assert_eq!(context.peer_ranks.len(), 3);
    assert_eq!(context.fund_facts.len(), 3);

    let vanguard = context
        .fund_facts
        .iter()
        .find(|facts| facts.ticker == "VFIAX")
        .expect("vanguard facts");
    assert_eq!(vanguard.total_number_of_holdings.as_deref(), Some("504"));
    assert_eq!(vanguard.expense_ratio.as_deref(), Some("0.04"));
}
