use crate::model::{ReportDate, WatchTier};
use crate::report::aggregate::{FundView, display_name};

pub const DEFAULT_PERFORMANCE_TEMPLATE: &str = "[Fund Scorecard Name] [Perf Direction] its benchmark in Q[Quarter], [Year] by [QTD_bps_diff] bps ([QTD_vs]).";

const TOP_HALF_MAX_RANK: u8 = 50;

pub fn bps_diff(fund: &str, benchmark: &str) -> Option<f64> {
    let fund = fund.parse::<f64>().ok()?;
    let benchmark = benchmark.parse::<f64>().ok()?;
    Some(((fund - benchmark) * 100.0 * 10.0).round() / 10.0)
}

pub fn performance_bullet(view: &FundView<'_>, report_date: Option<&ReportDate>, template: &str) -> Option<String> {
    let row = view.performance?;
    let qtd = row.qtd.as_deref()?;
    let bench_qtd = row.bench_qtd.as_deref()?;
    let diff = bps_diff(qtd, bench_qtd)?;
    let direction = if qtd.parse::<f64>().ok()? >= bench_qtd.parse::<f64>().ok()? {
        "overperformed"
    } else {
        "underperformed"
    };

    let quarter = report_date.map(|date| date.quarter().to_string()).unwrap_or_default();
    let year = report_date.map(|date| date.year().to_string()).unwrap_or_default();

    Some(
        template
            .replace("[Fund Scorecard Name]", &view.fund_name)
            .replace("[Perf Direction]", direction)
            .replace("[Quarter]", &quarter)
            .replace("[Year]", &year)
            .replace("[QTD_bps_diff]", &format!("{diff:.1}"))
            .replace("[QTD_vs]", &format!("{qtd}% vs. {bench_qtd}%")),
    )
}

pub fn watch_bullet(view: &FundView<'_>) -> Option<String> {
    let ips = view.ips?;
    if ips.tier == WatchTier::NW {
        return Some(format!("{} is not on watch.", view.fund_name));
    }

    let mut clauses = Vec::new();
    if let Some(row) = view.performance {
        let three = row
            .three_yr
            .as_deref()
            .zip(row.bench_three_yr.as_deref())
            .and_then(|(fund, bench)| bps_diff(fund, bench));
        let five = row
            .five_yr
            .as_deref()
            .zip(row.bench_five_yr.as_deref())
            .and_then(|(fund, bench)| bps_diff(fund, bench));
        match (three, five) {
            (Some(three), Some(five)) => clauses.push(format!(
                "trailing returns versus the benchmark are {three:.1} bps (3Yr) and {five:.1} bps (5Yr)"
            )),
            (Some(three), None) => clauses.push(format!(
                "trailing 3Yr return versus the benchmark is {three:.1} bps"
            )),
            (None, Some(five)) => clauses.push(format!(
                "trailing 5Yr return versus the benchmark is {five:.1} bps"
            )),
            (None, None) => {}
        }
    }
    if let Some(rank) = view.peer_ranks.and_then(|ranks| ranks.sharpe.three_yr) {
        let half = if rank <= TOP_HALF_MAX_RANK { "top" } else { "bottom" };
        clauses.push(format!("its 3Yr Sharpe ratio ranks in the {half} half of peers"));
    }

    let mut bullet = format!("{} is on {}", view.fund_name, ips.tier.label());
    if !clauses.is_empty() {
        bullet.push_str("; ");
        bullet.push_str(&clauses.join(", and "));
    }
    bullet.push('.');
    Some(bullet)
}

pub fn replacement_bullet(view: &FundView<'_>) -> Option<String> {
    let ips = view.ips?;
    if ips.tier != WatchTier::FW || view.proposed.is_empty() {
        return None;
    }
    let names = view
        .proposed
        .iter()
        .map(|fund| display_name(&fund.fund_name, &fund.ticker))
        .collect::<Vec<String>>();
    Some(format!(
        "Recommend replacing {} with a proposed fund: {}.",
        view.fund_name,
        names.join(", ")
    ))
}

pub fn generate_bullets(view: &FundView<'_>, report_date: Option<&ReportDate>, template: &str) -> Vec<String> {
    [
        performance_bullet(view, report_date, template),
        watch_bullet(view),
        view.overview.clone(),
        replacement_bullet(view),
    ]
    .into_iter()
    .flatten()
    .collect()
}
