use tracing::info;

use crate::model::{MptPeriod, MptStat, TickerAssignment, WarningKind};
use crate::report::diagnostics::Diagnostics;
use crate::report::pdf::PageLine;
use crate::report::text::{contains_token, decimal_tokens};

const COMPONENT: &str = "numeric_series";

pub const MPT_SLOT_COUNT: usize = 4;
/// Lines read after the ticker line. The 5Yr table wraps visually, the 3Yr
/// table does not.
const FIVE_YEAR_CONTINUATION_LINES: usize = 2;

pub const FIVE_YEAR_HEADING: &str = "Risk Analysis: MPT Statistics (5Yr)";

pub fn extract_mpt(
    lines: &[PageLine<'_>],
    funds: &[TickerAssignment],
    period: MptPeriod,
    diagnostics: &mut Diagnostics,
) -> Vec<MptStat> {
    let continuation = match period {
        MptPeriod::ThreeYear => 0,
        MptPeriod::FiveYear => FIVE_YEAR_CONTINUATION_LINES,
    };

    let mut rows = Vec::new();
    for fund in funds.iter().filter(|fund| !fund.ticker.is_empty()) {
        let Some(anchor) = lines
            .iter()
            .position(|line| contains_token(line.text, &fund.ticker))
        else {
            diagnostics.warn(
                WarningKind::ParseGap,
                COMPONENT,
                format!("no {period:?} MPT line for {}", fund.fund_name),
            );
            continue;
        };

        let mut values = lines[anchor..]
            .iter()
            .take(continuation + 1)
            .flat_map(|line| decimal_tokens(line.text))
            .take(MPT_SLOT_COUNT)
            .map(Some)
            .collect::<Vec<Option<String>>>();
        values.resize(MPT_SLOT_COUNT, None);
        let mut values = values.into_iter();

        rows.push(MptStat {
            fund: fund.fund_name.clone(),
            ticker: fund.ticker.clone(),
            period,
            alpha: values.next().flatten(),
            beta: values.next().flatten(),
            upside_capture: values.next().flatten(),
            downside_capture: values.next().flatten(),
        });
    }

    info!(period = ?period, rows = rows.len(), "extracted MPT statistics");
    rows
}
