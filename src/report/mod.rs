pub mod aggregate;
pub mod bullets;
pub mod diagnostics;
pub mod factsheet;
pub mod factsheet_tables;
pub mod fuzzy;
pub mod ips;
pub mod metadata;
pub mod mpt;
pub mod pdf;
pub mod performance;
pub mod pipeline;
pub mod proposed;
pub mod scorecard;
pub mod text;
pub mod tickers;
pub mod toc;
pub mod writeup;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests_numeric;
