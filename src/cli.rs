use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::report::bullets::DEFAULT_PERFORMANCE_TEMPLATE;

#[derive(Parser, Debug)]
#[command(
    name = "fundscreen",
    version,
    about = "IPS screening and fund write-up extraction from quarterly investment reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inspect(InspectArgs),
    Screen(ScreenArgs),
    Writeup(WriteupArgs),
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    #[arg(long)]
    pub text_dump: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TuningArgs {
    #[arg(long, default_value_t = 70)]
    pub ticker_threshold: u8,

    #[arg(long, default_value_t = 78)]
    pub proposed_threshold: u8,

    #[arg(long, default_value_t = 20)]
    pub factsheet_threshold: u8,

    #[arg(long, default_value_t = 60)]
    pub row_anchor_threshold: u8,

    #[arg(long, default_value_t = 100.0)]
    pub header_band: f64,

    #[arg(long, default_value = "Plan Advisor")]
    pub prepared_by_default: String,

    #[arg(long, default_value = "mpi stylus")]
    pub vendor_watermark: String,

    #[arg(long, default_value = DEFAULT_PERFORMANCE_TEMPLATE)]
    pub performance_template: String,

    #[arg(long = "fund-type")]
    pub fund_types: Vec<String>,

    #[arg(long)]
    pub fund_type_hints: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScreenArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[arg(long, default_value = ".cache/fundscreen")]
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct WriteupArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[arg(long)]
    pub fund: String,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long)]
    pub template_manifest: Option<PathBuf>,
}
