use crate::funnel::{CompanyScale, Industry};
use crate::io::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "funnelmap")]
#[command(about = "Marketing funnel calculator and behavioral lead scorer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (skips .funnelmap.toml discovery)
    #[arg(long, global = true, env = "FUNNELMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plain output: no colors
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format (defaults to [output] default_format, then terminal)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Conversion-rate inputs; explicit rates override the industry benchmark.
#[derive(Args, Debug, Clone, Default)]
pub struct RateArgs {
    /// Seed rates from an industry benchmark
    #[arg(long, value_enum)]
    pub industry: Option<Industry>,

    /// Visitor (click) to lead rate, 0-1
    #[arg(long, visible_alias = "click-to-lead")]
    pub visitor_to_lead: Option<f64>,

    /// Lead to MQL rate, 0-1
    #[arg(long)]
    pub lead_to_mql: Option<f64>,

    /// MQL to SQL rate, 0-1
    #[arg(long)]
    pub mql_to_sql: Option<f64>,

    /// SQL to opportunity rate, 0-1
    #[arg(long)]
    pub sql_to_opp: Option<f64>,

    /// Opportunity to closed-won rate, 0-1
    #[arg(long)]
    pub opp_to_close: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project a funnel forward from ad spend
    Forward {
        /// Ad spend
        #[arg(long)]
        spend: f64,

        /// Cost per thousand impressions
        #[arg(long)]
        cpm: Option<f64>,

        /// Click-through rate, 0-1
        #[arg(long)]
        ctr: Option<f64>,

        /// Average deal size
        #[arg(long)]
        avg_deal_size: Option<f64>,

        #[command(flatten)]
        rates: RateArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Work backward from a revenue goal to required volumes and budget
    Reverse {
        /// Revenue goal
        #[arg(long)]
        goal: f64,

        /// Average deal size
        #[arg(long)]
        avg_deal_size: Option<f64>,

        /// Company scale used to price the required budget
        #[arg(long, value_enum)]
        scale: Option<CompanyScale>,

        #[command(flatten)]
        rates: RateArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare two scenario files and explain what moved closed-won
    Compare {
        /// Baseline scenario (TOML)
        #[arg(long)]
        baseline: PathBuf,

        /// Current scenario (TOML)
        #[arg(long)]
        current: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Score a lead profile
    Score {
        /// Profile file (JSON)
        profile: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the industry benchmark and CAC tables
    Rates {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
