use anyhow::{Context, Result};
use clap::Parser;
use funnelmap::cli::{Cli, Commands, OutputArgs, RateArgs};
use funnelmap::commands::{
    self, CompareConfig, ForwardConfig, OutputTarget, RateOverrides, ReverseConfig, ScoreConfig,
};
use funnelmap::config::{load_config, load_config_from, FunnelmapConfig};
use funnelmap::formatting::FormattingConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);
    create_formatting_config(cli.plain).apply();

    if let Commands::Init { force } = cli.command {
        return commands::init_config(force);
    }

    let settings = resolve_settings(&cli)?;

    match cli.command {
        Commands::Forward {
            spend,
            cpm,
            ctr,
            avg_deal_size,
            rates,
            output,
        } => commands::run_forward(
            ForwardConfig {
                spend,
                cpm,
                ctr,
                avg_deal_size,
                rates: to_overrides(rates),
                output: to_target(output),
            },
            &settings,
        ),
        Commands::Reverse {
            goal,
            avg_deal_size,
            scale,
            rates,
            output,
        } => commands::run_reverse(
            ReverseConfig {
                revenue_goal: goal,
                avg_deal_size,
                scale,
                rates: to_overrides(rates),
                output: to_target(output),
            },
            &settings,
        ),
        Commands::Compare {
            baseline,
            current,
            output,
        } => commands::run_compare(
            CompareConfig {
                baseline,
                current,
                output: to_target(output),
            },
            &settings,
        ),
        Commands::Score { profile, output } => commands::run_score(
            ScoreConfig {
                profile,
                output: to_target(output),
            },
            &settings,
        ),
        Commands::Rates { output } => commands::run_rates(to_target(output), &settings),
        Commands::Init { .. } => Ok(()),
    }
}

// -v: info, -vv: debug, -vvv: trace; RUST_LOG wins when set
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}

fn resolve_settings(cli: &Cli) -> Result<FunnelmapConfig> {
    match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(load_config()),
    }
}

fn to_overrides(args: RateArgs) -> RateOverrides {
    RateOverrides {
        industry: args.industry,
        visitor_to_lead: args.visitor_to_lead,
        lead_to_mql: args.lead_to_mql,
        mql_to_sql: args.mql_to_sql,
        sql_to_opp: args.sql_to_opp,
        opp_to_close: args.opp_to_close,
    }
}

fn to_target(args: OutputArgs) -> OutputTarget {
    OutputTarget {
        format: args.format,
        path: args.output,
    }
}
