mod commands;
mod config;
mod render;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Overrides, Settings, parse_business_hours};

/// Environment variable read for `tracing` filter directives.
const LOG_ENV: &str = "RESCHEDULE_LOG";

#[derive(Parser)]
#[command(name = "reschedule")]
#[command(about = "Move a Google Calendar event to a new time, checked against notice and business-hour rules")]
struct Cli {
    /// Calendar ID to browse (overrides GCAL_CAL_ID and the config file)
    #[arg(short, long, global = true)]
    calendar: Option<String>,

    /// Time zone label sent with the new start/end (overrides GCAL_TZ)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Minimum notice in hours before the new start
    #[arg(long, global = true)]
    min_notice: Option<f64>,

    /// Allowed start hours as START-END, e.g. 9-17
    #[arg(long, global = true, value_parser = parse_business_hours)]
    business_hours: Option<(u32, u32)>,

    /// Refuse to reschedule into a window that already has an event
    #[arg(long, global = true)]
    block_on_conflict: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with Google and store tokens
    Auth,
    /// List upcoming events
    Events {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Pick an event and move it (the default)
    Move {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        args: commands::reschedule::MoveArgs,
    },
}

#[derive(Args, Default)]
struct RangeArgs {
    /// Only events matching this text
    #[arg(short, long)]
    filter: Option<String>,

    /// How many days ahead to look (1-60)
    #[arg(short, long)]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Move {
        range: RangeArgs::default(),
        args: commands::reschedule::MoveArgs::default(),
    });

    let days_ahead = match &command {
        Commands::Events { range } | Commands::Move { range, .. } => range.days,
        Commands::Auth => None,
    };

    let settings = Settings::load()?.apply(Overrides {
        calendar_id: cli.calendar,
        time_zone: cli.tz,
        days_ahead,
        min_notice_hours: cli.min_notice,
        business_hours: cli.business_hours,
        block_on_conflict: cli.block_on_conflict,
    });

    match command {
        Commands::Auth => commands::auth::run(&settings).await,
        Commands::Events { range } => commands::events::run(&settings, range.filter).await,
        Commands::Move { range, args } => {
            commands::reschedule::run(&settings, range.filter, args).await
        }
    }
}

/// Log to stderr so prompts on stdout stay readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
