mod cli;
mod ui;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use photometer::{Config, UsageLog};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::app::{App, Commands};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "photometer=debug,photometer_fetch=debug,photometer_store=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = App::parse();
    init_tracing(app.verbose);

    let config = Config::load_or_default(app.config.as_deref())?;
    record_launch(&config);

    match app.cmd {
        Commands::Measure(arg) => arg.run(&config),
        Commands::History(arg) => arg.run(&config),
    }
}

fn record_launch(config: &Config) {
    let launches = cli::open_store(config)
        .and_then(|store| Ok(UsageLog::new(store).record_launch(Utc::now())?));
    match launches {
        Ok(count) => debug!(count, "launch recorded"),
        Err(err) => warn!(error = %err, "failed to record launch"),
    }
}
