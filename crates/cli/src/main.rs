use clap::Parser;
use tracing_subscriber::EnvFilter;

use sl_cli::cli::{self, Cli, Command, ConfigCommand};
use sl_domain::config::LoggingConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = cli::load_config()?;
    init_tracing(&config.logging);

    match cli.command {
        Command::Holidays { year, no_observed, json } => {
            cli::holidays::holidays(year, no_observed, json)
        }
        Command::Generate { schedule, year, options } => {
            cli::holidays::generate(&config, schedule, year, &options)
        }
        Command::Schedule(cmd) => cli::schedule::schedule(&config, cmd),
        Command::Weekly(cmd) => cli::schedule::weekly(&config, cmd),
        Command::Override(cmd) => cli::schedule::overrides(&config, cmd),
        Command::Hours { schedule, date, range } => {
            cli::schedule::hours(&config, schedule, date, &range)
        }
        Command::Location(cmd) => cli::location::location(&config, cmd),
        Command::Config(ConfigCommand::Validate) => {
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => cli::config::show(&config),
    }
}

/// Initialize stderr-only tracing so diagnostic output does not pollute
/// stdout. `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if logging.filter.trim().is_empty() {
            "warn"
        } else {
            logging.filter.as_str()
        };
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
