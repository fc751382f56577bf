use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::warn;
use time_span::OutputFormat;
use time_span::app::{Step, TimeField};
use time_span::clipboard::SystemClipboard;
use time_span::commands::session::{self, CopyTarget, Field, Session};
use time_span::commands::{self, calc};
use time_span::state::FileStore;
use time_span::{config, platform};

#[derive(Parser)]
#[command(name = "tspan")]
#[command(about = "Minutes between two 12-hour clock times, and clock time after N minutes")]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize loosely typed time input (e.g. 930, 9:3, 7p)
    Parse {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Format a field as it would look after a keystroke
    Format {
        #[arg(allow_hyphen_values = true)]
        input: String,
        #[arg(long, help = "Caret offset before the keystroke (defaults to end)")]
        caret: Option<usize>,
    },
    /// Minutes from START to END, wrapping past midnight
    Diff { start: String, end: String },
    /// Clock time MINUTES after START
    Add {
        start: String,
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Convert between 12-hour and 24-hour notation
    Convert { time: String },
    /// Strictly validate an HH:MM AM/PM string
    Check { time: String },

    /// Show the saved calculator
    Show,
    /// Set the start time (omit or pass "now" for the current time)
    Start { time: Option<String> },
    /// Set the end time (omit or pass "now" for the current time)
    End { time: Option<String> },
    /// Step a field up by one
    Up {
        #[arg(value_enum)]
        field: Field,
    },
    /// Step a field down by one
    Down {
        #[arg(value_enum)]
        field: Field,
    },
    /// Set the number of minutes to add to the start time
    Minutes {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Set the end time to start + minutes
    Apply,
    /// Copy a result to the clipboard
    Copy {
        #[arg(value_enum)]
        target: CopyTarget,
    },
    /// Forget the saved start and end times
    Reset,

    /// Configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let format = cli.format;

    let config = config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {:#}", e);
        config::Config::default()
    });
    let zone = config.zone.reference_zone()?;

    let open_session = || -> Result<Session<FileStore>> {
        let store = platform::state_store(config.state.state_dir_override.as_deref())?;
        Ok(Session::new(store, zone, config.defaults.clone(), Utc::now()))
    };

    match &cli.command {
        Commands::Parse { input } => calc::parse(input, format)?,
        Commands::Format { input, caret } => calc::format(input, *caret, format)?,
        Commands::Diff { start, end } => calc::diff(start, end, format)?,
        Commands::Add { start, minutes } => calc::add(start, minutes, &zone, format)?,
        Commands::Convert { time } => calc::convert(time, format)?,
        Commands::Check { time } => calc::check(time, format)?,

        Commands::Show => session::render(&open_session()?.show(), format)?,
        Commands::Start { time } => {
            let view = open_session()?.set_time(TimeField::Start, time.as_deref());
            session::render(&view, format)?;
        }
        Commands::End { time } => {
            let view = open_session()?.set_time(TimeField::End, time.as_deref());
            session::render(&view, format)?;
        }
        Commands::Up { field } => {
            session::render(&open_session()?.step(*field, Step::Up), format)?
        }
        Commands::Down { field } => {
            session::render(&open_session()?.step(*field, Step::Down), format)?
        }
        Commands::Minutes { value } => {
            session::render(&open_session()?.set_add_minutes(value), format)?
        }
        Commands::Apply => session::render(&open_session()?.apply(), format)?,
        Commands::Copy { target } => {
            let view = open_session()?.show();
            session::copy(&view, *target, &SystemClipboard, format)?;
        }
        Commands::Reset => {
            open_session()?.reset();
            println!("✓ Cleared saved times");
        }

        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
            ConfigAction::Set { key, value } => {
                commands::config::set(key, value, &platform::config_path()?)?
            }
        },
    }

    Ok(())
}
