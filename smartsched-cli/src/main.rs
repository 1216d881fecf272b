use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod schedule_cmd;
mod setup;
mod state;
mod task_cmd;
mod user_cmd;

use schedule_cmd::ScheduleArgs;
use state::Paths;
use task_cmd::TaskCommand;
use user_cmd::UserCommand;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SMARTSCHED_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "smartsched",
    version,
    long_version = LONG_VERSION,
    about = "Plan a user's tasks with assignment, budgeted selection or optimal ordering"
)]
struct Cli {
    /// Data directory (default: $SMARTSCHED_HOME or ~/.smartsched)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: create a user and write the default config
    Setup,

    /// Manage users, hobbies and free time
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Run a solver over a user's tasks
    Schedule(ScheduleArgs),

    /// Inspect or create config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = Paths::resolve(cli.home)?;
    let cfg = config::load_config(&paths)?;
    init_logging(cli.verbose, &cfg.logging.filter);
    tracing::debug!(home = %paths.home().display(), "resolved data directory");

    match cli.command {
        Command::Setup => {
            setup::run_setup(&paths)?;
        }

        Command::User { command } => {
            user_cmd::run(&paths, command)?;
        }

        Command::Task { command } => {
            task_cmd::run(&paths, &cfg, command)?;
        }

        Command::Schedule(args) => {
            schedule_cmd::run(&paths, &cfg, args)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                if config::init_config(&paths)? {
                    println!("Wrote {}", paths.config_path().display());
                } else {
                    println!("Config already exists: {}", paths.config_path().display());
                }
            }
            ConfigCommand::Show => {
                println!("# {}", paths.config_path().display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}
