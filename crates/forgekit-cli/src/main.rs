#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use forgekit_core::{Command, Config, Mode};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "forgekit")]
#[command(author, version, about = "Resolve bundler configurations for desktop app targets", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the project root
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve and print the configuration of every target
    Config {
        /// Command the configurations are resolved for
        #[arg(long = "command", value_enum, default_value_t = CommandArg::Build)]
        for_command: CommandArg,

        /// Build mode (defaults to development for serve, production for build)
        #[arg(long, short = 'm', value_enum)]
        mode: Option<ModeArg>,

        /// Only print this target
        #[arg(long, short = 't')]
        target: Option<String>,

        /// Path to the project configuration (overrides auto-discovery)
        #[arg(long, short = 'c', value_name = "FILE", env = "FORGEKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the modules left external for the project's package.json
    Externals,

    /// Print the define keys derived for every target
    Keys {
        /// Path to the project configuration (overrides auto-discovery)
        #[arg(long, short = 'c', value_name = "FILE", env = "FORGEKIT_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CommandArg {
    Build,
    Serve,
}

impl From<CommandArg> for Command {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Build => Command::Build,
            CommandArg::Serve => Command::Serve,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine project root
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Config {
            for_command,
            mode,
            target,
            config: project_file,
        }) => {
            let config = config
                .with_command(for_command.into())
                .with_mode(mode.map(Into::into))
                .with_project_file(project_file);
            let span = tracing::info_span!(
                "config",
                cmd = "config",
                cwd = %config.cwd.display(),
                mode = config.mode().as_str()
            );
            let _guard = span.enter();
            commands::config::run(&config, target.as_deref())
        }
        Some(Commands::Externals) => commands::externals::run(&config),
        Some(Commands::Keys {
            config: project_file,
        }) => commands::keys::run(&config.with_project_file(project_file)),
    }
}
