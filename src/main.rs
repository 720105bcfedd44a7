mod app;
mod command;
mod config;
mod consts;
mod game;
mod logging;
mod util;
use crate::app::App;
use crate::config::Config;
use anyhow::Context;
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: gridsnake [<options>]

Play Snake in the terminal

Options:
  -c, --config <path>   Read configuration from the given file
      --log-file <path> Append log messages to the given file
  -h, --help            Display this help message and exit
  -V, --version         Show the program version and exit
";

/// What the program was asked to do on the command line
#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> ExitCode {
        match self {
            Command::Run(args) => args.run(),
            Command::Help => {
                print!("{USAGE}");
                ExitCode::SUCCESS
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                ExitCode::SUCCESS
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    /// Configuration file given on the command line
    config: Option<PathBuf>,

    /// Log file given on the command line, overriding the configuration
    log_file: Option<PathBuf>,
}

impl Arguments {
    fn run(self) -> ExitCode {
        let config = match self.setup() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("gridsnake: {e:#}");
                return ExitCode::from(2);
            }
        };
        let terminal = ratatui::init();
        let r = terminal
            .size()
            .and_then(|size| App::new(config.game, size).run(terminal));
        ratatui::restore();
        io_exit(r)
    }

    /// Load the configuration and start logging
    fn setup(self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(path) => Config::load(&path, false),
            None => Config::default_path().and_then(|path| Config::load(&path, true)),
        }
        .context("failed to load configuration")?;
        if let Some(file) = self.log_file {
            config.log.file = Some(file);
        }
        logging::init(&config.log).context("failed to set up logging")?;
        tracing::info!(?config, "Starting gridsnake");
        Ok(config)
    }
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(cmd) => cmd.run(),
        Err(e) => {
            eprintln!("gridsnake: {e}");
            ExitCode::from(2)
        }
    }
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => {
            tracing::info!("Exiting");
            ExitCode::SUCCESS
        }
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal I/O failed");
            eprintln!("gridsnake: {e}");
            ExitCode::from(2)
        }
    }
}
