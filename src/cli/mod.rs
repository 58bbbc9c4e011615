//! Command-line interface for metric-slots.
//!
//! Each subcommand feeds the given values through one of the containers and
//! prints the result, which makes the binary a quick way to inspect window,
//! set and stack behaviour.

use crate::array::{DoubleArray, LongArray};
use crate::containers::{LongSlidingWindow, LongSortedSet, LongStack};
use crate::core::{ArrayError, Config, LoggingConfig, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Off-heap numeric slot arrays for metric retention
#[derive(Parser, Debug)]
#[command(name = "metric-slots")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "METRIC_SLOTS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "METRIC_SLOTS_DEBUG", global = true)]
    pub debug: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Feed values into a sliding window and print its statistics
    Window {
        /// Window capacity (default: window.capacity from the config)
        #[arg(long)]
        capacity: Option<usize>,
        /// Samples, oldest first
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Add values to a sorted set
    Set {
        /// Values to add
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Push values onto a stack, then pop some of them
    Stack {
        /// Number of values to pop after pushing
        #[arg(long, default_value_t = 0)]
        pop: usize,
        /// Values to push
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Sort values with the configured array parameters
    Sort {
        /// Treat values as floating point
        #[arg(long)]
        float: bool,
        /// Values to sort
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Validate the configuration and print it
    CheckConfig,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load the configuration file if one was given, else the defaults.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path).map_err(|e| match e {
                ArrayError::Io(io) => ArrayError::config(format!(
                    "Failed to read config file {:?}: {}",
                    path, io
                )),
                other => other,
            }),
            None => Ok(Config::default()),
        }
    }

    /// Initialize logging.
    ///
    /// Level precedence: `--debug`, then `METRIC_SLOTS_LOG`, then `RUST_LOG`,
    /// then `logging.level` from the configuration.
    pub fn init_logging(&self, logging: &LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = if self.debug {
            EnvFilter::new("debug")
        } else if let Ok(level) = std::env::var("METRIC_SLOTS_LOG") {
            EnvFilter::new(level)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()))
        };

        let fmt_layer = if logging.structured {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .compact()
        } else {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact()
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ArrayError::config(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    cli.init_logging(&config.logging)?;
    tracing::debug!(?config, "using configuration");

    let output = render(&cli.command, &config)?;
    println!("{}", output);
    Ok(())
}

/// Run `command` against `config` and return what it prints.
pub fn render(command: &Command, config: &Config) -> Result<String> {
    let output = match command {
        Command::Window { capacity, values } => {
            let capacity = capacity.unwrap_or(config.window.capacity);
            let mut window = LongSlidingWindow::new(capacity)?;
            window.insert_all(values)?;
            format!(
                "window: {}\nsize={} sum={} avg={} min={} max={}",
                window,
                window.size(),
                window.sum()?,
                window.avg()?,
                show(window.min()?),
                show(window.max()?)
            )
        },
        Command::Set { values } => {
            let mut set = LongSortedSet::with_config(config.defaults.clone())?;
            set.add(values)?;
            format!("set: {} size={}", set, set.size())
        },
        Command::Stack { pop, values } => {
            let mut stack = LongStack::new()?;
            stack.push(values)?;
            let mut popped = Vec::new();
            for _ in 0..*pop {
                match stack.pop()? {
                    Some(value) => popped.push(value),
                    None => break,
                }
            }
            format!("popped: {:?}\nremaining: {:?}", popped, stack.to_vec()?)
        },
        Command::Sort { float, values } => {
            if *float {
                let parsed = parse_all::<f64>(values)?;
                let mut array = DoubleArray::from_slice(config.defaults.clone(), &parsed)?;
                array.sort()?;
                array.to_string()
            } else {
                let parsed = parse_all::<i64>(values)?;
                let mut array = LongArray::from_slice(config.defaults.clone(), &parsed)?;
                array.sort()?;
                array.to_string()
            }
        },
        Command::CheckConfig => {
            config.validate()?;
            let mut out = String::from("Configuration is valid!\n");
            out.push_str(&serde_yaml::to_string(config)?);
            out
        },
    };
    Ok(output)
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn parse_all<T: std::str::FromStr>(values: &[String]) -> Result<Vec<T>>
where
    T::Err: std::fmt::Display,
{
    values
        .iter()
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ArrayError::config(format!("invalid value {:?}: {}", raw, e)))
        })
        .collect()
}
