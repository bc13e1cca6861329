use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod info;
mod schema;

/// parquetify - Declarative JSON to Parquet converter
#[derive(Parser)]
#[command(name = "parquetify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the Parquet file described by a job document
    Convert {
        /// Job document (JSON)
        #[arg(short, long, value_name = "JOB")]
        job: PathBuf,

        /// Output path (defaults to the job's fileName)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load writer defaults from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the message schema a job document declares
    Schema {
        /// Job document (JSON)
        #[arg(short, long, value_name = "JOB")]
        job: PathBuf,
    },

    /// Display information about a Parquet file
    Info {
        /// Input Parquet file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also print the first N rows
        #[arg(long, value_name = "N")]
        head: Option<usize>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert { job, output, config } => convert::run(job, output, config),
        Commands::Schema { job } => schema::run(job),
        Commands::Info { file, head } => info::run(file, head),
    }
}
