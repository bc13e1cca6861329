//! # parquetify
//!
//! Command-line front end for converting JSON job documents to Parquet.
//!
//! ## Usage
//!
//! ```bash
//! # Convert a job, writing to the job's fileName
//! parquetify convert -j job.json
//!
//! # Print the schema a job declares
//! parquetify schema -j job.json
//!
//! # Inspect a written file
//! parquetify info out.parquet --head 10
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
