use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use parquetify::job::JobSpec;

use super::config::Config;

/// Convert a job document to a Parquet file
pub fn run(job: PathBuf, output: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let mut spec = JobSpec::from_path(&job)?;

    if let Some(config_path) = config {
        let file_config = Config::from_file(&config_path)?;
        file_config.apply_to(&mut spec.options);
        info!("Loaded writer defaults from {}", config_path.display());
    }

    let output = spec.output_path(output.as_deref())?;

    info!("parquetify - JSON to Parquet");
    info!("============================");
    info!("Job:    {}", job.display());
    info!("Output: {}", output.display());

    let stats = spec
        .run_to_path(&output)
        .with_context(|| format!("Conversion of {} failed", job.display()))?;

    println!("{}", stats);
    Ok(())
}
