use anyhow::Result;
use std::path::PathBuf;

use parquetify::job::JobSpec;

/// Print the message schema and leaf levels a job declares
pub fn run(job: PathBuf) -> Result<()> {
    let spec = JobSpec::from_path(&job)?;
    let schema = spec.message_schema()?;

    print!("{}", schema.to_message_string());
    println!();
    println!("Columns:");
    for (i, leaf) in schema.leaves().iter().enumerate() {
        println!(
            "  {:3}. {} ({}, max def {}, max rep {})",
            i + 1,
            leaf.path,
            leaf.physical_type,
            leaf.max_def_level,
            leaf.max_rep_level
        );
    }
    Ok(())
}
