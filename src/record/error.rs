/// Errors raised while locating the rows of a job's data
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// No field at any depth carries a `data` array
    #[error("No field carries a data array; nothing to write")]
    NoRows,
}
