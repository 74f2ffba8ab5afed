/// Errors that can occur while encoding or decoding payload records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The destination buffer cannot hold the record.
    #[error("buffer too small ({available} bytes, need {needed})")]
    BufferTooSmall { needed: usize, available: usize },

    /// The source payload ends before the record does.
    #[error("payload truncated ({actual} bytes, need {needed})")]
    Truncated { needed: usize, actual: usize },

    /// A parameter range in the request runs past the parameter table.
    #[error("parameter range {first}..{end} outside table of {count}")]
    ParamRange { first: u32, end: u64, count: usize },
}

pub type Result<T> = std::result::Result<T, PayloadError>;
