/// Errors produced while parsing or checking catalog data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The text is neither a two-character ASCII code nor a `0xHHHH` value.
    #[error("invalid packet code {0:?} (expected two ASCII characters or 0xHHHH)")]
    InvalidCode(String),

    /// The code is well-formed but is not in the catalog.
    #[error("unknown packet code {0}")]
    UnknownCode(crate::PacketCode),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
