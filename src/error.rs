use thiserror::Error;

/// Error taxonomy for screen generation
///
/// Every failure in the pipeline is deterministic given fixed inputs, so
/// none of these are retryable. A failing stage drops any buffers it
/// allocated before the error propagates.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Parameter outside its legal numeric bounds, or a geometrically
    /// infeasible lattice/cell
    #[error("parameter out of range: {0}")]
    Range(String),

    /// Wrong-shaped input value for a recognized key
    #[error("wrong type for parameter: {0}")]
    Type(String),

    /// Unknown enum or format name
    #[error("unknown name: {0}")]
    Undefined(String),

    /// Buffer reservation failed
    #[error("failed to allocate {0} bytes for screen buffers")]
    OutOfMemory(usize),
}

/// Result type for screen operations
pub type Result<T> = std::result::Result<T, ScreenError>;
