use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    /// The `os.name` value did not normalize to any known operating
    /// system and the `failOnUnknownOS` policy is enabled.
    #[error("unknown os.name: {0}")]
    UnknownOs(String),
}

pub type Result<T> = std::result::Result<T, DetectError>;
