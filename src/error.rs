use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    /// The guess does not read as a nonzero, finite number.
    #[error("invalid guess {input:?}: enter a number")]
    InvalidInput { input: String },
}
