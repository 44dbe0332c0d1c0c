use thiserror::Error;

/// Contract violations raised by the engine.
///
/// The engine does no I/O, so every variant is a programming error on the
/// caller's side and is never worth retrying.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifeError {
    /// A grid was requested with zero rows and columns.
    #[error("grid size must be positive")]
    InvalidSize,
    /// The population was advanced or read before it was ever seeded.
    #[error("population has not been seeded")]
    Unseeded,
}
