//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxseg_core::Error),

    /// Fixture description is malformed
    #[error("bad fixture: {0}")]
    Fixture(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
