mod executor;
mod config;

pub use executor::Runtime;
pub use config::RuntimeConfig;

use std::io;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("VM fault: {0}")]
    Fault(#[from] crate::vm::Fault),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Bytecode parsing error: {0}")]
    ParsingError(#[from] crate::bytecode::ParseError),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
