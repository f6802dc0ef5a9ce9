use thiserror::Error;

/// Fatal compile-time errors. Line numbers are 1-based positions in the
/// original source text, blank and comment lines included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Unknown mnemonic '{mnemonic}' at line {line}")]
    UnknownMnemonic { mnemonic: String, line: usize },

    #[error("Invalid operand '{operand}' for {mnemonic} at line {line}: {reason}")]
    InvalidOperand {
        mnemonic: String,
        operand: String,
        reason: String,
        line: usize,
    },

    #[error("{mnemonic} expects {expected} operand(s), found {found} at line {line}")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("Undefined label '{name}' at line {line}")]
    UndefinedLabel { name: String, line: usize },

    #[error("Undefined procedure '{name}' at line {line}")]
    UndefinedProcedure { name: String, line: usize },

    #[error("Duplicate label '{name}' at line {line} (first declared at line {first})")]
    DuplicateLabel { name: String, line: usize, first: usize },

    #[error("Duplicate procedure '{name}' at line {line} (first declared at line {first})")]
    DuplicateProcedure { name: String, line: usize, first: usize },

    #[error("Procedure '{name}' opened at line {line} has no matching End")]
    UnterminatedProcedure { name: String, line: usize },

    #[error("Procedure '{inner}' at line {line} is nested inside '{outer}'")]
    NestedProcedure { inner: String, outer: String, line: usize },

    #[error("End at line {line} has no matching Proc")]
    UnmatchedEnd { line: usize },

    #[error("Invalid compiler configuration: {0}")]
    Config(String),
}

impl CompileError {
    /// The source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::UnknownMnemonic { line, .. }
            | CompileError::InvalidOperand { line, .. }
            | CompileError::OperandCount { line, .. }
            | CompileError::UndefinedLabel { line, .. }
            | CompileError::UndefinedProcedure { line, .. }
            | CompileError::DuplicateLabel { line, .. }
            | CompileError::DuplicateProcedure { line, .. }
            | CompileError::UnterminatedProcedure { line, .. }
            | CompileError::NestedProcedure { line, .. }
            | CompileError::UnmatchedEnd { line } => Some(*line),
            CompileError::Config(_) => None,
        }
    }
}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;
