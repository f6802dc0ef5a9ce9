use thiserror::Error;
use crate::bytecode::Pointer;

/// Error type for VM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VMError {
    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Return with empty call stack")]
    CallStackUnderflow,

    #[error("Argument access outside of a procedure call")]
    NoActiveFrame,

    #[error("Stack index out of bounds: {index} (stack depth {depth})")]
    IndexOutOfBounds { index: usize, depth: usize },

    #[error("Argument index out of bounds: {index} (frame offset {offset})")]
    ArgumentOutOfBounds { index: usize, offset: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Instruction limit of {0} exceeded")]
    InstructionLimitExceeded(u64),
}

/// Result type for VM operations
pub type VMResult<T> = Result<T, VMError>;

/// A fatal run-time fault: what went wrong and which instruction did it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at instruction {pc}")]
pub struct Fault {
    pub kind: VMError,
    pub pc: Pointer,
}

impl Fault {
    pub fn new(kind: VMError, pc: Pointer) -> Self {
        Self { kind, pc }
    }
}
