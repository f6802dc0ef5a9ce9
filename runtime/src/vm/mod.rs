mod interpreter;
mod execution_context;
mod error;

pub use interpreter::{Execution, VM};
pub use execution_context::{CallFrame, ExecutionContext};
pub use error::{Fault, VMError, VMResult};
