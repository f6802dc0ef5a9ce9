// stackvm - A register-free stack bytecode VM

pub mod bytecode;
pub mod vm;
pub mod runtime;
pub mod utils;

pub use bytecode::{Instruction, Program};
pub use vm::{Execution, Fault, VM};
pub use runtime::Runtime;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
