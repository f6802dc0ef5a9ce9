pub mod error;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod analyzer;
pub mod codegen;
pub mod driver;
pub mod cli;

pub use error::{CompileError, CompileResult};
pub use config::CompilerConfig;
pub use analyzer::{Procedure, SymbolTable};
pub use driver::{CompiledUnit, Compiler, Listing};
