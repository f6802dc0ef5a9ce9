use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use crate::bytecode::{Parser, Program};
use crate::vm::{Execution, VM};
use crate::runtime::{RuntimeConfig, RuntimeResult};

/// The Runtime is the main entry point for using the bytecode VM
#[derive(Clone, Debug)]
pub struct Runtime {
    vm: VM,
    config: RuntimeConfig,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create a new runtime with default configuration
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a new runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut vm = VM::new();
        vm.set_stack_trace(config.stack_trace);
        vm.set_echo_output(config.echo_output);
        vm.set_instruction_limit(config.instruction_limit);

        Self { vm, config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Read a program image from disk
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> RuntimeResult<Program> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let program = Parser::parse(&mut reader)?;

        if self.config.debug_mode {
            log::info!("Loaded program: {}", path.display());
            log::info!("Instructions: {}", program.len());
        }

        Ok(program)
    }

    /// Execute a program image file and return the finished execution
    pub fn execute_file<P: AsRef<Path>>(&self, path: P) -> RuntimeResult<Execution> {
        let program = self.load_file(path)?;
        self.execute_program(&program)
    }

    /// Execute an already resolved program
    pub fn execute_program(&self, program: &Program) -> RuntimeResult<Execution> {
        let execution = self.vm.execute(program)?;

        if self.config.debug_mode {
            log::info!(
                "Execution completed: {} steps, {} values printed, final stack depth {}",
                execution.steps,
                execution.output.len(),
                execution.stack.len()
            );
        }

        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use crate::bytecode::Instruction;
    use crate::runtime::RuntimeError;
    use crate::utils::{generate_demo_program, write_bytecode};
    use crate::vm::VMError;

    /// Helper function to create a temporary image file with valid content
    fn create_valid_bytecode_file() -> NamedTempFile {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write_bytecode(&generate_demo_program(), temp_file.path()).expect("Failed to write bytecode");
        temp_file
    }

    /// Helper function to create a temporary file with invalid content
    fn create_invalid_bytecode_file() -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file.write_all(&[0x00, 0x01, 0x02, 0x03]).expect("Failed to write invalid data");
        temp_file.flush().expect("Failed to flush temp file");
        temp_file
    }

    #[test]
    fn test_runtime_with_custom_config() {
        let config = RuntimeConfig::default()
            .with_debug_mode(true)
            .with_stack_trace(true);

        let runtime = Runtime::with_config(config);
        assert!(runtime.config().debug_mode);
        assert!(runtime.config().stack_trace);
    }

    #[test]
    fn test_execute_file_valid_bytecode() {
        let runtime = Runtime::new();
        let temp_file = create_valid_bytecode_file();

        let execution = runtime.execute_file(temp_file.path()).unwrap();
        assert_eq!(execution.output, vec![7, 3, 2, 1]);
    }

    #[test]
    fn test_execute_file_nonexistent_file() {
        let runtime = Runtime::new();
        let result = runtime.execute_file("/this/path/does/not/exist.svb");
        assert!(matches!(result, Err(RuntimeError::IoError(_))));
    }

    #[test]
    fn test_execute_file_invalid_bytecode() {
        let runtime = Runtime::new();
        let temp_file = create_invalid_bytecode_file();

        let result = runtime.execute_file(temp_file.path());
        assert!(matches!(result, Err(RuntimeError::ParsingError(_))));
    }

    #[test]
    fn test_execute_file_with_debug_and_trace() {
        let config = RuntimeConfig::default()
            .with_debug_mode(true)
            .with_stack_trace(true);
        let runtime = Runtime::with_config(config);
        let temp_file = create_valid_bytecode_file();

        assert!(runtime.execute_file(temp_file.path()).is_ok());
    }

    #[test]
    fn test_execute_program_fault_surfaces() {
        let runtime = Runtime::new();
        let program = Program::new(vec![Instruction::Push(1), Instruction::Ret]);

        match runtime.execute_program(&program) {
            Err(RuntimeError::Fault(fault)) => {
                assert_eq!(fault.kind, VMError::CallStackUnderflow);
                assert_eq!(fault.pc, 1);
            },
            other => panic!("Expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn test_instruction_limit_from_config() {
        let runtime = Runtime::with_config(RuntimeConfig::default().with_instruction_limit(Some(25)));
        let program = Program::new(vec![Instruction::Noop, Instruction::Jump(0)]);

        match runtime.execute_program(&program) {
            Err(RuntimeError::Fault(fault)) => {
                assert_eq!(fault.kind, VMError::InstructionLimitExceeded(25));
            },
            other => panic!("Expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_file_executions() {
        let runtime = Runtime::new();
        let temp_file = create_valid_bytecode_file();

        for i in 0..3 {
            let execution = runtime.execute_file(temp_file.path());
            assert!(execution.is_ok(), "execute_file() should succeed on iteration {}", i);
            assert_eq!(execution.unwrap().output, vec![7, 3, 2, 1]);
        }
    }
}
