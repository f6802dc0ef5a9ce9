use crate::bytecode::{Instruction, Program, Value};
use crate::vm::{ExecutionContext, Fault, VMError, VMResult};

/// Outcome of a program that ran off the end of its instruction sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Execution {
    /// Every value emitted by `Print`, in order
    pub output: Vec<Value>,
    /// The value stack at halt
    pub stack: Vec<Value>,
    /// Number of instructions executed
    pub steps: u64,
}

impl Execution {
    /// Top of the final stack
    pub fn top(&self) -> Option<Value> {
        self.stack.last().copied()
    }
}

/// The Virtual Machine that executes resolved programs
#[derive(Debug, Clone, Default)]
pub struct VM {
    stack_trace_enabled: bool,
    echo_output: bool,
    instruction_limit: Option<u64>,
}

impl VM {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable per-instruction stack tracing
    pub fn set_stack_trace(&mut self, enabled: bool) {
        self.stack_trace_enabled = enabled;
    }

    /// Write each printed value to stdout as it is produced
    pub fn set_echo_output(&mut self, enabled: bool) {
        self.echo_output = enabled;
    }

    /// Fault once more than `limit` instructions have executed
    pub fn set_instruction_limit(&mut self, limit: Option<u64>) {
        self.instruction_limit = limit;
    }

    /// Execute a program from instruction 0 with an empty stack and call stack
    pub fn execute(&self, program: &Program) -> Result<Execution, Fault> {
        let mut context = ExecutionContext::new(program);
        context.set_stack_trace(self.stack_trace_enabled);

        if self.stack_trace_enabled {
            log::trace!("Starting execution of {} instructions with stack tracing enabled", program.len());
        }

        if let Err(fault) = self.run(&mut context) {
            log::debug!("execution faulted after {} steps: {}", context.steps(), fault);
            return Err(fault);
        }

        let (output, stack, steps) = context.into_parts();
        log::debug!("execution halted after {} steps with stack depth {}", steps, stack.len());
        Ok(Execution { output, stack, steps })
    }

    /// Run the fetch-execute loop until the program counter leaves the program
    pub fn run(&self, context: &mut ExecutionContext) -> Result<(), Fault> {
        while context.has_more_instructions() {
            let pc = context.pc();

            if let Some(limit) = self.instruction_limit {
                if context.steps() >= limit {
                    return Err(Fault::new(VMError::InstructionLimitExceeded(limit), pc));
                }
            }

            let instruction = match context.fetch() {
                Some(instruction) => instruction,
                None => break,
            };

            if self.stack_trace_enabled {
                log::trace!("Executing instruction at PC {}: {}", pc, instruction);
                context.print_stack();
            }

            self.step(context, instruction).map_err(|kind| Fault::new(kind, pc))?;
        }
        Ok(())
    }

    /// Apply one instruction. The program counter already points past it.
    fn step(&self, context: &mut ExecutionContext, instruction: Instruction) -> VMResult<()> {
        match instruction {
            Instruction::Noop => {},

            Instruction::Push(value) => context.push(value),

            Instruction::Pop => {
                context.pop()?;
            },

            Instruction::Add => Self::arithmetic(context, i64::checked_add)?,
            Instruction::Sub => Self::arithmetic(context, i64::checked_sub)?,
            Instruction::Mul => Self::arithmetic(context, i64::checked_mul)?,

            Instruction::Div => {
                let b = context.pop()?;
                let a = context.pop()?;
                if b == 0 {
                    return Err(VMError::DivisionByZero);
                }
                context.push(a.checked_div(b).ok_or(VMError::ArithmeticOverflow)?);
            },

            Instruction::Print => {
                let value = context.peek()?;
                context.emit(value);
                if self.echo_output {
                    println!("{}", value);
                }
            },

            Instruction::Jump(target) => context.set_pc(target),

            // The compared value is only consumed when the branch is taken
            Instruction::JumpIfZero(target) => {
                if context.peek()? == 0 {
                    context.pop()?;
                    context.set_pc(target);
                }
            },

            Instruction::JumpIfNonZero(target) => {
                if context.peek()? != 0 {
                    context.pop()?;
                    context.set_pc(target);
                }
            },

            Instruction::Get(index) => {
                let slot = context.local_index(index)?;
                let value = context.load(slot)?;
                context.push(value);
            },

            Instruction::Set(index) => {
                let slot = context.local_index(index)?;
                let value = context.peek()?;
                context.store(slot, value)?;
            },

            Instruction::GetArg(index) => {
                let slot = context.argument_index(index)?;
                let value = context.load(slot)?;
                context.push(value);
            },

            Instruction::SetArg(index) => {
                let slot = context.argument_index(index)?;
                let value = context.peek()?;
                context.store(slot, value)?;
            },

            Instruction::Call(target) => {
                let return_pointer = context.pc();
                context.push_frame(return_pointer);
                context.set_pc(target);
            },

            Instruction::Ret => {
                let frame = context.pop_frame()?;
                context.set_pc(frame.return_pointer);
            },
        }
        Ok(())
    }

    /// Pop b, pop a, push `op(a, b)`
    fn arithmetic(context: &mut ExecutionContext, op: fn(i64, i64) -> Option<i64>) -> VMResult<()> {
        let b = context.pop()?;
        let a = context.pop()?;
        let result = op(a, b).ok_or(VMError::ArithmeticOverflow)?;
        context.push(result);
        Ok(())
    }
}
