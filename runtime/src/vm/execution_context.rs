use crate::bytecode::{Instruction, Pointer, Program, Value};
use crate::vm::{VMError, VMResult};

/// Bookkeeping pushed by `Call` and popped by `Ret`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Instruction to resume at after the procedure returns
    pub return_pointer: Pointer,
    /// Stack depth when the call happened: the boundary between the caller's
    /// arguments (below) and the callee's locals (at and above)
    pub stack_offset: usize,
}

/// The execution state of one program run
pub struct ExecutionContext<'p> {
    program: &'p Program,
    pc: Pointer,
    stack: Vec<Value>,
    call_stack: Vec<CallFrame>,
    output: Vec<Value>,
    steps: u64,
    stack_trace_enabled: bool,
}

impl<'p> ExecutionContext<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            pc: 0,
            stack: Vec::with_capacity(256),
            call_stack: Vec::with_capacity(64),
            output: Vec::new(),
            steps: 0,
            stack_trace_enabled: false,
        }
    }

    /// Get the current program counter
    pub fn pc(&self) -> Pointer {
        self.pc
    }

    /// Set the program counter
    pub fn set_pc(&mut self, pc: Pointer) {
        self.pc = pc;
    }

    /// Check if there are more instructions to execute
    pub fn has_more_instructions(&self) -> bool {
        self.pc < self.program.len()
    }

    /// Read the instruction at the program counter and advance past it
    pub fn fetch(&mut self) -> Option<Instruction> {
        let instruction = self.program.get(self.pc).copied()?;
        self.pc += 1;
        self.steps += 1;
        Some(instruction)
    }

    /// Number of instructions fetched so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) {
        if self.stack_trace_enabled {
            log::trace!("PUSH: {}", value);
        }
        self.stack.push(value);
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> VMResult<Value> {
        let value = self.stack.pop().ok_or(VMError::StackUnderflow)?;
        if self.stack_trace_enabled {
            log::trace!("POP: {}", value);
        }
        Ok(value)
    }

    /// Peek at the top value on the stack without removing it
    pub fn peek(&self) -> VMResult<Value> {
        self.stack.last().copied().ok_or(VMError::StackUnderflow)
    }

    /// Stack offset of the innermost frame, or 0 at top level
    pub fn current_offset(&self) -> usize {
        self.call_stack.last().map_or(0, |frame| frame.stack_offset)
    }

    /// Absolute stack index of local slot `index` in the current frame
    pub fn local_index(&self, index: Pointer) -> VMResult<usize> {
        let absolute = index
            .checked_add(self.current_offset())
            .ok_or(VMError::IndexOutOfBounds { index, depth: self.stack.len() })?;
        self.check_index(absolute)
    }

    /// Absolute stack index of argument `index` of the current frame.
    /// Argument 0 sits directly below the frame boundary.
    pub fn argument_index(&self, index: Pointer) -> VMResult<usize> {
        let offset = self
            .call_stack
            .last()
            .map(|frame| frame.stack_offset)
            .ok_or(VMError::NoActiveFrame)?;
        let absolute = index
            .checked_add(1)
            .and_then(|distance| offset.checked_sub(distance))
            .ok_or(VMError::ArgumentOutOfBounds { index, offset })?;
        self.check_index(absolute)
    }

    fn check_index(&self, absolute: usize) -> VMResult<usize> {
        if absolute >= self.stack.len() {
            return Err(VMError::IndexOutOfBounds { index: absolute, depth: self.stack.len() });
        }
        Ok(absolute)
    }

    /// Read an absolute stack slot
    pub fn load(&self, absolute: usize) -> VMResult<Value> {
        self.stack
            .get(absolute)
            .copied()
            .ok_or(VMError::IndexOutOfBounds { index: absolute, depth: self.stack.len() })
    }

    /// Overwrite an absolute stack slot
    pub fn store(&mut self, absolute: usize, value: Value) -> VMResult<()> {
        let depth = self.stack.len();
        let slot = self
            .stack
            .get_mut(absolute)
            .ok_or(VMError::IndexOutOfBounds { index: absolute, depth })?;
        if self.stack_trace_enabled {
            log::trace!("STORE [{}]: {} -> {}", absolute, slot, value);
        }
        *slot = value;
        Ok(())
    }

    /// Enter a procedure: remember where to resume and where its frame begins
    pub fn push_frame(&mut self, return_pointer: Pointer) {
        let frame = CallFrame { return_pointer, stack_offset: self.stack.len() };
        if self.stack_trace_enabled {
            log::trace!("CALL: {:?}", frame);
        }
        self.call_stack.push(frame);
    }

    /// Leave a procedure
    pub fn pop_frame(&mut self) -> VMResult<CallFrame> {
        self.call_stack.pop().ok_or(VMError::CallStackUnderflow)
    }

    /// Record a printed value
    pub fn emit(&mut self, value: Value) {
        self.output.push(value);
    }

    /// Enable or disable stack trace logging
    pub fn set_stack_trace(&mut self, enabled: bool) {
        self.stack_trace_enabled = enabled;
    }

    /// Get the current stack depth
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn call_stack(&self) -> &[CallFrame] {
        &self.call_stack
    }

    pub fn output(&self) -> &[Value] {
        &self.output
    }

    /// Log the current stack for debugging
    pub fn print_stack(&self) {
        log::trace!("STACK (depth={}, frames={}):", self.stack.len(), self.call_stack.len());
        for (i, value) in self.stack.iter().enumerate().rev() {
            log::trace!("{}: {}", i, value);
        }
    }

    /// Consume the context, keeping what a finished run reports
    pub fn into_parts(self) -> (Vec<Value>, Vec<Value>, u64) {
        (self.output, self.stack, self.steps)
    }
}
