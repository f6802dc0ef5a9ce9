use std::fmt;
use crate::bytecode::{OpCode, Pointer, Value};

/// A single resolved instruction
///
/// Pointer operands are absolute instruction indices for the jump family and
/// `Call`, and frame-relative stack offsets for `Get`/`Set`/`GetArg`/`SetArg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Push(Value),
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    Print,
    Jump(Pointer),
    JumpIfZero(Pointer),
    JumpIfNonZero(Pointer),
    Get(Pointer),
    Set(Pointer),
    GetArg(Pointer),
    SetArg(Pointer),
    Call(Pointer),
    Ret,
    Noop,
}

impl Instruction {
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::Push(_) => OpCode::Push,
            Instruction::Pop => OpCode::Pop,
            Instruction::Add => OpCode::Add,
            Instruction::Sub => OpCode::Sub,
            Instruction::Mul => OpCode::Mul,
            Instruction::Div => OpCode::Div,
            Instruction::Print => OpCode::Print,
            Instruction::Jump(_) => OpCode::Jump,
            Instruction::JumpIfZero(_) => OpCode::JumpIfZero,
            Instruction::JumpIfNonZero(_) => OpCode::JumpIfNonZero,
            Instruction::Get(_) => OpCode::Get,
            Instruction::Set(_) => OpCode::Set,
            Instruction::GetArg(_) => OpCode::GetArg,
            Instruction::SetArg(_) => OpCode::SetArg,
            Instruction::Call(_) => OpCode::Call,
            Instruction::Ret => OpCode::Ret,
            Instruction::Noop => OpCode::Noop,
        }
    }

    /// The pointer operand, if this instruction carries one
    pub fn pointer(&self) -> Option<Pointer> {
        match *self {
            Instruction::Jump(p)
            | Instruction::JumpIfZero(p)
            | Instruction::JumpIfNonZero(p)
            | Instruction::Get(p)
            | Instruction::Set(p)
            | Instruction::GetArg(p)
            | Instruction::SetArg(p)
            | Instruction::Call(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match (self, self.pointer()) {
            (Instruction::Push(v), _) => write!(f, "{} {}", mnemonic, v),
            (_, Some(p)) => write!(f, "{} {}", mnemonic, p),
            (_, None) => write!(f, "{}", mnemonic),
        }
    }
}
