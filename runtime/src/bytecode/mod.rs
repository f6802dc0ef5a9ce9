mod instruction;
mod opcode;
mod parser;

pub use instruction::Instruction;
pub use opcode::OpCode;
pub use parser::{Parser, ParseError};

/// The machine's only value type
pub type Value = i64;

/// Instruction index, or frame-relative stack offset for the addressing instructions
pub type Pointer = usize;

/// Magic number at the start of a program image ("SVM1" in ASCII)
pub const IMAGE_MAGIC: u32 = 0x5356_4D31;

/// Major version of the program image format
pub const IMAGE_VERSION: u8 = 1;

/// An immutable, resolved instruction sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, index: Pointer) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}
