/// Opcodes for the binary program image

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Control operations
    Noop = 0x00,          // No operation

    // IO operations
    Print = 0x02,         // Print top value without popping

    // Stack manipulation
    Push = 0x10,          // Push immediate value (i64 operand)
    Pop = 0x11,           // Pop top value

    // Arithmetic operations
    Add = 0x20,
    Sub = 0x21,           // Subtract top value from second top value
    Mul = 0x22,
    Div = 0x23,           // Divide second top value by top value

    // Control flow
    Jump = 0x60,          // Jump to instruction (pointer operand)
    JumpIfZero = 0x61,    // Jump if top is zero, consuming it (pointer operand)
    JumpIfNonZero = 0x62, // Jump if top is non-zero, consuming it (pointer operand)
    Call = 0x63,          // Push a frame and jump (pointer operand)
    Ret = 0x64,           // Pop a frame and resume

    // Frame-relative addressing
    Get = 0x70,           // Push local slot (offset operand)
    Set = 0x71,           // Store top into local slot (offset operand)
    GetArg = 0x72,        // Push caller argument (offset operand)
    SetArg = 0x73,        // Store top into caller argument (offset operand)
}

const NOOP: u8 = OpCode::Noop as u8;
const PRINT: u8 = OpCode::Print as u8;

const PUSH: u8 = OpCode::Push as u8;
const POP: u8 = OpCode::Pop as u8;

const ADD: u8 = OpCode::Add as u8;
const SUB: u8 = OpCode::Sub as u8;
const MUL: u8 = OpCode::Mul as u8;
const DIV: u8 = OpCode::Div as u8;

const JUMP: u8 = OpCode::Jump as u8;
const JUMP_IF_ZERO: u8 = OpCode::JumpIfZero as u8;
const JUMP_IF_NON_ZERO: u8 = OpCode::JumpIfNonZero as u8;
const CALL: u8 = OpCode::Call as u8;
const RET: u8 = OpCode::Ret as u8;

const GET: u8 = OpCode::Get as u8;
const SET: u8 = OpCode::Set as u8;
const GET_ARG: u8 = OpCode::GetArg as u8;
const SET_ARG: u8 = OpCode::SetArg as u8;

impl OpCode {
    /// Convert a byte to an opcode
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            NOOP => Some(OpCode::Noop),
            PRINT => Some(OpCode::Print),

            PUSH => Some(OpCode::Push),
            POP => Some(OpCode::Pop),

            ADD => Some(OpCode::Add),
            SUB => Some(OpCode::Sub),
            MUL => Some(OpCode::Mul),
            DIV => Some(OpCode::Div),

            JUMP => Some(OpCode::Jump),
            JUMP_IF_ZERO => Some(OpCode::JumpIfZero),
            JUMP_IF_NON_ZERO => Some(OpCode::JumpIfNonZero),
            CALL => Some(OpCode::Call),
            RET => Some(OpCode::Ret),

            GET => Some(OpCode::Get),
            SET => Some(OpCode::Set),
            GET_ARG => Some(OpCode::GetArg),
            SET_ARG => Some(OpCode::SetArg),

            _ => None,
        }
    }

    /// Convert an opcode to a byte
    pub fn to_byte(&self) -> u8 {
        *self as u8
    }

    /// The source-text mnemonic for the opcode
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Noop => "Noop",
            OpCode::Print => "Print",
            OpCode::Push => "Push",
            OpCode::Pop => "Pop",
            OpCode::Add => "Add",
            OpCode::Sub => "Sub",
            OpCode::Mul => "Mul",
            OpCode::Div => "Div",
            OpCode::Jump => "Jump",
            OpCode::JumpIfZero => "JE",
            OpCode::JumpIfNonZero => "JNE",
            OpCode::Call => "Call",
            OpCode::Ret => "Ret",
            OpCode::Get => "Get",
            OpCode::Set => "Set",
            OpCode::GetArg => "GetArg",
            OpCode::SetArg => "SetArg",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        opcode.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OpCode; 17] = [
        OpCode::Noop, OpCode::Print, OpCode::Push, OpCode::Pop,
        OpCode::Add, OpCode::Sub, OpCode::Mul, OpCode::Div,
        OpCode::Jump, OpCode::JumpIfZero, OpCode::JumpIfNonZero, OpCode::Call, OpCode::Ret,
        OpCode::Get, OpCode::Set, OpCode::GetArg, OpCode::SetArg,
    ];

    #[test]
    fn test_opcode_byte_conversion() {
        assert_eq!(OpCode::Noop.to_byte(), 0x00);
        assert_eq!(OpCode::Print.to_byte(), 0x02);
        assert_eq!(OpCode::Push.to_byte(), 0x10);
        assert_eq!(OpCode::Div.to_byte(), 0x23);
        assert_eq!(OpCode::Ret.to_byte(), 0x64);
        assert_eq!(OpCode::SetArg.to_byte(), 0x73);
        assert_eq!(u8::from(OpCode::Call), 0x63);
    }

    #[test]
    fn test_every_opcode_survives_byte_conversion() {
        for opcode in ALL {
            assert_eq!(OpCode::from_byte(opcode.to_byte()), Some(opcode));
        }
    }

    #[test]
    fn test_byte_to_opcode_invalid() {
        assert_eq!(OpCode::from_byte(0x01), None);
        assert_eq!(OpCode::from_byte(0xFF), None);
        assert_eq!(OpCode::from_byte(0x90), None);
    }

    #[test]
    fn test_conditional_jump_mnemonics() {
        assert_eq!(OpCode::JumpIfZero.mnemonic(), "JE");
        assert_eq!(OpCode::JumpIfNonZero.mnemonic(), "JNE");
    }
}
