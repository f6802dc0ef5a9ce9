use std::io::{Error as IoError, Read};
use byteorder::{ReadBytesExt, BigEndian};
use thiserror::Error;
use crate::bytecode::{Instruction, OpCode, Pointer, Program, IMAGE_MAGIC, IMAGE_VERSION};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(#[from] IoError),

    #[error("Invalid bytecode format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported bytecode version: {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown opcode 0x{opcode:02X} at instruction {index}")]
    UnknownOpcode { opcode: u8, index: usize },
}

pub struct Parser;

impl Parser {
    /// Parse a program image from a reader (file, memory buffer, etc.)
    pub fn parse<R: Read>(reader: &mut R) -> Result<Program, ParseError> {
        let magic = reader.read_u32::<BigEndian>()?;
        if magic != IMAGE_MAGIC {
            return Err(ParseError::InvalidFormat("Invalid magic number".to_string()));
        }

        let version = reader.read_u8()?;
        if version != IMAGE_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }
        let _minor_version = reader.read_u8()?;
        let _patch_version = reader.read_u16::<BigEndian>()?;

        let instructions_len = reader.read_u32::<BigEndian>()? as usize;
        let mut instructions = Vec::with_capacity(instructions_len.min(1 << 16));

        for index in 0..instructions_len {
            let opcode_byte = reader.read_u8()?;
            let opcode = OpCode::from_byte(opcode_byte)
                .ok_or(ParseError::UnknownOpcode { opcode: opcode_byte, index })?;
            instructions.push(Self::read_instruction(reader, opcode)?);
        }

        log::debug!("parsed program image with {} instructions", instructions.len());
        Ok(Program::new(instructions))
    }

    fn read_instruction<R: Read>(reader: &mut R, opcode: OpCode) -> Result<Instruction, ParseError> {
        Ok(match opcode {
            OpCode::Noop => Instruction::Noop,
            OpCode::Print => Instruction::Print,
            OpCode::Push => Instruction::Push(reader.read_i64::<BigEndian>()?),
            OpCode::Pop => Instruction::Pop,
            OpCode::Add => Instruction::Add,
            OpCode::Sub => Instruction::Sub,
            OpCode::Mul => Instruction::Mul,
            OpCode::Div => Instruction::Div,
            OpCode::Jump => Instruction::Jump(Self::read_pointer(reader)?),
            OpCode::JumpIfZero => Instruction::JumpIfZero(Self::read_pointer(reader)?),
            OpCode::JumpIfNonZero => Instruction::JumpIfNonZero(Self::read_pointer(reader)?),
            OpCode::Call => Instruction::Call(Self::read_pointer(reader)?),
            OpCode::Ret => Instruction::Ret,
            OpCode::Get => Instruction::Get(Self::read_pointer(reader)?),
            OpCode::Set => Instruction::Set(Self::read_pointer(reader)?),
            OpCode::GetArg => Instruction::GetArg(Self::read_pointer(reader)?),
            OpCode::SetArg => Instruction::SetArg(Self::read_pointer(reader)?),
        })
    }

    fn read_pointer<R: Read>(reader: &mut R) -> Result<Pointer, ParseError> {
        Ok(reader.read_u32::<BigEndian>()? as Pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use byteorder::{WriteBytesExt, BigEndian};

    /// Helper function to create valid bytecode header
    fn create_valid_header() -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(IMAGE_MAGIC).unwrap();
        data.write_u8(IMAGE_VERSION).unwrap(); // Major version
        data.write_u8(0).unwrap(); // Minor version
        data.write_u16::<BigEndian>(0).unwrap(); // Patch version
        data
    }

    #[test]
    fn test_parse_valid_bytecode() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(4).unwrap();

        data.write_u8(OpCode::Push.into()).unwrap();
        data.write_i64::<BigEndian>(-42).unwrap();
        data.write_u8(OpCode::Print.into()).unwrap();
        data.write_u8(OpCode::JumpIfNonZero.into()).unwrap();
        data.write_u32::<BigEndian>(1).unwrap();
        data.write_u8(OpCode::Noop.into()).unwrap();

        let program = Parser::parse(&mut Cursor::new(data)).unwrap();
        assert_eq!(
            program.instructions(),
            &[
                Instruction::Push(-42),
                Instruction::Print,
                Instruction::JumpIfNonZero(1),
                Instruction::Noop,
            ]
        );
    }

    #[test]
    fn test_parse_empty_program() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(0).unwrap();

        let program = Parser::parse(&mut Cursor::new(data)).unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn test_parse_invalid_magic() {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(0x4C4F4146).unwrap();
        data.write_u8(IMAGE_VERSION).unwrap();

        match Parser::parse(&mut Cursor::new(data)) {
            Err(ParseError::InvalidFormat(msg)) => assert!(msg.contains("magic")),
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unsupported_version() {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(IMAGE_MAGIC).unwrap();
        data.write_u8(9).unwrap();
        data.write_u8(0).unwrap();
        data.write_u16::<BigEndian>(0).unwrap();

        match Parser::parse(&mut Cursor::new(data)) {
            Err(ParseError::UnsupportedVersion(9)) => {},
            other => panic!("Expected UnsupportedVersion(9), got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_opcode() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(2).unwrap();
        data.write_u8(OpCode::Pop.into()).unwrap();
        data.write_u8(0xEE).unwrap();

        match Parser::parse(&mut Cursor::new(data)) {
            Err(ParseError::UnknownOpcode { opcode: 0xEE, index: 1 }) => {},
            other => panic!("Expected UnknownOpcode, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_truncated_operand() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(1).unwrap();
        data.write_u8(OpCode::Call.into()).unwrap();
        data.write_u16::<BigEndian>(3).unwrap();

        assert!(matches!(Parser::parse(&mut Cursor::new(data)), Err(ParseError::IoError(_))));
    }

    #[test]
    fn test_parse_truncated_instruction_list() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(3).unwrap();
        data.write_u8(OpCode::Add.into()).unwrap();

        assert!(matches!(Parser::parse(&mut Cursor::new(data)), Err(ParseError::IoError(_))));
    }

    #[test]
    fn test_parse_extreme_push_values() {
        let mut data = create_valid_header();
        data.write_u32::<BigEndian>(2).unwrap();
        data.write_u8(OpCode::Push.into()).unwrap();
        data.write_i64::<BigEndian>(i64::MAX).unwrap();
        data.write_u8(OpCode::Push.into()).unwrap();
        data.write_i64::<BigEndian>(i64::MIN).unwrap();

        let program = Parser::parse(&mut Cursor::new(data)).unwrap();
        assert_eq!(program.get(0), Some(&Instruction::Push(i64::MAX)));
        assert_eq!(program.get(1), Some(&Instruction::Push(i64::MIN)));
    }
}
