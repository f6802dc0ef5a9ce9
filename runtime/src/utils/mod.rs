//! Utility functions for the stackvm runtime

use std::fs::File;
use std::io::{BufWriter, Write, Error as IoError, ErrorKind};
use std::path::Path;
use byteorder::{BigEndian, WriteBytesExt};
use crate::bytecode::{Instruction, Pointer, Program, IMAGE_MAGIC, IMAGE_VERSION};

/// Writes a program image to a file
pub fn write_bytecode<P: AsRef<Path>>(program: &Program, path: P) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_program(program, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Encodes a program image into any writer
pub fn encode_program<W: Write>(program: &Program, writer: &mut W) -> Result<(), IoError> {
    writer.write_u32::<BigEndian>(IMAGE_MAGIC)?;

    writer.write_u8(IMAGE_VERSION)?; // Major version
    writer.write_u8(0)?; // Minor version
    writer.write_u16::<BigEndian>(0)?; // Patch version

    let count = u32::try_from(program.len())
        .map_err(|_| IoError::new(ErrorKind::InvalidData, "Too many instructions for image"))?;
    writer.write_u32::<BigEndian>(count)?;

    for instruction in program.instructions() {
        writer.write_u8(instruction.opcode().into())?;
        match instruction {
            Instruction::Push(value) => writer.write_i64::<BigEndian>(*value)?,
            other => {
                if let Some(pointer) = other.pointer() {
                    writer.write_u32::<BigEndian>(encode_pointer(pointer)?)?;
                }
            },
        }
    }

    Ok(())
}

fn encode_pointer(pointer: Pointer) -> Result<u32, IoError> {
    u32::try_from(pointer).map_err(|_| {
        IoError::new(ErrorKind::InvalidData, format!("Pointer {} does not fit in an image operand", pointer))
    })
}

/// Generate a simple demonstration program: prints 3 + 4 through a procedure
/// that reads its two arguments, then counts down from 3.
pub fn generate_demo_program() -> Program {
    use crate::bytecode::Instruction::*;

    Program::new(vec![
        /* 00 */ Push(3),
        /* 01 */ Push(4),
        /* 02 */ Call(7),           // add_args(3, 4)
        /* 03 */ Print,             // 7
        /* 04 */ Pop,
        /* 05 */ Pop,
        /* 06 */ Jump(11),
        /* 07 */ GetArg(1),         // add_args body
        /* 08 */ GetArg(0),
        /* 09 */ Add,
        /* 10 */ Ret,
        /* 11 */ Pop,               // drop the first argument
        /* 12 */ Push(3),           // countdown
        /* 13 */ Print,
        /* 14 */ Push(1),
        /* 15 */ Sub,
        /* 16 */ Get(0),
        /* 17 */ JumpIfNonZero(13),
        /* 18 */ Pop,
        /* 19 */ Pop,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};
    use byteorder::ReadBytesExt;
    use tempfile::tempdir;
    use crate::bytecode::{OpCode, Parser};
    use crate::vm::VM;

    #[test]
    fn test_write_bytecode_empty_program() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.svb");

        write_bytecode(&Program::default(), &file_path).unwrap();
        assert!(file_path.exists());

        let mut reader = BufReader::new(File::open(&file_path).unwrap());
        assert_eq!(reader.read_u32::<BigEndian>().unwrap(), IMAGE_MAGIC);
        assert_eq!(reader.read_u8().unwrap(), 1); // Major
        assert_eq!(reader.read_u8().unwrap(), 0); // Minor
        assert_eq!(reader.read_u16::<BigEndian>().unwrap(), 0); // Patch
        assert_eq!(reader.read_u32::<BigEndian>().unwrap(), 0);
    }

    #[test]
    fn test_encode_operand_layout() {
        let program = Program::new(vec![Instruction::Push(-1), Instruction::Call(258), Instruction::Ret]);
        let mut bytes = Vec::new();
        encode_program(&program, &mut bytes).unwrap();

        let body = &bytes[12..];
        assert_eq!(body[0], OpCode::Push.to_byte());
        assert_eq!(&body[1..9], &[0xFF; 8]);
        assert_eq!(body[9], OpCode::Call.to_byte());
        assert_eq!(&body[10..14], &[0, 0, 1, 2]);
        assert_eq!(body[14], OpCode::Ret.to_byte());
        assert_eq!(body.len(), 15);
    }

    #[test]
    fn test_image_reads_back_identically() {
        let program = generate_demo_program();
        let mut bytes = Vec::new();
        encode_program(&program, &mut bytes).unwrap();

        let parsed = Parser::parse(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed, program);
    }

    #[test]
    fn test_write_bytecode_file_round_trip_executes() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("demo.svb");
        let program = generate_demo_program();
        write_bytecode(&program, &file_path).unwrap();

        let mut reader = BufReader::new(File::open(&file_path).unwrap());
        let parsed = Parser::parse(&mut reader).unwrap();

        let vm = VM::new();
        assert_eq!(vm.execute(&parsed).unwrap(), vm.execute(&program).unwrap());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_encode_rejects_wide_pointer() {
        let program = Program::new(vec![Instruction::Jump(u32::MAX as usize + 1)]);
        let err = encode_program(&program, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_write_bytecode_file_creation_error() {
        let result = write_bytecode(&Program::default(), "/nonexistent/dir/demo.svb");
        assert!(result.is_err());
    }

    #[test]
    fn test_demo_program_output() {
        let execution = VM::new().execute(&generate_demo_program()).unwrap();
        assert_eq!(execution.output, vec![7, 3, 2, 1]);
        assert!(execution.stack.is_empty());
    }
}
