use std::fmt::Display;
use std::str::FromStr;
use stackvm::bytecode::{Instruction, Pointer};
use crate::error::{CompileError, CompileResult};
use crate::lexer::SourceLine;

/// Which of the three jump mnemonics a line used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Always,
    IfZero,
    IfNonZero,
}

impl JumpKind {
    pub fn instruction(self, target: Pointer) -> Instruction {
        match self {
            JumpKind::Always => Instruction::Jump(target),
            JumpKind::IfZero => Instruction::JumpIfZero(target),
            JumpKind::IfNonZero => Instruction::JumpIfNonZero(target),
        }
    }
}

/// A source line with its operands decoded but symbols not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Needs no symbol resolution
    Instruction(Instruction),
    Jump { kind: JumpKind, label: String },
    Call(String),
    Label(String),
    Proc(String),
    End,
}

/// A statement and the source line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line: usize,
    pub statement: Statement,
}

pub struct Parser;

impl Parser {
    pub fn parse(lines: &[SourceLine]) -> CompileResult<Vec<ParsedLine>> {
        lines
            .iter()
            .map(|source| {
                Ok(ParsedLine {
                    line: source.number(),
                    statement: Self::parse_line(source)?,
                })
            })
            .collect()
    }

    pub fn parse_line(source: &SourceLine) -> CompileResult<Statement> {
        let statement = match source.mnemonic() {
            "Push" => Statement::Instruction(Instruction::Push(Self::literal(source)?)),
            "Pop" => Self::bare(source, Instruction::Pop)?,
            "Add" => Self::bare(source, Instruction::Add)?,
            "Sub" => Self::bare(source, Instruction::Sub)?,
            "Mul" => Self::bare(source, Instruction::Mul)?,
            "Div" => Self::bare(source, Instruction::Div)?,
            "Print" => Self::bare(source, Instruction::Print)?,
            "Ret" => Self::bare(source, Instruction::Ret)?,

            "Get" => Statement::Instruction(Instruction::Get(Self::literal(source)?)),
            "Set" => Statement::Instruction(Instruction::Set(Self::literal(source)?)),
            "GetArg" => Statement::Instruction(Instruction::GetArg(Self::literal(source)?)),
            "SetArg" => Statement::Instruction(Instruction::SetArg(Self::literal(source)?)),

            "Jump" => Statement::Jump { kind: JumpKind::Always, label: Self::name(source)? },
            "JE" => Statement::Jump { kind: JumpKind::IfZero, label: Self::name(source)? },
            "JNE" => Statement::Jump { kind: JumpKind::IfNonZero, label: Self::name(source)? },

            "Call" => Statement::Call(Self::name(source)?),
            "label" => Statement::Label(Self::name(source)?),
            "Proc" => Statement::Proc(Self::name(source)?),
            "End" => {
                Self::expect_operands(source, 0)?;
                Statement::End
            },

            other => {
                return Err(CompileError::UnknownMnemonic {
                    mnemonic: other.to_string(),
                    line: source.number(),
                })
            },
        };
        Ok(statement)
    }

    fn expect_operands(source: &SourceLine, expected: usize) -> CompileResult<()> {
        let found = source.operands().len();
        if found != expected {
            return Err(CompileError::OperandCount {
                mnemonic: source.mnemonic().to_string(),
                expected,
                found,
                line: source.number(),
            });
        }
        Ok(())
    }

    fn bare(source: &SourceLine, instruction: Instruction) -> CompileResult<Statement> {
        Self::expect_operands(source, 0)?;
        Ok(Statement::Instruction(instruction))
    }

    fn name(source: &SourceLine) -> CompileResult<String> {
        Self::expect_operands(source, 1)?;
        Ok(source.operands()[0].clone())
    }

    fn literal<T>(source: &SourceLine) -> CompileResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Self::expect_operands(source, 1)?;
        let operand = &source.operands()[0];
        operand.parse::<T>().map_err(|e| CompileError::InvalidOperand {
            mnemonic: source.mnemonic().to_string(),
            operand: operand.clone(),
            reason: e.to_string(),
            line: source.number(),
        })
    }
}
