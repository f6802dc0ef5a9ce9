use stackvm::bytecode::{Instruction, Program};
use crate::analyzer::SymbolTable;
use crate::error::{CompileError, CompileResult};
use crate::parser::{ParsedLine, Statement};

/// Second pass: emit exactly one instruction per parsed line, resolving
/// label and procedure names against the symbol table
pub struct CodeGenerator {
    instructions: Vec<Instruction>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self { instructions: Vec::new() }
    }

    pub fn generate(&mut self, lines: &[ParsedLine], symbols: &SymbolTable) -> CompileResult<Program> {
        self.instructions.clear();
        self.instructions.reserve(lines.len());

        for parsed in lines {
            let instruction = Self::lower(parsed, symbols)?;
            self.emit(instruction);
        }

        Ok(Program::new(std::mem::take(&mut self.instructions)))
    }

    fn lower(parsed: &ParsedLine, symbols: &SymbolTable) -> CompileResult<Instruction> {
        let instruction = match &parsed.statement {
            Statement::Instruction(instruction) => *instruction,

            // Markers keep their slot so every later index stays put
            Statement::Label(_) | Statement::End => Instruction::Noop,

            // Falling into a procedure skips over its body
            Statement::Proc(name) => {
                let procedure = symbols.procedure(name).ok_or_else(|| CompileError::UndefinedProcedure {
                    name: name.clone(),
                    line: parsed.line,
                })?;
                Instruction::Jump(procedure.exit)
            },

            Statement::Call(name) => {
                let procedure = symbols.procedure(name).ok_or_else(|| CompileError::UndefinedProcedure {
                    name: name.clone(),
                    line: parsed.line,
                })?;
                Instruction::Call(procedure.call_target())
            },

            Statement::Jump { kind, label } => {
                let target = symbols.label(label).ok_or_else(|| CompileError::UndefinedLabel {
                    name: label.clone(),
                    line: parsed.line,
                })?;
                kind.instruction(target)
            },
        };
        Ok(instruction)
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}
