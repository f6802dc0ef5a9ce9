use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;
use stackvm::bytecode::{Pointer, Program};
use crate::analyzer::{Analyzer, Procedure, SymbolTable};
use crate::codegen::CodeGenerator;
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use crate::lexer::{Lexer, SourceLine};
use crate::parser::Parser;

/// Source text to resolved `Program`
pub struct Compiler {
    config: CompilerConfig,
    lexer: Lexer,
}

/// A compiled program together with what the compiler learned about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub program: Program,
    pub symbols: SymbolTable,
    /// Original line number of each instruction, by index
    pub source_lines: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingEntry {
    pub index: Pointer,
    pub line: usize,
    pub instruction: String,
}

/// Serializable view of a `CompiledUnit`
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub labels: BTreeMap<String, Pointer>,
    pub procedures: BTreeMap<String, Procedure>,
    pub instructions: Vec<ListingEntry>,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> CompileResult<Self> {
        let lexer = Lexer::new(&config)?;
        Ok(Self { config, lexer })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(&self, source: &str) -> CompileResult<Program> {
        Ok(self.compile_unit(source)?.program)
    }

    /// Compile an ordered sequence of raw lines
    pub fn compile_lines<I, S>(&self, lines: I) -> CompileResult<Program>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.assemble(self.lexer.tokenize_lines(lines))?.program)
    }

    pub fn compile_unit(&self, source: &str) -> CompileResult<CompiledUnit> {
        self.assemble(self.lexer.tokenize(source))
    }

    fn assemble(&self, source_lines: Vec<SourceLine>) -> CompileResult<CompiledUnit> {
        let lines = Parser::parse(&source_lines)?;
        let symbols = Analyzer::analyze(&lines)?;
        let program = CodeGenerator::new().generate(&lines, &symbols)?;

        log::debug!("compiled {} instructions", program.len());

        Ok(CompiledUnit {
            program,
            symbols,
            source_lines: source_lines.iter().map(SourceLine::number).collect(),
        })
    }
}

impl CompiledUnit {
    pub fn listing(&self) -> Listing {
        let instructions = self
            .program
            .instructions()
            .iter()
            .zip(&self.source_lines)
            .enumerate()
            .map(|(index, (instruction, &line))| ListingEntry {
                index,
                line,
                instruction: instruction.to_string(),
            })
            .collect();

        Listing {
            labels: self.symbols.labels.clone(),
            procedures: self.symbols.procedures.clone(),
            instructions,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.instructions {
            writeln!(f, "{:>4}  {:<16} ; line {}", entry.index, entry.instruction, entry.line)?;
        }
        Ok(())
    }
}
