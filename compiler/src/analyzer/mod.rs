use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use stackvm::bytecode::Pointer;
use crate::error::{CompileError, CompileResult};
use crate::parser::{ParsedLine, Statement};

/// Instruction range of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    /// Index of the `Proc` line itself
    pub entry: Pointer,
    /// Index of the line after the matching `End`
    pub exit: Pointer,
}

impl Procedure {
    /// Where `Call` lands: the first body instruction, one past the `Proc` line
    pub fn call_target(&self) -> Pointer {
        self.entry + 1
    }
}

/// Labels and procedures resolved to instruction indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub labels: BTreeMap<String, Pointer>,
    pub procedures: BTreeMap<String, Procedure>,
}

impl SymbolTable {
    pub fn label(&self, name: &str) -> Option<Pointer> {
        self.labels.get(name).copied()
    }

    pub fn procedure(&self, name: &str) -> Option<Procedure> {
        self.procedures.get(name).copied()
    }
}

/// First pass: record every label and procedure by instruction index
pub struct Analyzer;

impl Analyzer {
    pub fn analyze(lines: &[ParsedLine]) -> CompileResult<SymbolTable> {
        let symbols = SymbolTable {
            labels: Self::collect_labels(lines)?,
            procedures: Self::collect_procedures(lines)?,
        };
        log::debug!(
            "resolved {} labels and {} procedures",
            symbols.labels.len(),
            symbols.procedures.len()
        );
        Ok(symbols)
    }

    fn collect_labels(lines: &[ParsedLine]) -> CompileResult<BTreeMap<String, Pointer>> {
        let mut labels: BTreeMap<String, Pointer> = BTreeMap::new();
        for (index, parsed) in lines.iter().enumerate() {
            if let Statement::Label(name) = &parsed.statement {
                if let Some(&first) = labels.get(name) {
                    return Err(CompileError::DuplicateLabel {
                        name: name.clone(),
                        line: parsed.line,
                        first: lines[first].line,
                    });
                }
                labels.insert(name.clone(), index);
            }
        }
        Ok(labels)
    }

    fn collect_procedures(lines: &[ParsedLine]) -> CompileResult<BTreeMap<String, Procedure>> {
        let mut procedures: BTreeMap<String, Procedure> = BTreeMap::new();
        let mut open: Option<(&str, Pointer)> = None;

        for (index, parsed) in lines.iter().enumerate() {
            match &parsed.statement {
                Statement::Proc(name) => {
                    if let Some((outer, _)) = open {
                        return Err(CompileError::NestedProcedure {
                            inner: name.clone(),
                            outer: outer.to_string(),
                            line: parsed.line,
                        });
                    }
                    if let Some(existing) = procedures.get(name) {
                        return Err(CompileError::DuplicateProcedure {
                            name: name.clone(),
                            line: parsed.line,
                            first: lines[existing.entry].line,
                        });
                    }
                    open = Some((name.as_str(), index));
                },
                Statement::End => {
                    let (name, entry) = open
                        .take()
                        .ok_or(CompileError::UnmatchedEnd { line: parsed.line })?;
                    procedures.insert(name.to_string(), Procedure { entry, exit: index + 1 });
                },
                _ => {},
            }
        }

        if let Some((name, entry)) = open {
            return Err(CompileError::UnterminatedProcedure {
                name: name.to_string(),
                line: lines[entry].line,
            });
        }

        Ok(procedures)
    }
}
