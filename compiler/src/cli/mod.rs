//! `svmc` command line: build, run and check stackvm source files

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use stackvm::runtime::{Runtime, RuntimeConfig};
use stackvm::utils::write_bytecode;
use stackvm::Execution;
use crate::config::{CompilerConfig, DEFAULT_COMMENT_MARKER};
use crate::driver::{CompiledUnit, Compiler};

/// Extension of binary program images
pub const IMAGE_EXTENSION: &str = "svb";

#[derive(Parser, Debug)]
#[command(name = "svmc", version)]
#[command(about = "Compiler for stackvm assembly", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log compiler and runtime lifecycle events
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a source file
    Build {
        input: PathBuf,

        /// Output path; defaults to the input with an extension for the format
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Emit::Bytecode)]
        emit: Emit,

        /// Comment marker
        #[arg(long, default_value = DEFAULT_COMMENT_MARKER)]
        comment: String,
    },

    /// Compile a source file and execute it
    Run {
        input: PathBuf,

        /// Log every instruction and the stack before it runs
        #[arg(long)]
        trace: bool,

        /// Fault after this many instructions
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,

        #[arg(long, default_value = DEFAULT_COMMENT_MARKER)]
        comment: String,
    },

    /// Compile a source file and report the first error, if any
    Check {
        input: PathBuf,

        #[arg(long, default_value = DEFAULT_COMMENT_MARKER)]
        comment: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emit {
    /// Binary program image
    Bytecode,
    /// Label table, procedure table and instruction listing as JSON
    Json,
    /// One instruction per line
    Listing,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.command {
            Command::Run { trace: true, .. } => LevelFilter::Trace,
            _ if self.debug => LevelFilter::Debug,
            _ => LevelFilter::Warn,
        }
    }
}

pub struct CliHandler;

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, cli: Cli) -> Result<()> {
        let debug = cli.debug;
        match cli.command {
            Command::Build { input, output, emit, comment } => {
                let written = self.build(&input, output.as_deref(), emit, &comment)?;
                if let Some(path) = written {
                    println!("Wrote {}", path.display());
                }
            },
            Command::Run { input, trace, max_steps, comment } => {
                let config = RuntimeConfig::default()
                    .with_debug_mode(debug)
                    .with_stack_trace(trace)
                    .with_instruction_limit(max_steps)
                    .with_echo_output(true);
                self.run(&input, &comment, config)?;
            },
            Command::Check { input, comment } => {
                let unit = self.compile(&input, &comment)?;
                println!("{}: ok ({} instructions)", input.display(), unit.program.len());
            },
        }
        Ok(())
    }

    /// Compile `input` and write it out in the requested form. Returns the
    /// path written, or `None` when a listing went to stdout.
    pub fn build(&self, input: &Path, output: Option<&Path>, emit: Emit, comment: &str) -> Result<Option<PathBuf>> {
        let unit = self.compile(input, comment)?;

        let path = match (emit, output) {
            (Emit::Listing, None) => {
                print!("{}", unit.listing());
                return Ok(None);
            },
            (_, Some(path)) => path.to_path_buf(),
            (Emit::Bytecode, None) => input.with_extension(IMAGE_EXTENSION),
            (Emit::Json, None) => input.with_extension("json"),
        };

        match emit {
            Emit::Bytecode => write_bytecode(&unit.program, &path)
                .with_context(|| format!("Failed to write image {}", path.display()))?,
            Emit::Json => {
                let json = serde_json::to_string_pretty(&unit.listing())?;
                fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            },
            Emit::Listing => {
                fs::write(&path, unit.listing().to_string())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            },
        }

        log::debug!("wrote {:?} output to {}", emit, path.display());
        Ok(Some(path))
    }

    pub fn run(&self, input: &Path, comment: &str, config: RuntimeConfig) -> Result<Execution> {
        let unit = self.compile(input, comment)?;
        let runtime = Runtime::with_config(config);
        let execution = runtime.execute_program(&unit.program)?;
        Ok(execution)
    }

    pub fn compile(&self, input: &Path, comment: &str) -> Result<CompiledUnit> {
        let source = fs::read_to_string(input)
            .with_context(|| format!("Failed to read source file {}", input.display()))?;
        let compiler = Compiler::new(CompilerConfig::new().with_comment_marker(comment))?;
        let unit = compiler
            .compile_unit(&source)
            .with_context(|| format!("Failed to compile {}", input.display()))?;
        Ok(unit)
    }
}
