use std::path::PathBuf;
use std::process;
use clap::Parser;
use log::LevelFilter;
use stackvm::{Runtime, VERSION};
use stackvm::runtime::{RuntimeConfig, RuntimeResult};
use stackvm::utils::{generate_demo_program, write_bytecode};

/// Execute a stackvm program image
#[derive(Parser, Debug)]
#[command(name = "stackvm", version)]
struct Args {
    /// Program image to execute
    image: PathBuf,

    /// Write the built-in demo program to IMAGE before executing it
    #[arg(long)]
    write_demo: bool,

    /// Log loading and completion details
    #[arg(long)]
    debug: bool,

    /// Log every instruction and the stack before it runs
    #[arg(long)]
    trace: bool,

    /// Fault after this many instructions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,
}

fn main() {
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::info!("stackvm bytecode runtime v{}", VERSION);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> RuntimeResult<()> {
    let runtime = Runtime::with_config(
        RuntimeConfig::default()
            .with_debug_mode(args.debug)
            .with_stack_trace(args.trace)
            .with_instruction_limit(args.max_steps)
            .with_echo_output(true),
    );

    if args.write_demo {
        write_bytecode(&generate_demo_program(), &args.image)?;
        log::info!("Created demo image: {}", args.image.display());
    }

    runtime.execute_file(&args.image)?;
    Ok(())
}
