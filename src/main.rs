//! Slate CLI: run a file or evaluate a snippet.

use std::env;
use std::path::Path;
use std::process;

use colored::Colorize;
use log::LevelFilter;

use slate::error::SlateError;
use slate::vm::{FaultPolicy, Value};
use slate::RunOptions;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI command to execute.
enum Command {
    /// Run a script file
    Run { file: String },
    /// Evaluate a string
    Eval { code: String },
}

/// Parsed command-line options.
struct Options {
    command: Command,
    run: RunOptions,
}

fn print_usage() {
    eprintln!("Slate {}", VERSION);
    eprintln!();
    eprintln!("Usage: slate [options] <script.sl>");
    eprintln!("       slate [options] -e <code>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e <code>        Evaluate code and print the result");
    eprintln!("  --tokens         Print the token stream");
    eprintln!("  --ast            Print the syntax tree");
    eprintln!("  --disassemble    Print the compiled bytecode");
    eprintln!("  --permissive     Report type faults and continue with void");
    eprintln!("  --max-depth N    Maximum call depth (default: 256)");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace compilation, RUST_LOG=trace for calls.");
}

fn usage_error(message: &str) -> ! {
    eprintln!("{} {}", "error:".red().bold(), message);
    eprintln!();
    print_usage();
    process::exit(64);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut run = RunOptions::default();
    let mut command = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--tokens" => run.dump_tokens = true,
            "--ast" => run.dump_ast = true,
            "--disassemble" => run.disassemble = true,
            "--permissive" => run.vm.fault_policy = FaultPolicy::Permissive,
            "--max-depth" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    usage_error("--max-depth requires a number");
                };
                match value.parse::<usize>() {
                    Ok(depth) if depth > 0 => run.vm.max_call_depth = depth,
                    _ => usage_error(&format!("invalid call depth '{}'", value)),
                }
            }
            "-e" => {
                i += 1;
                let Some(code) = args.get(i) else {
                    usage_error("-e requires code to evaluate");
                };
                if command.is_some() {
                    usage_error("expected a single file or -e snippet");
                }
                command = Some(Command::Eval { code: code.clone() });
            }
            arg if arg.starts_with('-') => usage_error(&format!("unknown option: {}", arg)),
            _ => {
                if command.is_some() {
                    usage_error(&format!("unexpected argument: {}", arg));
                }
                command = Some(Command::Run { file: arg.clone() });
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        usage_error("no input file");
    };
    Options { command, run }
}

fn init_logging() {
    let logger = simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env();
    if let Err(e) = logger.init() {
        eprintln!("{} failed to initialise logging: {}", "warning:".yellow().bold(), e);
    }
}

/// Exit status for a failed run: 65 for bad input, 70 for runtime faults.
fn exit_code(error: &SlateError) -> i32 {
    match error {
        SlateError::Lexer(_) | SlateError::Parser(_) | SlateError::Compile(_) => 65,
        SlateError::Runtime(_) => 70,
        SlateError::Io(_) => 66,
    }
}

fn report(result: Result<Value, SlateError>) {
    match result {
        Ok(Value::Void) => {}
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(exit_code(&e));
        }
    }
}

fn main() {
    init_logging();
    let options = parse_args();

    let result = match &options.command {
        Command::Run { file } => slate::run_file(Path::new(file), &options.run),
        Command::Eval { code } => slate::run_source(code, "<eval>", &options.run),
    };
    report(result);
}
