//! Slate: a small indentation-structured language with functions and
//! classes, compiled to bytecode and run on a stack-based VM.
//!
//! The pipeline is lexer → parser → compiler → VM:
//! - [`lexer::Scanner`] turns source text into tokens
//! - [`parser::Parser`] builds an [`ast::File`]
//! - [`vm::Compiler`] lowers it to [`vm::CompiledProgram`]
//! - [`vm::Vm`] executes the program and yields a [`vm::Value`]

#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::new_without_default)]
#![allow(clippy::let_and_return)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod vm;

use std::path::Path;

use error::SlateError;
use vm::{CompiledProgram, Value, Vm, VmOptions};

/// Options for running a Slate program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub vm: VmOptions,
    /// Print the token stream before parsing.
    pub dump_tokens: bool,
    /// Print the syntax tree before compiling.
    pub dump_ast: bool,
    /// Print the bytecode before running.
    pub disassemble: bool,
}

/// Scan source text into tokens.
pub fn tokenize(source: &str) -> Result<Vec<lexer::Token>, SlateError> {
    Ok(lexer::Scanner::new(source).scan_tokens()?)
}

/// Parse source text into a syntax tree.
pub fn parse(source: &str, filename: &str) -> Result<ast::File, SlateError> {
    let tokens = tokenize(source)?;
    Ok(parser::Parser::new(tokens).parse_file(filename)?)
}

/// Parse and compile source text.
pub fn compile(source: &str, filename: &str) -> Result<CompiledProgram, SlateError> {
    let file = parse(source, filename)?;
    Ok(vm::Compiler::compile(&file)?)
}

/// Run a Slate program with default options and return its result.
pub fn run(source: &str) -> Result<Value, SlateError> {
    run_source(source, "<eval>", &RunOptions::default())
}

/// Run a Slate program from a file path.
pub fn run_file(path: &Path, options: &RunOptions) -> Result<Value, SlateError> {
    let source = std::fs::read_to_string(path)?;
    run_source(&source, &path.display().to_string(), options)
}

/// Run a Slate program with full control over execution options.
pub fn run_source(
    source: &str,
    filename: &str,
    options: &RunOptions,
) -> Result<Value, SlateError> {
    // Lexing
    let tokens = tokenize(source)?;
    if options.dump_tokens {
        for token in &tokens {
            println!("{} {}", token.span, token);
        }
        println!("---");
    }

    // Parsing
    let file = parser::Parser::new(tokens).parse_file(filename)?;
    if options.dump_ast {
        print!("{}", ast::AstPrinter::new().print(&file));
        println!("---");
    }

    // Compile to bytecode
    let program = vm::Compiler::compile(&file)?;
    if options.disassemble {
        print!("{}", vm::disassemble(&program));
        println!("---");
    }

    // Execute on VM
    let mut vm = Vm::with_options(options.vm);
    Ok(vm.execute(&program)?)
}
