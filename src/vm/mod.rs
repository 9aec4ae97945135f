//! Bytecode VM for Slate: compiles a parsed file to bytecode units and
//! executes them on a stack-based VM.

pub mod chunk;
pub mod compiler;
pub mod compiler_classes;
pub mod compiler_exprs;
pub mod compiler_stmts;
pub mod disassembler;
pub mod opcode;
pub mod value;
#[allow(clippy::module_inception)]
pub mod vm;
pub mod vm_calls;
pub mod vm_classes;

pub use chunk::{ClassStruct, CodeUnit, CompiledProgram, UnitKind};
pub use compiler::{CompileContext, Compiler};
pub use disassembler::disassemble;
pub use opcode::Op;
pub use value::{Object, Value};
pub use vm::{FaultPolicy, Vm, VmOptions};
