//! The bytecode virtual machine: a stack-based execution engine.

use std::rc::Rc;

use log::warn;

use crate::error::RuntimeError;
use crate::span::Span;

use super::chunk::{ClassStruct, CodeUnit, CompiledProgram, Constant};
use super::opcode::Op;
use super::value::{ObjectRef, Value};

/// Frame depth at which a call is refused.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// What the VM does when an operation meets operands of the wrong type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Abort execution with a `RuntimeError`.
    #[default]
    Strict,
    /// Log the fault, record it, and continue with `Void` as the result.
    Permissive,
}

/// VM configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmOptions {
    pub fault_policy: FaultPolicy,
    pub max_call_depth: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            fault_policy: FaultPolicy::Strict,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// A call frame on the VM call stack.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// The unit being executed.
    pub unit: Rc<CodeUnit>,
    /// Instruction pointer (index into chunk.code).
    pub ip: usize,
    /// Base index into the value stack for this frame's locals.
    pub stack_base: usize,
    /// Set for `__init__` frames: the object handed back to the caller.
    pub constructed: Option<ObjectRef>,
}

/// The bytecode VM.
pub struct Vm {
    /// Value stack. Each frame owns `stack[stack_base..]`: its local slots,
    /// then its operands.
    pub stack: Vec<Value>,
    /// Call frame stack.
    pub frames: Vec<CallFrame>,
    pub(crate) functions: Vec<Rc<CodeUnit>>,
    pub(crate) classes: Vec<Rc<ClassStruct>>,
    pub(crate) options: VmOptions,
    faults: Vec<RuntimeError>,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_options(VmOptions::default())
    }

    pub fn with_options(options: VmOptions) -> Self {
        Self {
            stack: Vec::with_capacity(256),
            frames: Vec::with_capacity(64),
            functions: Vec::new(),
            classes: Vec::new(),
            options,
            faults: Vec::new(),
        }
    }

    /// Type faults recovered from during the last run (permissive policy only).
    pub fn faults(&self) -> &[RuntimeError] {
        &self.faults
    }

    /// Execute a compiled program and return the script's result.
    pub fn execute(&mut self, program: &CompiledProgram) -> Result<Value, RuntimeError> {
        self.stack.clear();
        self.frames.clear();
        self.faults.clear();
        self.functions = program.functions.clone();
        self.classes = program.classes.clone();

        self.push_frame(program.main.clone(), 0, None);

        let result = self.run();
        if result.is_err() {
            self.stack.clear();
            self.frames.clear();
        }
        result
    }

    /// Run the dispatch loop until the outermost frame returns.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        loop {
            let Some(frame_idx) = self.frames.len().checked_sub(1) else {
                return Ok(Value::Void);
            };
            let frame = &self.frames[frame_idx];
            let ip = frame.ip;

            let Some(&op) = frame.unit.chunk.code.get(ip) else {
                return Err(RuntimeError::new(
                    format!("'{}' ended without returning", frame.unit.name),
                    frame.unit.chunk.span_at(ip.saturating_sub(1)),
                ));
            };
            let span = frame.unit.chunk.span_at(ip);

            // Advance IP
            self.frames[frame_idx].ip += 1;

            match op {
                Op::Constant(idx) => {
                    let value = match self.constant(frame_idx, idx, span)? {
                        Constant::Number(n) => Value::Number(*n),
                        Constant::String(s) => Value::String(s.clone()),
                    };
                    self.push(value);
                }
                Op::Void => self.push(Value::Void),

                Op::Pop => {
                    self.pop(span)?;
                }

                Op::GetLocal(slot) => {
                    let index = self.frames[frame_idx].stack_base + slot as usize;
                    let value = self.stack[index].clone();
                    self.push(value);
                }
                Op::LocalRef(slot) => {
                    let index = self.frames[frame_idx].stack_base + slot as usize;
                    self.push(Value::StackLValue(index));
                }

                Op::GetAttribute(idx) => {
                    let name = self.read_string_constant(frame_idx, idx, span)?;
                    self.get_attribute(&name, span)?;
                }
                Op::AttributeRef(idx) => {
                    let name = self.read_string_constant(frame_idx, idx, span)?;
                    self.attribute_ref(name, span)?;
                }
                Op::Store => self.store(span)?,

                Op::Add | Op::Subtract | Op::Multiply | Op::Divide => {
                    let right = self.pop(span)?;
                    let left = self.pop(span)?;
                    let result = match arithmetic(op, left, right, span) {
                        Ok(value) => value,
                        Err(err) => {
                            self.fault(err)?;
                            Value::Void
                        }
                    };
                    self.push(result);
                }
                Op::Negate => {
                    let result = match self.pop(span)? {
                        Value::Number(n) => Value::Number(-n),
                        other => {
                            self.fault(RuntimeError::type_error(
                                format!("cannot negate {}", other.type_name()),
                                span,
                            ))?;
                            Value::Void
                        }
                    };
                    self.push(result);
                }

                Op::Index => {
                    let index = self.pop(span)?;
                    let target = self.pop(span)?;
                    let result = match index_string(target, index, span) {
                        Ok(value) => value,
                        Err(err) => {
                            self.fault(err)?;
                            Value::Void
                        }
                    };
                    self.push(result);
                }

                Op::CallFunction(idx, argc) => self.call_function(idx, argc as usize, span)?,
                Op::CallMethod(idx, argc) => {
                    let name = self.read_string_constant(frame_idx, idx, span)?;
                    self.call_method(&name, argc as usize, span)?;
                }
                Op::Construct(idx, argc) => self.construct(idx, argc as usize, span)?,

                Op::Return => {
                    let result = self.pop(span)?;
                    let Some(frame) = self.frames.pop() else {
                        return Err(RuntimeError::new("return outside of a call", span));
                    };
                    debug_assert_eq!(
                        self.stack.len(),
                        frame.stack_base + frame.unit.local_count(),
                        "'{}' returned with operands left on the stack",
                        frame.unit.name
                    );

                    // Restore the stack
                    self.stack.truncate(frame.stack_base);

                    let result = match frame.constructed {
                        Some(object) => Value::Object(object),
                        None => result,
                    };

                    if self.frames.is_empty() {
                        return Ok(result);
                    }

                    self.push(result);
                }
            }
        }
    }

    /// Record a recoverable fault, or propagate it under the strict policy.
    pub(crate) fn fault(&mut self, error: RuntimeError) -> Result<(), RuntimeError> {
        if self.options.fault_policy == FaultPolicy::Permissive && error.is_type_fault() {
            warn!("{}", error);
            self.faults.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    // --- Stack operations ---

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    #[inline]
    pub fn pop(&mut self, span: Span) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow(span))
    }

    // --- Helpers ---

    fn constant(&self, frame_idx: usize, idx: u16, span: Span) -> Result<&Constant, RuntimeError> {
        self.frames[frame_idx]
            .unit
            .chunk
            .constants
            .get(idx as usize)
            .ok_or_else(|| RuntimeError::new(format!("no constant at index {}", idx), span))
    }

    fn read_string_constant(
        &self,
        frame_idx: usize,
        idx: u16,
        span: Span,
    ) -> Result<String, RuntimeError> {
        match self.constant(frame_idx, idx, span)? {
            Constant::String(s) => Ok(s.clone()),
            Constant::Number(_) => Err(RuntimeError::new(
                format!("constant {} is not a name", idx),
                span,
            )),
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn arithmetic(op: Op, left: Value, right: Value, span: Span) -> Result<Value, RuntimeError> {
    match (op, left, right) {
        (Op::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Op::Subtract, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Op::Multiply, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Op::Divide, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (Op::Add, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (op, left, right) => Err(RuntimeError::type_error(
            format!(
                "unsupported operand types for {:?}: {} and {}",
                op,
                left.type_name(),
                right.type_name()
            ),
            span,
        )),
    }
}

/// `string[number]`: the character at an integral, in-range position.
fn index_string(target: Value, index: Value, span: Span) -> Result<Value, RuntimeError> {
    let (text, position) = match (&target, &index) {
        (Value::String(s), Value::Number(n)) => (s, *n),
        _ => {
            return Err(RuntimeError::type_error(
                format!(
                    "cannot index {} with {}",
                    target.type_name(),
                    index.type_name()
                ),
                span,
            ));
        }
    };

    if position.fract() != 0.0 || !position.is_finite() {
        return Err(RuntimeError::type_error(
            format!("string index must be a whole number, got {}", position),
            span,
        ));
    }

    let length = text.chars().count();
    if position < 0.0 || position as usize >= length {
        return Err(RuntimeError::IndexOutOfBounds {
            index: position as i64,
            length,
            span,
        });
    }

    Ok(text
        .chars()
        .nth(position as usize)
        .map(|c| Value::String(c.to_string()))
        .unwrap_or(Value::Void))
}
