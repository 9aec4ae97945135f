//! Bytecode chunks and compiled units.

use std::fmt;
use std::rc::Rc;

use crate::span::Span;

use super::opcode::Op;

/// A constant value stored in a chunk's constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Number(f32),
    /// String literals and attribute/method names.
    String(String),
}

/// A chunk of bytecode: instructions + constant pool + source spans.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// The bytecode instructions.
    pub code: Vec<Op>,
    /// Source span of each instruction, parallel to `code`.
    pub spans: Vec<Span>,
    /// Constant pool.
    pub constants: Vec<Constant>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an instruction and record its source span.
    pub fn emit(&mut self, op: Op, span: Span) -> usize {
        let offset = self.code.len();
        self.code.push(op);
        self.spans.push(span);
        offset
    }

    /// Add a constant to the pool and return its index.
    pub fn add_constant(&mut self, constant: Constant) -> usize {
        // Names are looked up repeatedly; keep one copy of each string
        if let Constant::String(ref s) = constant {
            if let Some(i) = self
                .constants
                .iter()
                .position(|c| matches!(c, Constant::String(existing) if existing == s))
            {
                return i;
            }
        }
        self.constants.push(constant);
        self.constants.len() - 1
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn span_at(&self, offset: usize) -> Span {
        self.spans.get(offset).copied().unwrap_or_default()
    }
}

/// What kind of unit a `CodeUnit` is. Decides how slots are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Top-level statements.
    Script,
    Function,
    /// A method of the class at this index in `CompiledProgram::classes`.
    Method { class: usize },
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Script => write!(f, "script"),
            UnitKind::Function => write!(f, "function"),
            UnitKind::Method { .. } => write!(f, "method"),
        }
    }
}

/// A compiled instruction list plus its variable table.
#[derive(Debug, Clone)]
pub struct CodeUnit {
    pub name: String,
    pub kind: UnitKind,
    /// Declared parameter names. Methods include `self`.
    pub params: Vec<String>,
    pub chunk: Chunk,
    /// Name of every local slot, indexed by slot.
    pub variable_names: Vec<String>,
}

impl CodeUnit {
    pub fn new(name: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            chunk: Chunk::new(),
            variable_names: Vec::new(),
        }
    }

    /// Number of arguments a caller passes. The receiver is not counted.
    pub fn arity(&self) -> usize {
        match self.kind {
            UnitKind::Method { .. } => self.params.len().saturating_sub(1),
            _ => self.params.len(),
        }
    }

    pub fn local_count(&self) -> usize {
        self.variable_names.len()
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.variable_names.iter().position(|n| n == name)
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, UnitKind::Method { .. }) && self.name == CONSTRUCTOR_NAME
    }
}

/// Name of the method run by `ClassName(args)`.
pub const CONSTRUCTOR_NAME: &str = "__init__";

/// A class: a named method table.
#[derive(Debug, Clone)]
pub struct ClassStruct {
    pub name: String,
    pub methods: Vec<Rc<CodeUnit>>,
}

impl ClassStruct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&Rc<CodeUnit>> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructor(&self) -> Option<&Rc<CodeUnit>> {
        self.find_method(CONSTRUCTOR_NAME)
    }
}

/// Everything the compiler produces for one file.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub main: Rc<CodeUnit>,
    pub functions: Vec<Rc<CodeUnit>>,
    pub classes: Vec<Rc<ClassStruct>>,
}

impl CompiledProgram {
    pub fn function(&self, name: &str) -> Option<&Rc<CodeUnit>> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&Rc<ClassStruct>> {
        self.classes.iter().find(|c| c.name == name)
    }
}
