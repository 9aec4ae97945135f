//! AST-to-bytecode compiler.
//!
//! Two passes over a `File`: every function and class is declared first, so
//! calls resolve regardless of definition order, then each unit is compiled
//! into its own `CodeUnit`. Variable resolution happens at compile time:
//! every name becomes a fixed slot in the unit that mentions it.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::ast::{File, Parameter};
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::{CodeUnit, CompiledProgram, Constant, UnitKind, CONSTRUCTOR_NAME};
use super::opcode::Op;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// How the node being lowered is used by its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileContext {
    /// The node is an assignment target and must produce a reference.
    pub lvalue: bool,
    /// The node is the right side of a `.`, so names are attributes or methods.
    pub class_access: bool,
}

impl CompileContext {
    pub fn rvalue() -> Self {
        Self::default()
    }

    pub fn lvalue() -> Self {
        Self {
            lvalue: true,
            class_access: false,
        }
    }

    pub fn under_class_access(self) -> Self {
        Self {
            class_access: true,
            ..self
        }
    }
}

/// A free function known before its body is compiled.
#[derive(Debug, Clone)]
pub(crate) struct FunctionSignature {
    pub arity: usize,
}

/// A class known before its methods are compiled.
#[derive(Debug, Clone)]
pub(crate) struct ClassSignature {
    /// Arguments taken by `ClassName(...)`.
    pub constructor_arity: usize,
}

/// The unit currently being compiled.
#[derive(Debug)]
pub(crate) struct UnitState {
    pub unit: CodeUnit,
    pub slots: IndexSet<String>,
}

impl UnitState {
    fn new(name: &str, kind: UnitKind) -> Self {
        Self {
            unit: CodeUnit::new(name, kind),
            slots: IndexSet::new(),
        }
    }
}

/// The compiler: transforms a parsed file into bytecode units.
pub struct Compiler {
    pub(crate) functions: IndexMap<String, FunctionSignature>,
    pub(crate) classes: IndexMap<String, ClassSignature>,
    pub(crate) current: UnitState,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
            classes: IndexMap::new(),
            current: UnitState::new("<script>", UnitKind::Script),
        }
    }

    /// Compile a full file.
    pub fn compile(file: &File) -> CompileResult<CompiledProgram> {
        let mut compiler = Compiler::new();
        compiler.declare(file)?;

        let mut functions = Vec::with_capacity(file.functions.len());
        for def in &file.functions {
            let unit = compiler.compile_unit(&def.name, UnitKind::Function, &def.params, |c| {
                c.compile_body(&def.body)
            })?;
            functions.push(Rc::new(unit));
        }

        let mut classes = Vec::with_capacity(file.classes.len());
        for (index, class) in file.classes.iter().enumerate() {
            classes.push(Rc::new(compiler.compile_class(index, class)?));
        }

        let main = compiler.compile_unit("<script>", UnitKind::Script, &[], |c| {
            c.compile_script(&file.top_level)
        })?;

        Ok(CompiledProgram {
            main: Rc::new(main),
            functions,
            classes,
        })
    }

    /// Register every function and class name with its call arity.
    fn declare(&mut self, file: &File) -> CompileResult<()> {
        for def in &file.functions {
            if self.functions.contains_key(&def.name) {
                return Err(CompileError::Redefinition(def.name.clone(), def.span));
            }
            self.functions.insert(
                def.name.clone(),
                FunctionSignature {
                    arity: def.params.len(),
                },
            );
        }

        for class in &file.classes {
            if self.classes.contains_key(&class.name) || self.functions.contains_key(&class.name)
            {
                return Err(CompileError::Redefinition(class.name.clone(), class.span));
            }

            let mut seen = IndexSet::new();
            for method in &class.methods {
                if !seen.insert(method.name.as_str()) {
                    return Err(CompileError::Redefinition(
                        format!("{}.{}", class.name, method.name),
                        method.span,
                    ));
                }
            }

            let constructor_arity = class
                .methods
                .iter()
                .find(|m| m.name == CONSTRUCTOR_NAME)
                .map(|m| m.params.len().saturating_sub(1))
                .unwrap_or(0);
            self.classes.insert(class.name.clone(), ClassSignature { constructor_arity });
        }

        Ok(())
    }

    /// Compile one unit. Parameters get the lowest slots in declaration order.
    pub(crate) fn compile_unit(
        &mut self,
        name: &str,
        kind: UnitKind,
        params: &[Parameter],
        body: impl FnOnce(&mut Self) -> CompileResult<()>,
    ) -> CompileResult<CodeUnit> {
        let previous = std::mem::replace(&mut self.current, UnitState::new(name, kind));
        let result = self.declare_params(params).and_then(|_| body(self));
        let state = std::mem::replace(&mut self.current, previous);
        result?;

        let mut unit = state.unit;
        unit.variable_names = state.slots.into_iter().collect();
        debug!(
            "compiled {} '{}': {} instructions, {} slots",
            unit.kind,
            unit.name,
            unit.chunk.len(),
            unit.local_count()
        );
        Ok(unit)
    }

    fn declare_params(&mut self, params: &[Parameter]) -> CompileResult<()> {
        for param in params {
            if !self.current.slots.insert(param.name.clone()) {
                return Err(CompileError::Redefinition(param.name.clone(), param.span));
            }
            self.current.unit.params.push(param.name.clone());
        }
        Ok(())
    }

    // --- Chunk helpers ---

    pub fn emit(&mut self, op: Op, span: Span) -> usize {
        self.current.unit.chunk.emit(op, span)
    }

    pub fn emit_constant(&mut self, constant: Constant, span: Span) -> CompileResult<()> {
        let idx = self.add_constant(constant, span)?;
        self.emit(Op::Constant(idx), span);
        Ok(())
    }

    pub fn add_constant(&mut self, constant: Constant, span: Span) -> CompileResult<u16> {
        let idx = self.current.unit.chunk.add_constant(constant);
        operand(idx, "constants", span)
    }

    pub fn add_string_constant(&mut self, s: &str, span: Span) -> CompileResult<u16> {
        self.add_constant(Constant::String(s.to_string()), span)
    }

    /// End the unit with `Void, Return` unless it already ends in a `Return`.
    pub(crate) fn emit_implicit_return(&mut self, span: Span) {
        if self.current.unit.chunk.code.last() != Some(&Op::Return) {
            self.emit(Op::Void, span);
            self.emit(Op::Return, span);
        }
    }

    // --- Local variables ---

    /// Slot of `name` in the current unit, allocating the next free slot on
    /// first sight.
    pub fn resolve_slot(&mut self, name: &str, span: Span) -> CompileResult<u16> {
        let (slot, _) = self.current.slots.insert_full(name.to_string());
        operand(slot, "local variables", span)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrow a table index to an instruction operand.
pub(crate) fn operand(index: usize, what: &str, span: Span) -> CompileResult<u16> {
    u16::try_from(index)
        .map_err(|_| CompileError::new(format!("too many {} in one unit", what), span))
}
