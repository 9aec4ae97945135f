//! Class declaration compilation.

use std::rc::Rc;

use crate::ast::{ClassDefinition, FunctionDefinition};
use crate::error::CompileError;

use super::chunk::{ClassStruct, CodeUnit, UnitKind};
use super::compiler::{CompileResult, Compiler};

/// Name of a method's mandatory first parameter.
pub const SELF_NAME: &str = "self";

impl Compiler {
    /// Compile a class into its method table.
    pub fn compile_class(
        &mut self,
        index: usize,
        class: &ClassDefinition,
    ) -> CompileResult<ClassStruct> {
        let mut compiled = ClassStruct::new(&class.name);
        for method in &class.methods {
            let unit = self.compile_method(index, method)?;
            compiled.methods.push(Rc::new(unit));
        }
        Ok(compiled)
    }

    /// Slot 0 is `self`; the remaining parameters follow in order.
    fn compile_method(
        &mut self,
        class_index: usize,
        method: &FunctionDefinition,
    ) -> CompileResult<CodeUnit> {
        match method.params.first() {
            Some(first) if first.name == SELF_NAME => {}
            Some(first) => {
                return Err(CompileError::MissingSelf(method.name.clone(), first.span));
            }
            None => return Err(CompileError::MissingSelf(method.name.clone(), method.span)),
        }

        self.compile_unit(
            &method.name,
            UnitKind::Method { class: class_index },
            &method.params,
            |c| c.compile_body(&method.body),
        )
    }
}
