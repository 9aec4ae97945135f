//! Function, method and constructor call dispatch for the VM.

use std::rc::Rc;

use log::trace;

use crate::error::RuntimeError;
use crate::span::Span;

use super::chunk::CodeUnit;
use super::value::{Object, ObjectRef, Value};
use super::vm::{CallFrame, Vm};

impl Vm {
    /// Call a free function. Its `argc` arguments are on top of the stack
    /// and become the callee's parameter slots.
    pub(crate) fn call_function(
        &mut self,
        idx: u16,
        argc: usize,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let unit = self
            .functions
            .get(idx as usize)
            .cloned()
            .ok_or_else(|| RuntimeError::new(format!("no function at index {}", idx), span))?;
        self.check_call(&unit, argc, span)?;

        let stack_base = self.args_start(argc, span)?;
        self.push_frame(unit, stack_base, None);
        Ok(())
    }

    /// Call a method by name. The receiver sits below the `argc` arguments
    /// and becomes slot 0 of the new frame.
    pub(crate) fn call_method(
        &mut self,
        name: &str,
        argc: usize,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let receiver_idx = self.args_start(argc + 1, span)?;

        let object = match &self.stack[receiver_idx] {
            Value::Object(object) => object.clone(),
            other => {
                let error = RuntimeError::type_error(
                    format!("cannot call method '{}' on {}", name, other.type_name()),
                    span,
                );
                self.fault(error)?;
                // Discard receiver and arguments; the call yields Void
                self.stack.truncate(receiver_idx);
                self.push(Value::Void);
                return Ok(());
            }
        };

        let class = object.borrow().class.clone();
        let Some(method) = class.find_method(name).cloned() else {
            return Err(RuntimeError::UndefinedMethod {
                class_name: class.name.clone(),
                method: name.to_string(),
                span,
            });
        };
        self.check_call(&method, argc, span)?;

        self.push_frame(method, receiver_idx, None);
        Ok(())
    }

    /// Create an object and run its class's `__init__`, if any, on it.
    pub(crate) fn construct(
        &mut self,
        idx: u16,
        argc: usize,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let class = self
            .classes
            .get(idx as usize)
            .cloned()
            .ok_or_else(|| RuntimeError::new(format!("no class at index {}", idx), span))?;
        let object: ObjectRef = Object::new(class.clone()).into_ref();

        let Some(init) = class.constructor().cloned() else {
            if argc != 0 {
                return Err(RuntimeError::wrong_arity(0, argc, span));
            }
            trace!("construct {} without __init__", class.name);
            self.push(Value::Object(object));
            return Ok(());
        };
        self.check_call(&init, argc, span)?;

        // The new object becomes the receiver, below the arguments
        let receiver_idx = self.args_start(argc, span)?;
        self.stack.insert(receiver_idx, Value::Object(object.clone()));
        self.push_frame(init, receiver_idx, Some(object));
        Ok(())
    }

    /// Enter `unit` with its frame starting at `stack_base`. Slots not
    /// filled by arguments start out as `Void`.
    pub(crate) fn push_frame(
        &mut self,
        unit: Rc<CodeUnit>,
        stack_base: usize,
        constructed: Option<ObjectRef>,
    ) {
        trace!(
            "call {} '{}' at depth {}",
            unit.kind,
            unit.name,
            self.frames.len()
        );
        self.stack.resize(stack_base + unit.local_count(), Value::Void);
        self.frames.push(CallFrame {
            unit,
            ip: 0,
            stack_base,
            constructed,
        });
    }

    fn check_call(&self, unit: &CodeUnit, argc: usize, span: Span) -> Result<(), RuntimeError> {
        if unit.arity() != argc {
            return Err(RuntimeError::wrong_arity(unit.arity(), argc, span));
        }
        if self.frames.len() >= self.options.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                depth: self.options.max_call_depth,
                span,
            });
        }
        Ok(())
    }

    /// Stack index of the first of the top `count` values.
    fn args_start(&self, count: usize, span: Span) -> Result<usize, RuntimeError> {
        self.stack
            .len()
            .checked_sub(count)
            .ok_or(RuntimeError::StackUnderflow(span))
    }
}
