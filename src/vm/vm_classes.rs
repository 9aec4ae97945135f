//! Attribute access and assignment through references.

use crate::error::RuntimeError;
use crate::span::Span;

use super::value::Value;
use super::vm::Vm;

impl Vm {
    /// Pop an object and push the value of its attribute `name`.
    ///
    /// Reading an attribute that was never assigned creates it as `Void`.
    pub(crate) fn get_attribute(&mut self, name: &str, span: Span) -> Result<(), RuntimeError> {
        let value = match self.pop(span)? {
            Value::Object(object) => {
                let value = object.borrow_mut().get_or_create(name);
                value
            }
            other => {
                self.fault(RuntimeError::type_error(
                    format!("cannot read attribute '{}' of {}", name, other.type_name()),
                    span,
                ))?;
                Value::Void
            }
        };
        self.push(value);
        Ok(())
    }

    /// Pop an object and push a reference to its attribute `name`.
    pub(crate) fn attribute_ref(&mut self, name: String, span: Span) -> Result<(), RuntimeError> {
        let reference = match self.pop(span)? {
            Value::Object(object) => {
                object.borrow_mut().get_or_create(&name);
                Value::HeapLValue {
                    object,
                    attribute: name,
                }
            }
            other => {
                self.fault(RuntimeError::type_error(
                    format!("cannot set attribute '{}' on {}", name, other.type_name()),
                    span,
                ))?;
                Value::Void
            }
        };
        self.push(reference);
        Ok(())
    }

    /// Pop a reference, then a value, and write the value through the reference.
    pub(crate) fn store(&mut self, span: Span) -> Result<(), RuntimeError> {
        let location = self.pop(span)?;
        let value = self.pop(span)?;

        match location {
            Value::StackLValue(index) => match self.stack.get_mut(index) {
                Some(slot) => *slot = value,
                None => return Err(RuntimeError::StackUnderflow(span)),
            },
            Value::HeapLValue { object, attribute } => {
                object.borrow_mut().set(attribute, value);
            }
            other => self.fault(RuntimeError::type_error(
                format!("cannot assign to {}", other.type_name()),
                span,
            ))?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::RuntimeError;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::vm::compiler::Compiler;
    use crate::vm::value::Value;
    use crate::vm::vm::{FaultPolicy, Vm, VmOptions};
    use pretty_assertions::assert_eq;

    fn run_with(source: &str, options: VmOptions) -> (Result<Value, RuntimeError>, Vm) {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let file = Parser::new(tokens).parse_file("test.sl").unwrap();
        let program = Compiler::compile(&file).unwrap();
        let mut vm = Vm::with_options(options);
        let result = vm.execute(&program);
        (result, vm)
    }

    fn compile_and_run(source: &str) -> Result<Value, RuntimeError> {
        run_with(source, VmOptions::default()).0
    }

    const HOLDER: &str = "\
class Holder:
  def __init__(self):
    self.inner = 0
";

    #[test]
    fn test_vm_unset_attribute_reads_void() {
        let source = format!("{}h = Holder()\nh.nothing", HOLDER);
        assert_eq!(compile_and_run(&source).unwrap(), Value::Void);
    }

    #[test]
    fn test_vm_nested_attribute_assignment() {
        let source = format!(
            "{}outer = Holder()\nouter.inner = Holder()\nouter.inner.inner = 42\nouter.inner.inner",
            HOLDER
        );
        assert_eq!(compile_and_run(&source).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_vm_attributes_keep_insertion_order() {
        let source = format!("{}h = Holder()\nh.b = 2\nh.a = 'x'\nh", HOLDER);
        let value = compile_and_run(&source).unwrap();
        assert_eq!(value.to_string(), "Holder(inner=0, b=2, a=\"x\")");
    }

    #[test]
    fn test_vm_self_reference_displays_once() {
        let source = format!("{}h = Holder()\nh.me = h\nh.me.me.inner = 5\nh", HOLDER);
        let value = compile_and_run(&source).unwrap();
        assert_eq!(value.to_string(), "Holder(inner=5, me=<Holder>)");
    }

    #[test]
    fn test_vm_attribute_of_number() {
        assert!(compile_and_run("x = 1\nx.y").unwrap_err().is_type_fault());
        assert!(compile_and_run("x = 1\nx.y = 2").unwrap_err().is_type_fault());
    }

    #[test]
    fn test_vm_permissive_attribute_assignment_on_number() {
        let options = VmOptions {
            fault_policy: FaultPolicy::Permissive,
            ..VmOptions::default()
        };
        let (result, vm) = run_with("x = 1\nx.y = 2\nx", options);
        assert_eq!(result.unwrap(), Value::Number(1.0));
        // One fault for the reference, one for storing through Void
        assert_eq!(vm.faults().len(), 2);
    }
}
