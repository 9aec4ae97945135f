//! Bytecode opcodes for the Slate VM.

/// A single bytecode instruction.
///
/// Instructions run front to back. Operands are popped right before left, so
/// a binary operator sees its right operand on top of the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    // --- Constants & Literals ---
    /// Push a constant from the constant pool onto the stack.
    Constant(u16),
    /// Push `Void`.
    Void,

    // --- Stack manipulation ---
    /// Pop the top value off the stack.
    Pop,

    // --- Locals ---
    /// Push the value in a local slot.
    GetLocal(u16),
    /// Push a reference to a local slot (assignment target).
    LocalRef(u16),

    // --- Attributes ---
    /// Pop an object and push the attribute named by a string constant.
    GetAttribute(u16),
    /// Pop an object and push a reference to one of its attributes.
    AttributeRef(u16),

    // --- Assignment ---
    /// Pop a reference, then a value, and write the value through the reference.
    Store,

    // --- Arithmetic ---
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,

    // --- Strings ---
    /// Pop an index and a string; push the character at that position.
    Index,

    // --- Calls ---
    /// Call a free function by function-table index with N arguments.
    CallFunction(u16, u8),
    /// Call a method by name constant. The receiver sits below the N arguments.
    CallMethod(u16, u8),
    /// Create an instance of a class by class-table index and run `__init__`.
    Construct(u16, u8),
    /// Pop the result and return it to the caller.
    Return,
}

impl Op {
    /// Net change in stack height caused by this instruction.
    pub fn stack_effect(&self) -> i32 {
        match self {
            Op::Constant(_) | Op::Void | Op::GetLocal(_) | Op::LocalRef(_) => 1,
            Op::GetAttribute(_) | Op::AttributeRef(_) | Op::Negate => 0,
            Op::Pop | Op::Return => -1,
            Op::Store => -2,
            Op::Add | Op::Subtract | Op::Multiply | Op::Divide | Op::Index => -1,
            Op::CallFunction(_, argc) | Op::Construct(_, argc) => 1 - *argc as i32,
            Op::CallMethod(_, argc) => -(*argc as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_effect_of_calls() {
        assert_eq!(Op::CallFunction(0, 2).stack_effect(), -1);
        assert_eq!(Op::Construct(0, 0).stack_effect(), 1);
        // Receiver and both arguments are replaced by the result
        assert_eq!(Op::CallMethod(0, 2).stack_effect(), -2);
    }

    #[test]
    fn test_store_consumes_value_and_reference() {
        assert_eq!(Op::Store.stack_effect(), -2);
    }
}
