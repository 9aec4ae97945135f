//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::chunk::ClassStruct;

/// A shared, mutable heap object.
pub type ObjectRef = Rc<RefCell<Object>>;

/// A value on the VM stack.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f32),
    String(String),
    Object(ObjectRef),
    /// Reference to an absolute position on the value stack.
    StackLValue(usize),
    /// Reference to an attribute of a heap object.
    HeapLValue { object: ObjectRef, attribute: String },
    Void,
}

impl Value {
    pub fn type_name(&self) -> String {
        match self {
            Value::Number(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Object(o) => o.borrow().class.name.clone(),
            Value::StackLValue(_) | Value::HeapLValue { .. } => "reference".to_string(),
            Value::Void => "void".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // Objects have identity
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::StackLValue(a), Value::StackLValue(b)) => a == b,
            (
                Value::HeapLValue {
                    object: a,
                    attribute: x,
                },
                Value::HeapLValue {
                    object: b,
                    attribute: y,
                },
            ) => Rc::ptr_eq(a, b) && x == y,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(o) => write!(f, "{}", o.borrow()),
            Value::StackLValue(index) => write!(f, "<stack slot {}>", index),
            Value::HeapLValue { attribute, .. } => write!(f, "<attribute {}>", attribute),
            Value::Void => write!(f, "void"),
        }
    }
}

/// An instance of a class.
#[derive(Debug)]
pub struct Object {
    pub class: Rc<ClassStruct>,
    pub attributes: IndexMap<String, Value>,
}

impl Object {
    pub fn new(class: Rc<ClassStruct>) -> Self {
        Self {
            class,
            attributes: IndexMap::new(),
        }
    }

    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Read an attribute, creating it as `Void` if it does not exist yet.
    pub fn get_or_create(&mut self, name: &str) -> Value {
        self.attributes
            .entry(name.to_string())
            .or_insert(Value::Void)
            .clone()
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.class.name)?;
        for (i, (name, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Value::String(s) => write!(f, "{}={:?}", name, s)?,
                // Not expanded: attributes can form cycles
                Value::Object(o) => write!(f, "{}=<{}>", name, o.borrow().class.name)?,
                other => write!(f, "{}={}", name, other)?,
            }
        }
        write!(f, ")")
    }
}
