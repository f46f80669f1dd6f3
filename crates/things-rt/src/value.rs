//! Runtime values.
//!
//! Every variant that can be rebound holds its payload behind a shared
//! handle (`Rc<Cell<_>>` for copyable primitives, `Rc<RefCell<_>>` for
//! strings and containers). `Clone` therefore clones the handle: two
//! bindings of the same value alias, which is what makes the in-place `=`
//! member observable through both.
//!
//! Hashmap keys are pre-hashed into [`HashKey`] pairs of a kind tag and a
//! 64-bit hash. Only integers, floats, booleans, and strings are hashable.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use things_par::{BlockStatement, Identifier};

use crate::environment::Environment;
use crate::outcome::Outcome;
use crate::package::{Foreign, Package};

/// A ThingScript runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Integer(Rc<Cell<i64>>),
    Float(Rc<Cell<f64>>),
    Boolean(Rc<Cell<bool>>),
    Str(Rc<RefCell<String>>),
    Array(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<IndexMap<HashKey, MapPair>>>),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinValue),
    Package(Rc<dyn Package>),
    Foreign(Rc<dyn Foreign>),
}

/// A user-defined function: parameters, body, and the environment captured
/// at the point the literal was evaluated (lexical scoping).
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Rc<Environment>,
    /// Diagnostic name stamped by `var f = func(...)`; empty if anonymous.
    pub name: String,
}

/// A native function exposed to programs (`import`, the primitive
/// constructors).
#[derive(Clone)]
pub struct BuiltinValue(pub Rc<dyn Fn(&[Value]) -> Outcome>);

impl fmt::Debug for BuiltinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("builtin")
    }
}

/// A key/value pair stored in a hashmap, keeping the original key value for
/// rendering.
#[derive(Clone)]
pub struct MapPair {
    pub key: Value,
    pub value: Value,
}

/// Kind tag of a [`HashKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Int,
    Float,
    Bool,
    Str,
}

/// A pre-hashed hashmap key: the value's kind and a 64-bit hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: HashKind,
    pub hash: u64,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl Value {
    pub fn integer(value: i64) -> Self {
        Value::Integer(Rc::new(Cell::new(value)))
    }

    pub fn float(value: f64) -> Self {
        Value::Float(Rc::new(Cell::new(value)))
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean(Rc::new(Cell::new(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::Str(Rc::new(RefCell::new(value.into())))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn map(pairs: IndexMap<HashKey, MapPair>) -> Self {
        Value::Map(Rc::new(RefCell::new(pairs)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The uppercase type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "HASHMAP",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Package(_) => "PACKAGE",
            Value::Foreign(foreign) => foreign.type_name(),
        }
    }

    /// Renders the value for display by the driver and `fmt`.
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Integer(cell) => cell.get().to_string(),
            Value::Float(cell) => format_float(cell.get()),
            Value::Boolean(cell) => cell.get().to_string(),
            Value::Str(text) => text.borrow().clone(),
            Value::Array(elements) => {
                let rendered: Vec<String> =
                    elements.borrow().iter().map(Value::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Map(pairs) => {
                let rendered: Vec<String> = pairs
                    .borrow()
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(function) => {
                let params: Vec<String> = function
                    .parameters
                    .iter()
                    .map(|p| p.value.clone())
                    .collect();
                format!("func({}) {{\n{}\n}}", params.join(", "), function.body)
            }
            Value::Builtin(_) => "builtin".to_string(),
            Value::Package(package) => format!("import({:?})", package.name()),
            Value::Foreign(foreign) => foreign.inspect(),
        }
    }

    /// The pre-hashed key for this value, if it is hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(cell) => Some(HashKey {
                kind: HashKind::Int,
                hash: cell.get() as u64,
            }),
            Value::Boolean(cell) => Some(HashKey {
                kind: HashKind::Bool,
                hash: u64::from(cell.get()),
            }),
            Value::Float(cell) => Some(HashKey {
                kind: HashKind::Float,
                hash: fnv1a(&cell.get().to_bits().to_be_bytes()),
            }),
            Value::Str(text) => Some(HashKey {
                kind: HashKind::Str,
                hash: fnv1a(text.borrow().as_bytes()),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.inspect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

/// Floats render with a decimal point even when integral, so `6.0` stays
/// distinguishable from the integer `6`.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_alias_their_payload() {
        let a = Value::integer(1);
        let b = a.clone();
        if let Value::Integer(cell) = &a {
            cell.set(42);
        }
        assert_eq!(b.inspect(), "42");
    }

    #[test]
    fn inspect_forms() {
        assert_eq!(Value::Null.inspect(), "null");
        assert_eq!(Value::integer(-3).inspect(), "-3");
        assert_eq!(Value::float(6.0).inspect(), "6.0");
        assert_eq!(Value::float(3.25).inspect(), "3.25");
        assert_eq!(Value::boolean(true).inspect(), "true");
        assert_eq!(Value::string("hi").inspect(), "hi");
        assert_eq!(
            Value::array(vec![Value::integer(1), Value::string("x")]).inspect(),
            "[1, x]"
        );
    }

    #[test]
    fn string_hash_keys_agree_by_content() {
        let a = Value::string("Hello World");
        let b = Value::string("Hello World");
        let c = Value::string("other");
        assert_eq!(a.hash_key(), b.hash_key());
        assert_ne!(a.hash_key(), c.hash_key());
    }

    #[test]
    fn float_hash_keys_agree_by_bit_pattern() {
        let a = Value::float(1.5);
        let b = Value::float(1.5);
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn integer_and_float_keys_do_not_collide_on_kind() {
        let i = Value::integer(1).hash_key().unwrap();
        let f = Value::float(1.0).hash_key().unwrap();
        assert_ne!(i.kind, f.kind);
    }

    #[test]
    fn boolean_keys() {
        assert_eq!(Value::boolean(true).hash_key().unwrap().hash, 1);
        assert_eq!(Value::boolean(false).hash_key().unwrap().hash, 0);
    }

    #[test]
    fn only_primitives_hash() {
        assert!(Value::Null.hash_key().is_none());
        assert!(Value::array(vec![]).hash_key().is_none());
    }
}
