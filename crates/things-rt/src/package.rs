//! Package and foreign-value contracts, and the member dispatch convention.
//!
//! A *member* is a named callable attached to a value kind. The single
//! `member(name) -> Option<MemberFunc>` lookup implements field access
//! (`x.length`), method calls (`x.push(v)`), binary operators (`a + b`
//! invokes `a`'s `"+"` member with `b`), indexing (`a[i]` invokes `"["`),
//! and in-place assignment (`"="`). A `None` lookup is the host-level
//! "not applicable" that the evaluator turns into `unknown operator` or
//! `function ... not found` errors.

use std::rc::Rc;

use crate::environment::Environment;
use crate::outcome::Outcome;
use crate::value::Value;

/// A member callable: receiver plus positional arguments.
pub type MemberFunc = Rc<dyn Fn(&Value, &[Value]) -> Outcome>;

/// A named bundle of members, reachable via `import("name")`, qualified
/// access (`pkg.member(...)`), and — for the per-kind packages — the
/// environment's member routing.
pub trait Package {
    /// The package name programs import. The empty name is reserved for the
    /// primitives package carrying the type constructors.
    fn name(&self) -> &str;

    /// Called once at registration so the package can capture
    /// environment-provided services (writer, clock, function application).
    fn on_load(&self, env: &Environment) {
        let _ = env;
    }

    fn member(&self, name: &str) -> Option<MemberFunc>;
}

/// A host value kind defined outside the core value model (for example the
/// `time` package's instant). Dispatches its own members.
pub trait Foreign {
    fn type_name(&self) -> &'static str;
    fn inspect(&self) -> String;
    fn member(&self, name: &str) -> Option<MemberFunc>;
    /// Concrete-type access for members that operate on their own kind.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Registry name of the primitives (type constructor) package.
pub const PKG_PRIMITIVES: &str = "";
/// Registry names of the per-kind member packages. The `$` prefix keeps
/// them out of reach of `import`, which only sees program-visible names.
pub const PKG_INTEGER: &str = "$integer";
pub const PKG_FLOAT: &str = "$float";
pub const PKG_BOOLEAN: &str = "$boolean";
pub const PKG_STRING: &str = "$string";
pub const PKG_ARRAY: &str = "$array";
pub const PKG_HASHMAP: &str = "$hashmap";

/// The registry name of the package carrying a primitive value's members.
pub fn kind_package_name(value: &Value) -> Option<&'static str> {
    match value {
        Value::Integer(_) => Some(PKG_INTEGER),
        Value::Float(_) => Some(PKG_FLOAT),
        Value::Boolean(_) => Some(PKG_BOOLEAN),
        Value::Str(_) => Some(PKG_STRING),
        Value::Array(_) => Some(PKG_ARRAY),
        Value::Map(_) => Some(PKG_HASHMAP),
        _ => None,
    }
}
