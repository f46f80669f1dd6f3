//! things-rt - Runtime value model for ThingScript.
//!
//! This crate holds everything the evaluator and the standard library share:
//!
//! - [`Value`], the tagged runtime value. Primitives and containers are
//!   reference-counted cells, so cloning a value clones a handle and
//!   bindings alias: the in-place assignment member (`=`) is observable
//!   through every binding of the same value.
//! - [`Outcome`] and [`Signal`], the evaluator's result type. `Return`,
//!   `Break`, and failures travel on the `Err` side so the compiler forces
//!   every evaluation site to either propagate or consume them; no sentinel
//!   can be stored in an environment or a container.
//! - [`Package`] and [`Foreign`], the contracts the standard library and
//!   host extensions implement, and [`MemberFunc`], the uniform callable
//!   behind field access, method calls, operators, and indexing.
//! - [`Environment`], the lexical scope chain with the package registry and
//!   the injected services (output writer, clock, function application).

mod environment;
mod outcome;
mod package;
mod value;

// Map values store their pairs in an insertion-ordered map; consumers that
// build maps need the same type.
pub use indexmap;

pub use environment::{ApplyFn, Clock, Environment, SharedWriter};
pub use outcome::{unwrap_return, Outcome, Signal};
pub use package::{
    kind_package_name, Foreign, MemberFunc, Package, PKG_ARRAY, PKG_BOOLEAN, PKG_FLOAT,
    PKG_HASHMAP, PKG_INTEGER, PKG_PRIMITIVES, PKG_STRING,
};
pub use value::{BuiltinValue, FunctionValue, HashKey, HashKind, MapPair, Value};
