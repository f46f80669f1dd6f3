//! Lexical environments, the package registry, and injected services.
//!
//! An environment maps names to values and optionally points at a parent.
//! `get` searches the local map, then the parent chain, and finally falls
//! through to the registered packages, so a package name used as an
//! identifier resolves to its package value. `set` writes to the local map
//! only; shadowing is intentional and there is no "set in enclosing scope"
//! operation.
//!
//! The environment also carries the three services the standard library
//! captures at `on_load` time: the output writer (`fmt`), the clock
//! (`time`), and the function-application hook (`array.foreach`). They are
//! configured once, before package registration, and stay fixed for the
//! environment's lifetime.

use std::cell::RefCell;
use std::io::Write;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::outcome::{Outcome, Signal};
use crate::package::{MemberFunc, Package, PKG_PRIMITIVES};
use crate::value::{BuiltinValue, Value};

/// Shared handle to the writer `fmt` prints through.
pub type SharedWriter = Rc<RefCell<dyn Write>>;

/// Clock service: returns the current instant as epoch nanoseconds.
pub type Clock = Rc<dyn Fn() -> i64>;

/// Function-application hook installed by the evaluator so packages can
/// call user functions. Returns the raw outcome, before any
/// `return`-unwrapping, so callers decide how signals propagate.
pub type ApplyFn = Rc<dyn Fn(&Value, &[Value]) -> Outcome>;

/// One scope in the environment chain.
#[derive(Default)]
pub struct Environment {
    store: RefCell<FxHashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
    packages: RefCell<FxHashMap<String, Rc<dyn Package>>>,
    stdout: RefCell<Option<SharedWriter>>,
    clock: RefCell<Option<Clock>>,
    apply: RefCell<Option<ApplyFn>>,
    /// Back-reference to this scope's own `Rc`, for builtins that resolve
    /// against the environment at call time. A weak handle keeps a stored
    /// `import` value from pinning its own environment alive.
    weak_self: RefCell<Weak<Environment>>,
}

impl Environment {
    /// A fresh root environment.
    pub fn new() -> Rc<Self> {
        Self::wrap(Self::default())
    }

    /// A child scope of `outer`. Lookups fall back to the parent; writes
    /// stay local.
    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Self> {
        Self::wrap(Self {
            outer: Some(outer),
            ..Self::default()
        })
    }

    fn wrap(env: Environment) -> Rc<Self> {
        let env = Rc::new(env);
        *env.weak_self.borrow_mut() = Rc::downgrade(&env);
        env
    }

    /// Looks `name` up through the scope chain, falling through to the
    /// registered packages.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(outer) = &self.outer {
            return outer.get(name);
        }
        self.import(name).map(Value::Package)
    }

    /// Binds `name` in this scope only.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.store.borrow_mut().insert(name.into(), value);
    }

    // =========================================================================
    // Package registry
    // =========================================================================

    /// Registers packages, invoking each package's `on_load` so it can
    /// capture services. Registration happens on the environment it is
    /// called on (normally the root).
    pub fn register_packages(&self, packages: impl IntoIterator<Item = Rc<dyn Package>>) {
        for package in packages {
            package.on_load(self);
            self.packages
                .borrow_mut()
                .insert(package.name().to_string(), package);
        }
    }

    /// Finds a registered package by name, walking the parent chain.
    pub fn import(&self, name: &str) -> Option<Rc<dyn Package>> {
        if let Some(package) = self.packages.borrow().get(name) {
            return Some(package.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.import(name))
    }

    /// Resolves the member `name` on `value`: packages and foreign values
    /// dispatch themselves, primitive kinds route through their registered
    /// per-kind package.
    pub fn member_of(&self, value: &Value, name: &str) -> Option<MemberFunc> {
        match value {
            Value::Package(package) => package.member(name),
            Value::Foreign(foreign) => foreign.member(name),
            other => crate::package::kind_package_name(other)
                .and_then(|pkg| self.import(pkg))
                .and_then(|package| package.member(name)),
        }
    }

    /// Resolves a builtin by name.
    ///
    /// `import` resolves registered packages at call time; any other name is
    /// looked up in the primitives package and wrapped as a closure that
    /// invokes the member with a null receiver.
    pub fn builtin(&self, name: &str) -> Option<BuiltinValue> {
        if name == "import" {
            let env = self.weak_self.borrow().clone();
            return Some(BuiltinValue(Rc::new(move |args: &[Value]| {
                import_builtin(&env, args)
            })));
        }
        let member = self.import(PKG_PRIMITIVES)?.member(name)?;
        Some(BuiltinValue(Rc::new(move |args: &[Value]| {
            member(&Value::Null, args)
        })))
    }

    /// Resolves a typed `var` declaration (`var x int = ...`,
    /// `var t time.Time`): finds the named package member and invokes it
    /// with the initial value, or with no argument when there is none.
    pub fn type_member(&self, pkg: &str, name: &str, initial: Option<&Value>) -> Outcome {
        let qualified = if pkg.is_empty() {
            name.to_string()
        } else {
            format!("{pkg}.{name}")
        };
        let member = self
            .import(pkg)
            .and_then(|package| package.member(name))
            .ok_or_else(|| Signal::failure(format!("unknown {qualified:?}")))?;
        match initial {
            Some(value) => member(&Value::Null, std::slice::from_ref(value)),
            None => member(&Value::Null, &[]),
        }
    }

    // =========================================================================
    // Injected services
    // =========================================================================

    /// Sets the writer `fmt` captures at `on_load`.
    pub fn set_stdout(&self, writer: SharedWriter) {
        *self.stdout.borrow_mut() = Some(writer);
    }

    pub fn stdout(&self) -> Option<SharedWriter> {
        if let Some(writer) = self.stdout.borrow().as_ref() {
            return Some(writer.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.stdout())
    }

    /// Sets the clock `time` captures at `on_load`.
    pub fn set_clock(&self, clock: Clock) {
        *self.clock.borrow_mut() = Some(clock);
    }

    pub fn clock(&self) -> Option<Clock> {
        if let Some(clock) = self.clock.borrow().as_ref() {
            return Some(clock.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.clock())
    }

    /// Installs the function-application hook. The evaluator does this once
    /// per root environment, before packages are registered.
    pub fn set_apply(&self, apply: ApplyFn) {
        *self.apply.borrow_mut() = Some(apply);
    }

    pub fn apply(&self) -> Option<ApplyFn> {
        if let Some(apply) = self.apply.borrow().as_ref() {
            return Some(apply.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.apply())
    }
}

fn import_builtin(env: &Weak<Environment>, args: &[Value]) -> Outcome {
    if args.len() != 1 {
        return Err(Signal::failure(format!(
            "wrong number of arguments. got={}, want=1",
            args.len()
        )));
    }
    let Value::Str(name) = &args[0] else {
        return Err(Signal::failure(format!(
            "argument to import must be string, got {}",
            args[0].type_name()
        )));
    };
    let name = name.borrow().clone();
    let package = env
        .upgrade()
        .and_then(|env| env.import(&name))
        .ok_or_else(|| Signal::failure(format!("package {name:?} not found")))?;
    Ok(Value::Package(package))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Signal;
    use crate::package::MemberFunc;
    use std::rc::Rc;

    struct EchoPackage {
        name: &'static str,
    }

    impl Package for EchoPackage {
        fn name(&self) -> &str {
            self.name
        }

        fn member(&self, name: &str) -> Option<MemberFunc> {
            if name == "echo" {
                let member: MemberFunc =
                    Rc::new(|_recv, args| Ok(args.first().cloned().unwrap_or(Value::Null)));
                return Some(member);
            }
            None
        }
    }

    fn env_with(name: &'static str) -> Rc<Environment> {
        let env = Environment::new();
        env.register_packages([Rc::new(EchoPackage { name }) as Rc<dyn Package>]);
        env
    }

    #[test]
    fn enclosed_environment_reads_outer_bindings() {
        let outer = Environment::new();
        outer.set("my_var", Value::integer(123));
        let inner = Environment::new_enclosed(outer);
        assert_eq!(inner.get("my_var").unwrap().inspect(), "123");
    }

    #[test]
    fn set_shadows_without_touching_outer() {
        let outer = Environment::new();
        outer.set("x", Value::integer(1));
        let inner = Environment::new_enclosed(outer.clone());
        inner.set("x", Value::integer(2));
        assert_eq!(inner.get("x").unwrap().inspect(), "2");
        assert_eq!(outer.get("x").unwrap().inspect(), "1");
    }

    #[test]
    fn get_falls_through_to_packages() {
        let env = env_with("pkg");
        let value = env.get("pkg").expect("package should resolve as a value");
        assert!(matches!(value, Value::Package(_)));
        assert!(env.get("other").is_none());
    }

    #[test]
    fn import_walks_the_chain() {
        let root = env_with("pkg");
        let inner = Environment::new_enclosed(root);
        assert!(inner.import("pkg").is_some());
        assert!(inner.import("missing").is_none());
    }

    #[test]
    fn import_builtin_resolves_packages() {
        let env = env_with("pkg");
        let builtin = env.builtin("import").expect("import builtin");
        let value = (builtin.0)(&[Value::string("pkg")]).unwrap();
        assert!(matches!(value, Value::Package(_)));

        let err = (builtin.0)(&[Value::string("nope")]).unwrap_err();
        match err {
            Signal::Failure(message) => {
                assert_eq!(message, "package \"nope\" not found");
            }
            other => panic!("unexpected signal: {other:?}"),
        }
    }

    #[test]
    fn import_builtin_checks_arity_and_type() {
        let env = env_with("pkg");
        let builtin = env.builtin("import").unwrap();
        let err = (builtin.0)(&[]).unwrap_err();
        assert!(matches!(err, Signal::Failure(m) if m.contains("wrong number of arguments")));
        let err = (builtin.0)(&[Value::integer(1)]).unwrap_err();
        assert!(matches!(err, Signal::Failure(m) if m.contains("must be string")));
    }

    #[test]
    fn type_member_reports_unknown_names() {
        let env = Environment::new();
        let err = env.type_member("time", "Time", None).unwrap_err();
        assert!(matches!(err, Signal::Failure(m) if m == "unknown \"time.Time\""));
    }

    #[test]
    fn member_of_routes_through_kind_packages() {
        struct IntPkg;
        impl Package for IntPkg {
            fn name(&self) -> &str {
                crate::package::PKG_INTEGER
            }
            fn member(&self, name: &str) -> Option<MemberFunc> {
                (name == "type").then(|| {
                    let member: MemberFunc = Rc::new(|_r, _a| Ok(Value::string("integer")));
                    member
                })
            }
        }
        let env = Environment::new();
        env.register_packages([Rc::new(IntPkg) as Rc<dyn Package>]);
        let member = env.member_of(&Value::integer(5), "type").expect("member");
        assert_eq!(member(&Value::integer(5), &[]).unwrap().inspect(), "integer");
        assert!(env.member_of(&Value::integer(5), "nope").is_none());
        assert!(env.member_of(&Value::Null, "type").is_none());
    }
}
