//! things-std - Standard library packages for ThingScript.
//!
//! Everything a program can touch beyond the bare evaluator lives here as a
//! [`Package`]:
//!
//! - the per-kind member packages (`$integer`, `$float`, `$boolean`,
//!   `$string`, `$array`, `$hashmap`) that implement the operators, `type`,
//!   `length`, indexing, and the container methods;
//! - the primitives package (the empty name) with the type constructors
//!   `int`, `float`, `string`, `bool`, `array` that back typed `var`
//!   declarations and bare builtin calls;
//! - `fmt` with `println`/`printf`, writing through the writer captured
//!   from the environment at load time;
//! - `time` with `Now()` and the `Time(...)` constructors over an injected
//!   clock.
//!
//! Register the whole set with
//! `env.register_packages(things_std::packages())` after the evaluator's
//! services are installed on the environment.

mod arrays;
mod booleans;
mod floats;
mod fmt;
mod hashmaps;
mod integers;
mod primitives;
mod strings;
mod time;

pub use arrays::Arrays;
pub use booleans::Booleans;
pub use floats::Floats;
pub use fmt::Fmt;
pub use hashmaps::HashMaps;
pub use integers::Integers;
pub use primitives::Primitives;
pub use strings::Strings;
pub use time::{TimePkg, TimeStamp};

use std::rc::Rc;

use things_rt::{MemberFunc, Outcome, Package, Signal, Value};

/// The full standard package set, ready for registration.
pub fn packages() -> Vec<Rc<dyn Package>> {
    vec![
        Rc::new(Primitives),
        Rc::new(Integers),
        Rc::new(Floats),
        Rc::new(Booleans),
        Rc::new(Strings),
        Rc::new(Arrays::default()),
        Rc::new(HashMaps),
        Rc::new(Fmt::default()),
        Rc::new(TimePkg::default()),
    ]
}

/// Wraps a closure as a member lookup result.
pub(crate) fn member(f: impl Fn(&Value, &[Value]) -> Outcome + 'static) -> Option<MemberFunc> {
    Some(Rc::new(f))
}

/// The uniform arity check for members.
pub(crate) fn expect_args(args: &[Value], want: usize) -> Result<(), Signal> {
    if args.len() != want {
        return Err(Signal::failure(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )));
    }
    Ok(())
}
