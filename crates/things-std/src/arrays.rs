//! Members of the array kind.
//!
//! `head`, `tail`, `init`, `last`, and `push` are functional: they read the
//! receiver and build fresh arrays, never mutating in place. The only
//! mutating member is `=`, which swaps the receiver's contents. `foreach`
//! drives a two-parameter user function through the injected application
//! hook, visiting elements in insertion order.

use std::cell::RefCell;

use things_rt::{
    ApplyFn, Environment, MemberFunc, Outcome, Package, Signal, Value, PKG_ARRAY,
};

use crate::{expect_args, member};

#[derive(Default)]
pub struct Arrays {
    /// Function-application hook captured at load time.
    apply: RefCell<Option<ApplyFn>>,
}

impl Package for Arrays {
    fn name(&self) -> &str {
        PKG_ARRAY
    }

    fn on_load(&self, env: &Environment) {
        *self.apply.borrow_mut() = env.apply();
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("array"))
            }),
            "length" => member(|recv, args| {
                expect_args(args, 0)?;
                Ok(Value::integer(elements(recv)?.len() as i64))
            }),
            "[" => member(index),
            "head" => member(|recv, args| {
                expect_args(args, 0)?;
                Ok(elements(recv)?.first().cloned().unwrap_or(Value::Null))
            }),
            "last" => member(|recv, args| {
                expect_args(args, 0)?;
                Ok(elements(recv)?.last().cloned().unwrap_or(Value::Null))
            }),
            "tail" => member(|recv, args| {
                expect_args(args, 0)?;
                let elements = elements(recv)?;
                if elements.is_empty() {
                    return Ok(Value::Null);
                }
                Ok(Value::array(elements[1..].to_vec()))
            }),
            "init" => member(|recv, args| {
                expect_args(args, 0)?;
                let elements = elements(recv)?;
                if elements.is_empty() {
                    return Ok(Value::Null);
                }
                Ok(Value::array(elements[..elements.len() - 1].to_vec()))
            }),
            "push" => member(|recv, args| {
                expect_args(args, 1)?;
                let mut elements = elements(recv)?;
                elements.push(args[0].clone());
                Ok(Value::array(elements))
            }),
            "foreach" => {
                let apply = self.apply.borrow().clone();
                member(move |recv, args| foreach(recv, args, apply.as_ref()))
            }
            "=" => member(assign),
            _ => None,
        }
    }
}

/// Snapshot of the receiver's elements. The element handles still alias the
/// stored values; only the container is copied.
fn elements(recv: &Value) -> Result<Vec<Value>, Signal> {
    match recv {
        Value::Array(elements) => Ok(elements.borrow().clone()),
        other => Err(Signal::failure(format!(
            "type mismatch: ARRAY member on {}",
            other.type_name()
        ))),
    }
}

fn index(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let elements = elements(recv)?;
    let Value::Integer(idx) = &args[0] else {
        return Err(Signal::failure(format!(
            "type mismatch: ARRAY [ {}",
            args[0].type_name()
        )));
    };
    let idx = idx.get();
    if idx < 0 {
        return Ok(Value::Null);
    }
    Ok(elements.get(idx as usize).cloned().unwrap_or(Value::Null))
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Array(target) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: ARRAY member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Array(rhs) => {
            let replacement = rhs.borrow().clone();
            *target.borrow_mut() = replacement;
        }
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: ARRAY = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}

/// Calls `fn(index, element)` for each element in insertion order. A
/// `break` from the callback stops the walk; `return` and errors keep
/// unwinding so they reach the surrounding function.
fn foreach(recv: &Value, args: &[Value], apply: Option<&ApplyFn>) -> Outcome {
    expect_args(args, 1)?;
    let Value::Function(callback) = &args[0] else {
        return Err(Signal::failure(format!(
            "not a function: {}",
            args[0].type_name()
        )));
    };
    if callback.parameters.len() != 2 {
        return Err(Signal::failure(format!(
            "wrong number of arguments. got={}, want=2",
            callback.parameters.len()
        )));
    }
    let apply = apply.ok_or_else(|| {
        Signal::failure("foreach is not available without an evaluator")
    })?;
    for (i, element) in elements(recv)?.into_iter().enumerate() {
        match apply(&args[0], &[Value::integer(i as i64), element]) {
            Err(Signal::Break) => break,
            Err(signal) => return Err(signal),
            Ok(_) => {}
        }
    }
    Ok(Value::Null)
}
