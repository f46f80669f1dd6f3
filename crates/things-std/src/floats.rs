//! Members of the float kind. Integers on the right are promoted; there is
//! no `%` for floats.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_FLOAT};

use crate::{expect_args, member};

pub struct Floats;

impl Package for Floats {
    fn name(&self) -> &str {
        PKG_FLOAT
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("float"))
            }),
            "=" => member(assign),
            "+" | "-" | "*" | "/" | "<" | "<=" | ">" | ">=" | "==" | "!=" => {
                let op = name.to_string();
                member(move |recv, args| binary(recv, args, &op))
            }
            _ => None,
        }
    }
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Float(cell) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: FLOAT member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Float(rhs) => cell.set(rhs.get()),
        Value::Integer(rhs) => cell.set(rhs.get() as f64),
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: FLOAT = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}

fn binary(recv: &Value, args: &[Value], op: &str) -> Outcome {
    expect_args(args, 1)?;
    let Value::Float(lhs) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: FLOAT member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Float(rhs) => float_float(lhs.get(), rhs.get(), op),
        Value::Integer(rhs) => float_float(lhs.get(), rhs.get() as f64, op),
        other => Err(Signal::failure(format!(
            "type mismatch: FLOAT {op} {}",
            other.type_name()
        ))),
    }
}

/// Shared float arithmetic, also used when an integer receiver promotes.
pub(crate) fn float_float(lhs: f64, rhs: f64, op: &str) -> Outcome {
    let value = match op {
        "+" => Value::float(lhs + rhs),
        "-" => Value::float(lhs - rhs),
        "*" => Value::float(lhs * rhs),
        "/" => Value::float(lhs / rhs),
        "<" => Value::boolean(lhs < rhs),
        "<=" => Value::boolean(lhs <= rhs),
        ">" => Value::boolean(lhs > rhs),
        ">=" => Value::boolean(lhs >= rhs),
        "==" => Value::boolean(lhs == rhs),
        "!=" => Value::boolean(lhs != rhs),
        _ => {
            return Err(Signal::failure(format!(
                "unknown operator: FLOAT {op} FLOAT"
            )))
        }
    };
    Ok(value)
}
