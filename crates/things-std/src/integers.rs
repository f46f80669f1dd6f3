//! Members of the integer kind.
//!
//! Arithmetic follows 64-bit two's-complement semantics (wrapping on
//! overflow). A float on the right promotes the whole operation to float,
//! except `%`, which only exists for integers and reports a type mismatch.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_INTEGER};

use crate::{expect_args, member};

pub struct Integers;

impl Package for Integers {
    fn name(&self) -> &str {
        PKG_INTEGER
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("integer"))
            }),
            "=" => member(assign),
            "+" | "-" | "*" | "/" | "%" | "<" | "<=" | ">" | ">=" | "==" | "!=" => {
                let op = name.to_string();
                member(move |recv, args| binary(recv, args, &op))
            }
            _ => None,
        }
    }
}

fn receiver(recv: &Value) -> Result<i64, Signal> {
    match recv {
        Value::Integer(cell) => Ok(cell.get()),
        other => Err(Signal::failure(format!(
            "type mismatch: INTEGER member on {}",
            other.type_name()
        ))),
    }
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Integer(cell) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: INTEGER member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Integer(rhs) => cell.set(rhs.get()),
        Value::Float(rhs) => cell.set(rhs.get() as i64),
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: INTEGER = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}

fn binary(recv: &Value, args: &[Value], op: &str) -> Outcome {
    expect_args(args, 1)?;
    let lhs = receiver(recv)?;
    match &args[0] {
        Value::Integer(rhs) => int_int(lhs, rhs.get(), op),
        Value::Float(_) if op == "%" => {
            Err(Signal::failure("type mismatch: INTEGER % FLOAT"))
        }
        // An integer meeting a float promotes to float arithmetic.
        Value::Float(rhs) => crate::floats::float_float(lhs as f64, rhs.get(), op),
        other => Err(Signal::failure(format!(
            "type mismatch: INTEGER {op} {}",
            other.type_name()
        ))),
    }
}

fn int_int(lhs: i64, rhs: i64, op: &str) -> Outcome {
    let value = match op {
        "+" => Value::integer(lhs.wrapping_add(rhs)),
        "-" => Value::integer(lhs.wrapping_sub(rhs)),
        "*" => Value::integer(lhs.wrapping_mul(rhs)),
        "/" => {
            if rhs == 0 {
                return Err(Signal::failure("division by zero"));
            }
            Value::integer(lhs.wrapping_div(rhs))
        }
        "%" => {
            if rhs == 0 {
                return Err(Signal::failure("division by zero"));
            }
            Value::integer(lhs.wrapping_rem(rhs))
        }
        "<" => Value::boolean(lhs < rhs),
        "<=" => Value::boolean(lhs <= rhs),
        ">" => Value::boolean(lhs > rhs),
        ">=" => Value::boolean(lhs >= rhs),
        "==" => Value::boolean(lhs == rhs),
        "!=" => Value::boolean(lhs != rhs),
        _ => {
            return Err(Signal::failure(format!(
                "unknown operator: INTEGER {op} INTEGER"
            )))
        }
    };
    Ok(value)
}
