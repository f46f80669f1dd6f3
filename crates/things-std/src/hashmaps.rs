//! Members of the hashmap kind: keyed indexing, `length`, `type`, and
//! assignment. A missing key reads as `Null`; an unhashable key is an
//! error.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_HASHMAP};

use crate::{expect_args, member};

pub struct HashMaps;

impl Package for HashMaps {
    fn name(&self) -> &str {
        PKG_HASHMAP
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("hashmap"))
            }),
            "length" => member(|recv, args| {
                expect_args(args, 0)?;
                let Value::Map(pairs) = recv else {
                    return Err(type_mismatch(recv));
                };
                let len = pairs.borrow().len();
                Ok(Value::integer(len as i64))
            }),
            "[" => member(index),
            "=" => member(assign),
            _ => None,
        }
    }
}

fn type_mismatch(recv: &Value) -> Signal {
    Signal::failure(format!(
        "type mismatch: HASHMAP member on {}",
        recv.type_name()
    ))
}

fn index(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Map(pairs) = recv else {
        return Err(type_mismatch(recv));
    };
    let key = args[0].hash_key().ok_or_else(|| {
        Signal::failure(format!("unusable as hash key: {}", args[0].type_name()))
    })?;
    let value = pairs
        .borrow()
        .get(&key)
        .map(|pair| pair.value.clone())
        .unwrap_or(Value::Null);
    Ok(value)
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Map(target) = recv else {
        return Err(type_mismatch(recv));
    };
    match &args[0] {
        Value::Map(rhs) => {
            let replacement = rhs.borrow().clone();
            *target.borrow_mut() = replacement;
        }
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: HASHMAP = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}
