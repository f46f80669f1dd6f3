//! Members of the boolean kind: `=`, `==`, `!=`, and `type` only. Any
//! other operator is unknown for booleans.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_BOOLEAN};

use crate::{expect_args, member};

pub struct Booleans;

impl Package for Booleans {
    fn name(&self) -> &str {
        PKG_BOOLEAN
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("boolean"))
            }),
            "=" => member(assign),
            "==" | "!=" => {
                let negate = name == "!=";
                member(move |recv, args| compare(recv, args, negate))
            }
            _ => None,
        }
    }
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Boolean(cell) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: BOOLEAN member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Boolean(rhs) => cell.set(rhs.get()),
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: BOOLEAN = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}

fn compare(recv: &Value, args: &[Value], negate: bool) -> Outcome {
    expect_args(args, 1)?;
    let Value::Boolean(lhs) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: BOOLEAN member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Boolean(rhs) => {
            let equal = lhs.get() == rhs.get();
            Ok(Value::boolean(equal != negate))
        }
        other => Err(Signal::failure(format!(
            "type mismatch: BOOLEAN {} {}",
            if negate { "!=" } else { "==" },
            other.type_name()
        ))),
    }
}
