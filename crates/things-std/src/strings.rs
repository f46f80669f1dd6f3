//! Members of the string kind: concatenation, lexicographic comparison,
//! byte length, `type`, and assignment.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_STRING};

use crate::{expect_args, member};

pub struct Strings;

impl Package for Strings {
    fn name(&self) -> &str {
        PKG_STRING
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "type" => member(|_recv, args| {
                expect_args(args, 0)?;
                Ok(Value::string("string"))
            }),
            "length" => member(|recv, args| {
                expect_args(args, 0)?;
                let text = receiver(recv)?;
                Ok(Value::integer(text.len() as i64))
            }),
            "=" => member(assign),
            "+" | "<" | "<=" | ">" | ">=" | "==" | "!=" => {
                let op = name.to_string();
                member(move |recv, args| binary(recv, args, &op))
            }
            _ => None,
        }
    }
}

fn receiver(recv: &Value) -> Result<String, Signal> {
    match recv {
        Value::Str(text) => Ok(text.borrow().clone()),
        other => Err(Signal::failure(format!(
            "type mismatch: STRING member on {}",
            other.type_name()
        ))),
    }
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let Value::Str(cell) = recv else {
        return Err(Signal::failure(format!(
            "type mismatch: STRING member on {}",
            recv.type_name()
        )));
    };
    match &args[0] {
        Value::Str(rhs) => {
            let replacement = rhs.borrow().clone();
            *cell.borrow_mut() = replacement;
        }
        other => {
            return Err(Signal::failure(format!(
                "type mismatch: STRING = {}",
                other.type_name()
            )))
        }
    }
    Ok(recv.clone())
}

fn binary(recv: &Value, args: &[Value], op: &str) -> Outcome {
    expect_args(args, 1)?;
    let lhs = receiver(recv)?;
    let Value::Str(rhs) = &args[0] else {
        return Err(Signal::failure(format!(
            "type mismatch: STRING {op} {}",
            args[0].type_name()
        )));
    };
    let rhs = rhs.borrow();
    let value = match op {
        "+" => Value::string(format!("{lhs}{rhs}")),
        "<" => Value::boolean(lhs.as_str() < rhs.as_str()),
        "<=" => Value::boolean(lhs.as_str() <= rhs.as_str()),
        ">" => Value::boolean(lhs.as_str() > rhs.as_str()),
        ">=" => Value::boolean(lhs.as_str() >= rhs.as_str()),
        "==" => Value::boolean(lhs.as_str() == rhs.as_str()),
        "!=" => Value::boolean(lhs.as_str() != rhs.as_str()),
        _ => {
            return Err(Signal::failure(format!(
                "unknown operator: STRING {op} STRING"
            )))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use things_rt::Package;

    fn call(op: &str, lhs: &str, rhs: &str) -> Outcome {
        let member = Strings.member(op).expect("member");
        member(&Value::string(lhs), &[Value::string(rhs)])
    }

    #[test]
    fn concatenation() {
        assert_eq!(call("+", "Hello", " World").unwrap().inspect(), "Hello World");
    }

    #[test]
    fn lexicographic_comparison() {
        assert_eq!(call("<", "abc", "bcd").unwrap().inspect(), "true");
        assert_eq!(call(">", "abc", "bcd").unwrap().inspect(), "false");
        assert_eq!(call("<=", "abc", "abc").unwrap().inspect(), "true");
        assert_eq!(call("==", "abc", "abc").unwrap().inspect(), "true");
        assert_eq!(call("!=", "abc", "abd").unwrap().inspect(), "true");
    }

    #[test]
    fn no_subtraction_member() {
        assert!(Strings.member("-").is_none());
    }

    #[test]
    fn length_counts_bytes() {
        let length = Strings.member("length").unwrap();
        assert_eq!(length(&Value::string("hello"), &[]).unwrap().inspect(), "5");
        // Multibyte content counts bytes, not characters.
        assert_eq!(length(&Value::string("héllo"), &[]).unwrap().inspect(), "6");
    }

    #[test]
    fn mismatched_operand() {
        let err = call_mismatch();
        assert!(matches!(err, Signal::Failure(m) if m == "type mismatch: STRING + INTEGER"));
    }

    fn call_mismatch() -> Signal {
        let member = Strings.member("+").unwrap();
        member(&Value::string("a"), &[Value::integer(1)]).unwrap_err()
    }

    #[test]
    fn assignment_swaps_content() {
        let target = Value::string("old");
        let alias = target.clone();
        let assign = Strings.member("=").unwrap();
        assign(&target, &[Value::string("new")]).unwrap();
        assert_eq!(alias.inspect(), "new");
    }
}
