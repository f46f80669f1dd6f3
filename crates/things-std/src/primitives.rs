//! The primitives package: type constructors under the reserved empty
//! package name.
//!
//! These back two surfaces. Typed `var` declarations route through
//! `Environment::type_member` (`var x int = 5` invokes `int` with `5`;
//! `var x int` invokes it with nothing and gets the zero value). Bare
//! identifier lookups route through `Environment::builtin`, which wraps a
//! constructor as a callable with a null receiver, so programs can write
//! `int("42")`.

use things_rt::{MemberFunc, Outcome, Package, Signal, Value, PKG_PRIMITIVES};

use crate::member;

pub struct Primitives;

impl Package for Primitives {
    fn name(&self) -> &str {
        PKG_PRIMITIVES
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "int" => member(construct_int),
            "float" => member(construct_float),
            "string" => member(construct_string),
            "bool" => member(construct_bool),
            "array" => member(construct_array),
            _ => None,
        }
    }
}

fn single(args: &[Value]) -> Result<Option<&Value>, Signal> {
    match args.len() {
        0 => Ok(None),
        1 => Ok(Some(&args[0])),
        n => Err(Signal::failure(format!(
            "wrong number of arguments. got={n}, want=1"
        ))),
    }
}

fn construct_int(_recv: &Value, args: &[Value]) -> Outcome {
    let value = match single(args)? {
        None => Value::integer(0),
        Some(Value::Integer(_)) => args[0].clone(),
        Some(Value::Float(cell)) => Value::integer(cell.get() as i64),
        Some(Value::Str(text)) => {
            let text = text.borrow();
            match text.parse::<i64>() {
                Ok(parsed) => Value::integer(parsed),
                Err(_) => {
                    return Err(Signal::failure(format!(
                        "could not parse {:?} as integer",
                        text.as_str()
                    )))
                }
            }
        }
        Some(other) => {
            return Err(Signal::failure(format!(
                "could not convert {} to integer",
                other.type_name()
            )))
        }
    };
    Ok(value)
}

fn construct_float(_recv: &Value, args: &[Value]) -> Outcome {
    let value = match single(args)? {
        None => Value::float(0.0),
        Some(Value::Float(_)) => args[0].clone(),
        Some(Value::Integer(cell)) => Value::float(cell.get() as f64),
        Some(Value::Str(text)) => {
            let text = text.borrow();
            match text.parse::<f64>() {
                Ok(parsed) => Value::float(parsed),
                Err(_) => {
                    return Err(Signal::failure(format!(
                        "could not parse {:?} as float",
                        text.as_str()
                    )))
                }
            }
        }
        Some(other) => {
            return Err(Signal::failure(format!(
                "could not convert {} to float",
                other.type_name()
            )))
        }
    };
    Ok(value)
}

fn construct_string(_recv: &Value, args: &[Value]) -> Outcome {
    let value = match single(args)? {
        None => Value::string(""),
        Some(Value::Str(_)) => args[0].clone(),
        Some(other) => Value::string(other.inspect()),
    };
    Ok(value)
}

fn construct_bool(_recv: &Value, args: &[Value]) -> Outcome {
    let value = match single(args)? {
        None => Value::boolean(false),
        Some(Value::Boolean(_)) => args[0].clone(),
        Some(other) => {
            return Err(Signal::failure(format!(
                "could not convert {} to boolean",
                other.type_name()
            )))
        }
    };
    Ok(value)
}

fn construct_array(_recv: &Value, args: &[Value]) -> Outcome {
    let value = match single(args)? {
        None => Value::array(Vec::new()),
        Some(Value::Array(_)) => args[0].clone(),
        Some(other) => {
            return Err(Signal::failure(format!(
                "could not convert {} to array",
                other.type_name()
            )))
        }
    };
    Ok(value)
}
