//! things-eval - Tree-walking evaluator for ThingScript.
//!
//! A single recursive descent over the AST, dispatched by node kind. Every
//! evaluation returns an [`Outcome`]; `return`, `break`, and runtime errors
//! travel on the `Err` side and unwind through `?` until a bounding
//! construct consumes them: loops consume `Break`, function application
//! unwraps `Return`, and failures surface as the program result.
//!
//! Operator, index, method, and field dispatch all route through the value
//! model's member convention: `a + b` invokes `a`'s `"+"` member with `b`,
//! `a[i]` invokes `"["`, `x.name` invokes `name` with no arguments. The
//! member tables live in the standard library packages registered on the
//! environment; the evaluator itself only knows the routing rule.
//!
//! Call [`install`] on a root environment before registering packages so
//! the library's `foreach` can apply user functions.

mod edge_cases;

use std::rc::Rc;

use things_par::{
    AccessExpression, BlockStatement, CallExpression, Expression, HashLiteral, IfExpression,
    Program, Statement, VarStatement,
};
use things_rt::indexmap::IndexMap;
use things_rt::{
    unwrap_return, Environment, FunctionValue, MapPair, Outcome, Signal, Value,
};

/// Installs the function-application hook on a root environment. Packages
/// capture it at `on_load`, so call this before `register_packages`.
pub fn install(env: &Rc<Environment>) {
    env.set_apply(Rc::new(apply_raw));
}

/// Evaluates a program. `Return` unwraps to its value, a stray `Break`
/// quietly ends the program with `Null`, and failures are the caller's to
/// surface.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Outcome {
    let mut result = Value::Null;
    for statement in &program.statements {
        result = match eval_statement(statement, env) {
            Ok(value) => value,
            Err(Signal::Return(value)) => return Ok(value),
            Err(Signal::Break) => return Ok(Value::Null),
            Err(failure) => return Err(failure),
        };
    }
    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Outcome {
    match statement {
        Statement::Var(stmt) => eval_var_statement(stmt, env),
        Statement::Assign(stmt) => {
            let left = env.get(&stmt.name.value).ok_or_else(|| {
                Signal::failure(format!("identifier not found: {}", stmt.name.value))
            })?;
            let right = eval_expression(&stmt.value, env)?;
            assign(env, &left, &right)
        }
        Statement::OperAssign(stmt) => {
            let left = env.get(&stmt.name.value).ok_or_else(|| {
                Signal::failure(format!("identifier not found: {}", stmt.name.value))
            })?;
            let right = eval_expression(&stmt.value, env)?;
            let combined = eval_infix(env, &stmt.operator, &left, &right)?;
            assign(env, &left, &combined)
        }
        Statement::Return(stmt) => {
            let value = match &stmt.value {
                Some(expression) => eval_expression(expression, env)?,
                None => Value::Null,
            };
            Err(Signal::Return(value))
        }
        Statement::Break(_) => Err(Signal::Break),
        Statement::Function(stmt) => {
            let function = Value::Function(Rc::new(FunctionValue {
                parameters: stmt.parameters.clone(),
                body: Rc::new(stmt.body.clone()),
                env: env.clone(),
                name: stmt.name.value.clone(),
            }));
            env.set(stmt.name.value.clone(), function);
            Ok(Value::Null)
        }
        Statement::Block(block) => eval_block(block, env),
        Statement::Expression(stmt) => eval_expression(&stmt.expression, env),
    }
}

/// The value of a block is the value of its last statement. Signals
/// short-circuit via `?`.
fn eval_block(block: &BlockStatement, env: &Rc<Environment>) -> Outcome {
    let mut result = Value::Null;
    for statement in &block.statements {
        result = eval_statement(statement, env)?;
    }
    Ok(result)
}

fn eval_var_statement(stmt: &VarStatement, env: &Rc<Environment>) -> Outcome {
    let value = match (&stmt.decl, &stmt.value) {
        (None, Some(expression)) => eval_expression(expression, env)?,
        (Some(decl), initializer) => {
            let pkg = decl
                .package
                .as_ref()
                .map(|ident| ident.value.as_str())
                .unwrap_or("");
            match initializer {
                Some(expression) => {
                    let initial = eval_expression(expression, env)?;
                    env.type_member(pkg, &decl.name.value, Some(&initial))?
                }
                None => env.type_member(pkg, &decl.name.value, None)?,
            }
        }
        (None, None) => Value::Null,
    };
    env.set(stmt.name.value.clone(), value);
    Ok(Value::Null)
}

fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Outcome {
    match expression {
        Expression::Identifier(ident) => eval_identifier(&ident.value, env),
        Expression::Integer(lit) => Ok(Value::integer(lit.value)),
        Expression::Float(lit) => Ok(Value::float(lit.value)),
        Expression::Str(lit) => Ok(Value::string(lit.value.clone())),
        Expression::Boolean(lit) => Ok(Value::boolean(lit.value)),
        Expression::Array(lit) => {
            let elements = eval_expressions(&lit.elements, env)?;
            Ok(Value::array(elements))
        }
        Expression::Hash(lit) => eval_hash_literal(lit, env),
        Expression::Function(lit) => Ok(Value::Function(Rc::new(FunctionValue {
            parameters: lit.parameters.clone(),
            body: Rc::new(lit.body.clone()),
            env: env.clone(),
            name: lit.name.clone(),
        }))),
        Expression::Prefix(prefix) => {
            let right = eval_expression(&prefix.right, env)?;
            eval_prefix(&prefix.operator, &right)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env)?;
            let right = eval_expression(&infix.right, env)?;
            eval_infix(env, &infix.operator, &left, &right)
        }
        Expression::If(expr) => eval_if(expr, env),
        Expression::ImmediateIf(expr) => {
            let left = eval_expression(&expr.left, env)?;
            if left.is_null() {
                eval_expression(&expr.right, env)
            } else {
                Ok(left)
            }
        }
        Expression::While(expr) => {
            loop {
                let condition = eval_expression(&expr.condition, env)?;
                if !is_truthy(&condition) {
                    break;
                }
                match eval_block(&expr.body, env) {
                    Err(Signal::Break) => break,
                    Err(signal) => return Err(signal),
                    Ok(_) => {}
                }
            }
            Ok(Value::Null)
        }
        Expression::DoWhile(expr) => {
            loop {
                match eval_block(&expr.body, env) {
                    Err(Signal::Break) => break,
                    Err(signal) => return Err(signal),
                    Ok(_) => {}
                }
                let condition = eval_expression(&expr.condition, env)?;
                if !is_truthy(&condition) {
                    break;
                }
            }
            Ok(Value::Null)
        }
        Expression::Call(call) => {
            let callee = eval_expression(&call.function, env)?;
            let args = eval_expressions(&call.arguments, env)?;
            call_value(&callee, &args)
        }
        Expression::Index(index) => {
            let left = eval_expression(&index.left, env)?;
            let idx = eval_expression(&index.index, env)?;
            match env.member_of(&left, "[") {
                Some(member) => member(&left, std::slice::from_ref(&idx)),
                None => Err(Signal::failure(format!(
                    "index operation not supported: {}",
                    left.type_name()
                ))),
            }
        }
        Expression::Access(access) => eval_access(access, env),
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Outcome {
    if name == "nil" {
        return Ok(Value::Null);
    }
    if let Some(value) = env.get(name) {
        return Ok(value);
    }
    if let Some(builtin) = env.builtin(name) {
        return Ok(Value::Builtin(builtin));
    }
    Err(Signal::failure(format!("identifier not found: {name}")))
}

fn eval_expressions(
    expressions: &[Expression],
    env: &Rc<Environment>,
) -> Result<Vec<Value>, Signal> {
    expressions
        .iter()
        .map(|expression| eval_expression(expression, env))
        .collect()
}

fn eval_hash_literal(literal: &HashLiteral, env: &Rc<Environment>) -> Outcome {
    let mut pairs = IndexMap::default();
    for (key_expr, value_expr) in &literal.pairs {
        let key = eval_expression(key_expr, env)?;
        let hash = key.hash_key().ok_or_else(|| {
            Signal::failure(format!("unusable as hash key: {}", key.type_name()))
        })?;
        let value = eval_expression(value_expr, env)?;
        pairs.insert(hash, MapPair { key, value });
    }
    Ok(Value::map(pairs))
}

fn eval_prefix(operator: &str, right: &Value) -> Outcome {
    match operator {
        "!" => Ok(match right {
            Value::Null => Value::boolean(true),
            Value::Boolean(cell) => Value::boolean(!cell.get()),
            _ => Value::boolean(false),
        }),
        "-" => match right {
            Value::Integer(cell) => Ok(Value::integer(cell.get().wrapping_neg())),
            Value::Float(cell) => Ok(Value::float(-cell.get())),
            other => Err(Signal::failure(format!(
                "unknown operator: -{}",
                other.type_name()
            ))),
        },
        other => Err(Signal::failure(format!(
            "unknown operator: {}{}",
            other,
            right.type_name()
        ))),
    }
}

/// Binary operators dispatch through the left operand's member table.
fn eval_infix(env: &Rc<Environment>, operator: &str, left: &Value, right: &Value) -> Outcome {
    match env.member_of(left, operator) {
        Some(member) => member(left, std::slice::from_ref(right)),
        None => Err(Signal::failure(format!(
            "unknown operator: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        ))),
    }
}

/// In-place assignment through the `"="` member.
fn assign(env: &Rc<Environment>, left: &Value, right: &Value) -> Outcome {
    match env.member_of(left, "=") {
        Some(member) => {
            member(left, std::slice::from_ref(right))?;
            Ok(Value::Null)
        }
        None => Err(Signal::failure("unable to set value")),
    }
}

fn eval_if(expr: &IfExpression, env: &Rc<Environment>) -> Outcome {
    let condition = eval_expression(&expr.condition, env)?;
    if is_truthy(&condition) {
        eval_block(&expr.consequence, env)
    } else if let Some(alternative) = &expr.alternative {
        eval_block(alternative, env)
    } else {
        Ok(Value::Null)
    }
}

fn eval_access(access: &AccessExpression, env: &Rc<Environment>) -> Outcome {
    let left = eval_expression(&access.left, env)?;
    match access.right.as_ref() {
        Expression::Identifier(ident) => {
            let member = env.member_of(&left, &ident.value).ok_or_else(|| {
                missing_member(&ident.value, &left)
            })?;
            member(&left, &[])
        }
        Expression::Call(call) => {
            let name = call_target(call, &left)?;
            let member = env
                .member_of(&left, name)
                .ok_or_else(|| missing_member(name, &left))?;
            let args = eval_expressions(&call.arguments, env)?;
            member(&left, &args)
        }
        other => Err(Signal::failure(format!(
            "invalid access operator {:?}.({})",
            left.type_name(),
            other
        ))),
    }
}

fn call_target<'a>(call: &'a CallExpression, left: &Value) -> Result<&'a str, Signal> {
    match call.function.as_ref() {
        Expression::Identifier(ident) => Ok(&ident.value),
        other => Err(Signal::failure(format!(
            "undefined {:?} in {:?}",
            other.to_string(),
            left.type_name()
        ))),
    }
}

fn missing_member(name: &str, receiver: &Value) -> Signal {
    Signal::failure(format!(
        "function {:?} not found in {:?}",
        name,
        receiver.type_name()
    ))
}

/// Calls a value: user functions get a fresh scope over their captured
/// environment and `return` unwraps at this boundary; builtins run native
/// code.
fn call_value(callee: &Value, args: &[Value]) -> Outcome {
    match callee {
        Value::Function(_) => unwrap_return(apply_raw(callee, args)),
        Value::Builtin(builtin) => (builtin.0)(args),
        other => Err(Signal::failure(format!(
            "not a function: {}",
            other.type_name()
        ))),
    }
}

/// Function application without `return` unwrapping: the hook the standard
/// library uses, so a `return` inside a `foreach` callback keeps unwinding
/// out of the surrounding function.
fn apply_raw(callee: &Value, args: &[Value]) -> Outcome {
    match callee {
        Value::Function(function) => {
            if args.len() != function.parameters.len() {
                return Err(Signal::failure(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    function.parameters.len()
                )));
            }
            let scope = Environment::new_enclosed(function.env.clone());
            for (parameter, arg) in function.parameters.iter().zip(args) {
                scope.set(parameter.value.clone(), arg.clone());
            }
            eval_block(&function.body, &scope)
        }
        Value::Builtin(builtin) => (builtin.0)(args),
        other => Err(Signal::failure(format!(
            "not a function: {}",
            other.type_name()
        ))),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Boolean(cell) => cell.get(),
        _ => true,
    }
}
