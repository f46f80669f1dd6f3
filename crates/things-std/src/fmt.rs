//! The `fmt` package: `println` and `printf`.
//!
//! The output writer is captured from the environment when the package is
//! loaded; without one the package writes to the process stdout. Both
//! members return the number of bytes written as an integer.

use std::cell::RefCell;
use std::io::Write;

use things_rt::{Environment, MemberFunc, Package, SharedWriter, Signal, Value};

use crate::member;

#[derive(Default)]
pub struct Fmt {
    out: RefCell<Option<SharedWriter>>,
}

impl Package for Fmt {
    fn name(&self) -> &str {
        "fmt"
    }

    fn on_load(&self, env: &Environment) {
        *self.out.borrow_mut() = env.stdout();
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "println" => {
                let out = self.out.borrow().clone();
                member(move |_recv, args| {
                    let rendered: Vec<String> = args.iter().map(Value::inspect).collect();
                    let mut line = rendered.join(" ");
                    line.push('\n');
                    write_to(&out, &line)?;
                    Ok(Value::integer(line.len() as i64))
                })
            }
            "printf" => {
                let out = self.out.borrow().clone();
                member(move |_recv, args| {
                    if args.is_empty() {
                        return Err(Signal::failure(
                            "wrong number of arguments. got=0, want >= 1",
                        ));
                    }
                    let text = format_verbs(&args[0].inspect(), &args[1..]);
                    write_to(&out, &text)?;
                    Ok(Value::integer(text.len() as i64))
                })
            }
            _ => None,
        }
    }
}

fn write_to(out: &Option<SharedWriter>, text: &str) -> Result<(), Signal> {
    let result = match out {
        Some(writer) => writer.borrow_mut().write_all(text.as_bytes()),
        None => std::io::stdout().write_all(text.as_bytes()),
    };
    result.map_err(|err| Signal::failure(err.to_string()))
}

/// C-style verb substitution over `%d %x %t %s %f %v` (and `%%`). A verb
/// without an argument renders as `%!<verb>(MISSING)`; leftover arguments
/// are appended the way Go's fmt reports them.
fn format_verbs(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();
    let mut next = 0usize;
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            None => out.push('%'),
            Some('%') => out.push('%'),
            Some(verb) => match args.get(next) {
                None => {
                    out.push_str(&format!("%!{verb}(MISSING)"));
                }
                Some(value) => {
                    out.push_str(&render_verb(verb, value));
                    next += 1;
                }
            },
        }
    }
    if next < args.len() {
        let extras: Vec<String> = args[next..]
            .iter()
            .map(|value| format!("{}={}", value.type_name(), value.inspect()))
            .collect();
        out.push_str(&format!("%!(EXTRA {})", extras.join(", ")));
    }
    out
}

fn render_verb(verb: char, value: &Value) -> String {
    match (verb, value) {
        ('d', Value::Integer(cell)) => cell.get().to_string(),
        ('x', Value::Integer(cell)) => format!("{:x}", cell.get()),
        ('t', Value::Boolean(cell)) => cell.get().to_string(),
        ('f', Value::Float(cell)) => format!("{:.6}", cell.get()),
        ('s' | 'v', _) => value.inspect(),
        _ => format!("%!{verb}({})", value.inspect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use things_rt::Package;

    fn capture() -> (Rc<RefCell<Vec<u8>>>, Fmt) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let env = Environment::new();
        env.set_stdout(buffer.clone());
        let fmt = Fmt::default();
        fmt.on_load(&env);
        (buffer, fmt)
    }

    fn written(buffer: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8(buffer.borrow().clone()).unwrap()
    }

    #[test]
    fn println_joins_with_spaces_and_counts_bytes() {
        let (buffer, fmt) = capture();
        let println = fmt.member("println").unwrap();
        let n = println(
            &Value::Null,
            &[Value::string("hello"), Value::integer(42), Value::boolean(true)],
        )
        .unwrap();
        assert_eq!(written(&buffer), "hello 42 true\n");
        assert_eq!(n.inspect(), "14");
    }

    #[test]
    fn println_renders_containers() {
        let (buffer, fmt) = capture();
        let println = fmt.member("println").unwrap();
        println(&Value::Null, &[Value::array(vec![Value::integer(1), Value::integer(2)])])
            .unwrap();
        assert_eq!(written(&buffer), "[1, 2]\n");
    }

    #[test]
    fn printf_verbs() {
        let (buffer, fmt) = capture();
        let printf = fmt.member("printf").unwrap();
        printf(
            &Value::Null,
            &[
                Value::string("%d %x %t %s %f %v %%\n"),
                Value::integer(255),
                Value::integer(255),
                Value::boolean(false),
                Value::string("str"),
                Value::float(1.5),
                Value::array(vec![Value::integer(1)]),
            ],
        )
        .unwrap();
        assert_eq!(written(&buffer), "255 ff false str 1.500000 [1] %\n");
    }

    #[test]
    fn printf_missing_and_extra_arguments() {
        assert_eq!(format_verbs("%d %d", &[Value::integer(1)]), "1 %!d(MISSING)");
        assert_eq!(
            format_verbs("%d", &[Value::integer(1), Value::string("x")]),
            "1%!(EXTRA STRING=x)"
        );
    }

    #[test]
    fn printf_requires_a_format() {
        let (_buffer, fmt) = capture();
        let printf = fmt.member("printf").unwrap();
        let err = printf(&Value::Null, &[]).unwrap_err();
        assert!(
            matches!(err, Signal::Failure(m) if m == "wrong number of arguments. got=0, want >= 1")
        );
    }

    #[test]
    fn wrong_verb_for_value() {
        assert_eq!(format_verbs("%d", &[Value::string("x")]), "%!d(x)");
    }
}
