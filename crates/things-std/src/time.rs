//! The `time` package and its instant type.
//!
//! `Now()` reads the clock captured from the environment at load time (the
//! system clock when none is injected), so tests can pin time. `Time()`,
//! `Time(epochNanos)`, and `Time(other)` construct instants. The instant is
//! a foreign value of type `time.Time` with in-place assignment and an
//! epoch-nanosecond accessor.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};

use things_rt::{
    Clock, Environment, Foreign, MemberFunc, Outcome, Package, Signal, Value,
};

use crate::{expect_args, member};

/// An instant in time, exposed to programs as `time.Time`.
pub struct TimeStamp {
    instant: Cell<DateTime<Utc>>,
}

impl TimeStamp {
    pub fn value(instant: DateTime<Utc>) -> Value {
        Value::Foreign(Rc::new(TimeStamp {
            instant: Cell::new(instant),
        }))
    }

    pub fn from_nanos(nanos: i64) -> Value {
        Self::value(DateTime::from_timestamp_nanos(nanos))
    }

    fn nanos(&self) -> i64 {
        self.instant.get().timestamp_nanos_opt().unwrap_or(0)
    }
}

impl Foreign for TimeStamp {
    fn type_name(&self) -> &'static str {
        "time.Time"
    }

    fn inspect(&self) -> String {
        format!("time.Time({})", self.instant.get().to_rfc3339())
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "=" => member(assign),
            "unix" => member(|recv, args| {
                expect_args(args, 0)?;
                Ok(Value::integer(downcast(recv)?.nanos()))
            }),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn downcast(value: &Value) -> Result<&TimeStamp, Signal> {
    if let Value::Foreign(foreign) = value {
        if let Some(stamp) = foreign.as_any().downcast_ref::<TimeStamp>() {
            return Ok(stamp);
        }
    }
    Err(Signal::failure(format!(
        "type mismatch: time.Time member on {}",
        value.type_name()
    )))
}

fn assign(recv: &Value, args: &[Value]) -> Outcome {
    expect_args(args, 1)?;
    let target = downcast(recv)?;
    let source = downcast(&args[0]).map_err(|_| {
        Signal::failure(format!("type mismatch: time.Time = {}", args[0].type_name()))
    })?;
    target.instant.set(source.instant.get());
    Ok(recv.clone())
}

/// The `time` package: `Now` and the `Time` constructors.
#[derive(Default)]
pub struct TimePkg {
    clock: RefCell<Option<Clock>>,
}

impl Package for TimePkg {
    fn name(&self) -> &str {
        "time"
    }

    fn on_load(&self, env: &Environment) {
        *self.clock.borrow_mut() = env.clock();
    }

    fn member(&self, name: &str) -> Option<MemberFunc> {
        match name {
            "Now" => {
                let clock = self.clock.borrow().clone();
                member(move |_recv, args| {
                    expect_args(args, 0)?;
                    let nanos = match &clock {
                        Some(clock) => clock(),
                        None => Utc::now().timestamp_nanos_opt().unwrap_or(0),
                    };
                    Ok(TimeStamp::from_nanos(nanos))
                })
            }
            "Time" => member(|_recv, args| match args {
                [] => Ok(TimeStamp::from_nanos(0)),
                [Value::Integer(nanos)] => Ok(TimeStamp::from_nanos(nanos.get())),
                [other @ Value::Foreign(_)] => {
                    let stamp = downcast(other).map_err(|_| bad_time_argument(other))?;
                    Ok(TimeStamp::value(stamp.instant.get()))
                }
                [other] => Err(bad_time_argument(other)),
                more => Err(Signal::failure(format!(
                    "wrong number of arguments. got={}, want=1",
                    more.len()
                ))),
            }),
            _ => None,
        }
    }
}

fn bad_time_argument(value: &Value) -> Signal {
    Signal::failure(format!(
        "argument to Time must be integer or Time, got {}",
        value.type_name()
    ))
}
