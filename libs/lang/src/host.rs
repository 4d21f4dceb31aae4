//! Host-function bridge.
//!
//! Callers extend the script surface by registering named functions
//! before interpretation. Exactly three signatures exist, one adapter
//! constructor each; anything else does not typecheck, so there is no
//! runtime signature validation to fail.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use emcalc_units::MeasureValue;

use crate::error::{Error, Result};

/// An argument handed to a host function, in call order.
#[derive(Debug, Clone)]
pub enum HostArg {
    /// A bare string literal from the script.
    Text(String),
    /// An evaluated measure value; `None` when the argument named a
    /// variable that was never bound.
    Measure(Option<MeasureValue>),
}

type ActionFn = dyn Fn(&[HostArg]) + Send + Sync;
type ValueFn = dyn Fn(&[HostArg]) -> Option<MeasureValue> + Send + Sync;
type FallibleFn = dyn Fn(&[HostArg]) -> anyhow::Result<Option<MeasureValue>> + Send + Sync;

enum Adapter {
    Action(Box<ActionFn>),
    Value(Box<ValueFn>),
    Fallible(Box<FallibleFn>),
}

/// A named host function with one of the supported signatures.
pub struct HostFn {
    name: String,
    adapter: Adapter,
}

impl HostFn {
    /// A function called only for its side effects.
    pub fn action(
        name: impl Into<String>,
        f: impl Fn(&[HostArg]) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            adapter: Adapter::Action(Box::new(f)),
        }
    }

    /// A function returning a measure value. `None` means "no value";
    /// an assignment target stays untouched in that case.
    pub fn value(
        name: impl Into<String>,
        f: impl Fn(&[HostArg]) -> Option<MeasureValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            adapter: Adapter::Value(Box::new(f)),
        }
    }

    /// A function with an error channel; an `Err` aborts the run.
    pub fn fallible(
        name: impl Into<String>,
        f: impl Fn(&[HostArg]) -> anyhow::Result<Option<MeasureValue>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            adapter: Adapter::Fallible(Box::new(f)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with panics trapped: an aborting host function must not
    /// take the interpreter down with it.
    pub(crate) fn call(&self, args: &[HostArg]) -> Result<Option<MeasureValue>> {
        let outcome = catch_unwind(AssertUnwindSafe(|| match &self.adapter {
            Adapter::Action(f) => {
                f(args);
                Ok(None)
            }
            Adapter::Value(f) => Ok(f(args)),
            Adapter::Fallible(f) => f(args),
        }));
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(Error::CallFailed {
                name: self.name.clone(),
                source,
            }),
            Err(panic) => Err(Error::CallFailed {
                name: self.name.clone(),
                source: anyhow::anyhow!(panic_message(panic)),
            }),
        }
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signature = match self.adapter {
            Adapter::Action(_) => "action",
            Adapter::Value(_) => "value",
            Adapter::Fallible(_) => "fallible",
        };
        f.debug_struct("HostFn")
            .field("name", &self.name)
            .field("signature", &signature)
            .finish()
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "host function panicked".to_string()
    }
}

/// A registered name must be callable by the grammar, i.e. lex as one
/// identifier.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(c) if c == b'_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|c| c == b'_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_call_failures() {
        let f = HostFn::value("boom", |_| panic!("it broke"));
        let err = f.call(&[]).unwrap_err();
        match err {
            Error::CallFailed { name, source } => {
                assert_eq!(name, "boom");
                assert!(source.to_string().contains("it broke"));
            }
            other => panic!("expected CallFailed, got {other:?}"),
        }
    }

    #[test]
    fn fallible_errors_become_call_failures() {
        let f = HostFn::fallible("nope", |_| Err(anyhow::anyhow!("refused")));
        assert!(matches!(f.call(&[]), Err(Error::CallFailed { .. })));
    }

    #[test]
    fn name_validity() {
        assert!(is_valid_name("Convert"));
        assert!(is_valid_name("_f2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("with space"));
        assert!(!is_valid_name("kg/m3"));
    }
}
