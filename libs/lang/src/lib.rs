//! Interpreter for unit-aware emission formula scripts.
//!
//! A script is a sequence of `;`-terminated assignment and call
//! statements over measure values:
//!
//! ```text
//! CO2 = activity_value * CO2Factor;
//! GHG = CO2 + CH4 + N2O;
//! print(CO2, GHG);
//! ```
//!
//! The pipeline is lexer → parser → tree-walking interpreter. The
//! lexer recognizes unit tokens through the catalog in
//! [`emcalc_units`]; arithmetic is exact-decimal and dimension
//! checked. Only variables passed to the `print` built-in come back
//! to the caller.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use emcalc_lang::Interpreter;
//!
//! # fn main() -> emcalc_lang::Result<()> {
//! let vars = HashMap::from([
//!     ("activity_value".to_string(), "1(10^3m3)".to_string()),
//!     ("CO2Factor".to_string(), "1.1E-04Gg/10^3m3".to_string()),
//! ]);
//! let mut interpreter = Interpreter::new(&vars, [])?;
//! let out = interpreter.interpret("CO2 = activity_value * CO2Factor;\nprint(CO2);".as_bytes())?;
//! assert_eq!(out["CO2"].to_string(), "110kg");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod ast;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{Error, Result};
pub use host::{HostArg, HostFn};
pub use interpreter::{Interpreter, MeasureVars};
