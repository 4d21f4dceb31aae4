//! Tree-walking interpreter.
//!
//! Owns the variable environment and the output set. Statements come
//! in line by line; assignments mutate the environment, the kernel
//! `print` built-in copies bindings into the output set, and host
//! calls go through the bridge in [`crate::host`].

use std::collections::HashMap;
use std::io::BufRead;

use tracing::debug;

use emcalc_units::MeasureValue;

use crate::ast::{BinaryOp, Node};
use crate::error::{Error, Result};
use crate::host::{is_valid_name, HostArg, HostFn};
use crate::lexer::parse_variable_value;
use crate::parser::Parser;

/// Variable bindings; also the shape of the returned output set.
pub type MeasureVars = HashMap<String, MeasureValue>;

/// Names reserved for kernel built-ins.
const KERNEL_FUNCS: &[&str] = &["print"];

/// A kernel argument after marshalling. Variables stay names so
/// `print` can address the environment itself.
enum KernelArg<'a> {
    Text(&'a str),
    Var(&'a str),
    Value(MeasureValue),
}

pub struct Interpreter {
    vars: MeasureVars,
    funcs: HashMap<String, HostFn>,
    outvars: MeasureVars,
    /// Recorded mid-statement by `print`, surfaced at end of line.
    deferred: Option<Error>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("vars", &self.vars)
            .field("funcs", &self.funcs.keys().collect::<Vec<_>>())
            .field("outvars", &self.outvars)
            .field("deferred", &self.deferred)
            .finish()
    }
}

impl Interpreter {
    /// Build an interpreter over the given variable bindings and host
    /// functions. Each binding value is a plain decimal (`"30"`) or a
    /// measure literal (`"1.1E-04Gg/10^3m3"`).
    pub fn new(
        vars: &HashMap<String, String>,
        fns: impl IntoIterator<Item = HostFn>,
    ) -> Result<Self> {
        let mut bindings = MeasureVars::new();
        for (name, value) in vars {
            bindings.insert(name.clone(), parse_variable_value(value)?);
        }

        let mut interpreter = Self {
            vars: bindings,
            funcs: HashMap::new(),
            outvars: MeasureVars::new(),
            deferred: None,
        };
        // Function names are case-sensitive.
        for f in fns {
            interpreter.register(f)?;
        }
        Ok(interpreter)
    }

    fn register(&mut self, f: HostFn) -> Result<()> {
        if !is_valid_name(f.name()) {
            return Err(Error::InvalidFunctionName(f.name().to_string()));
        }
        if KERNEL_FUNCS.contains(&f.name()) {
            return Err(Error::OverridesKernelFunction(f.name().to_string()));
        }
        if self.funcs.contains_key(f.name()) {
            return Err(Error::ReregisteredFunction(f.name().to_string()));
        }
        self.funcs.insert(f.name().to_string(), f);
        Ok(())
    }

    /// Consume statements line by line. The first error stops the run;
    /// otherwise the output set populated by `print` is returned.
    pub fn interpret(&mut self, reader: impl BufRead) -> Result<MeasureVars> {
        for line in reader.lines() {
            let line = line?;
            let Some(root) = Parser::new(line.as_str()).parse_statement()? else {
                continue;
            };
            debug!(statement = line.trim(), "interpreting");
            self.visit_root(&root)?;
            if let Some(err) = self.deferred.take() {
                return Err(err);
            }
        }
        Ok(self.outvars.clone())
    }

    fn visit_root(&mut self, root: &Node) -> Result<()> {
        match root {
            Node::Assignment { target, value } => self.visit_assignment(target, value),
            // A bare call runs for its side effects; a returned value
            // is dropped.
            Node::FuncCall { name, args } => self.visit_func_call(name, args).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn visit_assignment(&mut self, target: &str, value: &Node) -> Result<()> {
        match value {
            Node::FuncCall { name, args } => {
                // A void call leaves the target untouched.
                if let Some(mv) = self.visit_func_call(name, args)? {
                    self.vars.insert(target.to_string(), mv);
                }
            }
            _ => {
                let mv = self.visit_expr(value)?;
                self.vars.insert(target.to_string(), mv);
            }
        }
        Ok(())
    }

    fn visit_expr(&self, node: &Node) -> Result<MeasureValue> {
        match node {
            Node::Measure(mv) => Ok(mv.clone()),
            Node::Variable(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UndefinedVariable(name.clone())),
            Node::Binary { op, lhs, rhs } => {
                let lhs = self.visit_expr(lhs)?;
                let rhs = self.visit_expr(rhs)?;
                let result = match op {
                    BinaryOp::Add => lhs.add(&rhs),
                    BinaryOp::Sub => lhs.sub(&rhs),
                    BinaryOp::Mul => lhs.mul(&rhs),
                    BinaryOp::Div => lhs.div(&rhs),
                }?;
                Ok(result)
            }
            Node::Unary(expr) => Ok(self.visit_expr(expr)?.neg()),
            other => Err(Error::BadArgument(format!(
                "cannot evaluate {} as an arithmetic expression",
                other.kind()
            ))),
        }
    }

    fn visit_func_call(&mut self, name: &str, args: &[Node]) -> Result<Option<MeasureValue>> {
        if KERNEL_FUNCS.contains(&name) {
            let mut kernel_args = Vec::with_capacity(args.len());
            for node in args {
                kernel_args.push(self.marshal_kernel_arg(node)?);
            }
            self.kernel_print(&kernel_args);
            return Ok(None);
        }

        let Some(f) = self.funcs.get(name) else {
            return Err(Error::UnknownFunction(name.to_string()));
        };
        let mut call_args = Vec::with_capacity(args.len());
        for node in args {
            call_args.push(self.marshal_user_arg(node)?);
        }
        f.call(&call_args)
    }

    /// Kernel calls see variables as names, not their bindings.
    fn marshal_kernel_arg<'a>(&self, node: &'a Node) -> Result<KernelArg<'a>> {
        match node {
            Node::LiteralString(s) => Ok(KernelArg::Text(s)),
            Node::Variable(name) => Ok(KernelArg::Var(name)),
            _ => Ok(KernelArg::Value(self.visit_expr(node)?)),
        }
    }

    /// User calls see a variable's binding, or `None` when unbound.
    fn marshal_user_arg(&self, node: &Node) -> Result<HostArg> {
        match node {
            Node::LiteralString(s) => Ok(HostArg::Text(s.clone())),
            Node::Variable(name) => Ok(HostArg::Measure(self.vars.get(name).cloned())),
            _ => Ok(HostArg::Measure(Some(self.visit_expr(node)?))),
        }
    }

    /// Copy each named variable's binding into the output set. Unbound
    /// names are skipped. A non-variable argument is recorded and
    /// surfaced once the whole argument list has been walked.
    fn kernel_print(&mut self, args: &[KernelArg<'_>]) {
        for arg in args {
            match arg {
                KernelArg::Var(name) => {
                    if let Some(value) = self.vars.get(*name) {
                        self.outvars.insert((*name).to_string(), value.clone());
                    }
                }
                KernelArg::Text(_) => {
                    self.deferred = Some(Error::BadArgument(
                        "print expects variable arguments, found a string literal".to_string(),
                    ));
                }
                KernelArg::Value(_) => {
                    self.deferred = Some(Error::BadArgument(
                        "print expects variable arguments, found a measure value".to_string(),
                    ));
                }
            }
        }
    }
}
