use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop an interpretation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid measure value '{0}'")]
    InvalidMeasure(String),

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("'{0}' is not a callable function name")]
    InvalidFunctionName(String),

    #[error("function '{0}' registered twice")]
    ReregisteredFunction(String),

    #[error("overriding kernel function '{0}' is not allowed")]
    OverridesKernelFunction(String),

    #[error("call to '{name}' failed: {source}")]
    CallFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Units(#[from] emcalc_units::Error),

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}
