use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid decimal literal '{0}'")]
    InvalidNumber(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("incompatible units: '{lhs}' vs '{rhs}'")]
    Incompatible { lhs: String, rhs: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("unit table error: {0}")]
    Table(String),
}
