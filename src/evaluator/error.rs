use thiserror::Error;

/// Typed faults raised while executing a checked program. Each one is mapped
/// to a `Runtime` diagnostic at the node where it surfaced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("cannot convert input string to int")]
    InputNotInt,
    #[error("cannot convert input string to bool")]
    InputNotBool,
    #[error("cannot convert value '{value}' to int")]
    IntConversion { value: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("variable '{name}' is not defined")]
    UndefinedVariable { name: String },
    #[error("failed to read input: {message}")]
    Input { message: String },
    #[error("failed to write output: {message}")]
    Output { message: String },
}
