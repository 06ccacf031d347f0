//! Error taxonomy for the value engine.
//!
//! Every fallible operation in this crate returns `Result<T, ValueError>`. The
//! variants below name the classic BASIC runtime error conditions; `Display`
//! renders the same text GW-BASIC would print after `?`.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueError {
    #[error("Type mismatch")]
    TypeMismatch,

    #[error("Overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Illegal function call")]
    IllegalFunctionCall,

    #[error("String too long")]
    StringTooLong,

    #[error("Syntax error")]
    SyntaxError,

    /// A descriptor carried a sigil the engine does not recognise, or an
    /// operation was asked to dispatch on a value it never received.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ValueError>;
