//! Error taxonomy of the expression engine.
//!
//! Lex and parse errors always carry a character position in the source string.
//! Evaluation errors carry enough structure (function, offending input) for a
//! caller to react without matching on message text.
use crate::expression::ast::{FunctionId, OperatorId};
use std::fmt;
use strum_macros::Display;
use thiserror::Error;

/// The tokenizer met a character that starts no token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected character '{unexpected}' at position {position}")]
pub struct LexError {
    pub position: usize,
    pub unexpected: char,
}

/// Which resource limit a `ParseError::TooComplex` ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// maximum source length, in characters
    Length(usize),
    /// maximum nesting depth of the grammar
    Depth(usize),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Limit::Length(n) => write!(f, "length limit of {} characters", n),
            Limit::Depth(n) => write!(f, "nesting limit of {} levels", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// mismatched parens, trailing tokens, missing operands
    #[error("expected {expected}, found {found} at position {position}")]
    Unexpected {
        position: usize,
        expected: String,
        found: String,
    },
    /// a name that is neither a function, a constant nor the variable `x`
    #[error("unknown identifier '{name}' at position {position}")]
    UnknownIdentifier { position: usize, name: String },
    #[error("expression too complex: exceeds the {limit} at position {position}")]
    TooComplex { position: usize, limit: Limit },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::UnknownIdentifier { position, .. }
            | ParseError::TooComplex { position, .. } => *position,
        }
    }
}

/// The expression is well formed but cannot be evaluated for the given bindings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{function} is undefined for {input}")]
    DomainError { function: FunctionId, input: f64 },
    #[error("invalid operation: {left} {operator} {right} is not a real number")]
    InvalidOperation {
        operator: OperatorId,
        left: f64,
        right: f64,
    },
    #[error("result is not finite ({0})")]
    NonFinite(f64),
}

/// Category of an `EngineError`, rendered as `lex`, `parse` or `eval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Lex,
    Parse,
    Eval,
}

/// Structured payload of a domain error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorDetail {
    pub function: Option<FunctionId>,
    pub input: Option<f64>,
}

/// Everything `evaluate_expression` can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Lex(_) => ErrorKind::Lex,
            EngineError::Parse(_) => ErrorKind::Parse,
            EngineError::Eval(_) => ErrorKind::Eval,
        }
    }

    /// Character offset of the problem; evaluation errors have none.
    pub fn position(&self) -> Option<usize> {
        match self {
            EngineError::Lex(err) => Some(err.position),
            EngineError::Parse(err) => Some(err.position()),
            EngineError::Eval(_) => None,
        }
    }

    /// Human readable message, meant to be shown verbatim.
    pub fn message(&self) -> String {
        match self {
            EngineError::Lex(err) => err.to_string(),
            EngineError::Parse(err) => err.to_string(),
            EngineError::Eval(err) => err.to_string(),
        }
    }

    pub fn detail(&self) -> Option<ErrorDetail> {
        match self {
            EngineError::Eval(EvalError::DomainError { function, input }) => Some(ErrorDetail {
                function: Some(*function),
                input: Some(*input),
            }),
            _ => None,
        }
    }
}
