//! # Expression engine
//!
//! Turns the text a calculator or grapher user types into a number:
//!
//! 1) `lexer` splits the string into tokens (numbers, names, operators, parens)
//! 2) `parser` builds an expression tree with standard precedence, right-associative `^`
//!    and implicit multiplication (`2x`, `3(x+1)`)
//! 3) `evaluator` reduces the tree for a given `x` and angle mode, reporting domain errors
//!
//! `engine` ties the three together.
//!
//! # Example
//! ```
//! use RustedCalc::expression::engine::evaluate_expression;
//! use RustedCalc::expression::evaluator::AngleMode;
//! use RustedCalc::expression::errors::ErrorKind;
//! let value = evaluate_expression("2+3*4", None, AngleMode::Radians).unwrap();
//! assert_eq!(value, 14.0);
//! let value = evaluate_expression("sin(90)", None, AngleMode::Degrees).unwrap();
//! assert!((value - 1.0).abs() < 1e-12);
//! let err = evaluate_expression("sqrt(-1)", None, AngleMode::Radians).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Eval);
//! println!("{}", err.message());
//! ```
pub mod ast;
pub mod engine;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod parser;
