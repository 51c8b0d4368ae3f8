// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]
//! Expression engine of a scientific calculator and function grapher.
//!
//! * [`expression`] tokenizes, parses and evaluates infix expressions such as
//!   `2sin(pi/4)^2 + 3x`, reporting failures as typed errors
//! * [`calculators`] builds the calculator keypad reducer and the grapher sampler on it
//! * [`Utils`] holds logging setup and TOML configuration
pub mod Utils;
pub mod calculators;
pub mod expression;

pub use expression::engine::{Engine, EngineConfig, evaluate_expression};
pub use expression::errors::EngineError;
pub use expression::evaluator::AngleMode;
