//! Entry points of the expression engine.
//!
//! `evaluate_expression` is the one-shot form: source string, optional value for
//! `x`, angle mode in; a number or a typed `EngineError` out. No state survives
//! between calls, so the same call always gives the same answer and any number
//! of threads may call it at once.
//!
//! `Engine::compile` splits the work for callers that evaluate one expression
//! many times (the grapher): tokenize and parse once, then evaluate the kept
//! tree per sample point.
use crate::expression::ast::Node;
use crate::expression::errors::{EngineError, EvalError, Limit, ParseError};
use crate::expression::evaluator::{AngleMode, EvalContext, evaluate};
use crate::expression::lexer::tokenize;
use crate::expression::parser::{DEFAULT_MAX_DEPTH, Parser};
use log::debug;

/// Longest accepted source, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Input limits. They bound work and recursion on hostile input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_length: usize,
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tokenizes and parses `source` once.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression, EngineError> {
        let max_length = self.config.max_length;
        if source.chars().count() > max_length {
            return Err(ParseError::TooComplex {
                position: max_length,
                limit: Limit::Length(max_length),
            }
            .into());
        }
        let tokens = tokenize(source)?;
        let tree = Parser::with_limits(&tokens, self.config.max_depth).parse()?;
        Ok(CompiledExpression {
            source: source.to_string(),
            tree,
        })
    }

    pub fn evaluate(
        &self,
        source: &str,
        x: Option<f64>,
        angle_mode: AngleMode,
    ) -> Result<f64, EngineError> {
        let compiled = self.compile(source)?;
        let ctx = EvalContext::for_x(x, angle_mode);
        let value = compiled.eval(&ctx)?;
        Ok(value)
    }
}

/// Evaluates `source` with the default limits, binding `x` when given.
///
/// ```
/// use RustedCalc::expression::engine::evaluate_expression;
/// use RustedCalc::expression::evaluator::AngleMode;
/// let value = evaluate_expression("3x + 2(1+1)", Some(5.0), AngleMode::Radians).unwrap();
/// assert_eq!(value, 19.0);
/// ```
pub fn evaluate_expression(
    source: &str,
    x: Option<f64>,
    angle_mode: AngleMode,
) -> Result<f64, EngineError> {
    Engine::default()
        .evaluate(source, x, angle_mode)
        .inspect_err(|err| debug!("{:?} failed with {} error: {}", source, err.kind(), err))
}

/// A parsed expression ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    tree: Node,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// true if the expression depends on `x`
    pub fn uses_x(&self) -> bool {
        self.tree.contains_variable("x")
    }

    pub fn eval(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        evaluate(&self.tree, ctx)
    }

    /// Turns the expression into a function of `x`.
    pub fn lambdify_x(
        &self,
        angle_mode: AngleMode,
    ) -> impl Fn(f64) -> Result<f64, EvalError> + Send + Sync + '_ {
        move |x| self.eval(&EvalContext::for_x(Some(x), angle_mode))
    }
}
