//! Tree-walking evaluator.
//!
//! Domain violations are reported where they happen (`sqrt(-1)`, `ln(0)`,
//! `asin(2)`, `5/0`) instead of being left to surface later as NaN or infinity.
//! The finiteness check on the final value only catches overflow.
use crate::expression::ast::{FunctionId, Node, OperatorId};
use crate::expression::errors::EvalError;
use log::trace;
use std::collections::HashMap;
use strum_macros::{Display, EnumString};

/// How the argument of `sin`, `cos` and `tan` is read.
/// Inverse functions always return radians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
}

impl AngleMode {
    pub fn to_radians(&self, angle: f64) -> f64 {
        match self {
            AngleMode::Radians => angle,
            AngleMode::Degrees => angle.to_radians(),
        }
    }
}

/// Variable bindings and angle mode for one evaluation. Variable names are
/// matched without regard to ASCII case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalContext {
    variables: HashMap<String, f64>,
    pub angle_mode: AngleMode,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: &str, value: f64) -> Self {
        self.variables.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    /// Binds `x` when a value is given.
    pub fn for_x(x: Option<f64>, angle_mode: AngleMode) -> Self {
        let ctx = Self::new().with_angle_mode(angle_mode);
        match x {
            Some(value) => ctx.with_variable("x", value),
            None => ctx,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.variables.get(&name.to_ascii_lowercase()).copied()
    }
}

/// Reduces `node` to a number.
pub fn evaluate(node: &Node, ctx: &EvalContext) -> Result<f64, EvalError> {
    let value = eval_node(node, ctx)?;
    if !value.is_finite() {
        trace!("{} evaluated to non-finite {}", node, value);
        return Err(EvalError::NonFinite(value));
    }
    Ok(value)
}

fn eval_node(node: &Node, ctx: &EvalContext) -> Result<f64, EvalError> {
    match node {
        Node::NumberLiteral(value) => Ok(*value),
        Node::ConstantRef(constant) => Ok(constant.value()),
        Node::VariableRef(name) => ctx
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
        Node::Negate(arg) => Ok(-eval_node(arg, ctx)?),
        Node::UnaryCall(function, arg) => {
            let input = eval_node(arg, ctx)?;
            apply_function(*function, input, ctx.angle_mode)
        }
        Node::BinaryOp(op, lhs, rhs) => {
            let left = eval_node(lhs, ctx)?;
            let right = eval_node(rhs, ctx)?;
            apply_operator(*op, left, right)
        }
    }
}

pub fn apply_function(
    function: FunctionId,
    input: f64,
    angle_mode: AngleMode,
) -> Result<f64, EvalError> {
    let domain_error = || EvalError::DomainError { function, input };
    // the one place the angle mode applies
    let arg = if function.takes_angle() {
        angle_mode.to_radians(input)
    } else {
        input
    };
    let value = match function {
        FunctionId::Sin => arg.sin(),
        FunctionId::Cos => arg.cos(),
        FunctionId::Tan => arg.tan(),
        FunctionId::Asin | FunctionId::Acos if arg.abs() > 1.0 => return Err(domain_error()),
        FunctionId::Asin => arg.asin(),
        FunctionId::Acos => arg.acos(),
        FunctionId::Atan => arg.atan(),
        FunctionId::Log10 | FunctionId::Ln if arg <= 0.0 => return Err(domain_error()),
        FunctionId::Log10 => arg.log10(),
        FunctionId::Ln => arg.ln(),
        FunctionId::Sqrt if arg < 0.0 => return Err(domain_error()),
        FunctionId::Sqrt => arg.sqrt(),
        FunctionId::Abs => arg.abs(),
    };
    // NaN input, or sin/cos/tan of an infinite angle
    if value.is_nan() {
        return Err(domain_error());
    }
    Ok(value)
}

pub fn apply_operator(op: OperatorId, left: f64, right: f64) -> Result<f64, EvalError> {
    match op {
        OperatorId::Add => Ok(left + right),
        OperatorId::Sub => Ok(left - right),
        OperatorId::Mul => Ok(left * right),
        OperatorId::Div | OperatorId::Mod if right == 0.0 => Err(EvalError::DivisionByZero),
        OperatorId::Div => Ok(left / right),
        // truncated remainder, sign follows the dividend
        OperatorId::Mod => Ok(left % right),
        OperatorId::Pow => {
            let value = left.powf(right);
            if value.is_nan() {
                Err(EvalError::InvalidOperation {
                    operator: op,
                    left,
                    right,
                })
            } else {
                Ok(value)
            }
        }
    }
}
