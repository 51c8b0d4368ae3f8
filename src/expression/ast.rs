//! # Expression tree
//!
//! The parsed form of a calculator expression. A `Node` is a strict tree: every
//! node owns its children through `Box`, nothing is shared and nothing points
//! back up. Trees are built by the parser, read by the evaluator and dropped
//! after one evaluation (or kept inside a `CompiledExpression` and only read).
//!
//! The three closed enums (`FunctionId`, `OperatorId`, `ConstantId`) are the
//! whole vocabulary of the engine. Adding a function means adding a variant here
//! and one arm in the evaluator; the compiler points at every match that needs it.
#![allow(non_camel_case_types)]

use std::f64::consts::{E, PI};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Single-argument functions known to the engine.
///
/// Names are matched case-insensitively, so `sin(`, `Sin(` and `SIN(` are all
/// `FunctionId::Sin`. `Display` gives the canonical lowercase name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum FunctionId {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Acos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    Atan,
    /// decimal logarithm, written `log`
    #[strum(to_string = "log")]
    Log10,
    #[strum(to_string = "ln")]
    Ln,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "abs")]
    Abs,
}

impl FunctionId {
    /// Looks up a function by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<FunctionId> {
        name.parse::<FunctionId>().ok()
    }

    /// Direct trigonometric functions take an angle and so depend on the angle mode.
    /// Inverse functions return radians regardless of mode.
    pub fn takes_angle(&self) -> bool {
        matches!(self, FunctionId::Sin | FunctionId::Cos | FunctionId::Tan)
    }
}

/// Named constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum ConstantId {
    #[strum(to_string = "pi", serialize = "π")]
    Pi,
    #[strum(to_string = "e")]
    E,
}

impl ConstantId {
    pub fn from_name(name: &str) -> Option<ConstantId> {
        name.parse::<ConstantId>().ok()
    }

    pub fn value(&self) -> f64 {
        match self {
            ConstantId::Pi => PI,
            ConstantId::E => E,
        }
    }
}

/// Binary operators. Precedence grows from `+ -` through `* / %` to `^`;
/// unary minus sits between `* / %` and `^` and is handled by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum OperatorId {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Sub,
    #[strum(to_string = "*")]
    Mul,
    #[strum(to_string = "/")]
    Div,
    #[strum(to_string = "^")]
    Pow,
    #[strum(to_string = "%")]
    Mod,
}

impl OperatorId {
    /// Maps an operator glyph to its operator, including the display synonyms
    /// `**` for `^` and `×`/`÷` for `*`/`/`.
    pub fn from_symbol(symbol: &str) -> Option<OperatorId> {
        match symbol {
            "+" => Some(OperatorId::Add),
            "-" => Some(OperatorId::Sub),
            "*" | "×" => Some(OperatorId::Mul),
            "/" | "÷" => Some(OperatorId::Div),
            "^" | "**" => Some(OperatorId::Pow),
            "%" => Some(OperatorId::Mod),
            _ => None,
        }
    }
}

/// Node of the expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// numeric literal, e.g. `3.5` or `1.2e-3`
    NumberLiteral(f64),
    /// the bound variable; the parser only produces the name `x`
    VariableRef(String),
    ConstantRef(ConstantId),
    /// function applied to one argument: `sin(x)`
    UnaryCall(FunctionId, Box<Node>),
    BinaryOp(OperatorId, Box<Node>, Box<Node>),
    /// unary minus, kept apart from binary subtraction
    Negate(Box<Node>),
}

impl Node {
    pub fn boxed(self) -> Box<Node> {
        Box::new(self)
    }

    pub fn binary(op: OperatorId, left: Node, right: Node) -> Node {
        Node::BinaryOp(op, left.boxed(), right.boxed())
    }

    pub fn call(function: FunctionId, argument: Node) -> Node {
        Node::UnaryCall(function, argument.boxed())
    }

    pub fn negate(argument: Node) -> Node {
        Node::Negate(argument.boxed())
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Node::NumberLiteral(_) | Node::VariableRef(_) | Node::ConstantRef(_) => 1,
            Node::UnaryCall(_, arg) | Node::Negate(arg) => 1 + arg.size(),
            Node::BinaryOp(_, lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    /// true if the tree refers to the variable `name` anywhere
    pub fn contains_variable(&self, name: &str) -> bool {
        match self {
            Node::VariableRef(var) => var.eq_ignore_ascii_case(name),
            Node::NumberLiteral(_) | Node::ConstantRef(_) => false,
            Node::UnaryCall(_, arg) | Node::Negate(arg) => arg.contains_variable(name),
            Node::BinaryOp(_, lhs, rhs) => {
                lhs.contains_variable(name) || rhs.contains_variable(name)
            }
        }
    }
}

/// Fully parenthesised rendering; the output parses back to an equal tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::NumberLiteral(val) => write!(f, "{}", val),
            Node::VariableRef(name) => write!(f, "{}", name),
            Node::ConstantRef(c) => write!(f, "{}", c),
            Node::UnaryCall(func, arg) => write!(f, "{}({})", func, arg),
            Node::BinaryOp(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Node::Negate(arg) => write!(f, "(-{})", arg),
        }
    }
}
