//! Recursive-descent parser from tokens to an expression tree.
//!
//! Precedence, from loosest to tightest:
//!
//! | level | forms                          | associativity |
//! |-------|--------------------------------|---------------|
//! | 1     | `a + b`, `a - b`               | left          |
//! | 2     | `a * b`, `a / b`, `a % b`, `ab`| left          |
//! | 3     | `-a`, `+a`                     | prefix        |
//! | 4     | `a ^ b`                        | right         |
//! | 5     | `f(a)`, `(a)`, literals        |               |
//!
//! so `-2^2` is `-(2^2)` and `2^3^2` is `2^(3^2)`. Adjacent operands with no
//! operator between them (`2x`, `3(x+1)`, `2(3)(4)`) multiply at level 2; the
//! rule is a one-token lookahead, an operand followed by a number, a name or `(`.
//!
//! Every recursive entry goes through `descend`, which counts nesting and turns
//! an overly deep input into `ParseError::TooComplex` instead of a stack overflow.
//! Each operator of a left-associative chain (`1+1+1…`, `2 2 2…`) also takes a
//! level while the chain is being read, since it makes the tree one level deeper.
//! The budget itself is capped at `DEPTH_CEILING` whatever the caller asks for.
use crate::expression::ast::{ConstantId, FunctionId, Node, OperatorId};
use crate::expression::errors::{Limit, ParseError};
use crate::expression::lexer::{Token, TokenKind};
use log::debug;

/// Nesting depth accepted by `parse`.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Largest depth budget a parser accepts; larger requests are clamped.
pub const DEPTH_CEILING: usize = 256;

/// Parses `tokens` with the default nesting limit.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    Parser::with_limits(tokens, DEFAULT_MAX_DEPTH).parse()
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t> Parser<'t> {
    pub fn with_limits(tokens: &'t [Token], max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: max_depth.min(DEPTH_CEILING),
        }
    }

    /// Parses the whole token slice as one expression.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let node = self.expression()?;
        if self.peek().is_some() {
            return Err(self.unexpected("operator or end of input"));
        }
        debug!(
            "parsed {} tokens into a tree of {} nodes: {}",
            self.tokens.len(),
            node.size(),
            node
        );
        Ok(node)
    }

    ////////////////////////////////////TOKEN CURSOR////////////////////////////////////

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// the next token as one of `ops`, if it is one
    fn peek_operator(&self, ops: &[OperatorId]) -> Option<OperatorId> {
        let token = self.peek()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        OperatorId::from_symbol(&token.text).filter(|op| ops.contains(op))
    }

    /// position of the next token, or just past the last one at end of input
    fn position(&self) -> usize {
        match self.peek() {
            Some(token) => token.position,
            None => self.tokens.last().map(Token::end).unwrap_or(0),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.peek() {
            Some(token) => format!("'{}'", token.text),
            None => "end of input".to_string(),
        };
        ParseError::Unexpected {
            position: self.position(),
            expected: expected.to_string(),
            found,
        }
    }

    fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        if self.peek_kind() == Some(TokenKind::RightParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("')'"))
        }
    }

    /// Takes one level of the depth budget.
    fn deepen(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooComplex {
                position: self.position(),
                limit: Limit::Depth(self.max_depth),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn descend<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.deepen()?;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    ////////////////////////////////////GRAMMAR////////////////////////////////////

    fn expression(&mut self) -> Result<Node, ParseError> {
        self.descend(|p| p.additive())
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        let mut node = self.multiplicative()?;
        let chain_start = self.depth;
        while let Some(op) = self.peek_operator(&[OperatorId::Add, OperatorId::Sub]) {
            self.deepen()?;
            self.advance();
            let rhs = self.multiplicative()?;
            node = Node::binary(op, node, rhs);
        }
        self.depth = chain_start;
        Ok(node)
    }

    fn multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut node = self.unary()?;
        let chain_start = self.depth;
        loop {
            if let Some(op) =
                self.peek_operator(&[OperatorId::Mul, OperatorId::Div, OperatorId::Mod])
            {
                self.deepen()?;
                self.advance();
                let rhs = self.unary()?;
                node = Node::binary(op, node, rhs);
            } else if self.starts_operand() {
                // implicit multiplication: `2x`, `3(x+1)`, `(1+2)(3)`
                self.deepen()?;
                let rhs = self.unary()?;
                node = Node::binary(OperatorId::Mul, node, rhs);
            } else {
                break;
            }
        }
        self.depth = chain_start;
        Ok(node)
    }

    fn starts_operand(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Number | TokenKind::Identifier | TokenKind::LeftParen)
        )
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        match self.peek_operator(&[OperatorId::Sub, OperatorId::Add]) {
            Some(OperatorId::Sub) => {
                self.advance();
                let arg = self.descend(|p| p.unary())?;
                Ok(Node::negate(arg))
            }
            Some(_) => {
                self.advance();
                self.descend(|p| p.unary())
            }
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ParseError> {
        let base = self.primary()?;
        if self.peek_operator(&[OperatorId::Pow]).is_some() {
            self.advance();
            // the exponent may itself be negated or raised: 2^-1, 2^3^2
            let exponent = self.descend(|p| p.unary())?;
            return Ok(Node::binary(OperatorId::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("number, name or '('"));
        };
        match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.unexpected("number"))?;
                self.advance();
                Ok(Node::NumberLiteral(value))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect_right_paren()?;
                Ok(inner)
            }
            TokenKind::Identifier => {
                self.advance();
                self.name(token)
            }
            _ => Err(self.unexpected("number, name or '('")),
        }
    }

    /// Resolves an identifier: function call, constant or the variable `x`.
    fn name(&mut self, token: &Token) -> Result<Node, ParseError> {
        if let Some(function) = FunctionId::from_name(&token.text) {
            if self.peek_kind() != Some(TokenKind::LeftParen) {
                return Err(self.unexpected(&format!("'(' after {}", function)));
            }
            self.advance();
            let argument = self.expression()?;
            self.expect_right_paren()?;
            return Ok(Node::call(function, argument));
        }
        if let Some(constant) = ConstantId::from_name(&token.text) {
            return Ok(Node::ConstantRef(constant));
        }
        if token.text.eq_ignore_ascii_case("x") {
            return Ok(Node::VariableRef("x".to_string()));
        }
        Err(ParseError::UnknownIdentifier {
            position: token.position,
            name: token.text.clone(),
        })
    }
}
