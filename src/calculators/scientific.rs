//! Scientific calculator state and its key-press reducer.
//!
//! The state is a plain struct; `update` takes it by value together with one
//! key and returns the next state. Nothing is stored elsewhere.
//!
//! Keys append text to the expression the way the keypad builds it
//! (`sin(`, `^2`, `^(1/` for the y√x key). Equals closes any parentheses
//! left open, evaluates through the engine and either shows the result or
//! `Error` with the typed error kept in `error`.
use crate::expression::ast::{ConstantId, FunctionId, OperatorId};
use crate::expression::engine::Engine;
use crate::expression::errors::EngineError;
use crate::expression::evaluator::AngleMode;
use log::debug;

/// Digits after the decimal point shown for a result.
pub const DEFAULT_PRECISION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(OperatorId),
    Function(FunctionId),
    Constant(ConstantId),
    LeftParen,
    RightParen,
    /// x²
    Square,
    /// xʸ
    Power,
    /// ʸ√x
    Root,
    Backspace,
    Clear,
    Equals,
    ToggleAngleMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    pub expression: String,
    pub display: String,
    /// set after a result: a digit starts a new expression, an operator continues from the result
    pub overwrite: bool,
    pub last_result: Option<f64>,
    pub error: Option<EngineError>,
    pub angle_mode: AngleMode,
    pub precision: usize,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(AngleMode::default(), DEFAULT_PRECISION)
    }
}

impl CalculatorState {
    pub fn new(angle_mode: AngleMode, precision: usize) -> Self {
        Self {
            expression: String::new(),
            display: "0".to_string(),
            overwrite: false,
            last_result: None,
            error: None,
            angle_mode,
            precision,
        }
    }

    pub fn update(mut self, key: Key, engine: &Engine) -> Self {
        match key {
            Key::Clear => return Self::new(self.angle_mode, self.precision),
            Key::Equals => return self.equals(engine),
            Key::ToggleAngleMode => {
                self.angle_mode = match self.angle_mode {
                    AngleMode::Radians => AngleMode::Degrees,
                    AngleMode::Degrees => AngleMode::Radians,
                };
                return self;
            }
            _ => {}
        }

        if self.error.take().is_some() {
            self.expression.clear();
        }
        if self.overwrite {
            self.overwrite = false;
            let continues_result = matches!(
                key,
                Key::Operator(_) | Key::Square | Key::Power | Key::Root
            );
            self.expression = match self.last_result {
                Some(value) if continues_result => result_operand(value),
                _ => String::new(),
            };
        }

        match key {
            Key::Backspace => backspace(&mut self.expression),
            _ => {
                if let Some(fragment) = fragment(key) {
                    self.expression.push_str(&fragment);
                }
            }
        }
        self.display = if self.expression.is_empty() {
            "0".to_string()
        } else {
            self.expression.clone()
        };
        self
    }

    fn equals(mut self, engine: &Engine) -> Self {
        if self.expression.trim().is_empty() {
            return self;
        }
        let source = close_parens(&self.expression);
        match engine.evaluate(&source, None, self.angle_mode) {
            Ok(value) => {
                debug!("{} = {}", source, value);
                self.expression = format_result(value, self.precision);
                self.display = self.expression.clone();
                self.last_result = Some(value);
                self.error = None;
                self.overwrite = true;
            }
            Err(err) => {
                debug!("{} failed: {}", source, err);
                self.display = "Error".to_string();
                self.error = Some(err);
                self.overwrite = false;
            }
        }
        self
    }
}

/// Text a key appends to the expression.
fn fragment(key: Key) -> Option<String> {
    let text = match key {
        Key::Digit(d) => char::from_digit(d as u32, 10)?.to_string(),
        Key::Point => ".".to_string(),
        Key::Operator(op) => op.to_string(),
        Key::Function(function) => format!("{}(", function),
        Key::Constant(constant) => constant.to_string(),
        Key::LeftParen => "(".to_string(),
        Key::RightParen => ")".to_string(),
        Key::Square => "^2".to_string(),
        Key::Power => "^".to_string(),
        Key::Root => "^(1/".to_string(),
        Key::Backspace | Key::Clear | Key::Equals | Key::ToggleAngleMode => return None,
    };
    Some(text)
}

/// The previous result as the left operand of the next expression: full
/// precision rather than the rounded display, in parentheses when negative so
/// that `^` applies to the whole value.
fn result_operand(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        return "0".to_string();
    }
    let text = if (1e-6..1e15).contains(&magnitude) {
        value.to_string()
    } else {
        format!("{:e}", value)
    };
    if value < 0.0 { format!("({})", text) } else { text }
}

/// Removes the last character; a function prefix such as `sin(` or a constant
/// name goes as a whole.
fn backspace(expression: &mut String) {
    if let Some(last) = expression.pop() {
        if last == '(' || last.is_alphabetic() {
            while expression.ends_with(|c: char| c.is_alphabetic()) {
                expression.pop();
            }
        }
    }
}

/// Appends the `)` still missing at the end of `expression`.
pub fn close_parens(expression: &str) -> String {
    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    format!("{}{}", expression, ")".repeat(depth))
}

/// Renders a result with at most `precision` decimals, trailing zeros dropped.
/// Very large and very small magnitudes use exponent notation, which the
/// tokenizer reads back.
pub fn format_result(value: f64, precision: usize) -> String {
    let magnitude = value.abs();
    let text = if magnitude != 0.0 && !(1e-6..1e15).contains(&magnitude) {
        let formatted = format!("{:.*e}", precision, value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_zeros(mantissa), exponent),
            None => formatted,
        }
    } else {
        trim_zeros(&format!("{:.*}", precision, value)).to_string()
    };
    if text == "-0" { "0".to_string() } else { text }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::errors::EvalError;

    fn press(keys: &[Key]) -> CalculatorState {
        let engine = Engine::default();
        keys.iter()
            .fold(CalculatorState::default(), |state, key| state.update(*key, &engine))
    }

    fn digits(n: &str) -> Vec<Key> {
        n.bytes().map(|b| Key::Digit(b - b'0')).collect()
    }

    #[test]
    fn test_basic_sequence() {
        let mut keys = digits("2");
        keys.push(Key::Operator(OperatorId::Add));
        keys.extend(digits("3"));
        keys.push(Key::Operator(OperatorId::Mul));
        keys.extend(digits("4"));
        let state = press(&keys);
        assert_eq!(state.display, "2+3*4");
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.display, "14");
        assert_eq!(state.last_result, Some(14.0));
        assert!(state.overwrite);
    }

    #[test]
    fn test_after_result() {
        let mut keys = digits("7");
        keys.push(Key::Equals);
        keys.push(Key::Operator(OperatorId::Add));
        keys.extend(digits("1"));
        keys.push(Key::Equals);
        assert_eq!(press(&keys).display, "8");

        let mut keys = digits("7");
        keys.push(Key::Equals);
        keys.extend(digits("5"));
        let state = press(&keys);
        assert_eq!(state.expression, "5");
        assert!(!state.overwrite);
    }

    #[test]
    fn test_negative_result_continues_as_one_operand() {
        let mut keys = digits("0");
        keys.push(Key::Operator(OperatorId::Sub));
        keys.extend(digits("3"));
        keys.push(Key::Equals);
        keys.push(Key::Square);
        let state = press(&keys);
        assert_eq!(state.expression, "(-3)^2");
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.last_result, Some(9.0));
        assert_eq!(state.display, "9");

        let mut keys = digits("0");
        keys.push(Key::Operator(OperatorId::Sub));
        keys.extend(digits("8"));
        keys.push(Key::Equals);
        keys.push(Key::Root);
        keys.extend(digits("3"));
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.display, "Error");
        assert!(matches!(
            state.error,
            Some(EngineError::Eval(EvalError::InvalidOperation { .. }))
        ));
    }

    #[test]
    fn test_result_continues_at_full_precision() {
        let mut keys = digits("1");
        keys.push(Key::Operator(OperatorId::Div));
        keys.extend(digits("3"));
        keys.push(Key::Equals);
        assert_eq!(press(&keys).display, "0.3333333333");
        keys.push(Key::Operator(OperatorId::Mul));
        keys.extend(digits("3"));
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.last_result, Some(1.0));
        assert_eq!(state.display, "1");
    }

    #[test]
    fn test_result_operand() {
        assert_eq!(result_operand(14.0), "14");
        assert_eq!(result_operand(-2.5), "(-2.5)");
        assert_eq!(result_operand(2.5e20), "2.5e20");
        assert_eq!(result_operand(-1e-9), "(-1e-9)");
        assert_eq!(result_operand(-0.0), "0");
    }

    #[test]
    fn test_function_in_degrees_with_auto_close() {
        let mut keys = vec![Key::ToggleAngleMode, Key::Function(FunctionId::Sin)];
        keys.extend(digits("90"));
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.angle_mode, AngleMode::Degrees);
        assert_eq!(state.display, "1");
    }

    #[test]
    fn test_root_and_square() {
        let mut keys = digits("27");
        keys.push(Key::Root);
        keys.extend(digits("3"));
        keys.push(Key::Equals);
        assert_eq!(press(&keys).display, "3");

        let mut keys = digits("5");
        keys.push(Key::Square);
        keys.push(Key::Equals);
        assert_eq!(press(&keys).display, "25");
    }

    #[test]
    fn test_error_then_recover() {
        let mut keys = digits("5");
        keys.push(Key::Operator(OperatorId::Div));
        keys.extend(digits("0"));
        keys.push(Key::Equals);
        let state = press(&keys);
        assert_eq!(state.display, "Error");
        assert_eq!(state.error, Some(EngineError::Eval(EvalError::DivisionByZero)));

        keys.extend(digits("4"));
        let state = press(&keys);
        assert_eq!(state.error, None);
        assert_eq!(state.expression, "4");
    }

    #[test]
    fn test_backspace() {
        let mut keys = digits("2");
        keys.push(Key::Operator(OperatorId::Mul));
        keys.push(Key::Function(FunctionId::Sqrt));
        assert_eq!(press(&keys).expression, "2*sqrt(");
        keys.push(Key::Backspace);
        assert_eq!(press(&keys).expression, "2*");
        keys.push(Key::Constant(ConstantId::Pi));
        keys.push(Key::Backspace);
        assert_eq!(press(&keys).expression, "2*");
        keys.push(Key::Backspace);
        keys.push(Key::Backspace);
        assert_eq!(press(&keys).display, "0");
    }

    #[test]
    fn test_clear_keeps_settings() {
        let mut keys = vec![Key::ToggleAngleMode];
        keys.extend(digits("12"));
        keys.push(Key::Clear);
        let state = press(&keys);
        assert_eq!(state.expression, "");
        assert_eq!(state.display, "0");
        assert_eq!(state.angle_mode, AngleMode::Degrees);
    }

    #[test]
    fn test_close_parens() {
        assert_eq!(close_parens("2^(1/3"), "2^(1/3)");
        assert_eq!(close_parens("sin(cos(1"), "sin(cos(1))");
        assert_eq!(close_parens("(1)"), "(1)");
        assert_eq!(close_parens("1)"), "1)");
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(14.0, 10), "14");
        assert_eq!(format_result(0.1 + 0.2, 10), "0.3");
        assert_eq!(format_result(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_result(-0.0, 10), "0");
        assert_eq!(format_result(1e-7, 10), "1e-7");
        assert_eq!(format_result(2.5e20, 10), "2.5e20");
        assert_eq!(format_result(-1e-12, 3), "-1e-12");
    }
}
