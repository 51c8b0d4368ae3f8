//! Front-end logic built on the expression engine.
/// sampling an equation over a range of `x` for plotting; undefined points become gaps
pub mod grapher;
/// scientific calculator state and key-press reducer
pub mod scientific;
