//! different utility modules used throughout the project
/// reads engine limits, calculator and logging settings from a TOML file
pub mod config;
/// tiny module to set up terminal and file logging
pub mod logger;
