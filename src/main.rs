#![allow(non_snake_case)]
//! `rustedcalc` command line: evaluate one expression or tabulate a function.
use RustedCalc::Utils::config::AppConfig;
use RustedCalc::Utils::logger::{init_logger, parse_level};
use RustedCalc::calculators::grapher::{GraphError, sample_function};
use RustedCalc::calculators::scientific::format_result;
use RustedCalc::{AngleMode, Engine, EngineError};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rustedcalc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scientific calculator and function grapher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML settings file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result
    Eval {
        #[arg(value_name = "EXPR", allow_hyphen_values = true)]
        expr: String,

        /// Value bound to x
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,

        /// Read trigonometric arguments in degrees
        #[arg(long)]
        degrees: bool,
    },

    /// Sample an expression in x over a range and print the table of values
    Plot {
        #[arg(value_name = "EXPR", allow_hyphen_values = true)]
        expr: String,

        #[arg(long, allow_hyphen_values = true)]
        from: f64,

        #[arg(long, allow_hyphen_values = true)]
        to: f64,

        /// Number of sample points
        #[arg(long, default_value = "21")]
        points: usize,

        /// Read trigonometric arguments in degrees
        #[arg(long)]
        degrees: bool,
    },
}

/// Prints the error and, when it has a position, a caret under the offending character.
fn report(source: &str, err: &EngineError) {
    eprintln!("{} error: {}", err.kind(), err.message());
    if let Some(position) = err.position() {
        eprintln!("  {}", source);
        eprintln!("  {}^", " ".repeat(position));
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        match parse_level(level) {
            Some(level) => config.logging.level = level,
            None => {
                eprintln!("unknown log level '{}'", level);
                return ExitCode::FAILURE;
            }
        }
    }
    init_logger(&config.logging);
    info!("settings: {:?}", config);

    let engine = Engine::new(config.engine);
    let angle_mode = |degrees: bool| {
        if degrees {
            AngleMode::Degrees
        } else {
            config.calculator.angle_mode
        }
    };

    match cli.command {
        Commands::Eval { expr, x, degrees } => {
            match engine.evaluate(&expr, x, angle_mode(degrees)) {
                Ok(value) => {
                    println!("{}", format_result(value, config.calculator.precision));
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    report(&expr, &err);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Plot {
            expr,
            from,
            to,
            points,
            degrees,
        } => match sample_function(&engine, &expr, from, to, points, angle_mode(degrees)) {
            Ok(curve) => {
                println!("{}", curve.to_table());
                println!(
                    "{} of {} points plotted in {} segment(s)",
                    curve.plotted(),
                    curve.points.len(),
                    curve.segments().len()
                );
                ExitCode::SUCCESS
            }
            Err(GraphError::Expression(err)) => {
                report(&expr, &err);
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            }
        },
    }
}
