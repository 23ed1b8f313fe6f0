//! `faxc` — command-line entry point for the compiler.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

use fax_drv::{CompileReport, Compiler, Config};

/// What to print to `--output` (or stdout, if `--output` is absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitKind {
    Tokens,
    Ast,
    Symbols,
    Ir,
    OptimizedIr,
    Target,
}

impl fmt::Display for EmitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmitKind::Tokens => "tokens",
            EmitKind::Ast => "ast",
            EmitKind::Symbols => "symbols",
            EmitKind::Ir => "ir",
            EmitKind::OptimizedIr => "optimized-ir",
            EmitKind::Target => "target",
        };
        f.write_str(name)
    }
}

/// Compiles a source file through the lexer, parser, semantic analyzer, IR generator and
/// optimizer, and target-code generator.
#[derive(Parser, Debug)]
#[command(name = "faxc")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles fax source files", long_about = None)]
struct Cli {
    /// Source file to compile.
    input: PathBuf,

    /// Where to write the result (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Which artifact to emit.
    #[arg(long, value_enum, default_value_t = EmitKind::Target)]
    emit: EmitKind,

    /// Skip the optimizer and generate target code straight from the raw IR.
    #[arg(long, default_value_t = false)]
    no_optimize: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "FAXC_VERBOSE")]
    verbose: bool,

    /// Disable color in logging output.
    #[arg(long, global = true, env = "FAXC_NO_COLOR")]
    no_color: bool,

    /// Path to a `fax.toml` configuration file.
    #[arg(short, long, global = true, env = "FAXC_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let source = std::fs::read_to_string(&cli.input).map_err(|source| {
        fax_drv::CompileError::ReadSource {
            path: cli.input.clone(),
            source,
        }
    })?;

    let optimize = if cli.no_optimize { false } else { config.optimize };
    let report = Compiler::new(optimize).compile(&source)?;

    let rendered = render(&report, cli.emit);
    match cli.output.as_deref() {
        Some(path) => std::fs::write(path, rendered).map_err(|source| {
            fax_drv::CompileError::WriteOutput {
                path: path.to_path_buf(),
                source,
            }
        })?,
        None => println!("{}", rendered),
    }

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &report.errors {
        eprintln!("error: {}", error);
    }

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

fn render(report: &CompileReport, emit: EmitKind) -> String {
    match emit {
        EmitKind::Tokens => format!("{:#?}", report.tokens),
        EmitKind::Ast => format!("{:#?}", report.ast),
        EmitKind::Symbols => format!("{:#?}", report.symbol_table),
        EmitKind::Ir => format!("{:#?}", report.intermediate_code),
        EmitKind::OptimizedIr => format!("{:#?}", report.optimized_code),
        EmitKind::Target => report.object_code.clone().unwrap_or_default(),
    }
}

fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_env("FAXC_LOG").unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_env("FAXC_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let layer = tracing_fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| fax_drv::CompileError::Config(format!("failed to initialize logging: {}", e)))?;

    Ok(())
}
