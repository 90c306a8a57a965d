//! `mdl` - render, compile and inspect MDL scene scripts.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mdl_core::{bytecode, parse_script, ScriptReader};
use mdl_renderer::{Interpreter, RenderConfig, RunSummary};

/// Default output name for `mdl compile`.
const DEFAULT_BYTECODE: &str = "a.mdl_intermediate_language";

#[derive(Parser)]
#[command(name = "mdl", about = "MDL scene renderer and bytecode compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a script, reading stdin when no file (or "-") is given
    Render {
        script: Option<PathBuf>,

        /// JSON render configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compile a script to bytecode
    Compile {
        script: PathBuf,

        #[arg(short, long, default_value = DEFAULT_BYTECODE)]
        output: PathBuf,
    },
    /// Render a compiled bytecode file
    Play {
        bytecode: PathBuf,

        /// JSON render configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a bytecode file as script commands
    Disasm { bytecode: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

fn open_script(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn report(summary: RunSummary) {
    if summary.is_clean() {
        log::info!("Done: {} operations", summary.executed);
    } else {
        log::warn!("Done: {} operations, {} failed", summary.executed, summary.failed);
    }
}

fn render(script: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let input = open_script(script)?;

    let mut interpreter = Interpreter::from_config(config);
    let summary = interpreter
        .run_script(ScriptReader::new(input))
        .context("Failed to read script")?;
    report(summary);
    Ok(())
}

fn compile(script: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let parsed = parse_script(&content);

    let report = bytecode::compile_to_file(&parsed.operations, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }
    if !parsed.is_clean() {
        log::warn!("{} script commands could not be read", parsed.errors.len());
    }
    Ok(())
}

fn play(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let operations = bytecode::decode_file(path).with_context(|| format!("Failed to decode {}", path.display()))?;

    let mut interpreter = Interpreter::from_config(config);
    report(interpreter.run_operations(&operations));
    Ok(())
}

fn disasm(path: &Path) -> Result<()> {
    let operations = bytecode::decode_file(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    for op in &operations {
        println!("{}", op);
    }
    Ok(())
}

/// Logger reading its filter from `var`, `info` when unset.
fn logger(var: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(var, "info"))
}

fn main() -> Result<()> {
    logger(env_logger::DEFAULT_FILTER_ENV).init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Render { script, config } => render(script.as_deref(), config.as_deref()),
        Commands::Compile { script, output } => compile(script, output),
        Commands::Play { bytecode, config } => play(bytecode, config.as_deref()),
        Commands::Disasm { bytecode } => disasm(bytecode),
    }
}
