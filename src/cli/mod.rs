//! trafoscript command line
//!
//! ```text
//! trafoscript check mood.tfs --data data.json
//! trafoscript run mood.tfs --data data.json --config trafoscript.toml --json
//! ```
//!
//! Without `--config`, `run` looks for a `trafoscript.toml` (and `.env`)
//! next to the script.

pub mod output;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use trafoscript_core::{
    parse, Context, Evaluator, ExternalData, ScriptError, ValidationError, Validator,
};

use crate::config::Config;
use crate::data::load_data_file;

#[derive(Parser, Debug)]
#[command(name = "trafoscript")]
#[command(about = "Run trafoscript transformations over time-series data", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a script for scope errors without running it
    Check {
        /// Script file
        script: PathBuf,

        /// Data file whose streams count as declared
        #[arg(long, short)]
        data: Option<PathBuf>,

        /// Extra stream name to treat as declared (repeatable)
        #[arg(long = "stream")]
        streams: Vec<String>,
    },

    /// Evaluate a script and print the resulting variables
    Run {
        /// Script file
        script: PathBuf,

        /// Data file with the external streams
        #[arg(long, short)]
        data: Option<PathBuf>,

        /// Configuration file (defaults to trafoscript.toml next to the script)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Print the variables as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute a command
pub fn execute(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Check {
            script,
            data,
            streams,
        } => cmd_check(&script, data.as_deref(), streams),
        Command::Run {
            script,
            data,
            config,
            json,
        } => cmd_run(&script, data.as_deref(), config.as_deref(), json),
    }
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))
}

fn load_data(path: Option<&Path>) -> anyhow::Result<ExternalData> {
    match path {
        Some(path) => Ok(load_data_file(path)?),
        None => Ok(ExternalData::new()),
    }
}

/// Validate a script file, returning every scope error
pub fn check_file(
    script: &Path,
    data: Option<&Path>,
    streams: Vec<String>,
) -> anyhow::Result<Vec<ValidationError>> {
    let source = read_script(script)?;
    let program = parse(&source).with_context(|| format!("Failed to parse {}", script.display()))?;

    let mut names = streams;
    names.extend(load_data(data)?.names().map(str::to_string));

    Ok(Validator::with_predeclared(names).validate(&program))
}

/// Evaluate a script file against a data file
///
/// Streams are disposed once the run is over, whether it succeeded or not.
pub fn run_file(
    script: &Path,
    data: Option<&Path>,
    config: Option<&Path>,
) -> anyhow::Result<Result<Context, ScriptError>> {
    let config = match config {
        Some(path) => Config::load_file(path)?,
        None => Config::load(script.parent().unwrap_or_else(|| Path::new(".")))?,
    };
    let options = config.evaluation_options()?;
    let source = read_script(script)?;
    let mut external = load_data(data)?;

    tracing::debug!(script = %script.display(), streams = external.len(), "running script");
    let result = Evaluator::with_options(options).run(&source, &mut external);
    external.dispose_all();

    Ok(result)
}

fn cmd_check(script: &Path, data: Option<&Path>, streams: Vec<String>) -> anyhow::Result<()> {
    let errors = check_file(script, data, streams)?;
    if errors.is_empty() {
        println!("{} {} is valid", "✓".green(), script.display());
        return Ok(());
    }

    print!("{}", output::render_errors(&errors));
    anyhow::bail!("{} validation error(s) in {}", errors.len(), script.display())
}

fn cmd_run(script: &Path, data: Option<&Path>, config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    match run_file(script, data, config)? {
        Ok(context) => {
            if json {
                println!("{}", output::render_json(&context)?);
            } else {
                print!("{}", output::render_context(&context));
            }
            Ok(())
        }
        Err(ScriptError::Invalid(errors)) => {
            print!("{}", output::render_errors(&errors));
            anyhow::bail!("{} validation error(s) in {}", errors.len(), script.display())
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Err(anyhow::Error::new(e).context(format!("Failed to run {}", script.display())))
        }
    }
}
