//! # K2HR3 template CLI
//!

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use k2hr3_template::config::build_info;
use k2hr3_template::config::runtime::{
    parse_log_level, EnginePreferences, ExecutionPreferences, LoggingPreferences,
};
use k2hr3_template::template_file::load_template;
use k2hr3_template::utils::SourceMap;
use k2hr3_template::{log_info, logging, TemplateEngine, Value, VariableMap};
use std::path::Path;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(&cli) {
        eprintln!("Error: {}", error);
        return ExitCode::FAILURE;
    }
    log_info!(
        "k2hr3-template starting",
        "config" => build_info::source_info()
    );

    let outcome = match cli.command {
        Commands::Render {
            template,
            vars,
            var,
            max_loop_iterations,
            json,
        } => render(
            &template,
            vars.as_deref(),
            &var,
            max_loop_iterations,
            json,
        ),
        Commands::Variables { template } => variables(&template),
        Commands::Check { template, tree } => check(&template, tree),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    let mut preferences = LoggingPreferences::default();
    if let Some(level) = &cli.log_level {
        preferences.min_log_level =
            parse_log_level(level).ok_or_else(|| format!("unknown log level '{}'", level))?;
    }
    if cli.structured_logs {
        preferences.use_structured_logging = true;
    }

    logging::config::init_runtime_preferences(preferences)?;
    logging::init_global_logging()?;
    Ok(())
}

fn load_engine(path: &Path, execution: ExecutionPreferences) -> CliResult<TemplateEngine> {
    let source = load_template(path)?;
    let mut engine = TemplateEngine::with_preferences(EnginePreferences::default(), execution);

    logging::with_template_context(&path.display().to_string(), || engine.load(&source.text))
        .map_err(|error| match error.span() {
            Some(span) => format!(
                "{}\n{}",
                path.display(),
                SourceMap::new(source.text.clone()).format_error(&span, &error.to_string())
            ),
            None => format!("{}: {}", path.display(), error),
        })?;
    Ok(engine)
}

fn render(
    path: &Path,
    vars_file: Option<&Path>,
    assignments: &[String],
    max_loop_iterations: Option<u64>,
    json: bool,
) -> CliResult<bool> {
    let mut execution = ExecutionPreferences::default();
    if let Some(limit) = max_loop_iterations {
        execution.max_loop_iterations = limit;
    }
    let engine = load_engine(path, execution)?;

    let mut variables = match vars_file {
        Some(file) => read_variables(file)?,
        None => VariableMap::new(),
    };
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        variables.insert(name, value);
    }

    let result = logging::with_template_context(&path.display().to_string(), || {
        engine.execute(&mut variables)
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.output_text);
        if let Some(error) = &result.error {
            eprintln!(
                "Error: {} [{}]",
                error,
                result.error_code.as_deref().unwrap_or_default()
            );
        }
    }
    Ok(result.success)
}

fn variables(path: &Path) -> CliResult<bool> {
    let engine = load_engine(path, ExecutionPreferences::default())?;
    for name in engine.variable_names() {
        println!("{}", name);
    }
    Ok(true)
}

fn check(path: &Path, tree: bool) -> CliResult<bool> {
    let engine = load_engine(path, ExecutionPreferences::default())?;
    let stats = engine.statistics();

    println!(
        "{}: ok ({} statements, {} nodes, {} variables)",
        path.display(),
        stats.statements,
        stats.nodes,
        stats.variables
    );
    if tree {
        print!("{}", engine.dump_tree());
    }
    Ok(true)
}

/// Top-level entries of a JSON object file
fn read_variables(path: &Path) -> CliResult<VariableMap> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str::<serde_json::Value>(&text)? {
        serde_json::Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        _ => Err(format!("{}: variables file must hold a JSON object", path.display()).into()),
    }
}

/// `KEY=VALUE`, where VALUE is JSON when it parses as such
fn parse_assignment(assignment: &str) -> CliResult<(String, Value)> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found '{}'", assignment))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", assignment).into());
    }

    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw));
    Ok((name.to_string(), value))
}
