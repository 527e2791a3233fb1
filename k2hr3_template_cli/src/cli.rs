//! Command line structure

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "k2hr3-template")]
#[command(version, about = "Render K2HR3 templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Minimum log level (error, warning, info, debug)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    pub structured_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a template, execute it and print the output
    Render {
        template: PathBuf,

        /// JSON object whose entries become template variables
        #[arg(long)]
        vars: Option<PathBuf>,

        /// Single variable; the value is parsed as JSON, or taken as a string
        #[arg(long = "var", value_name = "KEY=VALUE")]
        var: Vec<String>,

        /// Fail any loop running more than N iterations (0 = unbounded)
        #[arg(long, value_name = "N")]
        max_loop_iterations: Option<u64>,

        /// Print the whole execution result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the variables a template references
    Variables { template: PathBuf },

    /// Load a template without executing it
    Check {
        template: PathBuf,

        /// Print the assembled tree
        #[arg(long)]
        tree: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "k2hr3-template",
            "--log-level",
            "debug",
            "render",
            "user-data.tmpl",
            "--var",
            "name=host",
            "--var",
            "count=3",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Render { template, var, json, .. } => {
                assert_eq!(template, PathBuf::from("user-data.tmpl"));
                assert_eq!(var, vec!["name=host", "count=3"]);
                assert!(json);
            }
            _ => panic!("expected render"),
        }
    }
}
