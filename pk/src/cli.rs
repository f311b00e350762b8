//! CLI argument parsing for promptkit

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pk")]
#[command(author, version, about = "Render prompt templates with {{variable}} placeholders", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to find a template
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template reference, e.g. `notes` or `@refund/shop.md`
    #[arg(required = true)]
    pub reference: String,

    /// Base directory for references without a namespace
    #[arg(short, long, default_value = ".")]
    pub base: PathBuf,

    /// Extra namespace alias (ns=dir), may be repeated
    #[arg(short, long = "alias", value_parser = parse_key_val)]
    pub aliases: Vec<(String, String)>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a template and print it with variables substituted
    Render {
        #[command(flatten)]
        template: TemplateArgs,

        /// String variable (name=value), may be repeated
        #[arg(short, long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,

        /// JSON variable (name=<json>), may be repeated
        #[arg(short, long = "json", value_parser = parse_key_val)]
        json: Vec<(String, String)>,

        /// JSON or YAML file containing an object of variables
        #[arg(short = 'f', long)]
        vars_file: Option<PathBuf>,
    },

    /// Print the file path a reference resolves to
    Resolve {
        #[command(flatten)]
        template: TemplateArgs,
    },

    /// List the variables a template needs
    Placeholders {
        #[command(flatten)]
        template: TemplateArgs,
    },
}

/// Parse a `key=value` pair
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}
