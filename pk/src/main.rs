use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use promptkit::cli::{Cli, Command, TemplateArgs};
use promptkit::config::Config;
use promptkit::{Loader, Prompt, PromptError, Variables};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

fn build_loader(config: &Config, template: &TemplateArgs) -> Loader {
    let mut loader = config.loader();
    for (namespace, dir) in &template.aliases {
        debug!(%namespace, %dir, "build_loader: alias from command line");
        loader.aliases_mut().set(namespace.as_str(), dir.as_str());
    }
    loader
}

fn read_vars_file(path: &Path) -> Result<Variables> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = matches!(path.extension().and_then(|e| e.to_str()), Some("yml") | Some("yaml"));
    let vars = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?
    };
    Ok(vars)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("promptkit starting");

    match cli.command {
        Command::Render {
            template,
            vars,
            json,
            vars_file,
        } => {
            let loader = build_loader(&config, &template);
            let text = loader.load(&template.reference, &template.base)?;

            let mut variables = match vars_file {
                Some(path) => read_vars_file(&path)?,
                None => Variables::new(),
            };
            for (name, value) in vars {
                variables.insert(name, value);
            }
            for (name, raw) in json {
                let value: serde_json::Value =
                    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON for variable '{}'", name))?;
                variables.insert(name, value);
            }

            match Prompt::new(text, variables) {
                Ok(prompt) => println!("{}", prompt),
                Err(PromptError::MissingVariables { variables, .. }) => {
                    eprintln!("{} Missing variables:", "✗".red());
                    for name in &variables {
                        eprintln!("  {}", name.yellow());
                    }
                    return Err(eyre!("{} unbound placeholder(s) in {}", variables.len(), template.reference));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Resolve { template } => {
            let loader = build_loader(&config, &template);
            let path = loader.resolve_path(&template.reference, &template.base)?;
            println!("{}", path.display());
        }
        Command::Placeholders { template } => {
            let loader = build_loader(&config, &template);
            let text = loader.load(&template.reference, &template.base)?;
            let placeholders = promptkit::scan::scan(&text);
            let names = promptkit::scan::unique_names(&placeholders);
            if names.is_empty() {
                eprintln!("{}", "No placeholders found".dimmed());
            }
            for name in names {
                println!("{}", name.cyan());
            }
        }
    }

    Ok(())
}
