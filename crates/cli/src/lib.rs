pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "autobiz",
    about = "AutoBiz consultant CLI",
    long_about = "Extract business profiles, rank automation templates, and inspect runtime readiness.",
    after_help = "Examples:\n  autobiz recommend -m \"We run a small dental clinic\" -m \"Scheduling takes forever\"\n  autobiz catalog --category marketing\n  autobiz doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Extract a business profile from one or more user messages")]
    Profile {
        #[arg(short = 'm', long = "message", required = true, help = "User message (repeatable)")]
        messages: Vec<String>,
    },
    #[command(about = "Extract a profile and rank the best matching automation templates")]
    Recommend {
        #[arg(short = 'm', long = "message", required = true, help = "User message (repeatable)")]
        messages: Vec<String>,
        #[arg(long, help = "JSON template catalog to rank against")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "List catalog templates, optionally filtered by text or category")]
    Catalog {
        #[arg(long, help = "Case-insensitive match on name, description, or tags")]
        query: Option<String>,
        #[arg(long, help = "Category label such as marketing, crm, or support")]
        category: Option<String>,
        #[arg(long, help = "JSON template catalog to list")]
        catalog: Option<PathBuf>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog loading, and LLM provider readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Profile { messages } => commands::profile::run(&messages),
        Command::Recommend { messages, catalog } => commands::recommend::run(&messages, catalog),
        Command::Catalog { query, category, catalog } => {
            commands::catalog::run(query, category, catalog)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use autobiz_core::domain::template::TemplateCategory;
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn help_text_names_only_real_categories() {
        let command = Cli::command();

        let after_help = command.get_after_help().map(ToString::to_string).unwrap_or_default();
        let examples = after_help
            .split("--category ")
            .skip(1)
            .filter_map(|rest| rest.split_whitespace().next())
            .collect::<Vec<_>>();
        assert!(!examples.is_empty());

        let catalog = command.find_subcommand("catalog").expect("catalog subcommand");
        let category_help = catalog
            .get_arguments()
            .find(|arg| arg.get_id() == "category")
            .and_then(|arg| arg.get_help())
            .map(ToString::to_string)
            .unwrap_or_default();
        let listed = category_help
            .split("such as ")
            .nth(1)
            .unwrap_or_default()
            .split(',')
            .map(|label| label.trim().trim_start_matches("or ").trim())
            .collect::<Vec<_>>();
        assert_eq!(listed.len(), 3);

        for label in examples.into_iter().chain(listed) {
            assert!(label.parse::<TemplateCategory>().is_ok(), "`{label}` is not a category");
        }
    }
}
