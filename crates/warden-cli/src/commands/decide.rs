//! `warden decide <rules.json> <facts.json>`

use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use warden_audit::{default_journal_path, AuditLog};
use warden_rules::RuleEngine;
use warden_types::{Action, Facts};

use crate::commands::read_input;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

pub async fn execute(rules_path: &Path, facts_path: &Path, format: OutputFormat) -> CliResult<u8> {
    let rules_json = read_input(rules_path)?;
    let rules =
        warden_rules::parse_rules(&rules_json).map_err(|err| CliError::MalformedInput {
            path: rules_path.display().to_string(),
            detail: err.to_string(),
        })?;
    let engine = RuleEngine::with_rules(rules).map_err(|err| CliError::MalformedInput {
        path: rules_path.display().to_string(),
        detail: err.to_string(),
    })?;

    let facts_json = read_input(facts_path)?;
    let facts_value: Value =
        serde_json::from_str(&facts_json).map_err(|err| CliError::MalformedInput {
            path: facts_path.display().to_string(),
            detail: err.to_string(),
        })?;
    if !facts_value.is_object() {
        return Err(CliError::MalformedInput {
            path: facts_path.display().to_string(),
            detail: "facts must be a JSON object".to_string(),
        });
    }
    let facts = Facts::from_value(facts_value);

    let decision = engine.evaluate(&facts);
    let journal = AuditLog::open(default_journal_path(), false).await?;
    let entry = journal.append(&decision, &facts).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&decision).unwrap_or_default()
            );
        }
        OutputFormat::Table => {
            let result = match decision.result {
                Action::Approved => "APPROVED".green().bold(),
                Action::Rejected => "REJECTED".red().bold(),
                Action::Review => "REVIEW".yellow().bold(),
            };
            println!("{}  {}", "Result:".bold(), result);
            println!("{}   {}", "Score:".bold(), decision.score);
            println!("{}  {}", "Reason:".bold(), decision.reason);
            match &decision.matched_rule {
                Some(rule) => println!("{}    {}", "Rule:".bold(), rule.name),
                None => println!("{}    {}", "Rule:".bold(), "none".dimmed()),
            }
            println!("{}   {}", "Audit:".bold(), entry.id.dimmed());
        }
    }

    Ok(0)
}
