//! `warden validate <rules.json>`

use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use warden_rules::RuleEngine;
use warden_types::Rule;

use crate::commands::read_input;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

struct RuleFinding {
    id: String,
    valid: bool,
    detail: String,
}

pub fn execute(path: &Path, format: OutputFormat) -> CliResult<u8> {
    let contents = read_input(path)?;
    let items: Vec<Value> =
        serde_json::from_str(&contents).map_err(|err| CliError::MalformedInput {
            path: path.display().to_string(),
            detail: format!("expected a JSON array of rules: {err}"),
        })?;

    let mut findings = Vec::new();
    let mut valid_rules = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let id = item
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{index}"));

        match serde_json::from_value::<Rule>(item.clone()) {
            Ok(rule) if rule.score.is_some_and(|s| s > 100) => findings.push(RuleFinding {
                id,
                valid: false,
                detail: format!("score {} is outside 0-100", rule.score.unwrap_or_default()),
            }),
            Ok(rule) => match warden_expr::compile(&rule.condition) {
                Ok(_) => {
                    findings.push(RuleFinding {
                        id,
                        valid: true,
                        detail: rule.condition.clone(),
                    });
                    valid_rules.push(rule);
                }
                Err(err) => findings.push(RuleFinding {
                    id,
                    valid: false,
                    detail: format!("condition does not compile: {err}"),
                }),
            },
            Err(err) => findings.push(RuleFinding {
                id,
                valid: false,
                detail: format!("invalid rule shape: {err}"),
            }),
        }
    }

    let engine = RuleEngine::with_rules(valid_rules)?;
    let conflicts = engine.detect_conflicts();
    let all_valid = findings.iter().all(|f| f.valid);
    let real_conflicts = conflicts.iter().filter(|c| c.is_conflict()).count();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "rules": findings.iter().map(|f| serde_json::json!({
                    "id": f.id,
                    "valid": f.valid,
                    "detail": f.detail,
                })).collect::<Vec<_>>(),
                "conflicts": conflicts,
                "ok": all_valid && real_conflicts == 0,
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        OutputFormat::Table => {
            println!("{}", format!("Validating {}", path.display()).bold());
            for finding in &findings {
                if finding.valid {
                    println!("  {} {}  {}", "✓".green(), finding.id.bold(), finding.detail.dimmed());
                } else {
                    println!("  {} {}  {}", "✗".red(), finding.id.bold(), finding.detail);
                }
            }
            if conflicts.is_empty() {
                println!("\n{}", "No conflicts detected".green());
            } else {
                println!("\n{}", "Conflicts:".bold());
                for conflict in &conflicts {
                    let marker = if conflict.is_conflict() {
                        "✗".red()
                    } else {
                        "•".yellow()
                    };
                    println!("  {} {}", marker, conflict.description);
                }
            }
        }
    }

    Ok(if all_valid && real_conflicts == 0 { 0 } else { 1 })
}
