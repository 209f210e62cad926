//! CSV export of the in-memory journal view

use warden_types::AuditEntry;

const HEADER: &str = "id,timestamp,result,rule,reason,score,hash";

/// Render entries as CSV, one row per entry
///
/// The reason column is always double-quoted with embedded quotes doubled,
/// so commas inside it survive spreadsheet import.
pub(crate) fn to_csv(entries: &[AuditEntry]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for entry in entries {
        let rule_name = entry
            .rule
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            entry.id,
            entry.timestamp,
            entry.output.result,
            rule_name,
            quote(&entry.output.reason),
            entry.output.score,
            entry.hash,
        ));
    }
    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
