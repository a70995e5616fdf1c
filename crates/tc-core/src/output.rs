//! Command payloads and their renderings.
//!
//! Every command builds a `serde_json::Value` response first; the selected
//! [`OutputFormat`] decides how it reaches stdout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tc_config::{ConfigSnapshot, LoadedConfig};
use tc_schema::Violation;

/// Version of the JSON response layout.
pub const RESPONSE_VERSION: &str = "1.0.0";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Readable report with one line per violation
    #[default]
    Human,

    /// Structured JSON for scripts and CI
    Json,

    /// One-line summary for quick status checks
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Response for `tc-core check`.
pub fn check_response(run_id: &str, loaded: &LoadedConfig) -> JsonValue {
    let violations = loaded.violations();
    let snapshot = ConfigSnapshot::with_violation_count(loaded, violations.len());

    json!({
        "response_version": RESPONSE_VERSION,
        "run_id": run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "schema": loaded.schema.as_str(),
        "record": loaded.instance.schema_name(),
        "source": loaded.source,
        "path": loaded.path.as_ref().map(|p| p.display().to_string()),
        "status": if violations.is_empty() { "ok" } else { "invalid" },
        "violation_count": violations.len(),
        "violations": violations,
        "config_hash": snapshot.config_hash,
    })
}

/// Render a `check` response for humans.
pub fn render_check_human(response: &JsonValue) -> String {
    let field = |key: &str| response.get(key).and_then(JsonValue::as_str).unwrap_or("?");
    let mut out = String::new();

    out.push_str(&format!("# tc-core check: {}\n\n", field("record")));
    out.push_str(&format!("source: {}", field("source")));
    if let Some(path) = response.get("path").and_then(JsonValue::as_str) {
        out.push_str(&format!(" ({})", path));
    }
    out.push('\n');

    let violations: Vec<Violation> = response
        .get("violations")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    if violations.is_empty() {
        out.push_str("✓ no violations\n");
    } else {
        out.push_str(&format!("✗ {} violation(s)\n", violations.len()));
        for violation in &violations {
            out.push_str(&format!(
                "  {} [{}]: {}\n",
                violation.path, violation.kind, violation.detail
            ));
        }
    }

    if let Some(hash) = response.get("config_hash").and_then(JsonValue::as_str) {
        out.push_str(&format!("\nhash: {}\n", &hash[..12.min(hash.len())]));
    }
    out
}

/// Render a `check` response as a single status line.
pub fn render_check_summary(response: &JsonValue) -> String {
    let record = response.get("record").and_then(JsonValue::as_str).unwrap_or("?");
    let count = response
        .get("violation_count")
        .and_then(JsonValue::as_u64)
        .unwrap_or(0);
    let status = if count == 0 { "OK" } else { "INVALID" };
    format!("[{}] check: {} ({} violation(s))", record, status, count)
}

/// Render a schema `describe()` payload as an aligned field table.
pub fn render_describe_human(description: &JsonValue) -> String {
    let mut out = String::new();
    let name = description.get("name").and_then(JsonValue::as_str).unwrap_or("?");
    match description.get("extends").and_then(JsonValue::as_str) {
        Some(base) => out.push_str(&format!("# {} (extends {})\n\n", name, base)),
        None => out.push_str(&format!("# {}\n\n", name)),
    }

    let fields = description
        .get("fields")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for field in fields {
        let text = |key: &str| field.get(key).and_then(JsonValue::as_str).unwrap_or("");
        let mut line = format!(
            "{:<28} {:<24} default={}",
            text("name"),
            text("kind"),
            field.get("default").unwrap_or(&JsonValue::Null)
        );
        if field.get("required").and_then(JsonValue::as_bool) == Some(true) {
            line.push_str(" required");
        }
        let min = field.get("min").and_then(JsonValue::as_f64);
        let max = field.get("max").and_then(JsonValue::as_f64);
        if min.is_some() || max.is_some() {
            let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" range=[{}, {}]", bound(min), bound(max)));
        }
        if let Some(alt) = field.get("alternative").and_then(JsonValue::as_str) {
            line.push_str(&format!(" alt={}", alt));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
