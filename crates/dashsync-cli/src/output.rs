use std::process::ExitCode;

use dashsync_core::domain::{CapacityVerdict, Manifest, SyncError, PARTITION_BUDGET_BYTES};
use dashsync_core::usecases::Remediation;
use dashsync_sync::DeploymentReport;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter {
    /// Suppresses `info` lines; results and problems are still printed
    pub quiet: bool,
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
    fn print_json(&self, _value: &serde_json::Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(format: OutputFormat, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter { quiet }),
    }
}

// ---------------------------------------------------------------------------
// Shared renderers
// ---------------------------------------------------------------------------

/// Prints the scanned manifest and its capacity verdict
pub fn print_manifest(
    formatter: &dyn OutputFormatter,
    manifest: &Manifest,
    capacity: &CapacityVerdict,
) {
    if manifest.is_empty() {
        formatter.warn("No .html, .js or .css files found");
        return;
    }

    formatter.info(&format!(
        "Found {} file{}:",
        manifest.len(),
        plural(manifest.len())
    ));
    for record in manifest {
        formatter.info(&format!(
            "  {:<32} {:>8} bytes",
            record.name().as_str(),
            record.size_bytes()
        ));
    }
    formatter.info(&format!(
        "Total: {} bytes ({:.1}% of {} KB)",
        capacity.aggregate_size_bytes,
        capacity.utilization_percent(),
        PARTITION_BUDGET_BYTES / 1024
    ));
    if capacity.warning {
        formatter.warn(&format!(
            "Assets use {:.1}% of the partition; only {} bytes remain",
            capacity.utilization_percent(),
            capacity.remaining_bytes()
        ));
    }
}

/// Prints a finished deployment and returns the matching exit code
pub fn print_report(
    formatter: &dyn OutputFormatter,
    format: OutputFormat,
    report: &DeploymentReport,
) -> ExitCode {
    let summary = &report.summary;
    let remediation = Remediation::for_summary(summary);

    if matches!(format, OutputFormat::Json) {
        let mut json = serde_json::to_value(report).unwrap_or_default();
        if let (Some(obj), Some(remediation)) = (json.as_object_mut(), &remediation) {
            obj.insert(
                "remediation".to_string(),
                serde_json::to_value(remediation).unwrap_or_default(),
            );
        }
        formatter.print_json(&json);
    } else {
        for outcome in &summary.outcomes {
            let line = format!("{}: {}", outcome.asset_name(), outcome.describe());
            if outcome.succeeded() {
                formatter.success(&line);
            } else {
                formatter.error(&line);
            }
        }
        formatter.info("");
        match &remediation {
            None => formatter.success(&format!(
                "Deployed {} file{} to {} in {}",
                summary.success_count,
                plural(summary.success_count),
                report.destination,
                format_duration(summary.duration_ms)
            )),
            Some(remediation) => print_remediation(formatter, remediation),
        }
    }

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prints a fatal error with its remediation and returns the failure exit code
pub fn print_fatal(
    formatter: &dyn OutputFormatter,
    format: OutputFormat,
    error: &SyncError,
) -> ExitCode {
    let remediation = Remediation::for_error(error);
    if matches!(format, OutputFormat::Json) {
        formatter.print_json(&serde_json::json!({
            "success": false,
            "error": error.to_string(),
            "remediation": remediation,
        }));
    } else {
        print_remediation(formatter, &remediation);
    }
    ExitCode::FAILURE
}

fn print_remediation(formatter: &dyn OutputFormatter, remediation: &Remediation) {
    formatter.error(&remediation.message);
    for suggestion in &remediation.suggestions {
        formatter.info(&format!("- {suggestion}"));
    }
}

pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn format_duration(duration_ms: u64) -> String {
    if duration_ms >= 1000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", duration_ms)
    }
}
