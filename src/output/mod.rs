//! Output control for the command line tool
//!
//! Command results go to stdout, as pretty JSON or as `key: value` lines.
//! Status messages go to stderr so results can be piped.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct OutputManager {
    pub verbose: bool,
    quiet: bool,
    format: OutputFormat,
    start_time: Instant,
}

impl OutputManager {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            format,
            start_time: Instant::now(),
        }
    }

    pub fn new_quiet(format: OutputFormat) -> Self {
        Self {
            verbose: false,
            quiet: true,
            format,
            start_time: Instant::now(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a command result to stdout
    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
            OutputFormat::Text => {
                let text = format_text(&value);
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
        }
        Ok(())
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_status("INFO", message, "ℹ️");
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_status("SUCCESS", message, "✅");
        }
    }

    pub fn warning(&self, message: &str) {
        self.print_status("WARN", message, "⚠️");
    }

    pub fn error(&self, message: &str) {
        self.print_status("ERROR", message, "❌");
    }

    pub fn detail(&self, detail: &str) {
        if self.verbose && !self.quiet {
            eprintln!("      📝 {}", detail);
        }
    }

    pub fn summary(&self, title: &str, items: &[(&str, String)]) {
        if self.quiet {
            return;
        }

        eprintln!("\n📊 {}", title);
        for (key, value) in items {
            eprintln!("  • {}: {}", key, value);
        }
    }

    fn print_status(&self, level: &str, message: &str, emoji: &str) {
        if self.verbose {
            eprintln!(
                "[{:8.3}s] {} {} {}",
                self.start_time.elapsed().as_secs_f64(),
                emoji,
                level,
                message
            );
        } else {
            eprintln!("{} {}", emoji, message);
        }
    }

    pub fn format_size(&self, size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }

    pub fn elapsed_time(&self) -> String {
        self.format_duration(self.start_time.elapsed())
    }
}

/// Flatten a JSON value into `path: value` lines, e.g.
/// `repositories[0].repositoryName: app`
pub fn format_text(value: &Value) -> String {
    let mut lines = Vec::new();
    flatten(value, String::new(), &mut lines);
    lines.join("\n")
}

fn flatten(value: &Value, path: String, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten(child, child_path, lines);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, format!("{}[{}]", path, index), lines);
            }
        }
        Value::Null => {}
        Value::String(s) if path.is_empty() => lines.push(s.clone()),
        Value::String(s) => lines.push(format!("{}: {}", path, s)),
        other if path.is_empty() => lines.push(other.to_string()),
        other => lines.push(format!("{}: {}", path, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_text_flattens_nested_values() {
        let value = json!({
            "repositories": [
                {"repositoryName": "app", "createdAt": 1.5E9},
                {"repositoryName": "web"}
            ],
            "nextToken": null
        });
        assert_eq!(
            format_text(&value),
            "repositories[0].createdAt: 1500000000.0\n\
             repositories[0].repositoryName: app\n\
             repositories[1].repositoryName: web"
        );
    }

    #[test]
    fn test_format_text_empty_object() {
        assert_eq!(format_text(&json!({})), "");
        assert_eq!(format_text(&json!("plain")), "plain");
    }

    #[test]
    fn test_format_size() {
        let output = OutputManager::new_quiet(OutputFormat::Text);
        assert_eq!(output.format_size(512), "512 B");
        assert_eq!(output.format_size(1536), "1.5 KB");
        assert_eq!(output.format_size(10 * 1024 * 1024), "10.0 MB");
    }

    #[test]
    fn test_format_duration() {
        let output = OutputManager::new_quiet(OutputFormat::Json);
        assert_eq!(output.format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(output.format_duration(Duration::from_secs(125)), "2m05s");
        assert_eq!(output.format_duration(Duration::from_secs(3725)), "1h02m05s");
    }
}
