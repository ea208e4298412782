//! Output formatting for resolved values.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    /// Bare scalars, `key=value` lines for mappings
    Plain,
}

/// Render any serializable result.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?.trim_end().to_string(),
        OutputFormat::Plain => format_plain(&serde_json::to_value(value)?),
    })
}

/// Plain text: strings unquoted, null empty, mappings one `key=value` per line.
pub fn format_plain(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, plain_scalar(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => plain_scalar(other),
    }
}

fn plain_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain() {
        assert_eq!(format_plain(&json!("kafka:8082")), "kafka:8082");
        assert_eq!(format_plain(&json!(null)), "");
        assert_eq!(
            format_plain(&json!({"host": "x", "port": 80, "tags": ["a"]})),
            "host=x\nport=80\ntags=[\"a\"]"
        );
    }

    #[test]
    fn test_render_yaml() {
        let out = render(&json!({"port": 80}), OutputFormat::Yaml).unwrap();
        assert_eq!(out, "port: 80");
    }
}
