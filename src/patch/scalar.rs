//! Rendering of replacement scalars

use serde_yaml::Value;

/// Quoting of a scalar in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// Render `value` in `style`, escalating to double quotes when the style
/// cannot carry it
pub fn render(value: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::Plain if is_plain_safe(value) => value.to_string(),
        ScalarStyle::SingleQuoted if !value.contains(['\n', '\r']) => {
            format!("'{}'", value.replace('\'', "''"))
        }
        _ => double_quoted(value),
    }
}

/// A plain scalar is safe when YAML reads it back as the very same string
pub fn is_plain_safe(value: &str) -> bool {
    if value.is_empty() || value.contains(['\n', '\r']) || value.trim() != value {
        return false;
    }
    matches!(serde_yaml::from_str::<Value>(value), Ok(Value::String(s)) if s == value)
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
