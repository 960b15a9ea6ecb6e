//! Label text templates such as `"{series.name}: {y:.2f}"`.

use serde::Serialize;

/// Values a label can show about its anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelContext {
    /// Axis value of the anchor, if the x dimension is bound to an axis
    pub x: Option<f64>,
    /// Axis value of the anchor, if the y dimension is bound to an axis
    pub y: Option<f64>,
    pub point_id: Option<String>,
    pub series_name: Option<String>,
}

impl LabelContext {
    fn lookup(&self, key: &str) -> Option<Value<'_>> {
        match key {
            "x" | "point.x" => self.x.map(Value::Number),
            "y" | "point.y" => self.y.map(Value::Number),
            "point.id" => self.point_id.as_deref().map(Value::Text),
            "series.name" => self.series_name.as_deref().map(Value::Text),
            _ => None,
        }
    }

    /// Text shown when no text, format or formatter is configured.
    pub fn default_text(&self) -> String {
        match self.y {
            Some(y) => format_number(y, None),
            None => "Annotation label".to_string(),
        }
    }
}

enum Value<'a> {
    Number(f64),
    Text(&'a str),
}

/// Expands `{key}` and `{key:.Nf}` placeholders.
///
/// Unknown keys and missing values expand to an empty string. A `{` without a
/// closing brace is kept as literal text.
pub fn format_label(template: &str, context: &LabelContext) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };

        let placeholder = &after[..close];
        let (key, spec) = match placeholder.split_once(':') {
            Some((key, spec)) => (key.trim(), Some(spec.trim())),
            None => (placeholder.trim(), None),
        };

        match context.lookup(key) {
            Some(Value::Number(n)) => output.push_str(&format_number(n, spec)),
            Some(Value::Text(text)) => output.push_str(text),
            None => {}
        }

        rest = &after[close + 1..];
    }

    output.push_str(rest);
    output
}

/// Formats a number; `.Nf` gives fixed decimals, anything else the shortest form.
fn format_number(value: f64, spec: Option<&str>) -> String {
    let decimals = spec
        .and_then(|s| s.strip_prefix('.'))
        .and_then(|s| s.strip_suffix('f'))
        .and_then(|digits| digits.parse::<usize>().ok());

    match decimals {
        Some(decimals) => format!("{:.*}", decimals, value),
        None => format!("{}", value),
    }
}
