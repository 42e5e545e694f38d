//! Template hydration: `{{ name }}` substitution over raw config text.
//!
//! References must start with a letter or underscore. Anything else between
//! braces, such as the `{{$column}}` column references used inside SQL
//! definitions, is left exactly as written.

use crate::{CompileError, MissingVariablePolicy, Variables};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][0-9A-Za-z_]*(?:\.[0-9A-Za-z_]+)*)\s*\}\}")
        .expect("reference pattern compiles")
});

/// Substitute every variable reference in `text`.
pub(crate) fn hydrate(
    text: &str,
    variables: &Variables,
    policy: MissingVariablePolicy,
) -> Result<String, CompileError> {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for captures in REFERENCE.captures_iter(text) {
        let whole = captures.get_match();
        let name = &captures[1];
        output.push_str(&text[last..whole.start()]);
        match lookup(variables, name) {
            Some(value) => render(value, &mut output),
            None if policy == MissingVariablePolicy::Empty => {}
            None => {
                return Err(CompileError::UnresolvedVariable {
                    name: name.to_string(),
                });
            }
        }
        last = whole.end();
    }
    output.push_str(&text[last..]);
    Ok(output)
}

/// Resolve a dotted path; numeric segments index into arrays.
fn lookup<'a>(variables: &'a Variables, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = variables.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn render(value: &Value, output: &mut String) {
    match value {
        Value::String(text) => output.push_str(text),
        other => output.push_str(&other.to_string()),
    }
}
