//! The validation runner.
//!
//! Order of evaluation:
//! 1. fields, in declaration order, each rule in declaration order;
//! 2. cross-field checks, only if every field passed;
//! 3. asynchronous refinements, only if everything above passed.
//!
//! The first message recorded for a path is the one reported, so a field-level
//! violation always wins over a refinement targeting the same path.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::result::{FieldErrors, FormValidation};
use crate::schema::{CrossField, Field, FieldKind, Rule, Schema};

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").ok()
});

/// Validate `input` against `schema`.
///
/// Never fails: rule violations are reported per field path, internal
/// failures under the form-level key.
pub async fn validate(schema: &Schema, input: &Value) -> FormValidation {
    let Some(object) = input.as_object() else {
        return FormValidation::invalid(FieldErrors::from_form(format!(
            "Expected object, received {}",
            type_name(input)
        )));
    };

    let mut errors = FieldErrors::new();
    let data = check_fields(&schema.fields, object, "", &mut errors);

    if !errors.is_empty() {
        tracing::debug!(schema = schema.name, errors = errors.len(), "form rejected");
        return FormValidation::invalid(errors);
    }

    for check in &schema.cross_fields {
        apply_cross_field(check, &data, &mut errors);
    }
    if !errors.is_empty() {
        tracing::debug!(schema = schema.name, errors = errors.len(), "form rejected by cross-field check");
        return FormValidation::invalid(errors);
    }

    for refinement in &schema.async_refinements {
        match refinement.check(&data).await {
            Ok(None) => {}
            Ok(Some(issue)) => {
                errors.insert_first(issue.path, issue.message);
            }
            Err(err) => {
                tracing::warn!(schema = schema.name, error = %err, "refinement failed");
                errors.set_form(err.to_string());
            }
        }
    }
    if !errors.is_empty() {
        return FormValidation::invalid(errors);
    }

    FormValidation::valid(data)
}

/// Validate and deserialize into a typed form in one step.
pub async fn validate_as<T>(schema: &Schema, input: &Value) -> Result<T, FieldErrors>
where
    T: serde::de::DeserializeOwned,
{
    validate(schema, input).await.parse()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    fields: &[Field],
    object: &Map<String, Value>,
    prefix: &str,
    errors: &mut FieldErrors,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        let path = join(prefix, field.name);
        if let Some(value) = check_field(field, object.get(field.name), &path, errors) {
            out.insert(field.name.to_string(), value);
        }
    }
    out
}

fn check_field(
    field: &Field,
    raw: Option<&Value>,
    path: &str,
    errors: &mut FieldErrors,
) -> Option<Value> {
    let value = match raw {
        None | Some(Value::Null) if field.optional => return None,
        None => {
            errors.insert_first(path, field.type_message.unwrap_or("Required"));
            return None;
        }
        Some(value) => value,
    };

    let Some(coerced) = coerce(field, value, path, errors) else {
        let message = field
            .type_message
            .map(str::to_string)
            .unwrap_or_else(|| type_mismatch(&field.kind, value));
        errors.insert_first(path, message);
        return None;
    };

    for rule in &field.rules {
        if let Some(message) = violation(rule, &coerced) {
            errors.insert_first(path, message);
        }
    }
    Some(coerced)
}

/// Convert `value` to the field's shape, or `None` on a type mismatch.
/// Nested kinds report their element errors directly.
fn coerce(field: &Field, value: &Value, path: &str, errors: &mut FieldErrors) -> Option<Value> {
    match (&field.kind, value) {
        (FieldKind::Text, Value::String(_)) => Some(value.clone()),

        (FieldKind::Number, Value::Number(_)) => Some(value.clone()),
        (FieldKind::Number, Value::String(s)) => parse_number(s).map(Value::Number),

        (FieldKind::Boolean, Value::Bool(_)) => Some(value.clone()),
        (FieldKind::Boolean, Value::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (FieldKind::Choice(allowed), Value::String(s)) if allowed.iter().any(|a| *a == s.as_str()) => {
            Some(value.clone())
        }

        (FieldKind::List(item), Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, element) in items.iter().enumerate() {
                let element_path = join(path, &index.to_string());
                // failed elements keep their raw value so count rules see every element
                let checked = check_field(item, Some(element), &element_path, errors);
                out.push(checked.unwrap_or_else(|| element.clone()));
            }
            Some(Value::Array(out))
        }

        (FieldKind::Object(fields), Value::Object(map)) => {
            Some(Value::Object(check_fields(fields, map, path, errors)))
        }

        (FieldKind::Upload, Value::Object(map))
            if map
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|n| !n.is_empty()) =>
        {
            Some(value.clone())
        }

        _ => None,
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Number::from(n));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

fn violation(rule: &Rule, value: &Value) -> Option<String> {
    // Lengths are UTF-16 code units, the unit browsers report.
    let failed = match (rule, value) {
        (Rule::MinLength(n, _), Value::String(s)) => s.encode_utf16().count() < *n,
        (Rule::MaxLength(n, _), Value::String(s)) => s.encode_utf16().count() > *n,
        (Rule::Pattern { regex: Some(re), .. }, Value::String(s)) => !re.is_match(s),
        (Rule::Pattern { regex: None, source, .. }, _) => {
            return Some(format!("Invalid pattern in form rules: {source}"));
        }
        (Rule::Email(_), Value::String(s)) => !is_email(s),
        (Rule::Url(_), Value::String(s)) => url::Url::parse(s).is_err(),
        (Rule::Min(n, _), Value::Number(v)) => v.as_f64().is_some_and(|v| v < *n),
        (Rule::Max(n, _), Value::Number(v)) => v.as_f64().is_some_and(|v| v > *n),
        (Rule::Positive(_), Value::Number(v)) => v.as_f64().is_some_and(|v| v <= 0.0),
        (Rule::MinItems(n, _), Value::Array(items)) => items.len() < *n,
        (Rule::MustBeTrue(_), Value::Bool(b)) => !*b,
        _ => false,
    };

    failed.then(|| message_of(rule).to_string())
}

fn message_of(rule: &Rule) -> &'static str {
    match rule {
        Rule::MinLength(_, m)
        | Rule::MaxLength(_, m)
        | Rule::Email(m)
        | Rule::Url(m)
        | Rule::Min(_, m)
        | Rule::Max(_, m)
        | Rule::Positive(m)
        | Rule::MinItems(_, m)
        | Rule::MustBeTrue(m) => *m,
        Rule::Pattern { message, .. } => *message,
    }
}

fn is_email(s: &str) -> bool {
    if s.starts_with('.') || s.contains("..") {
        return false;
    }
    EMAIL.as_ref().is_some_and(|re| re.is_match(s))
}

fn apply_cross_field(check: &CrossField, data: &Map<String, Value>, errors: &mut FieldErrors) {
    match check {
        CrossField::Equal {
            field,
            other,
            path,
            message,
        } => {
            if data.get(*field) != data.get(*other) {
                errors.insert_first(*path, *message);
            }
        }
        CrossField::NotEqual {
            field,
            other,
            path,
            message,
        } => {
            if data.get(*field) == data.get(*other) {
                errors.insert_first(*path, *message);
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(kind: &FieldKind, value: &Value) -> String {
    let received = type_name(value);
    match kind {
        FieldKind::Text => format!("Expected string, received {received}"),
        FieldKind::Number => format!("Expected number, received {received}"),
        FieldKind::Boolean => format!("Expected boolean, received {received}"),
        FieldKind::List(_) => format!("Expected array, received {received}"),
        FieldKind::Object(_) => format!("Expected object, received {received}"),
        FieldKind::Upload => "Expected file".to_string(),
        FieldKind::Choice(allowed) => {
            let expected = allowed
                .iter()
                .map(|a| format!("'{a}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            match value {
                Value::String(s) => {
                    format!("Invalid enum value. Expected {expected}, received '{s}'")
                }
                _ => format!("Expected {expected}, received {received}"),
            }
        }
    }
}
