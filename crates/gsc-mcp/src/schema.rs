//! Tool Argument Schemas
//!
//! Each tool declares a static table of [`Field`] rules. The same table drives
//! argument validation (with defaults filled in) and the JSON Schema advertised
//! through `tools/list`, so the two cannot drift apart.

use std::fmt;

use serde_json::{json, Map, Value};

/// Validated arguments with defaults applied.
pub type Args = Map<String, Value>;

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    /// Calendar date shaped `YYYY-MM-DD`.
    Date,
    /// Absolute URL.
    Url,
    Integer {
        min: i64,
        max: Option<i64>,
        default: Option<i64>,
    },
    Enum {
        values: &'static [&'static str],
        default: Option<&'static str>,
    },
    Array(&'static FieldKind),
    Object(&'static [Field]),
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ── Validation ──────────────────────────────────────────────────────────────

/// Check `arguments` against `fields`, returning only declared fields with
/// defaults filled in. Unknown keys are dropped; `null` counts as omitted.
pub fn validate(fields: &[Field], arguments: &Value) -> Result<Args, ValidationError> {
    let empty = Map::new();
    let object = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(ValidationError::new("arguments", "expected an object")),
    };
    validate_object(fields, object, "")
}

fn validate_object(fields: &[Field], object: &Map<String, Value>, prefix: &str) -> Result<Args, ValidationError> {
    let mut out = Map::new();

    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        match object.get(field.name).filter(|v| !v.is_null()) {
            Some(value) => {
                out.insert(field.name.to_string(), validate_value(&field.kind, value, &path)?);
            }
            None => {
                if let Some(default) = default_value(&field.kind) {
                    out.insert(field.name.to_string(), default);
                } else if field.required {
                    return Err(ValidationError::new(&path, "required"));
                }
            }
        }
    }

    Ok(out)
}

fn validate_value(kind: &FieldKind, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match kind {
        FieldKind::String => value
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| ValidationError::new(path, "expected a string")),
        FieldKind::Date => {
            let s = value
                .as_str()
                .ok_or_else(|| ValidationError::new(path, "expected a string"))?;
            if is_date_shaped(s) {
                Ok(Value::String(s.to_string()))
            } else {
                Err(ValidationError::new(path, "expected a date in YYYY-MM-DD format"))
            }
        }
        FieldKind::Url => {
            let s = value
                .as_str()
                .ok_or_else(|| ValidationError::new(path, "expected a string"))?;
            url::Url::parse(s)
                .map(|_| Value::String(s.to_string()))
                .map_err(|e| ValidationError::new(path, format!("invalid URL ({})", e)))
        }
        FieldKind::Integer { min, max, .. } => {
            let n = as_integer(value).ok_or_else(|| ValidationError::new(path, "expected an integer"))?;
            if n < *min {
                return Err(ValidationError::new(path, format!("must be >= {}", min)));
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(ValidationError::new(path, format!("must be <= {}", max)));
                }
            }
            Ok(json!(n))
        }
        FieldKind::Enum { values, .. } => {
            let s = value
                .as_str()
                .ok_or_else(|| ValidationError::new(path, "expected a string"))?;
            if values.contains(&s) {
                Ok(Value::String(s.to_string()))
            } else {
                Err(ValidationError::new(
                    path,
                    format!("expected one of: {}", values.join(", ")),
                ))
            }
        }
        FieldKind::Array(item) => {
            let items = value
                .as_array()
                .ok_or_else(|| ValidationError::new(path, "expected an array"))?;
            items
                .iter()
                .enumerate()
                .map(|(i, v)| validate_value(item, v, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::Object(fields) => {
            let object = value
                .as_object()
                .ok_or_else(|| ValidationError::new(path, "expected an object"))?;
            validate_object(fields, object, path).map(Value::Object)
        }
    }
}

fn default_value(kind: &FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Integer { default: Some(d), .. } => Some(json!(d)),
        FieldKind::Enum { default: Some(d), .. } => Some(json!(d)),
        _ => None,
    }
}

/// Integral JSON numbers, including floats with no fractional part.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| f as i64)
}

fn is_date_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

// ── JSON Schema ─────────────────────────────────────────────────────────────

/// Render a field table as a JSON Schema object for `tools/list`.
pub fn json_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut schema = kind_schema(&field.kind);
        if let Value::Object(ref mut obj) = schema {
            obj.insert("description".to_string(), json!(field.description));
        }
        properties.insert(field.name.to_string(), schema);
        if field.required {
            required.push(json!(field.name));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::Date => json!({"type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$"}),
        FieldKind::Url => json!({"type": "string", "format": "uri"}),
        FieldKind::Integer { min, max, default } => {
            let mut schema = json!({"type": "integer", "minimum": min});
            if let Some(max) = max {
                schema["maximum"] = json!(max);
            }
            if let Some(default) = default {
                schema["default"] = json!(default);
            }
            schema
        }
        FieldKind::Enum { values, default } => {
            let mut schema = json!({"type": "string", "enum": values});
            if let Some(default) = default {
                schema["default"] = json!(default);
            }
            schema
        }
        FieldKind::Array(item) => json!({"type": "array", "items": kind_schema(item)}),
        FieldKind::Object(fields) => json_schema(fields),
    }
}
