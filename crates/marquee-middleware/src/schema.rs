//! Declarative payload schemas.
//!
//! A [`Schema`] describes the expected shape of one payload source: which
//! fields exist, their types and constraints, and whether string values may
//! be coerced to numbers (query and path parameters arrive as strings).
//! Unknown keys are always rejected, so an endpoint that declares no input
//! cannot be smuggled extra fields.

use serde_json::{Map, Number, Value};

/// Field type and constraints.
#[derive(Debug, Clone)]
enum FieldKind {
    /// UTF-8 string with optional length bounds (in characters).
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    /// Whole number with optional bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// Boolean.
    Boolean,
}

/// A single field's expectations.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
    coerce: bool,
    message: Option<String>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            coerce: false,
            message: None,
        }
    }

    /// A string field.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::String {
                min_len: None,
                max_len: None,
            },
        )
    }

    /// An integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Integer {
                min: None,
                max: None,
            },
        )
    }

    /// A boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Bounds a string field's length in characters, inclusive.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        if let FieldKind::String { min_len, max_len } = &mut self.kind {
            *min_len = Some(min);
            *max_len = Some(max);
        }
        self
    }

    /// Requires at least `min` characters.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        if let FieldKind::String { min_len, .. } = &mut self.kind {
            *min_len = Some(min);
        }
        self
    }

    /// Bounds an integer field, inclusive.
    #[must_use]
    pub fn range(mut self, lo: i64, hi: i64) -> Self {
        if let FieldKind::Integer { min, max } = &mut self.kind {
            *min = Some(lo);
            *max = Some(hi);
        }
        self
    }

    /// Marks the field optional; absent values are simply skipped.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Allows string values to be parsed into the numeric type.
    ///
    /// Query and path parameters always arrive as strings; coercion is how
    /// a schema opts a numeric field into accepting them.
    #[must_use]
    pub fn coercing(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Overrides the constraint-violation message for this field.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn constraint(&self, default: String) -> Violation {
        Violation::Constraint {
            path: self.name.clone(),
            message: self.message.clone().unwrap_or(default),
        }
    }

    /// Checks one present value, returning the (possibly coerced) value to
    /// store.
    fn check(&self, value: &Value) -> Result<Value, Violation> {
        match &self.kind {
            FieldKind::String { min_len, max_len } => {
                let Value::String(s) = value else {
                    return Err(Violation::invalid_type(&self.name, "string", value));
                };

                let chars = s.chars().count();
                if let Some(min) = min_len {
                    if chars < *min {
                        return Err(self.constraint(format!(
                            "must contain at least {min} character(s)"
                        )));
                    }
                }
                if let Some(max) = max_len {
                    if chars > *max {
                        return Err(self.constraint(format!(
                            "must contain at most {max} character(s)"
                        )));
                    }
                }
                Ok(value.clone())
            }
            FieldKind::Integer { min, max } => {
                let n = match value {
                    Value::Number(n) => n
                        .as_i64()
                        .ok_or_else(|| Violation::invalid_type(&self.name, "integer", value))?,
                    Value::String(s) if self.coerce => s.parse::<i64>().map_err(|_| {
                        Violation::InvalidType {
                            path: self.name.clone(),
                            expected: "number",
                            received: "string",
                        }
                    })?,
                    other => return Err(Violation::invalid_type(&self.name, "number", other)),
                };

                if let Some(min) = min {
                    if n < *min {
                        return Err(self.constraint(format!("must be at least {min}")));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(self.constraint(format!("must be at most {max}")));
                    }
                }
                Ok(Value::Number(Number::from(n)))
            }
            FieldKind::Boolean => {
                if value.is_boolean() {
                    Ok(value.clone())
                } else {
                    Err(Violation::invalid_type(&self.name, "boolean", value))
                }
            }
        }
    }
}

/// A declared payload shape: ordered fields, unknown keys rejected.
///
/// # Example
///
/// ```rust
/// use marquee_middleware::{FieldSpec, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field(FieldSpec::string("content").length(1, 1000))
///     .field(FieldSpec::integer("rating").range(1, 5));
///
/// let payload = json!({ "content": "", "rating": 3 });
/// let violations = schema
///     .validate(payload.as_object().unwrap())
///     .unwrap_err();
/// assert!(violations[0].message().contains("content"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema: a payload must carry no fields at all.
    #[must_use]
    pub fn object() -> Self {
        Self::default()
    }

    /// Adds a field spec.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Validates a payload, returning the validated (coerced) map or every
    /// violation found.
    ///
    /// Violations are reported in declaration order, then unknown keys in
    /// payload order.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<Map<String, Value>, Vec<Violation>> {
        let mut validated = Map::new();
        let mut violations = Vec::new();

        for spec in &self.fields {
            match payload.get(&spec.name) {
                None => {
                    if spec.required {
                        violations.push(Violation::Missing {
                            path: spec.name.clone(),
                        });
                    }
                }
                Some(value) => match spec.check(value) {
                    Ok(value) => {
                        validated.insert(spec.name.clone(), value);
                    }
                    Err(violation) => violations.push(violation),
                },
            }
        }

        for key in payload.keys() {
            if !self.fields.iter().any(|spec| spec.name == *key) {
                violations.push(Violation::Constraint {
                    path: key.clone(),
                    message: "unrecognized field".to_string(),
                });
            }
        }

        if violations.is_empty() {
            Ok(validated)
        } else {
            Err(violations)
        }
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required field was absent.
    Missing {
        /// Path of the missing field.
        path: String,
    },
    /// A field carried the wrong primitive type.
    InvalidType {
        /// Path of the offending field.
        path: String,
        /// Expected type name.
        expected: &'static str,
        /// Received type name.
        received: &'static str,
    },
    /// A field broke a constraint (or was not declared at all).
    Constraint {
        /// Path of the offending field.
        path: String,
        /// Human-readable description.
        message: String,
    },
}

impl Violation {
    fn invalid_type(path: &str, expected: &'static str, received: &Value) -> Self {
        Self::InvalidType {
            path: path.to_string(),
            expected,
            received: json_type_name(received),
        }
    }

    /// Renders the client-facing message for this violation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Missing { path } => format!("Missing required field: '{path}'"),
            Self::InvalidType {
                path,
                expected,
                received,
            } => format!("Invalid type for '{path}': expected {expected}, received {received}"),
            Self::Constraint { path, message } => format!("{path}: {message}"),
        }
    }
}

/// Joins violation messages into the combined failure message.
#[must_use]
pub fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The JSON primitive type name of a value.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
