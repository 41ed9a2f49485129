use std::fmt;

use serde_json::{Map, Value};

/// A single failed check, located by the keys leading to the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(path: &[String], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// Dotted path, or `root` when the issue is about the whole value.
    pub fn path_label(&self) -> String {
        if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join(".")
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.path_label(), self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn join_issues(issues: &[Issue]) -> String {
    let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
    details.join(", ")
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn at_root(message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(&[], message)])
    }
}

/// Field errors from a `#[derive(Validate)]` struct, ordered by field name.
impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut issues: Vec<Issue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = field.to_string();
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                    Issue::new(&[field.clone()], message)
                })
            })
            .collect();
        issues.sort_by(|a, b| a.path.cmp(&b.path));
        Self::new(issues)
    }
}

/// What a field must hold.
#[derive(Debug, Clone)]
pub enum Kind {
    String,
    PositiveInt,
    /// Exactly this JSON value (`true`, `404`, `"Not Found"`, ...).
    Literal(Value),
    Object(ObjectSchema),
}

/// Handling of keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    Strict,
    Strip,
}

#[derive(Debug, Clone)]
struct Field {
    name: &'static str,
    kind: Kind,
}

#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    pub fn strict() -> Self {
        Self {
            fields: Vec::new(),
            unknown_keys: UnknownKeys::Strict,
        }
    }

    pub fn strip() -> Self {
        Self {
            fields: Vec::new(),
            unknown_keys: UnknownKeys::Strip,
        }
    }

    pub fn field(mut self, name: &'static str, kind: Kind) -> Self {
        // Redeclaring a field replaces it.
        self.fields.retain(|f| f.name != name);
        self.fields.push(Field { name, kind });
        self
    }

    pub fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Self {
        self.unknown_keys = unknown_keys;
        self
    }

    /// The literal a field is pinned to, if it is declared as one.
    pub fn literal(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.kind {
            Kind::Literal(value) => Some(value),
            _ => None,
        })
    }

    /// Validate `value` and return it reduced to the declared fields.
    pub fn parse(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        let parsed = self.check(value, &mut Vec::new(), &mut issues);
        match parsed {
            Some(parsed) if issues.is_empty() => Ok(parsed),
            _ => Err(ValidationError::new(issues)),
        }
    }

    fn check(&self, value: &Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) -> Option<Value> {
        let Some(object) = value.as_object() else {
            issues.push(Issue::new(
                path,
                format!("Expected object, received {}", type_name(value)),
            ));
            return None;
        };

        let mut out = Map::new();
        for field in &self.fields {
            path.push(field.name.to_string());
            match object.get(field.name) {
                Some(inner) => {
                    if let Some(checked) = check_kind(&field.kind, inner, path, issues) {
                        out.insert(field.name.to_string(), checked);
                    }
                }
                None => issues.push(Issue::new(path, "Required")),
            }
            path.pop();
        }

        if self.unknown_keys == UnknownKeys::Strict {
            let unknown: Vec<String> = object
                .keys()
                .filter(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
                .map(|key| format!("'{key}'"))
                .collect();
            if !unknown.is_empty() {
                issues.push(Issue::new(
                    path,
                    format!("Unrecognized key(s) in object: {}", unknown.join(", ")),
                ));
            }
        }

        Some(Value::Object(out))
    }
}

fn check_kind(kind: &Kind, value: &Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) -> Option<Value> {
    match kind {
        Kind::String => match value {
            Value::String(_) => Some(value.clone()),
            other => {
                issues.push(Issue::new(
                    path,
                    format!("Expected string, received {}", type_name(other)),
                ));
                None
            }
        },
        Kind::PositiveInt => match value {
            Value::Number(n) if n.as_i64().is_some() || n.as_u64().is_some() => {
                if n.as_i64().is_some_and(|v| v <= 0) {
                    issues.push(Issue::new(path, "Number must be greater than 0"));
                    None
                } else {
                    Some(value.clone())
                }
            }
            Value::Number(_) => {
                issues.push(Issue::new(path, "Expected integer, received float"));
                None
            }
            other => {
                issues.push(Issue::new(
                    path,
                    format!("Expected number, received {}", type_name(other)),
                ));
                None
            }
        },
        Kind::Literal(expected) => {
            if value == expected {
                Some(value.clone())
            } else {
                issues.push(Issue::new(
                    path,
                    format!("Invalid literal value, expected {expected}"),
                ));
                None
            }
        }
        Kind::Object(schema) => schema.check(value, path, issues),
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

/// A closed set of object shapes told apart by one literal field.
#[derive(Debug, Clone)]
pub struct DiscriminatedUnion {
    discriminator: &'static str,
    variants: Vec<ObjectSchema>,
}

impl DiscriminatedUnion {
    pub fn new(discriminator: &'static str, variants: Vec<ObjectSchema>) -> Self {
        Self {
            discriminator,
            variants,
        }
    }

    /// Discriminator values, in declaration order.
    pub fn options(&self) -> Vec<&Value> {
        self.variants
            .iter()
            .filter_map(|v| v.literal(self.discriminator))
            .collect()
    }

    pub fn variant_for(&self, tag: &Value) -> Option<&ObjectSchema> {
        self.variants
            .iter()
            .find(|v| v.literal(self.discriminator) == Some(tag))
    }

    pub fn parse(&self, value: &Value) -> Result<Value, ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::at_root(format!(
                "Expected object, received {}",
                type_name(value)
            )));
        };

        let tag = object.get(self.discriminator).unwrap_or(&Value::Null);
        match self.variant_for(tag) {
            Some(variant) => variant.parse(value),
            None => {
                let expected: Vec<String> = self.options().iter().map(ToString::to_string).collect();
                Err(ValidationError::new(vec![Issue::new(
                    &[self.discriminator.to_string()],
                    format!("Invalid discriminator value. Expected {}", expected.join(" | ")),
                )]))
            }
        }
    }
}
