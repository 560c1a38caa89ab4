//! Entity schema: field names, types and constraints.

use crate::error::SchemaViolation;
use modelkit_codec::{DocumentId, Fields, Value, ID_FIELD};
use modelkit_store::{Filter, IndexSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text.
    Text,
    /// Signed integer. Integral floats are accepted.
    Integer,
    /// Any number.
    Number,
    /// Boolean.
    Boolean,
    /// Array of any values.
    Array,
    /// Nested object.
    Object,
    /// Anything.
    Any,
}

impl FieldType {
    /// Returns true if a non-null `value` fits this type.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Integer, Value::Float(f)) => float_as_integer(*f).is_some(),
            (Self::Number, Value::Integer(_) | Value::Float(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Lower-case name as used in schema descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// `f` as an integer, if it is integral and inside the `i64` range.
fn float_as_integer(f: f64) -> Option<i64> {
    // 2^63, exactly representable, unlike i64::MAX.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && (-BOUND..BOUND).contains(&f)).then_some(f as i64)
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type and constraints of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Must be present and non-null on create.
    #[serde(default)]
    pub required: bool,
    /// Enforced unique by the store.
    #[serde(default)]
    pub unique: bool,
    /// Filled in when the field is absent or null on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    /// Creates an optional, non-unique field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            unique: false,
            default: None,
        }
    }

    /// A text field.
    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    /// An integer field.
    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    /// A number field.
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// A boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// An array field.
    pub fn array() -> Self {
        Self::new(FieldType::Array)
    }

    /// An object field.
    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    /// A field of any type.
    pub fn any() -> Self {
        Self::new(FieldType::Any)
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn check_value(&self, name: &str, value: &Value) -> Result<(), SchemaViolation> {
        if value.is_null() || self.field_type.accepts(value) {
            Ok(())
        } else {
            Err(SchemaViolation::new(format!(
                "field {name:?} expects {}, got {}",
                self.field_type,
                value.kind()
            )))
        }
    }
}

/// Declarative description of one entity kind.
///
/// A schema can be built in code or deserialized from a JSON object that
/// maps each field name to its spec:
///
/// ```
/// use modelkit_core::{FieldSpec, FieldType, Schema};
///
/// let schema = Schema::from_json(r#"{
///     "name": { "type": "text", "required": true, "unique": true },
///     "role": { "type": "text", "default": "user" }
/// }"#).unwrap();
///
/// assert_eq!(schema.get("name"), Some(&FieldSpec::text().required().unique()));
/// assert_eq!(schema.get("role").map(|s| s.field_type), Some(FieldType::Text));
/// ```
///
/// The identifier is not part of the schema. It is always addressable as
/// [`ID_FIELD`] in filters and sorts, and no field may take that name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Parses and checks a JSON schema description.
    ///
    /// # Errors
    ///
    /// Returns a violation if the JSON is malformed or the schema fails
    /// [`Schema::check`].
    pub fn from_json(json: &str) -> Result<Self, SchemaViolation> {
        let schema: Self = serde_json::from_str(json)
            .map_err(|e| SchemaViolation::new(format!("malformed schema: {e}")))?;
        schema.check()?;
        Ok(schema)
    }

    /// Returns the spec of a field.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Returns true if the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unique indexes the store must enforce.
    pub fn unique_indexes(&self) -> Vec<IndexSpec> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.unique)
            .map(|(name, _)| IndexSpec::unique(name.clone()))
            .collect()
    }

    /// Checks the schema itself.
    ///
    /// Field names must be non-empty and may not shadow [`ID_FIELD`];
    /// defaults must fit their field type.
    pub fn check(&self) -> Result<(), SchemaViolation> {
        for (name, spec) in &self.fields {
            if name.is_empty() {
                return Err(SchemaViolation::new("field names must not be empty"));
            }
            if name == ID_FIELD {
                return Err(SchemaViolation::new(format!(
                    "{ID_FIELD:?} is reserved for the document identifier"
                )));
            }
            if let Some(default) = &spec.default {
                spec.check_value(name, default)?;
            }
        }
        Ok(())
    }

    /// Validates a create payload and fills in defaults.
    pub fn prepare_create(&self, mut fields: Fields) -> Result<Fields, SchemaViolation> {
        self.reject_unknown(&fields)?;

        for (name, spec) in &self.fields {
            let missing = fields.get(name).map_or(true, Value::is_null);
            if missing {
                if let Some(default) = &spec.default {
                    fields.insert(name.clone(), default.clone());
                } else if spec.required {
                    return Err(SchemaViolation::new(format!("field {name:?} is required")));
                }
            }
            if let Some(value) = fields.get(name) {
                spec.check_value(name, value)?;
            }
        }
        self.normalize(&mut fields);
        Ok(fields)
    }

    /// Validates an update patch. Fields absent from the patch are left
    /// alone, so only present ones are checked.
    pub fn prepare_patch(&self, mut patch: Fields) -> Result<Fields, SchemaViolation> {
        self.reject_unknown(&patch)?;

        for (name, value) in &patch {
            let Some(spec) = self.fields.get(name) else {
                continue;
            };
            if spec.required && value.is_null() {
                return Err(SchemaViolation::new(format!(
                    "field {name:?} is required and cannot be null"
                )));
            }
            spec.check_value(name, value)?;
        }
        self.normalize(&mut patch);
        Ok(patch)
    }

    /// Stores integral floats in integer fields as integers.
    fn normalize(&self, fields: &mut Fields) {
        for (name, spec) in &self.fields {
            if spec.field_type != FieldType::Integer {
                continue;
            }
            if let Some(Value::Float(f)) = fields.get(name) {
                if let Some(n) = float_as_integer(*f) {
                    fields.insert(name.clone(), n);
                }
            }
        }
    }

    /// Checks every field a filter references, and the type of every
    /// operand against the field type.
    pub fn check_filter(&self, filter: &Filter) -> Result<(), SchemaViolation> {
        for (name, operands) in filter.field_operands() {
            if name == ID_FIELD {
                for operand in operands {
                    check_id_operand(operand)?;
                }
                continue;
            }

            let spec = self.fields.get(name).ok_or_else(|| unknown_field(name))?;
            for operand in operands {
                spec.check_value(name, operand)?;
            }
        }
        Ok(())
    }

    /// Checks that `name` can be sorted on.
    pub fn check_sort_field(&self, name: &str) -> Result<(), SchemaViolation> {
        if name == ID_FIELD || self.fields.contains_key(name) {
            Ok(())
        } else {
            Err(unknown_field(name))
        }
    }

    fn reject_unknown(&self, fields: &Fields) -> Result<(), SchemaViolation> {
        for name in fields.names() {
            if name == ID_FIELD {
                return Err(SchemaViolation::new(format!(
                    "{ID_FIELD:?} is assigned by the store and cannot be written"
                )));
            }
            if !self.fields.contains_key(name) {
                return Err(unknown_field(name));
            }
        }
        Ok(())
    }
}

fn unknown_field(name: &str) -> SchemaViolation {
    SchemaViolation::new(format!("unknown field {name:?}"))
}

fn check_id_operand(operand: &Value) -> Result<(), SchemaViolation> {
    match operand {
        Value::Null => Ok(()),
        Value::Text(text) if text.parse::<DocumentId>().is_ok() => Ok(()),
        other => Err(SchemaViolation::new(format!(
            "{ID_FIELD:?} expects a document identifier, got {}",
            other.kind()
        ))),
    }
}
