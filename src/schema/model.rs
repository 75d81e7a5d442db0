//! Declarative stream schemas
//!
//! A `Schema` is plain immutable data: an ordered list of fields, each with a
//! semantic type. Every field is nullable. Schemas are built once when the
//! stream registry is initialized and never mutated afterwards.

use super::types::{JsonSchema, JsonType, SchemaProperty};
use std::collections::BTreeMap;

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// Object with declared properties; empty means free-form
    Object(Vec<Field>),
    /// Homogeneous array
    Array(Box<FieldType>),
}

impl FieldType {
    /// Object type with declared properties
    pub fn object(fields: Vec<Field>) -> Self {
        FieldType::Object(fields)
    }

    /// Array of the given item type
    pub fn array_of(item: FieldType) -> Self {
        FieldType::Array(Box::new(item))
    }

    /// Whether this is an object without declared properties
    pub fn is_free_form(&self) -> bool {
        matches!(self, FieldType::Object(fields) if fields.is_empty())
    }

    /// JSON type of this field (without nullability)
    pub fn json_type(&self) -> JsonType {
        match self {
            FieldType::String => JsonType::String,
            FieldType::Integer => JsonType::Integer,
            FieldType::Number => JsonType::Number,
            FieldType::Boolean => JsonType::Boolean,
            FieldType::Object(_) => JsonType::Object,
            FieldType::Array(_) => JsonType::Array,
        }
    }

    fn to_property(&self) -> SchemaProperty {
        match self {
            FieldType::Object(fields) => SchemaProperty::object(properties_of(fields)),
            FieldType::Array(item) => SchemaProperty::array(item.to_property()),
            scalar => SchemaProperty::nullable(scalar.json_type()),
        }
    }
}

/// A named, typed field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, FieldType::Object(fields))
    }

    /// Object whose keys are not known ahead of time
    pub fn free_form(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Object(Vec::new()))
    }

    pub fn array(name: impl Into<String>, item: FieldType) -> Self {
        Self::new(name, FieldType::array_of(item))
    }

    /// Attach a description
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_property(&self) -> SchemaProperty {
        let property = self.field_type.to_property();
        match &self.description {
            Some(d) => property.with_description(d),
            None => property,
        }
    }
}

fn properties_of(fields: &[Field]) -> BTreeMap<String, SchemaProperty> {
    fields
        .iter()
        .map(|f| (f.name.clone(), f.to_property()))
        .collect()
}

/// Ordered collection of top-level fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a top-level field
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as a JSON Schema document
    pub fn to_json_schema(&self) -> JsonSchema {
        let mut schema = JsonSchema::new();
        for field in &self.fields {
            schema.add_property(&field.name, field.to_property());
        }
        schema
    }
}
