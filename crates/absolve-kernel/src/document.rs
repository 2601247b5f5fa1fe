//! JSON schema documents.
//!
//! A document describes already-decided types as data. Resolver and
//! predicate functions cannot travel in JSON, so documents carry declarative
//! stand-ins that are compiled into closures when the schema is built:
//!
//! - [`Discriminator`] for an interface's `resolveType`;
//! - [`TypePredicate`] for an object's `isTypeOf`.
//!
//! ```json
//! {
//!   "schema": 1,
//!   "documentKind": "absolve.schema_document.v1",
//!   "types": [
//!     { "kind": "interface", "identifier": "named_entity", "name": "NamedEntity",
//!       "fields": [{ "name": "name", "type": "String!" }],
//!       "resolveType": { "strategy": "by_presence",
//!                        "rules": [{ "key": "age", "identifier": "person" }] } },
//!     { "kind": "object", "identifier": "person", "name": "Person",
//!       "interfaces": ["named_entity"],
//!       "fields": [{ "name": "name", "type": "String!" }, { "name": "age", "type": "Int" }] }
//!   ]
//! }
//! ```

use crate::error::SchemaError;
use crate::field::Field;
use crate::interface::InterfaceType;
use crate::object::ObjectType;
use crate::schema::{ScalarType, Schema, SchemaBuilder};
use crate::type_ref::TypeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const DOCUMENT_KIND: &str = "absolve.schema_document.v1";
pub const DOCUMENT_SCHEMA: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema document schema must equal {DOCUMENT_SCHEMA}, got {found}")]
    UnsupportedSchema { found: u32 },

    #[error("schema document documentKind must equal {DOCUMENT_KIND:?}, got {found:?}")]
    UnsupportedKind { found: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub schema: u32,
    pub document_kind: String,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeEntry {
    Scalar {
        identifier: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Interface {
        identifier: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        fields: Vec<Field>,
        #[serde(
            default,
            rename = "resolveType",
            skip_serializing_if = "Option::is_none"
        )]
        resolve_type: Option<Discriminator>,
    },
    Object {
        identifier: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        fields: Vec<Field>,
        #[serde(default)]
        interfaces: Vec<String>,
        #[serde(default, rename = "isTypeOf", skip_serializing_if = "Option::is_none")]
        is_type_of: Option<TypePredicate>,
    },
}

/// Declarative interface resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Discriminator {
    /// Read a string field of the value (e.g. `__typename`). With a non-empty
    /// `mapping` the string is translated; otherwise it is the identifier.
    ByField {
        field: String,
        #[serde(default)]
        mapping: BTreeMap<String, String>,
    },
    /// The first rule whose key is present in the value decides.
    ByPresence { rules: Vec<PresenceRule> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRule {
    pub key: String,
    pub identifier: String,
}

impl Discriminator {
    pub fn classify(&self, value: &Value) -> Option<TypeId> {
        match self {
            Self::ByField { field, mapping } => {
                let raw = value.get(field)?.as_str()?;
                if mapping.is_empty() {
                    return Some(TypeId::from(raw));
                }
                mapping.get(raw).map(|identifier| TypeId::from(identifier.as_str()))
            }
            Self::ByPresence { rules } => {
                let object = value.as_object()?;
                rules
                    .iter()
                    .find(|rule| object.contains_key(&rule.key))
                    .map(|rule| TypeId::from(rule.identifier.as_str()))
            }
        }
    }
}

/// Declarative object predicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "predicate", rename_all = "snake_case")]
pub enum TypePredicate {
    /// The value is an object containing every listed key.
    HasKeys { keys: Vec<String> },
    /// The value is an object whose `field` equals `value`.
    FieldEquals { field: String, value: Value },
}

impl TypePredicate {
    pub fn matches(&self, candidate: &Value) -> bool {
        let Some(object) = candidate.as_object() else {
            return false;
        };
        match self {
            Self::HasKeys { keys } => keys.iter().all(|key| object.contains_key(key)),
            Self::FieldEquals { field, value } => object.get(field) == Some(value),
        }
    }
}

impl SchemaDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.check_header()?;
        Ok(document)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_value(value)?;
        document.check_header()?;
        Ok(document)
    }

    fn check_header(&self) -> Result<(), DocumentError> {
        if self.schema != DOCUMENT_SCHEMA {
            return Err(DocumentError::UnsupportedSchema { found: self.schema });
        }
        if self.document_kind.trim() != DOCUMENT_KIND {
            return Err(DocumentError::UnsupportedKind {
                found: self.document_kind.clone(),
            });
        }
        Ok(())
    }

    /// Register every entry, in document order, on a builder that already
    /// holds the built-in scalars. A type listing the same field name twice
    /// is rejected.
    pub fn into_builder(self) -> Result<SchemaBuilder, DocumentError> {
        let mut builder = SchemaBuilder::new();
        for entry in self.types {
            match entry {
                TypeEntry::Scalar {
                    identifier,
                    name,
                    description,
                } => {
                    let mut scalar = ScalarType::new(identifier, name);
                    scalar.description = description;
                    builder.register(scalar);
                }
                TypeEntry::Interface {
                    identifier,
                    name,
                    description,
                    fields,
                    resolve_type,
                } => {
                    ensure_unique_fields(&identifier, &fields)?;
                    let mut interface = fields
                        .into_iter()
                        .fold(InterfaceType::new(identifier, name), InterfaceType::with_field);
                    interface.description = description;
                    if let Some(discriminator) = resolve_type {
                        interface = interface
                            .with_resolve_type(move |value, _| discriminator.classify(value));
                    }
                    builder.register(interface);
                }
                TypeEntry::Object {
                    identifier,
                    name,
                    description,
                    fields,
                    interfaces,
                    is_type_of,
                } => {
                    ensure_unique_fields(&identifier, &fields)?;
                    let mut object = fields
                        .into_iter()
                        .fold(ObjectType::new(identifier, name), ObjectType::with_field);
                    object = interfaces
                        .into_iter()
                        .fold(object, ObjectType::implementing);
                    object.description = description;
                    if let Some(predicate) = is_type_of {
                        object = object.with_is_type_of(move |value| predicate.matches(value));
                    }
                    builder.register(object);
                }
            }
        }
        Ok(builder)
    }

    /// Build the schema with the builder's registration checks. Covariance
    /// and resolvability are left to [`crate::validate_schema`].
    pub fn build(self) -> Result<Schema, DocumentError> {
        Ok(self.into_builder()?.build()?)
    }
}

fn ensure_unique_fields(owner: &str, fields: &[Field]) -> Result<(), SchemaError> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                owner: TypeId::from(owner),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}
