//! Runtime resolution of interface-typed values to concrete object types.
//!
//! Exactly one strategy runs per call:
//!
//! 1. The interface's own resolver, when present. Implementor predicates are
//!    never consulted on this path.
//! 2. Otherwise each implementor's `is_type_of`, in implementor-index order.
//!    The first match wins, so resolution is deterministic even when several
//!    predicates would accept the same value.
//!
//! Failing to classify a value is an ordinary outcome
//! ([`ResolvedType::Unresolved`]); the execution layer turns it into a null
//! plus a field error. A resolver naming a type the schema does not hold is a
//! configuration error ([`ResolveError`]).

use crate::error::ResolveError;
use crate::interface::InterfaceType;
use crate::object::ObjectType;
use crate::schema::{Schema, SchemaType};
use crate::type_ref::TypeId;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-request state handed to interface resolvers.
///
/// Carries the schema being executed, caller-defined request values
/// (viewer, locale, feature flags) and the response path of the field
/// being resolved.
#[derive(Debug, Clone)]
pub struct ExecutionContext<'s> {
    schema: &'s Schema,
    values: BTreeMap<String, Value>,
    path: Vec<String>,
}

impl<'s> ExecutionContext<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
            path: Vec::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }
}

/// Outcome of a resolution call.
#[derive(Debug, Clone)]
pub enum ResolvedType<'s> {
    /// The concrete object type (lookup requested).
    Object(&'s ObjectType),
    /// The concrete type's identifier (lookup not requested).
    Identifier(TypeId),
    /// No resolver or predicate claimed the value.
    Unresolved,
}

impl<'s> ResolvedType<'s> {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Identifier of the resolved type, whichever form it came back in.
    pub fn identifier(&self) -> Option<&TypeId> {
        match self {
            Self::Object(object) => Some(&object.identifier),
            Self::Identifier(identifier) => Some(identifier),
            Self::Unresolved => None,
        }
    }

    pub fn object(&self) -> Option<&'s ObjectType> {
        match self {
            Self::Object(object) => Some(*object),
            _ => None,
        }
    }
}

/// Resolve `value` to the concrete object type behind `interface`.
pub fn resolve_type<'s>(
    interface: &InterfaceType,
    value: &Value,
    context: &ExecutionContext<'s>,
) -> Result<ResolvedType<'s>, ResolveError> {
    resolve_type_with(interface, value, context, true)
}

/// Like [`resolve_type`], but with `lookup = false` only the discriminating
/// identifier is returned and the registry is not consulted for it.
pub fn resolve_type_with<'s>(
    interface: &InterfaceType,
    value: &Value,
    context: &ExecutionContext<'s>,
    lookup: bool,
) -> Result<ResolvedType<'s>, ResolveError> {
    let schema = context.schema();

    if let Some(resolver) = &interface.resolve_type {
        let Some(identifier) = resolver(value, context) else {
            tracing::debug!(interface = %interface.identifier, "resolver did not classify value");
            return Ok(ResolvedType::Unresolved);
        };
        if !lookup {
            return Ok(ResolvedType::Identifier(identifier));
        }
        return lookup_object(schema, interface, identifier).map(ResolvedType::Object);
    }

    for object in schema.implementors(interface.identifier.as_str()) {
        let Some(is_type_of) = &object.is_type_of else {
            continue;
        };
        if !is_type_of(value) {
            continue;
        }
        tracing::debug!(
            interface = %interface.identifier,
            object = %object.identifier,
            "implementor predicate matched"
        );
        return Ok(if lookup {
            ResolvedType::Object(object)
        } else {
            ResolvedType::Identifier(object.identifier.clone())
        });
    }

    tracing::debug!(interface = %interface.identifier, "no implementor predicate matched");
    Ok(ResolvedType::Unresolved)
}

fn lookup_object<'s>(
    schema: &'s Schema,
    interface: &InterfaceType,
    identifier: TypeId,
) -> Result<&'s ObjectType, ResolveError> {
    match schema.lookup_type(identifier.as_str()) {
        Some(SchemaType::Object(object)) => Ok(object),
        Some(other) => {
            tracing::warn!(
                interface = %interface.identifier,
                resolved = %identifier,
                kind = %other.kind(),
                "resolver named a non-object type"
            );
            Err(ResolveError::NotAnObject {
                interface: interface.identifier.clone(),
                identifier,
                kind: other.kind(),
            })
        }
        None => {
            tracing::warn!(
                interface = %interface.identifier,
                resolved = %identifier,
                "resolver named an unknown type"
            );
            Err(ResolveError::UnknownType {
                interface: interface.identifier.clone(),
                identifier,
            })
        }
    }
}
