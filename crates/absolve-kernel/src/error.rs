//! Error types for schema construction and runtime type resolution.

use crate::schema::TypeKind;
use crate::type_ref::TypeId;
use crate::validation::ValidationReport;

/// Errors that make a schema unusable. None of these may reach request
/// execution; the caller must refuse to serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two registered types share an identifier.
    #[error("duplicate type identifier: {identifier}")]
    DuplicateType { identifier: TypeId },

    /// Two registered types share a canonical name.
    #[error("duplicate type name: {name}")]
    DuplicateTypeName { name: String },

    /// One type's identifier is another type's canonical name, so the key
    /// would not look up the type named by it.
    #[error("type key {key} is the identifier of {identifier_of} and the name of {name_of}")]
    AmbiguousTypeKey {
        key: String,
        identifier_of: TypeId,
        name_of: TypeId,
    },

    /// An interface or object declares the same field name twice.
    #[error("type {owner} declares field {field} more than once")]
    DuplicateField { owner: TypeId, field: String },

    /// An object claims an interface identifier the schema does not define.
    #[error("object {object} claims unknown interface {interface}")]
    UnknownInterface { object: TypeId, interface: TypeId },

    /// An object claims a type that exists but is not an interface.
    #[error("object {object} claims {interface}, which is a {kind}, not an interface")]
    NotAnInterface {
        object: TypeId,
        interface: TypeId,
        kind: TypeKind,
    },

    /// Whole-schema validation rejected the schema.
    #[error("schema rejected: {}", summarize(.0))]
    Invalid(ValidationReport),
}

fn summarize(report: &ValidationReport) -> String {
    report
        .issues
        .iter()
        .map(|issue| format!("{} ({})", issue.message, issue.failure_class))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration errors surfaced while resolving an abstract type.
///
/// A resolver that cannot classify a value is not an error; see
/// [`crate::ResolvedType::Unresolved`]. These variants mean the resolver and
/// the schema disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("interface {interface} resolved a value to unknown type {identifier}")]
    UnknownType {
        interface: TypeId,
        identifier: TypeId,
    },

    #[error(
        "interface {interface} resolved a value to {identifier}, which is a {kind}, not an object type"
    )]
    NotAnObject {
        interface: TypeId,
        identifier: TypeId,
        kind: TypeKind,
    },
}
