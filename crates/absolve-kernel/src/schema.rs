//! The immutable schema registry and its builder.
//!
//! A [`Schema`] holds every registered type by identifier and by canonical
//! name, plus the implementor index: interface identifier → object
//! identifiers, in object registration order. The index is derived once in
//! [`SchemaBuilder::build`] and never patched afterwards.

use crate::error::SchemaError;
use crate::field::Field;
use crate::interface::InterfaceType;
use crate::object::ObjectType;
use crate::type_ref::{TypeId, TypeRegistry};
use crate::validation::validate_schema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Built-in leaf types: (identifier, canonical name).
pub const BUILTIN_SCALARS: &[(&str, &str)] = &[
    ("integer", "Int"),
    ("float", "Float"),
    ("string", "String"),
    ("boolean", "Boolean"),
    ("id", "ID"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Interface,
    Object,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Scalar => "scalar",
            Self::Interface => "interface",
            Self::Object => "object",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarType {
    pub identifier: TypeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScalarType {
    pub fn new(identifier: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Any type the registry can hold.
#[derive(Debug, Clone)]
pub enum SchemaType {
    Scalar(ScalarType),
    Interface(InterfaceType),
    Object(ObjectType),
}

impl SchemaType {
    pub fn identifier(&self) -> &TypeId {
        match self {
            Self::Scalar(ty) => &ty.identifier,
            Self::Interface(ty) => &ty.identifier,
            Self::Object(ty) => &ty.identifier,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(ty) => &ty.name,
            Self::Interface(ty) => &ty.name,
            Self::Object(ty) => &ty.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Interface(_) => TypeKind::Interface,
            Self::Object(_) => TypeKind::Object,
        }
    }

    /// Declared fields; scalars have none.
    pub fn fields(&self) -> Option<&BTreeMap<String, Field>> {
        match self {
            Self::Scalar(_) => None,
            Self::Interface(ty) => Some(&ty.fields),
            Self::Object(ty) => Some(&ty.fields),
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Self::Interface(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(ty) => Some(ty),
            _ => None,
        }
    }

    /// Whether this type declares `interface`. Only object types implement.
    pub fn is_implementor(&self, interface: &str) -> bool {
        self.as_object()
            .is_some_and(|object| object.is_implementor(interface))
    }
}

impl From<ScalarType> for SchemaType {
    fn from(value: ScalarType) -> Self {
        Self::Scalar(value)
    }
}

impl From<InterfaceType> for SchemaType {
    fn from(value: InterfaceType) -> Self {
        Self::Interface(value)
    }
}

impl From<ObjectType> for SchemaType {
    fn from(value: ObjectType) -> Self {
        Self::Object(value)
    }
}

/// A built, read-only schema.
///
/// `Schema` is `Send + Sync`; share it behind an `Arc` or a plain reference
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct Schema {
    types: Vec<SchemaType>,
    by_identifier: BTreeMap<TypeId, usize>,
    by_name: BTreeMap<String, usize>,
    implementors: BTreeMap<TypeId, Vec<TypeId>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Look a type up by identifier, falling back to canonical name.
    pub fn lookup_type(&self, key: &str) -> Option<&SchemaType> {
        self.by_identifier
            .get(key)
            .or_else(|| self.by_name.get(key))
            .map(|idx| &self.types[*idx])
    }

    /// Exact identifier lookup.
    pub fn get(&self, identifier: &str) -> Option<&SchemaType> {
        self.by_identifier
            .get(identifier)
            .map(|idx| &self.types[*idx])
    }

    pub fn interface(&self, identifier: &str) -> Option<&InterfaceType> {
        self.get(identifier).and_then(SchemaType::as_interface)
    }

    pub fn object(&self, identifier: &str) -> Option<&ObjectType> {
        self.get(identifier).and_then(SchemaType::as_object)
    }

    /// All types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.iter()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceType> {
        self.types.iter().filter_map(SchemaType::as_interface)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter().filter_map(SchemaType::as_object)
    }

    /// Identifiers of the objects claiming `interface`, in index order.
    pub fn implementor_ids(&self, interface: &str) -> &[TypeId] {
        self.implementors
            .get(interface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Objects claiming `interface`, in index order.
    pub fn implementors<'a>(&'a self, interface: &str) -> impl Iterator<Item = &'a ObjectType> {
        self.implementor_ids(interface)
            .iter()
            .filter_map(move |id| self.object(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run whole-schema validation and keep the schema only if accepted.
    pub fn into_validated(self) -> Result<Self, SchemaError> {
        let report = validate_schema(&self);
        if report.is_accepted() {
            Ok(self)
        } else {
            Err(SchemaError::Invalid(report))
        }
    }
}

impl TypeRegistry for Schema {
    fn canonical_name(&self, key: &str) -> Option<&str> {
        self.lookup_type(key).map(SchemaType::name)
    }
}

/// Collects types in registration order and derives the implementor index.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    types: Vec<SchemaType>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// A builder pre-populated with the built-in scalars.
    pub fn new() -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|(identifier, name)| SchemaType::Scalar(ScalarType::new(*identifier, *name)))
            .collect();
        Self { types }
    }

    /// A builder with no types at all.
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    pub fn register(&mut self, ty: impl Into<SchemaType>) -> &mut Self {
        self.types.push(ty.into());
        self
    }

    pub fn with_type(mut self, ty: impl Into<SchemaType>) -> Self {
        self.register(ty);
        self
    }

    /// Freeze the registered types into a [`Schema`].
    ///
    /// Fails on duplicate identifiers or names, on an identifier that is
    /// another type's name, and on objects claiming an interface that is
    /// missing or is not an interface. A repeated claim counts once. Covariance and
    /// resolvability are not checked here; see [`Schema::into_validated`].
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut by_identifier: BTreeMap<TypeId, usize> = BTreeMap::new();
        let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
        for (idx, ty) in self.types.iter().enumerate() {
            if by_identifier.insert(ty.identifier().clone(), idx).is_some() {
                return Err(SchemaError::DuplicateType {
                    identifier: ty.identifier().clone(),
                });
            }
            if by_name.insert(ty.name().to_string(), idx).is_some() {
                return Err(SchemaError::DuplicateTypeName {
                    name: ty.name().to_string(),
                });
            }
        }
        for (name, name_idx) in &by_name {
            if let Some(id_idx) = by_identifier.get(name.as_str())
                && id_idx != name_idx
            {
                return Err(SchemaError::AmbiguousTypeKey {
                    key: name.clone(),
                    identifier_of: self.types[*id_idx].identifier().clone(),
                    name_of: self.types[*name_idx].identifier().clone(),
                });
            }
        }

        let mut implementors: BTreeMap<TypeId, Vec<TypeId>> = self
            .types
            .iter()
            .filter_map(SchemaType::as_interface)
            .map(|interface| (interface.identifier.clone(), Vec::new()))
            .collect();
        for object in self.types.iter().filter_map(SchemaType::as_object) {
            let mut claimed_once: BTreeSet<&TypeId> = BTreeSet::new();
            for interface in &object.interfaces {
                if !claimed_once.insert(interface) {
                    tracing::debug!(
                        object = %object.identifier,
                        interface = %interface,
                        "ignoring repeated interface claim"
                    );
                    continue;
                }
                let Some(idx) = by_identifier.get(interface) else {
                    return Err(SchemaError::UnknownInterface {
                        object: object.identifier.clone(),
                        interface: interface.clone(),
                    });
                };
                let claimed = &self.types[*idx];
                if claimed.kind() != TypeKind::Interface {
                    return Err(SchemaError::NotAnInterface {
                        object: object.identifier.clone(),
                        interface: interface.clone(),
                        kind: claimed.kind(),
                    });
                }
                implementors
                    .entry(interface.clone())
                    .or_default()
                    .push(object.identifier.clone());
            }
        }

        tracing::debug!(
            types = self.types.len(),
            interfaces = implementors.len(),
            "schema built"
        );
        Ok(Schema {
            types: self.types,
            by_identifier,
            by_name,
            implementors,
        })
    }
}
