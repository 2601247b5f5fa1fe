//! Concrete object types.

use crate::field::Field;
use crate::type_ref::TypeId;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-object predicate: does this runtime value belong to the object type?
pub type IsTypeOfFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A concrete type with a fixed field set.
///
/// `interfaces` holds the identifiers of the interfaces this type claims,
/// in declaration order and without duplicates.
#[derive(Clone)]
pub struct ObjectType {
    pub identifier: TypeId,
    pub name: String,
    pub description: Option<String>,
    pub fields: BTreeMap<String, Field>,
    pub interfaces: Vec<TypeId>,
    pub is_type_of: Option<IsTypeOfFn>,
}

impl ObjectType {
    pub fn new(identifier: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
            interfaces: Vec::new(),
            is_type_of: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Claim an interface. Claiming the same interface twice is a no-op.
    pub fn implementing(mut self, interface: impl Into<TypeId>) -> Self {
        let interface = interface.into();
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    pub fn with_is_type_of<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(predicate));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Whether this type declares `interface` among its interfaces.
    ///
    /// Looks only at the declared set; it says nothing about whether the
    /// declaration is covariant.
    pub fn is_implementor(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|id| id.as_str() == interface)
    }

    pub fn has_is_type_of(&self) -> bool {
        self.is_type_of.is_some()
    }
}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectType")
            .field("identifier", &self.identifier)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .field("is_type_of", &self.is_type_of.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
