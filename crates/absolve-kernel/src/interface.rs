//! Interface (abstract) types.

use crate::field::Field;
use crate::resolve::ExecutionContext;
use crate::type_ref::TypeId;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Interface-level discriminator: maps a runtime value to the identifier of
/// its concrete type, or `None` when it cannot classify the value.
pub type ResolveTypeFn =
    Arc<dyn for<'c> Fn(&Value, &ExecutionContext<'c>) -> Option<TypeId> + Send + Sync>;

/// A type declaring a field contract that object types may implement.
///
/// The resolver slot is optional. Without one, runtime resolution falls back
/// to the `is_type_of` predicates of the implementing objects.
#[derive(Clone)]
pub struct InterfaceType {
    pub identifier: TypeId,
    pub name: String,
    pub description: Option<String>,
    pub fields: BTreeMap<String, Field>,
    pub resolve_type: Option<ResolveTypeFn>,
}

impl InterfaceType {
    pub fn new(identifier: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
            resolve_type: None,
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

    pub fn with_resolve_type<F>(mut self, resolver: F) -> Self
    where
        F: for<'c> Fn(&Value, &ExecutionContext<'c>) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn has_resolve_type(&self) -> bool {
        self.resolve_type.is_some()
    }
}

impl std::fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceType")
            .field("identifier", &self.identifier)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fields", &self.fields)
            .field("resolve_type", &self.resolve_type.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
