//! Interface covariance: does an object provide every interface field with a
//! compatible type?
//!
//! The check collects every offending field before returning so a schema
//! author can fix all of them in one pass.

use crate::interface::InterfaceType;
use crate::object::ObjectType;
use crate::type_ref::{TypeId, TypeRegistry, compatible};
use std::collections::BTreeSet;

/// The interface fields an object fails to provide compatibly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "object {object} does not correctly implement interface {interface}: invalid fields {}",
    join_fields(.fields)
)]
pub struct InvalidFields {
    pub interface: TypeId,
    pub object: TypeId,
    /// Interface field names that are missing or incompatibly typed.
    pub fields: BTreeSet<String>,
}

fn join_fields(fields: &BTreeSet<String>) -> String {
    fields.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl InvalidFields {
    /// Invalid field names, sorted and comma-separated.
    pub fn field_list(&self) -> String {
        join_fields(&self.fields)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }
}

/// Check that `object` implements `interface` field for field.
///
/// A field is invalid when the object lacks it or declares it with a type
/// that is not [`compatible`] with the interface's. Arguments are not part
/// of the contract.
pub fn check_implements<R>(
    interface: &InterfaceType,
    object: &ObjectType,
    registry: &R,
) -> Result<(), InvalidFields>
where
    R: TypeRegistry + ?Sized,
{
    let mut invalid = BTreeSet::new();
    for (name, interface_field) in &interface.fields {
        let Some(object_field) = object.field(name) else {
            tracing::debug!(
                interface = %interface.identifier,
                object = %object.identifier,
                field = %name,
                "implementor is missing interface field"
            );
            invalid.insert(name.clone());
            continue;
        };
        if !compatible(&interface_field.ty, &object_field.ty, registry) {
            tracing::debug!(
                interface = %interface.identifier,
                object = %object.identifier,
                field = %name,
                expected = %interface_field.ty,
                found = %object_field.ty,
                "implementor field type is not compatible"
            );
            invalid.insert(name.clone());
        }
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(InvalidFields {
            interface: interface.identifier.clone(),
            object: object.identifier.clone(),
            fields: invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Argument, Field};
    use crate::schema::{ScalarType, Schema};
    use crate::type_ref::TypeRef;

    fn registry() -> Schema {
        Schema::builder()
            .with_type(ScalarType::new("x", "X"))
            .with_type(ScalarType::new("y", "Y"))
            .with_type(ScalarType::new("z", "Z"))
            .build()
            .expect("registry should build")
    }

    fn contract() -> InterfaceType {
        InterfaceType::new("contract", "Contract")
            .with_field(Field::new("a", TypeRef::named("x")))
            .with_field(Field::new(
                "b",
                TypeRef::list_of(TypeRef::non_null(TypeRef::named("y"))),
            ))
    }

    #[test]
    fn reports_every_invalid_field() {
        let object =
            ObjectType::new("thing", "Thing").with_field(Field::new("a", TypeRef::named("z")));

        let err = check_implements(&contract(), &object, &registry())
            .expect_err("object should not implement the contract");
        assert_eq!(
            err.fields,
            BTreeSet::from(["a".to_string(), "b".to_string()])
        );
        assert!(err.contains("a") && err.contains("b"));
        assert_eq!(err.field_list(), "a, b");
        assert!(err.to_string().ends_with(&err.field_list()));
        insta::assert_snapshot!(
            err.to_string(),
            @"object thing does not correctly implement interface contract: invalid fields a, b"
        );
    }

    #[test]
    fn exact_wrapping_passes() {
        let object = ObjectType::new("thing", "Thing")
            .with_field(Field::new("a", TypeRef::named("X")))
            .with_field(Field::new(
                "b",
                TypeRef::list_of(TypeRef::non_null(TypeRef::named("y"))),
            ))
            .with_field(Field::new("extra", TypeRef::named("z")));

        assert_eq!(check_implements(&contract(), &object, &registry()), Ok(()));
    }

    #[test]
    fn stricter_wrapping_is_still_invalid() {
        let object = ObjectType::new("thing", "Thing")
            .with_field(Field::new("a", TypeRef::non_null(TypeRef::named("x"))))
            .with_field(Field::new(
                "b",
                TypeRef::non_null(TypeRef::list_of(TypeRef::non_null(TypeRef::named("y")))),
            ));

        let err = check_implements(&contract(), &object, &registry())
            .expect_err("non-null widening should be rejected");
        assert_eq!(err.fields.len(), 2);
    }

    #[test]
    fn arguments_do_not_affect_covariance() {
        let object = ObjectType::new("thing", "Thing")
            .with_field(
                Field::new("a", TypeRef::named("x"))
                    .with_argument(Argument::new("format", TypeRef::named("string"))),
            )
            .with_field(Field::new(
                "b",
                TypeRef::list_of(TypeRef::non_null(TypeRef::named("y"))),
            ));
        assert!(check_implements(&contract(), &object, &registry()).is_ok());
    }

    #[test]
    fn interface_without_fields_is_trivially_implemented() {
        let empty = InterfaceType::new("marker", "Marker");
        let object = ObjectType::new("thing", "Thing");
        assert!(check_implements(&empty, &object, &registry()).is_ok());
    }
}
