//! Whether an interface can always be narrowed to a concrete type.

use crate::interface::InterfaceType;
use crate::schema::Schema;

/// An interface is resolvable when it carries its own resolver, or when it
/// has implementors and every one of them carries an `is_type_of` predicate.
///
/// No resolver and no implementors is not resolvable: nothing could ever be
/// produced for the interface.
pub fn is_resolvable(schema: &Schema, interface: &InterfaceType) -> bool {
    if interface.has_resolve_type() {
        return true;
    }
    let ids = schema.implementor_ids(interface.identifier.as_str());
    !ids.is_empty()
        && ids.iter().all(|id| {
            schema
                .object(id.as_str())
                .is_some_and(|object| object.has_is_type_of())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;
    use crate::type_ref::TypeId;

    fn schema_with(interface: InterfaceType, objects: Vec<ObjectType>) -> Schema {
        objects
            .into_iter()
            .fold(Schema::builder().with_type(interface), |builder, object| {
                builder.with_type(object)
            })
            .build()
            .expect("schema should build")
    }

    #[test]
    fn resolver_alone_is_enough() {
        let schema = schema_with(
            InterfaceType::new("node", "Node").with_resolve_type(|_, _| None),
            vec![ObjectType::new("user", "User").implementing("node")],
        );
        let node = schema.interface("node").expect("node should exist");
        assert!(is_resolvable(&schema, node));
    }

    #[test]
    fn one_missing_predicate_breaks_resolvability() {
        let schema = schema_with(
            InterfaceType::new("node", "Node"),
            vec![
                ObjectType::new("user", "User")
                    .implementing("node")
                    .with_is_type_of(|_| true),
                ObjectType::new("post", "Post")
                    .implementing("node")
                    .with_is_type_of(|_| true),
                ObjectType::new("comment", "Comment").implementing("node"),
            ],
        );
        let node = schema.interface("node").expect("node should exist");
        assert!(!is_resolvable(&schema, node));
    }

    #[test]
    fn every_predicate_present_is_resolvable() {
        let schema = schema_with(
            InterfaceType::new("node", "Node"),
            vec![
                ObjectType::new("user", "User")
                    .implementing("node")
                    .with_is_type_of(|_| false),
                ObjectType::new("post", "Post")
                    .implementing("node")
                    .with_is_type_of(|_| false),
            ],
        );
        let node = schema.interface("node").expect("node should exist");
        assert!(is_resolvable(&schema, node));
    }

    #[test]
    fn no_resolver_and_no_implementors_is_not_resolvable() {
        let schema = schema_with(InterfaceType::new("node", "Node"), vec![]);
        let node = schema.interface("node").expect("node should exist");
        assert!(!is_resolvable(&schema, node));
        assert_eq!(schema.implementor_ids("node"), &[] as &[TypeId]);
    }
}
