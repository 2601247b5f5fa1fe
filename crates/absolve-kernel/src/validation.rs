//! Whole-schema validation.
//!
//! Runs the static gates over a built [`Schema`] and collects every
//! violation into one deterministic [`ValidationReport`]:
//!
//! - every interface is resolvable ([`is_resolvable`]);
//! - every implementor is covariant with each interface it claims
//!   ([`check_implements`]);
//! - every field and argument type names a registered type.

use crate::covariance::check_implements;
use crate::field::Field;
use crate::resolvability::is_resolvable;
use crate::schema::{Schema, SchemaType};
use crate::type_ref::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub mod failure_class {
    pub const UNRESOLVABLE_INTERFACE: &str = "unresolvable_interface";
    pub const NON_COVARIANT_IMPLEMENTOR: &str = "non_covariant_implementor";
    pub const UNKNOWN_TYPE_REFERENCE: &str = "unknown_type_reference";
}

pub const REPORT_ACCEPTED: &str = "accepted";
pub const REPORT_REJECTED: &str = "rejected";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub failure_class: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub result: String,
    pub failure_classes: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(mut issues: Vec<ValidationIssue>) -> Self {
        issues.sort_by(|a, b| {
            (&a.path, &a.failure_class, &a.message).cmp(&(&b.path, &b.failure_class, &b.message))
        });
        let failure_classes: Vec<String> = issues
            .iter()
            .map(|issue| issue.failure_class.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            result: if issues.is_empty() {
                REPORT_ACCEPTED.to_string()
            } else {
                REPORT_REJECTED.to_string()
            },
            failure_classes,
            issues,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result == REPORT_ACCEPTED
    }
}

fn push_issue(
    issues: &mut Vec<ValidationIssue>,
    failure_class: &str,
    path: String,
    message: String,
) {
    issues.push(ValidationIssue {
        failure_class: failure_class.to_string(),
        path,
        message,
    });
}

pub fn validate_schema(schema: &Schema) -> ValidationReport {
    let mut issues = Vec::new();

    for interface in schema.interfaces() {
        if !is_resolvable(schema, interface) {
            push_issue(
                &mut issues,
                failure_class::UNRESOLVABLE_INTERFACE,
                format!("interfaces.{}", interface.identifier),
                format!(
                    "interface {} has no deterministic resolution strategy: it has no resolve_type function and not every implementor defines is_type_of",
                    interface.name
                ),
            );
        }
        for object in schema.implementors(interface.identifier.as_str()) {
            if let Err(invalid) = check_implements(interface, object, schema) {
                push_issue(
                    &mut issues,
                    failure_class::NON_COVARIANT_IMPLEMENTOR,
                    format!(
                        "objects.{}.interfaces.{}",
                        object.identifier, interface.identifier
                    ),
                    format!(
                        "object {} does not correctly implement interface {}; invalid fields: {}",
                        object.name,
                        interface.name,
                        invalid.field_list()
                    ),
                );
            }
        }
    }

    for ty in schema.types() {
        let (prefix, fields) = match ty {
            SchemaType::Interface(interface) => ("interfaces", &interface.fields),
            SchemaType::Object(object) => ("objects", &object.fields),
            SchemaType::Scalar(_) => continue,
        };
        check_field_references(
            schema,
            &format!("{prefix}.{}", ty.identifier()),
            fields,
            &mut issues,
        );
    }

    let report = ValidationReport::from_issues(issues);
    tracing::debug!(
        result = %report.result,
        issues = report.issues.len(),
        "schema validated"
    );
    report
}

fn check_field_references(
    schema: &Schema,
    owner_path: &str,
    fields: &BTreeMap<String, Field>,
    issues: &mut Vec<ValidationIssue>,
) {
    for (name, field) in fields {
        let field_path = format!("{owner_path}.fields.{name}");
        let target = field.ty.innermost();
        if schema.canonical_name(target.as_str()).is_none() {
            push_issue(
                issues,
                failure_class::UNKNOWN_TYPE_REFERENCE,
                field_path.clone(),
                format!("field {name} has type {} naming unknown type {target}", field.ty),
            );
        }
        for argument in &field.arguments {
            let target = argument.ty.innermost();
            if schema.canonical_name(target.as_str()).is_none() {
                push_issue(
                    issues,
                    failure_class::UNKNOWN_TYPE_REFERENCE,
                    format!("{field_path}.arguments.{}", argument.name),
                    format!(
                        "argument {} of field {name} has type {} naming unknown type {target}",
                        argument.name, argument.ty
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::field::Argument;
    use crate::interface::InterfaceType;
    use crate::object::ObjectType;
    use crate::type_ref::TypeRef;

    fn name_field() -> Field {
        Field::new("name", TypeRef::non_null(TypeRef::named("string")))
    }

    #[test]
    fn consistent_schema_is_accepted() {
        let schema = Schema::builder()
            .with_type(
                InterfaceType::new("named_entity", "NamedEntity")
                    .with_field(name_field())
                    .with_resolve_type(|_, _| None),
            )
            .with_type(
                ObjectType::new("person", "Person")
                    .with_field(name_field())
                    .implementing("named_entity"),
            )
            .build()
            .expect("schema should build");

        let report = validate_schema(&schema);
        assert!(report.is_accepted());
        assert!(report.failure_classes.is_empty());
        assert!(schema.into_validated().is_ok());
    }

    #[test]
    fn every_violation_is_reported_in_path_order() {
        let schema = Schema::builder()
            .with_type(
                InterfaceType::new("named_entity", "NamedEntity")
                    .with_field(name_field())
                    .with_field(Field::new("tags", TypeRef::list_of(TypeRef::named("string")))),
            )
            .with_type(
                ObjectType::new("person", "Person")
                    .with_field(Field::new("name", TypeRef::named("string")))
                    .with_field(
                        Field::new("age", TypeRef::named("integer"))
                            .with_argument(Argument::new("unit", TypeRef::named("age_unit"))),
                    )
                    .implementing("named_entity")
                    .with_is_type_of(|_| true),
            )
            .with_type(
                ObjectType::new("business", "Business")
                    .with_field(name_field())
                    .with_field(Field::new("tags", TypeRef::list_of(TypeRef::named("string"))))
                    .implementing("named_entity"),
            )
            .build()
            .expect("schema should build");

        let report = validate_schema(&schema);
        assert_eq!(report.result, REPORT_REJECTED);
        assert_eq!(
            report.failure_classes,
            vec![
                failure_class::NON_COVARIANT_IMPLEMENTOR.to_string(),
                failure_class::UNKNOWN_TYPE_REFERENCE.to_string(),
                failure_class::UNRESOLVABLE_INTERFACE.to_string(),
            ]
        );
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "interfaces.named_entity",
                "objects.person.fields.age.arguments.unit",
                "objects.person.interfaces.named_entity",
            ]
        );
        insta::assert_snapshot!(
            report.issues[2].message,
            @"object Person does not correctly implement interface NamedEntity; invalid fields: name, tags"
        );
        assert!(report.issues[0].message.contains("NamedEntity"));
        assert!(
            report.issues[0]
                .message
                .contains("no deterministic resolution strategy")
        );
    }

    #[test]
    fn unknown_field_type_is_reported() {
        let schema = Schema::builder()
            .with_type(
                ObjectType::new("person", "Person")
                    .with_field(Field::new("pet", TypeRef::named("pet"))),
            )
            .build()
            .expect("schema should build");

        let report = validate_schema(&schema);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "objects.person.fields.pet");
        assert_eq!(
            report.issues[0].failure_class,
            failure_class::UNKNOWN_TYPE_REFERENCE
        );
    }

    #[test]
    fn rejected_schema_refuses_to_validate() {
        let schema = Schema::builder()
            .with_type(InterfaceType::new("node", "Node"))
            .build()
            .expect("schema should build");

        let err = schema
            .into_validated()
            .expect_err("unresolvable interface should reject");
        let SchemaError::Invalid(report) = err else {
            panic!("expected an invalid-schema error");
        };
        assert_eq!(
            report.failure_classes,
            vec![failure_class::UNRESOLVABLE_INTERFACE.to_string()]
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ValidationReport::from_issues(vec![ValidationIssue {
            failure_class: failure_class::UNRESOLVABLE_INTERFACE.to_string(),
            path: "interfaces.node".to_string(),
            message: "interface Node has no deterministic resolution strategy".to_string(),
        }]);
        let payload = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(payload["result"], "rejected");
        assert_eq!(
            payload["failureClasses"],
            serde_json::json!(["unresolvable_interface"])
        );
        assert_eq!(payload["issues"][0]["failureClass"], "unresolvable_interface");
    }
}
