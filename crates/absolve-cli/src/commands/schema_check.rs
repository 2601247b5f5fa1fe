use crate::support::{load_schema_or_exit, print_json_or_exit};
use absolve_kernel::{Schema, ValidationReport, is_resolvable, validate_schema};
use serde::Serialize;
use serde_json::json;

const SCHEMA_CHECK_KIND: &str = "absolve.schema_check.v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InterfaceSummary {
    identifier: String,
    name: String,
    implementors: Vec<String>,
    resolvable: bool,
}

pub fn run(schema_path: String, json_output: bool) {
    let schema = load_schema_or_exit(&schema_path);
    let report = validate_schema(&schema);
    let interfaces = summarize_interfaces(&schema);
    tracing::debug!(
        schema = %schema_path,
        result = %report.result,
        issues = report.issues.len(),
        "schema check finished"
    );

    let accepted = report.is_accepted();
    emit_report(report, &interfaces, &schema_path, json_output);
    if !accepted {
        std::process::exit(1);
    }
}

fn summarize_interfaces(schema: &Schema) -> Vec<InterfaceSummary> {
    schema
        .interfaces()
        .map(|interface| InterfaceSummary {
            identifier: interface.identifier.to_string(),
            name: interface.name.clone(),
            implementors: schema
                .implementor_ids(interface.identifier.as_str())
                .iter()
                .map(ToString::to_string)
                .collect(),
            resolvable: is_resolvable(schema, interface),
        })
        .collect()
}

fn emit_report(
    report: ValidationReport,
    interfaces: &[InterfaceSummary],
    schema_path: &str,
    json_output: bool,
) {
    if json_output {
        let payload = json!({
            "schema": 1,
            "checkKind": SCHEMA_CHECK_KIND,
            "schemaPath": schema_path,
            "result": report.result,
            "failureClasses": report.failure_classes,
            "issues": report.issues,
            "interfaces": interfaces,
        });
        print_json_or_exit(&payload, "schema-check");
        return;
    }

    println!("absolve schema-check");
    println!("  Schema path: {schema_path}");
    println!("  Result: {}", report.result);
    println!("  Interfaces: {}", interfaces.len());
    for interface in interfaces {
        println!(
            "    {} ({}): implementors={} resolvable={}",
            interface.name,
            interface.identifier,
            if interface.implementors.is_empty() {
                "-".to_string()
            } else {
                interface.implementors.join(",")
            },
            interface.resolvable
        );
    }
    println!("  Failure classes: {}", report.failure_classes.len());
    println!("  Issues: {}", report.issues.len());
    for issue in &report.issues {
        println!(
            "    - [{}] {}: {}",
            issue.failure_class, issue.path, issue.message
        );
    }
}
