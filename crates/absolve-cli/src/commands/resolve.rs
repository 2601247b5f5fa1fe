use crate::support::{
    exit_with, load_schema_or_exit, parse_value_arg_or_exit, print_json_or_exit,
};
use absolve_kernel::{ExecutionContext, ResolvedType, SchemaType, resolve_type_with};
use serde_json::{Value, json};

const RESOLVE_KIND: &str = "absolve.resolve.v1";

pub struct Args {
    pub schema: String,
    pub interface: String,
    pub value: String,
    pub identifier_only: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let schema = load_schema_or_exit(&args.schema);
    let Some(interface) = schema
        .lookup_type(args.interface.trim())
        .and_then(SchemaType::as_interface)
    else {
        exit_with(format_args!(
            "{:?} is not an interface in {}",
            args.interface, args.schema
        ));
    };
    let value = parse_value_arg_or_exit(&args.value);
    let lookup = !args.identifier_only;

    let context = ExecutionContext::new(&schema);
    let payload = match resolve_type_with(interface, &value, &context, lookup) {
        Ok(ResolvedType::Object(object)) => json!({
            "result": "resolved",
            "identifier": object.identifier,
            "name": object.name,
        }),
        Ok(ResolvedType::Identifier(identifier)) => json!({
            "result": "resolved",
            "identifier": identifier,
            "name": Value::Null,
        }),
        Ok(ResolvedType::Unresolved) => json!({
            "result": "unresolved",
            "identifier": Value::Null,
            "name": Value::Null,
        }),
        Err(err) => {
            if args.json {
                let payload = json!({
                    "schema": 1,
                    "resolveKind": RESOLVE_KIND,
                    "schemaPath": args.schema,
                    "interface": interface.identifier,
                    "lookup": lookup,
                    "result": "error",
                    "error": err.to_string(),
                });
                print_json_or_exit(&payload, "resolve");
            } else {
                eprintln!("error: {err}");
            }
            std::process::exit(1);
        }
    };

    if args.json {
        let mut payload = payload;
        if let Some(object) = payload.as_object_mut() {
            object.insert("schema".to_string(), json!(1));
            object.insert("resolveKind".to_string(), json!(RESOLVE_KIND));
            object.insert("schemaPath".to_string(), json!(args.schema));
            object.insert("interface".to_string(), json!(interface.identifier));
            object.insert("lookup".to_string(), json!(lookup));
        }
        print_json_or_exit(&payload, "resolve");
        return;
    }

    println!("absolve resolve");
    println!("  Schema path: {}", args.schema);
    println!("  Interface: {} ({})", interface.name, interface.identifier);
    println!("  Lookup: {lookup}");
    println!(
        "  Result: {}",
        payload["result"].as_str().unwrap_or("unresolved")
    );
    if let Some(identifier) = payload["identifier"].as_str() {
        println!("  Identifier: {identifier}");
    }
    if let Some(name) = payload["name"].as_str() {
        println!("  Name: {name}");
    }
}
