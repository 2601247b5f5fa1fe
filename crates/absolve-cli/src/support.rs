use absolve_kernel::{Schema, SchemaDocument};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::fs;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr subscriber. An explicit `--log` wins over `RUST_LOG`.
pub fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report a usage or input problem and stop with status 1.
pub fn exit_with(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn read_json_or_exit<T: DeserializeOwned>(path: &str, what: &str) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => exit_with(format_args!("failed to read {what} {path}: {err}")),
    };
    match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(err) => exit_with(format_args!("{what} {path} is not valid JSON: {err}")),
    }
}

/// Load, header-check and build a schema document.
pub fn load_schema_or_exit(path: &str) -> Schema {
    let payload: Value = read_json_or_exit(path, "schema document");
    let document = SchemaDocument::from_value(payload)
        .unwrap_or_else(|err| exit_with(format_args!("invalid schema document {path}: {err}")));
    document
        .build()
        .unwrap_or_else(|err| exit_with(format_args!("failed to build schema from {path}: {err}")))
}

/// Parse a `--value` argument: inline JSON, or `@path` for a JSON file.
pub fn parse_value_arg_or_exit(raw: &str) -> Value {
    if let Some(path) = raw.strip_prefix('@') {
        return read_json_or_exit(path.trim(), "value");
    }
    serde_json::from_str(raw)
        .unwrap_or_else(|err| exit_with(format_args!("--value must be JSON (or @path): {err}")))
}

pub fn print_json_or_exit(payload: &Value, command: &str) {
    match serde_json::to_string_pretty(payload) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            eprintln!("error: failed to render {command} payload: {err}");
            std::process::exit(2);
        }
    }
}
