//! Absolve CLI: the `absolve` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.log.as_deref());

    match cli.command {
        Commands::SchemaCheck { schema, json } => commands::schema_check::run(schema, json),

        Commands::Resolve {
            schema,
            interface,
            value,
            identifier_only,
            json,
        } => commands::resolve::run(commands::resolve::Args {
            schema,
            interface,
            value,
            identifier_only,
            json,
        }),
    }
}
