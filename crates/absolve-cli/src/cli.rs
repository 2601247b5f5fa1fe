use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "absolve",
    about = "Absolve: interface covariance checks and abstract-type resolution over schema documents",
    version
)]
pub struct Cli {
    /// Log filter directives (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a schema document and run covariance/resolvability validation
    SchemaCheck {
        /// Path to the schema document JSON
        #[arg(long)]
        schema: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a runtime value to the concrete type behind an interface
    Resolve {
        /// Path to the schema document JSON
        #[arg(long)]
        schema: String,

        /// Interface identifier or name
        #[arg(long)]
        interface: String,

        /// Value to classify: inline JSON, or `@path` to read it from a file
        #[arg(long)]
        value: String,

        /// Return the discriminating identifier without registry lookup
        #[arg(long)]
        identifier_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
