//! protomod - compile a schema file to JSON or JavaScript module glue
//!
//! This binary parses a root schema, composes its import graph, and writes
//! the projected artifact to stdout. Diagnostics and logs go to stderr.
//!
//! Exit codes: 0 on success, 2 for configuration errors (a missing include
//! directory; also what clap uses for usage errors), 1 for read, parse,
//! resolution, and namespace failures.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use protomod::emit::{NamespaceSpec, RenderMode, RenderOptions, Target};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "protomod")]
#[command(about = "Compile a schema file to structural JSON or JavaScript module glue")]
struct Cli {
    /// Path to the root schema file
    schema: PathBuf,

    /// Output target
    #[arg(short = 't', long, value_enum, default_value = "json")]
    target: TargetArg,

    /// Wrap output under this namespace; without a value, derive it from
    /// the schema's own package
    #[arg(short = 'n', long, num_args = 0..=1, default_missing_value = "", value_name = "NS")]
    namespace: Option<String>,

    /// Additional include directory for import resolution (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Runtime library name referenced by the generated wrapper
    #[arg(short = 'd', long, value_name = "NAME")]
    dependency: Option<String>,

    /// Minify the embedded data literal
    #[arg(long)]
    compact: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TargetArg {
    /// Composed schema as a structural JSON document
    Json,
    /// Variable-assignment wrapper onto a global runtime library
    Shim,
    /// CommonJS module.exports wrapper
    Commonjs,
    /// Asynchronous module definition wrapper
    Amd,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Json => Target::Json,
            TargetArg::Shim => Target::Shim,
            TargetArg::Commonjs => Target::CommonJs,
            TargetArg::Amd => Target::Amd,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "protomod=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let namespace = match cli.namespace.as_deref() {
        None => NamespaceSpec::None,
        Some("") => NamespaceSpec::FromPackage,
        Some(ns) => NamespaceSpec::Explicit(ns.to_string()),
    };
    let options = RenderOptions {
        target: cli.target.into(),
        namespace,
        mode: if cli.compact {
            RenderMode::Compact
        } else {
            RenderMode::Pretty
        },
        dependency: cli.dependency,
    };

    match protomod::compile(&cli.schema, &cli.include, &options) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("{}", e);
            std::process::exit(if e.is_config() { 2 } else { 1 });
        }
    }
}
