//! eventscope CLI
//!
//! Inspect the closures a code generator would emit for a descriptor set:
//! - `closure`: events, fields and enums of one schema unit
//! - `events` / `fields` / `enums`: one set, one qualified name per line
//! - `units`: the files of the descriptor set
//!
//! Descriptor sets are the JSON rendering of `google.protobuf.FileDescriptorSet`
//! (`buf build --as-file-descriptor-set -o descriptor.json`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod closure;

use closure::{SetKind, UnitArgs};

#[derive(Parser)]
#[command(name = "eventscope")]
#[command(
    author,
    version,
    about = "Event, field and enum closures of a protobuf descriptor set"
)]
struct Cli {
    /// Log resolver decisions (`-v` debug, `-vv` trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the schema units (files) of a descriptor set.
    Units {
        /// Descriptor set JSON.
        descriptor: PathBuf,
    },

    /// Print the events, fields and enums of one unit.
    Closure {
        #[command(flatten)]
        target: UnitArgs,
        /// Emit the closure report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the event types, one qualified name per line.
    Events {
        #[command(flatten)]
        target: UnitArgs,
    },

    /// Print the field types, one qualified name per line.
    Fields {
        #[command(flatten)]
        target: UnitArgs,
    },

    /// Print the enum types, one qualified name per line.
    Enums {
        #[command(flatten)]
        target: UnitArgs,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Units { descriptor } => closure::cmd_units(&descriptor),
        Commands::Closure { target, json } => closure::cmd_closure(&target, json),
        Commands::Events { target } => closure::cmd_set(&target, SetKind::Events),
        Commands::Fields { target } => closure::cmd_set(&target, SetKind::Fields),
        Commands::Enums { target } => closure::cmd_set(&target, SetKind::Enums),
    }
}
