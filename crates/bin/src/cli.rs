//! CLI argument definitions for the ydot binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// How the snapshot file is stored on disk
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Encoding {
    /// Base64 text, as written by `fromUint8Array` (default)
    Base64,
    /// Raw update bytes
    Binary,
}

impl From<Encoding> for ydot::snapshot::Encoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Base64 => ydot::snapshot::Encoding::Base64,
            Encoding::Binary => ydot::snapshot::Encoding::Binary,
        }
    }
}

/// Render the item log of a Yjs document as a Graphviz graph
#[derive(Parser, Debug)]
#[command(name = "ydot")]
#[command(about = "ydot: Graphviz views of Yjs document internals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the item graph in dot format
    Render(RenderArgs),
    /// List the flattened items with their labels
    Items(ItemsArgs),
}

/// Snapshot location and encoding shared by all commands
#[derive(clap::Args, Debug)]
pub struct SnapshotArgs {
    /// Snapshot file holding a full-state v1 update
    #[arg(default_value = "1.bin", env = "YDOT_SNAPSHOT")]
    pub path: PathBuf,

    /// Encoding of the snapshot file
    #[arg(short, long, default_value = "base64", env = "YDOT_ENCODING")]
    pub encoding: Encoding,
}

/// Arguments for the render command
#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Write the graph to this file instead of stdout
    #[arg(short, long, env = "YDOT_OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Arguments for the items command
#[derive(clap::Args, Debug)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Print one JSON object per item instead of a table
    #[arg(long)]
    pub json: bool,
}
