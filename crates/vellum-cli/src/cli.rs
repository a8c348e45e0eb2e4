use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vellum",
    about = "Vellum: structural-sharing immutable updates for JSON documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a patch file to a document
    Apply {
        /// Path to the base JSON document
        doc: String,

        /// Path to a JSON array of patches
        #[arg(long)]
        patches: String,

        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<String>,

        /// Output a JSON summary payload
        #[arg(long)]
        json: bool,
    },

    /// Diff two documents into a patch list
    Diff {
        /// Path to the base JSON document
        base: String,

        /// Path to the target JSON document
        next: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diff two documents and append the result to a patch log
    Record {
        /// Path to the base JSON document
        base: String,

        /// Path to the target JSON document
        next: String,

        /// Path to the patch log JSONL
        #[arg(long, default_value = ".vellum/patches.jsonl")]
        log: String,

        /// Actor name recorded on the log entry
        #[arg(long, default_value = "")]
        actor: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a patch log over a base document
    Replay {
        /// Path to the base JSON document
        doc: String,

        /// Path to the patch log JSONL
        #[arg(long, default_value = ".vellum/patches.jsonl")]
        log: String,

        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<String>,

        /// Output a JSON summary payload
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical content hash of a document
    Hash {
        /// Path to the JSON document
        doc: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
