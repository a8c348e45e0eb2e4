//! Vellum CLI: the `vellum` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            doc,
            patches,
            output,
            json,
        } => commands::apply::run(doc, patches, output, json),

        Commands::Diff { base, next, json } => commands::diff::run(base, next, json),

        Commands::Record {
            base,
            next,
            log,
            actor,
            json,
        } => commands::record::run(base, next, log, actor, json),

        Commands::Replay {
            doc,
            log,
            output,
            json,
        } => commands::replay::run(doc, log, output, json),

        Commands::Hash { doc, json } => commands::hash::run(doc, json),
    }
}
