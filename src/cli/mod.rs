//! CLI definitions for the skein binary.
//!
//! Commands:
//! - build: bundle an entry module into one output file
//! - graph: print the resolved dependency graph as JSON

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skein")]
#[command(about = "Minimal JavaScript module bundler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bundle an entry module and its dependencies into one file
    Build {
        /// Entry module path (overrides the config file)
        entry: Option<PathBuf>,

        /// Build config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Output file name
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the resolved dependency graph as JSON
    Graph {
        /// Entry module path
        entry: PathBuf,
    },
}
