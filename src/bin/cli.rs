//! skein CLI - minimal JavaScript module bundler.
//!
//! Usage:
//!   skein build src/main.js              # Bundle to dist/bundle.js
//!   skein build -c skein.toml            # Bundle per config file
//!   skein build src/main.js -o out       # Override output directory
//!   skein graph src/main.js              # Print dependency graph JSON

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skein::cli::{Cli, Commands};
use skein::{build_graph, emit, BundleConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            entry,
            config,
            out_dir,
            name,
        } => {
            let mut config = match config {
                Some(path) => BundleConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => BundleConfig::default(),
            };
            if let Some(entry) = entry {
                config.entry = Some(entry);
            }
            if let Some(dir) = out_dir {
                config.output.dir = dir;
            }
            if let Some(name) = name {
                config.output.filename = name;
            }
            let Some(entry) = config.entry else {
                bail!("no entry module: pass one as an argument or set it in the config file");
            };

            let graph = build_graph(&entry)?;
            let out_path = emit::write_bundle(&graph, &config.output.dir, &config.output.filename)?;
            println!(
                "Bundled {} modules into {}",
                graph.module_count(),
                out_path.display()
            );
        }

        Commands::Graph { entry } => {
            let graph = build_graph(&entry)?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
    }

    Ok(())
}
