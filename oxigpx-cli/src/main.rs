//! gpx2gp - Guitar Pro 6 to Guitar Pro 7 converter
//!
//! Decodes `.gpx` containers (BCFZ or BCFS) and repackages the score as a
//! `.gp` archive.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{ConvertOptions, cmd_convert, cmd_list};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gpx2gp")]
#[command(
    author,
    version,
    about = "Convert Guitar Pro 6 (.gpx) files to Guitar Pro 7 (.gp)"
)]
#[command(long_about = "
gpx2gp decodes Guitar Pro 6 containers, compressed (BCFZ) or stored (BCFS),
and writes the score files into a Guitar Pro 7 archive.

Examples:
  gpx2gp convert -f song.gpx -o song.gp
  gpx2gp convert -f song.gpx -o song -v
  gpx2gp list song.gpx
  gpx2gp list song.gpx --json
  RUST_LOG=trace gpx2gp list song.gpx
")]
struct Cli {
    /// Print decode diagnostics (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GPX file to a GP7 archive
    #[command(alias = "c")]
    Convert {
        /// Input .gpx file
        #[arg(short, long)]
        file: PathBuf,

        /// Output .gp file (the extension is added when missing)
        #[arg(short, long)]
        out: PathBuf,

        /// Stylesheet written to Content/Stylesheets/score.gpss
        #[arg(long)]
        stylesheet: Option<PathBuf>,
    },

    /// List the files stored in a GPX container
    #[command(alias = "l")]
    List {
        /// Input .gpx file
        input: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Log filter used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose).as_str())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            file,
            out,
            stylesheet,
        } => cmd_convert(&ConvertOptions {
            input: file,
            output: out,
            stylesheet,
        }),
        Commands::List { input, json } => cmd_list(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
