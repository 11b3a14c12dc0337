use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use narctext::archive::TextArchive;
use narctext::text;
use narctext::transfer::{self, textdir};
use std::path::PathBuf;
use std::process;

const SELFTEST_SAMPLE: &str = "Selftest ~ 0123 \\xfffe [ok]";

#[derive(Parser)]
#[command(name = "narctext", version, about = "Pokémon B/W NARC text tool (export/import)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export texts from a NARC file
    #[command(group(
        ArgGroup::new("output").required(true).multiple(true).args(["output_json", "output_dir"])
    ))]
    Export {
        input: PathBuf,
        /// Output JSON file
        #[arg(short = 'o', long)]
        output_json: Option<PathBuf>,
        /// Output directory for individual .txt files
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },
    /// Import texts back into a NARC file
    Import {
        /// JSON file or export directory
        source:        PathBuf,
        narc_original: PathBuf,
        narc_output:   PathBuf,
    },
    /// List archive entries
    List {
        input: PathBuf,
    },
    /// Check that the text codec round-trips a sample string
    Selftest,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    // Printed directly so the failure shows even with logging turned off.
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {

        // ── Export ───────────────────────────────────────────────────────────
        Commands::Export { input, output_json, output_dir } => {
            selftest()?;
            let ar = TextArchive::open(&input)?;
            let sets = ar.text_sets();
            if let Some(path) = output_json {
                transfer::write_json(&sets, &path)?;
                info!("Export finished: {}", path.display());
            }
            if let Some(dir) = output_dir {
                let count = textdir::write_dir(&sets, &dir)?;
                info!("{count} entries exported to the '{}' directory", dir.display());
            }
        }

        // ── Import ───────────────────────────────────────────────────────────
        Commands::Import { source, narc_original, narc_output } => {
            selftest()?;
            let mut ar = TextArchive::open(&narc_original)?;
            let translations = transfer::load_translations(&source, ar.len())?;
            ar.apply_translations(&translations)?;
            ar.write(&narc_output)?;
            info!("Import finished! The new file is: {}", narc_output.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let ar = TextArchive::open(&input)?;
            println!("Archive: {} ({} entries)", input.display(), ar.len());
            println!("{:>6} {:>10} {:>10}  Strings", "Index", "Size", "CRC32");
            for entry in ar.list() {
                let strings = entry.strings
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "opaque".into());
                println!("{:>6} {:>10} {:>10}  {}",
                    entry.index, entry.size, format!("{:08x}", entry.crc32), strings);
            }
        }

        // ── Selftest ─────────────────────────────────────────────────────────
        Commands::Selftest => {
            selftest()?;
            info!("Encoding/decoding algorithm is correct");
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn selftest() -> Result<(), Box<dyn std::error::Error>> {
    let block = text::encode(&[SELFTEST_SAMPLE])?;
    let decoded = text::decode(&block);
    if decoded != [SELFTEST_SAMPLE] {
        return Err(format!("Self-test failed: decoded {decoded:?}").into());
    }
    Ok(())
}
