use clap::{Parser, Subcommand, ValueEnum};
use ehfile::compare::compare;
use ehfile::container::{json_length_offset, json_start_offset};
use ehfile::database::Database;
use ehfile::editor::{edit_dir, edit_file, format_json, write_json, EditOptions};
use ehfile::field::{read_u32_be, read_u32_le};
use ehfile::files::BatchReport;
use ehfile::header::FILE_LENGTH_OFFSET;
use ehfile::translate::{translate_by_key, translate_by_name};
use ehfile::{decode, HeaderLayout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ehfile", about = "Inspect and edit Event Horizon asset containers")]
struct Cli {
    /// How the object-length field offset is derived
    #[arg(long, value_enum, default_value_t = Layout::VersionTable, global = true)]
    layout: Layout,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    /// Offset keyed by the version tag at header offset 8
    VersionTable,
    /// Offset derived from the string at header offset 20 (older files)
    NameLength,
}

impl From<Layout> for HeaderLayout {
    fn from(l: Layout) -> Self {
        match l {
            Layout::VersionTable => HeaderLayout::VersionTable,
            Layout::NameLength   => HeaderLayout::NameLength,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show header fields and payload offsets of a container
    Info {
        input: PathBuf,
    },
    /// Print (or save) the JSON payload
    Extract {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print instead of the stored text
        #[arg(short, long)]
        pretty: bool,
    },
    /// Replace the JSON payload, keeping the header
    Replace {
        input: PathBuf,
        #[arg(short, long)]
        json: PathBuf,
        /// Write to a copy instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-encode a file, or every file in a directory, with formatted JSON
    Format {
        path: PathBuf,
    },
    /// List every record in a game data directory
    List {
        dir: PathBuf,
    },
    /// Export a game data directory as a tree of plain JSON files
    BuildDb {
        dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Diff the containers of two directories
    Compare {
        old: PathBuf,
        new: PathBuf,
    },
    /// Port mod files onto the headers of a newer game version
    Translate {
        old_mod: PathBuf,
        new_events: PathBuf,
        new_mod: PathBuf,
        /// Match by (ItemType, Id) through this old-version directory
        #[arg(long)]
        old_events: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let layout = HeaderLayout::from(cli.layout);
    let options = EditOptions { layout, ..EditOptions::default() };

    match cli.command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let bytes = std::fs::read(&input)?;
            let c = decode(&bytes)?;
            let name_len = c.asset_name_length as usize;
            let json_field = json_length_offset(name_len).unwrap_or_default();

            println!("── Container ────────────────────────────────────────────");
            println!("  Path              {}", input.display());
            println!("  Size              {} B", bytes.len());
            println!("  Format version    {}", c.header.format_version());
            println!("  File length field {}", read_u32_be(&bytes, FILE_LENGTH_OFFSET)?);
            match c.header.object_length_offset(layout) {
                Ok(off) => println!("  Object length     {} (@{off}, {layout})", read_u32_le(&bytes, off)?),
                Err(e)  => println!("  Object length     unavailable ({e})"),
            }
            println!("  Asset name length {}", name_len);
            println!("  JSON length field {} (@{json_field})", read_u32_le(&bytes, json_field).unwrap_or_default());
            println!("  JSON start        {}", json_start_offset(name_len).unwrap_or_default());
            println!("  JSON bytes        {}", c.json.len());
            println!("  Header prefix     {}", hex::encode(&c.header.as_bytes()[..32]));
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output, pretty } => {
            let c = decode(&std::fs::read(&input)?)?;
            let text = if pretty {
                format_json(serde_json::from_str(&c.json)?, &options)?
            } else {
                c.json
            };
            match output {
                Some(path) => std::fs::write(path, text)?,
                None       => println!("{text}"),
            }
        }

        // ── Replace ──────────────────────────────────────────────────────────
        Commands::Replace { input, json, output } => {
            let text = std::fs::read_to_string(&json)?;
            serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&text)?;
            let target = match output {
                Some(out) => {
                    std::fs::copy(&input, &out)?;
                    out
                }
                None => input,
            };
            write_json(&target, &text, layout)?;
            println!("Written: {}", target.display());
        }

        // ── Format ───────────────────────────────────────────────────────────
        Commands::Format { path } => {
            if path.is_dir() {
                let report = edit_dir(&path, &options, |obj| obj)?;
                print_report("formatted", &report);
            } else if edit_file(&path, &options, |obj| obj)? {
                println!("formatted {}", path.display());
            } else {
                println!("{} is not a container", path.display());
            }
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { dir } => {
            let (db, report) = Database::load(&dir)?;
            print!("{db}");
            print_report("loaded", &report);
        }

        // ── BuildDb ──────────────────────────────────────────────────────────
        Commands::BuildDb { dir, output } => {
            let (db, report) = Database::load(&dir)?;
            let written = db.build(&output)?;
            print_report("loaded", &report);
            println!("Exported {written} record(s) to {}", output.display());
        }

        // ── Compare ──────────────────────────────────────────────────────────
        Commands::Compare { old, new } => {
            for diff in compare(&old, &new)? {
                println!("{diff}");
            }
        }

        // ── Translate ────────────────────────────────────────────────────────
        Commands::Translate { old_mod, new_events, new_mod, old_events } => {
            let translation = match old_events {
                Some(old_events) => translate_by_key(&old_mod, &old_events, &new_events, &new_mod, layout)?,
                None             => translate_by_name(&old_mod, &new_events, &new_mod, layout)?,
            };
            if !translation.untranslated.is_empty() {
                println!("No counterpart in {}:", new_events.display());
                for path in &translation.untranslated {
                    println!("  {}", path.display());
                }
            }
            print_report("translated", &translation.report);
            println!("Translated mod written to {}", new_mod.display());
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn print_report(verb: &str, report: &BatchReport) {
    println!("{} {verb}, {} skipped, {} failed", report.processed, report.skipped, report.failures.len());
    for failure in &report.failures {
        eprintln!("  {failure}");
    }
}
