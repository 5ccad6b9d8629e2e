//! Rewrite the visible text of a DOCX document from a translation table,
//! leaving all formatting, structure and embedded media untouched.
//!
//! Usage:
//!   docx-translate translate input.docx --table texts.json [-o output.docx]
//!   docx-translate translate input.docx --placeholder [-o output.docx]
//!   docx-translate extract input.docx [-o texts.json]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docx_translate::{
    collect_texts, translate_file, DictionaryResolver, DocxPackage, PartOutcome,
    PlaceholderResolver, Resolver, TranslateConfig, TranslationTable, DEFAULT_TAG,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "docx-translate",
    about = "Substitute the text of a DOCX document without touching its formatting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite document text from a translation table (or with placeholders)
    Translate {
        /// Input DOCX file
        input: PathBuf,

        /// Output DOCX file (default: <input_stem>_translated.docx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Translation table (.json, .csv, or .txt with one "old=new" per line)
        #[arg(long, env = "DOCX_TRANSLATE_TABLE", required_unless_present = "placeholder")]
        table: Option<PathBuf>,

        /// Replace text with filler words of the same word count; wins over --table
        #[arg(long)]
        placeholder: bool,

        /// Element whose text is rewritten
        #[arg(long, env = "DOCX_TRANSLATE_TAG", default_value = DEFAULT_TAG)]
        tag: String,

        /// Number of worker threads for headers, footers and notes
        #[arg(long)]
        threads: Option<usize>,

        /// Process every part on the main thread
        #[arg(long, conflicts_with = "threads")]
        sequential: bool,

        /// Report what would change without writing an output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the document's distinct texts as a JSON table template
    Extract {
        /// Input DOCX file
        input: PathBuf,

        /// Output JSON file (default: <input_stem>_texts.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Element whose text is collected
        #[arg(long, env = "DOCX_TRANSLATE_TAG", default_value = DEFAULT_TAG)]
        tag: String,
    },
}

/// `<dir>/<stem><suffix>` next to `input`.
fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}{suffix}"))
}

#[allow(clippy::too_many_arguments)]
fn translate(
    input: &Path,
    output: Option<&Path>,
    table: Option<&Path>,
    placeholder: bool,
    tag: &str,
    threads: Option<usize>,
    sequential: bool,
    dry_run: bool,
) -> Result<()> {
    // The table is loaded before the document is opened so a bad table never
    // costs any archive work.
    let resolver: Box<dyn Resolver> = match (placeholder, table) {
        (true, _) => {
            println!("Using placeholder text");
            Box::new(PlaceholderResolver::default())
        }
        (false, Some(path)) => {
            let table = TranslationTable::load(path)
                .with_context(|| format!("Failed to load translation table: {}", path.display()))?;
            println!("Loaded {} translation entries", table.len());
            Box::new(DictionaryResolver::new(table))
        }
        (false, None) => anyhow::bail!("either --table or --placeholder is required"),
    };

    let mut config = if sequential {
        TranslateConfig::sequential()
    } else {
        TranslateConfig::default()
    }
    .with_tag(tag);
    if let Some(n) = threads {
        config = config.with_threads(n);
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling_path(input, "_translated.docx"));

    println!("\nOpening DOCX: {}", input.display());
    let report = if dry_run {
        let mut package = DocxPackage::read(input)
            .with_context(|| format!("Failed to open DOCX: {}", input.display()))?;
        docx_translate::process(&mut package, resolver.as_ref(), &config)?
    } else {
        translate_file(input, &output, resolver.as_ref(), &config)
            .with_context(|| format!("Failed to translate {}", input.display()))?
    };

    for part in &report.parts {
        match part.outcome {
            PartOutcome::Rewritten(stats) => println!(
                "  {}: {} of {} text runs replaced",
                part.name, stats.changed, stats.runs
            ),
            PartOutcome::Skipped => println!("  {}: no text runs, skipped", part.name),
        }
    }
    let totals = report.totals();
    println!(
        "Replaced {} of {} text runs in {} parts",
        totals.changed,
        totals.runs,
        report.rewritten_parts().count()
    );

    if dry_run {
        println!("\nDry run, nothing written");
    } else {
        println!("\nTranslation completed: {} -> {}", input.display(), output.display());
    }
    Ok(())
}

fn extract(input: &Path, output: Option<&Path>, tag: &str) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling_path(input, "_texts.json"));

    println!("Opening DOCX: {}", input.display());
    let package = DocxPackage::read(input)
        .with_context(|| format!("Failed to open DOCX: {}", input.display()))?;
    let table = collect_texts(&package, &TranslateConfig::default().with_tag(tag))?;

    let json = serde_json::to_string_pretty(&table.to_records())?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} distinct texts to {}", table.len(), output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            input,
            output,
            table,
            placeholder,
            tag,
            threads,
            sequential,
            dry_run,
        } => translate(
            &input,
            output.as_deref(),
            table.as_deref(),
            placeholder,
            &tag,
            threads,
            sequential,
            dry_run,
        ),
        Commands::Extract { input, output, tag } => extract(&input, output.as_deref(), &tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("/tmp/report.docx"), "_translated.docx"),
            PathBuf::from("/tmp/report_translated.docx")
        );
        assert_eq!(
            sibling_path(Path::new("memo.docx"), "_texts.json"),
            PathBuf::from("memo_texts.json")
        );
    }

    #[test]
    fn test_placeholder_needs_no_table() {
        let cli = Cli::try_parse_from(["docx-translate", "translate", "in.docx", "--placeholder"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_placeholder_wins_over_table_from_env() {
        std::env::set_var("DOCX_TRANSLATE_TABLE", "texts.json");
        let cli = Cli::try_parse_from(["docx-translate", "translate", "in.docx", "--placeholder"]);
        std::env::remove_var("DOCX_TRANSLATE_TABLE");
        match cli.unwrap().command {
            Commands::Translate {
                table, placeholder, ..
            } => {
                assert!(placeholder);
                assert_eq!(table, Some(PathBuf::from("texts.json")));
            }
            Commands::Extract { .. } => panic!("expected translate"),
        }
    }
}
