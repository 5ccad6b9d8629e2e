//! Translating a whole package.
//!
//! The main body is read and validated before any other part is looked at.
//! Optional parts are independent of each other, so when the config allows
//! it they are rewritten on rayon worker threads; results are written back
//! afterwards on the calling thread.

use crate::config::TranslateConfig;
use crate::error::{DocxError, Result};
use crate::package::DocxPackage;
use crate::parts::{select_parts, PartKind, SelectedPart, MAIN_PART};
use crate::resolver::Resolver;
use crate::table::TranslationTable;
use crate::text_runs::{RunRewriter, RunStats};
use rayon::prelude::*;
use std::path::Path;

/// What happened to one selected part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOutcome {
    /// Rewritten and written back
    Rewritten(RunStats),
    /// Optional part without any opening tag, left untouched
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReport {
    pub name: String,
    pub kind: PartKind,
    pub outcome: PartOutcome,
}

/// Per-part results of [`process`], main body first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub parts: Vec<PartReport>,
}

impl ProcessReport {
    /// Run counts summed over all rewritten parts
    pub fn totals(&self) -> RunStats {
        let mut total = RunStats::default();
        for part in &self.parts {
            if let PartOutcome::Rewritten(stats) = part.outcome {
                total.merge(stats);
            }
        }
        total
    }

    pub fn rewritten_parts(&self) -> impl Iterator<Item = &PartReport> {
        self.parts
            .iter()
            .filter(|p| matches!(p.outcome, PartOutcome::Rewritten(_)))
    }

    pub fn skipped_parts(&self) -> impl Iterator<Item = &PartReport> {
        self.parts
            .iter()
            .filter(|p| p.outcome == PartOutcome::Skipped)
    }
}

/// Rewrite the text runs of every selected part of `package` in place.
///
/// Fails with [`DocxError::MissingMainPart`] before touching anything if the
/// package has no main body. On any error the package is left unmodified.
pub fn process<R: Resolver + ?Sized>(
    package: &mut DocxPackage,
    resolver: &R,
    config: &TranslateConfig,
) -> Result<ProcessReport> {
    let main_xml = package
        .read_part(MAIN_PART)?
        .ok_or_else(|| DocxError::MissingMainPart(MAIN_PART.to_string()))?;
    let rewriter = RunRewriter::new(&config.tag)?;

    let selected = select_parts(package.part_names())?;
    let mut optional = Vec::with_capacity(selected.len().saturating_sub(1));
    for part in selected.into_iter().filter(|p| p.kind.is_optional()) {
        let xml = package.read_part(&part.name)?.unwrap_or_default();
        optional.push((part, xml));
    }

    let (main_out, main_stats) = rewriter.rewrite(&main_xml, resolver);
    log::info!(
        "{}: {} of {} runs changed",
        MAIN_PART,
        main_stats.changed,
        main_stats.runs
    );
    let rewritten = rewrite_optional(&rewriter, optional, resolver, config)?;

    let mut report = ProcessReport::default();
    package.write_part(MAIN_PART, main_out);
    report.parts.push(PartReport {
        name: MAIN_PART.to_string(),
        kind: PartKind::Main,
        outcome: PartOutcome::Rewritten(main_stats),
    });

    for (part, result) in rewritten {
        let outcome = match result {
            Some((xml, stats)) => {
                log::info!("{}: {} of {} runs changed", part.name, stats.changed, stats.runs);
                package.write_part(&part.name, xml);
                PartOutcome::Rewritten(stats)
            }
            None => {
                log::debug!("{}: no <{}> runs, skipped", part.name, rewriter.tag());
                PartOutcome::Skipped
            }
        };
        report.parts.push(PartReport {
            name: part.name,
            kind: part.kind,
            outcome,
        });
    }
    Ok(report)
}

type Rewritten = (SelectedPart, Option<(String, RunStats)>);

fn rewrite_optional<R: Resolver + ?Sized>(
    rewriter: &RunRewriter,
    parts: Vec<(SelectedPart, String)>,
    resolver: &R,
    config: &TranslateConfig,
) -> Result<Vec<Rewritten>> {
    let rewrite_one = |(part, xml): (SelectedPart, String)| -> Rewritten {
        if rewriter.has_candidate(&xml) {
            let result = rewriter.rewrite(&xml, resolver);
            (part, Some(result))
        } else {
            (part, None)
        }
    };

    if !config.parallel || parts.len() < 2 {
        return Ok(parts.into_iter().map(rewrite_one).collect());
    }
    match config.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| parts.into_par_iter().map(rewrite_one).collect()))
        }
        None => Ok(parts.into_par_iter().map(rewrite_one).collect()),
    }
}

/// Translate the DOCX at `input` and write the result to `output`.
///
/// The output file is only created once the whole package has been
/// processed and serialized, so a failure never leaves a partial file.
pub fn translate_file<R: Resolver + ?Sized>(
    input: &Path,
    output: &Path,
    resolver: &R,
    config: &TranslateConfig,
) -> Result<ProcessReport> {
    let mut package = DocxPackage::read(input)?;
    let report = process(&mut package, resolver, config)?;
    package.write(output)?;
    Ok(report)
}

/// Translate an in-memory DOCX, returning the new archive bytes.
pub fn translate_bytes<R: Resolver + ?Sized>(
    bytes: &[u8],
    resolver: &R,
    config: &TranslateConfig,
) -> Result<(Vec<u8>, ProcessReport)> {
    let mut package = DocxPackage::from_bytes(bytes)?;
    let report = process(&mut package, resolver, config)?;
    Ok((package.to_bytes()?, report))
}

/// Collect the distinct, trimmed, non-blank run texts of every selected part
/// in document order, each mapped to itself. Serialized with
/// [`TranslationTable::to_records`] this is a ready-to-edit table.
pub fn collect_texts(package: &DocxPackage, config: &TranslateConfig) -> Result<TranslationTable> {
    let rewriter = RunRewriter::new(&config.tag)?;
    let mut table = TranslationTable::new();
    for part in select_parts(package.part_names())? {
        let xml = package.read_part(&part.name)?.unwrap_or_default();
        let before = table.len();
        for run in rewriter.runs(&xml) {
            let text = run.text.trim();
            if !text.is_empty() && table.get(text).is_none() {
                table.insert(text, text);
            }
        }
        log::debug!("{}: {} new texts", part.name, table.len() - before);
    }
    Ok(table)
}
