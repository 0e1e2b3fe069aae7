use anyhow::{Context, Result, bail};
use diag_cdd::{CddParser, ParseReport};
use diag_ir::DiagnosticDocument;
use diag_odx::{OdxWriteOptions, map_document, write_odx};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::Format;

/// Flags shared by single and batch conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub ecu_name: Option<String>,
    pub version: Option<String>,
    pub dry_run: bool,
}

pub fn parse_input(input: &Path) -> Result<(DiagnosticDocument, ParseReport)> {
    CddParser::new()
        .parse_file(input)
        .with_context(|| format!("parsing CDD from {}", input.display()))
}

/// Header values for the ODX writer: flag, then document, then file stem.
pub fn write_options(
    doc: &DiagnosticDocument,
    input: &Path,
    options: &ConvertOptions,
) -> OdxWriteOptions {
    let defaults = OdxWriteOptions::default();
    let ecu_name = options
        .ecu_name
        .clone()
        .or_else(|| (!doc.ecu_name.is_empty()).then(|| doc.ecu_name.clone()))
        .or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or(defaults.ecu_name);
    let version = options
        .version
        .clone()
        .or_else(|| (!doc.version.is_empty()).then(|| doc.version.clone()))
        .unwrap_or(defaults.version);
    OdxWriteOptions { ecu_name, version }
}

pub fn render(doc: &DiagnosticDocument, format: Format, options: &OdxWriteOptions) -> Result<String> {
    match format {
        Format::Odx => write_odx(&map_document(doc), options).context("writing ODX"),
        Format::Json => serde_json::to_string_pretty(doc).context("serializing JSON"),
        Format::Yaml => serde_yaml::to_string(doc).context("serializing YAML"),
    }
}

pub fn run_convert(
    input: &Path,
    output: &Path,
    format: Format,
    options: &ConvertOptions,
) -> Result<ParseReport> {
    log::info!("Converting {} -> {format:?}", input.display());

    let parse_start = Instant::now();
    let (doc, report) = parse_input(input)?;
    let parse_ms = parse_start.elapsed().as_secs_f64() * 1000.0;

    if let Err(errors) = diag_ir::validate_document(&doc) {
        for e in &errors {
            log::warn!("Validation: {e}");
        }
    }
    log::debug!("Parse time: {parse_ms:.1}ms");

    let write_start = Instant::now();
    let content = render(&doc, format, &write_options(&doc, input, options))?;

    if options.dry_run {
        println!(
            "dry run: would write {} bytes to {} ({} services, {} DIDs)",
            content.len(),
            output.display(),
            report.services,
            report.dids
        );
        return Ok(report);
    }

    std::fs::write(output, &content).with_context(|| format!("writing {}", output.display()))?;
    log::debug!(
        "Write time: {:.1}ms",
        write_start.elapsed().as_secs_f64() * 1000.0
    );

    println!(
        "Converted {} -> {} ({} services, {} DIDs)",
        input.display(),
        output.display(),
        report.services,
        report.dids
    );
    if !report.skipped.is_empty() {
        log::warn!(
            "{}: {} entities skipped",
            input.display(),
            report.skipped.len()
        );
    }

    Ok(report)
}

/// Convert every input into `output_dir` in parallel. Each input gets its
/// own parser; one failing file does not stop the others.
pub fn run_batch_convert(
    inputs: &[PathBuf],
    output_dir: &Path,
    format: Format,
    options: &ConvertOptions,
) -> Result<()> {
    use rayon::prelude::*;

    if !output_dir.exists() && !options.dry_run {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    }

    let results: Vec<(PathBuf, Result<ParseReport>)> = inputs
        .par_iter()
        .map(|input| {
            let out_path = batch_output_path(input, output_dir, format);
            let result = run_convert(input, &out_path, format, options);
            (input.clone(), result)
        })
        .collect();

    let mut failed = 0;
    let mut services = 0;
    let mut dids = 0;
    for (input, result) in &results {
        match result {
            Ok(report) => {
                services += report.services;
                dids += report.dids;
            }
            Err(e) => {
                eprintln!("FAILED {}: {e:#}", input.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed to convert", inputs.len());
    }

    println!(
        "Batch complete: {} files converted to {} ({services} services, {dids} DIDs)",
        inputs.len(),
        output_dir.display()
    );
    Ok(())
}

fn batch_output_path(input: &Path, output_dir: &Path, format: Format) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    output_dir.join(format!("{}.{}", stem.to_string_lossy(), format.extension()))
}
