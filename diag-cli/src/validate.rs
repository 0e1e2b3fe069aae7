use anyhow::{Result, bail};
use std::path::Path;

use crate::convert::parse_input;

/// Collects skipped entities and structural findings for one file.
pub fn collect_findings(input: &Path) -> Result<Vec<String>> {
    let (doc, report) = parse_input(input)?;

    let mut findings: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
    if let Err(errors) = diag_ir::validate_document(&doc) {
        findings.extend(errors.iter().map(ToString::to_string));
    }
    Ok(findings)
}

pub fn run_validate(input: &Path, quiet: bool, summary: bool) -> Result<()> {
    let all_errors = collect_findings(input)?;

    if all_errors.is_empty() {
        if !quiet {
            println!("{}: valid", input.display());
        }
        return Ok(());
    }

    if !quiet && !summary {
        for e in &all_errors {
            eprintln!("{}: {e}", input.display());
        }
    }

    let plural = if all_errors.len() == 1 { "" } else { "s" };
    if summary || !quiet {
        println!(
            "{}: {} validation error{plural}",
            input.display(),
            all_errors.len()
        );
    }

    bail!(
        "{} validation error{plural} in {}",
        all_errors.len(),
        input.display()
    );
}
